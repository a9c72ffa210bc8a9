// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Constructor signatures and superclass-initialization calls.
//!
//! Reactor parameters become constructor arguments, in declaration order and
//! under their declared names. Apps additionally take the runtime options
//! (`timeout`, `keepAlive`, `fast`) up front and the completion callbacks last;
//! contained reactors take their parent first.

use std::fmt;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Emitted};
use crate::federation::RtiBinding;
use crate::fragment::Fragment;
use crate::ir::{ParameterDef, ReactorDefinition};
use crate::role::ReactorRole;

/// Substituted for a parameter initializer that cannot be derived.
pub const MISSING_DEFAULT_PLACEHOLDER: &str = "undefined /* missing default value */";

/// One constructor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArg {
    /// `timeout: TimeValue | undefined = undefined`
    Timeout,
    /// `keepAlive: boolean = false`
    KeepAlive,
    /// `fast: boolean = false`
    Fast,
    /// `parent: __Reactor`
    Parent,
    /// `name: ty = initializer`
    Parameter {
        /// Parameter name, unchanged from the IR.
        name: String,
        /// Target type.
        ty: String,
        /// Default value expression.
        initializer: String,
    },
    /// `success?: () => void`
    Success,
    /// `fail?: () => void`
    Fail,
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout: TimeValue | undefined = undefined"),
            Self::KeepAlive => write!(f, "keepAlive: boolean = false"),
            Self::Fast => write!(f, "fast: boolean = false"),
            Self::Parent => write!(f, "parent: __Reactor"),
            Self::Parameter {
                name,
                ty,
                initializer,
            } => write!(f, "{name}: {ty} = {initializer}"),
            Self::Success => write!(f, "success?: () => void"),
            Self::Fail => write!(f, "fail?: () => void"),
        }
    }
}

/// Default-value expression for `param`.
///
/// One value is used verbatim, several become an array literal, none is
/// reported as [`DiagnosticKind::MissingDefaultValue`] and replaced by
/// [`MISSING_DEFAULT_PLACEHOLDER`].
pub fn format_initializer(owner: &str, param: &ParameterDef) -> Emitted<String> {
    match param.init.as_slice() {
        [] => Emitted::new(
            MISSING_DEFAULT_PLACEHOLDER.to_owned(),
            vec![Diagnostic::new(
                DiagnosticKind::MissingDefaultValue,
                format!("{owner}.{}", param.name),
                "Parameters must have a default value!",
            )],
        ),
        [single] => Emitted::clean(single.clone()),
        many => Emitted::clean(format!("[{}]", many.join(", "))),
    }
}

/// Ordered constructor arguments for `reactor` in `role`.
pub fn constructor_arguments(
    role: ReactorRole,
    reactor: &ReactorDefinition,
) -> Emitted<Vec<ConstructorArg>> {
    let mut diagnostics = Vec::new();
    let mut args = if role.is_app() {
        vec![
            ConstructorArg::Timeout,
            ConstructorArg::KeepAlive,
            ConstructorArg::Fast,
        ]
    } else {
        vec![ConstructorArg::Parent]
    };

    for param in &reactor.parameters {
        let initializer = format_initializer(&reactor.name, param).absorb_into(&mut diagnostics);
        args.push(ConstructorArg::Parameter {
            name: param.name.clone(),
            ty: param.target_type().to_owned(),
            initializer,
        });
    }

    if role.is_app() {
        args.push(ConstructorArg::Success);
        args.push(ConstructorArg::Fail);
    }
    Emitted::new(args, diagnostics)
}

/// Constructor header: `constructor (` + one argument per line + `) {`.
pub fn constructor_header(args: &[ConstructorArg]) -> Fragment {
    Fragment::List {
        open: "constructor (".to_owned(),
        items: args.iter().map(ToString::to_string).collect(),
        close: ") {".to_owned(),
    }
}

/// Superclass-initialization call of a reactor constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuperCall {
    /// `super(timeout, keepAlive, fast, success, fail)`
    App,
    /// `super(id, port, "host", timeout, keepAlive, fast, success, fail)`
    FederatedApp {
        /// Id of the federate the class is emitted for.
        federate_id: u32,
        /// Resolved RTI endpoint.
        binding: RtiBinding,
    },
    /// `super(parent)`
    Reactor,
}

impl SuperCall {
    /// Argument expressions, in order.
    pub fn args(&self) -> Vec<String> {
        const RUNTIME_OPTIONS: [&str; 5] = ["timeout", "keepAlive", "fast", "success", "fail"];
        match self {
            Self::App => RUNTIME_OPTIONS.iter().map(|s| (*s).to_owned()).collect(),
            Self::FederatedApp {
                federate_id,
                binding,
            } => {
                let mut args = vec![
                    federate_id.to_string(),
                    binding.port.to_string(),
                    serde_json::Value::String(binding.host.clone()).to_string(),
                ];
                args.extend(RUNTIME_OPTIONS.iter().map(|s| (*s).to_owned()));
                args
            }
            Self::Reactor => vec!["parent".to_owned()],
        }
    }

    /// The call as a statement fragment.
    pub fn to_fragment(&self) -> Fragment {
        Fragment::call("super", self.args())
    }
}
