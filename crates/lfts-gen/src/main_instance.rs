// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Program epilogue: creation of the single root instance and the runtime start.
//!
//! Both statements are guarded by `__noStart` so a generated module can be
//! imported without running. Main parameters that may be set on the command
//! line are passed as `__CL<name>` (undefined unless the user supplied one);
//! all others are passed as `undefined` so the constructor default applies.

use std::collections::BTreeSet;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Emitted};
use crate::fragment::Fragment;
use crate::ir::{Instantiation, ReactorDefinition};

/// Parameter types the generated argument parser can read.
pub const CLI_PARSABLE_TYPES: [&str; 3] = ["number", "string", "boolean"];

/// The two independent epilogue fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramEpilogue {
    /// `let __app;` plus the guarded construction.
    pub instantiation: Vec<Fragment>,
    /// The guarded `_start()` call.
    pub startup: Vec<Fragment>,
}

/// Names of the main parameters settable from the command line.
///
/// An explicit list on the instantiation wins. Otherwise parameters of a
/// [`CLI_PARSABLE_TYPES`] type qualify and every other explicitly typed
/// parameter raises [`DiagnosticKind::UnsupportedCommandLineType`].
pub fn overridable_parameters(
    main: &Instantiation,
    reactor: &ReactorDefinition,
) -> Emitted<BTreeSet<String>> {
    if let Some(explicit) = &main.overridable {
        return Emitted::clean(explicit.iter().cloned().collect());
    }
    let mut diagnostics = Vec::new();
    let mut names = BTreeSet::new();
    for param in &reactor.parameters {
        // Untyped parameters are silently left to their defaults.
        let Some(ty) = param.ty.as_deref() else {
            continue;
        };
        if CLI_PARSABLE_TYPES.contains(&ty) {
            names.insert(param.name.clone());
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnsupportedCommandLineType,
                format!("{}.{}", reactor.name, param.name),
                format!("parameter of type `{ty}` cannot be set from the command line"),
            ));
        }
    }
    Emitted::new(names, diagnostics)
}

/// Emit the root instantiation and startup call for `main`, an instance of `reactor`.
pub fn emit_main_instance(
    main: &Instantiation,
    reactor: &ReactorDefinition,
) -> Emitted<ProgramEpilogue> {
    let mut diagnostics = Vec::new();
    let overridable = overridable_parameters(main, reactor).absorb_into(&mut diagnostics);

    let mut args: Vec<String> = ["__timeout", "__keepAlive", "__fast"]
        .iter()
        .map(|s| (*s).to_owned())
        .collect();
    args.extend(reactor.parameters.iter().map(|p| {
        if overridable.contains(&p.name) {
            format!("__CL{}", p.name)
        } else {
            "undefined".to_owned()
        }
    }));

    let class = &main.reactor_class;
    let instantiation = vec![
        Fragment::raw(format!(
            "// ************* Instance {} of class {class}",
            main.name
        )),
        Fragment::raw("let __app;"),
        Fragment::scope(
            "if (!__noStart) {",
            vec![Fragment::raw(format!(
                "__app = new {class}({});",
                args.join(", ")
            ))],
            "}",
        ),
    ];
    let startup = vec![
        Fragment::raw(format!(
            "// ************* Starting Runtime for {} of class {class}.",
            main.name
        )),
        Fragment::scope(
            "if (!__noStart && __app) {",
            vec![Fragment::call("__app._start", Vec::<String>::new())],
            "}",
        ),
    ];

    Emitted::new(
        ProgramEpilogue {
            instantiation,
            startup,
        },
        diagnostics,
    )
}
