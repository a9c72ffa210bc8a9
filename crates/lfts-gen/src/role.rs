// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Base-class role of an emitted reactor class.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Emitted};
use crate::ir::ReactorDefinition;

/// Which runtime base class a reactor extends. Exactly one per reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactorRole {
    /// Top-level reactor of a single-process program (`__App`).
    Main,
    /// Top-level reactor of one federate (`__FederatedApp`).
    Federated,
    /// Any contained reactor (`__Reactor`).
    Plain,
}

impl ReactorRole {
    /// Decide the role from the definition's flags.
    ///
    /// A definition flagged both main and federated resolves to [`ReactorRole::Main`]
    /// and raises [`DiagnosticKind::AmbiguousRole`]. The federated extras are then
    /// dropped: no `registerFederatePortAction` calls and no reaction filtering.
    pub fn select(reactor: &ReactorDefinition) -> Emitted<Self> {
        match (reactor.is_main, reactor.is_federated) {
            (true, true) => Emitted::new(
                Self::Main,
                vec![Diagnostic::new(
                    DiagnosticKind::AmbiguousRole,
                    &reactor.name,
                    "reactor is marked both main and federated; emitting it as a main app",
                )],
            ),
            (true, false) => Emitted::clean(Self::Main),
            (false, true) => Emitted::clean(Self::Federated),
            (false, false) => Emitted::clean(Self::Plain),
        }
    }

    /// Runtime base class name.
    pub const fn base_class(self) -> &'static str {
        match self {
            Self::Main => "__App",
            Self::Federated => "__FederatedApp",
            Self::Plain => "__Reactor",
        }
    }

    /// Whether the class is a top-level app (constructed with runtime options).
    pub const fn is_app(self) -> bool {
        matches!(self, Self::Main | Self::Federated)
    }

    /// Class declaration line for `display_name`. Only plain reactors are exported.
    pub fn class_header(self, display_name: &str) -> String {
        let base = self.base_class();
        match self {
            Self::Plain => format!("export class {display_name} extends {base} {{"),
            Self::Main | Self::Federated => format!("class {display_name} extends {base} {{"),
        }
    }
}

/// Class name plus `<T, U>` when the reactor is generic.
pub fn display_name(reactor: &ReactorDefinition) -> String {
    if reactor.type_params.is_empty() {
        reactor.name.clone()
    } else {
        format!("{}<{}>", reactor.name, reactor.type_params.join(", "))
    }
}
