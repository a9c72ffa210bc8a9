// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Reactor class emission.
//!
//! [`ReactorClassEmitter`] turns one [`ReactorDefinition`] (plus the federate
//! it runs in, for a federated top level) into a [`ReactorClass`]: a
//! structured description of the class whose parts can be inspected before
//! [`ReactorClass::to_fragments`] lays them out as a document.
//!
//! # Composition order
//!
//! 1. start marker, then preambles verbatim
//! 2. class header extending the role's base class
//! 3. property declarations, in [`PROPERTY_STAGES`] order
//! 4. constructor header and superclass call
//! 5. instantiations, in [`INSTANTIATION_STAGES`] order
//! 6. network action registrations (federated only)
//! 7. selected reactions, in declaration order
//! 8. closing braces and end marker
//!
//! Each emission owns its output. Nothing is shared between reactors, so
//! classes can be emitted concurrently and concatenated in declaration order.

use tracing::debug;

use crate::diagnostics::Emitted;
use crate::error::GenError;
use crate::features::{FeatureSet, Stage, INSTANTIATION_STAGES, PROPERTY_STAGES};
use crate::federation::{
    port_action_registrations, resolve_binding, Federate, PortActionRegistration,
};
use crate::fragment::Fragment;
use crate::ir::{FederationConfig, ReactorDefinition};
use crate::reactions::{reactions_for, ReactionRenderer};
use crate::role::{display_name, ReactorRole};
use crate::signature::{constructor_arguments, constructor_header, ConstructorArg, SuperCall};

/// Everything emitted for one reactor, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorClass {
    /// Reactor name (used in markers).
    pub name: String,
    /// Name with type parameters (used in the class header).
    pub display_name: String,
    /// Selected base-class role.
    pub role: ReactorRole,
    /// Preamble blocks, verbatim.
    pub preambles: Vec<String>,
    /// Constructor arguments, in order.
    pub constructor_args: Vec<ConstructorArg>,
    /// Superclass-initialization call.
    pub super_call: SuperCall,
    /// Property declarations per stage, in composition order.
    pub properties: Vec<(Stage, Vec<Fragment>)>,
    /// Constructor statements per stage, in composition order.
    pub instantiations: Vec<(Stage, Vec<Fragment>)>,
    /// Network action registrations (federated apps only).
    pub registrations: Vec<PortActionRegistration>,
    /// Rendered reactions with their declaration indices, in emission order.
    pub reactions: Vec<(usize, Fragment)>,
}

impl ReactorClass {
    /// Declaration indices of the emitted reactions.
    pub fn reaction_indices(&self) -> Vec<usize> {
        self.reactions.iter().map(|(index, _)| *index).collect()
    }

    /// Lay the class out as a document.
    pub fn to_fragments(&self) -> Vec<Fragment> {
        let mut out = vec![Fragment::raw(format!(
            "// =============== START reactor class {}",
            self.name
        ))];
        for preamble in &self.preambles {
            out.push(Fragment::raw("// *********** From the preamble, verbatim:"));
            out.push(Fragment::verbatim(preamble.as_str()));
            out.push(Fragment::raw("// *********** End of preamble."));
        }

        let mut constructor_body = vec![self.super_call.to_fragment()];
        constructor_body.extend(
            self.instantiations
                .iter()
                .flat_map(|(_, fragments)| fragments.iter().cloned()),
        );
        constructor_body.extend(self.registrations.iter().map(PortActionRegistration::to_fragment));
        constructor_body.extend(self.reactions.iter().map(|(_, fragment)| fragment.clone()));
        let constructor = Fragment::Scope {
            head: vec![constructor_header(&self.constructor_args)],
            body: constructor_body,
            tail: "}".to_owned(),
        };

        let mut class_body: Vec<Fragment> = self
            .properties
            .iter()
            .flat_map(|(_, fragments)| fragments.iter().cloned())
            .collect();
        class_body.push(constructor);
        out.push(Fragment::scope(
            self.role.class_header(&self.display_name),
            class_body,
            "}",
        ));
        out.push(Fragment::raw(format!(
            "// =============== END reactor class {}",
            self.name
        )));
        out.push(Fragment::blank());
        out
    }
}

/// Emits reactor classes using a fixed feature set and reaction renderer.
#[derive(Clone, Copy)]
pub struct ReactorClassEmitter<'a> {
    features: &'a dyn FeatureSet,
    reactions: &'a dyn ReactionRenderer,
    federation: &'a FederationConfig,
}

impl<'a> ReactorClassEmitter<'a> {
    /// Emitter composing `features` and `reactions`; `federation` locates the RTI.
    pub fn new(
        features: &'a dyn FeatureSet,
        reactions: &'a dyn ReactionRenderer,
        federation: &'a FederationConfig,
    ) -> Self {
        Self {
            features,
            reactions,
            federation,
        }
    }

    /// Emit the class for `reactor`.
    ///
    /// `federate` is required when the reactor resolves to the federated role
    /// and ignored otherwise. Recoverable input problems become diagnostics.
    pub fn emit(
        &self,
        reactor: &ReactorDefinition,
        federate: Option<&dyn Federate>,
    ) -> Result<Emitted<ReactorClass>, GenError> {
        let mut diagnostics = Vec::new();
        let role = ReactorRole::select(reactor).absorb_into(&mut diagnostics);

        let federate = match (role, federate) {
            (ReactorRole::Federated, Some(federate)) => Some(federate),
            (ReactorRole::Federated, None) => {
                return Err(GenError::MissingFederate {
                    reactor: reactor.name.clone(),
                })
            }
            _ => None,
        };

        let constructor_args = constructor_arguments(role, reactor).absorb_into(&mut diagnostics);
        let super_call = match (role, federate) {
            (ReactorRole::Main, _) => SuperCall::App,
            (ReactorRole::Federated, Some(federate)) => SuperCall::FederatedApp {
                federate_id: federate.id(),
                binding: resolve_binding(self.federation),
            },
            _ => SuperCall::Reactor,
        };

        let properties: Vec<(Stage, Vec<Fragment>)> = PROPERTY_STAGES
            .iter()
            .map(|&stage| {
                let fragments = self
                    .features
                    .generator(stage)
                    .property_declarations(reactor)
                    .absorb_into(&mut diagnostics);
                (stage, fragments)
            })
            .collect();
        let instantiations: Vec<(Stage, Vec<Fragment>)> = INSTANTIATION_STAGES
            .iter()
            .map(|&stage| {
                let fragments = self
                    .features
                    .generator(stage)
                    .instantiation_statements(reactor)
                    .absorb_into(&mut diagnostics);
                (stage, fragments)
            })
            .collect();

        let registrations = federate
            .map(|f| port_action_registrations(f.network_message_actions()))
            .unwrap_or_default();

        let reactions: Vec<_> = reactions_for(reactor, federate)
            .into_iter()
            .map(|(index, reaction)| (index, self.reactions.render(reactor, index, reaction)))
            .collect();

        debug!(
            reactor = %reactor.name,
            ?role,
            reactions = reactions.len(),
            registrations = registrations.len(),
            diagnostics = diagnostics.len(),
            "emitted reactor class"
        );

        Ok(Emitted::new(
            ReactorClass {
                name: reactor.name.clone(),
                display_name: display_name(reactor),
                role,
                preambles: reactor.preambles.clone(),
                constructor_args,
                super_call,
                properties,
                instantiations,
                registrations,
                reactions,
            },
            diagnostics,
        ))
    }
}
