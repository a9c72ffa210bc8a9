// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Builders for reactor program IR.
//!
//! # Example
//!
//! ```
//! use lfts_dry_tests::{ms, ProgramBuilder, ReactorBuilder};
//!
//! let program = ProgramBuilder::new()
//!     .reactor(
//!         ReactorBuilder::new("Blink")
//!             .main()
//!             .timer("t", None, Some(ms(500)))
//!             .reaction(&["t"], &[], &[], "console.log('tick');")
//!             .build(),
//!     )
//!     .main("blink", "Blink")
//!     .build();
//! assert_eq!(program.reactors[0].timers.len(), 1);
//! ```

use std::collections::BTreeSet;

use lfts_gen::ir::{
    ActionDef, ActionOrigin, Assignment, ConnectionDef, FederateInstance, FederationConfig,
    InstanceDef, Instantiation, ParameterDef, PortDef, Program, ReactionDef, ReactorDefinition,
    StateVarDef, TimeUnit, TimeValue, TimerDef, IR_VERSION,
};

/// `n` milliseconds.
pub const fn ms(n: u64) -> TimeValue {
    TimeValue {
        magnitude: n,
        unit: TimeUnit::Msec,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn ty(ty: &str) -> Option<String> {
    (!ty.is_empty()).then(|| ty.to_owned())
}

/// Builder for [`ReactorDefinition`]. An empty type string means "no annotation".
#[derive(Debug, Clone)]
pub struct ReactorBuilder {
    reactor: ReactorDefinition,
}

impl ReactorBuilder {
    /// Plain reactor named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            reactor: ReactorDefinition {
                name: name.to_owned(),
                ..ReactorDefinition::default()
            },
        }
    }

    /// Mark as the main reactor.
    pub fn main(mut self) -> Self {
        self.reactor.is_main = true;
        self
    }

    /// Mark as a federated top level.
    pub fn federated(mut self) -> Self {
        self.reactor.is_federated = true;
        self
    }

    /// Add a generic type parameter.
    pub fn type_param(mut self, name: &str) -> Self {
        self.reactor.type_params.push(name.to_owned());
        self
    }

    /// Add a constructor parameter.
    pub fn param(mut self, name: &str, param_ty: &str, init: &[&str]) -> Self {
        self.reactor.parameters.push(ParameterDef {
            name: name.to_owned(),
            ty: ty(param_ty),
            init: strings(init),
        });
        self
    }

    /// Add a state variable.
    pub fn state(mut self, name: &str, state_ty: &str, init: &[&str]) -> Self {
        self.reactor.state_vars.push(StateVarDef {
            name: name.to_owned(),
            ty: ty(state_ty),
            init: strings(init),
        });
        self
    }

    /// Add a timer.
    pub fn timer(mut self, name: &str, offset: Option<TimeValue>, period: Option<TimeValue>) -> Self {
        self.reactor.timers.push(TimerDef {
            name: name.to_owned(),
            offset,
            period,
        });
        self
    }

    /// Add a logical action.
    pub fn action(mut self, name: &str, action_ty: &str) -> Self {
        self.reactor.actions.push(ActionDef {
            name: name.to_owned(),
            ty: ty(action_ty),
            ..ActionDef::default()
        });
        self
    }

    /// Add a physical action with an optional minimum delay.
    pub fn physical_action(mut self, name: &str, action_ty: &str, min_delay: Option<TimeValue>) -> Self {
        self.reactor.actions.push(ActionDef {
            name: name.to_owned(),
            ty: ty(action_ty),
            origin: ActionOrigin::Physical,
            min_delay,
        });
        self
    }

    /// Add an input port.
    pub fn input(mut self, name: &str, port_ty: &str) -> Self {
        self.reactor.inputs.push(PortDef {
            name: name.to_owned(),
            ty: ty(port_ty),
        });
        self
    }

    /// Add an output port.
    pub fn output(mut self, name: &str, port_ty: &str) -> Self {
        self.reactor.outputs.push(PortDef {
            name: name.to_owned(),
            ty: ty(port_ty),
        });
        self
    }

    /// Add a child instance with `(parameter, value)` overrides.
    pub fn instance(self, name: &str, class: &str, assignments: &[(&str, &str)]) -> Self {
        self.generic_instance(name, class, &[], assignments)
    }

    /// Add a child instance of a generic class, e.g. `Buffer<number>`.
    pub fn generic_instance(
        mut self,
        name: &str,
        class: &str,
        type_args: &[&str],
        assignments: &[(&str, &str)],
    ) -> Self {
        self.reactor.instances.push(InstanceDef {
            name: name.to_owned(),
            reactor_class: class.to_owned(),
            type_args: strings(type_args),
            assignments: assignments
                .iter()
                .map(|(parameter, value)| Assignment {
                    parameter: (*parameter).to_owned(),
                    value: (*value).to_owned(),
                })
                .collect(),
        });
        self
    }

    /// Connect `left` to `right` (port references such as `out` or `child.in`).
    pub fn connect(mut self, left: &[&str], right: &[&str]) -> Self {
        self.reactor.connections.push(ConnectionDef {
            left_ports: strings(left),
            right_ports: strings(right),
        });
        self
    }

    /// Add an unnamed reaction.
    pub fn reaction(mut self, triggers: &[&str], sources: &[&str], effects: &[&str], code: &str) -> Self {
        self.reactor.reactions.push(ReactionDef {
            name: None,
            triggers: strings(triggers),
            sources: strings(sources),
            effects: strings(effects),
            code: code.to_owned(),
        });
        self
    }

    /// Add a labelled reaction with a single trigger and an empty body.
    pub fn named_reaction(mut self, name: &str, trigger: &str) -> Self {
        self.reactor.reactions.push(ReactionDef {
            name: Some(name.to_owned()),
            triggers: vec![trigger.to_owned()],
            ..ReactionDef::default()
        });
        self
    }

    /// Add a verbatim preamble block.
    pub fn preamble(mut self, code: &str) -> Self {
        self.reactor.preambles.push(code.to_owned());
        self
    }

    /// Finish.
    pub fn build(self) -> ReactorDefinition {
        self.reactor
    }
}

/// Builder for [`Program`], tagged with the current IR version.
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    program: Program,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    /// Empty program.
    pub fn new() -> Self {
        Self {
            program: Program {
                ir_version: Some(IR_VERSION.to_owned()),
                ..Program::default()
            },
        }
    }

    /// Append a reactor class.
    pub fn reactor(mut self, reactor: ReactorDefinition) -> Self {
        self.program.reactors.push(reactor);
        self
    }

    /// Set the RTI location.
    pub fn rti(mut self, host: &str, port: u16) -> Self {
        self.program.federation = FederationConfig {
            host: host.to_owned(),
            port,
        };
        self
    }

    /// Declare a federate with its network actions and the reactions it does not own.
    pub fn federate(mut self, id: u32, actions: &[&str], excluded: &[usize]) -> Self {
        self.program.federates.push(FederateInstance {
            id,
            name: None,
            network_message_actions: strings(actions),
            excluded_reactions: excluded.iter().copied().collect::<BTreeSet<_>>(),
        });
        self
    }

    /// Bind the main instance.
    pub fn main(mut self, name: &str, class: &str) -> Self {
        self.program.main = Some(Instantiation {
            name: name.to_owned(),
            reactor_class: class.to_owned(),
            overridable: None,
        });
        self
    }

    /// Finish.
    pub fn build(self) -> Program {
        self.program
    }

    /// Finish as IR JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.program).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn json_parses_back_through_the_generator() {
        let builder = ProgramBuilder::new()
            .reactor(
                ReactorBuilder::new("Top")
                    .federated()
                    .param("n", "number", &["1"])
                    .build(),
            )
            .federate(0, &["net0"], &[1]);
        let program = lfts_gen::parse_program(&builder.to_json()).unwrap();
        assert!(program.reactors[0].is_federated);
        assert_eq!(program.federates[0].network_message_actions, ["net0"]);
        assert!(program.federates[0].excluded_reactions.contains(&1));
    }

    #[test]
    fn empty_type_means_no_annotation() {
        let reactor = ReactorBuilder::new("R").param("p", "", &["0"]).build();
        assert_eq!(reactor.parameters[0].ty, None);
        assert_eq!(reactor.parameters[0].target_type(), "Present");
    }
}
