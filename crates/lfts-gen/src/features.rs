// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Per-feature sub-generators and the fixed order they run in.
//!
//! A reactor class is assembled from independent feature generators
//! (instances, timers, parameters, state, actions, ports, connections). The
//! order in which their output is composed is data, not control flow:
//! [`PROPERTY_STAGES`] for class-level declarations and
//! [`INSTANTIATION_STAGES`] for constructor statements. Later declarations may
//! refer to earlier ones (a port's type may name a type parameter, a
//! connection names child ports), never the reverse.
//!
//! [`TsFeatures`] is the stock set targeting the reactor-ts runtime.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Emitted};
use crate::fragment::Fragment;
use crate::ir::{
    ActionOrigin, InstanceDef, PortDef, ReactorDefinition, TimeUnit, TimeValue, DEFAULT_TARGET_TYPE,
};

/// One feature of a reactor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Contained reactor instances.
    Instances,
    /// Timers.
    Timers,
    /// Parameters.
    Parameters,
    /// State variables.
    State,
    /// Actions.
    Actions,
    /// Input then output ports.
    Ports,
    /// Connections (constructor statements only).
    Connections,
}

/// Composition order of class-level property declarations.
pub const PROPERTY_STAGES: [Stage; 6] = [
    Stage::Instances,
    Stage::Timers,
    Stage::Parameters,
    Stage::State,
    Stage::Actions,
    Stage::Ports,
];

/// Composition order of constructor instantiation statements.
pub const INSTANTIATION_STAGES: [Stage; 7] = [
    Stage::Instances,
    Stage::Timers,
    Stage::Parameters,
    Stage::State,
    Stage::Actions,
    Stage::Ports,
    Stage::Connections,
];

/// Renders one feature of a reactor.
pub trait FeatureGenerator: Sync {
    /// Class-level declarations. Most features declare nothing by default.
    fn property_declarations(&self, _reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(Vec::new())
    }

    /// Statements placed in the constructor after the superclass call.
    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>>;
}

/// Resolves the generator responsible for each stage.
pub trait FeatureSet: Sync {
    /// Generator for `stage`.
    fn generator(&self, stage: Stage) -> &dyn FeatureGenerator;
}

/// Runtime expression for an optional duration; absent is zero.
pub fn time_expr(value: Option<TimeValue>) -> String {
    let TimeValue { magnitude, unit } = value.unwrap_or(TimeValue::ZERO);
    let factory = match unit {
        TimeUnit::Nsec => "nsec",
        TimeUnit::Usec => "usec",
        TimeUnit::Msec => "msec",
        TimeUnit::Sec => "secs",
        TimeUnit::Min => "mins",
        TimeUnit::Hour => "hours",
        TimeUnit::Day => "days",
        TimeUnit::Week => "weeks",
    };
    format!("TimeValue.{factory}({magnitude})")
}

fn type_or_default(ty: Option<&str>) -> &str {
    ty.unwrap_or(DEFAULT_TARGET_TYPE)
}

fn value_expr(init: &[String]) -> String {
    match init {
        [] => "undefined".to_owned(),
        [single] => single.clone(),
        many => format!("[{}]", many.join(", ")),
    }
}

/// `port` or `child.port` as a member expression on `this`.
pub fn port_expr(reference: &str) -> String {
    format!("this.{reference}")
}

// ─── Stock generators ────────────────────────────────────────────────────────

/// Contained instances, with arguments in the child class's parameter order.
#[derive(Debug, Clone, Copy)]
pub struct InstanceGenerator<'p> {
    classes: &'p [ReactorDefinition],
}

impl InstanceGenerator<'_> {
    fn class_expr(instance: &InstanceDef) -> String {
        if instance.type_args.is_empty() {
            instance.reactor_class.clone()
        } else {
            format!(
                "{}<{}>",
                instance.reactor_class,
                instance.type_args.join(", ")
            )
        }
    }

    fn arguments(&self, instance: &InstanceDef) -> Vec<String> {
        let mut args = vec!["this".to_owned()];
        match self
            .classes
            .iter()
            .find(|c| c.name == instance.reactor_class)
        {
            Some(class) => args.extend(class.parameters.iter().map(|p| {
                instance
                    .assignments
                    .iter()
                    .find(|a| a.parameter == p.name)
                    .map_or_else(|| "undefined".to_owned(), |a| a.value.clone())
            })),
            // Class defined outside this program: trust the assignment order.
            None => args.extend(instance.assignments.iter().map(|a| a.value.clone())),
        }
        args
    }
}

impl FeatureGenerator for InstanceGenerator<'_> {
    fn property_declarations(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .instances
                .iter()
                .map(|i| Fragment::property(&i.name, Self::class_expr(i)))
                .collect(),
        )
    }

    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .instances
                .iter()
                .map(|i| {
                    Fragment::raw(format!(
                        "this.{} = new {}({});",
                        i.name,
                        Self::class_expr(i),
                        self.arguments(i).join(", ")
                    ))
                })
                .collect(),
        )
    }
}

/// Timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerGenerator;

impl FeatureGenerator for TimerGenerator {
    fn property_declarations(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .timers
                .iter()
                .map(|t| Fragment::property(&t.name, "__Timer"))
                .collect(),
        )
    }

    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .timers
                .iter()
                .map(|t| {
                    Fragment::raw(format!(
                        "this.{} = new __Timer(this, {}, {});",
                        t.name,
                        time_expr(t.offset),
                        time_expr(t.period)
                    ))
                })
                .collect(),
        )
    }
}

/// Parameters, wrapped so reactions can read them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterGenerator;

impl FeatureGenerator for ParameterGenerator {
    fn property_declarations(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .parameters
                .iter()
                .map(|p| Fragment::property(&p.name, format!("__Parameter<{}>", p.target_type())))
                .collect(),
        )
    }

    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .parameters
                .iter()
                .map(|p| Fragment::raw(format!("this.{0} = new __Parameter({0});", p.name)))
                .collect(),
        )
    }
}

/// State variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateGenerator;

impl FeatureGenerator for StateGenerator {
    fn property_declarations(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .state_vars
                .iter()
                .map(|s| {
                    Fragment::property(
                        &s.name,
                        format!("__State<{}>", type_or_default(s.ty.as_deref())),
                    )
                })
                .collect(),
        )
    }

    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .state_vars
                .iter()
                .map(|s| {
                    Fragment::raw(format!(
                        "this.{} = new __State({});",
                        s.name,
                        value_expr(&s.init)
                    ))
                })
                .collect(),
        )
    }
}

/// Actions, including the federate's network message actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionGenerator;

impl FeatureGenerator for ActionGenerator {
    fn property_declarations(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .actions
                .iter()
                .map(|a| {
                    Fragment::property(
                        &a.name,
                        format!("__Action<{}>", type_or_default(a.ty.as_deref())),
                    )
                })
                .collect(),
        )
    }

    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            reactor
                .actions
                .iter()
                .map(|a| {
                    let origin = match a.origin {
                        ActionOrigin::Logical => "__Origin.logical",
                        ActionOrigin::Physical => "__Origin.physical",
                    };
                    let mut args = vec!["this".to_owned(), origin.to_owned()];
                    if a.min_delay.is_some() {
                        args.push(time_expr(a.min_delay));
                    }
                    Fragment::raw(format!(
                        "this.{} = new __Action<{}>({});",
                        a.name,
                        type_or_default(a.ty.as_deref()),
                        args.join(", ")
                    ))
                })
                .collect(),
        )
    }
}

/// Input ports, then output ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortGenerator;

impl PortGenerator {
    fn all(reactor: &ReactorDefinition) -> impl Iterator<Item = (&PortDef, &'static str)> {
        reactor
            .inputs
            .iter()
            .map(|p| (p, "__InPort"))
            .chain(reactor.outputs.iter().map(|p| (p, "__OutPort")))
    }
}

impl FeatureGenerator for PortGenerator {
    fn property_declarations(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            Self::all(reactor)
                .map(|(p, class)| {
                    Fragment::property(
                        &p.name,
                        format!("{class}<{}>", type_or_default(p.ty.as_deref())),
                    )
                })
                .collect(),
        )
    }

    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        Emitted::clean(
            Self::all(reactor)
                .map(|(p, class)| {
                    Fragment::raw(format!(
                        "this.{} = new {class}<{}>(this);",
                        p.name,
                        type_or_default(p.ty.as_deref())
                    ))
                })
                .collect(),
        )
    }
}

/// Connections, paired left-to-right by position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionGenerator;

impl FeatureGenerator for ConnectionGenerator {
    fn instantiation_statements(&self, reactor: &ReactorDefinition) -> Emitted<Vec<Fragment>> {
        let mut diagnostics = Vec::new();
        let mut statements = Vec::new();
        for (index, connection) in reactor.connections.iter().enumerate() {
            let (left, right) = (&connection.left_ports, &connection.right_ports);
            if left.len() != right.len() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ConnectionArity,
                    format!("{}.connections[{index}]", reactor.name),
                    format!(
                        "connection joins {} port(s) to {}; unmatched ports are left unconnected",
                        left.len(),
                        right.len()
                    ),
                ));
            }
            statements.extend(
                left.iter()
                    .zip(right)
                    .map(|(l, r)| Fragment::call("this._connect", [port_expr(l), port_expr(r)])),
            );
        }
        Emitted::new(statements, diagnostics)
    }
}

/// Stock feature set for the reactor-ts runtime.
#[derive(Debug, Clone, Copy)]
pub struct TsFeatures<'p> {
    instances: InstanceGenerator<'p>,
    timers: TimerGenerator,
    parameters: ParameterGenerator,
    state: StateGenerator,
    actions: ActionGenerator,
    ports: PortGenerator,
    connections: ConnectionGenerator,
}

impl<'p> TsFeatures<'p> {
    /// Feature set resolving child classes against `classes`.
    pub fn new(classes: &'p [ReactorDefinition]) -> Self {
        Self {
            instances: InstanceGenerator { classes },
            timers: TimerGenerator,
            parameters: ParameterGenerator,
            state: StateGenerator,
            actions: ActionGenerator,
            ports: PortGenerator,
            connections: ConnectionGenerator,
        }
    }
}

impl FeatureSet for TsFeatures<'_> {
    fn generator(&self, stage: Stage) -> &dyn FeatureGenerator {
        match stage {
            Stage::Instances => &self.instances,
            Stage::Timers => &self.timers,
            Stage::Parameters => &self.parameters,
            Stage::State => &self.state,
            Stage::Actions => &self.actions,
            Stage::Ports => &self.ports,
            Stage::Connections => &self.connections,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    use super::*;
    use crate::fragment::TextBackend;
    use crate::ir::{ActionDef, Assignment, ConnectionDef, ParameterDef, StateVarDef, TimerDef};

    fn text(fragments: &[Fragment]) -> String {
        TextBackend::default().render(fragments)
    }

    #[test]
    fn instantiation_stages_extend_property_stages_with_connections() {
        assert_eq!(INSTANTIATION_STAGES[..6], PROPERTY_STAGES);
        assert_eq!(INSTANTIATION_STAGES[6], Stage::Connections);
    }

    #[test]
    fn time_expressions_use_runtime_factories() {
        assert_eq!(time_expr(None), "TimeValue.secs(0)");
        assert_eq!(
            time_expr(Some(TimeValue {
                magnitude: 100,
                unit: TimeUnit::Msec
            })),
            "TimeValue.msec(100)"
        );
    }

    #[test]
    fn instances_follow_child_parameter_order() {
        let child = ReactorDefinition {
            name: "Scale".into(),
            parameters: vec![
                ParameterDef {
                    name: "factor".into(),
                    ty: Some("number".into()),
                    init: vec!["2".into()],
                },
                ParameterDef {
                    name: "offset".into(),
                    ty: Some("number".into()),
                    init: vec!["0".into()],
                },
            ],
            ..ReactorDefinition::default()
        };
        let parent = ReactorDefinition {
            name: "Top".into(),
            instances: vec![InstanceDef {
                name: "s".into(),
                reactor_class: "Scale".into(),
                type_args: vec![],
                assignments: vec![Assignment {
                    parameter: "offset".into(),
                    value: "7".into(),
                }],
            }],
            ..ReactorDefinition::default()
        };
        let classes = [child, parent.clone()];
        let features = TsFeatures::new(&classes);
        let gen = features.generator(Stage::Instances);
        assert_eq!(
            text(&gen.property_declarations(&parent).value),
            "s: Scale;\n"
        );
        assert_eq!(
            text(&gen.instantiation_statements(&parent).value),
            "this.s = new Scale(this, undefined, 7);\n"
        );
    }

    #[test]
    fn timers_state_and_actions_render() {
        let reactor = ReactorDefinition {
            name: "R".into(),
            timers: vec![TimerDef {
                name: "t".into(),
                offset: None,
                period: Some(TimeValue {
                    magnitude: 1,
                    unit: TimeUnit::Sec,
                }),
            }],
            state_vars: vec![StateVarDef {
                name: "xs".into(),
                ty: Some("number[]".into()),
                init: vec!["1".into(), "2".into()],
            }],
            actions: vec![ActionDef {
                name: "a".into(),
                ty: Some("string".into()),
                origin: ActionOrigin::Physical,
                min_delay: None,
            }],
            ..ReactorDefinition::default()
        };
        let features = TsFeatures::new(&[]);
        let body = |stage| text(&features.generator(stage).instantiation_statements(&reactor).value);
        assert_eq!(
            body(Stage::Timers),
            "this.t = new __Timer(this, TimeValue.secs(0), TimeValue.secs(1));\n"
        );
        assert_eq!(body(Stage::State), "this.xs = new __State([1, 2]);\n");
        assert_eq!(
            body(Stage::Actions),
            "this.a = new __Action<string>(this, __Origin.physical);\n"
        );
    }

    #[test]
    fn ports_declare_inputs_before_outputs() {
        let reactor = ReactorDefinition {
            name: "R".into(),
            outputs: vec![PortDef {
                name: "out".into(),
                ty: Some("number".into()),
            }],
            inputs: vec![PortDef {
                name: "in".into(),
                ty: None,
            }],
            ..ReactorDefinition::default()
        };
        let features = TsFeatures::new(&[]);
        assert_eq!(
            text(&features.generator(Stage::Ports).property_declarations(&reactor).value),
            "in: __InPort<Present>;\nout: __OutPort<number>;\n"
        );
    }

    #[test]
    fn connections_pair_ports_and_report_arity_mismatch() {
        let reactor = ReactorDefinition {
            name: "Top".into(),
            connections: vec![ConnectionDef {
                left_ports: vec!["a.out".into(), "b.out".into()],
                right_ports: vec!["c.in".into()],
            }],
            ..ReactorDefinition::default()
        };
        let features = TsFeatures::new(&[]);
        let gen = features.generator(Stage::Connections);
        assert!(gen.property_declarations(&reactor).value.is_empty());
        let out = gen.instantiation_statements(&reactor);
        assert_eq!(text(&out.value), "this._connect(this.a.out, this.c.in);\n");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::ConnectionArity);
        assert_eq!(out.diagnostics[0].node, "Top.connections[0]");
    }
}
