// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reactor program IR consumed by lfts-gen.
//!
//! These types mirror the JSON IR produced by the front end after parsing and
//! validation (`lf-ts-ir/v1`). They are read-only inputs to emission; nothing
//! in this crate mutates them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// IR schema version this generator understands.
pub const IR_VERSION: &str = "lf-ts-ir/v1";

/// Target type used when the IR omits a type annotation.
pub const DEFAULT_TARGET_TYPE: &str = "Present";

/// Default RTI host when the program does not name one.
pub const DEFAULT_RTI_HOST: &str = "localhost";

/// Root payload: every reactor of one program plus its deployment data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// IR schema version tag (e.g. `"lf-ts-ir/v1"`).
    #[serde(default, rename = "ir_version")]
    pub ir_version: Option<String>,

    /// RTI location for federated programs.
    #[serde(default)]
    pub federation: FederationConfig,

    /// Reactor classes in declaration order.
    #[serde(default)]
    pub reactors: Vec<ReactorDefinition>,

    /// Federates of a federated program (empty otherwise).
    #[serde(default)]
    pub federates: Vec<FederateInstance>,

    /// Binding of the single main reactor, if the program has one.
    #[serde(default)]
    pub main: Option<Instantiation>,
}

impl Program {
    /// Look up a reactor class by name.
    pub fn reactor(&self, name: &str) -> Option<&ReactorDefinition> {
        self.reactors.iter().find(|r| r.name == name)
    }

    /// Look up a federate by id.
    pub fn federate(&self, id: u32) -> Option<&FederateInstance> {
        self.federates.iter().find(|f| f.id == id)
    }

    /// Reactors flagged as the program's top level (main or federated).
    pub fn top_level_reactors(&self) -> impl Iterator<Item = &ReactorDefinition> {
        self.reactors.iter().filter(|r| r.is_main || r.is_federated)
    }
}

// ─── Reactor Definitions ─────────────────────────────────────────────────────

/// One reactor class as produced by the front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactorDefinition {
    /// Class name.
    pub name: String,
    /// Generic type parameter names, in declaration order.
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Constructor parameters, in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    /// State variables.
    #[serde(default)]
    pub state_vars: Vec<StateVarDef>,
    /// Timers.
    #[serde(default)]
    pub timers: Vec<TimerDef>,
    /// Logical and physical actions (network message actions included).
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    /// Input ports.
    #[serde(default)]
    pub inputs: Vec<PortDef>,
    /// Output ports.
    #[serde(default)]
    pub outputs: Vec<PortDef>,
    /// Contained reactor instances.
    #[serde(default)]
    pub instances: Vec<InstanceDef>,
    /// Connections between ports of this reactor and its children.
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    /// Reactions; declaration order is execution priority.
    #[serde(default)]
    pub reactions: Vec<ReactionDef>,
    /// Target-language preamble blocks, emitted verbatim.
    #[serde(default)]
    pub preambles: Vec<String>,
    /// Marked as the program's main reactor.
    #[serde(default)]
    pub is_main: bool,
    /// Marked as a federated top-level reactor.
    #[serde(default)]
    pub is_federated: bool,
}

impl ReactorDefinition {
    /// Whether `name` refers to an action declared on this reactor.
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.iter().any(|a| a.name == name)
    }
}

/// Constructor parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
    /// Parameter name.
    pub name: String,
    /// Target type annotation, if any.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Initializer expressions; more than one means an array value.
    #[serde(default)]
    pub init: Vec<String>,
}

impl ParameterDef {
    /// Type annotation, or [`DEFAULT_TARGET_TYPE`].
    pub fn target_type(&self) -> &str {
        self.ty.as_deref().unwrap_or(DEFAULT_TARGET_TYPE)
    }
}

/// State variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateVarDef {
    /// Variable name.
    pub name: String,
    /// Target type annotation, if any.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Initializer expressions.
    #[serde(default)]
    pub init: Vec<String>,
}

/// Timer with optional offset and period (absent means zero).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerDef {
    /// Timer name.
    pub name: String,
    /// Delay before the first firing.
    #[serde(default)]
    pub offset: Option<TimeValue>,
    /// Interval between firings; absent fires once.
    #[serde(default)]
    pub period: Option<TimeValue>,
}

/// Action declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDef {
    /// Action name.
    pub name: String,
    /// Payload type, if any.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    /// Logical or physical.
    #[serde(default)]
    pub origin: ActionOrigin,
    /// Minimum delay between scheduling and occurrence.
    #[serde(default)]
    pub min_delay: Option<TimeValue>,
}

/// Time base an action is scheduled against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOrigin {
    /// Scheduled relative to logical time.
    #[default]
    Logical,
    /// Scheduled relative to physical time.
    Physical,
}

/// Input or output port.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortDef {
    /// Port name.
    pub name: String,
    /// Payload type, if any.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
}

/// Contained reactor instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDef {
    /// Instance (property) name.
    pub name: String,
    /// Class being instantiated.
    pub reactor_class: String,
    /// Actual type arguments for a generic class.
    #[serde(default)]
    pub type_args: Vec<String>,
    /// Parameter overrides for this instance.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// `parameter = value` override on an instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assignment {
    /// Parameter name on the instantiated class.
    pub parameter: String,
    /// Target expression.
    pub value: String,
}

/// Connection between equally sized lists of port references (`port` or `child.port`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDef {
    /// Upstream ports.
    #[serde(default)]
    pub left_ports: Vec<String>,
    /// Downstream ports.
    #[serde(default)]
    pub right_ports: Vec<String>,
}

/// Reaction declaration with its target-language body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionDef {
    /// Optional label.
    #[serde(default)]
    pub name: Option<String>,
    /// Trigger references (`startup`, `shutdown`, a timer, action or port).
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Read-only, non-triggering dependencies.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Ports and actions the reaction may write or schedule.
    #[serde(default)]
    pub effects: Vec<String>,
    /// Target-language body.
    #[serde(default)]
    pub code: String,
}

// ─── Time ────────────────────────────────────────────────────────────────────

/// Duration literal as written in the source program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    /// Count of `unit`.
    pub magnitude: u64,
    /// Unit of `magnitude`.
    pub unit: TimeUnit,
}

impl TimeValue {
    /// Zero duration.
    pub const ZERO: Self = Self {
        magnitude: 0,
        unit: TimeUnit::Sec,
    };
}

/// Time units accepted by the runtime's `TimeValue` factory methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Nanoseconds.
    #[serde(alias = "ns", alias = "nsecs")]
    Nsec,
    /// Microseconds.
    #[serde(alias = "us", alias = "usecs")]
    Usec,
    /// Milliseconds.
    #[serde(alias = "ms", alias = "msecs")]
    Msec,
    /// Seconds.
    #[serde(alias = "s", alias = "secs", alias = "second", alias = "seconds")]
    Sec,
    /// Minutes.
    #[serde(alias = "mins", alias = "minute", alias = "minutes")]
    Min,
    /// Hours.
    #[serde(alias = "h", alias = "hours")]
    Hour,
    /// Days.
    #[serde(alias = "d", alias = "days")]
    Day,
    /// Weeks.
    #[serde(alias = "weeks")]
    Week,
}

// ─── Federation ──────────────────────────────────────────────────────────────

/// Where federates reach the RTI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FederationConfig {
    /// RTI host, used verbatim.
    pub host: String,
    /// RTI port; `0` selects [`crate::federation::DEFAULT_RTI_PORT`].
    pub port: u16,
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RTI_HOST.to_owned(),
            port: 0,
        }
    }
}

/// One federate of a federated program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederateInstance {
    /// Federation-wide id, stable for the lifetime of the federation.
    pub id: u32,
    /// Federate name (usually the top-level instance name).
    #[serde(default)]
    pub name: Option<String>,
    /// Inbound network message actions, in registration order.
    #[serde(default)]
    pub network_message_actions: Vec<String>,
    /// Indices of reactions of the federated reactor that belong to other federates.
    #[serde(default)]
    pub excluded_reactions: BTreeSet<usize>,
}

// ─── Main Instantiation ──────────────────────────────────────────────────────

/// Binding of the program's single main reactor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instantiation {
    /// Instance name.
    pub name: String,
    /// Class of the main reactor.
    pub reactor_class: String,
    /// Parameters settable from the command line; derived from types when absent.
    #[serde(default)]
    pub overridable: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    use super::*;

    #[test]
    fn minimal_program_uses_defaults() {
        let program: Program = serde_json::from_str(
            r#"{ "ir_version": "lf-ts-ir/v1", "reactors": [ { "name": "Counter" } ] }"#,
        )
        .unwrap();
        assert_eq!(program.ir_version.as_deref(), Some(IR_VERSION));
        assert_eq!(program.federation.host, "localhost");
        assert_eq!(program.federation.port, 0);
        let counter = program.reactor("Counter").unwrap();
        assert!(!counter.is_main && !counter.is_federated);
        assert!(counter.parameters.is_empty());
    }

    #[test]
    fn camel_case_fields_deserialize() {
        let reactor: ReactorDefinition = serde_json::from_str(
            r#"{
                "name": "Fed",
                "isFederated": true,
                "typeParams": ["T"],
                "stateVars": [ { "name": "n", "type": "number", "init": ["0"] } ],
                "actions": [ { "name": "a", "origin": "physical", "minDelay": { "magnitude": 5, "unit": "ms" } } ]
            }"#,
        )
        .unwrap();
        assert!(reactor.is_federated);
        assert_eq!(reactor.type_params, vec!["T"]);
        assert_eq!(reactor.state_vars[0].init, vec!["0"]);
        assert_eq!(reactor.actions[0].origin, ActionOrigin::Physical);
        assert_eq!(
            reactor.actions[0].min_delay,
            Some(TimeValue {
                magnitude: 5,
                unit: TimeUnit::Msec
            })
        );
    }

    #[test]
    fn untyped_parameter_falls_back_to_present() {
        let p = ParameterDef {
            name: "x".into(),
            ..ParameterDef::default()
        };
        assert_eq!(p.target_type(), DEFAULT_TARGET_TYPE);
    }

    #[test]
    fn federate_lookup_by_id() {
        let program: Program = serde_json::from_str(
            r#"{ "federates": [ { "id": 0 }, { "id": 2, "networkMessageActions": ["X", "Y"], "excludedReactions": [1] } ] }"#,
        )
        .unwrap();
        let fed = program.federate(2).unwrap();
        assert_eq!(fed.network_message_actions, vec!["X", "Y"]);
        assert!(fed.excluded_reactions.contains(&1));
        assert!(program.federate(7).is_none());
    }
}
