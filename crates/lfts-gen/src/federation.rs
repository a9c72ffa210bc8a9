// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Federate context: RTI endpoint resolution, reaction membership, and
//! network-action registration.
//!
//! # Wire contract
//!
//! Inbound network message actions are registered with the runtime under
//! dense ids `0..N-1`, assigned by position in the federate's action
//! sequence. The RTI and the peer federates address those actions by the
//! same positions, so reordering the sequence silently reroutes messages.
//! Treat any change to that order as a breaking change of the federation,
//! never as a refactor.

use crate::fragment::Fragment;
use crate::ir::{FederateInstance, FederationConfig, ReactorDefinition};

/// Port used when the program configures port `0`.
pub const DEFAULT_RTI_PORT: u16 = 15045;

/// Resolved RTI endpoint passed to the federated app's superclass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtiBinding {
    /// Host, verbatim from config.
    pub host: String,
    /// Port, never `0`.
    pub port: u16,
}

/// Resolve the RTI endpoint. Port `0` means [`DEFAULT_RTI_PORT`]; the host is not validated.
pub fn resolve_binding(config: &FederationConfig) -> RtiBinding {
    let port = if config.port == 0 {
        DEFAULT_RTI_PORT
    } else {
        config.port
    };
    RtiBinding {
        host: config.host.clone(),
        port,
    }
}

/// The federate a federated reactor class is emitted for.
pub trait Federate: Sync {
    /// Federation-wide id.
    fn id(&self) -> u32;
    /// Inbound network message actions, in registration order.
    fn network_message_actions(&self) -> &[String];
    /// Whether reaction `reaction_index` of `reactor` runs in this federate.
    fn contains_reaction(&self, reactor: &ReactorDefinition, reaction_index: usize) -> bool;
}

impl Federate for FederateInstance {
    fn id(&self) -> u32 {
        self.id
    }

    fn network_message_actions(&self) -> &[String] {
        &self.network_message_actions
    }

    fn contains_reaction(&self, reactor: &ReactorDefinition, reaction_index: usize) -> bool {
        // Only the federated top level is split across federates.
        if !reactor.is_federated {
            return true;
        }
        !self.excluded_reactions.contains(&reaction_index)
    }
}

/// `this.registerFederatePortAction(id, this.action);`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortActionRegistration {
    /// Positional id shared with the RTI and peers.
    pub id: usize,
    /// Action property name.
    pub action: String,
}

impl PortActionRegistration {
    /// The registration as a call statement.
    pub fn to_fragment(&self) -> Fragment {
        Fragment::call(
            "this.registerFederatePortAction",
            [self.id.to_string(), format!("this.{}", self.action)],
        )
    }
}

/// One registration per action, ids assigned by position.
pub fn port_action_registrations(actions: &[String]) -> Vec<PortActionRegistration> {
    actions
        .iter()
        .enumerate()
        .map(|(id, action)| PortActionRegistration {
            id,
            action: action.clone(),
        })
        .collect()
}
