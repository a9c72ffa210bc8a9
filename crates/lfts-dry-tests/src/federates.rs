// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `Federate` doubles.

use std::collections::BTreeSet;

use lfts_gen::ir::ReactorDefinition;
use lfts_gen::Federate;

/// A federate that owns exactly the listed reactions of every reactor.
///
/// Unlike the IR's exclusion sets, membership here ignores whether the
/// reactor is federated, which lets tests drive the filter directly.
#[derive(Debug, Clone, Default)]
pub struct OwnedReactions {
    id: u32,
    actions: Vec<String>,
    owned: BTreeSet<usize>,
}

impl OwnedReactions {
    /// Federate `id` owning the reactions at `owned`.
    pub fn new(id: u32, owned: impl IntoIterator<Item = usize>) -> Self {
        Self {
            id,
            actions: Vec::new(),
            owned: owned.into_iter().collect(),
        }
    }

    /// Set the inbound network message actions, in registration order.
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }
}

impl Federate for OwnedReactions {
    fn id(&self) -> u32 {
        self.id
    }

    fn network_message_actions(&self) -> &[String] {
        &self.actions
    }

    fn contains_reaction(&self, _reactor: &ReactorDefinition, reaction_index: usize) -> bool {
        self.owned.contains(&reaction_index)
    }
}
