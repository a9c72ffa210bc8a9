// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reaction selection and rendering.
//!
//! Reaction order is execution priority. Selection is a stable filter and
//! rendering never reorders, so the emitted `addReaction` calls appear in
//! declaration order minus whatever another federate owns.

use crate::features::port_expr;
use crate::federation::Federate;
use crate::fragment::Fragment;
use crate::ir::{ReactionDef, ReactorDefinition};

/// Built-in triggers provided by the runtime rather than declared on the reactor.
const BUILTIN_TRIGGERS: [&str; 2] = ["startup", "shutdown"];

/// Keep the reactions `keep` accepts, with their declaration indices, in order.
pub fn select_reactions<'r>(
    reactions: &'r [ReactionDef],
    mut keep: impl FnMut(usize, &ReactionDef) -> bool,
) -> Vec<(usize, &'r ReactionDef)> {
    reactions
        .iter()
        .enumerate()
        .filter(|(index, reaction)| keep(*index, reaction))
        .collect()
}

/// Reactions of `reactor` to emit: membership-filtered for a federate, otherwise all.
pub fn reactions_for<'r>(
    reactor: &'r ReactorDefinition,
    federate: Option<&dyn Federate>,
) -> Vec<(usize, &'r ReactionDef)> {
    match federate {
        Some(federate) => select_reactions(&reactor.reactions, |index, _| {
            federate.contains_reaction(reactor, index)
        }),
        None => select_reactions(&reactor.reactions, |_, _| true),
    }
}

/// Renders one reaction into constructor statements.
pub trait ReactionRenderer: Sync {
    /// Render reaction `index` of `reactor`.
    fn render(&self, reactor: &ReactorDefinition, index: usize, reaction: &ReactionDef) -> Fragment;
}

/// `this.addReaction(triggers, args, function (this, ...) { body });`
#[derive(Debug, Clone, Copy, Default)]
pub struct TsReactionRenderer;

impl TsReactionRenderer {
    fn trigger_expr(trigger: &str) -> String {
        if BUILTIN_TRIGGERS.contains(&trigger) {
            format!("this.{trigger}")
        } else {
            port_expr(trigger)
        }
    }

    /// (argument expression, parameter name) pairs; effects shadow reads of the same name.
    fn arguments(reactor: &ReactorDefinition, reaction: &ReactionDef) -> Vec<(String, String)> {
        let mut seen: Vec<&str> = Vec::new();
        let mut args = Vec::new();
        let reads = reaction
            .triggers
            .iter()
            .chain(&reaction.sources)
            .filter(|r| !BUILTIN_TRIGGERS.contains(&r.as_str()));
        for read in reads {
            if seen.contains(&read.as_str()) || reaction.effects.contains(read) {
                continue;
            }
            seen.push(read);
            args.push((port_expr(read), param_name(read)));
        }
        for effect in &reaction.effects {
            if seen.contains(&effect.as_str()) {
                continue;
            }
            seen.push(effect);
            let expr = if reactor.has_action(effect) {
                format!("this.schedulable({})", port_expr(effect))
            } else {
                format!("this.writable({})", port_expr(effect))
            };
            args.push((expr, param_name(effect)));
        }
        args
    }
}

fn param_name(reference: &str) -> String {
    reference.replace('.', "_")
}

impl ReactionRenderer for TsReactionRenderer {
    fn render(&self, reactor: &ReactorDefinition, index: usize, reaction: &ReactionDef) -> Fragment {
        let label = match &reaction.name {
            Some(name) => format!("// Reaction {index} ({name})"),
            None => format!("// Reaction {index}"),
        };
        let triggers: Vec<_> = reaction
            .triggers
            .iter()
            .map(|t| Self::trigger_expr(t))
            .collect();
        let (exprs, names): (Vec<_>, Vec<_>) = Self::arguments(reactor, reaction).into_iter().unzip();
        let params = std::iter::once("this".to_owned())
            .chain(names)
            .collect::<Vec<_>>()
            .join(", ");

        let body = if reaction.code.trim().is_empty() {
            Vec::new()
        } else {
            vec![Fragment::raw(reaction.code.trim_matches('\n'))]
        };
        Fragment::Scope {
            head: vec![Fragment::raw(label), Fragment::raw("this.addReaction(")],
            body: vec![
                Fragment::raw(format!("new __Triggers({}),", triggers.join(", "))),
                Fragment::raw(format!("new __Args({}),", exprs.join(", "))),
                Fragment::scope(format!("function ({params}) {{"), body, "}"),
            ],
            tail: ");".to_owned(),
        }
    }
}
