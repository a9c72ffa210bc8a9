// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hard failures: input the generator cannot emit anything sensible for.
//!
//! Everything recoverable is a [`Diagnostic`](crate::diagnostics::Diagnostic) instead.

use thiserror::Error;

/// Error type for program-level emission.
#[derive(Debug, Error)]
pub enum GenError {
    /// The payload could not be parsed as program IR.
    #[error("invalid program IR: {0}")]
    Json(#[from] serde_json::Error),
    /// The IR was produced for a schema this generator does not speak.
    #[error("Unsupported ir_version `{found}` (expected `{expected}`)")]
    UnsupportedIrVersion {
        /// Version tag found in the payload.
        found: String,
        /// Version tag this generator accepts.
        expected: &'static str,
    },
    /// A federated reactor was emitted without naming the federate to emit it for.
    #[error("reactor `{reactor}` is federated; select a federate (available ids: {available:?})")]
    FederateRequired {
        /// Federated reactor name.
        reactor: String,
        /// Federate ids declared by the program.
        available: Vec<u32>,
    },
    /// A federated reactor was handed to the class emitter without a federate.
    #[error("reactor `{reactor}` is federated but no federate was supplied")]
    MissingFederate {
        /// Federated reactor name.
        reactor: String,
    },
    /// The requested federate id is not declared by the program.
    #[error("unknown federate id {0}")]
    UnknownFederate(u32),
    /// The main instantiation names a class the program does not define.
    #[error("main instantiation `{instance}` refers to unknown reactor class `{class}`")]
    UnknownMainReactor {
        /// Instance name.
        instance: String,
        /// Missing class name.
        class: String,
    },
    /// No main binding was given and more than one reactor is flagged as the top level.
    #[error("several reactors are flagged main or federated: {0:?}")]
    AmbiguousMainReactor(Vec<String>),
}
