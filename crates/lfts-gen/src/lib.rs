// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! TypeScript reactor class generator.
#![forbid(unsafe_code)]
//!
//! Turns a resolved reactor program (JSON IR) into TypeScript classes targeting
//! the reactor runtime: one class per reactor definition, then the program
//! epilogue that instantiates and starts the main reactor.
//!
//! # Pipeline
//!
//! - [`ir`] - serde model of the program IR
//! - [`role`] - Main / Federated / Plain role selection
//! - [`signature`] - constructor parameter lists and `super(...)` calls
//! - [`features`] - ordered feature stages (instances, timers, ports, ...)
//! - [`reactions`] - federate-aware reaction selection and rendering
//! - [`federation`] - RTI binding and network port action registration
//! - [`reactor`] - per-class assembly into a [`fragment::Fragment`] tree
//! - [`main_instance`] - the root instance and runtime start
//! - [`program`] - whole-program driver
//!
//! Recoverable input problems travel as [`diagnostics::Diagnostic`]s next to
//! the emitted value; only unusable input becomes a [`error::GenError`].
//!
//! ```
//! use lfts_gen::{emit_program, parse_program, EmitOptions};
//!
//! let program = parse_program(r#"{ "reactors": [ { "name": "Idle" } ] }"#).unwrap();
//! let out = emit_program(&program, &EmitOptions::default()).unwrap();
//! assert!(out.value.contains("export class Idle extends __Reactor {"));
//! assert!(out.diagnostics.is_empty());
//! ```

pub mod diagnostics;
pub mod error;
pub mod features;
pub mod federation;
pub mod fragment;
pub mod ir;
pub mod main_instance;
pub mod program;
pub mod reactions;
pub mod reactor;
pub mod role;
pub mod signature;

pub use diagnostics::{Diagnostic, DiagnosticKind, Emitted, Severity};
pub use error::GenError;
pub use federation::{Federate, RtiBinding, DEFAULT_RTI_PORT};
pub use fragment::{Fragment, TextBackend};
pub use ir::{Program, ReactorDefinition, IR_VERSION};
pub use program::{emit_program, parse_program, EmitOptions};
pub use reactor::{ReactorClass, ReactorClassEmitter};
pub use role::ReactorRole;
