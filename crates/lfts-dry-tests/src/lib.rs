// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for lfts crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`federates`] - `Federate` doubles with explicit reaction ownership
//! - [`programs`] - Reactor and program IR builders

pub mod config;
pub mod federates;
pub mod programs;

pub use config::InMemoryConfigStore;
pub use federates::OwnedReactions;
pub use programs::{ms, ProgramBuilder, ReactorBuilder};
