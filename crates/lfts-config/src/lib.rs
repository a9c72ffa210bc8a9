// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings and config storage for the lfts reactor class generator.
//! Keeps the CLI thin: the binary only resolves a store and applies flag overrides.

pub mod fs;
pub mod service;
pub mod settings;

pub use fs::FsConfigStore;
pub use service::{ConfigError, ConfigService, ConfigStore};
pub use settings::{GeneratorConfig, GENERATOR_CONFIG_KEY};
