// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generator settings persisted through a [`ConfigStore`](crate::ConfigStore).

use serde::{Deserialize, Serialize};

use crate::service::{ConfigError, ConfigService, ConfigStore};

/// Key under which [`GeneratorConfig`] is stored.
pub const GENERATOR_CONFIG_KEY: &str = "generator";

/// Widest indentation accepted from a config file.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Settings that shape generated output without changing its meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Emit reactor classes on the rayon pool. Output is identical either way.
    pub parallel: bool,
    /// Overrides the RTI host carried by the program IR.
    pub rti_host: Option<String>,
    /// Overrides the RTI port carried by the program IR (`0` still means default).
    pub rti_port: Option<u16>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            parallel: false,
            rti_host: None,
            rti_port: None,
        }
    }
}

impl GeneratorConfig {
    /// Load settings from `service`, defaulting when absent, and validate them.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        let config: Self = service.load_or_default(GENERATOR_CONFIG_KEY)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce unusable output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width == 0 || self.indent_width > MAX_INDENT_WIDTH {
            return Err(ConfigError::Invalid {
                key: GENERATOR_CONFIG_KEY.to_owned(),
                reason: format!(
                    "indent_width must be within 1..={MAX_INDENT_WIDTH}, got {}",
                    self.indent_width
                ),
            });
        }
        if matches!(self.rti_host.as_deref(), Some(h) if h.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: GENERATOR_CONFIG_KEY.to_owned(),
                reason: "rti_host must not be blank".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    use super::*;
    use crate::FsConfigStore;

    #[test]
    fn partial_file_fills_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{ "parallel": true }"#).unwrap();
        assert!(config.parallel);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.rti_port, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::at(dir.path()));
        assert_eq!(
            GeneratorConfig::load(&service).unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn zero_indent_is_rejected() {
        let config = GeneratorConfig {
            indent_width: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn blank_host_is_rejected() {
        let config = GeneratorConfig {
            rti_host: Some("  ".to_owned()),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn saved_settings_round_trip_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::at(dir.path()));
        let config = GeneratorConfig {
            indent_width: 2,
            parallel: true,
            rti_host: Some("rti.example.org".to_owned()),
            rti_port: Some(8080),
        };
        service.save(GENERATOR_CONFIG_KEY, &config).unwrap();
        assert_eq!(GeneratorConfig::load(&service).unwrap(), config);
    }
}
