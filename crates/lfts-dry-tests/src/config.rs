// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use lfts_config::{ConfigError, ConfigStore, GeneratorConfig, GENERATOR_CONFIG_KEY};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share state, so a test can hand one clone to a
/// [`ConfigService`](lfts_config::ConfigService) and inspect the other.
///
/// # Example
///
/// ```
/// use lfts_config::{ConfigService, GeneratorConfig};
/// use lfts_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// let config = GeneratorConfig::load(&service).unwrap();
/// assert_eq!(config, GeneratorConfig::default());
/// assert_eq!(store.load_count(), 1);
/// assert_eq!(store.save_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<InMemoryConfigStoreInner>>,
}

#[derive(Default)]
struct InMemoryConfigStoreInner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Create a new empty in-memory config store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `config` under [`GENERATOR_CONFIG_KEY`].
    pub fn with_generator_config(config: &GeneratorConfig) -> Self {
        Self::with_raw(
            GENERATOR_CONFIG_KEY,
            serde_json::to_vec(config).unwrap_or_default(),
        )
    }

    /// Create a store holding one raw blob, e.g. a hand-written (possibly invalid) config.
    pub fn with_raw(key: &str, data: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.lock().data.insert(key.to_owned(), data.into());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryConfigStoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configure the store to fail on load operations.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Configure the store to fail on save operations.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Number of `load_raw` attempts, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` attempts, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Raw blob stored under `key`, without counting a load.
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.load_count += 1;

        if inner.fail_on_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }

        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_count += 1;

        if inner.fail_on_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }

        inner.data.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use lfts_config::ConfigService;

    #[test]
    fn generator_config_round_trips_through_the_service() {
        let store = InMemoryConfigStore::new();
        let service = ConfigService::new(store.clone());
        let config = GeneratorConfig {
            indent_width: 2,
            rti_port: Some(9000),
            ..GeneratorConfig::default()
        };
        service.save(GENERATOR_CONFIG_KEY, &config).unwrap();
        assert_eq!(GeneratorConfig::load(&service).unwrap(), config);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn invalid_stored_settings_are_rejected() {
        let store = InMemoryConfigStore::with_raw(GENERATOR_CONFIG_KEY, r#"{"indent_width":0}"#);
        let err = GeneratorConfig::load(&ConfigService::new(store)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn load_failure_propagates() {
        let store = InMemoryConfigStore::with_generator_config(&GeneratorConfig::default());
        store.set_fail_on_load(true);
        let err = GeneratorConfig::load(&ConfigService::new(store.clone())).unwrap_err();
        assert!(matches!(err, ConfigError::Other(_)));
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn failed_save_stores_nothing() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(store.save_raw("k", b"v").is_err());
        assert!(!store.contains_key("k"));
        assert_eq!(store.save_count(), 1);
        store.set_fail_on_save(false);
        store.save_raw("k", b"v").unwrap();
        assert_eq!(store.peek("k").as_deref(), Some(&b"v"[..]));
    }

    #[test]
    fn clones_share_state() {
        let a = InMemoryConfigStore::new();
        let b = a.clone();
        a.save_raw("shared", b"1").unwrap();
        assert_eq!(b.load_raw("shared").unwrap(), b"1");
        assert_eq!(b.save_count(), 1);
        assert_eq!(a.load_count(), 1);
    }
}
