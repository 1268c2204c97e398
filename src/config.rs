use std::{fs, path::Path};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    address::Radix,
    cache::{CacheEngine, Organization, Policy},
    error::ConfigError,
};

pub const DEFAULT_CAPACITY: usize = 4;
pub const DEFAULT_SET_COUNT: usize = 2;

/// Sizes are read signed so that non-positive values can be replaced by the
/// defaults instead of failing the whole config.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub name: String,
    pub organization: Organization,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    #[serde(default = "default_set_count")]
    pub set_count: i64,
}

fn default_capacity() -> i64 {
    DEFAULT_CAPACITY as i64
}

fn default_set_count() -> i64 {
    DEFAULT_SET_COUNT as i64
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub radix: Radix,
    pub caches: Vec<CacheConfig>,
}

/// An engine built from one config entry, with the name it is reported under.
#[derive(Debug)]
pub struct NamedEngine {
    pub name: String,
    pub engine: CacheEngine,
}

impl CacheConfig {
    /// Replaces non-positive sizes with the defaults, warning about each.
    pub fn clamped(mut self) -> Self {
        if self.capacity <= 0 {
            let err = ConfigError::InvalidConfiguration {
                name: self.name.clone(),
                field: "capacity",
            };
            warn!(value = self.capacity, "{err}, using {DEFAULT_CAPACITY}");
            self.capacity = default_capacity();
        }
        if self.organization == Organization::SetAssociative && self.set_count <= 0 {
            let err = ConfigError::InvalidConfiguration {
                name: self.name.clone(),
                field: "set_count",
            };
            warn!(value = self.set_count, "{err}, using {DEFAULT_SET_COUNT}");
            self.set_count = default_set_count();
        }
        self
    }

    pub fn to_engine(self) -> NamedEngine {
        let cc = self.clamped();
        let capacity = usize::try_from(cc.capacity).unwrap_or(DEFAULT_CAPACITY);
        // Only set-associative caches read the set count.
        let set_count = usize::try_from(cc.set_count).unwrap_or(1);
        if cc.organization == Organization::SetAssociative && cc.capacity < cc.set_count {
            warn!(
                name = %cc.name,
                "{} sets cannot hold {} blocks, every access will miss",
                cc.set_count,
                cc.capacity
            );
        }
        debug!(
            name = %cc.name,
            organization = %cc.organization,
            policy = %cc.policy,
            capacity = cc.capacity,
            set_count = cc.set_count,
            "building cache"
        );
        NamedEngine {
            engine: CacheEngine::new(cc.organization, cc.policy, capacity, set_count),
            name: cc.name,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        if config.caches.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Config, ConfigError> {
        Config::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_engines(self) -> Vec<NamedEngine> {
        self.caches
            .into_iter()
            .map(CacheConfig::to_engine)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in() {
        let config = Config::from_json(
            r#"{ "caches": [ { "name": "a", "organization": "set_associative" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.radix, Radix::Decimal);
        let cc = &config.caches[0];
        assert_eq!(cc.policy, Policy::Fifo);
        assert_eq!(cc.capacity, 4);
        assert_eq!(cc.set_count, 2);
    }

    #[test]
    fn aliases_parse() {
        let config = Config::from_json(
            r#"{
                "radix": "hex",
                "caches": [
                    { "name": "f", "organization": "full", "policy": "lru", "capacity": 8 },
                    { "name": "d", "organization": "direct" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.radix, Radix::Hex);
        let engines = config.to_engines();
        assert_eq!(engines.len(), 2);
        assert_eq!(engines[0].name, "f");
        assert_eq!(engines[0].engine.organization(), Organization::FullyAssociative);
        assert_eq!(engines[0].engine.policy(), Policy::Lru);
        assert_eq!(engines[0].engine.capacity(), 8);
        assert_eq!(engines[1].engine.organization(), Organization::DirectMapped);
    }

    #[test]
    fn zero_sizes_fall_back_to_defaults() {
        let config = Config::from_json(
            r#"{ "caches": [
                { "name": "s", "organization": "set", "capacity": 0, "set_count": 0 }
            ] }"#,
        )
        .unwrap();
        let engines = config.to_engines();
        assert_eq!(engines[0].engine.capacity(), DEFAULT_CAPACITY);
        assert_eq!(engines[0].engine.set_count(), DEFAULT_SET_COUNT);
    }

    #[test]
    fn negative_sizes_fall_back_to_defaults() {
        let config = Config::from_json(
            r#"{ "caches": [
                { "name": "s", "organization": "set", "capacity": -1, "set_count": -3 },
                { "name": "d", "organization": "direct", "capacity": -8, "set_count": -1 }
            ] }"#,
        )
        .unwrap();
        let engines = config.to_engines();
        assert_eq!(engines[0].engine.capacity(), DEFAULT_CAPACITY);
        assert_eq!(engines[0].engine.set_count(), DEFAULT_SET_COUNT);
        assert_eq!(engines[0].engine.blocks_per_set(), 2);
        assert_eq!(engines[1].engine.capacity(), DEFAULT_CAPACITY);
        assert_eq!(engines[1].engine.set_count(), 1);
    }

    #[test]
    fn clamped_keeps_valid_sizes() {
        let cc = CacheConfig {
            name: "ok".to_string(),
            organization: Organization::SetAssociative,
            policy: Policy::Lru,
            capacity: 8,
            set_count: 4,
        }
        .clamped();
        assert_eq!((cc.capacity, cc.set_count), (8, 4));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Config::from_json(r#"{ "caches": [] }"#),
            Err(ConfigError::Empty)
        ));
        assert!(matches!(
            Config::from_json(r#"{ "caches": [ { "name": "x", "organization": "clock" } ] }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            Config::from_json(
                r#"{ "caches": [ { "name": "x", "organization": "full", "capacity": "big" } ] }"#
            ),
            Err(ConfigError::Json(_))
        ));
    }
}
