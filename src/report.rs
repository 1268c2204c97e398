use serde::Serialize;

use crate::{
    cache::{Organization, Policy, Stats},
    config::NamedEngine,
    snapshot::Snapshot,
};

/// End-of-run summary of one cache, written out as JSON.
#[derive(Debug, Serialize)]
pub struct CacheReport {
    name: String,
    organization: Organization,
    policy: Policy,
    capacity: usize,
    set_count: usize,
    blocks_per_set: usize,
    #[serde(flatten)]
    stats: Stats,
    contents: Snapshot,
}

impl CacheReport {
    pub fn new(cache: &NamedEngine) -> Self {
        let engine = &cache.engine;
        CacheReport {
            name: cache.name.clone(),
            organization: engine.organization(),
            policy: engine.policy(),
            capacity: engine.capacity(),
            set_count: engine.set_count(),
            blocks_per_set: engine.blocks_per_set(),
            stats: engine.stats(),
            contents: engine.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::CacheEngine;

    #[test]
    fn report_json_shape() {
        let mut engine = CacheEngine::new(Organization::DirectMapped, Policy::Lru, 2, 0);
        for addr in [0, 0, 0, 3] {
            engine.access(addr);
        }
        let report = CacheReport::new(&NamedEngine {
            name: "l1".to_string(),
            engine,
        });
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "l1",
                "organization": "direct_mapped",
                "policy": "lru",
                "capacity": 2,
                "set_count": 1,
                "blocks_per_set": 1,
                "hits": 2,
                "misses": 2,
                "ratio": 0.5,
                "contents": { "flat": [0, 3] }
            })
        );
    }
}
