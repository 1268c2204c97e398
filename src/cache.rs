use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::ConfigError,
    replace::{AccessResult, Fifo, Lru, MakeS, Replace},
    snapshot::{SetView, Snapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organization {
    #[serde(alias = "full")]
    FullyAssociative,
    #[serde(alias = "direct")]
    DirectMapped,
    #[serde(alias = "set")]
    SetAssociative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    #[default]
    Fifo,
    Lru,
}

impl FromStr for Organization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fully_associative" | "full" => Ok(Organization::FullyAssociative),
            "direct_mapped" | "direct" => Ok(Organization::DirectMapped),
            "set_associative" | "set" => Ok(Organization::SetAssociative),
            _ => Err(ConfigError::UnknownOrganization(s.to_string())),
        }
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Policy::Fifo),
            "lru" => Ok(Policy::Lru),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Organization::FullyAssociative => "Fully Associative",
            Organization::DirectMapped => "Direct Mapped",
            Organization::SetAssociative => "Set Associative",
        })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Policy::Fifo => "FIFO",
            Policy::Lru => "LRU",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub hits: u64,
    pub misses: u64,
    pub ratio: f64,
}

impl Stats {
    fn new(hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        let ratio = if total == 0 {
            0.0
        } else {
            // Two-decimal formatting rounds the exact binary quotient.
            format!("{:.2}", hits as f64 / total as f64)
                .parse()
                .unwrap_or(0.0)
        };
        Stats {
            hits,
            misses,
            ratio,
        }
    }

    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hits: {}  Misses: {}  Hit Ratio: {:.2}",
            self.hits, self.misses, self.ratio
        )
    }
}

/// One group of slots sharing a single eviction order.
#[derive(Debug)]
pub struct CacheSet<R: Replace> {
    slots: Vec<Option<u64>>,
    order: R,
}

impl<R: Replace> CacheSet<R> {
    pub fn new(n_ways: usize) -> Self {
        CacheSet {
            slots: vec![None; n_ways],
            order: R::new(n_ways),
        }
    }

    pub fn access(&mut self, addr: u64) -> AccessResult {
        // First, look for a hit
        if let Some(way) = self.slots.iter().position(|s| *s == Some(addr)) {
            self.order.on_hit(way, addr);
            return AccessResult::Hit;
        }

        // Miss: take the first empty way, otherwise ask the policy
        let way = match self.slots.iter().position(Option::is_none) {
            Some(vacant) => Some(vacant),
            None => self.order.victim(),
        };
        if let Some(way) = way {
            if let Some(old) = self.slots[way] {
                trace!(addr, old, way, "evict");
            }
            self.slots[way] = Some(addr);
            self.order.on_fill(way, addr);
        }
        AccessResult::Miss
    }

    pub fn slots(&self) -> &[Option<u64>] {
        &self.slots
    }
}

pub trait IsCache: fmt::Debug + Send {
    fn access(&mut self, addr: u64) -> AccessResult;
    fn snapshot(&self) -> Snapshot;
}

#[derive(Debug)]
pub struct FullyAssociative<R: Replace> {
    set: CacheSet<R>,
}

impl<R: Replace> FullyAssociative<R> {
    pub fn new(capacity: usize) -> Self {
        FullyAssociative {
            set: CacheSet::new(capacity),
        }
    }
}

impl<R: Replace + fmt::Debug + Send> IsCache for FullyAssociative<R> {
    fn access(&mut self, addr: u64) -> AccessResult {
        self.set.access(addr)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Flat(self.set.slots().to_vec())
    }
}

/// One slot per index, `addr % capacity`. There is never a choice of victim.
#[derive(Debug)]
pub struct DirectMapped {
    slots: Vec<Option<u64>>,
}

impl DirectMapped {
    pub fn new(capacity: usize) -> Self {
        DirectMapped {
            slots: vec![None; capacity],
        }
    }

    pub fn index_of(&self, addr: u64) -> usize {
        (addr % self.slots.len() as u64) as usize
    }
}

impl IsCache for DirectMapped {
    fn access(&mut self, addr: u64) -> AccessResult {
        let index = self.index_of(addr);
        let slot = &mut self.slots[index];
        if *slot == Some(addr) {
            AccessResult::Hit
        } else {
            if let Some(old) = slot.replace(addr) {
                trace!(addr, old, index, "overwrite");
            }
            AccessResult::Miss
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Flat(self.slots.clone())
    }
}

#[derive(Debug)]
pub struct SetAssociative<R: Replace> {
    sets: Vec<CacheSet<R>>,
    n_ways: usize,
}

impl<R: Replace> SetAssociative<R> {
    pub fn new(capacity: usize, n_sets: usize) -> Self {
        assert!(n_sets >= 1);
        let n_ways = capacity / n_sets;
        SetAssociative {
            sets: (0..n_sets).map(|_| CacheSet::new(n_ways)).collect(),
            n_ways,
        }
    }

    pub fn get_set(&self, addr: u64) -> usize {
        (addr % self.sets.len() as u64) as usize
    }

    pub fn n_ways(&self) -> usize {
        self.n_ways
    }
}

impl<R: Replace + fmt::Debug + Send> IsCache for SetAssociative<R> {
    fn access(&mut self, addr: u64) -> AccessResult {
        let set = self.get_set(addr);
        self.sets[set].access(addr)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Sets(
            self.sets
                .iter()
                .enumerate()
                .map(|(id, set)| SetView {
                    id,
                    slots: set.slots().to_vec(),
                })
                .collect(),
        )
    }
}

/// A simulated cache plus its hit and miss counters.
///
/// Configuration is fixed at construction. To change it, build a new engine.
#[derive(Debug)]
pub struct CacheEngine {
    organization: Organization,
    policy: Policy,
    capacity: usize,
    set_count: usize,
    storage: Box<dyn IsCache>,
    hits: u64,
    misses: u64,
}

impl CacheEngine {
    /// Builds an empty cache. `set_count` is only read for set-associative
    /// caches, and a count of zero is treated as one.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new(
        organization: Organization,
        policy: Policy,
        capacity: usize,
        set_count: usize,
    ) -> Self {
        assert!(capacity >= 1, "cache capacity must be at least one block");
        let set_count = set_count.max(1);

        let storage: Box<dyn IsCache> = match (organization, policy) {
            (Organization::DirectMapped, _) => Box::new(DirectMapped::new(capacity)),
            (Organization::FullyAssociative, Policy::Fifo) => {
                Box::new(FullyAssociative::<Fifo>::new(capacity))
            }
            (Organization::FullyAssociative, Policy::Lru) => {
                Box::new(FullyAssociative::<Lru>::new(capacity))
            }
            (Organization::SetAssociative, Policy::Fifo) => {
                Box::new(SetAssociative::<Fifo>::new(capacity, set_count))
            }
            (Organization::SetAssociative, Policy::Lru) => {
                Box::new(SetAssociative::<Lru>::new(capacity, set_count))
            }
        };

        CacheEngine {
            organization,
            policy,
            capacity,
            set_count,
            storage,
            hits: 0,
            misses: 0,
        }
    }

    pub fn access(&mut self, addr: u64) -> AccessResult {
        let result = self.storage.access(addr);
        match result {
            AccessResult::Hit => self.hits += 1,
            AccessResult::Miss => self.misses += 1,
        }
        result
    }

    pub fn stats(&self) -> Stats {
        Stats::new(self.hits, self.misses)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.storage.snapshot()
    }

    /// Throws away all contents and counters, keeping the configuration.
    pub fn reset(&mut self) {
        *self = CacheEngine::new(self.organization, self.policy, self.capacity, self.set_count);
    }

    pub fn organization(&self) -> Organization {
        self.organization
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_count(&self) -> usize {
        match self.organization {
            Organization::SetAssociative => self.set_count,
            _ => 1,
        }
    }

    pub fn blocks_per_set(&self) -> usize {
        match self.organization {
            Organization::FullyAssociative => self.capacity,
            Organization::DirectMapped => 1,
            Organization::SetAssociative => self.capacity / self.set_count,
        }
    }
}
