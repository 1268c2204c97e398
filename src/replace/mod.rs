pub mod fifo;
pub mod lru;

use serde::Serialize;

pub use fifo::Fifo;
pub use lru::Lru;

pub trait MakeS {
    fn new(n_ways: usize) -> Self;
}

/// Per-set eviction bookkeeping. Storage lives in the set, this only tracks
/// which way goes next.
pub trait Replace: MakeS {
    fn on_hit(&mut self, way: usize, addr: u64);
    fn on_fill(&mut self, way: usize, addr: u64);
    /// Removes and returns the way to evict, or `None` if nothing is tracked.
    fn victim(&mut self) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessResult {
    Hit,
    Miss,
}

impl AccessResult {
    pub fn is_hit(self) -> bool {
        self == AccessResult::Hit
    }
}
