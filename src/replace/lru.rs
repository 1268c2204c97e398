use std::collections::VecDeque;

use super::{MakeS, Replace};

/// Recency order of resident addresses, most recently used at the front.
///
/// Each entry remembers the way its address sits in. A hit only moves the
/// entry within the queue, the block itself never changes ways.
#[derive(Debug, Default)]
pub struct Lru {
    ru_order: VecDeque<(u64, usize)>,
}

impl MakeS for Lru {
    fn new(n_ways: usize) -> Self {
        Lru {
            ru_order: VecDeque::with_capacity(n_ways),
        }
    }
}

impl Replace for Lru {
    fn on_hit(&mut self, way: usize, addr: u64) {
        if let Some(idx) = self.ru_order.iter().position(|&(a, _)| a == addr) {
            self.ru_order.remove(idx);
        }
        self.ru_order.push_front((addr, way));
    }

    fn on_fill(&mut self, way: usize, addr: u64) {
        self.ru_order.push_front((addr, way));
    }

    fn victim(&mut self) -> Option<usize> {
        self.ru_order.pop_back().map(|(_addr, way)| way)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_protects_from_eviction() {
        let mut lru = Lru::new(2);
        lru.on_fill(0, 1);
        lru.on_fill(1, 2);
        lru.on_hit(0, 1);
        assert_eq!(lru.victim(), Some(1));
        lru.on_fill(1, 3);
        assert_eq!(lru.victim(), Some(0));
    }

    #[test]
    fn victim_way_follows_address_not_position() {
        let mut lru = Lru::new(3);
        lru.on_fill(2, 7);
        lru.on_fill(0, 8);
        lru.on_fill(1, 9);
        lru.on_hit(2, 7);
        assert_eq!(lru.victim(), Some(0));
        assert_eq!(lru.victim(), Some(1));
        assert_eq!(lru.victim(), Some(2));
        assert_eq!(lru.victim(), None);
    }
}
