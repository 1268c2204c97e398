use std::collections::VecDeque;

use super::{MakeS, Replace};

/// Ways in arrival order, oldest at the front. Hits never touch it.
#[derive(Debug, Default)]
pub struct Fifo {
    arrival: VecDeque<usize>,
}

impl MakeS for Fifo {
    fn new(n_ways: usize) -> Self {
        Fifo {
            arrival: VecDeque::with_capacity(n_ways),
        }
    }
}

impl Replace for Fifo {
    fn on_hit(&mut self, _way: usize, _addr: u64) {}

    fn on_fill(&mut self, way: usize, _addr: u64) {
        self.arrival.push_back(way);
    }

    fn victim(&mut self) -> Option<usize> {
        self.arrival.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_in_arrival_order() {
        let mut fifo = Fifo::new(3);
        fifo.on_fill(0, 10);
        fifo.on_fill(1, 11);
        fifo.on_fill(2, 12);
        assert_eq!(fifo.victim(), Some(0));
        fifo.on_fill(0, 13);
        assert_eq!(fifo.victim(), Some(1));
    }

    #[test]
    fn hits_do_not_reorder() {
        let mut fifo = Fifo::new(2);
        fifo.on_fill(0, 1);
        fifo.on_fill(1, 2);
        fifo.on_hit(0, 1);
        fifo.on_hit(0, 1);
        assert_eq!(fifo.victim(), Some(0));
    }

    #[test]
    fn empty_has_no_victim() {
        let mut fifo = Fifo::new(0);
        assert_eq!(fifo.victim(), None);
    }
}
