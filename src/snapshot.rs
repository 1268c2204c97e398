use std::fmt;

use serde::Serialize;

use crate::address::{format_address, Radix};

/// Read-only view of what a cache currently holds, slot by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Snapshot {
    Flat(Vec<Option<u64>>),
    Sets(Vec<SetView>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetView {
    pub id: usize,
    pub slots: Vec<Option<u64>>,
}

impl SetView {
    pub fn label(&self) -> String {
        format!("Set {}", self.id)
    }
}

impl Snapshot {
    pub fn occupied(&self) -> usize {
        self.slots().filter(|s| s.is_some()).count()
    }

    pub fn contains(&self, addr: u64) -> bool {
        self.slots().any(|s| *s == Some(addr))
    }

    fn slots(&self) -> Box<dyn Iterator<Item = &Option<u64>> + '_> {
        match self {
            Snapshot::Flat(slots) => Box::new(slots.iter()),
            Snapshot::Sets(sets) => Box::new(sets.iter().flat_map(|s| s.slots.iter())),
        }
    }

    pub fn render(&self, radix: Radix) -> String {
        match self {
            Snapshot::Flat(slots) => render_slots(slots, radix),
            Snapshot::Sets(sets) => sets
                .iter()
                .map(|set| format!("{}: {}", set.label(), render_slots(&set.slots, radix)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn render_slots(slots: &[Option<u64>], radix: Radix) -> String {
    let cells = slots
        .iter()
        .map(|slot| match slot {
            Some(addr) => format_address(*addr, radix),
            None => "-".to_string(),
        })
        .collect::<Vec<_>>();
    format!("[{}]", cells.join(", "))
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Radix::Decimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_flat() {
        let snap = Snapshot::Flat(vec![Some(1), None, Some(255)]);
        assert_eq!(snap.to_string(), "[1, -, 255]");
        assert_eq!(snap.render(Radix::Hex), "[0x1, -, 0xFF]");
        assert_eq!(snap.occupied(), 2);
        assert!(snap.contains(255));
        assert!(!snap.contains(2));
    }

    #[test]
    fn renders_sets() {
        let snap = Snapshot::Sets(vec![
            SetView {
                id: 0,
                slots: vec![Some(4), None],
            },
            SetView {
                id: 1,
                slots: vec![None, None],
            },
        ]);
        assert_eq!(snap.to_string(), "Set 0: [4, -]\nSet 1: [-, -]");
        assert_eq!(snap.occupied(), 1);
    }

    #[test]
    fn serializes_empty_as_null() {
        let snap = Snapshot::Flat(vec![Some(3), None]);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"flat":[3,null]}"#);
    }
}
