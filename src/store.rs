// Storage collaborator interface
//
// Aggregates reference their children by id and resolve them through this
// trait when a computation runs. Resolution failure is an expected state
// (the child may have been deleted since the membership was recorded) and
// maps to None, never an error.

use std::collections::HashMap;

use crate::entities::{Gear, Kit};

/// Read access used by aggregate computations to resolve child references.
///
/// Implemented by the SQLite layer and by `MemoryStore`. Returned values are
/// owned snapshots of the current child state; totals are recomputed from
/// them on every call, so nothing here is cached.
pub trait ItemStore {
    fn resolve_gear(&self, id: i64) -> Option<Gear>;

    fn resolve_kit(&self, id: i64) -> Option<Kit>;

    /// Consumables resolve to a Gear-typed view: only name and mass matter
    /// to the computations that use them.
    fn resolve_consumable(&self, id: i64) -> Option<Gear>;
}

/// In-memory store keyed by id.
///
/// Backs unit tests and scratch sessions that have no database. Ids are
/// caller-supplied; inserting an item without one is rejected by omission —
/// the insert methods take the id explicitly.
#[derive(Debug, Default)]
pub struct MemoryStore {
    gear: HashMap<i64, Gear>,
    kits: HashMap<i64, Kit>,
    consumables: HashMap<i64, Gear>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert gear under the given id, also stamping it onto the item.
    pub fn put_gear(&mut self, id: i64, mut gear: Gear) {
        gear.id = Some(id);
        self.gear.insert(id, gear);
    }

    pub fn put_kit(&mut self, kit: Kit) {
        self.kits.insert(kit.id, kit);
    }

    pub fn put_consumable(&mut self, id: i64, mut gear: Gear) {
        gear.id = Some(id);
        self.consumables.insert(id, gear);
    }

    pub fn remove_gear(&mut self, id: i64) -> Option<Gear> {
        self.gear.remove(&id)
    }
}

impl ItemStore for MemoryStore {
    fn resolve_gear(&self, id: i64) -> Option<Gear> {
        self.gear.get(&id).cloned()
    }

    fn resolve_kit(&self, id: i64) -> Option<Kit> {
        self.kits.get(&id).cloned()
    }

    fn resolve_consumable(&self, id: i64) -> Option<Gear> {
        self.consumables.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_resolves_by_id() {
        let mut store = MemoryStore::new();
        store.put_gear(1, Gear::new("Tent").unwrap());

        let resolved = store.resolve_gear(1).unwrap();
        assert_eq!(resolved.id, Some(1));
        assert_eq!(resolved.name(), "Tent");

        assert!(store.resolve_gear(99).is_none());
        assert!(store.resolve_kit(1).is_none());
    }

    #[test]
    fn test_consumables_are_separate_from_gear() {
        let mut store = MemoryStore::new();
        store.put_gear(1, Gear::new("Tent").unwrap());
        store.put_consumable(1, Gear::new("Oatmeal").unwrap());

        assert_eq!(store.resolve_gear(1).unwrap().name(), "Tent");
        assert_eq!(store.resolve_consumable(1).unwrap().name(), "Oatmeal");
    }
}
