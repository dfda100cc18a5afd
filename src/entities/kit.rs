// Kit - a reusable bundle of gear
//
// Memberships are an ordered list of (gear id, amount) entries. The same
// gear may sit in any number of kits; a kit never owns its gear.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::store::ItemStore;
use crate::validation;

/// One membership: which gear, and how many of it this kit packs.
///
/// The amount is deliberately unvalidated; see `Kit::add_gear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitEntry {
    pub gear_id: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kit {
    /// Storage-assigned id.
    pub id: i64,

    name: String,

    pub description: Option<String>,

    /// Ids of comments owned by the comment store.
    pub comments: Vec<i64>,

    entries: Vec<KitEntry>,

    /// Manual adjustment in grams, applied after the per-entry sum. May be
    /// negative (e.g. shared items carried by someone else).
    pub mass_correction: i64,
}

impl Kit {
    pub fn new(id: i64, name: &str) -> DomainResult<Self> {
        Ok(Kit {
            id,
            name: validation::required_name("name", name)?,
            description: None,
            comments: Vec::new(),
            entries: Vec::new(),
            mass_correction: 0,
        })
    }

    /// Build a kit from the stored parallel-list form.
    ///
    /// `amounts == None` defaults every membership to 1. A present amount
    /// list must match `gear_ids` in length; a mismatch fails with
    /// `LengthMismatch` before anything is constructed.
    pub fn from_parallel(
        id: i64,
        name: &str,
        gear_ids: Vec<i64>,
        amounts: Option<Vec<i64>>,
    ) -> DomainResult<Self> {
        let amounts = match amounts {
            Some(amounts) => {
                if amounts.len() != gear_ids.len() {
                    return Err(DomainError::length_mismatch(
                        "gear_list",
                        gear_ids.len(),
                        "gear_amount",
                        amounts.len(),
                    ));
                }
                amounts
            }
            None => vec![1; gear_ids.len()],
        };

        let mut kit = Kit::new(id, name)?;
        kit.entries = gear_ids
            .into_iter()
            .zip(amounts)
            .map(|(gear_id, amount)| KitEntry { gear_id, amount })
            .collect();
        Ok(kit)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = validation::required_name("name", name)?;
        Ok(())
    }

    /// Memberships in packing order.
    pub fn entries(&self) -> &[KitEntry] {
        &self.entries
    }

    /// Append a membership. One entry is appended atomically; the amount is
    /// taken as-is (callers decide whether non-positive amounts make sense).
    pub fn add_gear(&mut self, gear_id: i64, amount: i64) {
        self.entries.push(KitEntry { gear_id, amount });
    }

    /// Remove the first membership for `gear_id`. Returns whether anything
    /// was removed; an absent id leaves the kit untouched.
    pub fn remove_gear(&mut self, gear_id: i64) -> bool {
        match self.entries.iter().position(|e| e.gear_id == gear_id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Total mass in grams, recomputed from current gear state on every
    /// call. Gear without a recorded mass, and gear that no longer resolves,
    /// contributes zero.
    pub fn total_mass(&self, store: &dyn ItemStore) -> i64 {
        let entries_mass: i64 = self
            .entries
            .iter()
            .map(|entry| {
                let mass = store
                    .resolve_gear(entry.gear_id)
                    .and_then(|gear| gear.mass_pcs)
                    .unwrap_or(0);
                i64::from(mass) * entry.amount
            })
            .sum();
        entries_mass + self.mass_correction
    }
}
