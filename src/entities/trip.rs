// Trip - a planned outing assembled from gear, kits and consumables
//
// Two ordered membership lists: items (gear or whole kits) and consumables.
// All mass/value totals are derived on demand from current child state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::store::ItemStore;
use crate::validation;

/// A packable thing on the trip list: one gear item or one whole kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripItem {
    Gear(i64),
    Kit(i64),
}

/// One item membership with its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripEntry {
    pub item: TripItem,
    pub amount: i64,
}

/// One consumable membership. Consumables are Gear-typed on resolution but
/// tracked in their own list because they follow different rules (counted in
/// mass, excluded from value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableEntry {
    pub consumable_id: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Storage-assigned id.
    pub id: i64,

    name: String,

    pub description: Option<String>,

    /// Ids of comments owned by the comment store.
    pub comments: Vec<i64>,

    /// Free-text labels ("winter", "alpine", ...).
    pub tags: Vec<String>,

    /// Month the trip happens, normalized to the first of the month.
    pub trip_month: Option<NaiveDate>,

    pub duration_days: u32,

    /// Highest planned altitude in meters.
    pub max_altitude: Option<i32>,

    /// Number of people. At least 1.
    participants: u32,

    items: Vec<TripEntry>,

    /// Manual gram adjustment on top of the item sum.
    pub gear_mass_correction: i64,

    consumables: Vec<ConsumableEntry>,

    /// Manual gram adjustment on top of the consumable sum.
    pub consumable_mass_correction: i64,
}

impl Trip {
    pub fn new(id: i64, name: &str) -> DomainResult<Self> {
        Ok(Trip {
            id,
            name: validation::required_name("name", name)?,
            description: None,
            comments: Vec::new(),
            tags: Vec::new(),
            trip_month: None,
            duration_days: 0,
            max_altitude: None,
            participants: 1,
            items: Vec::new(),
            gear_mass_correction: 0,
            consumables: Vec::new(),
            consumable_mass_correction: 0,
        })
    }

    /// Build a trip from the stored parallel-list form. Either amount list
    /// may be omitted (defaults to 1 per membership); a present list must
    /// match its sibling in length or the whole construction fails with
    /// `LengthMismatch`.
    pub fn from_parallel(
        id: i64,
        name: &str,
        items: Vec<TripItem>,
        item_amounts: Option<Vec<i64>>,
        consumables: Vec<i64>,
        consumable_amounts: Option<Vec<i64>>,
    ) -> DomainResult<Self> {
        let item_amounts = match item_amounts {
            Some(amounts) => {
                if amounts.len() != items.len() {
                    return Err(DomainError::length_mismatch(
                        "items",
                        items.len(),
                        "item_amounts",
                        amounts.len(),
                    ));
                }
                amounts
            }
            None => vec![1; items.len()],
        };
        let consumable_amounts = match consumable_amounts {
            Some(amounts) => {
                if amounts.len() != consumables.len() {
                    return Err(DomainError::length_mismatch(
                        "consumables",
                        consumables.len(),
                        "consumable_amounts",
                        amounts.len(),
                    ));
                }
                amounts
            }
            None => vec![1; consumables.len()],
        };

        let mut trip = Trip::new(id, name)?;
        trip.items = items
            .into_iter()
            .zip(item_amounts)
            .map(|(item, amount)| TripEntry { item, amount })
            .collect();
        trip.consumables = consumables
            .into_iter()
            .zip(consumable_amounts)
            .map(|(consumable_id, amount)| ConsumableEntry {
                consumable_id,
                amount,
            })
            .collect();
        Ok(trip)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = validation::required_name("name", name)?;
        Ok(())
    }

    pub fn participants(&self) -> u32 {
        self.participants
    }

    pub fn set_participants(&mut self, participants: u32) -> DomainResult<()> {
        if participants == 0 {
            return Err(DomainError::invalid_value(
                "participants",
                "must be at least 1",
            ));
        }
        self.participants = participants;
        Ok(())
    }

    pub fn items(&self) -> &[TripEntry] {
        &self.items
    }

    pub fn consumables(&self) -> &[ConsumableEntry] {
        &self.consumables
    }

    /// Append a gear or kit membership. The amount is taken as-is.
    pub fn add_item(&mut self, item: TripItem, amount: i64) {
        self.items.push(TripEntry { item, amount });
    }

    /// Remove the first item membership matching `item`. Absent memberships
    /// leave the trip untouched.
    pub fn remove_item(&mut self, item: TripItem) -> bool {
        match self.items.iter().position(|e| e.item == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn add_consumable(&mut self, consumable_id: i64, amount: i64) {
        self.consumables.push(ConsumableEntry {
            consumable_id,
            amount,
        });
    }

    pub fn remove_consumable(&mut self, consumable_id: i64) -> bool {
        match self
            .consumables
            .iter()
            .position(|e| e.consumable_id == consumable_id)
        {
            Some(index) => {
                self.consumables.remove(index);
                true
            }
            None => false,
        }
    }

    /// Mass of the item list in grams: per-piece gear mass or full kit mass,
    /// times the membership amount, plus the manual correction. Unresolved
    /// references contribute zero.
    pub fn gear_mass(&self, store: &dyn ItemStore) -> i64 {
        let items_mass: i64 = self
            .items
            .iter()
            .map(|entry| {
                let unit_mass = match entry.item {
                    TripItem::Gear(id) => store
                        .resolve_gear(id)
                        .and_then(|gear| gear.mass_pcs)
                        .map(i64::from)
                        .unwrap_or(0),
                    TripItem::Kit(id) => store
                        .resolve_kit(id)
                        .map(|kit| kit.total_mass(store))
                        .unwrap_or(0),
                };
                unit_mass * entry.amount
            })
            .sum();
        items_mass + self.gear_mass_correction
    }

    /// Mass of the consumable list in grams, plus its manual correction.
    pub fn consumable_mass(&self, store: &dyn ItemStore) -> i64 {
        let consumables_mass: i64 = self
            .consumables
            .iter()
            .map(|entry| {
                let mass = store
                    .resolve_consumable(entry.consumable_id)
                    .and_then(|gear| gear.mass_pcs)
                    .unwrap_or(0);
                i64::from(mass) * entry.amount
            })
            .sum();
        consumables_mass + self.consumable_mass_correction
    }

    /// Everything on your back: items plus consumables.
    pub fn total_mass(&self, store: &dyn ItemStore) -> i64 {
        self.gear_mass(store) + self.consumable_mass(store)
    }

    /// Monetary value of the item list in cents. For a kit membership the
    /// kit's own per-gear amounts nest multiplicatively inside the trip's
    /// amount for that kit. Gear without a price, and unresolved references,
    /// contribute zero.
    ///
    /// Consumables are intentionally excluded: they are tracked for load
    /// planning, not as assets.
    pub fn total_value_cents(&self, store: &dyn ItemStore) -> i64 {
        self.items
            .iter()
            .map(|entry| {
                let unit_value = match entry.item {
                    TripItem::Gear(id) => store
                        .resolve_gear(id)
                        .and_then(|gear| gear.price)
                        .map(|price| price.cents())
                        .unwrap_or(0),
                    TripItem::Kit(id) => store
                        .resolve_kit(id)
                        .map(|kit| {
                            kit.entries()
                                .iter()
                                .map(|kit_entry| {
                                    let cents = store
                                        .resolve_gear(kit_entry.gear_id)
                                        .and_then(|gear| gear.price)
                                        .map(|price| price.cents())
                                        .unwrap_or(0);
                                    cents * kit_entry.amount
                                })
                                .sum()
                        })
                        .unwrap_or(0),
                };
                unit_value * entry.amount
            })
            .sum()
    }

    /// Derived major-unit view of `total_value_cents`.
    pub fn total_value(&self, store: &dyn ItemStore) -> f64 {
        self.total_value_cents(store) as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Gear, Kit};
    use crate::store::MemoryStore;

    fn gear(name: &str, grams: Option<u32>, price: &str) -> Gear {
        let mut gear = Gear::new(name).unwrap();
        gear.mass_pcs = grams;
        gear.set_price_str(price).unwrap();
        gear
    }

    #[test]
    fn test_from_parallel_length_mismatches() {
        let err = Trip::from_parallel(
            1,
            "Weekend hike",
            vec![TripItem::Gear(10), TripItem::Gear(11)],
            Some(vec![1]),
            vec![],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::LengthMismatch { .. }));

        let err = Trip::from_parallel(
            1,
            "Weekend hike",
            vec![],
            None,
            vec![20],
            Some(vec![1, 2]),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::LengthMismatch { .. }));
    }

    #[test]
    fn test_participants_must_be_positive() {
        let mut trip = Trip::new(1, "Weekend hike").unwrap();
        assert_eq!(trip.participants(), 1);
        trip.set_participants(4).unwrap();
        assert!(trip.set_participants(0).is_err());
        assert_eq!(trip.participants(), 4);
    }

    #[test]
    fn test_gear_mass_mixes_gear_and_kits() {
        let mut store = MemoryStore::new();
        store.put_gear(10, gear("Tent body", Some(500), ""));
        store.put_gear(11, gear("Stake", Some(200), ""));

        // Kit totalling 500*2 + 200*3 - 100 = 1500 g.
        let mut kit = Kit::from_parallel(1, "Shelter", vec![10, 11], Some(vec![2, 3])).unwrap();
        kit.mass_correction = -100;
        assert_eq!(kit.total_mass(&store), 1500);
        store.put_kit(kit);

        let mut trip = Trip::new(1, "Basecamp").unwrap();
        trip.add_item(TripItem::Kit(1), 2);
        trip.gear_mass_correction = 50;

        assert_eq!(trip.gear_mass(&store), 1500 * 2 + 50);
    }

    #[test]
    fn test_consumable_mass_and_total() {
        let mut store = MemoryStore::new();
        store.put_gear(10, gear("Pack", Some(1000), ""));
        store.put_consumable(20, gear("Oatmeal", Some(60), ""));

        let mut trip = Trip::new(1, "Overnighter").unwrap();
        trip.add_item(TripItem::Gear(10), 1);
        trip.add_consumable(20, 4);
        trip.consumable_mass_correction = -10;

        assert_eq!(trip.consumable_mass(&store), 60 * 4 - 10);
        assert_eq!(trip.total_mass(&store), 1000 + 230);
    }

    #[test]
    fn test_total_value_nests_kit_amounts() {
        let mut store = MemoryStore::new();
        store.put_gear(10, gear("Stove", None, "12.50"));
        store.put_gear(11, gear("Gas canister", None, "5.00"));

        let mut kit = Kit::new(1, "Kitchen").unwrap();
        kit.add_gear(11, 2);
        store.put_kit(kit);

        let mut trip = Trip::new(1, "Basecamp").unwrap();
        trip.add_item(TripItem::Gear(10), 4);
        trip.add_item(TripItem::Kit(1), 1);

        // 12.50*4 + 5.00*2*1 = 60.00
        assert_eq!(trip.total_value_cents(&store), 6000);
        assert_eq!(trip.total_value(&store), 60.0);
    }

    #[test]
    fn test_total_value_excludes_consumables() {
        let mut store = MemoryStore::new();
        store.put_consumable(20, gear("Freeze-dried meal", Some(120), "9.99"));

        let mut trip = Trip::new(1, "Overnighter").unwrap();
        trip.add_consumable(20, 3);

        assert_eq!(trip.total_value_cents(&store), 0);
        // ...while mass still counts them.
        assert_eq!(trip.total_mass(&store), 360);
    }

    #[test]
    fn test_unresolved_references_contribute_zero() {
        let store = MemoryStore::new();

        let mut trip = Trip::new(1, "Ghost trip").unwrap();
        trip.add_item(TripItem::Gear(10), 2);
        trip.add_item(TripItem::Kit(1), 1);
        trip.add_consumable(20, 5);

        assert_eq!(trip.gear_mass(&store), 0);
        assert_eq!(trip.consumable_mass(&store), 0);
        assert_eq!(trip.total_value_cents(&store), 0);
    }

    #[test]
    fn test_remove_item_first_match_only() {
        let mut trip = Trip::new(1, "Weekend hike").unwrap();
        trip.add_item(TripItem::Gear(10), 1);
        trip.add_item(TripItem::Kit(1), 1);
        trip.add_item(TripItem::Gear(10), 2);

        assert!(trip.remove_item(TripItem::Gear(10)));
        assert_eq!(trip.items().len(), 2);
        assert_eq!(trip.items()[0].item, TripItem::Kit(1));
        assert_eq!(trip.items()[1].amount, 2);

        assert!(!trip.remove_item(TripItem::Gear(99)));

        trip.add_consumable(20, 3);
        assert!(trip.remove_consumable(20));
        assert!(!trip.remove_consumable(20));
        assert!(trip.consumables().is_empty());
    }

    #[test]
    fn test_priced_gear_resolving_to_not_found_skipped_in_value() {
        let mut store = MemoryStore::new();
        store.put_gear(10, gear("Stove", None, "12.50"));

        let mut trip = Trip::new(1, "Basecamp").unwrap();
        trip.add_item(TripItem::Gear(10), 1);
        trip.add_item(TripItem::Gear(11), 1);

        assert_eq!(trip.total_value_cents(&store), 1250);

        // Deleting the priced gear drops its contribution on the next call.
        store.remove_gear(10);
        assert_eq!(trip.total_value_cents(&store), 0);
    }
}
