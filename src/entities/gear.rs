// Gear - a single trackable item
//
// Identity is a storage-assigned row id; a Gear that has never been
// persisted has no id. Everything else is a value the owner can edit.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::money::Money;
use crate::validation;

/// One physical item (or a batch of identical items) in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gear {
    /// Row id, assigned by storage on insert. Never generated here.
    pub id: Option<i64>,

    /// Display name. Non-empty, enforced on construction and rename.
    name: String,

    /// Model/variant free text (e.g. "UL 2-person").
    pub variant: Option<String>,

    /// Reference into the brand catalog.
    pub brand_id: Option<i64>,

    pub size: Option<String>,

    /// Mass per piece in grams.
    pub mass_pcs: Option<u32>,

    /// Purchase price. Absent means unknown, which counts as zero in trip
    /// value totals.
    pub price: Option<Money>,

    /// How many identical pieces are owned. At least 1.
    amount: u32,

    pub color: Option<String>,

    /// Reference into the category catalog.
    pub category_id: Option<i64>,

    pub description: Option<String>,

    /// Production date, the anchor for the expiry rule.
    pub prod_date: Option<NaiveDate>,

    pub checked: bool,

    /// Set only through `check`.
    pub last_checked: Option<NaiveDate>,

    /// Usable lifespan in whole years. 0 or absent means the item never
    /// expires.
    pub lifespan: Option<u32>,

    /// Item only makes sense inside a kit (e.g. tent pole set). Enforced by
    /// the interaction layer, not here.
    pub kit_only: bool,

    /// Ids of comments owned by the comment store.
    pub comments: Vec<i64>,
}

impl Gear {
    /// Create a gear item with the given name and defaults everywhere else.
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Gear {
            id: None,
            name: validation::required_name("name", name)?,
            variant: None,
            brand_id: None,
            size: None,
            mass_pcs: None,
            price: None,
            amount: 1,
            color: None,
            category_id: None,
            description: None,
            prod_date: None,
            checked: false,
            last_checked: None,
            lifespan: None,
            kit_only: false,
            comments: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename. The empty string is rejected, the current name is kept.
    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = validation::required_name("name", name)?;
        Ok(())
    }

    /// Pieces owned.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: u32) -> DomainResult<()> {
        if amount == 0 {
            return Err(DomainError::invalid_value("amount", "must be at least 1"));
        }
        self.amount = amount;
        Ok(())
    }

    /// Set the price from raw user input (`""` clears it). Routed through
    /// `Money::parse`, so malformed or negative input surfaces as
    /// `InvalidValue` instead of being clamped.
    pub fn set_price_str(&mut self, raw: &str) -> DomainResult<()> {
        self.price = Money::parse(raw)?;
        Ok(())
    }

    /// Price in major units, if set.
    pub fn price_major(&self) -> Option<f64> {
        self.price.map(|p| p.major_units())
    }

    /// The date after which this item counts as expired, if it has one.
    ///
    /// Lifespan years are 365 days each. That undercounts leap years on
    /// purpose: the rule is inherited from the data this inventory tracks
    /// and changing it would shift recorded expiry dates.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        let prod_date = self.prod_date?;
        let lifespan = self.lifespan.filter(|&years| years > 0)?;
        Some(prod_date + Duration::days(i64::from(lifespan) * 365))
    }

    /// Whether the item is past its expiry date as of `today`.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        match self.expiry_date() {
            Some(expiry) => today > expiry,
            None => false,
        }
    }

    /// Whether the item is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_on(Local::now().date_naive())
    }

    /// Record an inspection on the given day.
    pub fn check_on(&mut self, date: NaiveDate) {
        self.checked = true;
        self.last_checked = Some(date);
    }

    /// Record an inspection today. Calling twice on the same day is a no-op
    /// beyond rewriting the same values.
    pub fn check(&mut self) {
        self.check_on(Local::now().date_naive());
    }

    /// Whether the item is due for an inspection as of `today`: never
    /// checked, or last checked more than a year ago.
    pub fn needs_check_on(&self, today: NaiveDate) -> bool {
        match self.last_checked {
            None => true,
            Some(last) => (today - last).num_days() > 365,
        }
    }

    pub fn needs_check(&self) -> bool {
        self.needs_check_on(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_gear_defaults() {
        let gear = Gear::new("Headlamp").unwrap();
        assert_eq!(gear.id, None);
        assert_eq!(gear.name(), "Headlamp");
        assert_eq!(gear.amount(), 1);
        assert_eq!(gear.price, None);
        assert!(!gear.checked);
        assert!(!gear.kit_only);
        assert!(gear.comments.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(Gear::new("").is_err());
        assert!(Gear::new("   ").is_err());

        let mut gear = Gear::new("Headlamp").unwrap();
        assert!(gear.set_name(" ").is_err());
        // Name untouched after the failed rename.
        assert_eq!(gear.name(), "Headlamp");
    }

    #[test]
    fn test_amount_must_be_positive() {
        let mut gear = Gear::new("Tent stake").unwrap();
        gear.set_amount(8).unwrap();
        assert_eq!(gear.amount(), 8);
        assert!(gear.set_amount(0).is_err());
        assert_eq!(gear.amount(), 8);
    }

    #[test]
    fn test_price_via_parse() {
        let mut gear = Gear::new("Stove").unwrap();
        gear.set_price_str("49,95").unwrap();
        assert_eq!(gear.price.unwrap().cents(), 4995);
        assert_eq!(gear.price_major(), Some(49.95));

        // Invalid input leaves the old price in place.
        assert!(gear.set_price_str("-3").is_err());
        assert_eq!(gear.price.unwrap().cents(), 4995);

        gear.set_price_str("").unwrap();
        assert_eq!(gear.price, None);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut gear = Gear::new("Climbing rope").unwrap();
        gear.prod_date = Some(date(2020, 1, 1));
        gear.lifespan = Some(2);

        // 2 years of 365 days from 2020-01-01 (2020 is a leap year, so the
        // 365-day years land on 2021-12-31).
        let expiry = date(2021, 12, 31);
        assert_eq!(gear.expiry_date(), Some(expiry));
        assert!(!gear.is_expired_on(expiry));
        assert!(gear.is_expired_on(expiry + Duration::days(1)));
    }

    #[test]
    fn test_never_expires_without_date_or_lifespan() {
        let far_future = date(2999, 1, 1);

        let mut gear = Gear::new("Titanium spork").unwrap();
        assert!(!gear.is_expired_on(far_future));

        gear.prod_date = Some(date(2000, 1, 1));
        assert!(!gear.is_expired_on(far_future));

        gear.lifespan = Some(0);
        assert!(!gear.is_expired_on(far_future));

        gear.prod_date = None;
        gear.lifespan = Some(10);
        assert!(!gear.is_expired_on(far_future));
    }

    #[test]
    fn test_check_records_date() {
        let mut gear = Gear::new("Harness").unwrap();
        assert!(!gear.checked);
        assert_eq!(gear.last_checked, None);

        let today = date(2024, 6, 1);
        gear.check_on(today);
        assert!(gear.checked);
        assert_eq!(gear.last_checked, Some(today));

        // Idempotent for the same day.
        gear.check_on(today);
        assert_eq!(gear.last_checked, Some(today));
    }

    #[test]
    fn test_needs_check_after_a_year() {
        let mut gear = Gear::new("Harness").unwrap();
        let today = date(2024, 6, 1);
        assert!(gear.needs_check_on(today));

        gear.check_on(date(2024, 1, 1));
        assert!(!gear.needs_check_on(today));
        assert!(!gear.needs_check_on(date(2024, 12, 31)));
        assert!(gear.needs_check_on(date(2025, 1, 2)));
    }
}
