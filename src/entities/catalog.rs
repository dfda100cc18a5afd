// Catalog entities - brands, categories and consumable definitions
//
// Reference data the gear inventory points into by id. All three are plain
// records with a non-empty-name invariant and storage-assigned ids.

use serde::{Deserialize, Serialize};

use crate::entities::Gear;
use crate::error::DomainResult;
use crate::validation;

/// A gear manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: Option<i64>,
    name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl Brand {
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Brand {
            id: None,
            name: validation::required_name("name", name)?,
            description: None,
            url: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = validation::required_name("name", name)?;
        Ok(())
    }
}

/// A gear category ("shelter", "cooking", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Category {
            id: None,
            name: validation::required_name("name", name)?,
            description: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = validation::required_name("name", name)?;
        Ok(())
    }
}

/// A consumable definition (food, fuel, first-aid refills).
///
/// Consumables only matter to trips as mass, so the aggregate math consumes
/// them through the Gear-typed view from `as_gear`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: Option<i64>,
    name: String,
    pub description: Option<String>,
    /// Mass per piece/serving in grams.
    pub mass_pcs: Option<u32>,
}

impl Consumable {
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Consumable {
            id: None,
            name: validation::required_name("name", name)?,
            description: None,
            mass_pcs: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = validation::required_name("name", name)?;
        Ok(())
    }

    /// Gear-typed view carrying the fields trip math reads.
    pub fn as_gear(&self) -> Gear {
        let mut gear = Gear::new(&self.name).expect("consumable name is validated non-empty");
        gear.id = self.id;
        gear.description = self.description.clone();
        gear.mass_pcs = self.mass_pcs;
        gear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_required() {
        assert!(Brand::new("").is_err());
        assert!(Category::new("  ").is_err());
        assert!(Consumable::new("").is_err());
        assert_eq!(Brand::new("Hilleberg").unwrap().name(), "Hilleberg");
    }

    #[test]
    fn test_consumable_as_gear_carries_mass() {
        let mut consumable = Consumable::new("Gas 230g").unwrap();
        consumable.id = Some(7);
        consumable.mass_pcs = Some(380);

        let gear = consumable.as_gear();
        assert_eq!(gear.id, Some(7));
        assert_eq!(gear.name(), "Gas 230g");
        assert_eq!(gear.mass_pcs, Some(380));
        assert_eq!(gear.price, None);
    }
}
