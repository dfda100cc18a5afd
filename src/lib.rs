// Gearshed - outdoor gear inventory, kit builder and trip planner
//
// The domain model (entities, money, store) is plain in-memory data with
// derived computations; persistence, menus and translations sit around it.

pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod lang;
pub mod money;
pub mod search;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use entities::{
    Brand, Category, Consumable, ConsumableEntry, Gear, Kit, KitEntry, Trip, TripEntry, TripItem,
};
pub use error::{DomainError, DomainResult};
pub use lang::Language;
pub use money::Money;
pub use store::{ItemStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
