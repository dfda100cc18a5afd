// Domain entities

pub mod catalog;
pub mod gear;
pub mod kit;
pub mod trip;

pub use catalog::{Brand, Category, Consumable};
pub use gear::Gear;
pub use kit::{Kit, KitEntry};
pub use trip::{ConsumableEntry, Trip, TripEntry, TripItem};
