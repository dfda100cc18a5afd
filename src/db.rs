// SQLite persistence
//
// All ids are assigned here (INTEGER PRIMARY KEY AUTOINCREMENT); the domain
// model never invents one. Membership order matters, so the join tables
// carry a position column and loads order by it. Comment-id lists and trip
// tags are JSON-encoded text columns.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::entities::{Brand, Category, Consumable, Gear, Kit, Trip, TripItem};
use crate::error::DomainError;
use crate::money::Money;
use crate::store::ItemStore;

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS brand (
            id_brand INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            url TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id_category INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS consumable (
            id_consumable INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            mass_pcs INTEGER
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS gear (
            id_gear INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            variant TEXT,
            brand_id INTEGER REFERENCES brand(id_brand),
            size TEXT,
            mass_pcs INTEGER,
            price_cents INTEGER,
            amount INTEGER NOT NULL DEFAULT 1,
            color TEXT,
            category_id INTEGER REFERENCES category(id_category),
            description TEXT,
            prod_date TEXT,
            checked INTEGER NOT NULL DEFAULT 0,
            last_checked TEXT,
            lifespan INTEGER,
            kit_only INTEGER NOT NULL DEFAULT 0,
            comments TEXT NOT NULL DEFAULT '[]'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kit (
            id_kit INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            comments TEXT NOT NULL DEFAULT '[]',
            mass_correction INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kit_gear (
            id_kit INTEGER NOT NULL REFERENCES kit(id_kit),
            position INTEGER NOT NULL,
            gear_id INTEGER NOT NULL,
            amount INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (id_kit, position)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS trip (
            id_trip INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            comments TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            trip_month TEXT,
            duration_days INTEGER NOT NULL DEFAULT 0,
            max_altitude INTEGER,
            participants INTEGER NOT NULL DEFAULT 1,
            gear_mass_correction INTEGER NOT NULL DEFAULT 0,
            consumable_mass_correction INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS trip_item (
            id_trip INTEGER NOT NULL REFERENCES trip(id_trip),
            position INTEGER NOT NULL,
            item_kind TEXT NOT NULL CHECK (item_kind IN ('gear', 'kit')),
            item_id INTEGER NOT NULL,
            amount INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (id_trip, position)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS trip_consumable (
            id_trip INTEGER NOT NULL REFERENCES trip(id_trip),
            position INTEGER NOT NULL,
            consumable_id INTEGER NOT NULL,
            amount INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (id_trip, position)
        )",
        [],
    )?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_gear_name ON gear(name)", [])?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_gear_category ON gear(category_id)",
        [],
    )?;

    debug!("database schema ready");
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

fn encode_ids(ids: &[i64]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

fn decode_ids(raw: Option<String>) -> Vec<i64> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn encode_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn decode_date(raw: Option<String>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Bridge a domain validation failure out of a rusqlite row mapper.
fn domain_to_sql(err: DomainError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

// ============================================================================
// GEAR
// ============================================================================

/// Insert a new gear item and return its assigned id.
pub fn insert_gear(conn: &Connection, gear: &Gear) -> Result<i64> {
    conn.execute(
        "INSERT INTO gear (
            name, variant, brand_id, size, mass_pcs, price_cents, amount,
            color, category_id, description, prod_date, checked, last_checked,
            lifespan, kit_only, comments
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            gear.name(),
            gear.variant,
            gear.brand_id,
            gear.size,
            gear.mass_pcs,
            gear.price.map(|p| p.cents()),
            gear.amount(),
            gear.color,
            gear.category_id,
            gear.description,
            encode_date(gear.prod_date),
            gear.checked,
            encode_date(gear.last_checked),
            gear.lifespan,
            gear.kit_only,
            encode_ids(&gear.comments),
        ],
    )
    .context("failed to insert gear")?;

    Ok(conn.last_insert_rowid())
}

/// Write back an already-persisted gear item.
pub fn update_gear(conn: &Connection, gear: &Gear) -> Result<()> {
    let id = match gear.id {
        Some(id) => id,
        None => bail!("cannot update gear that was never inserted"),
    };

    let changed = conn.execute(
        "UPDATE gear SET
            name = ?1, variant = ?2, brand_id = ?3, size = ?4, mass_pcs = ?5,
            price_cents = ?6, amount = ?7, color = ?8, category_id = ?9,
            description = ?10, prod_date = ?11, checked = ?12,
            last_checked = ?13, lifespan = ?14, kit_only = ?15, comments = ?16
         WHERE id_gear = ?17",
        params![
            gear.name(),
            gear.variant,
            gear.brand_id,
            gear.size,
            gear.mass_pcs,
            gear.price.map(|p| p.cents()),
            gear.amount(),
            gear.color,
            gear.category_id,
            gear.description,
            encode_date(gear.prod_date),
            gear.checked,
            encode_date(gear.last_checked),
            gear.lifespan,
            gear.kit_only,
            encode_ids(&gear.comments),
            id,
        ],
    )?;

    if changed == 0 {
        bail!(DomainError::not_found("gear", id));
    }
    Ok(())
}

const GEAR_COLUMNS: &str = "id_gear, name, variant, brand_id, size, mass_pcs, price_cents, amount, \
     color, category_id, description, prod_date, checked, last_checked, lifespan, kit_only, comments";

fn gear_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Gear> {
    let name: String = row.get(1)?;
    let mut gear = Gear::new(&name).map_err(domain_to_sql)?;
    gear.id = Some(row.get(0)?);
    gear.variant = row.get(2)?;
    gear.brand_id = row.get(3)?;
    gear.size = row.get(4)?;
    gear.mass_pcs = row.get(5)?;
    gear.price = row
        .get::<_, Option<i64>>(6)?
        .map(|cents| Money::from_cents(cents).map_err(domain_to_sql))
        .transpose()?;
    gear.set_amount(row.get(7)?).map_err(domain_to_sql)?;
    gear.color = row.get(8)?;
    gear.category_id = row.get(9)?;
    gear.description = row.get(10)?;
    gear.prod_date = decode_date(row.get(11)?);
    gear.checked = row.get(12)?;
    gear.last_checked = decode_date(row.get(13)?);
    gear.lifespan = row.get(14)?;
    gear.kit_only = row.get(15)?;
    gear.comments = decode_ids(row.get(16)?);
    Ok(gear)
}

pub fn get_gear(conn: &Connection, id: i64) -> Result<Option<Gear>> {
    let mut stmt = conn.prepare(&format!("SELECT {GEAR_COLUMNS} FROM gear WHERE id_gear = ?1"))?;
    let mut rows = stmt.query_map(params![id], gear_from_row)?;
    rows.next().transpose().context("failed to load gear")
}

pub fn list_gear(conn: &Connection) -> Result<Vec<Gear>> {
    let mut stmt = conn.prepare(&format!("SELECT {GEAR_COLUMNS} FROM gear ORDER BY name"))?;
    let gear = stmt
        .query_map([], gear_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(gear)
}

/// Delete a gear item; reports whether a row was removed. Kit and trip
/// memberships pointing at it are left in place and simply stop resolving.
pub fn delete_gear(conn: &Connection, id: i64) -> Result<bool> {
    let changed = conn.execute("DELETE FROM gear WHERE id_gear = ?1", params![id])?;
    Ok(changed > 0)
}

// ============================================================================
// KIT
// ============================================================================

/// Insert a kit with its memberships and return the assigned id.
pub fn insert_kit(conn: &Connection, kit: &Kit) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO kit (name, description, comments, mass_correction)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            kit.name(),
            kit.description,
            encode_ids(&kit.comments),
            kit.mass_correction,
        ],
    )?;
    let id = tx.last_insert_rowid();
    write_kit_memberships(&tx, id, kit)?;
    tx.commit()?;
    Ok(id)
}

/// Write back a kit: fields plus a full membership rewrite, atomically.
pub fn update_kit(conn: &Connection, kit: &Kit) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE kit SET name = ?1, description = ?2, comments = ?3, mass_correction = ?4
         WHERE id_kit = ?5",
        params![
            kit.name(),
            kit.description,
            encode_ids(&kit.comments),
            kit.mass_correction,
            kit.id,
        ],
    )?;
    if changed == 0 {
        bail!(DomainError::not_found("kit", kit.id));
    }
    tx.execute("DELETE FROM kit_gear WHERE id_kit = ?1", params![kit.id])?;
    write_kit_memberships(&tx, kit.id, kit)?;
    tx.commit()?;
    Ok(())
}

fn write_kit_memberships(conn: &Connection, id: i64, kit: &Kit) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO kit_gear (id_kit, position, gear_id, amount) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, entry) in kit.entries().iter().enumerate() {
        stmt.execute(params![id, position as i64, entry.gear_id, entry.amount])?;
    }
    Ok(())
}

pub fn get_kit(conn: &Connection, id: i64) -> Result<Option<Kit>> {
    let header = conn
        .query_row(
            "SELECT name, description, comments, mass_correction FROM kit WHERE id_kit = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .map(Some)
        .or_else(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    let (name, description, comments, mass_correction) = match header {
        Some(header) => header,
        None => return Ok(None),
    };

    let mut stmt = conn.prepare(
        "SELECT gear_id, amount FROM kit_gear WHERE id_kit = ?1 ORDER BY position",
    )?;
    let memberships = stmt
        .query_map(params![id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let (gear_ids, amounts): (Vec<i64>, Vec<i64>) = memberships.into_iter().unzip();
    let mut kit = Kit::from_parallel(id, &name, gear_ids, Some(amounts))
        .with_context(|| format!("stored kit {id} is malformed"))?;
    kit.description = description;
    kit.comments = decode_ids(comments);
    kit.mass_correction = mass_correction;
    Ok(Some(kit))
}

pub fn list_kits(conn: &Connection) -> Result<Vec<Kit>> {
    let mut stmt = conn.prepare("SELECT id_kit FROM kit ORDER BY name")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut kits = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(kit) = get_kit(conn, id)? {
            kits.push(kit);
        }
    }
    Ok(kits)
}

pub fn delete_kit(conn: &Connection, id: i64) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM kit_gear WHERE id_kit = ?1", params![id])?;
    let changed = tx.execute("DELETE FROM kit WHERE id_kit = ?1", params![id])?;
    tx.commit()?;
    Ok(changed > 0)
}

// ============================================================================
// TRIP
// ============================================================================

/// Insert a trip with both membership lists and return the assigned id.
pub fn insert_trip(conn: &Connection, trip: &Trip) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO trip (
            name, description, comments, tags, trip_month, duration_days,
            max_altitude, participants, gear_mass_correction, consumable_mass_correction
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            trip.name(),
            trip.description,
            encode_ids(&trip.comments),
            serde_json::to_string(&trip.tags)?,
            encode_date(trip.trip_month),
            trip.duration_days,
            trip.max_altitude,
            trip.participants(),
            trip.gear_mass_correction,
            trip.consumable_mass_correction,
        ],
    )?;
    let id = tx.last_insert_rowid();
    write_trip_memberships(&tx, id, trip)?;
    tx.commit()?;
    Ok(id)
}

pub fn update_trip(conn: &Connection, trip: &Trip) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE trip SET
            name = ?1, description = ?2, comments = ?3, tags = ?4, trip_month = ?5,
            duration_days = ?6, max_altitude = ?7, participants = ?8,
            gear_mass_correction = ?9, consumable_mass_correction = ?10
         WHERE id_trip = ?11",
        params![
            trip.name(),
            trip.description,
            encode_ids(&trip.comments),
            serde_json::to_string(&trip.tags)?,
            encode_date(trip.trip_month),
            trip.duration_days,
            trip.max_altitude,
            trip.participants(),
            trip.gear_mass_correction,
            trip.consumable_mass_correction,
            trip.id,
        ],
    )?;
    if changed == 0 {
        bail!(DomainError::not_found("trip", trip.id));
    }
    tx.execute("DELETE FROM trip_item WHERE id_trip = ?1", params![trip.id])?;
    tx.execute(
        "DELETE FROM trip_consumable WHERE id_trip = ?1",
        params![trip.id],
    )?;
    write_trip_memberships(&tx, trip.id, trip)?;
    tx.commit()?;
    Ok(())
}

fn write_trip_memberships(conn: &Connection, id: i64, trip: &Trip) -> Result<()> {
    let mut item_stmt = conn.prepare(
        "INSERT INTO trip_item (id_trip, position, item_kind, item_id, amount)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (position, entry) in trip.items().iter().enumerate() {
        let (kind, item_id) = match entry.item {
            TripItem::Gear(gear_id) => ("gear", gear_id),
            TripItem::Kit(kit_id) => ("kit", kit_id),
        };
        item_stmt.execute(params![id, position as i64, kind, item_id, entry.amount])?;
    }

    let mut consumable_stmt = conn.prepare(
        "INSERT INTO trip_consumable (id_trip, position, consumable_id, amount)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, entry) in trip.consumables().iter().enumerate() {
        consumable_stmt.execute(params![
            id,
            position as i64,
            entry.consumable_id,
            entry.amount
        ])?;
    }
    Ok(())
}

type TripHeader = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    u32,
    Option<i32>,
    u32,
    i64,
    i64,
);

pub fn get_trip(conn: &Connection, id: i64) -> Result<Option<Trip>> {
    let header = conn
        .query_row(
            "SELECT name, description, comments, tags, trip_month, duration_days,
                    max_altitude, participants, gear_mass_correction, consumable_mass_correction
             FROM trip WHERE id_trip = ?1",
            params![id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            },
        )
        .map(Some::<TripHeader>)
        .or_else(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    let (
        name,
        description,
        comments,
        tags,
        trip_month,
        duration_days,
        max_altitude,
        participants,
        gear_mass_correction,
        consumable_mass_correction,
    ) = match header {
        Some(header) => header,
        None => return Ok(None),
    };

    let mut stmt = conn.prepare(
        "SELECT item_kind, item_id, amount FROM trip_item WHERE id_trip = ?1 ORDER BY position",
    )?;
    let raw_items = stmt
        .query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut items = Vec::with_capacity(raw_items.len());
    let mut item_amounts = Vec::with_capacity(raw_items.len());
    for (kind, item_id, amount) in raw_items {
        let item = match kind.as_str() {
            "gear" => TripItem::Gear(item_id),
            "kit" => TripItem::Kit(item_id),
            other => bail!("trip {id} has unknown item kind {other:?}"),
        };
        items.push(item);
        item_amounts.push(amount);
    }

    let mut stmt = conn.prepare(
        "SELECT consumable_id, amount FROM trip_consumable WHERE id_trip = ?1 ORDER BY position",
    )?;
    let memberships = stmt
        .query_map(params![id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let (consumables, consumable_amounts): (Vec<i64>, Vec<i64>) = memberships.into_iter().unzip();

    let mut trip = Trip::from_parallel(
        id,
        &name,
        items,
        Some(item_amounts),
        consumables,
        Some(consumable_amounts),
    )
    .with_context(|| format!("stored trip {id} is malformed"))?;
    trip.description = description;
    trip.comments = decode_ids(comments);
    trip.tags = tags
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();
    trip.trip_month = decode_date(trip_month);
    trip.duration_days = duration_days;
    trip.max_altitude = max_altitude;
    if participants >= 1 {
        trip.set_participants(participants)
            .with_context(|| format!("stored trip {id} is malformed"))?;
    }
    trip.gear_mass_correction = gear_mass_correction;
    trip.consumable_mass_correction = consumable_mass_correction;
    Ok(Some(trip))
}

pub fn list_trips(conn: &Connection) -> Result<Vec<Trip>> {
    let mut stmt = conn.prepare("SELECT id_trip FROM trip ORDER BY trip_month, name")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut trips = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(trip) = get_trip(conn, id)? {
            trips.push(trip);
        }
    }
    Ok(trips)
}

pub fn delete_trip(conn: &Connection, id: i64) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM trip_item WHERE id_trip = ?1", params![id])?;
    tx.execute("DELETE FROM trip_consumable WHERE id_trip = ?1", params![id])?;
    let changed = tx.execute("DELETE FROM trip WHERE id_trip = ?1", params![id])?;
    tx.commit()?;
    Ok(changed > 0)
}

// ============================================================================
// CATALOG: BRAND / CATEGORY / CONSUMABLE
// ============================================================================

pub fn insert_brand(conn: &Connection, brand: &Brand) -> Result<i64> {
    conn.execute(
        "INSERT INTO brand (name, description, url) VALUES (?1, ?2, ?3)",
        params![brand.name(), brand.description, brand.url],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_brand(conn: &Connection, brand: &Brand) -> Result<()> {
    let id = match brand.id {
        Some(id) => id,
        None => bail!("cannot update brand that was never inserted"),
    };
    let changed = conn.execute(
        "UPDATE brand SET name = ?1, description = ?2, url = ?3 WHERE id_brand = ?4",
        params![brand.name(), brand.description, brand.url, id],
    )?;
    if changed == 0 {
        bail!(DomainError::not_found("brand", id));
    }
    Ok(())
}

fn brand_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Brand> {
    let name: String = row.get(1)?;
    let mut brand = Brand::new(&name).map_err(domain_to_sql)?;
    brand.id = Some(row.get(0)?);
    brand.description = row.get(2)?;
    brand.url = row.get(3)?;
    Ok(brand)
}

pub fn get_brand(conn: &Connection, id: i64) -> Result<Option<Brand>> {
    let mut stmt =
        conn.prepare("SELECT id_brand, name, description, url FROM brand WHERE id_brand = ?1")?;
    let mut rows = stmt.query_map(params![id], brand_from_row)?;
    rows.next().transpose().context("failed to load brand")
}

pub fn list_brands(conn: &Connection) -> Result<Vec<Brand>> {
    let mut stmt =
        conn.prepare("SELECT id_brand, name, description, url FROM brand ORDER BY name")?;
    let brands = stmt
        .query_map([], brand_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(brands)
}

pub fn insert_category(conn: &Connection, category: &Category) -> Result<i64> {
    conn.execute(
        "INSERT INTO category (name, description) VALUES (?1, ?2)",
        params![category.name(), category.description],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_category(conn: &Connection, category: &Category) -> Result<()> {
    let id = match category.id {
        Some(id) => id,
        None => bail!("cannot update category that was never inserted"),
    };
    let changed = conn.execute(
        "UPDATE category SET name = ?1, description = ?2 WHERE id_category = ?3",
        params![category.name(), category.description, id],
    )?;
    if changed == 0 {
        bail!(DomainError::not_found("category", id));
    }
    Ok(())
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    let name: String = row.get(1)?;
    let mut category = Category::new(&name).map_err(domain_to_sql)?;
    category.id = Some(row.get(0)?);
    category.description = row.get(2)?;
    Ok(category)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let mut stmt = conn
        .prepare("SELECT id_category, name, description FROM category WHERE id_category = ?1")?;
    let mut rows = stmt.query_map(params![id], category_from_row)?;
    rows.next().transpose().context("failed to load category")
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id_category, name, description FROM category ORDER BY name")?;
    let categories = stmt
        .query_map([], category_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub fn insert_consumable(conn: &Connection, consumable: &Consumable) -> Result<i64> {
    conn.execute(
        "INSERT INTO consumable (name, description, mass_pcs) VALUES (?1, ?2, ?3)",
        params![
            consumable.name(),
            consumable.description,
            consumable.mass_pcs
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_consumable(conn: &Connection, consumable: &Consumable) -> Result<()> {
    let id = match consumable.id {
        Some(id) => id,
        None => bail!("cannot update consumable that was never inserted"),
    };
    let changed = conn.execute(
        "UPDATE consumable SET name = ?1, description = ?2, mass_pcs = ?3 WHERE id_consumable = ?4",
        params![
            consumable.name(),
            consumable.description,
            consumable.mass_pcs,
            id
        ],
    )?;
    if changed == 0 {
        bail!(DomainError::not_found("consumable", id));
    }
    Ok(())
}

fn consumable_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Consumable> {
    let name: String = row.get(1)?;
    let mut consumable = Consumable::new(&name).map_err(domain_to_sql)?;
    consumable.id = Some(row.get(0)?);
    consumable.description = row.get(2)?;
    consumable.mass_pcs = row.get(3)?;
    Ok(consumable)
}

pub fn get_consumable(conn: &Connection, id: i64) -> Result<Option<Consumable>> {
    let mut stmt = conn.prepare(
        "SELECT id_consumable, name, description, mass_pcs FROM consumable WHERE id_consumable = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], consumable_from_row)?;
    rows.next().transpose().context("failed to load consumable")
}

pub fn list_consumables(conn: &Connection) -> Result<Vec<Consumable>> {
    let mut stmt = conn.prepare(
        "SELECT id_consumable, name, description, mass_pcs FROM consumable ORDER BY name",
    )?;
    let consumables = stmt
        .query_map([], consumable_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(consumables)
}

// ============================================================================
// RESOLVER
// ============================================================================

/// The database is the storage collaborator the aggregates resolve through.
/// Any failure (missing row, decode problem) maps to None: stale references
/// are expected and must not abort aggregate math.
impl ItemStore for Connection {
    fn resolve_gear(&self, id: i64) -> Option<Gear> {
        get_gear(self, id).ok().flatten()
    }

    fn resolve_kit(&self, id: i64) -> Option<Kit> {
        get_kit(self, id).ok().flatten()
    }

    fn resolve_consumable(&self, id: i64) -> Option<Gear> {
        get_consumable(self, id)
            .ok()
            .flatten()
            .map(|consumable| consumable.as_gear())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn full_gear() -> Gear {
        let mut gear = Gear::new("Nallo 2").unwrap();
        gear.variant = Some("4-season".to_string());
        gear.brand_id = Some(3);
        gear.size = Some("2P".to_string());
        gear.mass_pcs = Some(2400);
        gear.set_price_str("899,50").unwrap();
        gear.color = Some("red".to_string());
        gear.category_id = Some(2);
        gear.description = Some("Tunnel tent".to_string());
        gear.prod_date = NaiveDate::from_ymd_opt(2021, 5, 1);
        gear.check_on(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
        gear.lifespan = Some(10);
        gear.comments = vec![4, 9];
        gear
    }

    #[test]
    fn test_gear_round_trip_field_for_field() {
        let conn = test_conn();
        let mut gear = full_gear();

        let id = insert_gear(&conn, &gear).unwrap();
        let loaded = get_gear(&conn, id).unwrap().unwrap();

        // Identical except for the id assigned during persistence.
        gear.id = Some(id);
        assert_eq!(loaded, gear);
    }

    #[test]
    fn test_get_gear_missing_is_none() {
        let conn = test_conn();
        assert!(get_gear(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_update_gear_persists_check() {
        let conn = test_conn();
        let gear = Gear::new("Harness").unwrap();
        let id = insert_gear(&conn, &gear).unwrap();

        let mut loaded = get_gear(&conn, id).unwrap().unwrap();
        loaded.check_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        update_gear(&conn, &loaded).unwrap();

        let reloaded = get_gear(&conn, id).unwrap().unwrap();
        assert!(reloaded.checked);
        assert_eq!(reloaded.last_checked, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_update_never_inserted_gear_fails() {
        let conn = test_conn();
        let gear = Gear::new("Ghost").unwrap();
        assert!(update_gear(&conn, &gear).is_err());
    }

    #[test]
    fn test_delete_gear_reports_removal() {
        let conn = test_conn();
        let id = insert_gear(&conn, &Gear::new("Old rope").unwrap()).unwrap();

        assert!(delete_gear(&conn, id).unwrap());
        assert!(!delete_gear(&conn, id).unwrap());
        assert!(get_gear(&conn, id).unwrap().is_none());
    }

    #[test]
    fn test_kit_round_trip_preserves_membership_order() {
        let conn = test_conn();

        let mut kit = Kit::new(0, "Shelter").unwrap();
        kit.description = Some("Everything for the night".to_string());
        kit.mass_correction = -50;
        kit.add_gear(12, 1);
        kit.add_gear(7, 4);
        kit.add_gear(12, 2); // same gear twice is allowed

        let id = insert_kit(&conn, &kit).unwrap();
        let loaded = get_kit(&conn, id).unwrap().unwrap();

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.name(), "Shelter");
        assert_eq!(loaded.mass_correction, -50);
        let memberships: Vec<(i64, i64)> = loaded
            .entries()
            .iter()
            .map(|e| (e.gear_id, e.amount))
            .collect();
        assert_eq!(memberships, vec![(12, 1), (7, 4), (12, 2)]);
    }

    #[test]
    fn test_update_kit_rewrites_memberships() {
        let conn = test_conn();

        let mut kit = Kit::new(0, "Kitchen").unwrap();
        kit.add_gear(1, 1);
        let id = insert_kit(&conn, &kit).unwrap();

        let mut loaded = get_kit(&conn, id).unwrap().unwrap();
        assert!(loaded.remove_gear(1));
        loaded.add_gear(2, 3);
        update_kit(&conn, &loaded).unwrap();

        let reloaded = get_kit(&conn, id).unwrap().unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].gear_id, 2);
        assert_eq!(reloaded.entries()[0].amount, 3);
    }

    #[test]
    fn test_trip_round_trip() {
        let conn = test_conn();

        let mut trip = Trip::new(0, "Kungsleden").unwrap();
        trip.description = Some("Abisko to Nikkaluokta".to_string());
        trip.tags = vec!["hiking".to_string(), "arctic".to_string()];
        trip.trip_month = NaiveDate::from_ymd_opt(2025, 8, 1);
        trip.duration_days = 7;
        trip.max_altitude = Some(1150);
        trip.set_participants(2).unwrap();
        trip.add_item(TripItem::Kit(4), 1);
        trip.add_item(TripItem::Gear(9), 2);
        trip.gear_mass_correction = 100;
        trip.add_consumable(3, 14);
        trip.consumable_mass_correction = -20;

        let id = insert_trip(&conn, &trip).unwrap();
        let loaded = get_trip(&conn, id).unwrap().unwrap();

        let mut expected = trip;
        expected.id = id;
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_trip_masses_resolve_through_database() {
        let conn = test_conn();

        let mut tent = Gear::new("Tent").unwrap();
        tent.mass_pcs = Some(500);
        let tent_id = insert_gear(&conn, &tent).unwrap();

        let mut stake = Gear::new("Stake").unwrap();
        stake.mass_pcs = Some(200);
        let stake_id = insert_gear(&conn, &stake).unwrap();

        let mut kit = Kit::new(0, "Shelter").unwrap();
        kit.add_gear(tent_id, 2);
        kit.add_gear(stake_id, 3);
        kit.mass_correction = -100;
        let kit_id = insert_kit(&conn, &kit).unwrap();

        let mut oatmeal = Consumable::new("Oatmeal").unwrap();
        oatmeal.mass_pcs = Some(60);
        let oatmeal_id = insert_consumable(&conn, &oatmeal).unwrap();

        let mut trip = Trip::new(0, "Basecamp").unwrap();
        trip.add_item(TripItem::Kit(kit_id), 2);
        trip.gear_mass_correction = 50;
        trip.add_consumable(oatmeal_id, 4);
        let trip_id = insert_trip(&conn, &trip).unwrap();

        let loaded = get_trip(&conn, trip_id).unwrap().unwrap();
        assert_eq!(loaded.gear_mass(&conn), 1500 * 2 + 50);
        assert_eq!(loaded.consumable_mass(&conn), 240);
        assert_eq!(loaded.total_mass(&conn), 3050 + 240);
    }

    #[test]
    fn test_deleted_gear_stops_contributing() {
        let conn = test_conn();

        let mut rope = Gear::new("Rope").unwrap();
        rope.mass_pcs = Some(3000);
        rope.set_price_str("250").unwrap();
        let rope_id = insert_gear(&conn, &rope).unwrap();

        let mut trip = Trip::new(0, "Crag day").unwrap();
        trip.add_item(TripItem::Gear(rope_id), 1);
        let trip_id = insert_trip(&conn, &trip).unwrap();

        let loaded = get_trip(&conn, trip_id).unwrap().unwrap();
        assert_eq!(loaded.gear_mass(&conn), 3000);
        assert_eq!(loaded.total_value_cents(&conn), 25000);

        // The membership dangles after deletion; totals quietly drop it.
        delete_gear(&conn, rope_id).unwrap();
        assert_eq!(loaded.gear_mass(&conn), 0);
        assert_eq!(loaded.total_value_cents(&conn), 0);
    }

    #[test]
    fn test_catalog_round_trips() {
        let conn = test_conn();

        let mut brand = Brand::new("Hilleberg").unwrap();
        brand.url = Some("https://hilleberg.com".to_string());
        let brand_id = insert_brand(&conn, &brand).unwrap();
        let loaded = get_brand(&conn, brand_id).unwrap().unwrap();
        assert_eq!(loaded.name(), "Hilleberg");
        assert_eq!(loaded.url.as_deref(), Some("https://hilleberg.com"));

        let category = Category::new("Shelter").unwrap();
        let category_id = insert_category(&conn, &category).unwrap();
        assert_eq!(
            get_category(&conn, category_id).unwrap().unwrap().name(),
            "Shelter"
        );

        let mut consumable = Consumable::new("Gas 230g").unwrap();
        consumable.mass_pcs = Some(380);
        let consumable_id = insert_consumable(&conn, &consumable).unwrap();
        let loaded = get_consumable(&conn, consumable_id).unwrap().unwrap();
        assert_eq!(loaded.mass_pcs, Some(380));

        // Resolver exposes the Gear-typed view.
        let as_gear = conn.resolve_consumable(consumable_id).unwrap();
        assert_eq!(as_gear.name(), "Gas 230g");
        assert_eq!(as_gear.mass_pcs, Some(380));
    }

    #[test]
    fn test_catalog_updates() {
        let conn = test_conn();

        let brand = Brand::new("Hileberg").unwrap();
        let id = insert_brand(&conn, &brand).unwrap();

        let mut loaded = get_brand(&conn, id).unwrap().unwrap();
        loaded.set_name("Hilleberg").unwrap();
        update_brand(&conn, &loaded).unwrap();

        assert_eq!(get_brand(&conn, id).unwrap().unwrap().name(), "Hilleberg");
    }

    #[test]
    fn test_list_gear_sorted_by_name() {
        let conn = test_conn();
        insert_gear(&conn, &Gear::new("Stove").unwrap()).unwrap();
        insert_gear(&conn, &Gear::new("Headlamp").unwrap()).unwrap();

        let names: Vec<String> = list_gear(&conn)
            .unwrap()
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["Headlamp", "Stove"]);
    }
}
