// Trip menu: plan trips, compose their lists, report mass and value

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::entities::{Trip, TripItem};
use crate::lang::Language;
use crate::validation;

use super::{kit::pick_kit, pick_from, print_menu, prompt, prompt_validated};

pub fn menu(conn: &Connection, lang: &Language) -> Result<()> {
    loop {
        let choice = print_menu(
            lang,
            "trip.menu.title",
            &[
                ("1", "trip.menu.create"),
                ("2", "trip.menu.list"),
                ("3", "trip.menu.add_item"),
                ("4", "trip.menu.add_consumable"),
                ("5", "trip.menu.report"),
                ("6", "trip.menu.delete"),
                ("B", "menu.common.back"),
            ],
        );

        match choice.trim().to_uppercase().as_str() {
            "1" => create(conn, lang)?,
            "2" => list(conn, lang)?,
            "3" => add_item(conn, lang)?,
            "4" => add_consumable(conn, lang)?,
            "5" => report(conn, lang)?,
            "6" => delete(conn, lang)?,
            "B" => return Ok(()),
            _ => println!("{}", lang.t("msg.invalid_choice")),
        }
    }
}

fn create(conn: &Connection, lang: &Language) -> Result<()> {
    println!("{}", lang.t("trip.title.new"));

    let name = match prompt_validated(lang, "trip.prompt.name", false, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        Some(name) => name,
        None => return Ok(()),
    };

    let mut trip = Trip::new(0, &name)?;
    trip.description = validation::optional_text(&prompt(lang, "trip.prompt.description"));
    trip.trip_month = prompt_validated(lang, "trip.prompt.month", true, |raw| {
        validation::parse_month("trip_month", raw).ok()
    });
    trip.duration_days = prompt_validated(lang, "trip.prompt.duration", true, |raw| {
        validation::optional_u32("duration", raw).ok().flatten()
    })
    .unwrap_or(0);
    trip.max_altitude = prompt_validated(lang, "trip.prompt.altitude", true, |raw| {
        raw.trim().parse::<i32>().ok()
    });
    if let Some(participants) = prompt_validated(lang, "trip.prompt.participants", true, |raw| {
        validation::positive_count("participants", raw).ok()
    }) {
        trip.set_participants(participants)?;
    }
    if let Some(tags) = validation::optional_text(&prompt(lang, "trip.prompt.tags")) {
        trip.tags = tags
            .split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
    }

    let id = db::insert_trip(conn, &trip)?;
    println!(
        "{}",
        lang.tf("trip.msg.created", &[("name", trip.name()), ("id", &id.to_string())])
    );
    Ok(())
}

fn list(conn: &Connection, lang: &Language) -> Result<()> {
    let trips = db::list_trips(conn)?;
    if trips.is_empty() {
        println!("{}", lang.t("trip.msg.none"));
        return Ok(());
    }

    for trip in &trips {
        let month = trip
            .trip_month
            .map(|m| m.format("%Y-%m").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {} | {month} | {} d | {} | {} g",
            trip.id,
            trip.name(),
            trip.duration_days,
            lang.tf(
                "trip.label.people",
                &[("count", &trip.participants().to_string())]
            ),
            trip.total_mass(conn)
        );
    }
    Ok(())
}

fn add_item(conn: &Connection, lang: &Language) -> Result<()> {
    let trip_id = match pick_trip(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let mut trip = match db::get_trip(conn, trip_id)? {
        Some(trip) => trip,
        None => {
            println!("{}", lang.t("msg.nothing_found"));
            return Ok(());
        }
    };

    // Gear or a whole kit
    let kind = prompt(lang, "trip.prompt.item_kind");
    let item = match kind.trim().to_uppercase().as_str() {
        "G" => match pick_packable_gear(conn, lang)? {
            Some(id) => TripItem::Gear(id),
            None => return Ok(()),
        },
        "K" => match pick_kit(conn, lang)? {
            Some(id) => TripItem::Kit(id),
            None => return Ok(()),
        },
        _ => {
            println!("{}", lang.t("msg.invalid_choice"));
            return Ok(());
        }
    };

    let amount = prompt_validated(lang, "trip.prompt.amount", true, |raw| {
        raw.trim().parse::<i64>().ok()
    })
    .unwrap_or(1);

    trip.add_item(item, amount);
    db::update_trip(conn, &trip)?;
    println!("{}", lang.tf("trip.msg.item_added", &[("name", trip.name())]));
    Ok(())
}

fn add_consumable(conn: &Connection, lang: &Language) -> Result<()> {
    let trip_id = match pick_trip(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let mut trip = match db::get_trip(conn, trip_id)? {
        Some(trip) => trip,
        None => {
            println!("{}", lang.t("msg.nothing_found"));
            return Ok(());
        }
    };

    let consumable_id = match pick_consumable(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let amount = prompt_validated(lang, "trip.prompt.amount", true, |raw| {
        raw.trim().parse::<i64>().ok()
    })
    .unwrap_or(1);

    trip.add_consumable(consumable_id, amount);
    db::update_trip(conn, &trip)?;
    println!(
        "{}",
        lang.tf("trip.msg.consumable_added", &[("name", trip.name())])
    );
    Ok(())
}

fn report(conn: &Connection, lang: &Language) -> Result<()> {
    let trip_id = match pick_trip(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let trip = match db::get_trip(conn, trip_id)? {
        Some(trip) => trip,
        None => {
            println!("{}", lang.t("msg.nothing_found"));
            return Ok(());
        }
    };

    let value_cents = trip.total_value_cents(conn);
    println!("\n=== {} ===", trip.name());
    println!(
        "{}: {} g",
        lang.t("trip.report.gear_mass"),
        trip.gear_mass(conn)
    );
    println!(
        "{}: {} g",
        lang.t("trip.report.consumable_mass"),
        trip.consumable_mass(conn)
    );
    println!(
        "{}: {} g",
        lang.t("trip.report.total_mass"),
        trip.total_mass(conn)
    );
    println!(
        "{}: {}.{:02}",
        lang.t("trip.report.total_value"),
        value_cents / 100,
        (value_cents % 100).abs()
    );
    Ok(())
}

fn delete(conn: &Connection, lang: &Language) -> Result<()> {
    let id = match pick_trip(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };

    let confirmed = prompt_validated(lang, "trip.prompt.confirm_delete", true, validation::yes_no)
        .unwrap_or(false);
    if !confirmed {
        return Ok(());
    }

    if db::delete_trip(conn, id)? {
        println!("{}", lang.t("trip.msg.deleted"));
    } else {
        println!("{}", lang.t("msg.nothing_found"));
    }
    Ok(())
}

/// Gear picker for trip items. Kit-only gear belongs inside kits, so it is
/// filtered out here rather than rejected by Trip.
fn pick_packable_gear(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_gear(conn)?
        .into_iter()
        .filter(|gear| !gear.kit_only)
        .filter_map(|gear| gear.id.map(|id| (id, gear.name().to_string())))
        .collect();
    Ok(pick_from(lang, candidates, "gear.title.pick"))
}

fn pick_trip(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_trips(conn)?
        .into_iter()
        .map(|trip| (trip.id, trip.name().to_string()))
        .collect();
    Ok(pick_from(lang, candidates, "trip.title.pick"))
}

fn pick_consumable(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_consumables(conn)?
        .into_iter()
        .filter_map(|consumable| consumable.id.map(|id| (id, consumable.name().to_string())))
        .collect();
    Ok(pick_from(lang, candidates, "catalog.title.pick_consumable"))
}
