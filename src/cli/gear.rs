// Gear menu: add, list, check, edit, delete

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::entities::Gear;
use crate::lang::Language;
use crate::money::Money;
use crate::validation;

use super::{pick_from, print_menu, prompt, prompt_validated};

pub fn menu(conn: &Connection, lang: &Language) -> Result<()> {
    loop {
        let choice = print_menu(
            lang,
            "gear.menu.title",
            &[
                ("1", "gear.menu.add"),
                ("2", "gear.menu.list"),
                ("3", "gear.menu.check"),
                ("4", "gear.menu.edit"),
                ("5", "gear.menu.delete"),
                ("B", "menu.common.back"),
            ],
        );

        match choice.trim().to_uppercase().as_str() {
            "1" => add(conn, lang)?,
            "2" => list(conn, lang)?,
            "3" => check(conn, lang)?,
            "4" => edit(conn, lang)?,
            "5" => delete(conn, lang)?,
            "B" => return Ok(()),
            _ => println!("{}", lang.t("msg.invalid_choice")),
        }
    }
}

fn add(conn: &Connection, lang: &Language) -> Result<()> {
    println!("{}", lang.t("gear.title.new"));

    let name = match prompt_validated(lang, "gear.prompt.name", false, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        Some(name) => name,
        None => return Ok(()),
    };

    let mut gear = Gear::new(&name)?;
    gear.variant = validation::optional_text(&prompt(lang, "gear.prompt.variant"));
    gear.brand_id = pick_brand(conn, lang)?;
    gear.size = validation::optional_text(&prompt(lang, "gear.prompt.size"));
    gear.mass_pcs = prompt_validated(lang, "gear.prompt.mass", true, |raw| {
        validation::optional_u32("mass_pcs", raw).ok().flatten()
    });
    gear.price = prompt_validated(lang, "gear.prompt.price", true, |raw| {
        Money::parse(raw).ok().flatten()
    });
    if let Some(amount) = prompt_validated(lang, "gear.prompt.amount", true, |raw| {
        validation::positive_count("amount", raw).ok()
    }) {
        gear.set_amount(amount)?;
    }
    gear.color = validation::optional_text(&prompt(lang, "gear.prompt.color"));
    gear.category_id = pick_category(conn, lang)?;
    gear.description = validation::optional_text(&prompt(lang, "gear.prompt.description"));
    gear.prod_date = prompt_validated(lang, "gear.prompt.prod_date", true, |raw| {
        validation::parse_date("prod_date", raw).ok()
    });
    gear.lifespan = prompt_validated(lang, "gear.prompt.lifespan", true, |raw| {
        validation::optional_u32("lifespan", raw).ok().flatten()
    });
    gear.kit_only = prompt_validated(lang, "gear.prompt.kit_only", true, validation::yes_no)
        .unwrap_or(false);

    let id = db::insert_gear(conn, &gear)?;
    println!(
        "{}",
        lang.tf("gear.msg.added", &[("name", gear.name()), ("id", &id.to_string())])
    );
    Ok(())
}

fn list(conn: &Connection, lang: &Language) -> Result<()> {
    let items = db::list_gear(conn)?;
    if items.is_empty() {
        println!("{}", lang.t("gear.msg.none"));
        return Ok(());
    }

    for gear in &items {
        let id = gear.id.unwrap_or_default();
        let mass = gear
            .mass_pcs
            .map(|g| format!("{g} g"))
            .unwrap_or_else(|| "-".to_string());
        let expired = if gear.is_expired() {
            lang.t("gear.status.expired")
        } else {
            lang.t("gear.status.ok")
        };
        let check = if gear.needs_check() {
            lang.t("gear.status.needs_check")
        } else {
            lang.t("gear.status.checked")
        };
        println!(
            "[{id}] {} x{} | {mass} | {expired} | {check}",
            gear.name(),
            gear.amount()
        );
    }
    Ok(())
}

fn check(conn: &Connection, lang: &Language) -> Result<()> {
    let picked = pick_gear(conn, lang)?;
    let id = match picked {
        Some(id) => id,
        None => return Ok(()),
    };

    match db::get_gear(conn, id)? {
        Some(mut gear) => {
            gear.check();
            db::update_gear(conn, &gear)?;
            println!("{}", lang.tf("gear.msg.checked", &[("name", gear.name())]));
        }
        None => println!("{}", lang.t("msg.nothing_found")),
    }
    Ok(())
}

/// Field-by-field edit. Blank input keeps the current value; the merge
/// happens here, never inside Gear.
fn edit(conn: &Connection, lang: &Language) -> Result<()> {
    let id = match pick_gear(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let mut gear = match db::get_gear(conn, id)? {
        Some(gear) => gear,
        None => {
            println!("{}", lang.t("msg.nothing_found"));
            return Ok(());
        }
    };

    println!("{}", lang.tf("gear.title.edit", &[("name", gear.name())]));

    if let Some(name) = prompt_validated(lang, "gear.prompt.name", true, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        gear.set_name(&name)?;
    }
    if let Some(variant) = validation::optional_text(&prompt(lang, "gear.prompt.variant")) {
        gear.variant = Some(variant);
    }
    if let Some(mass) = prompt_validated(lang, "gear.prompt.mass", true, |raw| {
        validation::optional_u32("mass_pcs", raw).ok().flatten()
    }) {
        gear.mass_pcs = Some(mass);
    }
    if let Some(price) = prompt_validated(lang, "gear.prompt.price", true, |raw| {
        Money::parse(raw).ok().flatten()
    }) {
        gear.price = Some(price);
    }
    if let Some(amount) = prompt_validated(lang, "gear.prompt.amount", true, |raw| {
        validation::positive_count("amount", raw).ok()
    }) {
        gear.set_amount(amount)?;
    }
    if let Some(lifespan) = prompt_validated(lang, "gear.prompt.lifespan", true, |raw| {
        validation::optional_u32("lifespan", raw).ok().flatten()
    }) {
        gear.lifespan = Some(lifespan);
    }

    db::update_gear(conn, &gear)?;
    println!("{}", lang.tf("gear.msg.updated", &[("name", gear.name())]));
    Ok(())
}

fn delete(conn: &Connection, lang: &Language) -> Result<()> {
    let id = match pick_gear(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };

    let confirmed =
        prompt_validated(lang, "gear.prompt.confirm_delete", true, validation::yes_no)
            .unwrap_or(false);
    if !confirmed {
        return Ok(());
    }

    if db::delete_gear(conn, id)? {
        println!("{}", lang.t("gear.msg.deleted"));
    } else {
        println!("{}", lang.t("msg.nothing_found"));
    }
    Ok(())
}

pub(super) fn pick_gear(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_gear(conn)?
        .into_iter()
        .filter_map(|gear| gear.id.map(|id| (id, gear.name().to_string())))
        .collect();
    Ok(pick_from(lang, candidates, "gear.title.pick"))
}

fn pick_brand(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_brands(conn)?
        .into_iter()
        .filter_map(|brand| brand.id.map(|id| (id, brand.name().to_string())))
        .collect();
    Ok(pick_from(lang, candidates, "catalog.title.pick_brand"))
}

fn pick_category(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_categories(conn)?
        .into_iter()
        .filter_map(|category| category.id.map(|id| (id, category.name().to_string())))
        .collect();
    Ok(pick_from(lang, candidates, "catalog.title.pick_category"))
}
