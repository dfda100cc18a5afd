// Kit menu: create, list, compose, delete

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::entities::Kit;
use crate::lang::Language;
use crate::validation;

use super::{gear::pick_gear, pick_from, print_menu, prompt, prompt_validated};

pub fn menu(conn: &Connection, lang: &Language) -> Result<()> {
    loop {
        let choice = print_menu(
            lang,
            "kit.menu.title",
            &[
                ("1", "kit.menu.create"),
                ("2", "kit.menu.list"),
                ("3", "kit.menu.add_gear"),
                ("4", "kit.menu.remove_gear"),
                ("5", "kit.menu.delete"),
                ("B", "menu.common.back"),
            ],
        );

        match choice.trim().to_uppercase().as_str() {
            "1" => create(conn, lang)?,
            "2" => list(conn, lang)?,
            "3" => add_gear(conn, lang)?,
            "4" => remove_gear(conn, lang)?,
            "5" => delete(conn, lang)?,
            "B" => return Ok(()),
            _ => println!("{}", lang.t("msg.invalid_choice")),
        }
    }
}

fn create(conn: &Connection, lang: &Language) -> Result<()> {
    println!("{}", lang.t("kit.title.new"));

    let name = match prompt_validated(lang, "kit.prompt.name", false, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        Some(name) => name,
        None => return Ok(()),
    };

    let mut kit = Kit::new(0, &name)?;
    kit.description = validation::optional_text(&prompt(lang, "kit.prompt.description"));
    kit.mass_correction = prompt_validated(lang, "kit.prompt.mass_correction", true, |raw| {
        validation::signed_grams("mass_correction", raw).ok()
    })
    .unwrap_or(0);

    let id = db::insert_kit(conn, &kit)?;
    println!(
        "{}",
        lang.tf("kit.msg.created", &[("name", kit.name()), ("id", &id.to_string())])
    );
    Ok(())
}

fn list(conn: &Connection, lang: &Language) -> Result<()> {
    let kits = db::list_kits(conn)?;
    if kits.is_empty() {
        println!("{}", lang.t("kit.msg.none"));
        return Ok(());
    }

    for kit in &kits {
        println!(
            "[{}] {} | {} {} | {} g",
            kit.id,
            kit.name(),
            kit.entries().len(),
            lang.t("kit.label.items"),
            kit.total_mass(conn)
        );
    }
    Ok(())
}

fn add_gear(conn: &Connection, lang: &Language) -> Result<()> {
    let kit_id = match pick_kit(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let mut kit = match db::get_kit(conn, kit_id)? {
        Some(kit) => kit,
        None => {
            println!("{}", lang.t("msg.nothing_found"));
            return Ok(());
        }
    };

    let gear_id = match pick_gear(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let amount = prompt_validated(lang, "kit.prompt.amount", true, |raw| {
        raw.trim().parse::<i64>().ok()
    })
    .unwrap_or(1);

    kit.add_gear(gear_id, amount);
    db::update_kit(conn, &kit)?;
    println!("{}", lang.tf("kit.msg.gear_added", &[("name", kit.name())]));
    Ok(())
}

fn remove_gear(conn: &Connection, lang: &Language) -> Result<()> {
    let kit_id = match pick_kit(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };
    let mut kit = match db::get_kit(conn, kit_id)? {
        Some(kit) => kit,
        None => {
            println!("{}", lang.t("msg.nothing_found"));
            return Ok(());
        }
    };

    let gear_id = match prompt_validated(lang, "menu.prompt.id", true, |raw| {
        raw.trim().parse::<i64>().ok()
    }) {
        Some(id) => id,
        None => return Ok(()),
    };

    if kit.remove_gear(gear_id) {
        db::update_kit(conn, &kit)?;
        println!("{}", lang.tf("kit.msg.gear_removed", &[("name", kit.name())]));
    } else {
        println!("{}", lang.t("kit.msg.gear_not_in_kit"));
    }
    Ok(())
}

fn delete(conn: &Connection, lang: &Language) -> Result<()> {
    let id = match pick_kit(conn, lang)? {
        Some(id) => id,
        None => return Ok(()),
    };

    let confirmed = prompt_validated(lang, "kit.prompt.confirm_delete", true, validation::yes_no)
        .unwrap_or(false);
    if !confirmed {
        return Ok(());
    }

    if db::delete_kit(conn, id)? {
        println!("{}", lang.t("kit.msg.deleted"));
    } else {
        println!("{}", lang.t("msg.nothing_found"));
    }
    Ok(())
}

pub(super) fn pick_kit(conn: &Connection, lang: &Language) -> Result<Option<i64>> {
    let candidates = db::list_kits(conn)?
        .into_iter()
        .map(|kit| (kit.id, kit.name().to_string()))
        .collect();
    Ok(pick_from(lang, candidates, "kit.title.pick"))
}
