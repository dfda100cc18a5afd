// Catalog menu: brands, categories and consumable definitions

use anyhow::Result;
use rusqlite::Connection;

use crate::db;
use crate::entities::{Brand, Category, Consumable};
use crate::lang::Language;
use crate::validation;

use super::{print_menu, prompt, prompt_validated};

pub fn menu(conn: &Connection, lang: &Language) -> Result<()> {
    loop {
        let choice = print_menu(
            lang,
            "catalog.menu.title",
            &[
                ("1", "catalog.menu.add_brand"),
                ("2", "catalog.menu.list_brands"),
                ("3", "catalog.menu.add_category"),
                ("4", "catalog.menu.list_categories"),
                ("5", "catalog.menu.add_consumable"),
                ("6", "catalog.menu.list_consumables"),
                ("B", "menu.common.back"),
            ],
        );

        match choice.trim().to_uppercase().as_str() {
            "1" => add_brand(conn, lang)?,
            "2" => list_brands(conn, lang)?,
            "3" => add_category(conn, lang)?,
            "4" => list_categories(conn, lang)?,
            "5" => add_consumable(conn, lang)?,
            "6" => list_consumables(conn, lang)?,
            "B" => return Ok(()),
            _ => println!("{}", lang.t("msg.invalid_choice")),
        }
    }
}

fn add_brand(conn: &Connection, lang: &Language) -> Result<()> {
    let name = match prompt_validated(lang, "catalog.prompt.brand_name", false, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        Some(name) => name,
        None => return Ok(()),
    };

    let mut brand = Brand::new(&name)?;
    brand.description = validation::optional_text(&prompt(lang, "catalog.prompt.description"));
    brand.url = prompt_validated(lang, "catalog.prompt.url", true, |raw| {
        let trimmed = raw.trim();
        if validation::looks_like_url(trimmed) {
            Some(trimmed.to_string())
        } else {
            None
        }
    });

    let id = db::insert_brand(conn, &brand)?;
    println!(
        "{}",
        lang.tf(
            "catalog.msg.brand_added",
            &[("name", brand.name()), ("id", &id.to_string())]
        )
    );
    Ok(())
}

fn list_brands(conn: &Connection, lang: &Language) -> Result<()> {
    let brands = db::list_brands(conn)?;
    if brands.is_empty() {
        println!("{}", lang.t("msg.nothing_found"));
        return Ok(());
    }
    for brand in &brands {
        let url = brand.url.as_deref().unwrap_or("-");
        println!("[{}] {} | {url}", brand.id.unwrap_or_default(), brand.name());
    }
    Ok(())
}

fn add_category(conn: &Connection, lang: &Language) -> Result<()> {
    let name = match prompt_validated(lang, "catalog.prompt.category_name", false, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        Some(name) => name,
        None => return Ok(()),
    };

    let mut category = Category::new(&name)?;
    category.description = validation::optional_text(&prompt(lang, "catalog.prompt.description"));

    let id = db::insert_category(conn, &category)?;
    println!(
        "{}",
        lang.tf(
            "catalog.msg.category_added",
            &[("name", category.name()), ("id", &id.to_string())]
        )
    );
    Ok(())
}

fn list_categories(conn: &Connection, lang: &Language) -> Result<()> {
    let categories = db::list_categories(conn)?;
    if categories.is_empty() {
        println!("{}", lang.t("msg.nothing_found"));
        return Ok(());
    }
    for category in &categories {
        println!(
            "[{}] {}",
            category.id.unwrap_or_default(),
            category.name()
        );
    }
    Ok(())
}

fn add_consumable(conn: &Connection, lang: &Language) -> Result<()> {
    let name = match prompt_validated(lang, "catalog.prompt.consumable_name", false, |raw| {
        validation::required_name("name", raw).ok()
    }) {
        Some(name) => name,
        None => return Ok(()),
    };

    let mut consumable = Consumable::new(&name)?;
    consumable.description = validation::optional_text(&prompt(lang, "catalog.prompt.description"));
    consumable.mass_pcs = prompt_validated(lang, "catalog.prompt.mass", true, |raw| {
        validation::optional_u32("mass_pcs", raw).ok().flatten()
    });

    let id = db::insert_consumable(conn, &consumable)?;
    println!(
        "{}",
        lang.tf(
            "catalog.msg.consumable_added",
            &[("name", consumable.name()), ("id", &id.to_string())]
        )
    );
    Ok(())
}

fn list_consumables(conn: &Connection, lang: &Language) -> Result<()> {
    let consumables = db::list_consumables(conn)?;
    if consumables.is_empty() {
        println!("{}", lang.t("msg.nothing_found"));
        return Ok(());
    }
    for consumable in &consumables {
        let mass = consumable
            .mass_pcs
            .map(|g| format!("{g} g"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {} | {mass}",
            consumable.id.unwrap_or_default(),
            consumable.name()
        );
    }
    Ok(())
}
