// Interactive text-menu layer
//
// Everything conversational lives here: prompting, retry loops, menus, and
// the "leave blank to keep the current value" edit merge. The domain model
// only ever sees already-validated values.

mod catalog;
mod gear;
mod kit;
mod trip;

use anyhow::Result;
use rusqlite::Connection;
use std::io::{self, Write};

use crate::lang::Language;
use crate::search::{self, SearchHit, DEFAULT_LIMIT, DEFAULT_MIN_SCORE};

/// Print a prompt and read one line from stdin.
fn read_line(prompt_text: &str) -> String {
    print!("{prompt_text}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim_end_matches(['\n', '\r']).to_string()
}

fn prompt(lang: &Language, key: &str) -> String {
    read_line(&lang.t(key))
}

/// Prompt until the validator accepts the input.
///
/// Empty input short-circuits to `None` when `allow_empty` is set, so every
/// optional field is skippable. The validator returns `None` to reject,
/// which reprints the generic invalid-input message and retries.
fn prompt_validated<T>(
    lang: &Language,
    key: &str,
    allow_empty: bool,
    mut validator: impl FnMut(&str) -> Option<T>,
) -> Option<T> {
    loop {
        let raw = prompt(lang, key);
        if raw.trim().is_empty() && allow_empty {
            return None;
        }
        match validator(&raw) {
            Some(value) => return Some(value),
            None => println!("{}", lang.t("msg.invalid_input")),
        }
    }
}

/// Render a menu from translation keys and read the user's choice.
fn print_menu(lang: &Language, title_key: &str, options: &[(&str, &str)]) -> String {
    println!("\n=== {} ===", lang.t(title_key));
    for (key, label_key) in options {
        println!("{key}. {}", lang.t(label_key));
    }
    read_line(&format!("{} ", lang.t("menu.prompt.choice")))
}

/// Narrow a candidate list with a fuzzy search term, show the hits, and let
/// the user pick an id. An empty term lists everything (up to the limit).
fn pick_from(lang: &Language, candidates: Vec<(i64, String)>, title_key: &str) -> Option<i64> {
    if candidates.is_empty() {
        println!("{}", lang.t("msg.nothing_found"));
        return None;
    }

    let term = prompt(lang, "menu.prompt.search");
    let hits: Vec<SearchHit> = if term.trim().is_empty() {
        candidates
            .into_iter()
            .take(DEFAULT_LIMIT)
            .map(|(id, label)| SearchHit {
                id,
                label,
                score: 100,
            })
            .collect()
    } else {
        search::rank(&term, candidates, DEFAULT_MIN_SCORE, DEFAULT_LIMIT)
    };

    if hits.is_empty() {
        println!("{}", lang.t("msg.nothing_found"));
        return None;
    }

    println!("{}", lang.t(title_key));
    for hit in &hits {
        println!("  [{}] {}", hit.id, hit.label);
    }

    prompt_validated(lang, "menu.prompt.id", true, |raw| {
        raw.trim().parse::<i64>().ok()
    })
}

/// Top-level menu loop. Returns when the user exits.
pub fn main_menu(conn: &Connection, lang: &Language) -> Result<()> {
    loop {
        let choice = print_menu(
            lang,
            "menu.main.title",
            &[
                ("1", "menu.main.gear"),
                ("2", "menu.main.kits"),
                ("3", "menu.main.trips"),
                ("4", "menu.main.catalog"),
                ("E", "menu.common.exit"),
            ],
        );

        match choice.trim().to_uppercase().as_str() {
            "1" => gear::menu(conn, lang)?,
            "2" => kit::menu(conn, lang)?,
            "3" => trip::menu(conn, lang)?,
            "4" => catalog::menu(conn, lang)?,
            "E" => {
                println!("{}", lang.t("msg.goodbye"));
                return Ok(());
            }
            _ => println!("{}", lang.t("msg.invalid_choice")),
        }
    }
}
