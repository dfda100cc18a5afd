use anyhow::{Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gearshed::{cli, db, Config, Language};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config_dir = config_dir();
    let config = Config::load(&config_dir)?;
    info!(language = %config.general.language, "configuration loaded");

    let lang = Language::load(&config.paths.i18n_dir, &config.general.language)
        .with_context(|| format!("failed to load language {}", config.general.language))?;

    let conn = Connection::open(&config.paths.database).with_context(|| {
        format!(
            "failed to open database {}",
            config.paths.database.display()
        )
    })?;
    db::setup_database(&conn)?;
    info!(database = %config.paths.database.display(), "database ready");

    println!("{}", lang.tf("msg.welcome", &[("version", gearshed::VERSION)]));
    cli::main_menu(&conn, &lang)
}

/// Config directory: $GEARSHED_CONFIG_DIR if set, otherwise the current
/// directory (the app is designed to run out of its own folder).
fn config_dir() -> PathBuf {
    env::var_os("GEARSHED_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
