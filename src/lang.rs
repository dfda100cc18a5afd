// Message catalog - JSON translation tables with dot-path lookup
//
// Each language is a directory of JSON files; the file stem becomes the top
// key, so i18n/en/gear.json's {"prompt": {"name": ...}} is addressed as
// "gear.prompt.name". Lookups fall back to English, then to a visible
// [MISSING: key] marker so untranslated keys surface instead of crashing.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct Language {
    code: String,
    translations: HashMap<String, Value>,
    fallback: HashMap<String, Value>,
}

impl Language {
    /// Load `i18n_dir/<code>/*.json`, plus the English tables as fallback
    /// when `code` is not already "en".
    pub fn load(i18n_dir: &Path, code: &str) -> Result<Language> {
        let translations = load_tables(&i18n_dir.join(code))?;
        let fallback = if code == "en" {
            HashMap::new()
        } else {
            load_tables(&i18n_dir.join("en")).unwrap_or_default()
        };
        Ok(Language {
            code: code.to_string(),
            translations,
            fallback,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Translate a dot-path key ("gear.prompt.name").
    pub fn t(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(text) => text,
            None => format!("[MISSING: {key}]"),
        }
    }

    /// Translate with `{placeholder}` substitution.
    pub fn tf(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (placeholder, value) in substitutions {
            text = text.replace(&format!("{{{placeholder}}}"), value);
        }
        text
    }

    fn lookup(&self, key: &str) -> Option<String> {
        dig(&self.translations, key).or_else(|| dig(&self.fallback, key))
    }
}

fn dig(tables: &HashMap<String, Value>, key: &str) -> Option<String> {
    let mut parts = key.split('.');
    let mut node = tables.get(parts.next()?)?;
    for part in parts {
        node = node.get(part)?;
    }
    node.as_str().map(str::to_string)
}

fn load_tables(lang_dir: &Path) -> Result<HashMap<String, Value>> {
    let mut tables = HashMap::new();
    let entries = fs::read_dir(lang_dir)
        .with_context(|| format!("language directory {} not found", lang_dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let table: Value = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tables.insert(stem, table);
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_table(dir: &Path, code: &str, file: &str, body: &str) {
        let lang_dir = dir.join(code);
        fs::create_dir_all(&lang_dir).unwrap();
        fs::write(lang_dir.join(file), body).unwrap();
    }

    #[test]
    fn test_dot_path_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write_table(
            dir.path(),
            "en",
            "gear.json",
            r#"{"prompt": {"name": "Gear name: "}}"#,
        );

        let lang = Language::load(dir.path(), "en").unwrap();
        assert_eq!(lang.t("gear.prompt.name"), "Gear name: ");
    }

    #[test]
    fn test_missing_key_marker() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), "en", "gear.json", "{}");

        let lang = Language::load(dir.path(), "en").unwrap();
        assert_eq!(lang.t("gear.prompt.nope"), "[MISSING: gear.prompt.nope]");
    }

    #[test]
    fn test_fallback_to_english() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), "en", "msg.json", r#"{"goodbye": "Goodbye!"}"#);
        write_table(dir.path(), "de", "msg.json", r#"{"hello": "Hallo!"}"#);

        let lang = Language::load(dir.path(), "de").unwrap();
        assert_eq!(lang.code(), "de");
        assert_eq!(lang.t("msg.hello"), "Hallo!");
        assert_eq!(lang.t("msg.goodbye"), "Goodbye!");
    }

    #[test]
    fn test_placeholder_substitution() {
        let dir = tempfile::tempdir().unwrap();
        write_table(
            dir.path(),
            "en",
            "msg.json",
            r#"{"added": "Added {name} ({grams} g)"}"#,
        );

        let lang = Language::load(dir.path(), "en").unwrap();
        assert_eq!(
            lang.tf("msg.added", &[("name", "Tent"), ("grams", "1200")]),
            "Added Tent (1200 g)"
        );
    }

    #[test]
    fn test_unknown_language_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Language::load(dir.path(), "xx").is_err());
    }
}
