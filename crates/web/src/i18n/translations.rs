//! Per-language translation tables with fallback lookup.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use super::Language;

/// Errors that can occur while loading translation tables.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{path} must contain a JSON object at the top level")]
    NotAnObject { path: String },
}

/// Immutable translation store, loaded once at startup.
///
/// Each language maps dotted keys (`"cart.empty"`) to localized strings.
/// Lookup order: requested language, then the fallback language, then the
/// key itself — a missing translation renders as its key so it can be
/// spotted on the page instead of crashing the request.
#[derive(Debug)]
pub struct Translator {
    tables: HashMap<Language, HashMap<String, String>>,
    fallback: Language,
}

impl Translator {
    /// Load all language tables from `dir` (`<code>.json` per language).
    ///
    /// A missing file for a language is logged and leaves that language's
    /// table empty (every lookup then falls back); a present-but-invalid
    /// file is a startup error.
    ///
    /// # Errors
    ///
    /// Returns `I18nError` if a table file exists but cannot be parsed.
    pub fn load(dir: &Path, fallback: Language) -> Result<Self, I18nError> {
        let mut tables = HashMap::new();

        for lang in Language::ALL {
            let path = dir.join(format!("{}.json", lang.code()));
            if !path.exists() {
                tracing::warn!(language = %lang, path = %path.display(), "translation table missing");
                tables.insert(lang, HashMap::new());
                continue;
            }

            let raw = std::fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let value: Value = serde_json::from_str(&raw).map_err(|source| I18nError::Parse {
                path: path.display().to_string(),
                source,
            })?;
            let Value::Object(map) = value else {
                return Err(I18nError::NotAnObject {
                    path: path.display().to_string(),
                });
            };

            let mut table = HashMap::new();
            flatten_into("", &Value::Object(map), &mut table);
            tracing::info!(language = %lang, keys = table.len(), "loaded translation table");
            tables.insert(lang, table);
        }

        Ok(Self { tables, fallback })
    }

    /// Build a translator from in-memory tables.
    #[must_use]
    pub fn from_tables(
        tables: HashMap<Language, HashMap<String, String>>,
        fallback: Language,
    ) -> Self {
        Self { tables, fallback }
    }

    /// The fallback language.
    #[must_use]
    pub const fn fallback(&self) -> Language {
        self.fallback
    }

    /// Resolve a dotted key for a language.
    ///
    /// Never fails: a key absent from both the requested language and the
    /// fallback language is echoed back verbatim.
    #[must_use]
    pub fn translate(&self, language: Language, key: &str) -> String {
        if let Some(value) = self.lookup(language, key) {
            return value.to_owned();
        }
        if language != self.fallback
            && let Some(value) = self.lookup(self.fallback, key)
        {
            return value.to_owned();
        }
        key.to_owned()
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}

/// Flatten nested JSON objects into dotted keys.
///
/// `{"cart": {"empty": "Your cart is empty"}}` becomes
/// `"cart.empty" => "Your cart is empty"`. Non-string leaves are skipped.
fn flatten_into(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_into(&key, v, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_owned(), s.clone());
        }
        _ => {
            tracing::warn!(key = prefix, "skipping non-string translation value");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn translator() -> Translator {
        let en: HashMap<String, String> = [
            ("nav.home", "Home"),
            ("cart.empty", "Your cart is empty"),
            ("only.english", "English only"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let es: HashMap<String, String> = [("nav.home", "Inicio")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();

        let mut tables = HashMap::new();
        tables.insert(Language::En, en);
        tables.insert(Language::Es, es);
        tables.insert(Language::De, HashMap::new());
        Translator::from_tables(tables, Language::En)
    }

    #[test]
    fn test_translate_direct_hit() {
        let t = translator();
        assert_eq!(t.translate(Language::Es, "nav.home"), "Inicio");
    }

    #[test]
    fn test_translate_falls_back_to_default_language() {
        let t = translator();
        assert_eq!(
            t.translate(Language::Es, "only.english"),
            "English only"
        );
        assert_eq!(
            t.translate(Language::De, "cart.empty"),
            "Your cart is empty"
        );
    }

    #[test]
    fn test_translate_missing_key_echoes_key() {
        let t = translator();
        assert_eq!(t.translate(Language::En, "does.not.exist"), "does.not.exist");
        assert_eq!(t.translate(Language::De, "does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_flatten_nested_objects() {
        let value: Value = serde_json::from_str(
            r#"{"cart": {"empty": "Empty", "actions": {"add": "Add"}}, "title": "Shop"}"#,
        )
        .unwrap();

        let mut out = HashMap::new();
        flatten_into("", &value, &mut out);

        assert_eq!(out.get("cart.empty").unwrap(), "Empty");
        assert_eq!(out.get("cart.actions.add").unwrap(), "Add");
        assert_eq!(out.get("title").unwrap(), "Shop");
        assert_eq!(out.len(), 3);
    }
}
