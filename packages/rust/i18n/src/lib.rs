//! UI text lookup with fallback-to-key semantics.
//!
//! There is no ambient "current language": every lookup names its
//! [`Language`] explicitly. The preference is loaded from and saved to the
//! `language` cookie at the HTTP boundary via [`language_from_cookie`] and
//! [`language_cookie`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use studio_shared::{Result, StudioError};

/// Cookie that carries the visitor's language preference.
pub const LANGUAGE_COOKIE: &str = "language";

const EN_TABLE: &str = include_str!("../locales/en.json");
const RU_TABLE: &str = include_str!("../locales/ru.json");

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ru];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(StudioError::validation(format!(
                "unsupported language '{other}': expected 'en' or 'ru'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Translation tables for every [`Language`].
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Catalog {
    /// Catalog built from the tables embedded at compile time.
    pub fn builtin() -> Result<Self> {
        let mut tables = HashMap::new();
        for (language, raw) in [(Language::En, EN_TABLE), (Language::Ru, RU_TABLE)] {
            tables.insert(language, parse_table(language, raw)?);
        }
        Ok(Self { tables })
    }

    /// Build a catalog from explicit tables.
    pub fn from_tables(tables: HashMap<Language, HashMap<String, String>>) -> Self {
        Self { tables }
    }

    /// Look up `key`; unknown or empty entries resolve to the key itself.
    pub fn t<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        match self
            .tables
            .get(&language)
            .and_then(|table| table.get(key))
            .filter(|text| !text.is_empty())
        {
            Some(text) => text.as_str(),
            None => {
                debug!(%language, key, "translation missing, falling back to key");
                key
            }
        }
    }

    /// Number of keys known for `language`.
    pub fn len(&self, language: Language) -> usize {
        self.tables.get(&language).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, language: Language) -> bool {
        self.len(language) == 0
    }
}

fn parse_table(language: Language, raw: &str) -> Result<HashMap<String, String>> {
    serde_json::from_str(raw).map_err(|e| {
        StudioError::parse(format!("invalid translation table for '{language}': {e}"))
    })
}

// ---------------------------------------------------------------------------
// Preference load/save hooks
// ---------------------------------------------------------------------------

/// Read the language preference from a `Cookie` header value.
///
/// Missing or unsupported values yield `None`; callers pick the default.
pub fn language_from_cookie(header: &str) -> Option<Language> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == LANGUAGE_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

/// `Set-Cookie` value that persists `language` in the browser.
pub fn language_cookie(language: Language) -> String {
    format!("{LANGUAGE_COOKIE}={language}; Path=/; Max-Age=31536000; SameSite=Lax")
}
