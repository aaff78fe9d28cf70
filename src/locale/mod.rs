//! Internationalization: locale negotiation and UI-string translations
//!
//! URLs for the default locale carry no prefix; every other locale lives
//! under `/<code>/`. Translations ship embedded for the built-in locales and
//! can be overridden from the site's `i18n/` directory.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The locale set a site is configured for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    default: String,
    supported: Vec<String>,
}

impl Locales {
    /// Create a locale set. The default locale is always supported, even if
    /// the supported list omits it.
    pub fn new(default: &str, supported: &[String]) -> Self {
        let mut supported = supported.to_vec();
        if !supported.iter().any(|l| l == default) {
            supported.insert(0, default.to_string());
        }
        Self {
            default: default.to_string(),
            supported,
        }
    }

    /// The default locale code
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// All supported locale codes
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|l| l == code)
    }

    /// URL prefix for a locale: empty for the default, "/<code>" otherwise
    pub fn prefix(&self, locale: &str) -> String {
        if locale == self.default {
            String::new()
        } else {
            format!("/{}", locale)
        }
    }

    /// Split a request path into (locale, rest-of-path).
    ///
    /// A leading segment matching a supported non-default locale selects that
    /// locale and is stripped; anything else, the default locale applies and
    /// the path passes through unchanged.
    pub fn split_path<'a>(&self, path: &'a str) -> (&str, &'a str) {
        let trimmed = path.trim_start_matches('/');
        let (head, rest) = match trimmed.find('/') {
            Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
            None => (trimmed, ""),
        };

        if head != self.default && self.is_supported(head) {
            let locale = self
                .supported
                .iter()
                .find(|l| l.as_str() == head)
                .map(|l| l.as_str())
                .unwrap_or(&self.default);
            let rest = if rest.is_empty() { "/" } else { rest };
            (locale, rest)
        } else {
            (&self.default, path)
        }
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::new("en", &["en".to_string(), "es".to_string()])
    }
}

/// UI-string translation tables, one per locale
pub struct Translations {
    /// Language data: lang -> key -> translation
    tables: HashMap<String, HashMap<String, String>>,
    /// Fallback locale for missing keys
    fallback: String,
}

impl Translations {
    /// Built-in tables for the locales this crate ships with
    pub fn embedded(fallback: &str) -> Self {
        let mut translations = Self {
            tables: HashMap::new(),
            fallback: fallback.to_string(),
        };
        translations.insert_yaml("en", include_str!("translations/en.yml"));
        translations.insert_yaml("es", include_str!("translations/es.yml"));
        translations
    }

    /// Load override files (`<lang>.yml`) from a site's i18n directory on
    /// top of the embedded tables. Missing directory is not an error.
    pub fn load_overrides<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<HashMap<String, String>>(&content) {
                Ok(data) => {
                    let table = self.tables.entry(lang).or_default();
                    for (k, v) in data {
                        table.insert(k, v);
                    }
                    tracing::debug!("Loaded translation overrides: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse translation file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    fn insert_yaml(&mut self, lang: &str, content: &str) {
        if let Ok(data) = serde_yaml::from_str::<HashMap<String, String>>(content) {
            self.tables.insert(lang.to_string(), data);
        }
    }

    /// Look up a translation for a locale, falling back to the fallback
    /// locale, then to the key itself.
    pub fn get(&self, lang: &str, key: &str) -> String {
        if let Some(value) = self.tables.get(lang).and_then(|t| t.get(key)) {
            return value.clone();
        }
        if lang != self.fallback {
            if let Some(value) = self.tables.get(&self.fallback).and_then(|t| t.get(key)) {
                return value.clone();
            }
        }
        key.to_string()
    }

    /// All translations for a locale, fallback keys merged in
    pub fn table_for(&self, lang: &str) -> HashMap<String, String> {
        let mut result = self
            .tables
            .get(lang)
            .cloned()
            .unwrap_or_default();

        if lang != self.fallback {
            if let Some(fallback) = self.tables.get(&self.fallback) {
                for (k, v) in fallback {
                    result.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Locales {
        Locales::new("en", &["en".to_string(), "es".to_string()])
    }

    #[test]
    fn test_prefix_strips_default_locale() {
        let locales = locales();
        assert_eq!(locales.prefix("en"), "");
        assert_eq!(locales.prefix("es"), "/es");
    }

    #[test]
    fn test_split_path() {
        let locales = locales();
        assert_eq!(locales.split_path("/es/blog/"), ("es", "/blog/"));
        assert_eq!(locales.split_path("/blog/"), ("en", "/blog/"));
        assert_eq!(locales.split_path("/es"), ("es", "/"));
        // Unknown prefixes fall through to the default locale
        assert_eq!(locales.split_path("/fr/blog/"), ("en", "/fr/blog/"));
    }

    #[test]
    fn test_default_always_supported() {
        let locales = Locales::new("en", &["es".to_string()]);
        assert!(locales.is_supported("en"));
        assert!(locales.is_supported("es"));
    }

    #[test]
    fn test_embedded_translations() {
        let t = Translations::embedded("en");
        assert_eq!(t.get("en", "search"), "Search articles");
        assert_eq!(t.get("es", "search"), "Buscar artículos");
    }

    #[test]
    fn test_translation_fallback() {
        let t = Translations::embedded("en");
        // Unknown locale falls back to the default table
        assert_eq!(t.get("fr", "search"), "Search articles");
        // Unknown key falls back to the key itself
        assert_eq!(t.get("en", "no-such-key"), "no-such-key");
    }

    #[test]
    fn test_table_merges_fallback() {
        let mut t = Translations::embedded("en");
        // Simulate a sparse override table
        t.tables
            .entry("es".to_string())
            .or_default()
            .remove("noposts");
        let table = t.table_for("es");
        assert_eq!(table.get("search").unwrap(), "Buscar artículos");
        assert_eq!(table.get("noposts").unwrap(), "No posts found.");
    }
}
