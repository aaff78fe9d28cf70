//! Per-locale tag counts
//!
//! The index is compiled once from loaded posts and is read-only afterwards:
//! the listing sidebar, the tags page and the URL tag validation all consult
//! it instead of rescanning posts.

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::PostSummary;

/// Mapping from locale to (tag -> occurrence count).
///
/// Tag order within a locale is first-appearance order across the post
/// sequence, so sidebars render stably between builds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCountIndex {
    counts: HashMap<String, IndexMap<String, usize>>,
}

impl TagCountIndex {
    /// Build the index from post summaries. Empty tags are skipped.
    pub fn from_posts(posts: &[PostSummary]) -> Self {
        let mut counts: HashMap<String, IndexMap<String, usize>> = HashMap::new();

        for post in posts {
            let locale = counts.entry(post.language.clone()).or_default();
            for tag in &post.tags {
                if tag.trim().is_empty() {
                    continue;
                }
                *locale.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        Self { counts }
    }

    /// Tag counts for one locale, in first-appearance order
    pub fn counts_for(&self, locale: &str) -> Option<&IndexMap<String, usize>> {
        self.counts.get(locale)
    }

    /// Whether a tag exists in a locale's index
    pub fn contains(&self, locale: &str, tag: &str) -> bool {
        self.counts
            .get(locale)
            .map(|tags| tags.contains_key(tag))
            .unwrap_or(false)
    }

    /// Occurrence count for a tag in a locale (0 when absent)
    pub fn count(&self, locale: &str, tag: &str) -> usize {
        self.counts
            .get(locale)
            .and_then(|tags| tags.get(tag))
            .copied()
            .unwrap_or(0)
    }

    /// Tags for a locale sorted by descending count, for the tags index page
    pub fn sorted_by_count(&self, locale: &str) -> Vec<(String, usize)> {
        let mut tags: Vec<(String, usize)> = self
            .counts
            .get(locale)
            .map(|t| t.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default();

        tags.sort_by(|a, b| b.1.cmp(&a.1));
        tags
    }

    /// Write the index as a JSON artifact (tag-data.json)
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load the index back from the JSON artifact
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn post(lang: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            slug: format!("post-{}", tags.join("-")),
            date: Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            title: "T".to_string(),
            summary: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            language: lang.to_string(),
            draft: false,
        }
    }

    #[test]
    fn test_counts_per_locale() {
        let posts = vec![
            post("en", &["go", "rust"]),
            post("en", &["go"]),
            post("es", &["go"]),
        ];
        let index = TagCountIndex::from_posts(&posts);

        assert_eq!(index.count("en", "go"), 2);
        assert_eq!(index.count("en", "rust"), 1);
        assert_eq!(index.count("es", "go"), 1);
        assert!(!index.contains("es", "rust"));
    }

    #[test]
    fn test_first_appearance_order() {
        let posts = vec![post("en", &["zig", "ada"]), post("en", &["ada", "c"])];
        let index = TagCountIndex::from_posts(&posts);
        let order: Vec<&str> = index
            .counts_for("en")
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(order, ["zig", "ada", "c"]);
    }

    #[test]
    fn test_sorted_by_count() {
        let posts = vec![
            post("en", &["go"]),
            post("en", &["go", "rust"]),
            post("en", &["go", "rust", "sql"]),
        ];
        let index = TagCountIndex::from_posts(&posts);
        let sorted = index.sorted_by_count("en");
        assert_eq!(sorted[0], ("go".to_string(), 3));
        assert_eq!(sorted[1], ("rust".to_string(), 2));
        assert_eq!(sorted[2], ("sql".to_string(), 1));
    }

    #[test]
    fn test_empty_tags_skipped() {
        let posts = vec![post("en", &["", "  ", "real"])];
        let index = TagCountIndex::from_posts(&posts);
        assert_eq!(index.counts_for("en").unwrap().len(), 1);
        assert!(index.contains("en", "real"));
    }

    #[test]
    fn test_json_round_trip() {
        let posts = vec![post("en", &["go"]), post("es", &["go"])];
        let index = TagCountIndex::from_posts(&posts);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tag-data.json");
        index.write_json(&path).unwrap();

        let loaded = TagCountIndex::load_json(&path).unwrap();
        assert_eq!(loaded.count("en", "go"), 1);
        assert_eq!(loaded.count("es", "go"), 1);
    }
}
