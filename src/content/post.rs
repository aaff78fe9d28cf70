//! Post and author page models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// One-paragraph summary shown on listing pages
    pub summary: String,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Locale this post belongs to
    pub language: String,

    /// Whether the post is an unpublished draft
    pub draft: bool,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without locale prefix), e.g. "blog/my-post/"
    pub path: String,

    /// Slug (URL-friendly name, from the file stem)
    pub slug: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            title,
            date,
            summary: String::new(),
            raw: String::new(),
            content: String::new(),
            tags: Vec::new(),
            language: String::new(),
            draft: false,
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            slug,
            extra: HashMap::new(),
        }
    }

    /// The metadata record the listing component consumes
    pub fn summary_record(&self) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            date: self.date,
            title: self.title.clone(),
            summary: self.summary.clone(),
            tags: self.tags.clone(),
            language: self.language.clone(),
            draft: self.draft,
        }
    }
}

/// The metadata record for one article, excluding full body content.
///
/// Produced by the loader, consumed read-only by the listing component and
/// the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Unique identifier within a locale
    pub slug: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Display title
    pub title: String,

    /// Display summary
    pub summary: String,

    /// Tags, insertion order preserved for display
    pub tags: Vec<String>,

    /// Locale code this record belongs to
    pub language: String,

    /// Drafts are excluded upstream; carried for completeness
    #[serde(default)]
    pub draft: bool,
}

impl PostSummary {
    /// Case-insensitive free-text match against title, summary and tags
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let haystack = format!("{}{}{}", self.title, self.summary, self.tags.join(" "));
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// An author/about page for one locale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPage {
    /// Author display name
    pub name: String,

    /// Occupation line under the name
    pub occupation: String,

    /// Company or affiliation
    pub company: String,

    /// Avatar image path
    pub avatar: String,

    /// Rendered HTML body
    pub content: String,

    /// Locale this page belongs to
    pub language: String,

    /// Source file path (relative)
    pub source: String,
}
