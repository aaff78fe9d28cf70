//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::locale::Locales;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub author: String,
    pub email: String,

    // URL
    pub url: String,
    pub root: String,

    // Locales
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Per-locale title/description overrides, keyed by locale code
    #[serde(default)]
    pub metadata: HashMap<String, LocaleMetadata>,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub blog_dir: String,
    pub tag_dir: String,
    pub i18n_dir: String,

    // Writing
    pub new_post_name: String,
    pub render_drafts: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Listing
    pub per_page: usize,
    pub pagination_dir: String,
    /// How many posts the home page shows before linking to the full listing
    pub home_posts: usize,
    /// Display truncation for post summaries on listing pages
    pub summary_max_chars: usize,

    // Appearance: system, dark or light
    pub theme: String,

    // Third-party widgets
    #[serde(default)]
    pub newsletter: NewsletterConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
    #[serde(default)]
    pub social: SocialConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Polyblog".to_string(),
            description: String::new(),
            keywords: None,
            author: "John Doe".to_string(),
            email: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            locale: LocaleConfig::default(),
            metadata: HashMap::new(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),
            tag_dir: "tags".to_string(),
            i18n_dir: "i18n".to_string(),

            new_post_name: ":title.md".to_string(),
            render_drafts: false,
            highlight: HighlightConfig::default(),

            per_page: 5,
            pagination_dir: "page".to_string(),
            home_posts: 5,
            summary_max_chars: 149,

            theme: "system".to_string(),

            newsletter: NewsletterConfig::default(),
            analytics: AnalyticsConfig::default(),
            comments: CommentsConfig::default(),
            social: SocialConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site title for a locale, falling back to the site-wide title
    pub fn title_for(&self, locale: &str) -> &str {
        self.metadata
            .get(locale)
            .and_then(|m| m.title.as_deref())
            .unwrap_or(&self.title)
    }

    /// Site description for a locale, falling back to the site-wide one
    pub fn description_for(&self, locale: &str) -> &str {
        self.metadata
            .get(locale)
            .and_then(|m| m.description.as_deref())
            .unwrap_or(&self.description)
    }
}

/// Locale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Default locale; its URLs carry no locale prefix
    pub default: String,
    /// All supported locales, default first
    pub supported: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: "en".to_string(),
            supported: vec!["en".to_string(), "es".to_string()],
        }
    }
}

impl LocaleConfig {
    pub fn to_locales(&self) -> Locales {
        Locales::new(&self.default, &self.supported)
    }
}

/// Per-locale site metadata overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Newsletter provider configuration
///
/// Credentials are environment variables, never config file entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub provider: String,
    pub api_url: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            provider: "emailoctopus".to_string(),
            api_url: "https://emailoctopus.com/api/1.6/".to_string(),
        }
    }
}

/// Analytics widget configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub umami_website_id: Option<String>,
}

/// Comment widget configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enabled: bool,
    pub server_url: String,
}

/// Social profile links shown in the footer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub mastodon: Option<String>,
}
