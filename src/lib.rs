//! polyblog: a localized static blog generator
//!
//! This crate turns a tree of markdown posts (English and Spanish out of the
//! box) into a static blog with per-locale home, listing, tag and about
//! pages, rendered with embedded Tera templates. It also ships a development
//! server with live reload, a newsletter subscription proxy and a live
//! post-listing endpoint.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod listing;
pub mod locale;
pub mod newsletter;
pub mod server;
pub mod taxonomy;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main polyblog application
#[derive(Clone)]
pub struct Polyblog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Source directory
    pub source_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Polyblog {
    /// Create a new polyblog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        })
    }

    /// The locale set this site is configured for
    pub fn locales(&self) -> locale::Locales {
        self.config.locale.to_locales()
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, lang: Option<&str>) -> Result<()> {
        commands::new::run(self, title, lang)
    }
}
