//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Polyblog;

/// Create a new post for a locale
pub fn create_post(app: &Polyblog, title: &str, lang: Option<&str>) -> Result<()> {
    let now = chrono::Local::now();
    let lang = lang.unwrap_or(&app.config.locale.default);

    let locales = app.locales();
    if !locales.is_supported(lang) {
        anyhow::bail!(
            "Unknown locale: {}. Configured: {}",
            lang,
            locales.supported().join(", ")
        );
    }

    let target_dir = app.source_dir.join("_posts");
    fs::create_dir_all(&target_dir)?;

    let slug = slug::slugify(title);
    let filename = app
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string());

    let file_path = target_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        r#"---
title: {}
date: {}
summary:
tags:
lang: {}
draft: true
---
"#,
        title,
        now.format("%Y-%m-%d %H:%M:%S"),
        lang
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Run the new command
pub fn run(app: &Polyblog, title: &str, lang: Option<&str>) -> Result<()> {
    create_post(app, title, lang)
}
