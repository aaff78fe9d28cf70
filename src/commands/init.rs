//! Initialize a new polyblog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Polyblog;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;
    fs::create_dir_all(target_dir.join("source/about"))?;
    fs::create_dir_all(target_dir.join("source/static"))?;
    fs::create_dir_all(target_dir.join("i18n"))?;

    // Create default _config.yml
    let config_content = r#"# Polyblog Configuration

# Site
title: Polyblog
description: Software development, web development, lifehacks, and more.
keywords:
author: John Doe
email: ''

# URL
url: http://example.com
root: /

# Locales: the default locale's URLs carry no prefix
locale:
  default: en
  supported: [en, es]

# Per-locale title/description overrides
metadata:
  es:
    description: Desarrollo de software, desarrollo web, trucos de vida, y más.

# Directory
source_dir: source
public_dir: public
blog_dir: blog
tag_dir: tags
i18n_dir: i18n

# Writing
new_post_name: :title.md
render_drafts: false
highlight:
  theme: base16-ocean.dark
  line_number: true

# Listing
per_page: 5
pagination_dir: page
home_posts: 5
summary_max_chars: 149

# Appearance: system, dark or light
theme: system

# Newsletter (credentials via EMAILOCTOPUS_API_KEY / EMAILOCTOPUS_LIST_ID)
newsletter:
  provider: emailoctopus
  api_url: https://emailoctopus.com/api/1.6/

# Analytics
analytics:
  umami_website_id:

# Comments
comments:
  enabled: false
  server_url: ''

# Social
social:
  github:
  linkedin:
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Sample posts, one per locale
    let now = chrono::Local::now();
    let sample_en = format!(
        r#"---
title: Hello World
date: {}
summary: Your first post, with tags, search and pagination already wired up.
tags:
  - getting-started
lang: en
---

Welcome to your new blog! Edit this post under `source/_posts`, then run:

```bash
$ polyblog generate
$ polyblog server
```

Posts tagged the same way are counted per locale and show up in the tag
sidebar of the blog listing.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    let sample_es = format!(
        r#"---
title: Hola Mundo
date: {}
summary: Tu primera publicación, con etiquetas, búsqueda y paginación.
tags:
  - getting-started
lang: es
---

¡Bienvenido a tu nuevo blog! Edita esta publicación en `source/_posts` y
ejecuta `polyblog generate`.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("source/_posts/hello-world.md"), sample_en)?;
    fs::write(target_dir.join("source/_posts/hola-mundo.md"), sample_es)?;

    // About pages
    let about_en = r#"---
name: John Doe
occupation: Software Engineer
company: ''
avatar: /static/avatar.png
---

Write something about yourself here.
"#;
    let about_es = r#"---
name: John Doe
occupation: Ingeniero de Software
company: ''
avatar: /static/avatar.png
---

Escribe algo sobre ti aquí.
"#;

    fs::write(target_dir.join("source/about/en.md"), about_en)?;
    fs::write(target_dir.join("source/about/es.md"), about_es)?;

    Ok(())
}

/// Run the init command with an existing instance
pub fn run(app: &Polyblog) -> Result<()> {
    init_site(&app.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_site_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir.path().join("source/_posts/hello-world.md").exists());
        assert!(dir.path().join("source/_posts/hola-mundo.md").exists());
        assert!(dir.path().join("source/about/en.md").exists());

        // The generated config parses back
        let app = Polyblog::new(dir.path()).unwrap();
        assert_eq!(app.config.locale.supported, vec!["en", "es"]);
    }
}
