//! Generator module - renders the per-locale static site

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use chrono::Datelike;
use tera::Context;
use walkdir::WalkDir;

use crate::content::{AuthorPage, Post, PostSummary};
use crate::helpers::{
    blog_page_url, format_date, html_escape, localized_url, paginator, tag_index_list, tag_sidebar,
    tag_url, truncate_summary,
};
use crate::listing::{PostListView, SelectionStore, UrlReplace};
use crate::locale::{Locales, Translations};
use crate::taxonomy::TagCountIndex;
use crate::templates::{
    AuthorData, ConfigData, LocaleData, LocaleLink, PostItem, TagLink, TemplateRenderer,
};
use crate::Polyblog;

/// Static site generator using the embedded folio templates
pub struct Generator {
    app: Polyblog,
    renderer: TemplateRenderer,
    locales: Locales,
    translations: Translations,
}

impl Generator {
    /// Create a new generator
    pub fn new(app: &Polyblog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let locales = app.locales();

        let mut translations = Translations::embedded(locales.default_locale());
        translations.load_overrides(app.base_dir.join(&app.config.i18n_dir))?;

        Ok(Self {
            app: app.clone(),
            renderer,
            locales,
            translations,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], authors: &[AuthorPage]) -> Result<()> {
        fs::create_dir_all(&self.app.public_dir)?;

        self.copy_source_assets()?;

        let summaries: Vec<PostSummary> = posts.iter().map(|p| p.summary_record()).collect();
        let tag_index = TagCountIndex::from_posts(&summaries);

        // The tag index is a site-wide artifact, shared by every locale
        tag_index.write_json(self.app.public_dir.join("tag-data.json"))?;

        for locale in self.locales.supported().to_vec() {
            self.generate_locale(&locale, posts, &summaries, &tag_index, authors)?;
        }

        Ok(())
    }

    fn generate_locale(
        &self,
        locale: &str,
        posts: &[Post],
        summaries: &[PostSummary],
        tag_index: &TagCountIndex,
        authors: &[AuthorPage],
    ) -> Result<()> {
        let locale_posts: Vec<&Post> = posts.iter().filter(|p| p.language == locale).collect();

        self.generate_home(locale, summaries)?;
        self.generate_blog_pages(locale, summaries, tag_index)?;
        self.generate_tag_pages(locale, summaries, tag_index)?;
        self.generate_tags_index(locale, tag_index)?;
        self.generate_post_pages(locale, &locale_posts)?;
        self.generate_about(locale, authors)?;
        self.generate_atom_feed(locale, &locale_posts)?;
        self.generate_search_index(locale, summaries)?;

        tracing::info!("Generated locale: {}", locale);
        Ok(())
    }

    /// Output directory for a locale (default locale lives at the root)
    fn locale_dir(&self, locale: &str) -> PathBuf {
        if locale == self.locales.default_locale() {
            self.app.public_dir.clone()
        } else {
            self.app.public_dir.join(locale)
        }
    }

    fn write_page(&self, locale: &str, rel: &str, html: &str) -> Result<()> {
        let output_path = self.locale_dir(locale).join(rel);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Create a base context with the variables every template expects
    fn base_context(&self, locale: &str) -> Context {
        let config = &self.app.config;

        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: config.title_for(locale).to_string(),
                description: config.description_for(locale).to_string(),
                author: config.author.clone(),
                email: config.email.clone(),
                url: config.url.clone(),
                theme: config.theme.clone(),
                analytics_id: config.analytics.umami_website_id.clone(),
                comments_enabled: config.comments.enabled,
                comments_server: config.comments.server_url.clone(),
                github: config.social.github.clone(),
                linkedin: config.social.linkedin.clone(),
                mastodon: config.social.mastodon.clone(),
            },
        );

        let alternates: Vec<LocaleLink> = self
            .locales
            .supported()
            .iter()
            .map(|code| LocaleLink {
                code: code.clone(),
                href: localized_url(config, &self.locales, code, ""),
            })
            .collect();

        context.insert(
            "locale",
            &LocaleData {
                code: locale.to_string(),
                alternates,
                t: self.translations.table_for(locale),
            },
        );

        context.insert("page_title", config.title_for(locale));
        context.insert("page_description", config.description_for(locale));
        context.insert(
            "home_url",
            &localized_url(config, &self.locales, locale, ""),
        );
        context.insert("blog_url", &blog_page_url(config, &self.locales, locale, 1));
        context.insert(
            "tags_url",
            &localized_url(config, &self.locales, locale, &format!("{}/", config.tag_dir)),
        );
        context.insert(
            "about_url",
            &localized_url(config, &self.locales, locale, "about/"),
        );
        context.insert(
            "feed_url",
            &localized_url(config, &self.locales, locale, "atom.xml"),
        );
        context.insert(
            "newsletter_enabled",
            &!config.newsletter.provider.is_empty(),
        );
        context.insert(
            "current_year",
            &chrono::Local::now().year().to_string(),
        );

        context
    }

    /// Convert a summary record into its listing representation
    fn post_item(&self, locale: &str, post: &PostSummary) -> PostItem {
        let config = &self.app.config;
        let blog_url = blog_page_url(config, &self.locales, locale, 1);

        PostItem {
            title: post.title.clone(),
            url: localized_url(
                config,
                &self.locales,
                locale,
                &format!("{}/{}/", config.blog_dir, post.slug),
            ),
            date_display: format_date(&post.date, locale),
            date_iso: post.date.format("%Y-%m-%d").to_string(),
            summary: truncate_summary(&post.summary, config.summary_max_chars),
            tags: post
                .tags
                .iter()
                .map(|tag| TagLink {
                    name: tag.clone(),
                    href: UrlReplace::with_tag(&blog_url, tag).href(),
                })
                .collect(),
        }
    }

    /// Generate the home page: the latest posts plus an "all posts" link
    fn generate_home(&self, locale: &str, summaries: &[PostSummary]) -> Result<()> {
        let view = PostListView::new(
            summaries.to_vec(),
            locale,
            self.app.config.home_posts,
            &blog_page_url(&self.app.config, &self.locales, locale, 1),
            SelectionStore::new(),
        );

        let page = view.page_view();
        let items: Vec<PostItem> = page
            .posts
            .iter()
            .map(|p| self.post_item(locale, p))
            .collect();

        let mut context = self.base_context(locale);
        context.insert("posts", &items);
        context.insert("show_all_link", &(page.total_posts > items.len()));

        let html = self.renderer.render("index.html", &context)?;
        self.write_page(locale, "index.html", &html)
    }

    /// Generate the paginated blog listing with sidebar and search box
    fn generate_blog_pages(
        &self,
        locale: &str,
        summaries: &[PostSummary],
        tag_index: &TagCountIndex,
    ) -> Result<()> {
        let config = &self.app.config;
        let blog_url = blog_page_url(config, &self.locales, locale, 1);

        let mut view = PostListView::new(
            summaries.to_vec(),
            locale,
            config.per_page,
            &blog_url,
            SelectionStore::new(),
        );

        let total_pages = view.total_pages().max(1);
        let sidebar = tag_sidebar(
            config,
            &self.locales,
            locale,
            tag_index,
            None,
            &self.translations.get(locale, "all"),
        );

        for page_num in 1..=total_pages {
            view.set_page(page_num);
            let page = view.page_view();

            let items: Vec<PostItem> = page
                .posts
                .iter()
                .map(|p| self.post_item(locale, p))
                .collect();

            let pagination = paginator(
                config,
                &self.locales,
                locale,
                page_num,
                total_pages,
                &self.translations.get(locale, "previous"),
                &self.translations.get(locale, "next"),
                2,
            );

            let mut context = self.base_context(locale);
            context.insert("posts", &items);
            context.insert("sidebar", &sidebar);
            context.insert("pagination", &pagination);
            context.insert("list_title", &self.translations.get(locale, "allposts"));

            let html = self.renderer.render("list.html", &context)?;

            let rel = if page_num == 1 {
                format!("{}/index.html", config.blog_dir)
            } else {
                format!(
                    "{}/{}/{}/index.html",
                    config.blog_dir, config.pagination_dir, page_num
                )
            };
            self.write_page(locale, &rel, &html)?;
        }

        Ok(())
    }

    /// Generate one listing page per tag, the tag filter pre-applied
    fn generate_tag_pages(
        &self,
        locale: &str,
        summaries: &[PostSummary],
        tag_index: &TagCountIndex,
    ) -> Result<()> {
        let config = &self.app.config;
        let Some(tags) = tag_index.counts_for(locale) else {
            return Ok(());
        };

        let blog_url = blog_page_url(config, &self.locales, locale, 1);

        for tag in tags.keys() {
            let mut view = PostListView::new(
                summaries.to_vec(),
                locale,
                config.per_page,
                &blog_url,
                SelectionStore::new(),
            );
            view.toggle_tag(tag);

            let items: Vec<PostItem> = view
                .filtered()
                .iter()
                .map(|p| self.post_item(locale, p))
                .collect();

            let sidebar = tag_sidebar(
                config,
                &self.locales,
                locale,
                tag_index,
                Some(tag),
                &self.translations.get(locale, "all"),
            );

            let mut context = self.base_context(locale);
            context.insert("posts", &items);
            context.insert("sidebar", &sidebar);
            context.insert("pagination", "");
            context.insert(
                "list_title",
                &format!("{} {}", self.translations.get(locale, "poststagged"), tag),
            );
            context.insert("page_title", tag);

            let html = self.renderer.render("list.html", &context)?;

            let slug = slug::slugify(tag);
            if slug.is_empty() {
                continue;
            }
            self.write_page(locale, &format!("{}/{}/index.html", config.tag_dir, slug), &html)?;
        }

        tracing::info!("Generated {} tag pages for {}", tags.len(), locale);
        Ok(())
    }

    /// Generate the tags index, most-used tags first
    fn generate_tags_index(&self, locale: &str, tag_index: &TagCountIndex) -> Result<()> {
        let tag_list = tag_index_list(&self.app.config, &self.locales, locale, tag_index);

        let mut context = self.base_context(locale);
        context.insert("tag_list", &tag_list);
        context.insert("page_title", &self.translations.get(locale, "tags"));

        let html = self.renderer.render("tags.html", &context)?;
        self.write_page(
            locale,
            &format!("{}/index.html", self.app.config.tag_dir),
            &html,
        )
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, locale: &str, posts: &[&Post]) -> Result<()> {
        let config = &self.app.config;

        for post in posts {
            let tags: Vec<TagLink> = post
                .tags
                .iter()
                .map(|tag| TagLink {
                    name: tag.clone(),
                    href: tag_url(config, &self.locales, locale, tag),
                })
                .collect();

            let mut context = self.base_context(locale);
            context.insert("post_title", &post.title);
            context.insert("post_date_display", &format_date(&post.date, locale));
            context.insert("post_date_iso", &post.date.format("%Y-%m-%d").to_string());
            context.insert("post_content", &post.content);
            context.insert("post_tags", &tags);
            context.insert("page_title", &post.title);
            context.insert("page_description", &post.summary);

            let html = self.renderer.render("post.html", &context)?;
            self.write_page(locale, &format!("{}index.html", post.path), &html)?;
        }

        Ok(())
    }

    /// Generate the about page when the locale has an author page
    fn generate_about(&self, locale: &str, authors: &[AuthorPage]) -> Result<()> {
        let Some(author) = authors.iter().find(|a| a.language == locale) else {
            return Ok(());
        };

        let mut context = self.base_context(locale);
        context.insert(
            "author",
            &AuthorData {
                name: author.name.clone(),
                occupation: author.occupation.clone(),
                company: author.company.clone(),
                avatar: author.avatar.clone(),
                content: author.content.clone(),
            },
        );
        context.insert("page_title", &author.name);

        let html = self.renderer.render("about.html", &context)?;
        self.write_page(locale, "about/index.html", &html)
    }

    /// Generate the locale's Atom feed
    fn generate_atom_feed(&self, locale: &str, posts: &[&Post]) -> Result<()> {
        let config = &self.app.config;
        let base_url = config.url.trim_end_matches('/');
        let prefix = self.locales.prefix(locale);

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!(
            "  <title>{}</title>\n",
            html_escape(config.title_for(locale))
        ));
        feed.push_str(&format!(
            "  <link href=\"{}{}/atom.xml\" rel=\"self\"/>\n",
            base_url, prefix
        ));
        feed.push_str(&format!("  <link href=\"{}{}/\"/>\n", base_url, prefix));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Local::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}{}/</id>\n", base_url, prefix));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            html_escape(&config.author)
        ));

        // Limit to the most recent posts
        for post in posts.iter().take(20) {
            let url = format!(
                "{}{}",
                base_url,
                localized_url(config, &self.locales, locale, &post.path)
            );
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", html_escape(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", url));
            feed.push_str(&format!("    <id>{}</id>\n", url));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                post.date.to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                post.date.to_rfc3339()
            ));

            let content = convert_relative_urls_to_absolute(&post.content, base_url);
            let content = strip_invalid_xml_chars(&content);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                content
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        self.write_page(locale, "atom.xml", &feed)
    }

    /// Generate the locale's search index (JSON)
    fn generate_search_index(&self, locale: &str, summaries: &[PostSummary]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = summaries
            .iter()
            .filter(|p| p.language == locale)
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "title": p.title,
                    "summary": p.summary,
                    "tags": p.tags,
                    "date": p.date.format("%Y-%m-%d").to_string(),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&search_data)?;
        self.write_page(locale, "search.json", &json)
    }

    /// Copy static assets (images, etc.) from source to public
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.app.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if matches!(ext, Some("md") | Some("markdown")) {
                continue;
            }

            // Content directories are processed, not copied
            if path
                .components()
                .any(|c| c.as_os_str() == "_posts" || c.as_os_str() == "about")
            {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            let dest = self.app.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

/// Convert relative URLs in HTML content to absolute URLs
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Strip control characters XML 1.0 does not allow
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;

    fn write_post(dir: &std::path::Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn sample_site() -> (tempfile::TempDir, Polyblog) {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();

        write_post(
            &posts_dir,
            "hello-rust.md",
            "---\ntitle: Hello Rust\ndate: 2024-01-02\nsummary: Intro post\ntags: [rust, beginners]\nlang: en\n---\n\nWelcome.\n",
        );
        write_post(
            &posts_dir,
            "more-rust.md",
            "---\ntitle: More Rust\ndate: 2024-01-03\nsummary: Second post\ntags: [rust]\nlang: en\n---\n\nMore content.\n",
        );
        write_post(
            &posts_dir,
            "hola-rust.md",
            "---\ntitle: Hola Rust\ndate: 2024-01-04\nsummary: Introducción\ntags: [rust]\nlang: es\n---\n\nBienvenidos.\n",
        );

        let about_dir = dir.path().join("source/about");
        fs::create_dir_all(&about_dir).unwrap();
        fs::write(
            about_dir.join("en.md"),
            "---\nname: Jane Smith\noccupation: Engineer\n---\n\nHi there.\n",
        )
        .unwrap();

        let app = Polyblog::new(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_generate_site_tree() {
        let (_dir, app) = sample_site();
        let loader = ContentLoader::new(&app);
        let posts = loader.load_posts().unwrap();
        let authors = loader.load_author_pages().unwrap();

        let generator = Generator::new(&app).unwrap();
        generator.generate(&posts, &authors).unwrap();

        let public = &app.public_dir;

        // Default locale at the root, Spanish under /es/
        assert!(public.join("index.html").exists());
        assert!(public.join("blog/index.html").exists());
        assert!(public.join("blog/hello-rust/index.html").exists());
        assert!(public.join("tags/index.html").exists());
        assert!(public.join("tags/rust/index.html").exists());
        assert!(public.join("about/index.html").exists());
        assert!(public.join("atom.xml").exists());
        assert!(public.join("search.json").exists());
        assert!(public.join("tag-data.json").exists());

        assert!(public.join("es/index.html").exists());
        assert!(public.join("es/blog/index.html").exists());
        assert!(public.join("es/blog/hola-rust/index.html").exists());
        assert!(public.join("es/tags/rust/index.html").exists());
        assert!(public.join("es/atom.xml").exists());

        // No Spanish about page was written, none generated
        assert!(!public.join("es/about/index.html").exists());
    }

    #[test]
    fn test_listing_page_content() {
        let (_dir, app) = sample_site();
        let loader = ContentLoader::new(&app);
        let posts = loader.load_posts().unwrap();

        let generator = Generator::new(&app).unwrap();
        generator.generate(&posts, &[]).unwrap();

        let listing = fs::read_to_string(app.public_dir.join("blog/index.html")).unwrap();
        assert!(listing.contains("Hello Rust"));
        assert!(listing.contains("More Rust"));
        // English listing excludes the Spanish post
        assert!(!listing.contains("Hola Rust"));
        // Sidebar carries per-locale counts
        assert!(listing.contains("rust (2)"));
        assert!(listing.contains("beginners (1)"));

        let spanish = fs::read_to_string(app.public_dir.join("es/blog/index.html")).unwrap();
        assert!(spanish.contains("Hola Rust"));
        assert!(spanish.contains("rust (1)"));
    }

    #[test]
    fn test_tag_data_artifact() {
        let (_dir, app) = sample_site();
        let loader = ContentLoader::new(&app);
        let posts = loader.load_posts().unwrap();

        let generator = Generator::new(&app).unwrap();
        generator.generate(&posts, &[]).unwrap();

        let index = TagCountIndex::load_json(app.public_dir.join("tag-data.json")).unwrap();
        assert_eq!(index.count("en", "rust"), 2);
        assert_eq!(index.count("en", "beginners"), 1);
        assert_eq!(index.count("es", "rust"), 1);
    }

    #[test]
    fn test_atom_feed_escapes_title() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        write_post(
            &posts_dir,
            "ampersand.md",
            "---\ntitle: Tips & Tricks\ndate: 2024-01-01\nsummary: s\n---\n\nBody.\n",
        );

        let app = Polyblog::new(dir.path()).unwrap();
        let loader = ContentLoader::new(&app);
        let posts = loader.load_posts().unwrap();

        let generator = Generator::new(&app).unwrap();
        generator.generate(&posts, &[]).unwrap();

        let feed = fs::read_to_string(app.public_dir.join("atom.xml")).unwrap();
        assert!(feed.contains("Tips &amp; Tricks"));
    }

    #[test]
    fn test_convert_relative_urls() {
        let html = r#"<a href="/blog/x/">x</a> <img src="/img/y.png">"#;
        let converted = convert_relative_urls_to_absolute(html, "https://example.com");
        assert!(converted.contains(r#"href="https://example.com/blog/x/""#));
        assert!(converted.contains(r#"src="https://example.com/img/y.png""#));
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        let dirty = "ok\u{0008}text\n";
        assert_eq!(strip_invalid_xml_chars(dirty), "oktext\n");
    }
}
