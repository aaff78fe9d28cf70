//! Built-in folio theme templates using the Tera template engine
//!
//! All templates are embedded directly in the binary, so a site needs no
//! theme directory on disk.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded folio theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all folio templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // The generator emits pre-built HTML fragments (sidebar, pagination,
        // post bodies); autoescaping would mangle them.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("folio/layout.html")),
            ("index.html", include_str!("folio/index.html")),
            ("list.html", include_str!("folio/list.html")),
            ("post.html", include_str!("folio/post.html")),
            ("tags.html", include_str!("folio/tags.html")),
            ("about.html", include_str!("folio/about.html")),
            (
                "partials/header.html",
                include_str!("folio/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("folio/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_html(&s)))
}

/// Site-wide values available to every template
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: String,
    pub url: String,
    pub theme: String,
    pub analytics_id: Option<String>,
    pub comments_enabled: bool,
    pub comments_server: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub mastodon: Option<String>,
}

/// The active locale, its translation table and links to the alternates
#[derive(Debug, Clone, Serialize)]
pub struct LocaleData {
    pub code: String,
    /// URL of this page in each supported locale
    pub alternates: Vec<LocaleLink>,
    /// Translated UI strings for this locale
    pub t: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocaleLink {
    pub code: String,
    pub href: String,
}

/// One post as shown on home and listing pages
#[derive(Debug, Clone, Serialize)]
pub struct PostItem {
    pub title: String,
    pub url: String,
    pub date_display: String,
    pub date_iso: String,
    pub summary: String,
    pub tags: Vec<TagLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub href: String,
}

/// Author page data for the about template
#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub occupation: String,
    pub company: String,
    pub avatar: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Test Blog".to_string(),
                description: "A test".to_string(),
                author: "Tester".to_string(),
                email: String::new(),
                url: "http://example.com".to_string(),
                theme: "system".to_string(),
                analytics_id: None,
                comments_enabled: false,
                comments_server: String::new(),
                github: None,
                linkedin: None,
                mastodon: None,
            },
        );
        let mut t = HashMap::new();
        for key in [
            "greeting",
            "description",
            "search",
            "all",
            "allposts",
            "noposts",
            "tags",
            "about",
            "blog",
            "home",
            "subscribe",
            "newsletter",
            "email",
            "published",
            "poststagged",
        ] {
            t.insert(key.to_string(), key.to_string());
        }
        context.insert(
            "locale",
            &LocaleData {
                code: "en".to_string(),
                alternates: vec![LocaleLink {
                    code: "es".to_string(),
                    href: "/es/".to_string(),
                }],
                t,
            },
        );
        context.insert("page_title", "Test Blog");
        context.insert("page_description", "A test");
        context.insert("home_url", "/");
        context.insert("blog_url", "/blog/");
        context.insert("tags_url", "/tags/");
        context.insert("about_url", "/about/");
        context.insert("feed_url", "/atom.xml");
        context.insert("newsletter_enabled", &false);
        context.insert("current_year", "2024");
        context
    }

    #[test]
    fn test_render_list_template() {
        let renderer = TemplateRenderer::new().unwrap();

        let mut context = base_context();
        context.insert(
            "posts",
            &vec![PostItem {
                title: "Hello".to_string(),
                url: "/blog/hello/".to_string(),
                date_display: "January 1, 2024".to_string(),
                date_iso: "2024-01-01".to_string(),
                summary: "A greeting.".to_string(),
                tags: vec![TagLink {
                    name: "rust".to_string(),
                    href: "/blog/?tag=rust".to_string(),
                }],
            }],
        );
        context.insert("sidebar", r#"<div class="tag-sidebar"></div>"#);
        context.insert("pagination", "");
        context.insert("list_title", "All posts");

        let html = renderer.render("list.html", &context).unwrap();
        assert!(html.contains("Hello"));
        assert!(html.contains("/blog/hello/"));
        assert!(html.contains("tag-sidebar"));
        assert!(html.contains("January 1, 2024"));
    }

    #[test]
    fn test_render_empty_list_shows_noposts() {
        let renderer = TemplateRenderer::new().unwrap();

        let mut context = base_context();
        context.insert("posts", &Vec::<PostItem>::new());
        context.insert("sidebar", "");
        context.insert("pagination", "");
        context.insert("list_title", "All posts");

        let html = renderer.render("list.html", &context).unwrap();
        assert!(html.contains("noposts"));
    }

    #[test]
    fn test_render_post_template() {
        let renderer = TemplateRenderer::new().unwrap();

        let mut context = base_context();
        context.insert("post_title", "Hello");
        context.insert("post_date_display", "January 1, 2024");
        context.insert("post_date_iso", "2024-01-01");
        context.insert("post_content", "<p>Body</p>");
        context.insert(
            "post_tags",
            &vec![TagLink {
                name: "rust".to_string(),
                href: "/tags/rust/".to_string(),
            }],
        );

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("rust"));
    }
}
