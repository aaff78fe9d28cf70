//! List helper functions: tag sidebar, tag index, pagination controls

use crate::config::SiteConfig;
use crate::listing::UrlReplace;
use crate::locale::Locales;
use crate::taxonomy::TagCountIndex;

use super::url::{blog_page_url, tag_url};

/// Generate the tag filter sidebar shown next to the post listing.
///
/// Each entry is rendered as `tag (count)` and links to the listing page with
/// the `tag` query parameter set; the active tag gets an `active` class and
/// the "all" entry links back to the bare listing.
pub fn tag_sidebar(
    config: &SiteConfig,
    locales: &Locales,
    locale: &str,
    index: &TagCountIndex,
    selected: Option<&str>,
    all_label: &str,
) -> String {
    let blog_url = blog_page_url(config, locales, locale, 1);

    let all_class = if selected.is_none() {
        "tag-all active"
    } else {
        "tag-all"
    };
    let mut html = format!(
        r#"<div class="tag-sidebar"><a class="{}" href="{}">{}</a>"#,
        all_class, blog_url, all_label
    );

    if let Some(tags) = index.counts_for(locale) {
        html.push_str(r#"<ul class="tag-list">"#);
        for (tag, count) in tags {
            let href = UrlReplace::with_tag(&blog_url, tag).href();
            let class = if selected == Some(tag.as_str()) {
                "tag-list-link active"
            } else {
                "tag-list-link"
            };
            html.push_str(&format!(
                r#"<li class="tag-list-item"><a class="{}" href="{}">{} ({})</a></li>"#,
                class, href, tag, count
            ));
        }
        html.push_str("</ul>");
    }

    html.push_str("</div>");
    html
}

/// Generate the tags index listing, most-used tags first
pub fn tag_index_list(
    config: &SiteConfig,
    locales: &Locales,
    locale: &str,
    index: &TagCountIndex,
) -> String {
    let tags = index.sorted_by_count(locale);
    if tags.is_empty() {
        return String::new();
    }

    let mut html = r#"<ul class="tag-cloud">"#.to_string();
    for (tag, count) in tags {
        let href = tag_url(config, locales, locale, &tag);
        html.push_str(&format!(
            r#"<li class="tag-cloud-item"><a class="tag-cloud-link" href="{}">{}</a><span class="tag-cloud-count">({})</span></li>"#,
            href, tag, count
        ));
    }
    html.push_str("</ul>");
    html
}

/// Generate the pagination controls for the blog listing
pub fn paginator(
    config: &SiteConfig,
    locales: &Locales,
    locale: &str,
    current: usize,
    total: usize,
    prev_text: &str,
    next_text: &str,
    mid_size: usize,
) -> String {
    if total <= 1 {
        return String::new();
    }

    let page_url = |page: usize| blog_page_url(config, locales, locale, page);

    let mut html = r#"<nav class="pagination">"#.to_string();

    // Previous link
    if current > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-prev" href="{}">{}</a>"#,
            page_url(current - 1),
            prev_text
        ));
    } else {
        html.push_str(&format!(
            r#"<span class="pagination-prev disabled">{}</span>"#,
            prev_text
        ));
    }

    // Page numbers
    html.push_str(r#"<span class="pagination-numbers">"#);

    let start = current.saturating_sub(mid_size).max(1);
    let end = (current + mid_size).min(total);

    if start > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">1</a>"#,
            page_url(1)
        ));
        if start > 2 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
    }

    for page in start..=end {
        if page == current {
            html.push_str(&format!(
                r#"<span class="pagination-number current">{}</span>"#,
                page
            ));
        } else {
            html.push_str(&format!(
                r#"<a class="pagination-number" href="{}">{}</a>"#,
                page_url(page),
                page
            ));
        }
    }

    if end < total {
        if end < total - 1 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
        html.push_str(&format!(
            r#"<a class="pagination-number" href="{}">{}</a>"#,
            page_url(total),
            total
        ));
    }

    html.push_str("</span>");

    // Next link
    if current < total {
        html.push_str(&format!(
            r#"<a class="pagination-next" href="{}">{}</a>"#,
            page_url(current + 1),
            next_text
        ));
    } else {
        html.push_str(&format!(
            r#"<span class="pagination-next disabled">{}</span>"#,
            next_text
        ));
    }

    html.push_str("</nav>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostSummary;
    use chrono::{Local, TimeZone};

    fn setup() -> (SiteConfig, Locales, TagCountIndex) {
        let config = SiteConfig::default();
        let locales = config.locale.to_locales();
        let posts = vec![
            PostSummary {
                slug: "a".into(),
                date: Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                title: "A".into(),
                summary: String::new(),
                tags: vec!["rust".into(), "web".into()],
                language: "en".into(),
                draft: false,
            },
            PostSummary {
                slug: "b".into(),
                date: Local.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                title: "B".into(),
                summary: String::new(),
                tags: vec!["rust".into()],
                language: "en".into(),
                draft: false,
            },
        ];
        let index = TagCountIndex::from_posts(&posts);
        (config, locales, index)
    }

    #[test]
    fn test_tag_sidebar_counts_and_links() {
        let (config, locales, index) = setup();
        let html = tag_sidebar(&config, &locales, "en", &index, Some("rust"), "All posts");

        assert!(html.contains("rust (2)"));
        assert!(html.contains("web (1)"));
        assert!(html.contains(r#"href="/blog/?tag=rust""#));
        assert!(html.contains("tag-list-link active"));
        assert!(html.contains(r#"href="/blog/""#));
    }

    #[test]
    fn test_tag_index_sorted_by_count() {
        let (config, locales, index) = setup();
        let html = tag_index_list(&config, &locales, "en", &index);
        let rust_pos = html.find("rust").unwrap();
        let web_pos = html.find("web").unwrap();
        assert!(rust_pos < web_pos);
        assert!(html.contains(r#"href="/tags/rust/""#));
    }

    #[test]
    fn test_paginator_single_page_is_empty() {
        let (config, locales, _) = setup();
        assert!(paginator(&config, &locales, "en", 1, 1, "Prev", "Next", 2).is_empty());
    }

    #[test]
    fn test_paginator_links() {
        let (config, locales, _) = setup();
        let html = paginator(&config, &locales, "en", 2, 3, "Prev", "Next", 2);

        assert!(html.contains(r#"href="/blog/""#));
        assert!(html.contains(r#"href="/blog/page/3/""#));
        assert!(html.contains(r#"<span class="pagination-number current">2</span>"#));
    }
}
