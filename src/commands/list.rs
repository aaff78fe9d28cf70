//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::PostSummary;
use crate::listing::{PostListView, SelectionStore, TagQueryState};
use crate::taxonomy::TagCountIndex;
use crate::Polyblog;

/// Filters for the `list post` command
#[derive(Debug, Default)]
pub struct ListFilters<'a> {
    pub locale: Option<&'a str>,
    pub tag: Option<&'a str>,
    pub search: Option<&'a str>,
    pub page: Option<usize>,
}

/// List site content by type
pub fn run(app: &Polyblog, content_type: &str, filters: &ListFilters<'_>) -> Result<()> {
    let loader = ContentLoader::new(app);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            let summaries: Vec<PostSummary> =
                posts.iter().map(|p| p.summary_record()).collect();
            list_posts(app, summaries, filters);
        }
        "tag" | "tags" => {
            let posts = loader.load_posts()?;
            let summaries: Vec<PostSummary> =
                posts.iter().map(|p| p.summary_record()).collect();
            let index = TagCountIndex::from_posts(&summaries);

            let locale = filters.locale.unwrap_or(&app.config.locale.default);
            let tags = index.sorted_by_count(locale);
            println!("Tags for {} ({}):", locale, tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

/// Print one page of the filtered post listing
fn list_posts(app: &Polyblog, summaries: Vec<PostSummary>, filters: &ListFilters<'_>) {
    let locale = filters.locale.unwrap_or(&app.config.locale.default);
    let index = TagCountIndex::from_posts(&summaries);

    let mut view = PostListView::new(
        summaries,
        locale,
        app.config.per_page,
        "/blog/",
        SelectionStore::new(),
    );

    // The --tag flag runs through the same validation as a URL parameter:
    // an unknown tag silently clears the filter.
    let (state, _) = view.initialize_from_url(&index, filters.tag);
    if let (Some(requested), TagQueryState::Cleared) = (filters.tag, &state) {
        println!("(tag '{}' not found for {}, showing all)", requested, locale);
    }

    if let Some(search) = filters.search {
        view.set_search(search);
    }
    if let Some(page) = filters.page {
        view.set_page(page);
    }

    let page = view.page_view();

    println!(
        "Posts for {} (page {}/{}, {} total):",
        locale,
        page.current_page,
        page.total_pages.max(1),
        page.total_posts
    );
    for post in &page.posts {
        println!(
            "  {} - {} [{}]",
            post.date.format("%Y-%m-%d"),
            post.title,
            post.tags.join(", ")
        );
    }
}
