//! The post list view: locale/search/tag filtering plus pagination

use crate::content::PostSummary;
use crate::taxonomy::TagCountIndex;

use super::query::{TagQueryState, UrlReplace};
use super::selection::SelectionStore;

/// One visible page of a filtered post list
#[derive(Debug)]
pub struct PageView<'a> {
    /// The posts in the current page window, newest first
    pub posts: Vec<&'a PostSummary>,
    /// 1-based page number
    pub current_page: usize,
    /// Page count over the filtered posts
    pub total_pages: usize,
    /// Filtered post count across all pages
    pub total_posts: usize,
}

/// Interactive state over an immutable, pre-built post collection.
///
/// The view owns `current_page` and `search_value`; the selected tag lives in
/// the injected [`SelectionStore`] so that sibling views (a tag cloud widget,
/// another list) observe the same selection. Every read derives the filtered
/// set and page window fresh from current state.
pub struct PostListView {
    posts: Vec<PostSummary>,
    locale: String,
    per_page: usize,
    pathname: String,
    selection: SelectionStore,
    current_page: usize,
    search_value: String,
    query_state: TagQueryState,
}

impl PostListView {
    /// Create a view over a post collection.
    ///
    /// Posts are sorted by date descending once, with a stable sort: records
    /// sharing a timestamp keep their input order. `pathname` is the listing
    /// page's own URL path, used when emitting URL commands.
    pub fn new(
        posts: Vec<PostSummary>,
        locale: &str,
        per_page: usize,
        pathname: &str,
        selection: SelectionStore,
    ) -> Self {
        let mut posts = posts;
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Self {
            posts,
            locale: locale.to_string(),
            per_page,
            pathname: pathname.to_string(),
            selection,
            current_page: 1,
            search_value: String::new(),
            query_state: TagQueryState::Uninitialized,
        }
    }

    /// Consume the URL's tag parameter, once, at mount.
    ///
    /// Runs `Uninitialized -> Validating(tag) -> Applied | Cleared`: a tag
    /// present in the locale's index becomes the initial selection and is
    /// echoed back into the URL; an unknown tag clears the filter and yields
    /// a command that removes the stale parameter. Both outcomes are silent.
    pub fn initialize_from_url(
        &mut self,
        index: &TagCountIndex,
        url_tag: Option<&str>,
    ) -> (TagQueryState, Option<UrlReplace>) {
        if self.query_state != TagQueryState::Uninitialized {
            return (self.query_state.clone(), None);
        }

        let tag = match url_tag {
            Some(tag) if !tag.is_empty() => tag.to_string(),
            _ => {
                self.query_state = TagQueryState::Cleared;
                return (TagQueryState::Cleared, None);
            }
        };

        self.query_state = TagQueryState::Validating(tag.clone());

        let command = if index.contains(&self.locale, &tag) {
            self.selection.set(&tag);
            self.current_page = 1;
            let command = UrlReplace::with_tag(&self.pathname, &tag);
            self.query_state = TagQueryState::Applied(tag);
            command
        } else {
            self.selection.clear();
            self.current_page = 1;
            self.query_state = TagQueryState::Cleared;
            UrlReplace::path(&self.pathname)
        };

        (self.query_state.clone(), Some(command))
    }

    /// The outcome of the mount-time URL validation
    pub fn query_state(&self) -> &TagQueryState {
        &self.query_state
    }

    /// Update the free-text filter
    pub fn set_search(&mut self, value: &str) {
        self.search_value = value.to_string();
    }

    /// Move to a 1-based page; values below 1 snap to the first page
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Toggle a tag: selecting the selected tag clears the filter, anything
    /// else replaces the selection. Either way the view returns to page 1 and
    /// emits the replace-style URL command reflecting the new state.
    pub fn toggle_tag(&mut self, tag: &str) -> UrlReplace {
        self.current_page = 1;

        if self.selection.is_selected(tag) {
            self.selection.clear();
            UrlReplace::path(&self.pathname)
        } else {
            self.selection.set(tag);
            UrlReplace::with_tag(&self.pathname, tag)
        }
    }

    /// Clear the tag filter and return to page 1
    pub fn clear_tag(&mut self) -> UrlReplace {
        self.selection.clear();
        self.current_page = 1;
        UrlReplace::path(&self.pathname)
    }

    pub fn selected_tag(&self) -> Option<String> {
        self.selection.selected()
    }

    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Posts restricted to the active locale, search text and selected tag
    pub fn filtered(&self) -> Vec<&PostSummary> {
        let selected = self.selection.selected();

        self.posts
            .iter()
            .filter(|post| post.language == self.locale)
            .filter(|post| post.matches_search(&self.search_value))
            .filter(|post| match &selected {
                Some(tag) => post.tags.iter().any(|t| t == tag),
                None => true,
            })
            .collect()
    }

    /// Page count over the filtered posts
    pub fn total_pages(&self) -> usize {
        if self.per_page == 0 {
            return 0;
        }
        self.filtered().len().div_ceil(self.per_page)
    }

    /// The current page window over the filtered posts.
    ///
    /// The window is the contiguous slice
    /// `[(page-1)*per_page, page*per_page)` clipped to the filtered extent;
    /// a page past the end is an empty window, never an error.
    pub fn page_view(&self) -> PageView<'_> {
        let filtered = self.filtered();
        let total_posts = filtered.len();
        let total_pages = if self.per_page == 0 {
            0
        } else {
            total_posts.div_ceil(self.per_page)
        };

        let start = (self.current_page - 1).saturating_mul(self.per_page);
        let end = start.saturating_add(self.per_page).min(total_posts);
        let posts = if start < total_posts {
            filtered[start..end].to_vec()
        } else {
            Vec::new()
        };

        PageView {
            posts,
            current_page: self.current_page,
            total_pages,
            total_posts,
        }
    }
}

impl Drop for PostListView {
    /// Navigating away must not leak the filter into an unrelated view that
    /// shares the store.
    fn drop(&mut self) {
        self.selection.clear();
    }
}
