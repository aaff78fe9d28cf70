//! URL query synchronization for the selected tag
//!
//! The URL is write-only from view state: tag toggles emit a [`UrlReplace`]
//! command the caller executes (replace-style, no history entry). The URL is
//! read exactly once, at mount, through the validation state machine
//! `Uninitialized -> Validating(tag) -> Applied(tag) | Cleared`.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// The query parameter carrying the selected tag
pub const TAG_PARAM: &str = "tag";

/// Characters escaped in query parameter values
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// A replace-style navigation command: rewrite the current URL in place
/// without pushing a history entry, keeping back-button behavior focused on
/// page-level navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReplace {
    pub pathname: String,
    pub query: Vec<(String, String)>,
}

impl UrlReplace {
    /// Rewrite to the bare pathname, dropping any query string
    pub fn path(pathname: &str) -> Self {
        Self {
            pathname: pathname.to_string(),
            query: Vec::new(),
        }
    }

    /// Rewrite to the pathname with a `tag` parameter
    pub fn with_tag(pathname: &str, tag: &str) -> Self {
        Self {
            pathname: pathname.to_string(),
            query: vec![(TAG_PARAM.to_string(), tag.to_string())],
        }
    }

    /// The full relative URL this command navigates to
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            return self.pathname.clone();
        }

        let params = self
            .query
            .iter()
            .map(|(key, value)| {
                format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE))
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.pathname, params)
    }
}

/// Progress of the one-shot URL-tag validation performed at mount.
///
/// A tag parameter absent from the active locale's index is a correctable
/// condition, not an error: the filter is cleared and the URL rewritten
/// without the stale parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQueryState {
    /// No validation has run yet
    Uninitialized,
    /// A URL tag is being checked against the tag index
    Validating(String),
    /// The URL tag was valid and is now the active filter
    Applied(String),
    /// No filter is active (no parameter, or the parameter was invalid)
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_without_query() {
        let cmd = UrlReplace::path("/blog");
        assert_eq!(cmd.href(), "/blog");
    }

    #[test]
    fn test_href_with_tag() {
        let cmd = UrlReplace::with_tag("/es/blog", "rust");
        assert_eq!(cmd.href(), "/es/blog?tag=rust");
    }

    #[test]
    fn test_href_encodes_value() {
        let cmd = UrlReplace::with_tag("/blog", "c++ tips");
        assert_eq!(cmd.href(), "/blog?tag=c%2B%2B%20tips");
    }
}
