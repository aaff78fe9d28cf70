//! URL helper functions

use crate::config::SiteConfig;
use crate::locale::Locales;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a locale-scoped URL: the default locale carries no prefix
///
/// # Examples
/// ```ignore
/// localized_url(&config, &locales, "es", "blog/") // -> "/es/blog/"
/// localized_url(&config, &locales, "en", "blog/") // -> "/blog/"
/// ```
pub fn localized_url(config: &SiteConfig, locales: &Locales, locale: &str, path: &str) -> String {
    let prefix = locales.prefix(locale);
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        url_for(config, &format!("{}/", prefix))
    } else {
        url_for(config, &format!("{}/{}", prefix, path))
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// URL of a locale's tag page
pub fn tag_url(config: &SiteConfig, locales: &Locales, locale: &str, tag: &str) -> String {
    let slug = slug::slugify(tag);
    localized_url(
        config,
        locales,
        locale,
        &format!("{}/{}/", config.tag_dir, slug),
    )
}

/// URL of a locale's blog listing page (page 1 is the listing root)
pub fn blog_page_url(config: &SiteConfig, locales: &Locales, locale: &str, page: usize) -> String {
    if page <= 1 {
        localized_url(config, locales, locale, &format!("{}/", config.blog_dir))
    } else {
        localized_url(
            config,
            locales,
            locale,
            &format!("{}/{}/{}/", config.blog_dir, config.pagination_dir, page),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> (SiteConfig, Locales) {
        let config = SiteConfig::default();
        let locales = config.locale.to_locales();
        (config, locales)
    }

    #[test]
    fn test_url_for() {
        let (config, _) = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/about/");
    }

    #[test]
    fn test_url_for_with_root() {
        let (mut config, _) = test_config();
        config.root = "/site/".to_string();
        assert_eq!(url_for(&config, "/about/"), "/site/about/");
    }

    #[test]
    fn test_localized_url() {
        let (config, locales) = test_config();
        assert_eq!(localized_url(&config, &locales, "en", "blog/"), "/blog/");
        assert_eq!(localized_url(&config, &locales, "es", "blog/"), "/es/blog/");
        assert_eq!(localized_url(&config, &locales, "es", ""), "/es/");
        assert_eq!(localized_url(&config, &locales, "en", ""), "/");
    }

    #[test]
    fn test_tag_url() {
        let (config, locales) = test_config();
        assert_eq!(
            tag_url(&config, &locales, "es", "Data Science"),
            "/es/tags/data-science/"
        );
    }

    #[test]
    fn test_blog_page_url() {
        let (config, locales) = test_config();
        assert_eq!(blog_page_url(&config, &locales, "en", 1), "/blog/");
        assert_eq!(blog_page_url(&config, &locales, "en", 3), "/blog/page/3/");
        assert_eq!(
            blog_page_url(&config, &locales, "es", 2),
            "/es/blog/page/2/"
        );
    }

    #[test]
    fn test_full_url_for() {
        let (config, _) = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "http://example.com/about/"
        );
    }
}
