//! Content loader - loads posts and author pages from the source directory

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{AuthorPage, FrontMatter, MarkdownRenderer, Post};
use crate::Polyblog;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    app: &'a Polyblog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(app: &'a Polyblog) -> Self {
        let renderer = MarkdownRenderer::with_options(&app.config.highlight);
        Self { app, renderer }
    }

    /// Load all posts from source/_posts, newest first.
    ///
    /// Drafts are filtered here, upstream of everything that consumes post
    /// records, unless `render_drafts` is set.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.app.source_dir.join("_posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => {
                        if !post.draft || self.app.config.render_drafts {
                            posts.push(post);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        // Fall back to file mtime, then now, when no date is declared
        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t));

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(&self.app.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // The slug comes from the file stem, so permalinks survive retitling
        let slug = slug::slugify(
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled"),
        );

        let language = fm
            .lang
            .clone()
            .unwrap_or_else(|| self.app.config.locale.default.clone());

        let content_html = self.renderer.render(body)?;

        let mut post = Post::new(title, date, source);
        post.summary = fm.summary.clone().unwrap_or_default();
        post.raw = body.to_string();
        post.content = content_html;
        post.tags = fm.tags;
        post.language = language;
        post.draft = fm.draft;
        post.full_source = path.to_path_buf();
        post.path = format!("{}/{}/", self.app.config.blog_dir, slug);
        post.slug = slug;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Load author pages from source/about/<locale>.md
    pub fn load_author_pages(&self) -> Result<Vec<AuthorPage>> {
        let about_dir = self.app.source_dir.join("about");
        if !about_dir.exists() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();

        for entry in fs::read_dir(&about_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(&path) {
                continue;
            }

            let locale = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            match self.load_author_page(&path, &locale) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    tracing::warn!("Failed to load author page {:?}: {}", path, e);
                }
            }
        }

        Ok(pages)
    }

    fn load_author_page(&self, path: &Path, locale: &str) -> Result<AuthorPage> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let source = path
            .strip_prefix(&self.app.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(AuthorPage {
            name: fm.name.unwrap_or_else(|| self.app.config.author.clone()),
            occupation: fm.occupation.unwrap_or_default(),
            company: fm.company.unwrap_or_default(),
            avatar: fm.avatar.unwrap_or_default(),
            content: self.renderer.render(body)?,
            language: locale.to_string(),
            source,
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_with_posts(posts: &[(&str, &str)]) -> (tempfile::TempDir, Polyblog) {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }
        let app = Polyblog::new(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_load_posts_sorted_and_filtered() {
        let (_dir, app) = site_with_posts(&[
            (
                "first.md",
                "---\ntitle: First\ndate: 2024-01-01\ntags: [rust]\n---\n\nBody one.\n",
            ),
            (
                "second.md",
                "---\ntitle: Second\ndate: 2024-02-01\nlang: es\n---\n\nBody two.\n",
            ),
            (
                "wip.md",
                "---\ntitle: WIP\ndate: 2024-03-01\ndraft: true\n---\n\nUnfinished.\n",
            ),
        ]);

        let loader = ContentLoader::new(&app);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Second");
        assert_eq!(posts[0].language, "es");
        assert_eq!(posts[1].title, "First");
        assert_eq!(posts[1].language, "en");
        assert_eq!(posts[1].tags, vec!["rust"]);
        assert_eq!(posts[1].path, "blog/first/");
    }

    #[test]
    fn test_drafts_load_when_render_drafts() {
        let (_dir, mut app) = site_with_posts(&[(
            "wip.md",
            "---\ntitle: WIP\ndate: 2024-03-01\ndraft: true\n---\n\nUnfinished.\n",
        )]);
        app.config.render_drafts = true;

        let loader = ContentLoader::new(&app);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].draft);
    }

    #[test]
    fn test_load_author_pages() {
        let dir = tempfile::tempdir().unwrap();
        let about_dir = dir.path().join("source/about");
        fs::create_dir_all(&about_dir).unwrap();
        fs::write(
            about_dir.join("en.md"),
            "---\nname: Jane Smith\noccupation: Engineer\n---\n\nHello.\n",
        )
        .unwrap();

        let app = Polyblog::new(dir.path()).unwrap();
        let loader = ContentLoader::new(&app);
        let pages = loader.load_author_pages().unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "Jane Smith");
        assert_eq!(pages[0].language, "en");
        assert!(pages[0].content.contains("Hello."));
    }
}
