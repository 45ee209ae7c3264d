//! Content loader - loads posts and pages from the source directory
//!
//! The source directory is the content-fetch boundary: records come in with
//! the note-service field set (title, summary, date, category, tags, status,
//! thumbnail) and leave as fully rendered `Post`/`Page` values.

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Page, Post, Status};
use crate::helpers::html::plain_summary;
use crate::Quill;

/// Length of summaries derived from the body when none is declared
const DERIVED_SUMMARY_LEN: usize = 160;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    app: &'a Quill,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(app: &'a Quill) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &app.config.highlight.theme,
            app.config.highlight.line_number,
        );
        Self { app, renderer }
    }

    /// Load all posts from source/_posts, newest first
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
                        if post.status != Status::Private || self.app.config.render_drafts {
                            posts.push(post);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));
        let updated = fm.parse_updated().or(file_modified);

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

        // Slug from front-matter if declared, else the filename
        let slug = fm.slug.clone().unwrap_or_else(|| {
            slug::slugify(
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("untitled"),
            )
        });

        let post_path = format!("/{}/", slug);
        let permalink = format!(
            "{}{}",
            self.app.config.url.trim_end_matches('/'),
            post_path
        );

        let content_html = self.renderer.render(body)?;

        // Explicit summary wins, otherwise derive one from the body
        let summary = fm
            .summary
            .clone()
            .unwrap_or_else(|| plain_summary(&content_html, DERIVED_SUMMARY_LEN));

        let mut post = Post::new(title, date, source);
        post.slug = slug;
        post.summary = summary;
        post.updated = updated;
        post.category = fm.category;
        post.tags = fm.tags;
        post.status = fm.status.unwrap_or_default();
        post.thumbnail = fm.thumbnail;
        post.raw = body.to_string();
        post.content = content_html;
        post.full_source = path.to_path_buf();
        post.path = post_path;
        post.permalink = permalink;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Load all pages (markdown files outside directories starting with _)
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();

        if !self.app.source_dir.exists() {
            return Ok(pages);
        }

        for entry in WalkDir::new(&self.app.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            let relative = path.strip_prefix(&self.app.source_dir).unwrap_or(path);
            let first_component = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str());

            if let Some(first) = first_component {
                if first.starts_with('_') {
                    continue;
                }
            }

            if path.is_file() && is_markdown_file(path) {
                match self.load_page(path) {
                    Ok(page) => pages.push(page),
                    Err(e) => {
                        tracing::warn!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);

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

        // index.md maps to its parent directory's path
        let page_path = {
            let without_ext = source.trim_end_matches(".md").trim_end_matches(".markdown");
            if without_ext.ends_with("/index") || without_ext == "index" {
                without_ext.trim_end_matches("index").to_string()
            } else {
                format!("{}/", without_ext)
            }
        };
        let page_path = if page_path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", page_path.trim_start_matches('/'))
        };

        let permalink = format!(
            "{}{}",
            self.app.config.url.trim_end_matches('/'),
            page_path
        );

        let content_html = self.renderer.render(body)?;

        let mut page = Page::new(title, date, source);
        page.layout = fm.layout.unwrap_or_else(|| "page".to_string());
        page.raw = body.to_string();
        page.content = content_html;
        page.full_source = path.to_path_buf();
        page.path = page_path;
        page.permalink = permalink;
        page.extra = fm.extra;

        Ok(page)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
