//! Post and Page models
//!
//! A `Post` is a dated feed entry; a `Page` is a standalone document such
//! as the about page. Both are read-only records owned by the content
//! source; the generator never mutates them after loading.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Visibility of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Status {
    /// Shown everywhere
    #[default]
    Public,
    /// Detail page is generated and reachable, but the post is hidden
    /// from the feed, tag lists and the atom feed
    PublicOnDetail,
    /// Not rendered at all (unless drafts are enabled)
    Private,
}

impl Status {
    /// Whether this post appears in the feed and tag aggregation
    pub fn in_feed(&self) -> bool {
        matches!(self, Status::Public)
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Stable identifier (the source path, unique within a site)
    pub id: String,

    /// Post title
    pub title: String,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Short summary shown on cards and in meta tags
    pub summary: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last updated date
    pub updated: Option<DateTime<Local>>,

    /// Category (single-valued in practice, list-shaped like the source)
    pub category: Vec<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Visibility
    pub status: Status,

    /// Thumbnail image reference
    pub thumbnail: Option<String>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the source dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without host)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            id: source.clone(),
            title,
            slug,
            summary: String::new(),
            date,
            updated: None,
            category: Vec::new(),
            tags: Vec::new(),
            status: Status::Public,
            thumbnail: None,
            raw: String::new(),
            content: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            extra: HashMap::new(),
        }
    }
}

/// A standalone page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// Creation date
    pub date: DateTime<Local>,

    /// Layout template to use (page, about)
    pub layout: String,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the source dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without host)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Page {
    /// Create a new page with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        Self {
            title,
            date,
            layout: "page".to_string(),
            raw: String::new(),
            content: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_slug_from_title() {
        let post = Post::new(
            "Hello World".to_string(),
            Local::now(),
            "_posts/hello.md".to_string(),
        );
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.id, "_posts/hello.md");
        assert_eq!(post.status, Status::Public);
    }

    #[test]
    fn test_status_feed_visibility() {
        assert!(Status::Public.in_feed());
        assert!(!Status::PublicOnDetail.in_feed());
        assert!(!Status::Private.in_feed());
    }
}
