//! Built-in theme templates using the Tera template engine
//!
//! The whole theme is embedded in the binary; a site needs nothing beyond
//! its config.yml and source directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded theme loaded
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // The templates emit HTML and pre-rendered fragments; autoescaping
        // would double-escape them
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("feed.html", include_str!("theme/feed.html")),
            ("post.html", include_str!("theme/post.html")),
            ("page.html", include_str!("theme/page.html")),
            ("about.html", include_str!("theme/about.html")),
            ("tag.html", include_str!("theme/tag.html")),
            ("404.html", include_str!("theme/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("theme/partials/footer.html"),
            ),
            (
                "partials/profile_card.html",
                include_str!("theme/partials/profile_card.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("theme/partials/post_card.html"),
            ),
            (
                "partials/tag_list.html",
                include_str!("theme/partials/tag_list.html"),
            ),
            (
                "partials/pagination.html",
                include_str!("theme/partials/pagination.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with the given context
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
    Ok(tera::Value::String(crate::helpers::html::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(crate::helpers::html::truncate(
        &s, length, "…",
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub url: String,
    pub root: String,
    /// Tag page directory under the root, e.g. "tags"
    pub tag_dir: String,
    pub since: i32,
    pub lang: String,
    /// Default scheme applied before the cookie is consulted
    pub scheme: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub image: String,
    pub role: String,
    pub bio: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub instagram: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectData {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub posts: Vec<PostData>,
    pub tags: Vec<TagListItem>,
    pub post_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub summary: String,
    /// ISO date, e.g. "2026-01-15"
    pub date: String,
    /// Locale-formatted date shown on cards, e.g. "Jan 15, 2026"
    pub date_display: String,
    pub path: String,
    pub permalink: String,
    /// First category, if any
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub date: String,
    pub path: String,
    pub permalink: String,
    pub content: String,
    pub layout: String,
}

/// A tag entry in the feed's tag list, ordered by descending count
#[derive(Debug, Clone, Serialize)]
pub struct TagListItem {
    pub name: String,
    pub slug: String,
    pub path: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub prev_link: String,
    pub next_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Field Notes".to_string(),
                description: "notes".to_string(),
                url: "https://example.com".to_string(),
                root: "/".to_string(),
                tag_dir: "tags".to_string(),
                since: 2024,
                lang: "en-US".to_string(),
                scheme: "dark".to_string(),
            },
        );
        context.insert(
            "profile",
            &ProfileData {
                name: "Ada Example".to_string(),
                image: "/avatar.png".to_string(),
                role: "Security Researcher".to_string(),
                bio: "hello".to_string(),
                email: "ada@example.com".to_string(),
                github: "ada-example".to_string(),
                linkedin: String::new(),
                instagram: String::new(),
            },
        );
        context.insert("projects", &Vec::<ProjectData>::new());
        context.insert(
            "site",
            &SiteData {
                posts: vec![],
                tags: vec![],
                post_count: 0,
            },
        );
        context.insert("current_year", &2026);
        context.insert("page_title", "Field Notes");
        context
    }

    fn post_data() -> PostData {
        PostData {
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            summary: "A first note".to_string(),
            date: "2026-01-15".to_string(),
            date_display: "Jan 15, 2026".to_string(),
            path: "/hello/".to_string(),
            permalink: "https://example.com/hello/".to_string(),
            category: Some("Engineering".to_string()),
            tags: vec!["rust".to_string()],
            thumbnail: None,
            content: "<p>body</p>".to_string(),
        }
    }

    #[test]
    fn test_render_feed() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("page_posts", &vec![post_data()]);
        context.insert(
            "pagination",
            &PaginationData {
                per_page: 12,
                total: 1,
                current: 1,
                prev_link: String::new(),
                next_link: String::new(),
            },
        );

        let html = renderer.render("feed.html", &context).unwrap();
        assert!(html.contains("Hello"));
        assert!(html.contains("A first note"));
        assert!(html.contains("Ada Example"));
        assert!(html.contains("search-input"));
    }

    #[test]
    fn test_render_post_detail() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("post", &post_data());

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("Back to posts"));
        assert!(html.contains("#rust"));
    }

    #[test]
    fn test_render_post_without_thumbnail_has_no_thumbnail_block() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("page_posts", &vec![post_data()]);
        context.insert(
            "pagination",
            &PaginationData {
                per_page: 12,
                total: 1,
                current: 1,
                prev_link: String::new(),
                next_link: String::new(),
            },
        );

        let html = renderer.render("feed.html", &context).unwrap();
        assert!(!html.contains("class=\"thumbnail\""));
    }

    #[test]
    fn test_card_data_attributes_escape_quotes() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        let mut post = post_data();
        post.title = r#"He said "hi""#.to_string();
        post.summary = r#"a "quoted" summary"#.to_string();
        context.insert("page_posts", &vec![post]);
        context.insert(
            "pagination",
            &PaginationData {
                per_page: 12,
                total: 1,
                current: 1,
                prev_link: String::new(),
                next_link: String::new(),
            },
        );

        let html = renderer.render("feed.html", &context).unwrap();
        assert!(html.contains(r#"data-title="He said &quot;hi&quot;""#));
        assert!(html.contains(r#"data-summary="a &quot;quoted&quot; summary""#));
    }

    #[test]
    fn test_render_404() {
        let renderer = TemplateRenderer::new().unwrap();
        let context = base_context();
        let html = renderer.render("404.html", &context).unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("Go back home"));
    }
}
