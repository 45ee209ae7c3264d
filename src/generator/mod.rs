//! Generator module - renders the site to static HTML
//!
//! Output plan: paginated feed at `/` and `/page/N/`, one page per post at
//! `/<slug>/`, standalone pages at their own paths, per-tag pages under the
//! tag dir, `404.html`, `atom.xml`, plus copied assets.

use anyhow::Result;
use std::fs;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{Page, Post};
use crate::feed::{self, FeedQuery};
use crate::helpers::date::{date_xml, format_date};
use crate::helpers::url::{tag_path, url_for};
use crate::templates::{
    ConfigData, PageData, PaginationData, PostData, ProfileData, ProjectData, SiteData,
    TagListItem, TemplateRenderer,
};
use crate::Quill;

/// Static site generator using the embedded templates
pub struct Generator {
    app: Quill,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(app: &Quill) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            app: app.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        fs::create_dir_all(&self.app.public_dir)?;

        // Embedded theme assets
        crate::theme::write_assets(&self.app.public_dir)?;

        // Copy source assets (images, etc.)
        self.copy_source_assets()?;

        // Posts arrive sorted newest first; the feed hides detail-only posts
        let feed_posts: Vec<&Post> = posts.iter().filter(|p| p.status.in_feed()).collect();

        let site_data = self.build_site_data(&feed_posts);
        let config_data = self.build_config_data();
        let profile_data = self.build_profile_data();
        let project_data = self.build_project_data();

        let base = BaseContext {
            site: &site_data,
            config: &config_data,
            profile: &profile_data,
            projects: &project_data,
        };

        self.generate_feed_pages(&feed_posts, &base)?;
        self.generate_post_pages(posts, &base)?;
        self.generate_page_pages(pages, &base)?;
        self.generate_tag_pages(&feed_posts, &base)?;
        self.generate_error_page(&base)?;
        self.generate_atom_feed(&feed_posts)?;

        Ok(())
    }

    fn post_data(&self, post: &Post) -> PostData {
        PostData {
            title: post.title.clone(),
            slug: post.slug.clone(),
            summary: post.summary.clone(),
            date: post.date.format("%Y-%m-%d").to_string(),
            date_display: format_date(&post.date, &self.app.config.lang),
            // Root-prefixed so hrefs work when the site lives under a subpath
            path: url_for(&self.app.config.root, &post.path),
            permalink: post.permalink.clone(),
            category: post.category.first().cloned(),
            tags: post.tags.clone(),
            thumbnail: post.thumbnail.clone(),
            content: post.content.clone(),
        }
    }

    /// Build site-wide data for templates
    fn build_site_data(&self, feed_posts: &[&Post]) -> SiteData {
        let owned: Vec<Post> = feed_posts.iter().map(|p| (*p).clone()).collect();
        let tags = feed::tag_counts(&owned)
            .into_iter()
            .map(|tc| TagListItem {
                slug: slug::slugify(&tc.name),
                path: url_for(
                    &self.app.config.root,
                    &tag_path(&self.app.config.tag_dir, &tc.name),
                ),
                name: tc.name,
                count: tc.count,
            })
            .collect();

        SiteData {
            posts: feed_posts.iter().map(|p| self.post_data(p)).collect(),
            tags,
            post_count: feed_posts.len(),
        }
    }

    fn build_config_data(&self) -> ConfigData {
        ConfigData {
            title: self.app.config.blog.title.clone(),
            description: self.app.config.blog.description.clone(),
            url: self.app.config.url.clone(),
            root: self.app.config.root.clone(),
            tag_dir: self.app.config.tag_dir.clone(),
            since: self.app.config.since,
            lang: self.app.config.lang.clone(),
            scheme: self.app.config.blog.scheme.as_str().to_string(),
        }
    }

    fn build_profile_data(&self) -> ProfileData {
        let p = &self.app.config.profile;
        ProfileData {
            name: p.name.clone(),
            image: p.image.clone(),
            role: p.role.clone(),
            bio: p.bio.clone(),
            email: p.email.clone(),
            github: p.github.clone(),
            linkedin: p.linkedin.clone(),
            instagram: p.instagram.clone(),
        }
    }

    fn build_project_data(&self) -> Vec<ProjectData> {
        self.app
            .config
            .projects
            .iter()
            .map(|p| ProjectData {
                name: p.name.clone(),
                href: p.href.clone(),
            })
            .collect()
    }

    /// Create a context with the variables every template expects
    fn create_base_context(&self, base: &BaseContext) -> Context {
        let mut context = Context::new();
        context.insert("site", base.site);
        context.insert("config", base.config);
        context.insert("profile", base.profile);
        context.insert("projects", base.projects);
        context.insert(
            "current_year",
            &chrono::Local::now().format("%Y").to_string(),
        );
        context.insert("page_title", &base.config.title);
        context
    }

    /// Generate feed index pages with pagination
    fn generate_feed_pages(&self, feed_posts: &[&Post], base: &BaseContext) -> Result<()> {
        let per_page = self.app.config.per_page.max(1);
        let total_pages = feed_posts.len().div_ceil(per_page).max(1);

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(feed_posts.len());
            let page_posts: Vec<PostData> = feed_posts[start..end]
                .iter()
                .map(|p| self.post_data(p))
                .collect();

            let pagination = PaginationData {
                per_page,
                total: total_pages,
                current: page_num,
                prev_link: match page_num {
                    1 => String::new(),
                    2 => self.app.config.root.clone(),
                    n => url_for(&self.app.config.root, &format!("page/{}/", n - 1)),
                },
                next_link: if page_num < total_pages {
                    url_for(&self.app.config.root, &format!("page/{}/", page_num + 1))
                } else {
                    String::new()
                },
            };

            let mut context = self.create_base_context(base);
            context.insert("page_posts", &page_posts);
            context.insert("pagination", &pagination);

            let html = self.renderer.render("feed.html", &context)?;

            let output_path = if page_num == 1 {
                self.app.public_dir.join("index.html")
            } else {
                self.app
                    .public_dir
                    .join(format!("page/{}/index.html", page_num))
            };

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post], base: &BaseContext) -> Result<()> {
        for post in posts {
            let mut context = self.create_base_context(base);
            context.insert("post", &self.post_data(post));

            let html = self.renderer.render("post.html", &context)?;

            let clean_path = post.path.trim_start_matches('/');
            let output_path = self.app.public_dir.join(clean_path).join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
            }
            fs::write(&output_path, &html)
                .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate standalone pages
    fn generate_page_pages(&self, pages: &[Page], base: &BaseContext) -> Result<()> {
        for page in pages {
            let template_name = match page.layout.as_str() {
                "about" => "about.html",
                _ => "page.html",
            };

            let page_data = PageData {
                title: page.title.clone(),
                date: page.date.format("%Y-%m-%d").to_string(),
                path: page.path.clone(),
                permalink: page.permalink.clone(),
                content: page.content.clone(),
                layout: page.layout.clone(),
            };

            let mut context = self.create_base_context(base);
            context.insert("page", &page_data);

            let html = self.renderer.render(template_name, &context)?;

            let clean_path = page.path.trim_start_matches('/');
            let output_path = self.app.public_dir.join(clean_path).join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated page: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate per-tag pages
    fn generate_tag_pages(&self, feed_posts: &[&Post], base: &BaseContext) -> Result<()> {
        let owned: Vec<Post> = feed_posts.iter().map(|p| (*p).clone()).collect();
        let tags = feed::tag_counts(&owned);

        for tag in &tags {
            let tag_slug = slug::slugify(&tag.name);
            if tag_slug.is_empty() {
                continue;
            }

            let tag_posts: Vec<PostData> = feed::filter(&owned, &FeedQuery::tag(&tag.name))
                .into_iter()
                .map(|p| self.post_data(p))
                .collect();

            let mut context = self.create_base_context(base);
            context.insert("tag_name", &tag.name);
            context.insert("tag_posts", &tag_posts);

            let html = self.renderer.render("tag.html", &context)?;

            let output_path = self
                .app
                .public_dir
                .join(&self.app.config.tag_dir)
                .join(&tag_slug)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
        }

        tracing::info!("Generated {} tag pages", tags.len());
        Ok(())
    }

    /// Generate the 404 page
    fn generate_error_page(&self, base: &BaseContext) -> Result<()> {
        let context = self.create_base_context(base);
        let html = self.renderer.render("404.html", &context)?;
        fs::write(self.app.public_dir.join("404.html"), html)?;
        Ok(())
    }

    /// Generate the Atom feed
    fn generate_atom_feed(&self, feed_posts: &[&Post]) -> Result<()> {
        let url = self.app.config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!(
            "  <title>{}</title>\n",
            escape_xml(&self.app.config.blog.title)
        ));
        feed.push_str(&format!("  <link href=\"{}/atom.xml\" rel=\"self\"/>\n", url));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            date_xml(&chrono::Utc::now())
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&self.app.config.profile.name)
        ));

        // Recent posts only
        for post in feed_posts.iter().take(20) {
            let entry_url = format!("{}{}", url, post.path);
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", entry_url));
            feed.push_str(&format!("    <id>{}</id>\n", entry_url));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                date_xml(&post.date)
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                date_xml(&post.updated.unwrap_or(post.date))
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&post.summary)
            ));
            let content = convert_relative_urls_to_absolute(&post.content, url);
            let clean_content = strip_invalid_xml_chars(&content);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                escape_cdata(&clean_content)
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        fs::write(self.app.public_dir.join("atom.xml"), feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Copy source assets (non-markdown files) to the public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.app.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());

                // Markdown files are rendered, not copied
                if matches!(ext, Some("md") | Some("markdown")) {
                    continue;
                }

                if path
                    .components()
                    .any(|c| c.as_os_str() == "_posts" || c.as_os_str() == "_drafts")
                {
                    continue;
                }

                let relative = path.strip_prefix(source_dir)?;
                let dest = self.app.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Shared references threaded through every template context
struct BaseContext<'a> {
    site: &'a SiteData,
    config: &'a ConfigData,
    profile: &'a ProfileData,
    projects: &'a [ProjectData],
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Convert relative URLs in HTML content to absolute URLs
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Close and reopen the CDATA section around any literal "]]>" so post
/// content cannot terminate the enclosing section early
fn escape_cdata(s: &str) -> String {
    s.replace("]]>", "]]]]><![CDATA[>")
}

/// Strip control characters that XML 1.0 forbids
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
        })
        .collect()
}
