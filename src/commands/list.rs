//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::feed::{self, FeedQuery, TagCount};
use crate::Quill;

/// List site content by type, optionally filtered like the feed page
pub fn run(app: &Quill, content_type: &str, query: Option<&str>, tag: Option<&str>) -> Result<()> {
    let loader = ContentLoader::new(app);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            let feed_query = FeedQuery {
                search: query.unwrap_or("").to_string(),
                tag: tag.map(|t| t.to_string()),
            };
            let matched = feed::filter(&posts, &feed_query);

            println!("Posts ({}):", matched.len());
            for post in matched {
                let tags = if post.tags.is_empty() {
                    String::new()
                } else {
                    format!(" #{}", post.tags.join(" #"))
                };
                println!(
                    "  {} - {}{} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    tags,
                    post.source
                );
            }
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title, page.source);
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_posts()?;
            let counts = visible_tag_counts(&posts);
            println!("Tags ({}):", counts.len());
            for tc in counts {
                println!("  {} ({})", tc.name, tc.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag",
                content_type
            );
        }
    }

    Ok(())
}

/// Tag counts as the generated site shows them: detail-only posts are
/// hidden from tag aggregation
fn visible_tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let feed_posts: Vec<Post> = posts
        .iter()
        .filter(|p| p.status.in_feed())
        .cloned()
        .collect();
    feed::tag_counts(&feed_posts)
}
