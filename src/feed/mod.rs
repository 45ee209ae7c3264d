//! Feed filtering and tag aggregation
//!
//! Pure, synchronous transformations over the in-memory post list. The
//! generated site ships a client-side mirror of the same behavior
//! (`feed.js`); this module is the authoritative implementation and drives
//! the tag pages, the tag list ordering and the `list` command.

use crate::content::Post;

/// A feed filter: free-text query plus an optional selected tag.
///
/// A post matches when its title or summary contains the query
/// (case-insensitive substring) and, if a tag is selected, its tag list
/// includes that tag.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub search: String,
    pub tag: Option<String>,
}

impl FeedQuery {
    /// Filter by free text only
    pub fn search(query: &str) -> Self {
        Self {
            search: query.to_string(),
            tag: None,
        }
    }

    /// Filter by tag only
    pub fn tag(tag: &str) -> Self {
        Self {
            search: String::new(),
            tag: Some(tag.to_string()),
        }
    }

    /// Does a single post match this query?
    pub fn matches(&self, post: &Post) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || post.title.to_lowercase().contains(&needle)
            || post.summary.to_lowercase().contains(&needle);

        let matches_tag = match &self.tag {
            Some(tag) => post.tags.iter().any(|t| t == tag),
            None => true,
        };

        matches_search && matches_tag
    }
}

/// Filter a post list, preserving order
pub fn filter<'a>(posts: &'a [Post], query: &FeedQuery) -> Vec<&'a Post> {
    posts.iter().filter(|p| query.matches(p)).collect()
}

/// A tag and the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Aggregate tags over a post list: tag → occurrence count, sorted by
/// descending count (ties broken by name). Blank tags are skipped.
pub fn tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: indexmap::IndexMap<&str, usize> = indexmap::IndexMap::new();

    for post in posts {
        for tag in &post.tags {
            if tag.trim().is_empty() {
                continue;
            }
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn post(title: &str, summary: &str, tags: &[&str]) -> Post {
        let mut p = Post::new(
            title.to_string(),
            Local::now(),
            format!("_posts/{}.md", slug::slugify(title)),
        );
        p.summary = summary.to_string();
        p.tags = tags.iter().map(|t| t.to_string()).collect();
        p
    }

    fn sample() -> Vec<Post> {
        vec![
            post("A", "alpha summary", &["x"]),
            post("B", "beta summary", &["x", "y"]),
            post("C", "gamma notes", &[]),
        ]
    }

    #[test]
    fn test_empty_query_returns_all() {
        let posts = sample();
        let result = filter(&posts, &FeedQuery::default());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_search_matches_title_and_summary_case_insensitive() {
        let posts = sample();
        assert_eq!(filter(&posts, &FeedQuery::search("b")).len(), 2); // title B, "beta"
        assert_eq!(filter(&posts, &FeedQuery::search("GAMMA")).len(), 1);
        assert_eq!(filter(&posts, &FeedQuery::search("nothing")).len(), 0);
    }

    #[test]
    fn test_tag_selection_narrows_and_widens() {
        // posts = [{title:"A", tags:["x"]}, {title:"B", tags:["x","y"]}]
        let posts = vec![post("A", "", &["x"]), post("B", "", &["x", "y"])];

        let by_x = filter(&posts, &FeedQuery::tag("x"));
        assert_eq!(by_x.len(), 2);

        let by_y = filter(&posts, &FeedQuery::tag("y"));
        assert_eq!(by_y.len(), 1);
        assert_eq!(by_y[0].title, "B");
    }

    #[test]
    fn test_filter_idempotent() {
        let posts = sample();
        let query = FeedQuery {
            search: "summary".to_string(),
            tag: Some("x".to_string()),
        };

        let once: Vec<Post> = filter(&posts, &query).into_iter().cloned().collect();
        let twice = filter(&once, &query);

        let once_titles: Vec<&str> = once.iter().map(|p| p.title.as_str()).collect();
        let twice_titles: Vec<&str> = twice.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(once_titles, twice_titles);
    }

    #[test]
    fn test_clearing_tag_restores_full_list() {
        let posts = sample();
        let selected = filter(&posts, &FeedQuery::tag("y"));
        assert_eq!(selected.len(), 1);

        // Clearing the tag means filtering with no tag and no search
        let cleared = filter(&posts, &FeedQuery::default());
        assert_eq!(cleared.len(), posts.len());
    }

    #[test]
    fn test_search_and_tag_conjunction() {
        let posts = sample();
        let query = FeedQuery {
            search: "beta".to_string(),
            tag: Some("x".to_string()),
        };
        let result = filter(&posts, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "B");
    }

    #[test]
    fn test_tag_counts_sum_correctly() {
        let posts = sample();
        let counts = tag_counts(&posts);

        for tc in &counts {
            let expected = posts.iter().filter(|p| p.tags.contains(&tc.name)).count();
            assert_eq!(tc.count, expected, "count mismatch for tag {}", tc.name);
        }
    }

    #[test]
    fn test_tag_counts_sorted_descending() {
        let posts = sample();
        let counts = tag_counts(&posts);
        assert_eq!(counts[0].name, "x");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].name, "y");
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_tag_counts_skip_blank_tags() {
        let posts = vec![post("A", "", &["", "  ", "x"])];
        let counts = tag_counts(&posts);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].name, "x");
    }
}
