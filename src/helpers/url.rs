//! URL helpers

/// Prefix a site-relative path with the configured root
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    format!("{}/{}", root, path.trim_start_matches('/'))
}

/// Site path of a tag page, e.g. "/tags/incident-response/"
pub fn tag_path(tag_dir: &str, tag: &str) -> String {
    format!("/{}/{}/", tag_dir.trim_matches('/'), slug::slugify(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("/", "about/"), "/about/");
        assert_eq!(url_for("/blog/", "/about/"), "/blog/about/");
    }

    #[test]
    fn test_tag_path() {
        assert_eq!(tag_path("tags", "Incident Response"), "/tags/incident-response/");
    }
}
