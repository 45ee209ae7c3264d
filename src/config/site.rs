//! Site configuration (config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading config.yml
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Default visual scheme for the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Light,
    Dark,
    /// Follow the visitor's OS preference
    System,
}

impl Scheme {
    /// Value used in the root element's data-scheme attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Light => "light",
            Scheme::Dark => "dark",
            Scheme::System => "system",
        }
    }
}

/// Blog section of the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub title: String,
    pub description: String,
    pub scheme: Scheme,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            scheme: Scheme::System,
        }
    }
}

/// Author profile shown in the header, hero card and about page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    /// Avatar image path, relative to the site root
    pub image: String,
    pub role: String,
    pub bio: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub instagram: String,
}

/// A project listed on the about page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub href: String,
}

/// Code highlighting options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Identity
    #[serde(rename = "blog")]
    pub blog: BlogConfig,
    pub profile: ProfileConfig,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,

    // URL
    pub url: String,
    pub root: String,

    // Metadata
    pub since: i32,
    pub lang: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub tag_dir: String,

    // Writing
    pub render_drafts: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Pagination
    pub per_page: usize,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            blog: BlogConfig::default(),
            profile: ProfileConfig::default(),
            projects: Vec::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            since: 2025,
            lang: "en-US".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            tag_dir: "tags".to_string(),

            render_drafts: false,
            highlight: HighlightConfig::default(),

            per_page: 12,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.blog.title, "My Blog");
        assert_eq!(config.blog.scheme, Scheme::System);
        assert_eq!(config.per_page, 12);
        assert_eq!(config.tag_dir, "tags");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
blog:
  title: Field Notes
  description: welcome, stranger
  scheme: dark
profile:
  name: Ada Example
  role: Security Researcher
  github: ada-example
projects:
  - name: Malware Classifier
    href: https://github.com/ada-example/classifier
since: 2023
per_page: 6
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.blog.title, "Field Notes");
        assert_eq!(config.blog.scheme, Scheme::Dark);
        assert_eq!(config.profile.name, "Ada Example");
        assert_eq!(config.profile.github, "ada-example");
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.since, 2023);
        assert_eq!(config.per_page, 6);
        // Unset sections fall back to defaults
        assert_eq!(config.source_dir, "source");
        assert!(config.profile.linkedin.is_empty());
    }

    #[test]
    fn test_scheme_values() {
        let yaml = "blog:\n  scheme: system\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.blog.scheme.as_str(), "system");
    }
}
