//! Configuration module

mod site;

pub use site::{
    BlogConfig, ConfigError, HighlightConfig, ProfileConfig, ProjectConfig, Scheme, SiteConfig,
};
