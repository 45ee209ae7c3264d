//! Content loading and rendering

pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod post;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{Page, Post, Status};
