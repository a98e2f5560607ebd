//! Content module - blog posts, front-matter and body rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::{ContentError, ContentLoader};
pub use markdown::MarkdownRenderer;
pub use post::{BlogPost, BlogSettings};
