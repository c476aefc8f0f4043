//! cafecito - the presentational layer of a personal blog.
//!
//! Renders a post index page with an author bio, SEO head tags, a persisted
//! light/dark toggle and coffee-cup reading-time labels.

pub mod bio;
pub mod cli;
pub mod config;
pub mod errors;
pub mod index_page;
pub mod links;
pub mod posts;
pub mod reading_time;
pub mod seo;
pub mod templates;
pub mod theme;

pub use config::{Config, SiteMetadata};
pub use errors::{CafecitoError, ConfigError, PostsError, RenderError, TemplateError};
pub use index_page::IndexPage;
pub use posts::{FsPostSource, PostSource, PostSummary};
pub use reading_time::{ReadingTimeLabeler, label};
pub use theme::{FileThemeStore, MemoryThemeStore, ThemePreference, ThemeStore, ThemeToggle};
