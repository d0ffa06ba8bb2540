//! mdimg - build-time image resolution for markdown trees.
//!
//! Every `image` node of a parsed mdast tree is checked against the
//! filesystem, measured, and replaced with an `<img>` JSX element whose `src`
//! is an asset-loader `require()` expression:
//!
//! ```ignore
//! let config = ImageConfig::load(&cwd, Path::new(CONFIG_FILE))?;
//! transform_images(&mut tree, &config, &doc_path).await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod logger;
pub mod mdast;
pub mod resolve;
pub mod rewrite;
pub mod transform;
pub mod utils;

pub use config::{CONFIG_FILE, ConfigError, ImageConfig};
pub use error::ImageError;
pub use mdast::Node;
pub use resolve::{ResolveContext, resolve_image_path};
pub use rewrite::ImageRewriter;
pub use transform::transform_images;
