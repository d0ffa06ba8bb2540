//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path handling (`join_lexical`, `relative_path`, `display_path`)
//! - [`route`]: URL text splitting (`url_scheme`, `split_hash`, `split_search`)

pub mod fs;
pub mod route;

pub use fs::{
    clean_path, display_path, join_lexical, normalize_path, normalize_path_from, relative_path,
    to_posix,
};
pub use route::{split_hash, split_search, url_scheme};
