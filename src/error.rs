//! Fatal errors of the image pass.
//!
//! Paths inside these errors are already in display form (relative to the
//! site directory, forward slashes), never raw absolute paths.

use thiserror::Error;

/// Errors that abort the image pass for a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// An image node without a URL (or with an empty one).
    #[error("Markdown image URL is mandatory in \"{file}\" file")]
    MissingUrl { file: String },

    /// None of the candidate paths exist on disk.
    #[error("Image {} used in {file} not found.", .tried.join(" or "))]
    NotFound {
        /// Every candidate path that was checked, in order
        tried: Vec<String>,
        /// Document that references the image
        file: String,
    },
}
