//! Image path resolution.
//!
//! Turns the pathname of a local image URL into an absolute, existing file:
//!
//! | Pathname          | Looked up at                                  |
//! |-------------------|-----------------------------------------------|
//! | `@site/x/a.png`   | `{site_dir}/x/a.png`                          |
//! | `/img/a.png`      | `{static_dir}/img/a.png`, each dir in order   |
//! | `./a.png`, `a.png`| next to the document (percent-decoded)        |

mod target;

pub use target::{ESCAPE_SCHEME, ParsedUrl, PathKind, SITE_ALIAS, UrlAction};

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::debug;
use crate::error::ImageError;
use crate::utils::path::{display_path, join_lexical};

// ============================================================================
// Resolve Context
// ============================================================================

/// Context for resolving the images of one document
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Project root (absolute)
    pub site_dir: &'a Path,
    /// Static asset roots (absolute), first match wins
    pub static_dirs: &'a [PathBuf],
    /// Document being processed (absolute)
    pub file_path: &'a Path,
}

impl ResolveContext<'_> {
    /// Directory relative images are resolved against.
    pub fn source_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or(self.site_dir)
    }

    /// Path as shown in messages.
    pub fn display(&self, path: &Path) -> String {
        display_path(self.site_dir, path)
    }

    fn not_found(&self, tried: &[PathBuf]) -> ImageError {
        ImageError::NotFound {
            tried: tried.iter().map(|path| self.display(path)).collect(),
            file: self.display(self.file_path),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a local image pathname to an existing absolute path.
pub async fn resolve_image_path(
    pathname: &str,
    ctx: &ResolveContext<'_>,
) -> Result<PathBuf, ImageError> {
    match PathKind::parse(pathname) {
        PathKind::SiteAlias(rest) => ensure_exists(join_lexical(ctx.site_dir, rest), ctx).await,
        PathKind::Absolute(path) => {
            let candidates: Vec<PathBuf> = ctx
                .static_dirs
                .iter()
                .map(|dir| join_lexical(dir, path))
                .collect();

            // Sequential: configured order decides which directory wins.
            for candidate in &candidates {
                if path_exists(candidate).await {
                    debug!("resolve"; "{} -> {}", pathname, ctx.display(candidate));
                    return Ok(candidate.clone());
                }
            }
            Err(ctx.not_found(&candidates))
        }
        PathKind::Relative(path) => {
            let decoded = percent_decode_str(path).decode_utf8_lossy();
            ensure_exists(join_lexical(ctx.source_dir(), &decoded), ctx).await
        }
    }
}

async fn ensure_exists(path: PathBuf, ctx: &ResolveContext<'_>) -> Result<PathBuf, ImageError> {
    if path_exists(&path).await {
        debug!("resolve"; "found {}", ctx.display(&path));
        Ok(path)
    } else {
        Err(ctx.not_found(std::slice::from_ref(&path)))
    }
}

/// Stat errors (permissions, broken links) count as missing.
async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================
