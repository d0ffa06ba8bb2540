//! Image pass entry point.
//!
//! One synchronous walk collects every image slot; each slot becomes its own
//! future (resolve, then rewrite) and all of them run concurrently on the
//! caller's task. The first fatal error rejects the pass. Images already
//! rewritten by then stay rewritten.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;

use crate::config::ImageConfig;
use crate::debug;
use crate::error::ImageError;
use crate::mdast::{Node, image_slots};
use crate::resolve::{ParsedUrl, UrlAction, resolve_image_path};
use crate::rewrite::ImageRewriter;
use crate::utils::path::clean_path;
use crate::utils::plural::plural_count;

/// Resolve and rewrite every image of the document at `file_path`.
///
/// Relative image URLs are resolved against the parent directory of
/// `file_path`. A relative `file_path` is taken from `config.site_dir`.
pub async fn transform_images(
    root: &mut Node,
    config: &ImageConfig,
    file_path: &Path,
) -> Result<(), ImageError> {
    let file_path = document_path(config, file_path);
    let rewriter = ImageRewriter::new(config, &file_path);
    let slots = image_slots(root);

    debug!(
        "transform";
        "{}: {}",
        rewriter.context().display(&file_path),
        plural_count(slots.len(), "image")
    );

    try_join_all(slots.into_iter().map(|slot| process_image(slot, &rewriter))).await?;
    Ok(())
}

fn document_path(config: &ImageConfig, file_path: &Path) -> PathBuf {
    if file_path.is_absolute() {
        clean_path(file_path)
    } else {
        clean_path(&config.site_dir.join(file_path))
    }
}

/// Resolve and rewrite a single image slot.
async fn process_image(slot: &mut Node, rewriter: &ImageRewriter<'_>) -> Result<(), ImageError> {
    let Node::Image(image) = &mut *slot else {
        return Ok(());
    };

    let ctx = rewriter.context();
    let url = match image.url.as_deref() {
        Some(url) if !url.is_empty() => url.to_owned(),
        _ => {
            return Err(ImageError::MissingUrl {
                file: ctx.display(ctx.file_path),
            });
        }
    };

    let parsed = ParsedUrl::parse(&url);
    match parsed.action() {
        UrlAction::Skip => Ok(()),
        UrlAction::Escape(stripped) => {
            image.url = Some(stripped);
            Ok(())
        }
        UrlAction::Resolve(pathname) => {
            let resolved = resolve_image_path(pathname, ctx).await?;
            rewriter.rewrite(slot, &resolved, &parsed).await;
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
