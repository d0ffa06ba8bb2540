//! Pixel dimension probing.
//!
//! Raster formats (png, jpeg, webp, gif) are identified by content through
//! the `image` crate, which reads only as much of the file as the header
//! needs. SVG files are read whole and parsed with usvg for their intrinsic
//! size.
//!
//! Probing is best-effort: callers treat [`ProbeError`] as a warning.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Intrinsic image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Why an image could not be measured.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("file is empty")]
    Empty,

    #[error(transparent)]
    Decode(#[from] image::ImageError),

    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("probe task failed")]
    Task(#[from] tokio::task::JoinError),
}

/// Measure the image at `path`.
///
/// File access is blocking, so it runs on tokio's blocking pool. Concurrent
/// probes hold one header buffer each, not whole files.
pub async fn probe_dimensions(path: &Path) -> Result<Dimensions, ProbeError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || probe_file(&path)).await?
}

fn probe_file(path: &Path) -> Result<Dimensions, ProbeError> {
    let io_error = |err| ProbeError::Io(path.to_path_buf(), err);

    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);
    // Peek without consuming: the image decoder starts from the same buffer.
    let head = reader.fill_buf().map_err(io_error)?;
    if head.is_empty() {
        return Err(ProbeError::Empty);
    }

    if is_svg(path, head) {
        let data = std::fs::read(path).map_err(io_error)?;
        return svg_dimensions(&data);
    }

    let (width, height) = image::ImageReader::new(reader)
        .with_guessed_format()
        .map_err(io_error)?
        .into_dimensions()?;
    Ok(Dimensions { width, height })
}

/// SVG by extension, or by a leading `<svg`/`<?xml` when the extension is missing.
fn is_svg(path: &Path, head: &[u8]) -> bool {
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if by_ext {
        return true;
    }

    let head = &head[..head.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn svg_dimensions(data: &[u8]) -> Result<Dimensions, ProbeError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
    let size = tree.size();
    Ok(Dimensions {
        width: size.width().round() as u32,
        height: size.height().round() as u32,
    })
}
