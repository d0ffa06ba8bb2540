//! Image node rewriting (image -> `<img>` JSX element).
//!
//! A resolved image becomes:
//!
//! ```text
//! <img
//!   src={require("!loader!./pic.png?x=1").default + '#y'}
//!   loading="lazy" alt="…" title="…" width={100} height={50} />
//! ```
//!
//! The query string stays inside `require()` so the asset loader sees it; the
//! hash is appended outside so it survives loaders that drop query strings.

use std::path::Path;

use crate::config::ImageConfig;
use crate::image::{ProbeError, probe_dimensions};
use crate::mdast::{JsxAttribute, JsxElement, Node};
use crate::resolve::{ParsedUrl, ResolveContext};
use crate::utils::html::{escape_attr, escape_js_single, escape_js_string};
use crate::utils::path::{relative_path, to_posix};
use crate::{debug, log};

/// Rewrites resolved image nodes of one document.
pub struct ImageRewriter<'a> {
    ctx: ResolveContext<'a>,
    loader: &'a str,
    warn_unreadable: bool,
}

impl<'a> ImageRewriter<'a> {
    pub fn new(config: &'a ImageConfig, file_path: &'a Path) -> Self {
        Self {
            ctx: config.context(file_path),
            loader: &config.loader,
            warn_unreadable: config.probe.warn,
        }
    }

    pub fn context(&self) -> &ResolveContext<'a> {
        &self.ctx
    }

    /// Replace the image in `slot` with an `<img>` element pointing at `resolved`.
    ///
    /// Never fails: an unreadable image only loses its width/height.
    /// Slots that do not hold an image are left alone.
    pub async fn rewrite(&self, slot: &mut Node, resolved: &Path, url: &ParsedUrl<'_>) {
        let Node::Image(image) = &*slot else {
            return;
        };

        let relative = relative_module_path(self.ctx.source_dir(), resolved);
        let src = asset_reference(self.loader, &relative, url.search, url.hash);

        let mut attributes = vec![
            JsxAttribute::expression("src", src),
            JsxAttribute::text("loading", "lazy"),
        ];
        if let Some(alt) = image.alt.as_deref().filter(|s| !s.is_empty()) {
            attributes.push(JsxAttribute::text("alt", escape_attr(alt)));
        }
        if let Some(title) = image.title.as_deref().filter(|s| !s.is_empty()) {
            attributes.push(JsxAttribute::text("title", escape_attr(title)));
        }

        match probe_dimensions(resolved).await {
            Ok(dims) => {
                debug!("probe"; "{} is {}x{}", self.ctx.display(resolved), dims.width, dims.height);
                if dims.width > 0 {
                    attributes.push(JsxAttribute::number("width", dims.width));
                }
                if dims.height > 0 {
                    attributes.push(JsxAttribute::number("height", dims.height));
                }
            }
            Err(err) => {
                self.report_unreadable(resolved, &err);
            }
        }

        *slot = Node::Element(JsxElement::img(attributes));
    }

    /// Warn about an image that exists but could not be measured.
    ///
    /// Returns whether a warning was printed (`probe.warn`).
    fn report_unreadable(&self, resolved: &Path, err: &ProbeError) -> bool {
        if self.warn_unreadable {
            log!(
                "warning";
                "the image at {} can't be read correctly, please ensure it's a valid image: {}",
                self.ctx.display(resolved),
                err
            );
        }
        self.warn_unreadable
    }
}

/// `./`-prefixed posix path of `resolved` relative to `source_dir`.
///
/// The prefix keeps a bare file name from being read as a package name.
pub fn relative_module_path(source_dir: &Path, resolved: &Path) -> String {
    format!("./{}", to_posix(&relative_path(source_dir, resolved)))
}

/// Build the `src` expression for an image.
///
/// # Example
/// ```ignore
/// asset_reference("!file-loader!", "./pic.png", Some("?x=1"), Some("#y"))
///     == r#"require("!file-loader!./pic.png?x=1").default + '#y'"#
/// ```
pub fn asset_reference(
    loader: &str,
    relative: &str,
    search: Option<&str>,
    hash: Option<&str>,
) -> String {
    let mut src = format!(
        "require(\"{}{}{}\").default",
        loader,
        escape_js_string(relative),
        search.map(escape_js_string).unwrap_or_default()
    );
    if let Some(hash) = hash {
        src.push_str(&format!(" + '{}'", escape_js_single(hash)));
    }
    src
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{AttrValue, ImageNode};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const LOADER: &str = "!file-loader!";

    fn make_config(root: &Path) -> ImageConfig {
        let mut config = ImageConfig::new(root, vec![root.join("static")]);
        config.loader = LOADER.to_owned();
        config
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        ::image::RgbImage::new(width, height).save(path).unwrap();
    }

    fn element(node: &Node) -> &JsxElement {
        node.as_element().expect("image should be rewritten")
    }

    #[test]
    fn test_relative_module_path() {
        assert_eq!(
            relative_module_path(Path::new("/site/docs"), Path::new("/site/docs/pic.png")),
            "./pic.png"
        );
        assert_eq!(
            relative_module_path(Path::new("/site/docs/a"), Path::new("/site/static/img/x.png")),
            "./../../static/img/x.png"
        );
    }

    #[test]
    fn test_asset_reference() {
        assert_eq!(
            asset_reference(LOADER, "./pic.png", None, None),
            r#"require("!file-loader!./pic.png").default"#
        );
        assert_eq!(
            asset_reference(LOADER, "./pic.png", Some("?x=1"), Some("#y")),
            r#"require("!file-loader!./pic.png?x=1").default + '#y'"#
        );
        assert_eq!(
            asset_reference(LOADER, "./a\"b.png", None, None),
            r#"require("!file-loader!./a\"b.png").default"#
        );
    }

    #[tokio::test]
    async fn test_rewrite_with_dimensions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("docs")).unwrap();
        let doc = root.join("docs/intro.md");
        let pic = root.join("docs/pic.png");
        write_png(&pic, 100, 50);

        let config = make_config(&root);
        let rewriter = ImageRewriter::new(&config, &doc);
        let mut slot = Node::Image(ImageNode::new("./pic.png").with_alt("A <cat>").with_title("T"));

        rewriter
            .rewrite(&mut slot, &pic, &ParsedUrl::parse("./pic.png"))
            .await;

        let elem = element(&slot);
        assert_eq!(elem.name.as_deref(), Some("img"));
        assert!(elem.children.is_empty());
        assert_eq!(
            elem.attr_names(),
            ["src", "loading", "alt", "title", "width", "height"]
        );
        assert_eq!(
            elem.attr("src").and_then(AttrValue::as_expression),
            Some(r#"require("!file-loader!./pic.png").default"#)
        );
        assert_eq!(elem.attr("loading").and_then(AttrValue::as_text), Some("lazy"));
        assert_eq!(
            elem.attr("alt").and_then(AttrValue::as_text),
            Some("A &lt;cat&gt;")
        );
        assert_eq!(elem.attr("title").and_then(AttrValue::as_text), Some("T"));
        assert_eq!(elem.attr("width").and_then(AttrValue::as_number), Some(100));
        assert_eq!(elem.attr("height").and_then(AttrValue::as_number), Some(50));
    }

    #[tokio::test]
    async fn test_rewrite_undecodable_image_omits_size() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let doc = root.join("intro.md");
        let pic = root.join("broken.png");
        std::fs::write(&pic, "not an image").unwrap();

        let mut config = make_config(&root);
        config.probe.warn = false;
        let rewriter = ImageRewriter::new(&config, &doc);
        let mut slot = Node::Image(ImageNode::new("./broken.png"));

        rewriter
            .rewrite(&mut slot, &pic, &ParsedUrl::parse("./broken.png"))
            .await;

        assert_eq!(element(&slot).attr_names(), ["src", "loading"]);
    }

    #[tokio::test]
    async fn test_rewrite_keeps_query_and_hash() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let doc = root.join("intro.md");
        let pic = root.join("pic.png");
        write_png(&pic, 2, 2);

        let config = make_config(&root);
        let rewriter = ImageRewriter::new(&config, &doc);
        let mut slot = Node::Image(ImageNode::new("./pic.png?x=1#y"));

        rewriter
            .rewrite(&mut slot, &pic, &ParsedUrl::parse("./pic.png?x=1#y"))
            .await;

        assert_eq!(
            element(&slot).attr("src").and_then(AttrValue::as_expression),
            Some(r#"require("!file-loader!./pic.png?x=1").default + '#y'"#)
        );
    }

    #[tokio::test]
    async fn test_rewrite_ignores_non_image_slot() {
        let config = make_config(Path::new("/site"));
        let doc = PathBuf::from("/site/intro.md");
        let rewriter = ImageRewriter::new(&config, &doc);
        let mut slot = Node::text("plain");

        rewriter
            .rewrite(&mut slot, Path::new("/site/pic.png"), &ParsedUrl::parse("./pic.png"))
            .await;

        assert_eq!(slot, Node::text("plain"));
    }

    #[test]
    fn test_report_unreadable_follows_probe_warn() {
        let root = Path::new("/site");
        let doc = PathBuf::from("/site/intro.md");
        let pic = Path::new("/site/broken.png");

        let config = make_config(root);
        assert!(config.probe.warn);
        assert!(ImageRewriter::new(&config, &doc).report_unreadable(pic, &ProbeError::Empty));

        let mut quiet = make_config(root);
        quiet.probe.warn = false;
        assert!(!ImageRewriter::new(&quiet, &doc).report_unreadable(pic, &ProbeError::Empty));
    }
}
