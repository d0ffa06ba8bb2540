//! CLI host: read an mdast JSON tree, run the image pass, write it back.

mod args;

pub use args::{Cli, Commands, DocArgs};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::config::ImageConfig;
use crate::mdast::{Node, count_nodes};
use crate::transform::transform_images;
use crate::utils::path::normalize_path_from;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Run the parsed command line.
pub async fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    run_in(cli, &cwd).await
}

/// Run with relative command-line paths taken from `cwd`.
async fn run_in(cli: &Cli, cwd: &Path) -> Result<()> {
    let doc = cli.doc_args();
    let config = load_config(cli, doc, cwd)?;
    let file_path = normalize_path_from(cwd, &doc.file);

    debug!("config"; "site_dir = {}", config.site_dir.display());
    for dir in &config.static_dirs {
        debug!("config"; "static_dir = {}", dir.display());
    }

    let mut tree = read_tree(&stdio_or_path(cwd, &doc.tree)).await?;
    transform_images(&mut tree, &config, &file_path).await?;

    match &cli.command {
        Commands::Transform { output, pretty, .. } => {
            let target = output.as_deref().map(|path| stdio_or_path(cwd, path));
            write_tree(&tree, target.as_deref(), *pretty).await?;
            if let Some(output) = output.as_deref().filter(|p| !is_stdio(p)) {
                log!("transform"; "{} -> {}", config.display(&file_path), output.display());
            }
        }
        Commands::Check { .. } => {
            let (rewritten, untouched) = image_counts(&tree);
            log!(
                "check";
                "{}: {} resolved, {} left untouched",
                config.display(&file_path),
                plural_count(rewritten, "image"),
                untouched
            );
        }
    }
    Ok(())
}

/// Load `mdimg.toml` (if any) and apply command-line overrides.
fn load_config(cli: &Cli, doc: &DocArgs, cwd: &Path) -> Result<ImageConfig> {
    let (mut config, root) = ImageConfig::read(cwd, &cli.config)?;

    // Overrides are relative to the working directory, not the config file.
    if let Some(site_dir) = &doc.site_dir {
        config.site_dir = normalize_path_from(cwd, site_dir);
    }
    if !doc.static_dirs.is_empty() {
        config.static_dirs = doc
            .static_dirs
            .iter()
            .map(|d| normalize_path_from(cwd, d))
            .collect();
    }
    if doc.no_probe_warnings {
        config.probe.warn = false;
    }

    config.finalize(&root);
    config.site_dir = normalize_path_from(cwd, &config.site_dir);
    config.static_dirs = config
        .static_dirs
        .iter()
        .map(|d| normalize_path_from(cwd, d))
        .collect();
    config.validate()?;

    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }
    Ok(config)
}

/// `<img>` elements produced by the pass, and image nodes it left alone.
fn image_counts(tree: &Node) -> (usize, usize) {
    let rewritten = count_nodes(tree, &|n| {
        n.as_element().is_some_and(|e| e.name.as_deref() == Some("img"))
    });
    let untouched = count_nodes(tree, &|n| n.as_image().is_some());
    (rewritten, untouched)
}

/// Anchor a command-line path on `cwd`, keeping `-` as is.
fn stdio_or_path(cwd: &Path, path: &Path) -> PathBuf {
    if is_stdio(path) {
        path.to_path_buf()
    } else {
        normalize_path_from(cwd, path)
    }
}

#[inline]
fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

async fn read_tree(path: &Path) -> Result<Node> {
    let content = if is_stdio(path) {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read tree from stdin")?;
        content
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read tree `{}`", path.display()))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid mdast JSON in `{}`", path.display()))
}

async fn write_tree(tree: &Node, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    json.push('\n');

    match output.filter(|p| !is_stdio(p)) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write `{}`", path.display()))
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::{ImageNode, JsxElement};
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_and_write_tree_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("tree.json");
        let tree = json!({
            "type": "root",
            "children": [{ "type": "image", "url": "https://example.com/a.png" }]
        });
        std::fs::write(&input, tree.to_string()).unwrap();

        let node = read_tree(&input).await.unwrap();
        let output = dir.path().join("out/tree.json");
        write_tree(&node, Some(output.as_path()), true).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, tree);
    }

    #[tokio::test]
    async fn test_read_tree_invalid_json() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("tree.json");
        std::fs::write(&input, "{ not json").unwrap();

        let err = read_tree(&input).await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid mdast JSON"));
    }

    /// Project laid out as `cwd/{mdimg.toml?, site-a, site-b/static, other}`.
    fn workspace(config: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        for sub in ["site-a/static", "site-b/static", "other"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        if let Some(content) = config {
            std::fs::write(dir.path().join("mdimg.toml"), content).unwrap();
        }
        dir
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mdimg").chain(args.iter().copied())).unwrap()
    }

    fn canonical(dir: &TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = workspace(Some("site_dir = \"site-a\"\nstatic_dirs = [\"static\"]\n"));
        let cli = parse(&["check", "tree.json", "-f", "doc.md"]);

        let config = load_config(&cli, cli.doc_args(), dir.path()).unwrap();
        let root = canonical(&dir);
        assert_eq!(config.site_dir, root.join("site-a"));
        assert_eq!(config.static_dirs, [root.join("site-a/static")]);
        assert!(config.probe.warn);
        assert_eq!(config.config_path, Some(dir.path().join("mdimg.toml")));
    }

    #[test]
    fn test_cli_overrides_replace_file_values() {
        let dir = workspace(Some("site_dir = \"site-a\"\nstatic_dirs = [\"static\"]\n"));
        let cli = parse(&[
            "check",
            "tree.json",
            "-f",
            "doc.md",
            "--site-dir",
            "site-b",
            "--static-dir",
            "other",
        ]);

        let config = load_config(&cli, cli.doc_args(), dir.path()).unwrap();
        let root = canonical(&dir);
        assert_eq!(config.site_dir, root.join("site-b"));
        // Overridden static dirs are relative to the working directory.
        assert_eq!(config.static_dirs, [root.join("other")]);
    }

    #[test]
    fn test_file_static_dirs_follow_overridden_site_dir() {
        let dir = workspace(Some("site_dir = \"site-a\"\nstatic_dirs = [\"static\"]\n"));
        let cli = parse(&["check", "tree.json", "-f", "doc.md", "-s", "site-b"]);

        let config = load_config(&cli, cli.doc_args(), dir.path()).unwrap();
        assert_eq!(config.static_dirs, [canonical(&dir).join("site-b/static")]);
    }

    #[test]
    fn test_no_probe_warnings_flag() {
        let dir = workspace(Some("[probe]\nwarn = true\n"));

        let cli = parse(&["check", "tree.json", "-f", "doc.md"]);
        assert!(load_config(&cli, cli.doc_args(), dir.path()).unwrap().probe.warn);

        let cli = parse(&["check", "tree.json", "-f", "doc.md", "--no-probe-warnings"]);
        assert!(!load_config(&cli, cli.doc_args(), dir.path()).unwrap().probe.warn);
    }

    #[test]
    fn test_load_config_rejects_invalid_loader() {
        let dir = workspace(Some("loader = \"!a\\\"b!\"\n"));
        let cli = parse(&["check", "tree.json", "-f", "doc.md"]);

        let err = load_config(&cli, cli.doc_args(), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("loader"));
    }

    #[test]
    fn test_image_counts() {
        let tree = Node::root(vec![Node::paragraph(vec![
            Node::Element(JsxElement::img(Vec::new())),
            Node::Element(JsxElement::img(Vec::new())),
            Node::Image(ImageNode::new("https://example.com/a.png")),
        ])]);
        assert_eq!(image_counts(&tree), (2, 1));
    }

    fn write_site_tree(dir: &TempDir) {
        let root = dir.path();
        std::fs::create_dir_all(root.join("docs")).unwrap();
        std::fs::write(root.join("docs/intro.md"), "# intro").unwrap();
        ::image::RgbImage::new(8, 4).save(root.join("docs/pic.png")).unwrap();
        let tree = json!({
            "type": "root",
            "children": [
                { "type": "image", "url": "./pic.png", "alt": "pic" },
                { "type": "image", "url": "https://example.com/remote.png" }
            ]
        });
        std::fs::write(root.join("tree.json"), tree.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_transform_writes_output_file() {
        let dir = TempDir::new().unwrap();
        write_site_tree(&dir);
        let cli = parse(&["transform", "tree.json", "-f", "docs/intro.md", "-o", "out/tree.json"]);

        run_in(&cli, dir.path()).await.unwrap();

        let written: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out/tree.json")).unwrap(),
        )
        .unwrap();
        let img = &written["children"][0];
        assert_eq!(img["type"], "mdxJsxTextElement");
        assert_eq!(img["name"], "img");
        let width = img["attributes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|attr| attr["name"] == "width")
            .unwrap();
        assert_eq!(width["value"], 8);
        assert_eq!(written["children"][1]["type"], "image");
    }

    #[tokio::test]
    async fn test_check_rejects_missing_image() {
        let dir = TempDir::new().unwrap();
        write_site_tree(&dir);
        let cli = parse(&["check", "tree.json", "-f", "docs/intro.md"]);
        run_in(&cli, dir.path()).await.unwrap();

        std::fs::remove_file(dir.path().join("docs/pic.png")).unwrap();
        let err = run_in(&cli, dir.path()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Image docs/pic.png used in docs/intro.md not found."
        );
    }

    #[test]
    fn test_is_stdio() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("tree.json")));
    }
}
