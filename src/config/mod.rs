//! Configuration for the image pass, optionally read from `mdimg.toml`.
//!
//! # Keys
//!
//! | Key           | Purpose                                              |
//! |---------------|------------------------------------------------------|
//! | `site_dir`    | Project root, relative to the config file            |
//! | `static_dirs` | Public asset roots, relative to `site_dir`, in order |
//! | `loader`      | Prefix placed before the path inside `require("…")`  |
//! | `[probe]`     | Dimension probing (`warn = false` silences warnings) |
//!
//! Paths are relative in the file and absolute after [`ImageConfig::finalize`].

mod error;
mod util;

pub use error::ConfigError;
pub use util::find_config_file;

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::log;
use crate::resolve::ResolveContext;
use crate::utils::path::{clean_path, display_path};

/// Default config file name.
pub const CONFIG_FILE: &str = "mdimg.toml";

/// Loader chain for inlined markdown images: small files become data URLs,
/// larger ones are emitted as hashed assets.
pub const DEFAULT_LOADER: &str =
    "!url-loader?limit=10000&name=assets/images/[name]-[contenthash].[ext]&fallback=file-loader!";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mdimg.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Absolute path to the config file, if one was loaded (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory
    pub site_dir: PathBuf,

    /// Static asset directories, first match wins
    pub static_dirs: Vec<PathBuf>,

    /// Asset loader prefix embedded in generated `src` expressions
    pub loader: String,

    /// Dimension probing settings
    pub probe: ProbeConfig,
}

/// `[probe]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Warn when an existing image cannot be measured
    pub warn: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { warn: true }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            site_dir: PathBuf::from("."),
            static_dirs: vec![PathBuf::from("static")],
            loader: DEFAULT_LOADER.to_owned(),
            probe: ProbeConfig::default(),
        }
    }
}

impl ImageConfig {
    /// Configuration for an absolute site directory and static directories.
    ///
    /// Relative static directories are taken relative to `site_dir`.
    pub fn new(site_dir: impl Into<PathBuf>, static_dirs: Vec<PathBuf>) -> Self {
        let mut config = Self {
            site_dir: site_dir.into(),
            static_dirs,
            ..Self::default()
        };
        let root = config.site_dir.clone();
        config.finalize(&root);
        config
    }

    /// Search `config_name` upward from `start` and load it.
    ///
    /// Without a config file, defaults apply with `start` as the project root.
    pub fn load(start: &Path, config_name: &Path) -> Result<Self, ConfigError> {
        let (mut config, root) = Self::read(start, config_name)?;
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Read the config file without anchoring its paths.
    ///
    /// Returns the raw config and the directory its relative paths refer to,
    /// so callers can apply overrides before [`ImageConfig::finalize`].
    pub fn read(start: &Path, config_name: &Path) -> Result<(Self, PathBuf), ConfigError> {
        let Some(config_path) = find_config_file(start, config_name) else {
            return Ok((Self::default(), start.to_path_buf()));
        };

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| start.to_path_buf());
        config.config_path = Some(config_path);
        Ok((config, root))
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, _ignored) = Self::parse_with_ignored(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Anchor relative paths: `site_dir` on `root`, static dirs on `site_dir`.
    pub fn finalize(&mut self, root: &Path) {
        self.site_dir = clean_path(&root.join(&self.site_dir));
        let site_dir = self.site_dir.clone();
        for dir in &mut self.static_dirs {
            *dir = clean_path(&site_dir.join(&*dir));
        }
    }

    /// Check values that would produce broken output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loader.contains('"') {
            return Err(ConfigError::Validation(
                "`loader` must not contain `\"`".to_owned(),
            ));
        }
        if !self.site_dir.is_absolute() {
            return Err(ConfigError::Validation(format!(
                "`site_dir` must resolve to an absolute path, got `{}`",
                self.site_dir.display()
            )));
        }
        Ok(())
    }

    /// Resolution context for one document.
    pub fn context<'a>(&'a self, file_path: &'a Path) -> ResolveContext<'a> {
        ResolveContext {
            site_dir: &self.site_dir,
            static_dirs: &self.static_dirs,
            file_path,
        }
    }

    /// Path as shown in messages (relative to `site_dir`, forward slashes).
    pub fn display(&self, path: &Path) -> String {
        display_path(&self.site_dir, path)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ImageConfig::from_str("").unwrap();
        assert_eq!(config.site_dir, PathBuf::from("."));
        assert_eq!(config.static_dirs, [PathBuf::from("static")]);
        assert_eq!(config.loader, DEFAULT_LOADER);
        assert!(config.probe.warn);
    }

    #[test]
    fn test_parse_values() {
        let config = ImageConfig::from_str(
            r#"
            site_dir = "website"
            static_dirs = ["static", "public"]
            loader = "!file-loader!"

            [probe]
            warn = false
            "#,
        )
        .unwrap();
        assert_eq!(config.site_dir, PathBuf::from("website"));
        assert_eq!(config.static_dirs.len(), 2);
        assert_eq!(config.loader, "!file-loader!");
        assert!(!config.probe.warn);
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            ImageConfig::parse_with_ignored("staticDirs = [\"x\"]\n[probe]\nquiet = 1\n").unwrap();
        assert_eq!(ignored, ["staticDirs", "probe.quiet"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ImageConfig::from_str("static_dirs = 3"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_finalize_anchors_paths() {
        let mut config = ImageConfig::from_str(
            "site_dir = \"website\"\nstatic_dirs = [\"static\", \"/abs/public\"]\n",
        )
        .unwrap();
        config.finalize(Path::new("/repo"));
        assert_eq!(config.site_dir, PathBuf::from("/repo/website"));
        assert_eq!(
            config.static_dirs,
            [PathBuf::from("/repo/website/static"), PathBuf::from("/abs/public")]
        );
    }

    #[test]
    fn test_validate_loader() {
        let mut config = ImageConfig::new("/site", vec![]);
        assert!(config.validate().is_ok());
        config.loader = "bad\"loader".to_owned();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "static_dirs = [\"public\"]\n",
        )
        .unwrap();

        let config = ImageConfig::load(&docs, Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(config.site_dir, clean_path(dir.path()));
        assert_eq!(config.static_dirs, [clean_path(&dir.path().join("public"))]);
        assert_eq!(config.config_path, Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    fn test_load_without_file() {
        let dir = TempDir::new().unwrap();
        let config = ImageConfig::load(dir.path(), Path::new("absent-mdimg.toml")).unwrap();
        assert_eq!(config.site_dir, clean_path(dir.path()));
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_display_relative_to_site() {
        let config = ImageConfig::new("/site", vec![]);
        assert_eq!(config.display(Path::new("/site/docs/intro.md")), "docs/intro.md");
    }
}
