//! Raw image URL parsing and classification.

use std::path::Path;

use crate::utils::path::{split_hash, split_search, url_scheme};

/// Scheme that opts an image out of resolution: `pathname:///img/raw.png`.
pub const ESCAPE_SCHEME: &str = "pathname";

/// Prefix for project-root-relative image paths.
pub const SITE_ALIAS: &str = "@site/";

/// A markdown image target split into its URL components.
///
/// `search` and `hash` keep their leading `?` / `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl<'a> {
    pub raw: &'a str,
    /// Lowercased scheme without the trailing `:`
    pub protocol: Option<String>,
    pub pathname: Option<&'a str>,
    pub search: Option<&'a str>,
    pub hash: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    /// Split `raw` into protocol, pathname, search and hash.
    ///
    /// # Examples
    /// ```ignore
    /// let url = ParsedUrl::parse("./pic.png?x=1#y");
    /// assert_eq!(url.pathname, Some("./pic.png"));
    /// assert_eq!(url.search, Some("?x=1"));
    /// assert_eq!(url.hash, Some("#y"));
    /// ```
    pub fn parse(raw: &'a str) -> Self {
        let protocol = url_scheme(raw);
        let rest = match (&protocol, raw.find(':')) {
            (Some(_), Some(colon)) => &raw[colon + 1..],
            _ => raw,
        };

        let (before_hash, hash) = split_hash(rest);
        let (path, search) = split_search(before_hash);

        Self {
            raw,
            protocol,
            pathname: (!path.is_empty()).then_some(path),
            search,
            hash,
        }
    }

    /// What the image pass should do with this URL.
    pub fn action(&self) -> UrlAction<'a> {
        match (self.protocol.as_deref(), self.pathname) {
            (Some(ESCAPE_SCHEME), _) => {
                UrlAction::Escape(self.raw.replacen("pathname://", "", 1))
            }
            (Some(_), _) | (None, None) => UrlAction::Skip,
            (None, Some(pathname)) => UrlAction::Resolve(pathname),
        }
    }
}

/// Per-image decision taken before any filesystem access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlAction<'a> {
    /// Remote or otherwise scheme-qualified URL (or no pathname): leave the node as is.
    Skip,
    /// Escape hatch: replace the node's `url` with this string, nothing else.
    Escape(String),
    /// Local file reference to resolve and rewrite.
    Resolve(&'a str),
}

/// Resolution strategy for a local pathname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind<'a> {
    /// `@site/static/a.png` -> `static/a.png` under the project root.
    SiteAlias(&'a str),
    /// `/img/a.png`, looked up in each static directory.
    Absolute(&'a str),
    /// `./a.png`, `../img/a.png`, `a.png`, next to the document.
    Relative(&'a str),
}

impl<'a> PathKind<'a> {
    #[inline]
    pub fn parse(pathname: &'a str) -> Self {
        if let Some(rest) = pathname.strip_prefix(SITE_ALIAS) {
            Self::SiteAlias(rest)
        } else if pathname.starts_with('/') || Path::new(pathname).is_absolute() {
            Self::Absolute(pathname)
        } else {
            Self::Relative(pathname)
        }
    }
}
