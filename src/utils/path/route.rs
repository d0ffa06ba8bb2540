//! URL text utilities.
//!
//! Works on raw markdown image targets, which are usually not absolute URLs
//! (`./pic.png?x=1#y`, `/img/a.png`, `@site/static/a.png`), so splitting is
//! done textually rather than through `url::Url`.

/// Extract the URL scheme (lowercased, without `:`) if the link has one.
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// # Examples
/// ```ignore
/// assert_eq!(url_scheme("https://example.com"), Some("https".into()));
/// assert_eq!(url_scheme("PATHNAME:///a.png"), Some("pathname".into()));
/// assert_eq!(url_scheme("./file.png"), None);
/// ```
pub fn url_scheme(link: &str) -> Option<String> {
    let pos = link.find(':')?;
    let candidate = &link[..pos];
    let valid = pos > 0
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return None;
    }

    // `url` normalizes the scheme when the whole link parses; fall back to
    // the raw prefix for links it rejects (e.g. `foo:` with nothing after).
    Some(match url::Url::parse(link) {
        Ok(parsed) => parsed.scheme().to_owned(),
        Err(_) => candidate.to_ascii_lowercase(),
    })
}

/// Split a link into `(before, hash)` where `hash` keeps its leading `#`.
///
/// # Examples
/// ```ignore
/// assert_eq!(split_hash("./a.png#top"), ("./a.png", Some("#top")));
/// assert_eq!(split_hash("./a.png"), ("./a.png", None));
/// ```
#[inline]
pub fn split_hash(link: &str) -> (&str, Option<&str>) {
    match link.find('#') {
        Some(pos) => (&link[..pos], Some(&link[pos..])),
        None => (link, None),
    }
}

/// Split a link into `(path, search)` where `search` keeps its leading `?`.
#[inline]
pub fn split_search(link: &str) -> (&str, Option<&str>) {
    match link.find('?') {
        Some(pos) => (&link[..pos], Some(&link[pos..])),
        None => (link, None),
    }
}
