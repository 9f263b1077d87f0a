//! Base URL resolution and path joining.
//!
//! Neither function here fails.  A base that cannot be parsed degrades to a relative path, and
//! the absence of any configuration degrades to [`DEFAULT_BASE_URL`].

use tracing::warn;
use url::Url;

/// Base used when neither an override nor a hosting origin is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Resolve the origin API requests go to.
///
/// Priority:
/// 1. `override_base`, when it is non-empty after trimming;
/// 2. `origin`, the origin the front end is served from (same-origin deployments sit behind a
///    reverse proxy that routes `/api` and `/health` to the backend);
/// 3. [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(override_base: Option<&str>, origin: Option<&str>) -> String {
    if let Some(base) = non_empty(override_base) {
        return base.to_string();
    }
    if let Some(origin) = non_empty(origin) {
        return origin.to_string();
    }
    DEFAULT_BASE_URL.to_string()
}

/// Join `path` onto `base`.
///
/// When `base` is an absolute URL the result is absolute: any path prefix on the base is kept,
/// trailing slashes on the base collapse, and exactly one `/` separates the two.  When `base`
/// is empty or not an absolute URL, `path` comes back unchanged so the caller can treat it as
/// relative to its own origin.
///
/// ```
/// use copilot::endpoint::build_url;
///
/// assert_eq!(build_url("/api/chat", "http://localhost:3001"), "http://localhost:3001/api/chat");
/// assert_eq!(build_url("/api/chat", "https://example.com/copilot//"), "https://example.com/copilot/api/chat");
/// assert_eq!(build_url("/api/chat", "not a valid url"), "/api/chat");
/// ```
pub fn build_url(path: &str, base: &str) -> String {
    let base = base.trim();
    if base.is_empty() {
        return path.to_string();
    }
    let mut url = match Url::parse(base) {
        Ok(url) if !url.cannot_be_a_base() => url,
        Ok(_) => {
            warn!(base, path, "base URL cannot carry a path; using relative path");
            return path.to_string();
        }
        Err(err) => {
            warn!(base, path, error = %err, "invalid base URL; using relative path");
            return path.to_string();
        }
    };
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };
    let prefix = url.path().trim_end_matches('/').to_string();
    let suffix = path.trim_start_matches('/');
    url.set_path(&format!("{prefix}/{suffix}"));
    url.set_query(query);
    url.set_fragment(None);
    url.to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
