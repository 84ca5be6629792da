//! URL path patterns derived from route ids.

use std::sync::LazyLock;

use regex::Regex;

static INDEX_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b/?index$").expect("index suffix pattern is valid"));

/// Converts a route id (relative to `routes/`) into a URL path pattern.
///
/// - `$param` becomes `:param`
/// - `.` becomes `/`, so `about.us` nests without a subdirectory
/// - a trailing `index` segment is dropped, so `gists/index` maps to `gists`
///
/// ```
/// use remix_routes::create_route_path;
///
/// assert_eq!(create_route_path("gists/$username"), "gists/:username");
/// assert_eq!(create_route_path("about.us"), "about/us");
/// assert_eq!(create_route_path("gists/index"), "gists");
/// assert_eq!(create_route_path("index"), "");
/// ```
pub fn create_route_path(route_id: &str) -> String {
    let path = route_id.replace('$', ":").replace('.', "/");
    INDEX_SUFFIX.replace(&path, "").into_owned()
}
