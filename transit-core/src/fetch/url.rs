//! Feed URL construction

use alloc::string::String;

/// Build the feed URL from a configured base and optional path
///
/// - `http://` is prefixed unless the base already names `http://` or
///   `https://`
/// - the base ends in exactly one `/`
/// - `path` (query strings included) follows with its leading `/` removed
pub fn build_feed_url(base: &str, path: &str) -> String {
    let has_scheme = base.starts_with("http://") || base.starts_with("https://");
    let host = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let mut url = String::with_capacity(host.len() + path.len() + 8);
    if !has_scheme {
        url.push_str("http://");
    }
    url.push_str(host);
    url.push('/');
    url.push_str(path);
    url
}
