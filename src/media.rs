//! Video link recognition. Decides whether a song link points at a known video
//! host and pulls out the video identifier used to build the embedded player
//! URL. Everything here is total: malformed input yields `false` or an empty
//! identifier, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Hosts (after dropping a leading `www.`) that the player understands.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "m.youtube.com"];

/// Short-link host whose first path segment is the identifier.
const SHORT_LINK_HOST: &str = "youtu.be";

/// Privacy-enhanced host serving the embedded player.
const EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed";

/// `/embed/<id>` anywhere in the path.
static EMBED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/embed/([A-Za-z0-9_-]{6,})").unwrap());

/// Last-resort match over the raw link: the token after `v=` or a `/` that
/// ends the URL, optionally followed by a query string.
static GENERIC_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([A-Za-z0-9_-]{6,})(?:[&?].*)?$").unwrap());

fn normalized_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// True when `link` parses as a URL on one of the known video hosts.
pub fn is_recognized_media_url(link: &str) -> bool {
    Url::parse(link)
        .ok()
        .and_then(|url| normalized_host(&url))
        .map(|host| VIDEO_HOSTS.contains(&host.as_str()))
        .unwrap_or(false)
}

/// Video identifier carried by `link`, or an empty string when none can be
/// found. Rules are tried in order: short-link path, `v` query parameter,
/// `/embed/<id>` path, then a generic pattern over the raw text.
pub fn extract_video_id(link: &str) -> String {
    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => return String::new(),
    };

    if normalized_host(&url).as_deref() == Some(SHORT_LINK_HOST) {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .unwrap_or_default()
            .to_string();
    }

    if let Some((_, value)) = url.query_pairs().find(|(name, _)| name == "v") {
        if !value.is_empty() {
            return value.into_owned();
        }
    }

    if let Some(caps) = EMBED_PATH.captures(url.path()) {
        return caps[1].to_string();
    }

    GENERIC_ID
        .captures(link)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Embedded player URL for a video identifier.
pub fn embed_url(video_id: &str, autoplay: bool) -> String {
    format!(
        "{EMBED_BASE}/{video_id}?autoplay={}&modestbranding=1&rel=0&playsinline=1",
        if autoplay { 1 } else { 0 }
    )
}
