//! Path inspection for URL-suffix based matching.

/// Returns the lowercase extension of the last path segment of `url`.
///
/// Query and fragment are ignored. Returns `None` if the URL cannot be parsed
/// or the last segment has no extension.
pub fn path_extension(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            path_extension("https://example.com/live/index.m3u8").as_deref(),
            Some("m3u8")
        );
        assert_eq!(
            path_extension("https://example.com/manifest.MPD").as_deref(),
            Some("mpd")
        );
    }

    #[test]
    fn with_query() {
        assert_eq!(
            path_extension("https://example.com/a.m3u8?token=abc.def").as_deref(),
            Some("m3u8")
        );
    }

    #[test]
    fn none_cases() {
        assert_eq!(path_extension("https://example.com/"), None);
        assert_eq!(path_extension("https://example.com/live"), None);
        assert_eq!(path_extension("https://example.com/.hidden"), None);
        assert_eq!(path_extension("not a url"), None);
    }
}
