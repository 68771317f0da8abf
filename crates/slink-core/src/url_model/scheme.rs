//! Scheme detection and defaulting.

/// Returns true if `url` starts with `scheme://` for a syntactically valid
/// scheme (ASCII letter followed by letters, digits, `+`, `-` or `.`).
///
/// `localhost:8080/x` has no scheme: a scheme is only recognised when it is
/// followed by `://`.
pub fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Gives `target` the scheme of `current` when it has none.
///
/// `current` may be a bare scheme prefix (`"http://"`) or a full URL.
///
/// - `example.com/x` with `http://` → `http://example.com/x`
/// - `//cdn.example.com/x` with `https://` → `https://cdn.example.com/x`
/// - `rtmp://host/app` is returned unchanged
pub fn update_scheme(current: &str, target: &str) -> String {
    let target = target.trim();
    if has_scheme(target) {
        return target.to_string();
    }
    let scheme = current
        .split_once(':')
        .map(|(s, _)| s)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");
    match target.strip_prefix("//") {
        Some(rest) => format!("{scheme}://{rest}"),
        None => format!("{scheme}://{target}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_schemes() {
        assert!(has_scheme("http://example.com"));
        assert!(has_scheme("hlsvariant://example.com/a.m3u8"));
        assert!(has_scheme("socks5h://127.0.0.1:1080"));
        assert!(!has_scheme("example.com/x"));
        assert!(!has_scheme("localhost:8080/x"));
        assert!(!has_scheme("//cdn.example.com/x"));
        assert!(!has_scheme("1abc://nope"));
    }

    #[test]
    fn defaults_missing_scheme() {
        assert_eq!(
            update_scheme("http://", "example.com/x"),
            "http://example.com/x"
        );
        assert_eq!(
            update_scheme("https://", "proxy.local:3128"),
            "https://proxy.local:3128"
        );
    }

    #[test]
    fn protocol_relative_takes_current_scheme() {
        assert_eq!(
            update_scheme("https://example.com/page", "//cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn keeps_existing_scheme() {
        assert_eq!(
            update_scheme("http://", "rtmp://host/app"),
            "rtmp://host/app"
        );
        assert_eq!(
            update_scheme("http://", "  https://example.com "),
            "https://example.com"
        );
    }

    #[test]
    fn idempotent() {
        let once = update_scheme("http://", "example.com/x");
        assert_eq!(update_scheme("http://", &once), once);
    }
}
