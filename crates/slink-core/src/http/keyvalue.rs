//! `key=value` list parsing for cookies, headers and query params.

use indexmap::IndexMap;

/// Parse `delimiter`-separated `key=value` segments.
///
/// Whitespace around segments, keys and values is trimmed and empty segments
/// are skipped. The first `=` splits key from value, so values may contain
/// `=`. A segment without `=` or with an empty key is an error; the message
/// names the offending segment.
pub fn parse_key_value_list(
    input: &str,
    delimiter: char,
) -> Result<IndexMap<String, String>, String> {
    let mut out = IndexMap::new();
    for segment in input.split(delimiter) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            return Err(format!("segment '{segment}' has no '='"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("segment '{segment}' has an empty key"));
        }
        out.insert(key.to_string(), value.trim().to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies() {
        let m = parse_key_value_list("a=1;b=2", ';').unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["a"], "1");
        assert_eq!(m["b"], "2");
    }

    #[test]
    fn trims_and_skips_empty() {
        let m = parse_key_value_list(" foo = bar ; ; baz=qux;", ';').unwrap();
        let pairs: Vec<(&str, &str)> = m.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, [("foo", "bar"), ("baz", "qux")]);
    }

    #[test]
    fn value_may_contain_equals() {
        let m = parse_key_value_list("token=abc==&x=", '&').unwrap();
        assert_eq!(m["token"], "abc==");
        assert_eq!(m["x"], "");
    }

    #[test]
    fn missing_equals_is_error() {
        let err = parse_key_value_list("a=1;b", ';').unwrap_err();
        assert!(err.contains("'b'"));
        assert!(parse_key_value_list("=1", ';').is_err());
    }
}
