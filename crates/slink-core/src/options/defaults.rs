//! Session option defaults.

use super::OptionValue;
use OptionValue::{Bool, Float, Int, List, Null, Str};

/// 16 MiB.
const RINGBUFFER_SIZE: i64 = 16 * 1024 * 1024;

const RTMPDUMP: &str = if cfg!(windows) { "rtmpdump.exe" } else { "rtmpdump" };

/// The session's default option table.
///
/// Key names and values are part of the plugin-facing contract and must not
/// be renamed.
pub fn session_defaults() -> Vec<(&'static str, OptionValue)> {
    vec![
        ("interface", Null),
        ("ipv4", Bool(false)),
        ("ipv6", Bool(false)),
        ("dash-live-edge", Int(3)),
        ("hds-live-edge", Float(10.0)),
        ("hds-segment-attempts", Int(3)),
        ("hds-segment-threads", Int(1)),
        ("hds-segment-timeout", Float(10.0)),
        ("hds-timeout", Float(60.0)),
        ("hls-live-edge", Int(3)),
        ("ts-url-add-m3u-url-params", Bool(false)),
        ("hls-segment-host", Null),
        ("hls-segment-attempts", Int(3)),
        ("hls-segment-ignore-names", List(Vec::new())),
        ("hls-segment-threads", Int(1)),
        ("hls-segment-timeout", Float(10.0)),
        ("hls-segment-stream-data", Bool(false)),
        ("hls-timeout", Float(60.0)),
        ("hls-playlist-reload-attempts", Int(3)),
        ("hls-playlist-reload-time", Str("default".to_string())),
        ("hls-start-offset", Int(0)),
        ("hls-duration", Null),
        ("http-stream-timeout", Float(60.0)),
        ("hls-token-period", Float(60.0)),
        ("ringbuffer-size", Int(RINGBUFFER_SIZE)),
        ("rtmp-timeout", Float(60.0)),
        ("rtmp-rtmpdump", Str(RTMPDUMP.to_string())),
        ("rtmp-proxy", Null),
        ("stream-segment-attempts", Int(3)),
        ("stream-segment-threads", Int(1)),
        ("stream-segment-timeout", Float(10.0)),
        ("stream-timeout", Float(60.0)),
        ("drm-decrypt-key", Null),
        ("drm-temp-dir", Null),
        ("stream-max-playback-duration", Int(0)),
        ("subprocess-errorlog", Bool(false)),
        ("subprocess-errorlog-path", Null),
        ("ffmpeg-ffmpeg", Null),
        ("ffmpeg-fout", Null),
        ("ffmpeg-video-transcode", Null),
        ("ffmpeg-audio-transcode", Null),
        ("ffmpeg-copyts", Bool(false)),
        ("ffmpeg-start-at-zero", Bool(false)),
        ("mux-subtitles", Bool(false)),
        ("locale", Null),
        ("user-input-requester", Null),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let defaults = session_defaults();
        let keys: HashSet<&str> = defaults.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), defaults.len());
    }

    #[test]
    fn documented_values() {
        let defaults: std::collections::HashMap<_, _> = session_defaults().into_iter().collect();
        assert_eq!(defaults["ringbuffer-size"], Int(16_777_216));
        assert_eq!(defaults["hls-live-edge"], Int(3));
        assert_eq!(defaults["hds-live-edge"], Float(10.0));
        assert_eq!(defaults["hls-playlist-reload-time"], Str("default".into()));
        assert_eq!(defaults["hls-segment-ignore-names"], List(vec![]));
        assert_eq!(defaults["interface"], Null);
        assert_eq!(defaults["ipv4"], Bool(false));
        assert_eq!(defaults["ipv6"], Bool(false));
    }

    #[test]
    fn routed_transport_keys_are_not_defaults() {
        let defaults: HashSet<&str> = session_defaults().iter().map(|(k, _)| *k).collect();
        for key in ["http-proxy", "http-cookies", "error-http-status-codes", "http-timeout"] {
            assert!(!defaults.contains(key), "{key} lives on the transport");
        }
    }
}
