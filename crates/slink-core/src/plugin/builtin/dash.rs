use std::sync::Arc;

use crate::plugin::{
    Plugin, PluginContext, PluginFactory, StreamKind, LOW_PRIORITY, NORMAL_PRIORITY,
};
use crate::url_model::{path_extension, update_scheme};

use super::{strip_protocol, DirectPlugin};

const PREFIXES: &[&str] = &["dash://"];

/// `dash://` URLs and URLs whose path ends in `.mpd`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashFactory;

impl PluginFactory for DashFactory {
    fn can_handle_url(&self, url: &str) -> bool {
        strip_protocol(url, PREFIXES).is_some() || path_extension(url).as_deref() == Some("mpd")
    }

    fn priority(&self, url: &str) -> i32 {
        if strip_protocol(url, PREFIXES).is_some() {
            NORMAL_PRIORITY
        } else {
            LOW_PRIORITY
        }
    }

    fn create(&self, url: &str, context: Arc<PluginContext>) -> Arc<dyn Plugin> {
        let target = match strip_protocol(url, PREFIXES) {
            Some(rest) => update_scheme("http://", rest),
            None => url.to_string(),
        };
        Arc::new(DirectPlugin::new(context, url, target, StreamKind::Dash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_prefix_and_suffix() {
        let f = DashFactory;
        assert!(f.can_handle_url("dash://example.com/manifest"));
        assert!(f.can_handle_url("https://example.com/vod/manifest.mpd"));
        assert!(!f.can_handle_url("https://example.com/vod/index.m3u8"));
        assert_eq!(f.priority("dash://example.com/m.mpd"), NORMAL_PRIORITY);
        assert_eq!(f.priority("https://example.com/m.mpd"), LOW_PRIORITY);
    }
}
