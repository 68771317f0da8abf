use std::sync::Arc;

use crate::plugin::{
    Plugin, PluginContext, PluginFactory, StreamKind, LOW_PRIORITY, NORMAL_PRIORITY,
};
use crate::url_model::{path_extension, update_scheme};

use super::{strip_protocol, DirectPlugin};

const PREFIXES: &[&str] = &["hls://", "hlsvariant://"];

/// `hls://` / `hlsvariant://` URLs, and any URL whose path ends in `.m3u8`
/// (at low priority so site plugins win).
#[derive(Debug, Clone, Copy, Default)]
pub struct HlsFactory;

impl PluginFactory for HlsFactory {
    fn can_handle_url(&self, url: &str) -> bool {
        strip_protocol(url, PREFIXES).is_some() || path_extension(url).as_deref() == Some("m3u8")
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
        Arc::new(DirectPlugin::new(context, url, target, StreamKind::Hls))
    }
}
