use std::sync::Arc;

use crate::plugin::{Plugin, PluginContext, PluginFactory, StreamKind};
use crate::url_model::update_scheme;

use super::{strip_protocol, DirectPlugin};

const PREFIXES: &[&str] = &["httpstream://"];

/// `httpstream://` URLs: a plain progressive HTTP stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpStreamFactory;

impl PluginFactory for HttpStreamFactory {
    fn can_handle_url(&self, url: &str) -> bool {
        strip_protocol(url, PREFIXES).is_some()
    }

    fn create(&self, url: &str, context: Arc<PluginContext>) -> Arc<dyn Plugin> {
        let target = strip_protocol(url, PREFIXES)
            .map(|rest| update_scheme("http://", rest))
            .unwrap_or_else(|| url.to_string());
        Arc::new(DirectPlugin::new(context, url, target, StreamKind::Http))
    }
}
