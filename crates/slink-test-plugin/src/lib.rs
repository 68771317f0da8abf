//! Minimal drop-in plugin: handles `fixture://` URLs and reports one HTTP
//! stream at the same path over `https`.

use std::sync::Arc;

use slink_core::plugin::{PluginContext, PluginError, Stream, StreamKind, HIGH_PRIORITY};
use slink_core::{OptionValue, Plugin, PluginFactory, StreamParams, Streams};

const SCHEME: &str = "fixture://";

#[derive(Default)]
struct FixtureFactory;

impl PluginFactory for FixtureFactory {
    fn can_handle_url(&self, url: &str) -> bool {
        url.starts_with(SCHEME)
    }

    fn priority(&self, _url: &str) -> i32 {
        HIGH_PRIORITY
    }

    fn default_options(&self) -> Vec<(&'static str, OptionValue)> {
        vec![("quality", OptionValue::from("best"))]
    }

    fn create(&self, url: &str, context: Arc<PluginContext>) -> Arc<dyn Plugin> {
        Arc::new(Fixture {
            context,
            url: url.to_string(),
        })
    }
}

#[derive(Debug)]
struct Fixture {
    context: Arc<PluginContext>,
    url: String,
}

impl Plugin for Fixture {
    fn module(&self) -> &str {
        self.context.id()
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn streams(&self, params: &StreamParams) -> Result<Streams, PluginError> {
        let path = self.url.trim_start_matches(SCHEME);
        let mut streams = Streams::new();
        streams.insert(
            "source".to_string(),
            Stream::new(StreamKind::Http, format!("https://{path}")),
        );
        Ok(params.filter(streams))
    }
}

slink_core::export_plugin!(FixtureFactory);
