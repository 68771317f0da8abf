use std::sync::Arc;

use crate::plugin::{Plugin, PluginContext, PluginError, Stream, StreamKind, StreamParams, Streams};

/// Instance produced by the generic plugins: a single `live` stream pointing
/// at the target URL.
#[derive(Debug)]
pub struct DirectPlugin {
    context: Arc<PluginContext>,
    url: String,
    target: String,
    kind: StreamKind,
}

impl DirectPlugin {
    pub fn new(context: Arc<PluginContext>, url: &str, target: String, kind: StreamKind) -> Self {
        Self {
            context,
            url: url.to_string(),
            target,
            kind,
        }
    }

    /// URL the stream handle points at.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Plugin for DirectPlugin {
    fn module(&self) -> &str {
        self.context.id()
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn streams(&self, params: &StreamParams) -> Result<Streams, PluginError> {
        let mut streams = Streams::new();
        streams.insert("live".to_string(), Stream::new(self.kind, self.target.clone()));
        Ok(params.filter(streams))
    }
}
