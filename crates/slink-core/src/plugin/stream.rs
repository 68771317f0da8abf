use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::options::OptionValue;

/// Transport family of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Hls,
    Dash,
    Http,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Hls => "hls",
            StreamKind::Dash => "dash",
            StreamKind::Http => "http",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a playable stream. Opening and reading it is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stream {
    pub kind: StreamKind,
    pub url: String,
    /// Extra request headers the stream needs.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Stream {
    pub fn new(kind: StreamKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }
}

/// Streams keyed by quality label, in the order the plugin produced them.
pub type Streams = IndexMap<String, Stream>;

/// Parameters forwarded to [`super::Plugin::streams`].
#[derive(Debug, Clone, Default)]
pub struct StreamParams {
    /// Only keep streams of these kinds (by [`StreamKind::as_str`]); `None` keeps all.
    pub stream_types: Option<Vec<String>>,
    /// Plugin-specific parameters.
    pub extra: BTreeMap<String, OptionValue>,
}

impl StreamParams {
    pub fn allows(&self, kind: StreamKind) -> bool {
        match &self.stream_types {
            None => true,
            Some(types) => types.iter().any(|t| t.eq_ignore_ascii_case(kind.as_str())),
        }
    }

    /// Drop streams whose kind is filtered out.
    pub fn filter(&self, streams: Streams) -> Streams {
        streams
            .into_iter()
            .filter(|(_, s)| self.allows(s.kind))
            .collect()
    }
}
