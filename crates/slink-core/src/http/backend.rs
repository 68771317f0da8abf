use super::{HttpSettings, TransportError};

/// Request shape used by redirect probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    /// GET that stops reading after the response headers.
    StreamingGet,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::StreamingGet => "GET",
        }
    }
}

/// Outcome of a request after redirects were followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    /// Effective URL after the redirect chain.
    pub url: String,
}

/// Performs requests with the given settings applied.
///
/// Implementations follow redirects up to `settings.max_redirects` and
/// report the final status; status interpretation is up to the caller.
/// Calls block the current thread.
pub trait HttpBackend: Send + Sync {
    fn execute(
        &self,
        method: ProbeMethod,
        url: &str,
        settings: &HttpSettings,
    ) -> Result<HttpResponse, TransportError>;
}
