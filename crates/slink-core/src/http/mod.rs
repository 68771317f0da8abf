//! HTTP transport collaborator.
//!
//! [`HttpSession`] owns the mutable transport state (proxies, cookies,
//! headers, TLS settings, ...) that the option router writes into, and hands
//! a snapshot of it to an [`HttpBackend`] for every request. The default
//! backend is libcurl via the `curl` crate; tests swap in their own.

mod backend;
mod curl_backend;
mod error;
mod keyvalue;
mod settings;
mod status_codes;

use std::sync::RwLock;

use crate::sync::{read, write};

pub use backend::{HttpBackend, HttpResponse, ProbeMethod};
pub use curl_backend::CurlBackend;
pub use error::TransportError;
pub use keyvalue::parse_key_value_list;
pub use settings::{
    HttpSettings, IpFamily, Proxies, SslCert, DEFAULT_CIPHERS, DEFAULT_TIMEOUT_SECS,
    MAX_REDIRECTS,
};
pub use status_codes::{StatusCodeParseError, StatusCodeRule, StatusCodeRules, RANGE_SEPARATOR};

/// Transport handle shared by the session, the option router and the resolver.
pub struct HttpSession {
    settings: RwLock<HttpSettings>,
    backend: Box<dyn HttpBackend>,
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("settings", &*read(&self.settings))
            .finish_non_exhaustive()
    }
}

impl Default for HttpSession {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSession {
    /// Session backed by libcurl.
    pub fn new() -> Self {
        Self::with_backend(CurlBackend::new())
    }

    pub fn with_backend(backend: impl HttpBackend + 'static) -> Self {
        Self {
            settings: RwLock::new(HttpSettings::default()),
            backend: Box::new(backend),
        }
    }

    /// Copy of the current settings.
    pub fn settings(&self) -> HttpSettings {
        read(&self.settings).clone()
    }

    pub fn read_settings<R>(&self, f: impl FnOnce(&HttpSettings) -> R) -> R {
        f(&read(&self.settings))
    }

    pub fn update_settings<R>(&self, f: impl FnOnce(&mut HttpSettings) -> R) -> R {
        f(&mut write(&self.settings))
    }

    /// HEAD request following redirects.
    ///
    /// Statuses >= 400 are errors unless listed in `acceptable`.
    pub fn head(&self, url: &str, acceptable: &[u32]) -> Result<HttpResponse, TransportError> {
        self.request(ProbeMethod::Head, url, acceptable)
    }

    /// GET request following redirects that stops after the response headers.
    pub fn get_stream(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.request(ProbeMethod::StreamingGet, url, &[])
    }

    fn request(
        &self,
        method: ProbeMethod,
        url: &str,
        acceptable: &[u32],
    ) -> Result<HttpResponse, TransportError> {
        let settings = self.settings();
        let res = self.backend.execute(method, url, &settings)?;
        if res.status >= 400 && !acceptable.contains(&res.status) {
            return Err(TransportError::Status {
                method: method.as_str(),
                url: url.to_string(),
                status: res.status,
            });
        }
        Ok(res)
    }
}
