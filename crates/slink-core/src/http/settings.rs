//! Transport settings mutated by the option router.

use std::time::Duration;

use indexmap::IndexMap;

use super::StatusCodeRules;

/// Default timeout for requests not covered by a more specific option.
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

/// Redirect chain limit for a single request.
pub const MAX_REDIRECTS: u32 = 30;

/// Cipher list the `http-disable-dh` option extends with `:!DH`.
pub const DEFAULT_CIPHERS: &str = "ECDH+AESGCM:DH+AESGCM:ECDH+AES256:DH+AES256:ECDH+AES128:DH+AES:\
ECDH+HIGH:DH+HIGH:RSA+AESGCM:RSA+AES:RSA+HIGH:!aNULL:!eNULL:!MD5";

/// Address family used when resolving host names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpFamily {
    #[default]
    Any,
    V4Only,
    V6Only,
}

/// Client certificate: a single PEM file or a certificate/key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SslCert {
    Pem(String),
    Pair { cert: String, key: String },
}

/// Proxy URLs by target scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proxies {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl Proxies {
    /// Proxy to use for a request to `url`.
    pub fn for_url(&self, url: &str) -> Option<&str> {
        if url.get(..8).is_some_and(|p| p.eq_ignore_ascii_case("https://")) {
            self.https.as_deref()
        } else {
            self.http.as_deref()
        }
    }
}

/// Everything the transport applies to outgoing requests, plus the
/// stream-reporting settings consumers read back.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Local source address outgoing connections bind to.
    pub source_address: Option<String>,
    pub ip_family: IpFamily,
    pub proxies: Proxies,
    pub cookies: IndexMap<String, String>,
    pub headers: IndexMap<String, String>,
    pub query_params: IndexMap<String, String>,
    /// Honour proxy environment variables and `~/.netrc`.
    pub trust_env: bool,
    pub ssl_verify: bool,
    pub ssl_cert: Option<SslCert>,
    pub timeout: Duration,
    /// TLS cipher list override; `None` leaves the TLS backend default.
    pub cipher_list: Option<String>,
    pub max_redirects: u32,
    pub report_uri: Option<String>,
    pub report_interval: Option<f64>,
    pub stop_stream_playing: bool,
    pub error_status_codes: StatusCodeRules,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            source_address: None,
            ip_family: IpFamily::Any,
            proxies: Proxies::default(),
            cookies: IndexMap::new(),
            headers: IndexMap::new(),
            query_params: IndexMap::new(),
            trust_env: true,
            ssl_verify: true,
            ssl_cert: None,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            cipher_list: None,
            max_redirects: MAX_REDIRECTS,
            report_uri: None,
            report_interval: None,
            stop_stream_playing: false,
            error_status_codes: StatusCodeRules::default(),
        }
    }
}

impl HttpSettings {
    /// Exclude Diffie-Hellman suites from the cipher list.
    pub fn disable_dh(&mut self) {
        let base = self.cipher_list.as_deref().unwrap_or(DEFAULT_CIPHERS);
        if base.split(':').any(|c| c == "!DH") {
            return;
        }
        self.cipher_list = Some(format!("{base}:!DH"));
    }

    /// `Cookie` header value, or `None` with no cookies set.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        Some(pairs.join("; "))
    }
}
