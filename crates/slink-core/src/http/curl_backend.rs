//! libcurl backend.
//!
//! One `Easy` handle per request with the session settings applied. Runs in
//! the current thread; call from `spawn_blocking` if used from async code.

use std::sync::atomic::{AtomicBool, Ordering};

use curl::easy::{Easy, IpResolve, List, NetRc};
use indexmap::IndexMap;

use super::{HttpBackend, HttpResponse, HttpSettings, IpFamily, ProbeMethod, SslCert, TransportError};

const USER_AGENT: &str = concat!("slink/", env!("CARGO_PKG_VERSION"));

/// Blocking libcurl transport.
#[derive(Debug, Clone, Default)]
pub struct CurlBackend;

impl CurlBackend {
    pub fn new() -> Self {
        Self
    }
}

impl HttpBackend for CurlBackend {
    fn execute(
        &self,
        method: ProbeMethod,
        url: &str,
        settings: &HttpSettings,
    ) -> Result<HttpResponse, TransportError> {
        let request_url = with_query_params(url, &settings.query_params)?;

        let mut easy = Easy::new();
        easy.url(&request_url)?;
        match method {
            ProbeMethod::Head => easy.nobody(true)?,
            ProbeMethod::StreamingGet => easy.get(true)?,
        }
        easy.follow_location(true)?;
        easy.max_redirections(settings.max_redirects)?;
        easy.timeout(settings.timeout)?;
        apply_settings(&mut easy, &request_url, settings)?;

        // Set when we stop a streaming GET after its headers.
        let stopped_body = AtomicBool::new(false);
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|_data| {
                stopped_body.store(true, Ordering::Relaxed);
                Ok(0)
            })?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if !(e.is_write_error() && stopped_body.load(Ordering::Relaxed)) {
                return Err(e.into());
            }
        }

        let status = easy.response_code()?;
        let effective = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or(request_url);
        tracing::debug!("{} {} -> HTTP {} at {}", method.as_str(), url, status, effective);

        Ok(HttpResponse {
            status,
            url: effective,
        })
    }
}

fn apply_settings(easy: &mut Easy, url: &str, settings: &HttpSettings) -> Result<(), TransportError> {
    if let Some(addr) = &settings.source_address {
        easy.interface(&format!("host!{addr}"))?;
    }
    easy.ip_resolve(match settings.ip_family {
        IpFamily::Any => IpResolve::Any,
        IpFamily::V4Only => IpResolve::V4,
        IpFamily::V6Only => IpResolve::V6,
    })?;

    match settings.proxies.for_url(url) {
        Some(proxy) => easy.proxy(proxy)?,
        // An empty proxy string makes libcurl ignore *_proxy env vars.
        None if !settings.trust_env => easy.proxy("")?,
        None => {}
    }
    easy.netrc(if settings.trust_env {
        NetRc::Optional
    } else {
        NetRc::Ignored
    })?;

    easy.ssl_verify_peer(settings.ssl_verify)?;
    easy.ssl_verify_host(settings.ssl_verify)?;
    match &settings.ssl_cert {
        Some(SslCert::Pem(path)) => easy.ssl_cert(path)?,
        Some(SslCert::Pair { cert, key }) => {
            easy.ssl_cert(cert)?;
            easy.ssl_key(key)?;
        }
        None => {}
    }
    if let Some(ciphers) = &settings.cipher_list {
        // Not every TLS backend takes an OpenSSL-style list.
        if let Err(e) = easy.ssl_cipher_list(ciphers) {
            tracing::debug!("cipher list not applied: {}", e);
        }
    }

    if let Some(cookie) = settings.cookie_header() {
        easy.cookie(&cookie)?;
    }
    let mut has_user_agent = false;
    let mut list = List::new();
    for (k, v) in &settings.headers {
        has_user_agent |= k.eq_ignore_ascii_case("user-agent");
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !settings.headers.is_empty() {
        easy.http_headers(list)?;
    }
    if !has_user_agent {
        easy.useragent(USER_AGENT)?;
    }
    Ok(())
}

/// Merge `params` into the query of `url`. Keys already present in the URL win.
fn with_query_params(
    url: &str,
    params: &IndexMap<String, String>,
) -> Result<String, TransportError> {
    if params.is_empty() {
        return Ok(url.to_string());
    }
    let mut parsed = url::Url::parse(url).map_err(|e| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let present: Vec<String> = parsed.query_pairs().map(|(k, _)| k.into_owned()).collect();
    {
        let mut pairs = parsed.query_pairs_mut();
        for (k, v) in params {
            if !present.iter().any(|p| p == k) {
                pairs.append_pair(k, v);
            }
        }
    }
    Ok(parsed.into())
}
