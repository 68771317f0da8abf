//! Setters and getters for the intercepted option keys.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use indexmap::IndexMap;

use crate::error::{Result, SessionError};
use crate::http::{
    parse_key_value_list, HttpSettings, IpFamily, SslCert, StatusCodeRules, DEFAULT_TIMEOUT_SECS,
};
use crate::options::OptionValue;
use crate::url_model::update_scheme;

use super::{OptionRouter, Route};

/// URL-safe base64 that accepts both padded and unpadded input.
const REPORT_URI_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub(super) static ROUTES: &[Route] = &[
    Route { key: "interface", set: set_interface, get: get_interface },
    Route { key: "ipv4", set: set_ipv4, get: get_ipv4 },
    Route { key: "ipv6", set: set_ipv6, get: get_ipv6 },
    Route { key: "http-proxy", set: set_http_proxy, get: get_http_proxy },
    Route { key: "https-proxy", set: set_https_proxy, get: get_https_proxy },
    Route { key: "http-cookies", set: set_cookies, get: get_cookies },
    Route { key: "http-headers", set: set_headers, get: get_headers },
    Route { key: "http-query-params", set: set_query_params, get: get_query_params },
    Route { key: "http-trust-env", set: set_trust_env, get: get_trust_env },
    Route { key: "http-ssl-verify", set: set_ssl_verify, get: get_ssl_verify },
    Route { key: "http-ssl-cert", set: set_ssl_cert, get: get_ssl_cert },
    Route { key: "http-timeout", set: set_timeout, get: get_timeout },
    Route { key: "http-disable-dh", set: set_disable_dh, get: get_disable_dh },
    Route { key: "http-report-uri", set: set_report_uri, get: get_report_uri },
    Route { key: "http-report-interval", set: set_report_interval, get: get_report_interval },
    Route { key: "stop-stream-playing", set: set_stop_stream_playing, get: get_stop_stream_playing },
    Route { key: "error-http-status-codes", set: set_error_status_codes, get: get_error_status_codes },
];

fn wrong_shape(key: &str, expected: &str, got: &OptionValue) -> SessionError {
    SessionError::invalid_option(key, format!("expected {expected}, got {}", got.kind()))
}

/// Boolean option; null reads as false.
fn flag(key: &str, value: &OptionValue) -> Result<bool> {
    if value.is_null() {
        return Ok(false);
    }
    value.as_bool().ok_or_else(|| wrong_shape(key, "a boolean", value))
}

fn update(router: &OptionRouter, f: impl FnOnce(&mut HttpSettings)) {
    router.http().update_settings(f);
}

fn read<R>(router: &OptionRouter, f: impl FnOnce(&HttpSettings) -> R) -> R {
    router.http().read_settings(f)
}

fn opt_str(value: Option<&str>) -> OptionValue {
    value.map(OptionValue::from).unwrap_or_default()
}

// interface

fn set_interface(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let address = if !value.is_truthy() {
        None
    } else {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => return Err(wrong_shape("interface", "an address string", &value)),
        }
    };
    router.update_options(|options| {
        options.set("interface", opt_str(address.as_deref()));
        update(router, |s| s.source_address = address);
    });
    Ok(())
}

fn get_interface(router: &OptionRouter) -> OptionValue {
    router.stored("interface")
}

// ipv4 / ipv6

fn set_ipv4(router: &OptionRouter, value: OptionValue) -> Result<()> {
    set_family(router, "ipv4", "ipv6", value)
}

fn set_ipv6(router: &OptionRouter, value: OptionValue) -> Result<()> {
    set_family(router, "ipv6", "ipv4", value)
}

fn set_family(router: &OptionRouter, key: &str, other: &str, value: OptionValue) -> Result<()> {
    let on = flag(key, &value)?;
    router.update_options(|options| {
        options.set(key, OptionValue::Bool(on));
        if on {
            options.set(other, OptionValue::Bool(false));
        }
        let family = if options.get_or_null("ipv4").is_truthy() {
            IpFamily::V4Only
        } else if options.get_or_null("ipv6").is_truthy() {
            IpFamily::V6Only
        } else {
            IpFamily::Any
        };
        update(router, |s| s.ip_family = family);
    });
    Ok(())
}

fn get_ipv4(router: &OptionRouter) -> OptionValue {
    OptionValue::Bool(router.stored("ipv4").is_truthy())
}

fn get_ipv6(router: &OptionRouter) -> OptionValue {
    OptionValue::Bool(router.stored("ipv6").is_truthy())
}

// proxies

fn proxy_url(key: &str, scheme: &str, value: &OptionValue) -> Result<Option<String>> {
    match value {
        OptionValue::Null => Ok(None),
        OptionValue::Str(s) if s.trim().is_empty() => Ok(None),
        OptionValue::Str(s) => Ok(Some(update_scheme(scheme, s))),
        other => Err(wrong_shape(key, "a proxy URL", other)),
    }
}

fn set_http_proxy(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let proxy = proxy_url("http-proxy", "http://", &value)?;
    update(router, |s| {
        if s.proxies.https.is_none() {
            s.proxies.https = proxy.clone();
        }
        s.proxies.http = proxy;
    });
    Ok(())
}

fn get_http_proxy(router: &OptionRouter) -> OptionValue {
    read(router, |s| opt_str(s.proxies.http.as_deref()))
}

fn set_https_proxy(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let proxy = proxy_url("https-proxy", "https://", &value)?;
    update(router, |s| s.proxies.https = proxy);
    Ok(())
}

fn get_https_proxy(router: &OptionRouter) -> OptionValue {
    read(router, |s| opt_str(s.proxies.https.as_deref()))
}

// cookies, headers, query params

/// Pairs to merge into a key/value collection; `None` clears it.
fn key_values(
    key: &str,
    delimiter: char,
    value: &OptionValue,
) -> Result<Option<IndexMap<String, String>>> {
    match value {
        OptionValue::Null => Ok(None),
        OptionValue::Map(m) => Ok(Some(m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())),
        OptionValue::Str(s) => parse_key_value_list(s, delimiter)
            .map(Some)
            .map_err(|reason| SessionError::invalid_option(key, reason)),
        other => Err(wrong_shape(key, "a mapping or a key=value string", other)),
    }
}

fn merge(target: &mut IndexMap<String, String>, pairs: Option<IndexMap<String, String>>) {
    match pairs {
        Some(pairs) => target.extend(pairs),
        None => target.clear(),
    }
}

fn as_map(pairs: &IndexMap<String, String>) -> OptionValue {
    OptionValue::Map(pairs.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<BTreeMap<_, _>>())
}

fn set_cookies(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let pairs = key_values("http-cookies", ';', &value)?;
    update(router, |s| merge(&mut s.cookies, pairs));
    Ok(())
}

fn get_cookies(router: &OptionRouter) -> OptionValue {
    read(router, |s| as_map(&s.cookies))
}

fn set_headers(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let pairs = key_values("http-headers", ';', &value)?;
    update(router, |s| merge(&mut s.headers, pairs));
    Ok(())
}

fn get_headers(router: &OptionRouter) -> OptionValue {
    read(router, |s| as_map(&s.headers))
}

fn set_query_params(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let pairs = key_values("http-query-params", '&', &value)?;
    update(router, |s| merge(&mut s.query_params, pairs));
    Ok(())
}

fn get_query_params(router: &OptionRouter) -> OptionValue {
    read(router, |s| as_map(&s.query_params))
}

// TLS and timeouts

fn set_trust_env(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let on = flag("http-trust-env", &value)?;
    update(router, |s| s.trust_env = on);
    Ok(())
}

fn get_trust_env(router: &OptionRouter) -> OptionValue {
    read(router, |s| OptionValue::Bool(s.trust_env))
}

fn set_ssl_verify(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let on = flag("http-ssl-verify", &value)?;
    update(router, |s| s.ssl_verify = on);
    Ok(())
}

fn get_ssl_verify(router: &OptionRouter) -> OptionValue {
    read(router, |s| OptionValue::Bool(s.ssl_verify))
}

fn set_ssl_cert(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let cert = match &value {
        OptionValue::Null => None,
        OptionValue::Str(path) => Some(SslCert::Pem(path.clone())),
        OptionValue::List(pair) if pair.len() == 2 => Some(SslCert::Pair {
            cert: pair[0].clone(),
            key: pair[1].clone(),
        }),
        other => {
            return Err(wrong_shape(
                "http-ssl-cert",
                "a PEM path or a [cert, key] pair",
                other,
            ))
        }
    };
    update(router, |s| s.ssl_cert = cert);
    Ok(())
}

fn get_ssl_cert(router: &OptionRouter) -> OptionValue {
    read(router, |s| match &s.ssl_cert {
        None => OptionValue::Null,
        Some(SslCert::Pem(path)) => OptionValue::from(path.as_str()),
        Some(SslCert::Pair { cert, key }) => OptionValue::List(vec![cert.clone(), key.clone()]),
    })
}

fn set_timeout(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let secs = if value.is_null() {
        DEFAULT_TIMEOUT_SECS
    } else {
        value
            .as_float()
            .ok_or_else(|| wrong_shape("http-timeout", "a number of seconds", &value))?
    };
    let timeout = Duration::try_from_secs_f64(secs).map_err(|e| {
        SessionError::invalid_option("http-timeout", format!("{secs} is not a valid timeout: {e}"))
    })?;
    update(router, |s| s.timeout = timeout);
    Ok(())
}

fn get_timeout(router: &OptionRouter) -> OptionValue {
    read(router, |s| OptionValue::Float(s.timeout.as_secs_f64()))
}

fn set_disable_dh(router: &OptionRouter, value: OptionValue) -> Result<()> {
    if flag("http-disable-dh", &value)? {
        update(router, HttpSettings::disable_dh);
    }
    Ok(())
}

fn get_disable_dh(router: &OptionRouter) -> OptionValue {
    read(router, |s| {
        let disabled = s
            .cipher_list
            .as_deref()
            .is_some_and(|list| list.split(':').any(|c| c == "!DH"));
        OptionValue::Bool(disabled)
    })
}

// stream reporting

fn set_report_uri(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let uri = match &value {
        OptionValue::Null => None,
        OptionValue::Str(s) if s.starts_with("http") => Some(s.clone()),
        OptionValue::Str(s) => Some(decode_report_uri(s)?),
        other => return Err(wrong_shape("http-report-uri", "a URI string", other)),
    };
    update(router, |s| s.report_uri = uri);
    Ok(())
}

fn decode_report_uri(encoded: &str) -> Result<String> {
    let invalid = |reason: String| SessionError::invalid_option("http-report-uri", reason);
    let bytes = REPORT_URI_ENGINE
        .decode(encoded.trim())
        .map_err(|e| invalid(format!("not a URI and not URL-safe base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| invalid(format!("decoded URI is not UTF-8: {e}")))
}

fn get_report_uri(router: &OptionRouter) -> OptionValue {
    read(router, |s| opt_str(s.report_uri.as_deref()))
}

fn set_report_interval(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let interval = match &value {
        OptionValue::Null => None,
        v => Some(
            v.as_float()
                .ok_or_else(|| wrong_shape("http-report-interval", "a number", v))?,
        ),
    };
    update(router, |s| s.report_interval = interval);
    Ok(())
}

fn get_report_interval(router: &OptionRouter) -> OptionValue {
    read(router, |s| s.report_interval.into())
}

fn set_stop_stream_playing(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let on = flag("stop-stream-playing", &value)?;
    update(router, |s| s.stop_stream_playing = on);
    Ok(())
}

fn get_stop_stream_playing(router: &OptionRouter) -> OptionValue {
    read(router, |s| OptionValue::Bool(s.stop_stream_playing))
}

fn set_error_status_codes(router: &OptionRouter, value: OptionValue) -> Result<()> {
    let rules = match &value {
        OptionValue::Null => Ok(StatusCodeRules::default()),
        OptionValue::Str(s) => StatusCodeRules::parse_list(s),
        OptionValue::List(entries) => StatusCodeRules::parse_entries(entries),
        OptionValue::Int(code) => StatusCodeRules::parse_list(&code.to_string()),
        other => {
            return Err(wrong_shape(
                "error-http-status-codes",
                "a status code list",
                other,
            ))
        }
    }
    .map_err(|e| SessionError::invalid_option("error-http-status-codes", e.to_string()))?;
    update(router, |s| s.error_status_codes = rules);
    Ok(())
}

/// Entries in their textual form (`"403"`, `"500T599"`), since list values
/// hold strings only. Feeding the result back to the setter is lossless.
fn get_error_status_codes(router: &OptionRouter) -> OptionValue {
    read(router, |s| OptionValue::List(s.error_status_codes.to_strings()))
}
