//! Compiled-in generic plugins.
//!
//! These handle protocol-prefixed URLs (`hls://`, `dash://`,
//! `httpstream://`) and bare manifest URLs (`.m3u8`, `.mpd`). They are the
//! static registration list the session loads at construction.

mod dash;
mod direct;
mod hls;
mod http;

pub use dash::DashFactory;
pub use direct::DirectPlugin;
pub use hls::HlsFactory;
pub use http::HttpStreamFactory;

use super::{PluginModule, StaticModule};

/// Built-in modules, in registration order.
pub fn modules() -> Vec<Box<dyn PluginModule>> {
    vec![
        StaticModule::new("dash", DashFactory).boxed(),
        StaticModule::new("hls", HlsFactory).boxed(),
        StaticModule::new("http", HttpStreamFactory).boxed(),
    ]
}

/// Strip any of `prefixes` (case-insensitive) from `url`.
fn strip_protocol<'a>(url: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| {
        url.get(..p.len())
            .filter(|head| head.eq_ignore_ascii_case(p))
            .map(|_| &url[p.len()..])
    })
}
