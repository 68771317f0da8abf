//! Option routing.
//!
//! A fixed set of keys is intercepted and applied to the HTTP transport
//! settings (see [`handlers`]); every other key goes to the generic
//! [`Options`] store unvalidated.

mod handlers;

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::Result;
use crate::http::HttpSession;
use crate::options::{session_defaults, OptionValue, Options};
use crate::sync::{read, write};

use handlers::ROUTES;

/// Typed setter/getter pair for one intercepted key.
pub(crate) struct Route {
    pub key: &'static str,
    pub set: fn(&OptionRouter, OptionValue) -> Result<()>,
    pub get: fn(&OptionRouter) -> OptionValue,
}

/// Per-key dispatch in front of the option store.
#[derive(Debug)]
pub struct OptionRouter {
    options: RwLock<Options>,
    http: Arc<HttpSession>,
}

impl OptionRouter {
    /// Router over a store seeded with the session defaults.
    pub fn new(http: Arc<HttpSession>) -> Self {
        Self::with_options(http, Options::new(session_defaults()))
    }

    pub fn with_options(http: Arc<HttpSession>, options: Options) -> Self {
        Self {
            options: RwLock::new(options),
            http,
        }
    }

    pub fn set_option(&self, key: &str, value: OptionValue) -> Result<()> {
        match route(key) {
            Some(route) => {
                debug!("setting routed option {} = {}", key, value);
                (route.set)(self, value)
            }
            None => {
                write(&self.options).set(key, value);
                Ok(())
            }
        }
    }

    /// Current value of `key`; [`OptionValue::Null`] for unknown keys.
    pub fn get_option(&self, key: &str) -> OptionValue {
        match route(key) {
            Some(route) => (route.get)(self),
            None => self.stored(key),
        }
    }

    /// True if `key` is intercepted rather than stored.
    pub fn is_routed(&self, key: &str) -> bool {
        route(key).is_some()
    }

    /// Keys handled by the router, in table order.
    pub fn routed_keys() -> impl Iterator<Item = &'static str> {
        ROUTES.iter().map(|r| r.key)
    }

    /// Copy of the generic store.
    pub fn options(&self) -> Options {
        read(&self.options).clone()
    }

    pub fn http(&self) -> &Arc<HttpSession> {
        &self.http
    }

    pub(crate) fn stored(&self, key: &str) -> OptionValue {
        read(&self.options).get_or_null(key)
    }

    /// Run `f` with the store write-locked.
    ///
    /// Transport settings touched inside `f` change before any reader sees
    /// the new options. Lock order is options, then transport settings.
    pub(crate) fn update_options<R>(&self, f: impl FnOnce(&mut Options) -> R) -> R {
        f(&mut write(&self.options))
    }
}

fn route(key: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.key == key)
}
