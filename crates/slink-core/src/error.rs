//! Errors that cross the session boundary.
//!
//! Only [`SessionError`] is returned from public session operations. Plugin
//! load failures and transport probe failures have their own types, but they
//! are contained (logged) or absorbed by the registry and resolver.

use thiserror::Error;

use crate::plugin::PluginError;

/// Failure returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Resolution exhausted matching and redirect following.
    #[error("no plugin can handle URL: {url}")]
    NoPlugin { url: String },

    /// A routed option key received a value of the wrong shape.
    #[error("invalid value for option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    /// The resolved plugin failed while enumerating streams.
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl SessionError {
    pub(crate) fn no_plugin(url: impl Into<String>) -> Self {
        SessionError::NoPlugin { url: url.into() }
    }

    pub(crate) fn invalid_option(key: &str, reason: impl Into<String>) -> Self {
        SessionError::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True for [`SessionError::NoPlugin`].
    pub fn is_no_plugin(&self) -> bool {
        matches!(self, SessionError::NoPlugin { .. })
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
