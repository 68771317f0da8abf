//! Plugin capability interface, registry and loading.
//!
//! A plugin is split in two:
//! - a [`PluginFactory`] (the descriptor): decides whether it can handle a
//!   URL, how strongly ([`PluginFactory::priority`]), and constructs
//!   instances;
//! - a [`Plugin`] instance created for one URL, which enumerates streams.
//!
//! Factories are bound once, at registration, to an identifier, the owning
//! session and the user-input requester (see [`BoundPlugin`]).

pub mod builtin;
mod context;
mod loader;
mod module;
mod registry;
mod stream;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::http::TransportError;
use crate::options::OptionValue;

pub use context::PluginContext;
pub use loader::{discover, module_name_from_path, LibraryModule, FACTORY_SYMBOL};
pub use module::{PluginLoadError, PluginModule, StaticModule};
pub use registry::{Binder, BoundPlugin, PluginMap, PluginRegistry};
pub(crate) use registry::plugin_options;
pub use stream::{Stream, StreamKind, StreamParams, Streams};

#[cfg(feature = "dynamic")]
pub use loader::CreateFactoryFn;

pub const NO_PRIORITY: i32 = 0;
pub const LOW_PRIORITY: i32 = 10;
pub const NORMAL_PRIORITY: i32 = 20;
pub const HIGH_PRIORITY: i32 = 30;
pub const HIGHEST_PRIORITY: i32 = 40;

/// Error raised by a plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin '{plugin}' failed: {message}")]
    Failed { plugin: String, message: String },
    #[error("no user input requester is available")]
    NoInputRequester,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PluginError {
    pub fn failed(plugin: &str, message: impl Into<String>) -> Self {
        PluginError::Failed {
            plugin: plugin.to_string(),
            message: message.into(),
        }
    }
}

/// A plugin instance bound to one URL.
pub trait Plugin: Send + Sync + fmt::Debug {
    /// Identifier of the registry entry that created this instance.
    fn module(&self) -> &str;

    /// The (scheme-defaulted) URL this instance was created for.
    fn url(&self) -> &str;

    /// Available streams keyed by quality label.
    fn streams(&self, params: &StreamParams) -> Result<Streams, PluginError>;
}

/// Plugin descriptor: URL matching plus instance construction.
pub trait PluginFactory: Send + Sync {
    /// True if this plugin can handle `url`. `url` always carries a scheme.
    fn can_handle_url(&self, url: &str) -> bool;

    /// Tie-break weight among matching plugins; higher wins.
    fn priority(&self, _url: &str) -> i32 {
        NORMAL_PRIORITY
    }

    /// Seed values for this plugin's local option store.
    fn default_options(&self) -> Vec<(&'static str, OptionValue)> {
        Vec::new()
    }

    /// Build an instance for `url`.
    fn create(&self, url: &str, context: Arc<PluginContext>) -> Arc<dyn Plugin>;
}

/// Collects input from the user at runtime (credentials, captcha answers, ...).
pub trait UserInputRequester: Send + Sync {
    fn ask(&self, prompt: &str) -> Result<String, PluginError>;

    fn ask_password(&self, prompt: &str) -> Result<String, PluginError>;
}
