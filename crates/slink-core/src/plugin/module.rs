//! Loadable plugin modules.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::PluginFactory;

/// Why a single module could not be registered.
///
/// Contained by the registry: logged, never returned to callers.
#[derive(Debug, Error)]
pub enum PluginLoadError {
    #[error("failed to open plugin library: {0}")]
    Open(String),
    #[error("plugin library does not export '{symbol}': {reason}")]
    MissingSymbol { symbol: String, reason: String },
    #[error("invalid plugin identifier '{0}'")]
    InvalidName(String),
    #[error("dynamic plugin loading is not enabled in this build")]
    DynamicDisabled,
}

/// A unit of plugin discovery: a compiled-in factory or a shared library on disk.
pub trait PluginModule: Send {
    /// Identifier the plugin is registered under.
    fn name(&self) -> &str;

    /// Where the module comes from, for logging.
    fn origin(&self) -> String;

    /// Load the module and hand out its factory.
    fn load(self: Box<Self>) -> Result<Arc<dyn PluginFactory>, PluginLoadError>;
}

/// A factory compiled into the binary.
pub struct StaticModule {
    name: String,
    factory: Arc<dyn PluginFactory>,
}

impl StaticModule {
    pub fn new(name: impl Into<String>, factory: impl PluginFactory + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn boxed(self) -> Box<dyn PluginModule> {
        Box::new(self)
    }
}

impl fmt::Debug for StaticModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticModule").field("name", &self.name).finish()
    }
}

impl PluginModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        "builtin".to_string()
    }

    fn load(self: Box<Self>) -> Result<Arc<dyn PluginFactory>, PluginLoadError> {
        Ok(self.factory)
    }
}

/// Identifiers are non-empty and made of ASCII alphanumerics, `_` and `-`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
