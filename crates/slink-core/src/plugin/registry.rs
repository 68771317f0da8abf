//! Plugin registry: identifier → bound plugin, in registration order.
//!
//! Readers work on immutable snapshots. A load builds the next map off to the
//! side and swaps it in under the write lock, so a concurrent reader sees the
//! registry either entirely before or entirely after that load.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use indexmap::IndexMap;
use tracing::{debug, error, info};

use crate::options::{OptionValue, Options};
use crate::sync::{lock, read, write};

use super::module::is_valid_name;
use super::{Plugin, PluginContext, PluginFactory, PluginLoadError, PluginModule};

/// Registered plugins keyed by identifier; iteration is registration order.
pub type PluginMap = IndexMap<String, Arc<BoundPlugin>>;

/// A factory bound to its identifier and context.
pub struct BoundPlugin {
    factory: Arc<dyn PluginFactory>,
    context: Arc<PluginContext>,
}

impl fmt::Debug for BoundPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundPlugin")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

impl BoundPlugin {
    /// Bind `factory` to `context`. The plugin's default options are expected
    /// to be in the context's option store already.
    pub fn new(factory: Arc<dyn PluginFactory>, context: PluginContext) -> Self {
        Self {
            factory,
            context: Arc::new(context),
        }
    }

    pub fn id(&self) -> &str {
        self.context.id()
    }

    pub fn factory(&self) -> &Arc<dyn PluginFactory> {
        &self.factory
    }

    pub fn context(&self) -> &Arc<PluginContext> {
        &self.context
    }

    pub fn can_handle_url(&self, url: &str) -> bool {
        self.factory.can_handle_url(url)
    }

    pub fn priority(&self, url: &str) -> i32 {
        self.factory.priority(url)
    }

    pub fn create(&self, url: &str) -> Arc<dyn Plugin> {
        self.factory.create(url, Arc::clone(&self.context))
    }

    pub fn get_option(&self, key: &str) -> OptionValue {
        self.context.get_option(key)
    }

    pub fn set_option(&self, key: &str, value: OptionValue) {
        self.context.set_option(key, value);
    }
}

/// Builds the context a newly loaded factory is bound to.
pub type Binder<'a> = dyn Fn(&str, &dyn PluginFactory) -> PluginContext + 'a;

/// Insertion-ordered plugin registry with snapshot reads.
pub struct PluginRegistry {
    current: RwLock<Arc<PluginMap>>,
    /// Serializes loads so two loads never build from the same base snapshot.
    loading: Mutex<()>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.snapshot().keys().cloned().collect();
        f.debug_struct("PluginRegistry").field("plugins", &ids).finish()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(PluginMap::new())),
            loading: Mutex::new(()),
        }
    }

    /// Current registry state. Never changes under the caller.
    pub fn snapshot(&self) -> Arc<PluginMap> {
        Arc::clone(&read(&self.current))
    }

    pub fn get(&self, id: &str) -> Option<Arc<BoundPlugin>> {
        self.snapshot().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Register a single bound plugin. An existing entry with the same
    /// identifier is replaced in place.
    pub fn register(&self, plugin: BoundPlugin) {
        let _load = lock(&self.loading);
        let mut next = (*self.snapshot()).clone();
        insert(&mut next, plugin, "direct registration");
        *write(&self.current) = Arc::new(next);
    }

    /// Load, bind and register every module.
    ///
    /// A module that fails to load, or whose name is not a valid identifier,
    /// is logged and skipped. Returns true iff at least one module was
    /// registered.
    pub fn load_modules(&self, modules: Vec<Box<dyn PluginModule>>, binder: &Binder<'_>) -> bool {
        let _load = lock(&self.loading);
        let mut next = (*self.snapshot()).clone();
        let mut success = false;

        for module in modules {
            let name = module.name().to_string();
            let origin = module.origin();
            let loaded = if is_valid_name(&name) {
                module.load()
            } else {
                Err(PluginLoadError::InvalidName(name.clone()))
            };
            let factory = match loaded {
                Ok(factory) => factory,
                Err(e) => {
                    error!(plugin = %name, origin = %origin, "failed to load plugin: {}", e);
                    continue;
                }
            };
            let context = binder(&name, factory.as_ref());
            insert(&mut next, BoundPlugin::new(factory, context), &origin);
            success = true;
        }

        *write(&self.current) = Arc::new(next);
        success
    }
}

fn insert(map: &mut PluginMap, plugin: BoundPlugin, origin: &str) {
    let id = plugin.id().to_string();
    if map.contains_key(&id) {
        debug!("plugin {} is being overridden by {}", id, origin);
    } else {
        info!(plugin = %id, origin = %origin, "registered plugin");
    }
    map.insert(id, Arc::new(plugin));
}

/// Options store for a freshly bound plugin.
pub(crate) fn plugin_options(factory: &dyn PluginFactory) -> Options {
    Options::new(factory.default_options())
}
