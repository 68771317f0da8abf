//! Session: the composition root.
//!
//! Owns the option router (and through it the option store), the plugin
//! registry and the URL resolver, and shares one [`HttpSession`] between
//! them. Built-in plugins are registered at construction.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock, Weak};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::error::{Result, SessionError};
use crate::http::HttpSession;
use crate::l10n::Localization;
use crate::options::{OptionValue, Options};
use crate::plugin::{
    builtin, discover, plugin_options, BoundPlugin, Plugin, PluginContext, PluginFactory,
    PluginMap, PluginModule, PluginRegistry, StreamParams, Streams, UserInputRequester,
};
use crate::resolver::UrlResolver;
use crate::router::OptionRouter;
use crate::sync::{read, write};

/// Crate version, reported by [`Session::version`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Non-owning view of a session handed to plugins at bind time.
///
/// Plugins read session options and the transport through it. It does not
/// keep the session alive.
#[derive(Clone, Default)]
pub struct SessionHandle {
    router: Weak<OptionRouter>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("attached", &(self.router.strong_count() > 0))
            .finish()
    }
}

impl SessionHandle {
    /// A handle not attached to any session. Every read yields nothing.
    pub fn detached() -> Self {
        Self::default()
    }

    fn new(router: &Arc<OptionRouter>) -> Self {
        Self {
            router: Arc::downgrade(router),
        }
    }

    /// Session option; [`OptionValue::Null`] once the session is gone.
    pub fn get_option(&self, key: &str) -> OptionValue {
        self.router
            .upgrade()
            .map(|r| r.get_option(key))
            .unwrap_or_default()
    }

    /// The session's transport, while the session is alive.
    pub fn http(&self) -> Option<Arc<HttpSession>> {
        self.router.upgrade().map(|r| Arc::clone(r.http()))
    }
}

/// A streaming session.
pub struct Session {
    router: Arc<OptionRouter>,
    registry: Arc<PluginRegistry>,
    resolver: UrlResolver,
    user_input: RwLock<Option<Arc<dyn UserInputRequester>>>,
    started_at: Instant,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("registry", &self.registry)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session over libcurl with the built-in plugins registered.
    pub fn new() -> Self {
        Self::with_http(Arc::new(HttpSession::new()))
    }

    /// Session over `http` with the built-in plugins registered.
    pub fn with_http(http: Arc<HttpSession>) -> Self {
        let session = Self::empty(http);
        if !session.load_builtin_plugins() {
            error!("no built-in plugins could be registered");
        }
        session
    }

    /// Session over `http` with an empty registry.
    pub fn empty(http: Arc<HttpSession>) -> Self {
        let router = Arc::new(OptionRouter::new(Arc::clone(&http)));
        let registry = Arc::new(PluginRegistry::new());
        let resolver = UrlResolver::new(Arc::clone(&registry), http);
        Self {
            router,
            registry,
            resolver,
            user_input: RwLock::new(None),
            started_at: Instant::now(),
        }
    }

    // options

    pub fn set_option(&self, key: &str, value: impl Into<OptionValue>) -> Result<()> {
        self.router.set_option(key, value.into())
    }

    pub fn get_option(&self, key: &str) -> OptionValue {
        self.router.get_option(key)
    }

    /// Copy of the generic option store (routed keys excluded).
    pub fn options(&self) -> Options {
        self.router.options()
    }

    /// Set a plugin-local option. Unknown plugin ids are ignored.
    pub fn set_plugin_option(&self, plugin: &str, key: &str, value: impl Into<OptionValue>) {
        match self.registry.get(plugin) {
            Some(p) => p.set_option(key, value.into()),
            None => debug!("ignoring option {} for unknown plugin {}", key, plugin),
        }
    }

    /// Plugin-local option; [`OptionValue::Null`] for unknown plugins or keys.
    pub fn get_plugin_option(&self, plugin: &str, key: &str) -> OptionValue {
        self.registry
            .get(plugin)
            .map(|p| p.get_option(key))
            .unwrap_or_default()
    }

    // resolution

    /// Resolve `url` to a plugin instance, probing redirects if nothing matches.
    pub fn resolve_url(&self, url: &str) -> Result<Arc<dyn Plugin>> {
        self.resolver.resolve(url, true)
    }

    /// Resolve `url` against the registry only.
    pub fn resolve_url_no_redirect(&self, url: &str) -> Result<Arc<dyn Plugin>> {
        self.resolver.resolve_no_redirect(url)
    }

    /// Resolve `url` and enumerate its streams.
    pub fn streams(&self, url: &str, params: &StreamParams) -> Result<Streams> {
        let plugin = self.resolve_url(url)?;
        Ok(plugin.streams(params)?)
    }

    /// Forget memoized resolutions, including remembered failures.
    pub fn clear_resolve_cache(&self) {
        self.resolver.clear_cache();
    }

    // plugins

    /// Snapshot of the registry, in registration order.
    pub fn get_plugins(&self) -> Arc<PluginMap> {
        self.registry.snapshot()
    }

    /// Register the compiled-in plugins.
    pub fn load_builtin_plugins(&self) -> bool {
        self.load_modules(builtin::modules())
    }

    /// Discover and register plugins from `dir`.
    ///
    /// Returns true iff at least one plugin was registered. Modules that fail
    /// to load are logged and skipped.
    pub fn load_plugins(&self, dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        match discover(dir) {
            Ok(modules) => {
                info!("loading {} plugin module(s) from {}", modules.len(), dir.display());
                self.load_modules(modules)
            }
            Err(e) => {
                error!("cannot read plugin directory {}: {}", dir.display(), e);
                false
            }
        }
    }

    /// Bind and register `modules`.
    pub fn load_modules(&self, modules: Vec<Box<dyn PluginModule>>) -> bool {
        let binder = self.binder();
        self.registry.load_modules(modules, &binder)
    }

    /// Register a single factory under `id`, replacing any existing entry.
    pub fn register_plugin(&self, id: &str, factory: impl PluginFactory + 'static) {
        let factory: Arc<dyn PluginFactory> = Arc::new(factory);
        let bind = self.binder();
        let context = bind(id, factory.as_ref());
        self.registry.register(BoundPlugin::new(factory, context));
    }

    /// Requester handed to plugins bound from now on.
    pub fn set_user_input_requester(&self, requester: Option<Arc<dyn UserInputRequester>>) {
        *write(&self.user_input) = requester;
    }

    fn binder(&self) -> impl Fn(&str, &dyn PluginFactory) -> PluginContext + '_ {
        let requester = read(&self.user_input).clone();
        move |id, factory| {
            PluginContext::new(
                id,
                SessionHandle::new(&self.router),
                requester.clone(),
                plugin_options(factory),
            )
        }
    }

    // metadata

    pub fn http(&self) -> &Arc<HttpSession> {
        self.router.http()
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Locale from the `locale` option, or the environment when unset.
    pub fn localization(&self) -> Result<Localization> {
        match self.get_option("locale") {
            OptionValue::Null => Ok(Localization::from_env()),
            OptionValue::Str(s) => {
                Localization::parse(&s).map_err(|e| SessionError::invalid_option("locale", e.to_string()))
            }
            other => Err(SessionError::invalid_option(
                "locale",
                format!("expected a locale string, got {}", other.kind()),
            )),
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
