//! URL → plugin resolution.
//!
//! 1. Default the scheme to `http://`.
//! 2. Serve `(url, follow_redirect)` from the cache if present (hits and
//!    remembered failures alike).
//! 3. Among plugins whose `can_handle_url` is true, pick the highest
//!    priority; equal priorities go to the earliest registered.
//! 4. With no match and `follow_redirect`, probe the URL (HEAD, falling back
//!    to a streaming GET on 501) and resolve the effective URL if it differs.
//!    Probe failures are swallowed.
//! 5. Otherwise fail with `NoPlugin`, and remember that.

mod cache;

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{Result, SessionError};
use crate::http::{HttpSession, TransportError};
use crate::plugin::{BoundPlugin, Plugin, PluginRegistry};
use crate::sync::lock;
use crate::url_model::update_scheme;

pub use cache::{Outcome, ResolveCache, ResolveKey, DEFAULT_CAPACITY};

/// Status a HEAD probe may return without being an error; it triggers a GET.
pub const HEAD_NOT_IMPLEMENTED: u32 = 501;

/// Upper bound on redirect probes within one resolution.
pub const MAX_REDIRECT_DEPTH: usize = 10;

/// Resolves URLs against a plugin registry, probing redirects over HTTP.
#[derive(Debug)]
pub struct UrlResolver {
    registry: Arc<PluginRegistry>,
    http: Arc<HttpSession>,
    cache: Mutex<ResolveCache>,
}

impl UrlResolver {
    pub fn new(registry: Arc<PluginRegistry>, http: Arc<HttpSession>) -> Self {
        Self::with_capacity(registry, http, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        registry: Arc<PluginRegistry>,
        http: Arc<HttpSession>,
        capacity: usize,
    ) -> Self {
        Self {
            registry,
            http,
            cache: Mutex::new(ResolveCache::new(capacity)),
        }
    }

    /// Resolve `url` to a plugin instance.
    pub fn resolve(&self, url: &str, follow_redirect: bool) -> Result<Arc<dyn Plugin>> {
        self.resolve_at(url, follow_redirect, 0)
    }

    /// Registry-only lookup; never touches the network.
    pub fn resolve_no_redirect(&self, url: &str) -> Result<Arc<dyn Plugin>> {
        self.resolve(url, false)
    }

    /// Forget every memoized outcome.
    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    pub fn cached_len(&self) -> usize {
        lock(&self.cache).len()
    }

    fn resolve_at(&self, url: &str, follow_redirect: bool, depth: usize) -> Result<Arc<dyn Plugin>> {
        let url = update_scheme("http://", url);
        let key: ResolveKey = (url.clone(), follow_redirect);

        // The cache lock is not held across matching or probing: resolution
        // recurses and may block on the network.
        if let Some(outcome) = lock(&self.cache).get(&key) {
            debug!("resolve cache hit for {} (follow_redirect={})", url, follow_redirect);
            return match outcome {
                Outcome::Resolved(plugin) => Ok(plugin),
                Outcome::NoPlugin => Err(SessionError::no_plugin(url)),
            };
        }

        if let Some(bound) = best_match(&self.registry, &url) {
            debug!("resolved {} to plugin {}", url, bound.id());
            let plugin = bound.create(&url);
            lock(&self.cache).insert(key, Outcome::Resolved(Arc::clone(&plugin)));
            return Ok(plugin);
        }

        if follow_redirect {
            if depth >= MAX_REDIRECT_DEPTH {
                debug!("giving up on {} after {} redirect probes", url, depth);
                return Err(SessionError::no_plugin(url));
            }
            match self.probe(&url) {
                Ok(effective) if effective != url => {
                    debug!("{} redirects to {}", url, effective);
                    let outcome = match self.resolve_at(&effective, follow_redirect, depth + 1) {
                        Ok(plugin) => Outcome::Resolved(plugin),
                        Err(SessionError::NoPlugin { .. }) => Outcome::NoPlugin,
                        Err(e) => return Err(e),
                    };
                    lock(&self.cache).insert(key, outcome.clone());
                    return match outcome {
                        Outcome::Resolved(plugin) => Ok(plugin),
                        Outcome::NoPlugin => Err(SessionError::no_plugin(url)),
                    };
                }
                Ok(_) => {}
                Err(e) => debug!("redirect probe for {} failed: {}", url, e),
            }
        }

        lock(&self.cache).insert(key, Outcome::NoPlugin);
        Err(SessionError::no_plugin(url))
    }

    /// Effective URL of `url` after redirects.
    fn probe(&self, url: &str) -> std::result::Result<String, TransportError> {
        let res = self.http.head(url, &[HEAD_NOT_IMPLEMENTED])?;
        if res.status == HEAD_NOT_IMPLEMENTED {
            return Ok(self.http.get_stream(url)?.url);
        }
        Ok(res.url)
    }
}

/// Highest-priority plugin that can handle `url`; ties go to registration order.
pub fn best_match(registry: &PluginRegistry, url: &str) -> Option<Arc<BoundPlugin>> {
    let plugins = registry.snapshot();
    let mut candidates: Vec<(i32, &Arc<BoundPlugin>)> = plugins
        .values()
        .filter(|p| p.can_handle_url(url))
        .map(|p| (p.priority(url), p))
        .collect();
    // Stable: equal priorities keep registry order.
    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.first().map(|(_, p)| Arc::clone(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::http::{HttpBackend, HttpResponse, HttpSettings, ProbeMethod};
    use crate::options::Options;
    use crate::plugin::{
        PluginContext, PluginError, PluginFactory, StaticModule, StreamParams, Streams,
        HIGH_PRIORITY, LOW_PRIORITY,
    };
    use crate::session::SessionHandle;

    /// Answers from a fixed table: url → (status, effective url).
    #[derive(Default)]
    struct Table {
        routes: HashMap<String, (u32, String)>,
        calls: AtomicUsize,
        methods: Mutex<Vec<ProbeMethod>>,
        fail: bool,
    }

    impl Table {
        fn route(mut self, from: &str, status: u32, to: &str) -> Self {
            self.routes.insert(from.to_string(), (status, to.to_string()));
            self
        }
    }

    impl HttpBackend for Arc<Table> {
        fn execute(
            &self,
            method: ProbeMethod,
            url: &str,
            _settings: &HttpSettings,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.methods.lock().unwrap().push(method);
            if self.fail {
                return Err(TransportError::InvalidUrl {
                    url: url.to_string(),
                    reason: "unreachable".into(),
                });
            }
            let (status, to) = match self.routes.get(url) {
                Some((s, to)) if *s == 501 && method == ProbeMethod::StreamingGet => (200, to.clone()),
                Some((s, to)) => (*s, to.clone()),
                None => (200, url.to_string()),
            };
            Ok(HttpResponse { status, url: to })
        }
    }

    #[derive(Debug)]
    struct Instance {
        module: String,
        url: String,
    }

    impl Plugin for Instance {
        fn module(&self) -> &str {
            &self.module
        }
        fn url(&self) -> &str {
            &self.url
        }
        fn streams(&self, _params: &StreamParams) -> std::result::Result<Streams, PluginError> {
            Ok(Streams::new())
        }
    }

    struct Contains(&'static str, i32);

    impl PluginFactory for Contains {
        fn can_handle_url(&self, url: &str) -> bool {
            url.contains(self.0)
        }
        fn priority(&self, _url: &str) -> i32 {
            self.1
        }
        fn create(&self, url: &str, context: Arc<PluginContext>) -> Arc<dyn Plugin> {
            Arc::new(Instance {
                module: context.id().to_string(),
                url: url.to_string(),
            })
        }
    }

    fn registry(entries: Vec<(&'static str, Contains)>) -> Arc<PluginRegistry> {
        let reg = PluginRegistry::new();
        let modules = entries
            .into_iter()
            .map(|(id, f)| StaticModule::new(id, f).boxed())
            .collect();
        reg.load_modules(modules, &|name, _| {
            PluginContext::new(name, SessionHandle::detached(), None, Options::default())
        });
        Arc::new(reg)
    }

    fn resolver(reg: Arc<PluginRegistry>, table: Table) -> (UrlResolver, Arc<Table>) {
        let table = Arc::new(table);
        let http = Arc::new(HttpSession::with_backend(Arc::clone(&table)));
        (UrlResolver::new(reg, http), table)
    }

    #[test]
    fn highest_priority_wins_and_ties_keep_registration_order() {
        let reg = registry(vec![
            ("low", Contains("example", LOW_PRIORITY)),
            ("first", Contains("example", HIGH_PRIORITY)),
            ("second", Contains("example", HIGH_PRIORITY)),
        ]);
        let (r, _) = resolver(reg, Table::default());
        let p = r.resolve("http://example.com/", true).unwrap();
        assert_eq!(p.module(), "first");
    }

    #[test]
    fn scheme_is_defaulted_before_matching() {
        let reg = registry(vec![("ex", Contains("http://example.com", LOW_PRIORITY))]);
        let (r, table) = resolver(reg, Table::default());
        let a = r.resolve("example.com/x", true).unwrap();
        let b = r.resolve("http://example.com/x", true).unwrap();
        assert_eq!(a.module(), b.module());
        assert_eq!(a.url(), "http://example.com/x");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn direct_match_is_served_from_cache_without_probing() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, table) = resolver(reg, Table::default());
        let a = r.resolve("http://example.com/", true).unwrap();
        let b = r.resolve("http://example.com/", true).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.calls.load(Ordering::SeqCst), 0);
        assert_eq!(r.cached_len(), 1);
    }

    #[test]
    fn no_redirect_never_touches_the_network() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, table) = resolver(reg, Table::default().route("http://short.ly/a", 302, "http://example.com/a"));
        let err = r.resolve_no_redirect("short.ly/a").unwrap_err();
        assert!(err.is_no_plugin());
        assert_eq!(table.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn follows_redirect_to_a_matching_url() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, table) = resolver(reg, Table::default().route("http://short.ly/a", 302, "http://example.com/a"));
        let p = r.resolve("short.ly/a", true).unwrap();
        assert_eq!(p.module(), "ex");
        assert_eq!(p.url(), "http://example.com/a");
        assert_eq!(*table.methods.lock().unwrap(), [ProbeMethod::Head]);

        r.resolve("short.ly/a", true).unwrap();
        assert_eq!(table.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn head_501_falls_back_to_streaming_get() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, table) = resolver(reg, Table::default().route("http://short.ly/b", 501, "http://example.com/b"));
        let p = r.resolve("http://short.ly/b", true).unwrap();
        assert_eq!(p.url(), "http://example.com/b");
        assert_eq!(
            *table.methods.lock().unwrap(),
            [ProbeMethod::Head, ProbeMethod::StreamingGet]
        );
    }

    #[test]
    fn other_error_statuses_do_not_fall_back() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, table) = resolver(reg, Table::default().route("http://short.ly/c", 405, "http://example.com/c"));
        assert!(r.resolve("http://short.ly/c", true).unwrap_err().is_no_plugin());
        assert_eq!(*table.methods.lock().unwrap(), [ProbeMethod::Head]);
    }

    #[test]
    fn probe_failure_is_swallowed_and_cached() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, table) = resolver(
            reg,
            Table {
                fail: true,
                ..Default::default()
            },
        );
        assert!(r.resolve("http://nowhere.invalid/", true).unwrap_err().is_no_plugin());
        assert!(r.resolve("http://nowhere.invalid/", true).unwrap_err().is_no_plugin());
        assert_eq!(table.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cached_failure_persists_until_cleared() {
        let reg = registry(vec![]);
        let (r, _) = resolver(Arc::clone(&reg), Table::default());
        assert!(r.resolve_no_redirect("http://late.example/").is_err());

        reg.load_modules(vec![StaticModule::new("late", Contains("late", 20)).boxed()], &|name, _| {
            PluginContext::new(name, SessionHandle::detached(), None, Options::default())
        });
        assert!(r.resolve_no_redirect("http://late.example/").is_err());

        r.clear_cache();
        assert_eq!(r.resolve_no_redirect("http://late.example/").unwrap().module(), "late");
    }

    #[test]
    fn follow_flag_is_part_of_the_key() {
        let reg = registry(vec![("ex", Contains("example", 20))]);
        let (r, _) = resolver(reg, Table::default());
        r.resolve("http://example.com/", true).unwrap();
        r.resolve("http://example.com/", false).unwrap();
        assert_eq!(r.cached_len(), 2);
    }

    #[test]
    fn redirect_loop_is_bounded() {
        let reg = registry(vec![]);
        let (r, table) = resolver(
            reg,
            Table::default()
                .route("http://a.test/", 302, "http://b.test/")
                .route("http://b.test/", 302, "http://a.test/"),
        );
        // a → b → a is answered from the in-flight probes, never from the cache,
        // so the depth limit is what stops it.
        assert!(r.resolve("http://a.test/", true).unwrap_err().is_no_plugin());
        assert_eq!(table.calls.load(Ordering::SeqCst), MAX_REDIRECT_DEPTH);
    }
}
