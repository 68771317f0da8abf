//! Directory discovery of drop-in plugin libraries.
//!
//! Every file with the platform's shared-library extension in a directory is
//! a candidate module. Its identifier is the file stem without a `lib`
//! prefix (`libtwitch.so` → `twitch`). With the `dynamic` feature a candidate
//! is opened with `libloading` and must export [`FACTORY_SYMBOL`]; without it
//! every candidate fails to load (and is logged by the registry).
//!
//! Libraries must be built against the same `slink-core` and compiler as the
//! host; they are trusted code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{PluginFactory, PluginLoadError, PluginModule};

/// Symbol every plugin library exports.
///
/// Libraries export it with [`crate::export_plugin!`].
pub const FACTORY_SYMBOL: &str = "slink_plugin_factory";

/// Signature of [`FACTORY_SYMBOL`].
#[cfg(feature = "dynamic")]
#[allow(improper_ctypes_definitions)]
pub type CreateFactoryFn = unsafe extern "C" fn() -> *mut dyn PluginFactory;

/// List candidate modules in `dir`, sorted by file name.
pub fn discover(dir: &Path) -> io::Result<Vec<Box<dyn PluginModule>>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_library(p))
        .collect();
    paths.sort();
    Ok(paths
        .into_iter()
        .map(|p| Box::new(LibraryModule::new(p)) as Box<dyn PluginModule>)
        .collect())
}

fn is_library(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(std::env::consts::DLL_EXTENSION))
}

/// Identifier for a library path: file stem without the `lib` prefix.
pub fn module_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_prefix("lib") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => stem,
    }
}

/// A plugin shared library on disk.
#[derive(Debug)]
pub struct LibraryModule {
    path: PathBuf,
    name: String,
}

impl LibraryModule {
    pub fn new(path: PathBuf) -> Self {
        let name = module_name_from_path(&path);
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PluginModule for LibraryModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load(self: Box<Self>) -> Result<Arc<dyn PluginFactory>, PluginLoadError> {
        load_library(&self.path)
    }
}

#[cfg(not(feature = "dynamic"))]
fn load_library(_path: &Path) -> Result<Arc<dyn PluginFactory>, PluginLoadError> {
    Err(PluginLoadError::DynamicDisabled)
}

#[cfg(feature = "dynamic")]
fn load_library(path: &Path) -> Result<Arc<dyn PluginFactory>, PluginLoadError> {
    // SAFETY: plugin libraries are trusted code built against this crate;
    // running their initializers is part of loading them.
    let lib = unsafe { libloading::Library::new(path) }
        .map_err(|e| PluginLoadError::Open(format!("{}: {}", path.display(), e)))?;

    // SAFETY: the symbol type matches `export_plugin!`.
    let raw = unsafe {
        let create: libloading::Symbol<CreateFactoryFn> = lib
            .get(FACTORY_SYMBOL.as_bytes())
            .map_err(|e| PluginLoadError::MissingSymbol {
                symbol: FACTORY_SYMBOL.to_string(),
                reason: e.to_string(),
            })?;
        create()
    };
    if raw.is_null() {
        return Err(PluginLoadError::Open(format!(
            "{}: factory constructor returned null",
            path.display()
        )));
    }
    // SAFETY: `export_plugin!` hands out a pointer from `Box::into_raw`.
    let inner: Box<dyn PluginFactory> = unsafe { Box::from_raw(raw) };
    tracing::info!(path = %path.display(), "dynamic plugin library loaded");
    Ok(Arc::new(LibraryFactory {
        inner,
        library: Arc::new(lib),
    }))
}

/// Factory from a shared library.
///
/// The library stays mapped while the factory or any instance it created is
/// alive, so overriding the registry entry cannot unload code a cached
/// instance still points into.
#[cfg(feature = "dynamic")]
struct LibraryFactory {
    // Dropped before `library`: field order is drop order.
    inner: Box<dyn PluginFactory>,
    library: Arc<libloading::Library>,
}

#[cfg(feature = "dynamic")]
impl PluginFactory for LibraryFactory {
    fn can_handle_url(&self, url: &str) -> bool {
        self.inner.can_handle_url(url)
    }

    fn priority(&self, url: &str) -> i32 {
        self.inner.priority(url)
    }

    fn default_options(&self) -> Vec<(&'static str, crate::options::OptionValue)> {
        self.inner.default_options()
    }

    fn create(
        &self,
        url: &str,
        context: Arc<super::PluginContext>,
    ) -> Arc<dyn super::Plugin> {
        Arc::new(LibraryPlugin {
            inner: self.inner.create(url, context),
            _library: Arc::clone(&self.library),
        })
    }
}

/// Instance created by a [`LibraryFactory`], pinning its library.
#[cfg(feature = "dynamic")]
struct LibraryPlugin {
    inner: Arc<dyn super::Plugin>,
    _library: Arc<libloading::Library>,
}

#[cfg(feature = "dynamic")]
impl std::fmt::Debug for LibraryPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

#[cfg(feature = "dynamic")]
impl super::Plugin for LibraryPlugin {
    fn module(&self) -> &str {
        self.inner.module()
    }

    fn url(&self) -> &str {
        self.inner.url()
    }

    fn streams(&self, params: &super::StreamParams) -> Result<super::Streams, super::PluginError> {
        self.inner.streams(params)
    }
}

/// Export a [`PluginFactory`] from a `cdylib` so [`discover`] can load it.
///
/// ```rust,ignore
/// slink_core::export_plugin!(MySiteFactory::default());
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($factory:expr) => {
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn slink_plugin_factory() -> *mut dyn $crate::plugin::PluginFactory {
            let factory: Box<dyn $crate::plugin::PluginFactory> = Box::new($factory);
            Box::into_raw(factory)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_from_paths() {
        assert_eq!(module_name_from_path(Path::new("/p/libtwitch.so")), "twitch");
        assert_eq!(module_name_from_path(Path::new("/p/youtube.dll")), "youtube");
        assert_eq!(module_name_from_path(Path::new("/p/lib.so")), "lib");
    }

    #[test]
    fn discover_lists_only_libraries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let ext = std::env::consts::DLL_EXTENSION;
        for name in [format!("libzeta.{ext}"), format!("libalpha.{ext}"), "README.md".to_string()] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join(format!("nested.{ext}"))).unwrap();

        let modules = discover(dir.path()).unwrap();
        let names: Vec<&str> = modules.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn discover_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn empty_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("libempty.{}", std::env::consts::DLL_EXTENSION));
        fs::write(&path, b"").unwrap();
        let module: Box<dyn PluginModule> = Box::new(LibraryModule::new(path));
        assert!(module.load().is_err());
    }
}
