use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::options::OptionValue;
use crate::session::Session;

/// Global configuration loaded from `~/.config/slink/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlinkConfig {
    /// Extra plugin directories, loaded after the built-in plugins.
    #[serde(default)]
    pub plugin_dirs: Vec<PathBuf>,
    /// Session options, applied with `set_option`.
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
    /// Plugin-local options keyed by plugin id.
    #[serde(default)]
    pub plugin_options: BTreeMap<String, BTreeMap<String, OptionValue>>,
}

impl SlinkConfig {
    /// Load plugin directories, then apply session and plugin options.
    ///
    /// A plugin directory that yields nothing is logged, not an error. A
    /// malformed option value is.
    pub fn apply(&self, session: &Session) -> Result<()> {
        for dir in &self.plugin_dirs {
            if !session.load_plugins(dir) {
                tracing::warn!("no plugins loaded from {}", dir.display());
            }
        }
        for (key, value) in &self.options {
            session
                .set_option(key, value.clone())
                .with_context(|| format!("config option '{key}'"))?;
        }
        for (plugin, options) in &self.plugin_options {
            for (key, value) in options {
                session.set_plugin_option(plugin, key, value.clone());
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("slink")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SlinkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SlinkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from `path`.
pub fn load_from(path: &Path) -> Result<SlinkConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: SlinkConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpSession, IpFamily};
    use std::sync::Arc;

    fn session() -> Session {
        Session::with_http(Arc::new(HttpSession::new()))
    }

    #[test]
    fn default_config_is_empty() {
        let cfg = SlinkConfig::default();
        assert!(cfg.plugin_dirs.is_empty());
        assert!(cfg.options.is_empty());
        assert!(cfg.plugin_options.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SlinkConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SlinkConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            plugin_dirs = ["/opt/slink/plugins"]

            [options]
            ipv4 = true
            hls-live-edge = 5
            http-timeout = 7.5
            http-cookies = "a=1;b=2"
            hls-segment-ignore-names = ["ad", "promo"]

            [plugin_options.hls]
            quality = "best"
        "#;
        let cfg: SlinkConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.plugin_dirs, [PathBuf::from("/opt/slink/plugins")]);
        assert_eq!(cfg.options["ipv4"], OptionValue::Bool(true));
        assert_eq!(cfg.options["hls-live-edge"], OptionValue::Int(5));
        assert_eq!(cfg.options["http-timeout"], OptionValue::Float(7.5));
        assert_eq!(
            cfg.options["hls-segment-ignore-names"],
            OptionValue::List(vec!["ad".into(), "promo".into()])
        );
        assert_eq!(cfg.plugin_options["hls"]["quality"], OptionValue::from("best"));
    }

    #[test]
    fn apply_routes_options_through_session() {
        let cfg: SlinkConfig = toml::from_str(
            r#"
            [options]
            ipv6 = true
            http-cookies = "a=1;b=2"
            hls-live-edge = 9

            [plugin_options.hls]
            quality = "720p"

            [plugin_options.unknown]
            quality = "ignored"
            "#,
        )
        .unwrap();
        let s = session();
        cfg.apply(&s).unwrap();
        assert_eq!(s.http().settings().ip_family, IpFamily::V6Only);
        assert_eq!(s.http().settings().cookies.len(), 2);
        assert_eq!(s.get_option("hls-live-edge"), OptionValue::Int(9));
        assert_eq!(s.get_plugin_option("hls", "quality"), OptionValue::from("720p"));
    }

    #[test]
    fn apply_rejects_malformed_option() {
        let cfg: SlinkConfig = toml::from_str(
            r#"
            [options]
            http-cookies = "broken"
            "#,
        )
        .unwrap();
        let err = cfg.apply(&session()).unwrap_err();
        assert!(err.to_string().contains("http-cookies"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[options]\nlocale = \"es_ES\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.options["locale"], OptionValue::from("es_ES"));

        fs::write(&path, "options = 3").unwrap();
        assert!(load_from(&path).is_err());
    }
}
