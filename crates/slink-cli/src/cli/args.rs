//! Value parsers for the global option flags.

use slink_core::OptionValue;

/// `KEY=VALUE`; the value is typed with [`OptionValue::parse_literal`].
pub fn parse_option(raw: &str) -> Result<(String, OptionValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty option key in '{raw}'"));
    }
    Ok((key.to_string(), OptionValue::parse_literal(value)))
}

/// A `PLUGIN:KEY=VALUE` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginOptionArg {
    pub plugin: String,
    pub key: String,
    pub value: OptionValue,
}

pub fn parse_plugin_option(raw: &str) -> Result<PluginOptionArg, String> {
    let (plugin, rest) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected PLUGIN:KEY=VALUE, got '{raw}'"))?;
    let plugin = plugin.trim();
    if plugin.is_empty() {
        return Err(format!("empty plugin name in '{raw}'"));
    }
    let (key, value) = parse_option(rest)?;
    Ok(PluginOptionArg {
        plugin: plugin.to_string(),
        key,
        value,
    })
}
