//! Tests for the global option flags.

use super::parse_cli;
use crate::cli::args::{parse_option, parse_plugin_option, PluginOptionArg};
use crate::cli::Cli;
use clap::Parser;
use slink_core::OptionValue;
use std::path::PathBuf;

#[test]
fn option_values_are_typed() {
    assert_eq!(parse_option("ipv4=true").unwrap(), ("ipv4".into(), OptionValue::Bool(true)));
    assert_eq!(parse_option("hls-live-edge=5").unwrap(), ("hls-live-edge".into(), OptionValue::Int(5)));
    assert_eq!(
        parse_option("http-timeout=2.5").unwrap(),
        ("http-timeout".into(), OptionValue::Float(2.5))
    );
    assert_eq!(
        parse_option("http-cookies=a=1;b=2").unwrap(),
        ("http-cookies".into(), OptionValue::from("a=1;b=2"))
    );
}

#[test]
fn malformed_options_are_rejected() {
    assert!(parse_option("no-equals").is_err());
    assert!(parse_option("=value").is_err());
    assert!(parse_plugin_option("quality=best").is_err());
    assert!(parse_plugin_option(":quality=best").is_err());
}

#[test]
fn plugin_option_parts() {
    assert_eq!(
        parse_plugin_option("hls:quality=best").unwrap(),
        PluginOptionArg {
            plugin: "hls".into(),
            key: "quality".into(),
            value: OptionValue::from("best"),
        }
    );
}

#[test]
fn global_flags_anywhere() {
    let cli = parse_cli(&[
        "slink",
        "-o",
        "ipv6=true",
        "resolve",
        "x",
        "--option",
        "http-proxy=proxy:3128",
        "--plugin-option",
        "hls:quality=720p",
        "--plugin-dir",
        "/opt/plugins",
        "--no-config",
    ]);
    assert_eq!(cli.options.len(), 2);
    assert_eq!(cli.options[0].0, "ipv6");
    assert_eq!(cli.options[1].1, OptionValue::from("proxy:3128"));
    assert_eq!(cli.plugin_options[0].plugin, "hls");
    assert_eq!(cli.plugin_dirs, [PathBuf::from("/opt/plugins")]);
    assert!(cli.no_config);
}

#[test]
fn bad_global_flag_is_a_parse_error() {
    assert!(Cli::try_parse_from(["slink", "-o", "broken", "plugins"]).is_err());
}
