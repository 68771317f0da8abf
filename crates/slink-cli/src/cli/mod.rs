//! CLI for the slink session core.

mod args;
mod commands;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use slink_core::{config, HttpSession, OptionValue, Session};
use std::path::PathBuf;
use std::sync::Arc;

use args::{parse_option, parse_plugin_option, PluginOptionArg};
use commands::{
    run_completions, run_manpage, run_option, run_plugins, run_resolve, run_streams,
};
use console::ConsoleInput;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "slink", version)]
#[command(about = "slink: resolve stream URLs to plugins and list their streams", long_about = None)]
pub struct Cli {
    /// Set a session option, e.g. `-o http-timeout=5` (repeatable).
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option, global = true)]
    pub options: Vec<(String, OptionValue)>,

    /// Set a plugin option, e.g. `--plugin-option hls:quality=best` (repeatable).
    #[arg(long = "plugin-option", value_name = "PLUGIN:KEY=VALUE", value_parser = parse_plugin_option, global = true)]
    pub plugin_options: Vec<PluginOptionArg>,

    /// Extra directory to load plugin libraries from (repeatable).
    #[arg(long = "plugin-dir", value_name = "DIR", global = true)]
    pub plugin_dirs: Vec<PathBuf>,

    /// Do not read or create the config file.
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the plugin a URL resolves to.
    Resolve {
        /// Stream page or manifest URL; `http://` is assumed without a scheme.
        url: String,
        /// Only match against registered plugins; never probe for redirects.
        #[arg(long)]
        no_redirect: bool,
    },

    /// List the streams available for a URL.
    Streams {
        url: String,
        /// Only keep these stream kinds, e.g. `hls,dash`.
        #[arg(long, value_delimiter = ',', value_name = "TYPES")]
        stream_types: Option<Vec<String>>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List registered plugins in registration order.
    Plugins,

    /// Print the effective value of a session option.
    #[command(name = "option")]
    ShowOption {
        key: String,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page.
    Manpage,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match &cli.command {
            CliCommand::Completions { shell } => return run_completions(*shell),
            CliCommand::Manpage => return run_manpage(),
            _ => {}
        }

        let session = Arc::new(build_session(&cli)?);
        tracing::debug!("session ready with {} plugins", session.get_plugins().len());

        match cli.command {
            CliCommand::Resolve { url, no_redirect } => {
                run_resolve(session, url, no_redirect).await?
            }
            CliCommand::Streams {
                url,
                stream_types,
                json,
            } => run_streams(session, url, stream_types, json).await?,
            CliCommand::Plugins => run_plugins(&session),
            CliCommand::ShowOption { key } => run_option(&session, &key),
            CliCommand::Completions { .. } | CliCommand::Manpage => {}
        }

        Ok(())
    }
}

/// Session with built-ins, config file and command-line settings applied,
/// in that order.
fn build_session(cli: &Cli) -> Result<Session> {
    let session = Session::empty(Arc::new(HttpSession::new()));
    // Plugins receive the requester when bound, so set it before loading any.
    session.set_user_input_requester(Some(Arc::new(ConsoleInput)));
    session.load_builtin_plugins();

    if !cli.no_config {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cfg.apply(&session)?;
    }
    for dir in &cli.plugin_dirs {
        if !session.load_plugins(dir) {
            tracing::warn!("no plugins loaded from {}", dir.display());
        }
    }
    for (key, value) in &cli.options {
        session.set_option(key, value.clone())?;
    }
    for opt in &cli.plugin_options {
        session.set_plugin_option(&opt.plugin, &opt.key, opt.value.clone());
    }
    Ok(session)
}

#[cfg(test)]
mod tests;
