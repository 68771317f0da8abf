//! CLI command handlers, one file per command.

mod completions;
mod manpage;
mod option;
mod plugins;
mod resolve;
mod streams;

pub use completions::run_completions;
pub use manpage::run_manpage;
pub use option::run_option;
pub use plugins::run_plugins;
pub use resolve::run_resolve;
pub use streams::run_streams;
