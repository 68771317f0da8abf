//! slink core: plugin registry, URL resolution and option routing for a
//! streaming session.

pub mod config;
pub mod error;
pub mod http;
pub mod l10n;
pub mod logging;
pub mod options;
pub mod plugin;
pub mod resolver;
pub mod router;
pub mod session;
pub mod url_model;

mod sync;

pub use error::{Result, SessionError};
pub use http::HttpSession;
pub use options::{OptionValue, Options};
pub use plugin::{Plugin, PluginFactory, StreamParams, Streams, UserInputRequester};
pub use session::{Session, SessionHandle};
