//! URL modeling shared by the resolver, the option router and plugins.
//!
//! Inputs to matching always carry an explicit scheme; bare inputs such as
//! `example.com/live` are defaulted (`http://` for resolution, `https://` for
//! the HTTPS proxy) before anything looks at them.

mod path;
mod scheme;

pub use path::path_extension;
pub use scheme::{has_scheme, update_scheme};
