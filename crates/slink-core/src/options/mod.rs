//! Option values and the generic option store.
//!
//! Every session option is an [`OptionValue`]. The [`Options`] store keeps the
//! documented defaults plus whatever callers set; keys it does not know are
//! accepted verbatim so newer plugins can read options older cores never heard
//! of.

mod defaults;
mod store;
mod value;

pub use defaults::session_defaults;
pub use store::Options;
pub use value::OptionValue;
