use std::fmt;
use std::sync::{Arc, RwLock};

use crate::options::{OptionValue, Options};
use crate::session::SessionHandle;
use crate::sync::{read, write};

use super::{PluginError, UserInputRequester};

/// State a plugin is bound to at registration: its identifier, the owning
/// session, the user-input requester and its local options.
///
/// Shared by the registry entry and every instance it creates, so plugin
/// options set after an instance was created are visible to it.
pub struct PluginContext {
    id: String,
    session: SessionHandle,
    user_input: Option<Arc<dyn UserInputRequester>>,
    options: RwLock<Options>,
}

impl fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("id", &self.id)
            .field("has_user_input", &self.user_input.is_some())
            .field("options", &*read(&self.options))
            .finish()
    }
}

impl PluginContext {
    pub fn new(
        id: impl Into<String>,
        session: SessionHandle,
        user_input: Option<Arc<dyn UserInputRequester>>,
        options: Options,
    ) -> Self {
        Self {
            id: id.into(),
            session,
            user_input,
            options: RwLock::new(options),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Plugin-local option; [`OptionValue::Null`] when unset.
    pub fn get_option(&self, key: &str) -> OptionValue {
        read(&self.options).get_or_null(key)
    }

    pub fn set_option(&self, key: &str, value: OptionValue) {
        write(&self.options).set(key, value);
    }

    pub fn ask(&self, prompt: &str) -> Result<String, PluginError> {
        self.requester()?.ask(prompt)
    }

    pub fn ask_password(&self, prompt: &str) -> Result<String, PluginError> {
        self.requester()?.ask_password(prompt)
    }

    fn requester(&self) -> Result<&Arc<dyn UserInputRequester>, PluginError> {
        self.user_input.as_ref().ok_or(PluginError::NoInputRequester)
    }
}
