use indexmap::IndexMap;

use super::OptionValue;

/// Generic option store with defaults.
///
/// Values start as a copy of the defaults. Unknown keys are accepted without
/// validation. Iteration follows first-insertion order (defaults first).
#[derive(Debug, Clone, Default)]
pub struct Options {
    defaults: IndexMap<String, OptionValue>,
    values: IndexMap<String, OptionValue>,
}

impl Options {
    /// Create a store pre-seeded with `defaults`.
    pub fn new<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: Into<String>,
    {
        let defaults: IndexMap<String, OptionValue> =
            defaults.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            values: defaults.clone(),
            defaults,
        }
    }

    pub fn set(&mut self, key: &str, value: OptionValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Current value of `key`; `None` if it was never set and has no default.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Current value of `key`, [`OptionValue::Null`] when absent.
    pub fn get_or_null(&self, key: &str) -> OptionValue {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Restore `key` to its default (or drop it if it has none).
    pub fn reset(&mut self, key: &str) {
        match self.defaults.get(key) {
            Some(default) => {
                self.values.insert(key.to_string(), default.clone());
            }
            None => {
                self.values.shift_remove(key);
            }
        }
    }

    pub fn default_of(&self, key: &str) -> Option<&OptionValue> {
        self.defaults.get(key)
    }

    /// Set every pair from `other`.
    pub fn update<I, K>(&mut self, other: I)
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: Into<String>,
    {
        for (k, v) in other {
            self.values.insert(k.into(), v);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
