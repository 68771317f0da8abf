//! Locale selection for plugins that localize requests or output.

use std::env;
use std::fmt;

use thiserror::Error;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COUNTRY: &str = "US";

/// Environment variables consulted, in order, when no locale is configured.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid locale '{0}'")]
pub struct InvalidLocale(pub String);

/// A language with an optional country, e.g. `en_US` or `pt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    language: String,
    country: Option<String>,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            country: Some(DEFAULT_COUNTRY.to_string()),
        }
    }
}

impl Localization {
    /// Parse `ll`, `ll_CC` or `ll-CC`, ignoring any `.encoding` or
    /// `@modifier` suffix. `C` and `POSIX` select the default locale.
    pub fn parse(raw: &str) -> Result<Self, InvalidLocale> {
        let invalid = || InvalidLocale(raw.to_string());
        let code = raw
            .trim()
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        if code == "C" || code == "POSIX" {
            return Ok(Self::default());
        }

        let mut parts = code.splitn(2, ['_', '-']);
        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let country = match parts.next() {
            None => None,
            Some(c) if c.len() == 2 && c.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(c.to_ascii_uppercase())
            }
            Some(_) => return Err(invalid()),
        };
        Ok(Self {
            language: language.to_ascii_lowercase(),
            country,
        })
    }

    /// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`; the default when none
    /// is set or parseable.
    pub fn from_env() -> Self {
        LOCALE_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|v| !v.trim().is_empty())
            .and_then(|v| Self::parse(&v).ok())
            .unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// `language_COUNTRY`, or just the language.
    pub fn language_code(&self) -> String {
        self.to_string()
    }

    /// True if this is the default (`en_US`) locale.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Localization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        let l = Localization::parse("es_ES").unwrap();
        assert_eq!(l.language(), "es");
        assert_eq!(l.country(), Some("ES"));

        assert_eq!(Localization::parse("en-gb").unwrap().language_code(), "en_GB");
        assert_eq!(Localization::parse("de_DE.UTF-8").unwrap().language_code(), "de_DE");
        assert_eq!(Localization::parse("pt").unwrap().country(), None);
    }

    #[test]
    fn c_locale_is_default() {
        assert!(Localization::parse("C").unwrap().is_default());
        assert!(Localization::parse("POSIX").unwrap().is_default());
        assert!(Localization::parse("C.UTF-8").unwrap().is_default());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Localization::parse("").is_err());
        assert!(Localization::parse("english").is_err());
        assert!(Localization::parse("en_USA").is_err());
        assert_eq!(
            Localization::parse("1x_US").unwrap_err(),
            InvalidLocale("1x_US".into())
        );
    }
}
