//! `error-http-status-codes` grammar.
//!
//! Each entry is one of:
//! - `403`: exactly that status
//! - `600T700`: inclusive range
//! - `600T`: 600 or above
//! - `T700`: 700 or below
//!
//! A string value may hold several comma-separated entries.

use std::fmt;
use std::str::FromStr;

/// Separator between range bounds.
pub const RANGE_SEPARATOR: char = 'T';

/// One status-code entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCodeRule {
    Exact(u32),
    /// Inclusive on both ends.
    Range(u32, u32),
    AtLeast(u32),
    AtMost(u32),
}

impl StatusCodeRule {
    pub fn matches(&self, code: u32) -> bool {
        match *self {
            StatusCodeRule::Exact(c) => code == c,
            StatusCodeRule::Range(lo, hi) => (lo..=hi).contains(&code),
            StatusCodeRule::AtLeast(lo) => code >= lo,
            StatusCodeRule::AtMost(hi) => code <= hi,
        }
    }
}

/// Parse failure for a status-code entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeParseError(pub String);

impl fmt::Display for StatusCodeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StatusCodeParseError {}

fn parse_code(raw: &str, entry: &str) -> Result<u32, StatusCodeParseError> {
    raw.parse::<u32>().map_err(|_| {
        StatusCodeParseError(format!("'{entry}' is not a status code or range"))
    })
}

impl FromStr for StatusCodeRule {
    type Err = StatusCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let Some((lo, hi)) = entry.split_once(RANGE_SEPARATOR) else {
            return parse_code(entry, entry).map(StatusCodeRule::Exact);
        };
        match (lo.is_empty(), hi.is_empty()) {
            (false, false) => {
                let lo = parse_code(lo, entry)?;
                let hi = parse_code(hi, entry)?;
                if lo > hi {
                    return Err(StatusCodeParseError(format!(
                        "'{entry}': range start is above range end"
                    )));
                }
                Ok(StatusCodeRule::Range(lo, hi))
            }
            (false, true) => parse_code(lo, entry).map(StatusCodeRule::AtLeast),
            (true, false) => parse_code(hi, entry).map(StatusCodeRule::AtMost),
            (true, true) => Err(StatusCodeParseError(format!(
                "'{entry}': range needs at least one bound"
            ))),
        }
    }
}

impl fmt::Display for StatusCodeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCodeRule::Exact(c) => write!(f, "{c}"),
            StatusCodeRule::Range(lo, hi) => write!(f, "{lo}{RANGE_SEPARATOR}{hi}"),
            StatusCodeRule::AtLeast(lo) => write!(f, "{lo}{RANGE_SEPARATOR}"),
            StatusCodeRule::AtMost(hi) => write!(f, "{RANGE_SEPARATOR}{hi}"),
        }
    }
}

/// Ordered set of status-code rules. Defaults to `[403]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeRules(Vec<StatusCodeRule>);

impl StatusCodeRules {
    pub fn new(rules: Vec<StatusCodeRule>) -> Self {
        Self(rules)
    }

    /// Parse a comma-separated list, e.g. `"403,500T599"`. Empty entries are skipped.
    pub fn parse_list(s: &str) -> Result<Self, StatusCodeParseError> {
        Self::parse_entries(s.split(','))
    }

    /// Parse individual entries; each entry may itself be comma-separated.
    pub fn parse_entries<I, S>(entries: I) -> Result<Self, StatusCodeParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for entry in entries {
            for part in entry.as_ref().split(',') {
                if part.trim().is_empty() {
                    continue;
                }
                rules.push(part.parse()?);
            }
        }
        Ok(Self(rules))
    }

    /// True if any rule matches `code`.
    pub fn matches(&self, code: u32) -> bool {
        self.0.iter().any(|r| r.matches(code))
    }

    pub fn rules(&self) -> &[StatusCodeRule] {
        &self.0
    }

    /// Entries in their textual form.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl Default for StatusCodeRules {
    fn default() -> Self {
        Self(vec![StatusCodeRule::Exact(403)])
    }
}
