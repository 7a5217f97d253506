//! Duration strings for activity options

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors from parsing a duration string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration '{0}' does not match <number><s|m|h>")]
    Pattern(String),
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)([smh])$").expect("valid duration pattern"))
}

/// A wire-format duration string such as `"20m"`.
///
/// The wire format is `<number><unit>` with unit one of `s`, `m`, `h`.
/// Values built through [`DurationStr::parse`] are normalized (leading
/// zeros stripped) so that canonical document text is byte-stable.
/// Deserialization is lenient: arbitrary strings are accepted and
/// flagged later by document validation, so a hand-edited YAML view
/// never fails to parse on a bad duration alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationStr(String);

impl DurationStr {
    /// Parse and normalize a duration string
    pub fn parse(raw: &str) -> Result<Self, DurationError> {
        let captures = duration_pattern()
            .captures(raw)
            .ok_or_else(|| DurationError::Pattern(raw.to_string()))?;

        let value: u64 = captures[1]
            .parse()
            .map_err(|_| DurationError::Pattern(raw.to_string()))?;
        let unit = &captures[2];

        Ok(Self(format!("{}{}", value, unit)))
    }

    /// The raw string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the wire pattern, reporting the offending text on failure
    pub fn check_format(&self) -> Result<(), DurationError> {
        if duration_pattern().is_match(&self.0) {
            Ok(())
        } else {
            Err(DurationError::Pattern(self.0.clone()))
        }
    }

    /// Normalize formatting in place if the string is well-formed.
    ///
    /// Malformed strings are left untouched for validation to report.
    pub fn canonicalize(&mut self) {
        if let Ok(normalized) = Self::parse(&self.0) {
            self.0 = normalized.0;
        }
    }

    /// Total seconds, if the string is well-formed
    pub fn seconds(&self) -> Option<u64> {
        let captures = duration_pattern().captures(&self.0)?;
        let value: u64 = captures[1].parse().ok()?;
        let multiplier = match &captures[2] {
            "s" => 1,
            "m" => 60,
            "h" => 3600,
            _ => return None,
        };
        value.checked_mul(multiplier)
    }
}

impl fmt::Display for DurationStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DurationStr {
    /// Wrap a raw string without validation (lenient path, mirrors
    /// deserialization). Use [`DurationStr::parse`] when building
    /// canonical values.
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
