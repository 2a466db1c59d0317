//! Filled-in field values and the composite signature record.

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FieldType;

/// Answer stored on a contract field. `None` at the use site means unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bool(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }

    /// Whether this value has the shape a field of `field_type` stores.
    #[must_use]
    pub const fn fits(&self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::Checkbox => matches!(self, Self::Bool(_)),
            FieldType::TextBlock => false,
            FieldType::Text | FieldType::Date | FieldType::Select | FieldType::Signature => {
                matches!(self, Self::Text(_))
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ── Timestamp format ─────────────────────────────────────────

/// Matches the US-locale `toLocaleString` rendering, e.g. `10/19/2026, 3:04:05 PM`.
pub const DEFAULT_SIGNATURE_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// A strftime pattern verified to contain no invalid specifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp format `{0}`")]
pub struct InvalidTimestampFormat(pub String);

impl TimestampFormat {
    pub fn new(pattern: impl Into<String>) -> Result<Self, InvalidTimestampFormat> {
        let pattern = pattern.into();
        if pattern.trim().is_empty()
            || StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error))
        {
            return Err(InvalidTimestampFormat(pattern));
        }
        Ok(Self(pattern))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn render<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::new();
        let _ = write!(out, "{}", at.format_with_items(StrftimeItems::new(&self.0)));
        out
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self(DEFAULT_SIGNATURE_TIMESTAMP_FORMAT.to_owned())
    }
}

// ── Signature composite ──────────────────────────────────────

const SIGNATURE_SEPARATOR: char = '\n';

/// Name typed by the person signing. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerName(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signer name is blank")]
pub struct BlankSignerName;

impl SignerName {
    pub fn new(name: impl Into<String>) -> Result<Self, BlankSignerName> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BlankSignerName);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Signer identity plus display timestamp, stored as `"<name>\n<timestamp>"`.
///
/// The timestamp line is for display only and is never parsed back into a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStamp {
    signer: SignerName,
    signed_at: Option<String>,
}

impl SignatureStamp {
    /// Stamp `signer` at `now`. Line breaks in the name are folded into spaces
    /// so the first stored line is always the full signer name.
    #[must_use]
    pub fn at<Tz>(signer: &SignerName, now: &DateTime<Tz>, format: &TimestampFormat) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let folded = signer
            .as_str()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let signer = SignerName::new(folded).unwrap_or_else(|_| signer.clone());
        Self {
            signer,
            signed_at: Some(format.render(now)),
        }
    }

    /// Recover the record from a stored value. Returns `None` for a blank value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (first, rest) = match value.split_once(SIGNATURE_SEPARATOR) {
            Some((first, rest)) => (first, Some(rest)),
            None => (value, None),
        };
        let signer = SignerName::new(first.trim()).ok()?;
        let signed_at = rest
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned);
        Some(Self { signer, signed_at })
    }

    #[must_use]
    pub fn signer(&self) -> &str {
        self.signer.as_str()
    }

    #[must_use]
    pub fn signed_at(&self) -> Option<&str> {
        self.signed_at.as_deref()
    }

    #[must_use]
    pub fn encode(&self) -> String {
        match &self.signed_at {
            Some(at) => format!("{}{SIGNATURE_SEPARATOR}{at}", self.signer.as_str()),
            None => self.signer.as_str().to_owned(),
        }
    }
}
