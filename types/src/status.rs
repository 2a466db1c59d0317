use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workflow stage of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Created,
    Approved,
    Sent,
    Signed,
    Locked,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown contract status `{0}`")]
pub struct UnknownStatusError(pub String);

impl ContractStatus {
    pub const ALL: [ContractStatus; 6] = [
        ContractStatus::Created,
        ContractStatus::Approved,
        ContractStatus::Sent,
        ContractStatus::Signed,
        ContractStatus::Locked,
        ContractStatus::Revoked,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Created => "CREATED",
            ContractStatus::Approved => "APPROVED",
            ContractStatus::Sent => "SENT",
            ContractStatus::Signed => "SIGNED",
            ContractStatus::Locked => "LOCKED",
            ContractStatus::Revoked => "REVOKED",
        }
    }

    /// Case-insensitive parse of the wire name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownStatusError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_upper_case() {
        let json = serde_json::to_string(&ContractStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        let back: ContractStatus = serde_json::from_str("\"REVOKED\"").unwrap();
        assert_eq!(back, ContractStatus::Revoked);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ContractStatus::parse("sent"), Some(ContractStatus::Sent));
        assert_eq!("Locked".parse::<ContractStatus>(), Ok(ContractStatus::Locked));
        assert!("ARCHIVED".parse::<ContractStatus>().is_err());
    }
}
