//! Records - Uniquely-identified values that a store can hold.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Trait for types that can be stored and edited as records.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this record type (e.g., "heritage_sites",
    /// "report_cards"). Used for keying and diagnostics.
    const KIND: &'static str;

    /// Returns the unique identifier for this record. The id is fixed at
    /// creation; edit sessions reject submissions that change it.
    fn id(&self) -> &str;
}

/// Lifecycle status of a record, constrained to a fixed set.
///
/// Serializes as the upper-case wire form (`"ACTIVE"`, `"INACTIVE"`,
/// `"PENDING"`); parsing rejects anything else, so no out-of-set status
/// can enter a record from text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Inactive,
    Pending,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Inactive, Status::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
            Status::Pending => "PENDING",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "ACTIVE" => Ok(Status::Active),
            "INACTIVE" => Ok(Status::Inactive),
            "PENDING" => Ok(Status::Pending),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status: {:?}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_statuses() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(" ACTIVE ".parse::<Status>().unwrap(), Status::Active);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "RETIRED".parse::<Status>().unwrap_err();
        assert_eq!(err, ParseStatusError("RETIRED".to_string()));
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&Status::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::Pending);
    }
}
