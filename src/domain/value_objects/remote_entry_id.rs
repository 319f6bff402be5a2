use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier assigned by the remote store once it has accepted an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteEntryId(String);

impl RemoteEntryId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        Self::validate(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Remote entry id cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for RemoteEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RemoteEntryId> for String {
    fn from(id: RemoteEntryId) -> Self {
        id.0
    }
}

impl FromStr for RemoteEntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
