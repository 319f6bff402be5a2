use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Mutations that can wait in the sync queue. Only creations are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncOperationType {
    CreateEntry,
}

impl SyncOperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperationType::CreateEntry => "createEntry",
        }
    }
}

impl fmt::Display for SyncOperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncOperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createEntry" => Ok(SyncOperationType::CreateEntry),
            other => Err(format!("Unknown sync operation type: {other}")),
        }
    }
}
