use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier read from a user's RFID badge. Compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RfidTag(String);

impl RfidTag {
    pub fn new(tag: String) -> Result<Self, String> {
        if tag.trim().is_empty() {
            return Err("RFID tag cannot be empty".to_string());
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RfidTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
