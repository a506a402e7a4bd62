//! Spell record

use serde::{Deserialize, Serialize};

/// A spell known or prepared by a character. Level 0 is a cantrip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub prepared: bool,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub range: String,
}
