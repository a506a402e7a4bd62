//! Equipment records - weapons, armor, and shields

use serde::{Deserialize, Serialize};

/// A weapon, either from the local catalog or the SRD API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub two_handed: bool,
    /// Dice notation, e.g. "1d8". Normalized before damage is rendered.
    #[serde(default)]
    pub damage_die: String,
    #[serde(default)]
    pub is_finesse: bool,
    /// Computed display string, e.g. "1d8 + 3"
    #[serde(default)]
    pub damage: String,
}

/// Worn armor. `max_dex_bonus` of 0 means the Dexterity bonus is
/// uncapped when `dex_bonus` is true; heavy armor sets `dex_bonus`
/// to false instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub armor_class: i32,
    #[serde(default)]
    pub dex_bonus: bool,
    #[serde(default)]
    pub max_dex_bonus: i32,
}

/// A shield granting a flat AC bonus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub name: String,
    pub armor_class: i32,
}

/// Everything a character has equipped. Each piece is owned
/// exclusively by its character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub main_hand: Option<Weapon>,
    #[serde(default)]
    pub off_hand: Option<Weapon>,
    #[serde(default)]
    pub armor: Option<Armor>,
    #[serde(default)]
    pub shield: Option<Shield>,
}
