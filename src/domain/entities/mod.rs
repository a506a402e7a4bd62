//! Domain entities - Core business objects with identity

mod character;
mod equipment;
mod spell;

pub use character::{proficiency_bonus, AbilityScores, Character};
pub use equipment::{Armor, Equipment, Shield, Weapon};
pub use spell::Spell;
