//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, Weapon, Armor, Shield, Spell
//! - Value Objects: Ability, ClassId, skill names
//! - Rulebook: immutable progression tables injected into services

pub mod catalog;
pub mod entities;
pub mod rulebook;
pub mod value_objects;
