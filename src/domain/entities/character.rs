//! Character aggregate - ability scores, derived stats, and everything
//! else that lands on a 5e character sheet

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Equipment, Spell};
use crate::domain::value_objects::{Ability, ClassId};

/// The six ability scores of a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set_score(&mut self, ability: Ability, score: i32) {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
    }

    /// The ability modifier: floor((score - 10) / 2).
    ///
    /// Floor, not truncation: a score of 7 is -2, not -1. Rust's
    /// integer division truncates toward zero, so this uses
    /// `div_euclid`, which rounds toward negative infinity for the
    /// odd below-10 scores.
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.score(ability) - 10).div_euclid(2)
    }
}

/// Proficiency bonus for a character level: 2 at level 1, +1 every
/// four levels, 6 at level 20
pub fn proficiency_bonus(level: i32) -> i32 {
    2 + (level - 1) / 4
}

/// A player character. Created once by the character service and
/// mutated in place by equip, spell, and level-up use cases; every
/// mutation that touches abilities, level, class, or equipment must
/// re-run the derivation pipeline before the record is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub player_name: String,
    pub race: String,
    pub class: ClassId,
    pub level: i32,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub alignment: String,

    pub proficiency_bonus: i32,
    pub abilities: AbilityScores,
    #[serde(default)]
    pub skill_proficiencies: Vec<String>,
    /// Skill name -> computed modifier, for all 18 skills
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,

    // Mirrored ability modifiers, recomputed by the derivation pipeline
    pub strength_mod: i32,
    pub dexterity_mod: i32,
    pub constitution_mod: i32,
    pub intelligence_mod: i32,
    pub wisdom_mod: i32,
    pub charisma_mod: i32,

    #[serde(default)]
    pub equipment: Equipment,

    #[serde(default)]
    pub spells: Vec<Spell>,
    /// Spell level -> slot count; level 0 holds the cantrip count
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, u8>,

    pub armor_class: i32,
    pub initiative: i32,
    pub passive_perception: i32,

    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    #[serde(default)]
    pub spell_save_dc: i32,
    #[serde(default)]
    pub spell_attack_bonus: i32,
    #[serde(default)]
    pub can_prepare_spells: bool,

    // Carried as-is, never derived
    #[serde(default)]
    pub experience_points: i32,
    pub speed: i32,
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    #[serde(default)]
    pub temporary_hit_points: i32,
    #[serde(default)]
    pub hit_dice_total: String,
    #[serde(default)]
    pub hit_dice_remaining: String,
    #[serde(default)]
    pub death_save_successes: i32,
    #[serde(default)]
    pub death_save_failures: i32,

    #[serde(default)]
    pub copper_pieces: i32,
    #[serde(default)]
    pub silver_pieces: i32,
    #[serde(default)]
    pub electrum_pieces: i32,
    #[serde(default)]
    pub gold_pieces: i32,
    #[serde(default)]
    pub platinum_pieces: i32,
    #[serde(default)]
    pub equipment_text: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub ideals: String,
    #[serde(default)]
    pub bonds: String,
    #[serde(default)]
    pub flaws: String,
    #[serde(default)]
    pub features: String,
}

impl Character {
    /// A blank character with sheet baselines. The derivation pipeline
    /// fills in every computed field before the record leaves the
    /// factory.
    pub fn new(id: i64, name: impl Into<String>, race: impl Into<String>, class: ClassId) -> Self {
        Self {
            id,
            name: name.into(),
            player_name: String::new(),
            race: race.into(),
            class,
            level: 1,
            background: String::new(),
            alignment: String::new(),
            proficiency_bonus: proficiency_bonus(1),
            abilities: AbilityScores::default(),
            skill_proficiencies: Vec::new(),
            skills: BTreeMap::new(),
            strength_mod: 0,
            dexterity_mod: 0,
            constitution_mod: 0,
            intelligence_mod: 0,
            wisdom_mod: 0,
            charisma_mod: 0,
            equipment: Equipment::default(),
            spells: Vec::new(),
            spell_slots: BTreeMap::new(),
            armor_class: 10,
            initiative: 0,
            passive_perception: 10,
            spellcasting_ability: None,
            spell_save_dc: 0,
            spell_attack_bonus: 0,
            can_prepare_spells: false,
            experience_points: 0,
            speed: 30,
            max_hit_points: 10,
            current_hit_points: 10,
            temporary_hit_points: 0,
            hit_dice_total: "1d8".to_string(),
            hit_dice_remaining: "1d8".to_string(),
            death_save_successes: 0,
            death_save_failures: 0,
            copper_pieces: 0,
            silver_pieces: 0,
            electrum_pieces: 0,
            gold_pieces: 0,
            platinum_pieces: 0,
            equipment_text: String::new(),
            personality: String::new(),
            ideals: String::new(),
            bonds: String::new(),
            flaws: String::new(),
            features: String::new(),
        }
    }

    pub fn knows_spell(&self, name: &str) -> bool {
        self.spells.iter().any(|s| s.name == name)
    }
}
