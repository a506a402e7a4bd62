//! Character Service - creation, retrieval, level-up, and the
//! derivation pipeline
//!
//! `derive` is the single recomputation path for every derived field
//! on the sheet. Any use case that touches abilities, level, class,
//! or equipment runs it before persisting, so stored records are
//! always internally consistent.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::application::error::SheetError;
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::application::services::{equipment_service, spell_service};
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::entities::{proficiency_bonus, Character};
use crate::domain::rulebook::{Rulebook, STANDARD_ARRAY};
use crate::domain::value_objects::{skill, Ability, ClassId};

/// New characters get at most this many skill proficiencies
const MAX_STARTING_SKILLS: usize = 4;

/// Recompute every derived field from the authoritative ones, in
/// dependency order: proficiency bonus and ability modifiers first,
/// then skills, then combat statistics, then the spellcasting block.
/// Idempotent: running it twice changes nothing.
pub fn derive(rules: &Rulebook, c: &mut Character) {
    c.proficiency_bonus = proficiency_bonus(c.level);
    update_modifiers(c);
    calculate_skills(rules, c);

    c.initiative = c.dexterity_mod;
    c.passive_perception = 10
        + c.skills
            .get(skill::PERCEPTION)
            .copied()
            .unwrap_or(c.wisdom_mod);
    c.armor_class = equipment_service::armor_class(c);
    refresh_weapon_damage(c);

    spell_service::setup_spellcasting(rules, c);
}

fn update_modifiers(c: &mut Character) {
    c.strength_mod = c.abilities.modifier(Ability::Strength);
    c.dexterity_mod = c.abilities.modifier(Ability::Dexterity);
    c.constitution_mod = c.abilities.modifier(Ability::Constitution);
    c.intelligence_mod = c.abilities.modifier(Ability::Intelligence);
    c.wisdom_mod = c.abilities.modifier(Ability::Wisdom);
    c.charisma_mod = c.abilities.modifier(Ability::Charisma);
}

/// Fill the skills map for all 18 skills: governing ability modifier,
/// plus the proficiency bonus when the skill name appears in the
/// proficiency list (exact, case-sensitive match)
fn calculate_skills(rules: &Rulebook, c: &mut Character) {
    c.skills.clear();
    for name in skill::ALL_SKILLS {
        let Some(ability) = rules.skill_ability(name) else {
            continue;
        };
        let mut modifier = c.abilities.modifier(ability);
        if c.skill_proficiencies.iter().any(|s| s == name) {
            modifier += c.proficiency_bonus;
        }
        c.skills.insert(name.to_string(), modifier);
    }
}

/// Recompute the damage strings of equipped weapons; stale after any
/// change to Strength or Dexterity
fn refresh_weapon_damage(c: &mut Character) {
    if let Some(mut weapon) = c.equipment.main_hand.take() {
        weapon.damage = equipment_service::weapon_damage(c, &weapon);
        c.equipment.main_hand = Some(weapon);
    }
    if let Some(mut weapon) = c.equipment.off_hand.take() {
        weapon.damage = equipment_service::weapon_damage(c, &weapon);
        c.equipment.off_hand = Some(weapon);
    }
}

/// Input for character creation. Ability scores, when given, are the
/// six base values in canonical order before racial bonuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCharacterRequest {
    pub name: String,
    #[serde(default)]
    pub player_name: String,
    pub race: String,
    pub class: String,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub ability_scores: Vec<i32>,
    #[serde(default)]
    pub skill_proficiencies: Vec<String>,
}

/// Use cases owning the character lifecycle
pub struct CharacterService {
    rulebook: Arc<Rulebook>,
    catalog: Arc<ReferenceCatalog>,
    repository: Arc<dyn CharacterRepositoryPort>,
}

impl CharacterService {
    pub fn new(
        rulebook: Arc<Rulebook>,
        catalog: Arc<ReferenceCatalog>,
        repository: Arc<dyn CharacterRepositoryPort>,
    ) -> Self {
        Self {
            rulebook,
            catalog,
            repository,
        }
    }

    /// Create a character: validate, assign ability scores (supplied
    /// or the standard array) with racial bonuses, pick default skill
    /// proficiencies, run the derivation pipeline, and persist.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateCharacterRequest) -> Result<Character, SheetError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(SheetError::validation("character name must not be empty"));
        }
        let class = ClassId::parse(&request.class).ok_or_else(|| {
            SheetError::validation(format!("unknown class '{}'", request.class))
        })?;
        let level = request.level.unwrap_or(1);
        if !(1..=20).contains(&level) {
            return Err(SheetError::validation(format!(
                "level must be between 1 and 20, got {level}"
            )));
        }
        let base_scores: [i32; 6] = match request.ability_scores.len() {
            0 => STANDARD_ARRAY,
            6 => {
                let mut scores = [0; 6];
                scores.copy_from_slice(&request.ability_scores);
                scores
            }
            n => {
                return Err(SheetError::validation(format!(
                    "expected 6 ability scores, got {n}"
                )))
            }
        };
        for name in &request.skill_proficiencies {
            if !skill::ALL_SKILLS.contains(&name.as_str()) {
                return Err(SheetError::validation(format!("unknown skill '{name}'")));
            }
        }

        let all = self.repository.load_all().await?;
        if all.contains_key(&name) {
            return Err(SheetError::conflict(format!(
                "character '{name}' already exists"
            )));
        }

        let race = request.race.trim().to_lowercase();
        let mut character = Character::new(all.len() as i64 + 1, name, race, class);
        character.player_name = request.player_name;
        character.level = level;
        character.background = request.background;
        character.alignment = request.alignment;

        for (ability, base) in Ability::ALL.into_iter().zip(base_scores) {
            let bonus = self.rulebook.race_modifier(&character.race, ability);
            character.abilities.set_score(ability, base + bonus);
        }

        character.skill_proficiencies = if request.skill_proficiencies.is_empty() {
            self.rulebook
                .class_skills(class)
                .into_iter()
                .take(MAX_STARTING_SKILLS)
                .map(str::to_string)
                .collect()
        } else {
            request.skill_proficiencies
        };

        derive(&self.rulebook, &mut character);
        character.spells = spell_service::starting_spells(&self.catalog, class);

        self.repository.save(&character).await?;
        info!(
            id = character.id,
            class = %character.class,
            level = character.level,
            "Created character"
        );
        Ok(character)
    }

    pub async fn get(&self, name: &str) -> Result<Character, SheetError> {
        self.repository
            .get_by_name(name)
            .await?
            .ok_or_else(|| SheetError::not_found(format!("character '{name}' not found")))
    }

    /// All characters, ordered by name
    pub async fn list(&self) -> Result<Vec<Character>, SheetError> {
        Ok(self.repository.load_all().await?.into_values().collect())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), SheetError> {
        self.repository.delete(name).await?;
        info!(name, "Deleted character");
        Ok(())
    }

    /// Raise a character to a new level and re-derive the sheet
    #[instrument(skip(self))]
    pub async fn level_up(&self, name: &str, new_level: i32) -> Result<Character, SheetError> {
        if !(1..=20).contains(&new_level) {
            return Err(SheetError::validation(format!(
                "level must be between 1 and 20, got {new_level}"
            )));
        }
        let mut character = self.get(name).await?;
        if new_level <= character.level {
            return Err(SheetError::validation(format!(
                "new level {new_level} must be above the current level {}",
                character.level
            )));
        }

        character.level = new_level;
        derive(&self.rulebook, &mut character);

        self.repository.save(&character).await?;
        info!(name, level = new_level, "Leveled up character");
        Ok(character)
    }
}
