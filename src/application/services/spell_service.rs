//! Spell Service - spellcasting statistics, slot progression, and the
//! learn/prepare use cases
//!
//! Slot generation is pure and branches on the class's caster kind:
//! full casters read the rulebook's slot table, half casters unlock
//! slots at fixed level thresholds, and the warlock carries a single
//! pact slot level at a time.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error::SheetError;
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::entities::{Character, Spell};
use crate::domain::rulebook::Rulebook;
use crate::domain::value_objects::{CasterKind, ClassId};

/// Half-caster progression: (slot level, character level required,
/// slot count once unlocked)
const HALF_CASTER_THRESHOLDS: [(u8, i32, u8); 5] =
    [(1, 2, 4), (2, 5, 3), (3, 9, 3), (4, 13, 3), (5, 17, 2)];

/// Spell slots for a class at a character level. Key 0 is the cantrip
/// count where the class tracks one. Deterministic: equal inputs give
/// equal maps.
pub fn generate_slots(rules: &Rulebook, class: ClassId, level: i32) -> BTreeMap<u8, u8> {
    let mut slots = BTreeMap::new();

    match class.caster_kind() {
        CasterKind::None => {}
        CasterKind::Full => {
            slots.insert(
                0,
                match level {
                    ..=3 => 3,
                    ..=9 => 4,
                    _ => 5,
                },
            );
            if let Some(row) = rules.full_caster_row(level) {
                for (i, &count) in row.iter().enumerate() {
                    if count > 0 {
                        slots.insert(i as u8 + 1, count);
                    }
                }
            }
        }
        CasterKind::Half => {
            for (slot_level, required, count) in HALF_CASTER_THRESHOLDS {
                if level >= required {
                    slots.insert(slot_level, count);
                }
            }
        }
        CasterKind::Pact => {
            slots.insert(0, 4);
            let (pact_level, count) = match level {
                ..=1 => (1, 1),
                ..=8 => (1, 2),
                ..=11 => (2, 3),
                ..=16 => (3, 3),
                _ => (5, 4),
            };
            slots.insert(pact_level, count);
        }
    }

    slots
}

/// Recompute the spellcasting block. Non-casters get every field
/// cleared; casters get ability, save DC, attack bonus, prepared
/// flag, and slots.
pub fn setup_spellcasting(rules: &Rulebook, c: &mut Character) {
    match c.class.spellcasting_ability() {
        None => {
            c.spellcasting_ability = None;
            c.spell_save_dc = 0;
            c.spell_attack_bonus = 0;
            c.spell_slots = BTreeMap::new();
            c.can_prepare_spells = false;
        }
        Some(ability) => {
            let modifier = c.abilities.modifier(ability);
            c.spellcasting_ability = Some(ability);
            c.spell_save_dc = 8 + c.proficiency_bonus + modifier;
            c.spell_attack_bonus = c.proficiency_bonus + modifier;
            c.can_prepare_spells = c.class.prepares_spells();
            c.spell_slots = generate_slots(rules, c.class, c.level);
        }
    }
}

/// Cantrips a prepared caster starts with, unprepared, from the local
/// catalog. Known casters pick their own spells and start empty.
pub fn starting_spells(catalog: &ReferenceCatalog, class: ClassId) -> Vec<Spell> {
    if !class.prepares_spells() {
        return Vec::new();
    }
    catalog
        .spells_for_class(class)
        .into_iter()
        .filter(|s| s.level == 0)
        .collect()
}

/// Use cases for learning and preparing spells
pub struct SpellService {
    catalog: Arc<ReferenceCatalog>,
    repository: Arc<dyn CharacterRepositoryPort>,
}

impl SpellService {
    pub fn new(
        catalog: Arc<ReferenceCatalog>,
        repository: Arc<dyn CharacterRepositoryPort>,
    ) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    async fn load(&self, name: &str) -> Result<Character, SheetError> {
        self.repository
            .get_by_name(name)
            .await?
            .ok_or_else(|| SheetError::not_found(format!("character '{name}' not found")))
    }

    /// Add a spell to a known caster's spell list
    #[instrument(skip(self))]
    pub async fn learn_spell(
        &self,
        character_name: &str,
        spell_name: &str,
    ) -> Result<Spell, SheetError> {
        let mut character = self.load(character_name).await?;

        if !character.class.can_cast_spells() {
            return Err(SheetError::validation("this class can't cast spells"));
        }
        if character.can_prepare_spells {
            return Err(SheetError::validation(
                "this class prepares spells and can't learn them",
            ));
        }

        let entry = self.catalog.find_spell(spell_name).ok_or_else(|| {
            SheetError::not_found(format!("spell '{spell_name}' not found in spell list"))
        })?;
        if !entry.classes.contains(&character.class) {
            return Err(SheetError::validation(format!(
                "{} cannot learn {}",
                character.class, entry.name
            )));
        }
        if character.knows_spell(&entry.name) {
            return Err(SheetError::conflict(format!(
                "character '{}' already knows spell '{}'",
                character_name, entry.name
            )));
        }

        let spell = Spell {
            name: entry.name.clone(),
            level: entry.level,
            prepared: false,
            ..Spell::default()
        };
        character.spells.push(spell.clone());
        self.repository.save(&character).await?;

        info!(character = character_name, spell = %spell.name, "Learned spell");
        Ok(spell)
    }

    /// Mark a spell prepared at a slot level. Prepared casters may
    /// prepare straight from their class list; the slot level must be
    /// at least the spell's level and have slots available.
    #[instrument(skip(self))]
    pub async fn prepare_spell(
        &self,
        character_name: &str,
        spell_name: &str,
        slot_level: u8,
    ) -> Result<(), SheetError> {
        let mut character = self.load(character_name).await?;

        if !character.class.can_cast_spells() {
            return Err(SheetError::validation("this class can't cast spells"));
        }
        if !character.can_prepare_spells {
            return Err(SheetError::validation(
                "this class learns spells and can't prepare them",
            ));
        }

        let entry = self.catalog.find_spell(spell_name).ok_or_else(|| {
            SheetError::not_found(format!("spell '{spell_name}' not found in spell list"))
        })?;
        if !entry.classes.contains(&character.class) {
            return Err(SheetError::validation(format!(
                "spell '{}' not available for class '{}'",
                entry.name, character.class
            )));
        }
        if slot_level < entry.level {
            return Err(SheetError::validation(
                "the spell has higher level than the available spell slots",
            ));
        }
        match character.spell_slots.get(&slot_level) {
            Some(count) if *count > 0 => {}
            _ => {
                return Err(SheetError::validation(format!(
                    "no available spell slots of level {slot_level}"
                )))
            }
        }

        let name = entry.name.clone();
        let level = entry.level;
        if let Some(known) = character.spells.iter_mut().find(|s| s.name == name) {
            known.prepared = true;
            known.level = slot_level;
        } else {
            character.spells.push(Spell {
                name: name.clone(),
                level: slot_level.max(level),
                prepared: true,
                ..Spell::default()
            });
        }
        self.repository.save(&character).await?;

        info!(character = character_name, spell = %name, slot_level, "Prepared spell");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::character_service::derive;
    use crate::application::services::test_support::MemoryRepository;
    use crate::domain::value_objects::Ability;

    fn rules() -> Rulebook {
        Rulebook::srd()
    }

    #[test]
    fn non_casters_get_no_slots() {
        assert!(generate_slots(&rules(), ClassId::Fighter, 10).is_empty());
        assert!(generate_slots(&rules(), ClassId::Rogue, 20).is_empty());
    }

    #[test]
    fn full_caster_slots_follow_the_table() {
        let rules = rules();
        let level1 = generate_slots(&rules, ClassId::Wizard, 1);
        assert_eq!(level1.get(&0), Some(&3));
        assert_eq!(level1.get(&1), Some(&2));
        assert_eq!(level1.get(&2), None);

        let level5 = generate_slots(&rules, ClassId::Bard, 5);
        assert_eq!(level5.get(&0), Some(&4));
        assert_eq!(level5.get(&1), Some(&4));
        assert_eq!(level5.get(&2), Some(&3));
        assert_eq!(level5.get(&3), None);

        let level20 = generate_slots(&rules, ClassId::Sorcerer, 20);
        assert_eq!(level20.get(&0), Some(&5));
        assert_eq!(level20.get(&9), Some(&1));
    }

    #[test]
    fn cantrip_count_follows_level_bands() {
        let rules = rules();
        assert_eq!(generate_slots(&rules, ClassId::Wizard, 3).get(&0), Some(&3));
        assert_eq!(generate_slots(&rules, ClassId::Wizard, 4).get(&0), Some(&4));
        assert_eq!(generate_slots(&rules, ClassId::Wizard, 9).get(&0), Some(&4));
        assert_eq!(
            generate_slots(&rules, ClassId::Wizard, 10).get(&0),
            Some(&5)
        );
    }

    #[test]
    fn cleric_and_druid_use_the_same_table_as_wizards() {
        let rules = rules();
        // No level-10 cap: high-level clerics keep climbing the table
        let cleric = generate_slots(&rules, ClassId::Cleric, 17);
        let wizard = generate_slots(&rules, ClassId::Wizard, 17);
        assert_eq!(cleric, wizard);
        assert_eq!(cleric.get(&9), Some(&1));
    }

    #[test]
    fn half_casters_unlock_slots_at_fixed_thresholds() {
        let rules = rules();
        assert!(generate_slots(&rules, ClassId::Paladin, 1).is_empty());

        let level2 = generate_slots(&rules, ClassId::Paladin, 2);
        assert_eq!(level2.get(&1), Some(&4));
        assert_eq!(level2.get(&2), None);

        let level9 = generate_slots(&rules, ClassId::Ranger, 9);
        assert_eq!(level9.get(&1), Some(&4));
        assert_eq!(level9.get(&2), Some(&3));
        assert_eq!(level9.get(&3), Some(&3));
        assert_eq!(level9.get(&4), None);

        let level20 = generate_slots(&rules, ClassId::Paladin, 20);
        assert_eq!(level20.get(&5), Some(&2));
        // Half casters track no cantrips
        assert_eq!(level20.get(&0), None);
    }

    #[test]
    fn warlock_has_one_pact_level_and_fixed_cantrips() {
        let rules = rules();
        for level in 1..=20 {
            let slots = generate_slots(&rules, ClassId::Warlock, level);
            assert_eq!(slots.get(&0), Some(&4), "level {level}");
            let pact_levels: Vec<u8> = slots.keys().copied().filter(|l| *l > 0).collect();
            assert_eq!(pact_levels.len(), 1, "level {level}");
        }

        assert_eq!(generate_slots(&rules, ClassId::Warlock, 1).get(&1), Some(&1));
        assert_eq!(generate_slots(&rules, ClassId::Warlock, 5).get(&1), Some(&2));
        assert_eq!(generate_slots(&rules, ClassId::Warlock, 9).get(&2), Some(&3));
        assert_eq!(generate_slots(&rules, ClassId::Warlock, 14).get(&3), Some(&3));
        assert_eq!(generate_slots(&rules, ClassId::Warlock, 20).get(&5), Some(&4));
    }

    #[test]
    fn slot_generation_is_idempotent() {
        let rules = rules();
        for class in [ClassId::Wizard, ClassId::Paladin, ClassId::Warlock] {
            for level in [1, 5, 11, 20] {
                assert_eq!(
                    generate_slots(&rules, class, level),
                    generate_slots(&rules, class, level)
                );
            }
        }
    }

    #[test]
    fn setup_clears_the_block_for_non_casters() {
        let rules = rules();
        let mut c = Character::new(1, "Test", "human", ClassId::Fighter);
        c.spell_save_dc = 13;
        c.spell_slots.insert(1, 2);
        c.can_prepare_spells = true;

        setup_spellcasting(&rules, &mut c);
        assert_eq!(c.spellcasting_ability, None);
        assert_eq!(c.spell_save_dc, 0);
        assert_eq!(c.spell_attack_bonus, 0);
        assert!(c.spell_slots.is_empty());
        assert!(!c.can_prepare_spells);
    }

    #[test]
    fn setup_computes_dc_and_attack_bonus() {
        let rules = rules();
        let mut c = Character::new(1, "Test", "human", ClassId::Wizard);
        c.abilities.intelligence = 13;
        c.proficiency_bonus = 2;

        setup_spellcasting(&rules, &mut c);
        assert_eq!(c.spellcasting_ability, Some(Ability::Intelligence));
        assert_eq!(c.spell_save_dc, 8 + 2 + 1);
        assert_eq!(c.spell_attack_bonus, 2 + 1);
        assert!(!c.can_prepare_spells || c.class.prepares_spells());
    }

    #[test]
    fn prepared_casters_start_with_their_cantrips() {
        let catalog = ReferenceCatalog::builtin();
        let cleric = starting_spells(&catalog, ClassId::Cleric);
        assert!(!cleric.is_empty());
        assert!(cleric.iter().all(|s| s.level == 0 && !s.prepared));

        // Known casters pick their own
        assert!(starting_spells(&catalog, ClassId::Bard).is_empty());
        assert!(starting_spells(&catalog, ClassId::Fighter).is_empty());
    }

    fn caster(class: ClassId, level: i32) -> Character {
        let rules = Rulebook::srd();
        let mut c = Character::new(1, "Caster", "human", class);
        c.level = level;
        c.abilities = crate::domain::entities::AbilityScores {
            strength: 10,
            dexterity: 12,
            constitution: 12,
            intelligence: 14,
            wisdom: 14,
            charisma: 14,
        };
        derive(&rules, &mut c);
        c
    }

    fn service_with(characters: Vec<Character>) -> (SpellService, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::with(characters));
        let service = SpellService::new(Arc::new(ReferenceCatalog::builtin()), repository.clone());
        (service, repository)
    }

    #[tokio::test]
    async fn known_casters_learn_spells_once() {
        let (service, repository) = service_with(vec![caster(ClassId::Bard, 1)]);

        let spell = service.learn_spell("Caster", "vicious mockery").await.unwrap();
        assert_eq!(spell.level, 0);

        let err = service.learn_spell("Caster", "vicious mockery").await.unwrap_err();
        assert!(matches!(err, SheetError::Conflict(_)));

        let stored = repository.get_by_name("Caster").await.unwrap().unwrap();
        assert_eq!(stored.spells.len(), 1);
    }

    #[tokio::test]
    async fn learning_respects_class_lists_and_caster_kind() {
        let (service, _) = service_with(vec![
            caster(ClassId::Bard, 1),
            {
                let mut c = caster(ClassId::Fighter, 1);
                c.name = "Mundane".into();
                c
            },
            {
                let mut c = caster(ClassId::Cleric, 1);
                c.name = "Prepared".into();
                c
            },
        ]);

        let err = service.learn_spell("Caster", "fireball").await.unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));

        let err = service.learn_spell("Caster", "wish").await.unwrap_err();
        assert!(matches!(err, SheetError::NotFound(_)));

        let err = service.learn_spell("Mundane", "fire bolt").await.unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));

        let err = service.learn_spell("Prepared", "sacred flame").await.unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));
    }

    #[tokio::test]
    async fn prepared_casters_prepare_from_the_class_list() {
        let (service, repository) = service_with(vec![caster(ClassId::Cleric, 1)]);

        service.prepare_spell("Caster", "bless", 1).await.unwrap();
        let stored = repository.get_by_name("Caster").await.unwrap().unwrap();
        let bless = stored.spells.iter().find(|s| s.name == "bless").unwrap();
        assert!(bless.prepared);
        assert_eq!(bless.level, 1);
    }

    #[tokio::test]
    async fn preparing_validates_slot_levels() {
        let (service, _) = service_with(vec![caster(ClassId::Cleric, 1)]);

        // A level-1 cleric has no level-2 slots
        let err = service.prepare_spell("Caster", "spiritual weapon", 2).await.unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));

        // Slot below the spell's level
        let err = service.prepare_spell("Caster", "spiritual weapon", 1).await.unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));

        // Known casters don't prepare
        let (service, _) = service_with(vec![caster(ClassId::Bard, 1)]);
        let err = service.prepare_spell("Caster", "cure wounds", 1).await.unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));
    }
}
