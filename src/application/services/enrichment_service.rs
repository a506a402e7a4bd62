//! Enrichment Service - fill a sheet with data from the rules API
//!
//! Enrichment is best-effort: a failed spell or equipment fetch is
//! logged and skipped, never fatal. Whatever was merged successfully
//! is re-derived and persisted.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{info, instrument, warn};

use crate::application::error::SheetError;
use crate::application::ports::outbound::{CharacterRepositoryPort, SrdPort};
use crate::application::services::character_service::derive;
use crate::domain::entities::{Character, Weapon};
use crate::domain::rulebook::Rulebook;

/// Fills empty parts of a sheet from the external rules lookup
pub struct EnrichmentService {
    rulebook: Arc<Rulebook>,
    repository: Arc<dyn CharacterRepositoryPort>,
    srd: Arc<dyn SrdPort>,
}

impl EnrichmentService {
    pub fn new(
        rulebook: Arc<Rulebook>,
        repository: Arc<dyn CharacterRepositoryPort>,
        srd: Arc<dyn SrdPort>,
    ) -> Self {
        Self {
            rulebook,
            repository,
            srd,
        }
    }

    /// Enrich a character with API data: a spell list when the sheet
    /// has slots but no spells, and equipment for every empty slot.
    #[instrument(skip(self))]
    pub async fn enrich(&self, name: &str) -> Result<Character, SheetError> {
        let mut character = self
            .repository
            .get_by_name(name)
            .await?
            .ok_or_else(|| SheetError::not_found(format!("character '{name}' not found")))?;

        self.add_spells(&mut character).await;
        self.merge_equipment(&mut character).await;

        derive(&self.rulebook, &mut character);
        self.repository.save(&character).await?;

        info!(name, "Enriched character with API data");
        Ok(character)
    }

    /// Populate the spell list for casters that have none yet
    async fn add_spells(&self, character: &mut Character) {
        if character.spell_slots.is_empty() || !character.spells.is_empty() {
            return;
        }
        match self
            .srd
            .spells_for_class(character.class, &character.spell_slots)
            .await
        {
            Ok(spells) => character.spells = spells,
            Err(err) => warn!(error = %err, "Failed to fetch spells, skipping"),
        }
    }

    /// Fill empty equipment slots with API records and complete the
    /// data of already-equipped weapons by name
    async fn merge_equipment(&self, character: &mut Character) {
        let catalog = match self.srd.equipment_catalog().await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(error = %err, "Failed to fetch equipment, skipping");
                return;
            }
        };

        let mut rng = rand::thread_rng();
        match &mut character.equipment.main_hand {
            None => character.equipment.main_hand = catalog.weapons.choose(&mut rng).cloned(),
            Some(weapon) => fill_weapon_data(weapon, &catalog.weapons),
        }
        match &mut character.equipment.off_hand {
            None if catalog.weapons.len() > 1 => {
                character.equipment.off_hand = catalog.weapons.choose(&mut rng).cloned();
            }
            Some(weapon) => fill_weapon_data(weapon, &catalog.weapons),
            None => {}
        }

        if character.equipment.armor.is_none() {
            character.equipment.armor = catalog.armor;
        }
        if character.equipment.shield.is_none() {
            character.equipment.shield = catalog.shield;
        }
    }
}

/// Complete an equipped weapon's record from the API copy with the
/// same name, never overwriting data already on the sheet
fn fill_weapon_data(existing: &mut Weapon, all: &[Weapon]) {
    let Some(found) = all
        .iter()
        .find(|w| w.name.eq_ignore_ascii_case(&existing.name))
    else {
        return;
    };
    existing.category = found.category.clone();
    if existing.damage_die.is_empty() && !found.damage_die.is_empty() {
        existing.damage_die = found.damage_die.clone();
    }
    if existing.range.is_empty() && !found.range.is_empty() {
        existing.range = found.range.clone();
    }
    existing.two_handed |= found.two_handed;
    existing.is_finesse |= found.is_finesse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use async_trait::async_trait;

    use crate::application::ports::outbound::EquipmentCatalog;
    use crate::application::services::test_support::MemoryRepository;
    use crate::domain::entities::{Armor, Shield, Spell};
    use crate::domain::value_objects::ClassId;

    struct FakeSrd {
        fail: bool,
    }

    #[async_trait]
    impl SrdPort for FakeSrd {
        async fn spells_for_class(
            &self,
            _class: ClassId,
            slots: &BTreeMap<u8, u8>,
        ) -> Result<Vec<Spell>, SheetError> {
            if self.fail {
                return Err(SheetError::Lookup(anyhow::anyhow!("api down")));
            }
            Ok(slots
                .keys()
                .map(|level| Spell {
                    name: format!("spell-{level}"),
                    level: *level,
                    ..Spell::default()
                })
                .collect())
        }

        async fn equipment_catalog(&self) -> Result<EquipmentCatalog, SheetError> {
            if self.fail {
                return Err(SheetError::Lookup(anyhow::anyhow!("api down")));
            }
            Ok(EquipmentCatalog {
                weapons: vec![
                    Weapon {
                        name: "longsword".into(),
                        category: "martial melee".into(),
                        damage_die: "1d8".into(),
                        ..Weapon::default()
                    },
                    Weapon {
                        name: "dagger".into(),
                        category: "simple melee".into(),
                        damage_die: "1d4".into(),
                        is_finesse: true,
                        ..Weapon::default()
                    },
                ],
                armor: Some(Armor {
                    name: "leather armor".into(),
                    armor_class: 11,
                    dex_bonus: true,
                    max_dex_bonus: 0,
                }),
                shield: Some(Shield {
                    name: "shield".into(),
                    armor_class: 2,
                }),
            })
        }
    }

    fn caster(class: ClassId) -> Character {
        let rules = Rulebook::srd();
        let mut c = Character::new(1, "Caster", "human", class);
        c.abilities.strength = 14;
        c.abilities.dexterity = 12;
        derive(&rules, &mut c);
        c
    }

    fn service(characters: Vec<Character>, fail: bool) -> (EnrichmentService, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::with(characters));
        let service = EnrichmentService::new(
            Arc::new(Rulebook::srd()),
            repository.clone(),
            Arc::new(FakeSrd { fail }),
        );
        (service, repository)
    }

    #[tokio::test]
    async fn enrich_fills_spells_and_equipment() {
        let (service, repository) = service(vec![caster(ClassId::Wizard)], false);

        service.enrich("Caster").await.unwrap();
        let stored = repository.get_by_name("Caster").await.unwrap().unwrap();

        assert!(!stored.spells.is_empty());
        assert!(stored.equipment.main_hand.is_some());
        assert!(stored.equipment.off_hand.is_some());
        assert!(stored.equipment.armor.is_some());
        assert!(stored.equipment.shield.is_some());
        // Derivation ran on the merged gear: 11 + dex 1 + shield 2
        assert_eq!(stored.armor_class, 14);
    }

    #[tokio::test]
    async fn enrich_keeps_existing_spells_and_gear() {
        let mut c = caster(ClassId::Wizard);
        c.spells.push(Spell {
            name: "magic missile".into(),
            level: 1,
            ..Spell::default()
        });
        c.equipment.main_hand = Some(Weapon {
            name: "Longsword".into(),
            ..Weapon::default()
        });
        let (service, repository) = service(vec![c], false);

        service.enrich("Caster").await.unwrap();
        let stored = repository.get_by_name("Caster").await.unwrap().unwrap();

        assert_eq!(stored.spells.len(), 1);
        let main = stored.equipment.main_hand.unwrap();
        // Name kept, missing fields filled from the API record
        assert_eq!(main.name, "Longsword");
        assert_eq!(main.damage_die, "1d8");
        assert_eq!(main.category, "martial melee");
        assert_eq!(main.damage, "1d8 + 2");
    }

    #[tokio::test]
    async fn enrich_survives_a_dead_api() {
        let (service, repository) = service(vec![caster(ClassId::Wizard)], true);

        service.enrich("Caster").await.unwrap();
        let stored = repository.get_by_name("Caster").await.unwrap().unwrap();
        assert!(stored.spells.is_empty());
        assert!(stored.equipment.main_hand.is_none());
    }

    #[tokio::test]
    async fn enrich_unknown_character_is_not_found() {
        let (service, _) = service(vec![], false);
        let err = service.enrich("Nobody").await.unwrap_err();
        assert!(matches!(err, SheetError::NotFound(_)));
    }
}
