//! Equipment Service - armor class and weapon damage rules, plus the
//! equip/unequip use cases
//!
//! The rule functions are pure and synchronous; the use cases follow
//! a load-mutate-derive-save cycle against the repository.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error::SheetError;
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::application::services::character_service::derive;
use crate::domain::catalog::{normalize_name, ReferenceCatalog};
use crate::domain::entities::{Character, Weapon};
use crate::domain::rulebook::Rulebook;
use crate::domain::value_objects::{Ability, ClassId};

/// Armor class from worn equipment, or the class-dependent unarmored
/// formula when nothing is worn. A shield stacks with either branch.
pub fn armor_class(c: &Character) -> i32 {
    let dex_mod = c.abilities.modifier(Ability::Dexterity);

    let mut ac = match &c.equipment.armor {
        Some(armor) => {
            let mut ac = armor.armor_class;
            if armor.dex_bonus {
                let mut bonus = dex_mod;
                if armor.max_dex_bonus > 0 && bonus > armor.max_dex_bonus {
                    bonus = armor.max_dex_bonus;
                }
                ac += bonus;
            }
            ac
        }
        // Unarmored defense only applies when no armor is worn
        None => match c.class {
            ClassId::Barbarian => 10 + dex_mod + c.abilities.modifier(Ability::Constitution),
            ClassId::Monk => 10 + dex_mod + c.abilities.modifier(Ability::Wisdom),
            _ => 10 + dex_mod,
        },
    };

    if let Some(shield) = &c.equipment.shield {
        ac += shield.armor_class;
    }

    ac
}

/// Damage display string for a weapon: the normalized damage die plus
/// the governing ability modifier. Finesse weapons use the better of
/// Strength and Dexterity; everything else uses Strength.
pub fn weapon_damage(c: &Character, weapon: &Weapon) -> String {
    let modifier = if weapon.is_finesse {
        c.strength_mod.max(c.dexterity_mod)
    } else {
        c.strength_mod
    };

    let die = normalize_damage_die(&weapon.damage_die);
    if modifier < 0 {
        format!("{} - {}", die, -modifier)
    } else {
        format!("{} + {}", die, modifier)
    }
}

/// Normalize a damage die string: empty or unparseable input falls
/// back to "1d4", dice notation passes through, and a bare count N
/// becomes "NdN"
pub fn normalize_damage_die(die: &str) -> String {
    if die.is_empty() {
        return "1d4".to_string();
    }
    if die.contains('d') {
        return die.to_string();
    }
    match die.parse::<u32>() {
        Ok(n) if n > 0 => format!("{n}d{n}"),
        _ => "1d4".to_string(),
    }
}

/// Weapon slot on the character sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponSlot {
    MainHand,
    OffHand,
}

impl WeaponSlot {
    pub fn parse(slot: &str) -> Result<Option<WeaponSlot>, SheetError> {
        match slot.trim() {
            "" => Ok(None),
            "main hand" => Ok(Some(WeaponSlot::MainHand)),
            "off hand" => Ok(Some(WeaponSlot::OffHand)),
            other => Err(SheetError::validation(format!(
                "invalid slot '{other}': must be 'main hand' or 'off hand'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponSlot::MainHand => "main hand",
            WeaponSlot::OffHand => "off hand",
        }
    }
}

/// Use cases for equipping and removing gear
pub struct EquipmentService {
    rulebook: Arc<Rulebook>,
    catalog: Arc<ReferenceCatalog>,
    repository: Arc<dyn CharacterRepositoryPort>,
}

impl EquipmentService {
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

    async fn load(&self, name: &str) -> Result<Character, SheetError> {
        self.repository
            .get_by_name(name)
            .await?
            .ok_or_else(|| SheetError::not_found(format!("character '{name}' not found")))
    }

    async fn store(&self, mut character: Character) -> Result<Character, SheetError> {
        derive(&self.rulebook, &mut character);
        self.repository.save(&character).await?;
        Ok(character)
    }

    /// Equip a weapon by catalog name. With no slot given, the weapon
    /// goes to the main hand, then the off hand; an occupied explicit
    /// slot is a conflict.
    #[instrument(skip(self))]
    pub async fn equip_weapon(
        &self,
        character_name: &str,
        weapon_name: &str,
        slot: Option<WeaponSlot>,
    ) -> Result<WeaponSlot, SheetError> {
        let mut character = self.load(character_name).await?;

        let mut weapon = self.catalog.find_weapon(weapon_name).ok_or_else(|| {
            SheetError::not_found(format!("weapon '{weapon_name}' not found"))
        })?;
        weapon.damage = weapon_damage(&character, &weapon);

        let chosen = match slot {
            None => {
                if character.equipment.main_hand.is_none() {
                    WeaponSlot::MainHand
                } else if character.equipment.off_hand.is_none() {
                    WeaponSlot::OffHand
                } else {
                    return Err(SheetError::conflict("both hands already occupied"));
                }
            }
            Some(WeaponSlot::MainHand) => {
                if character.equipment.main_hand.is_some() {
                    return Err(SheetError::conflict("main hand already occupied"));
                }
                WeaponSlot::MainHand
            }
            Some(WeaponSlot::OffHand) => {
                if character.equipment.off_hand.is_some() {
                    return Err(SheetError::conflict("off hand already occupied"));
                }
                WeaponSlot::OffHand
            }
        };

        match chosen {
            WeaponSlot::MainHand => character.equipment.main_hand = Some(weapon),
            WeaponSlot::OffHand => character.equipment.off_hand = Some(weapon),
        }

        self.store(character).await?;
        info!(character = character_name, weapon = weapon_name, slot = chosen.as_str(), "Equipped weapon");
        Ok(chosen)
    }

    /// Remove a weapon from whichever hand holds it, matching by
    /// normalized name
    #[instrument(skip(self))]
    pub async fn unequip_weapon(
        &self,
        character_name: &str,
        weapon_name: &str,
    ) -> Result<(), SheetError> {
        let mut character = self.load(character_name).await?;

        let key = normalize_name(weapon_name);
        let mut removed = false;
        if let Some(main) = &character.equipment.main_hand {
            if normalize_name(&main.name) == key {
                character.equipment.main_hand = None;
                removed = true;
            }
        }
        if let Some(off) = &character.equipment.off_hand {
            if normalize_name(&off.name) == key {
                character.equipment.off_hand = None;
                removed = true;
            }
        }
        if !removed {
            return Err(SheetError::not_found(format!(
                "weapon '{weapon_name}' not found on character '{character_name}'"
            )));
        }

        self.store(character).await?;
        info!(character = character_name, weapon = weapon_name, "Removed weapon");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn equip_armor(
        &self,
        character_name: &str,
        armor_name: &str,
    ) -> Result<(), SheetError> {
        let mut character = self.load(character_name).await?;

        if character.equipment.armor.is_some() {
            return Err(SheetError::conflict("armor already equipped"));
        }
        let armor = self.catalog.find_armor(armor_name).ok_or_else(|| {
            SheetError::not_found(format!("armor '{armor_name}' not found"))
        })?;
        let display_name = armor.name.clone();
        character.equipment.armor = Some(armor);

        self.store(character).await?;
        info!(character = character_name, armor = %display_name, "Equipped armor");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn unequip_armor(&self, character_name: &str) -> Result<(), SheetError> {
        let mut character = self.load(character_name).await?;
        character.equipment.armor = None;
        self.store(character).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn equip_shield(
        &self,
        character_name: &str,
        shield_name: &str,
    ) -> Result<(), SheetError> {
        let mut character = self.load(character_name).await?;

        if character.equipment.shield.is_some() {
            return Err(SheetError::conflict("shield already equipped"));
        }
        let shield = self.catalog.find_shield(shield_name).ok_or_else(|| {
            SheetError::not_found(format!("shield '{shield_name}' not found"))
        })?;
        character.equipment.shield = Some(shield);

        self.store(character).await?;
        info!(character = character_name, shield = shield_name, "Equipped shield");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn unequip_shield(&self, character_name: &str) -> Result<(), SheetError> {
        let mut character = self.load(character_name).await?;
        character.equipment.shield = None;
        self.store(character).await?;
        Ok(())
    }
}
