//! Local reference catalog of equipment and spells
//!
//! The catalog backs name lookups for the equip and spell commands
//! without a network round trip. A built-in SRD subset ships with the
//! binary; a JSON file with the same shape can replace it wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Armor, Shield, Spell, Weapon};
use crate::domain::value_objects::ClassId;

/// A catalog spell with the classes allowed to cast it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellEntry {
    pub name: String,
    pub level: u8,
    pub classes: Vec<ClassId>,
}

/// Reference tables for equipment and spell lookups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    pub armors: BTreeMap<String, Armor>,
    pub shields: BTreeMap<String, Shield>,
    pub weapons: BTreeMap<String, Weapon>,
    pub spells: Vec<SpellEntry>,
}

/// Canonical key for equipment lookups: lower-cased, trimmed, with a
/// trailing " armor" stripped ("Leather Armor" and "leather" match)
pub fn normalize_name(name: &str) -> String {
    let name = name.trim().to_lowercase();
    name.trim_end_matches(" armor").trim().to_string()
}

impl ReferenceCatalog {
    /// Parse a catalog from its JSON representation
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    pub fn find_armor(&self, name: &str) -> Option<Armor> {
        let key = normalize_name(name);
        let stats = self.armors.get(&key)?;
        // Light armors and plate read better with the suffix on the sheet
        let display = match key.as_str() {
            "padded" | "leather" | "studded leather" | "plate" => format!("{key} armor"),
            _ => key.clone(),
        };
        Some(Armor {
            name: display,
            ..stats.clone()
        })
    }

    pub fn find_shield(&self, name: &str) -> Option<Shield> {
        let key = normalize_name(name);
        self.shields.get(&key).map(|s| Shield {
            name: key.clone(),
            ..s.clone()
        })
    }

    pub fn find_weapon(&self, name: &str) -> Option<Weapon> {
        let key = normalize_name(name);
        self.weapons.get(&key).cloned()
    }

    pub fn find_spell(&self, name: &str) -> Option<&SpellEntry> {
        let key = name.trim().to_lowercase();
        self.spells.iter().find(|s| s.name == key)
    }

    /// All catalog spells castable by a class
    pub fn spells_for_class(&self, class: ClassId) -> Vec<Spell> {
        self.spells
            .iter()
            .filter(|s| s.classes.contains(&class))
            .map(|s| Spell {
                name: s.name.clone(),
                level: s.level,
                ..Spell::default()
            })
            .collect()
    }

    /// The SRD subset compiled into the binary
    pub fn builtin() -> Self {
        let mut catalog = ReferenceCatalog::default();

        let armors: [(&str, i32, bool, i32); 12] = [
            // Light
            ("padded", 11, true, 0),
            ("leather", 11, true, 0),
            ("studded leather", 12, true, 0),
            // Medium
            ("hide", 12, true, 2),
            ("chain shirt", 13, true, 2),
            ("scale mail", 14, true, 2),
            ("breastplate", 14, true, 2),
            ("half plate", 15, true, 2),
            // Heavy
            ("ring mail", 14, false, 0),
            ("chain mail", 16, false, 0),
            ("splint", 17, false, 0),
            ("plate", 18, false, 0),
        ];
        for (name, ac, dex_bonus, max_dex) in armors {
            catalog.armors.insert(
                name.to_string(),
                Armor {
                    name: name.to_string(),
                    armor_class: ac,
                    dex_bonus,
                    max_dex_bonus: max_dex,
                },
            );
        }

        catalog.shields.insert(
            "shield".to_string(),
            Shield {
                name: "shield".to_string(),
                armor_class: 2,
            },
        );

        let weapons: [(&str, &str, &str, bool, bool, &str); 15] = [
            // name, damage die, category, finesse, two-handed, range
            ("club", "1d4", "simple melee", false, false, ""),
            ("dagger", "1d4", "simple melee", true, false, "20/60"),
            ("greatclub", "1d8", "simple melee", false, true, ""),
            ("handaxe", "1d6", "simple melee", false, false, "20/60"),
            ("javelin", "1d6", "simple melee", false, false, "30/120"),
            ("mace", "1d6", "simple melee", false, false, ""),
            ("quarterstaff", "1d6", "simple melee", false, false, ""),
            ("spear", "1d6", "simple melee", false, false, "20/60"),
            ("shortbow", "1d6", "simple ranged", false, true, "80/320"),
            ("greataxe", "1d12", "martial melee", false, true, ""),
            ("greatsword", "2d6", "martial melee", false, true, ""),
            ("longsword", "1d8", "martial melee", false, false, ""),
            ("rapier", "1d8", "martial melee", true, false, ""),
            ("shortsword", "1d6", "martial melee", true, false, ""),
            ("longbow", "1d8", "martial ranged", false, true, "150/600"),
        ];
        for (name, die, category, finesse, two_handed, range) in weapons {
            catalog.weapons.insert(
                name.to_string(),
                Weapon {
                    name: name.to_string(),
                    category: category.to_string(),
                    range: range.to_string(),
                    two_handed,
                    damage_die: die.to_string(),
                    is_finesse: finesse,
                    damage: String::new(),
                },
            );
        }

        use ClassId::*;
        let spells: [(&str, u8, &[ClassId]); 24] = [
            ("fire bolt", 0, &[Sorcerer, Wizard]),
            ("ray of frost", 0, &[Sorcerer, Wizard]),
            ("mage hand", 0, &[Bard, Sorcerer, Warlock, Wizard]),
            ("prestidigitation", 0, &[Bard, Sorcerer, Warlock, Wizard]),
            ("vicious mockery", 0, &[Bard]),
            ("sacred flame", 0, &[Cleric]),
            ("thaumaturgy", 0, &[Cleric]),
            ("guidance", 0, &[Cleric, Druid]),
            ("druidcraft", 0, &[Druid]),
            ("produce flame", 0, &[Druid]),
            ("eldritch blast", 0, &[Warlock]),
            ("magic missile", 1, &[Sorcerer, Wizard]),
            ("shield", 1, &[Sorcerer, Wizard]),
            ("sleep", 1, &[Bard, Sorcerer, Wizard]),
            ("cure wounds", 1, &[Bard, Cleric, Druid, Paladin, Ranger]),
            ("healing word", 1, &[Bard, Cleric, Druid]),
            ("bless", 1, &[Cleric, Paladin]),
            ("command", 1, &[Cleric, Paladin]),
            ("entangle", 1, &[Druid]),
            ("hunter's mark", 1, &[Ranger]),
            ("hex", 1, &[Warlock]),
            ("misty step", 2, &[Sorcerer, Warlock, Wizard]),
            ("spiritual weapon", 2, &[Cleric]),
            ("fireball", 3, &[Sorcerer, Wizard]),
        ];
        for (name, level, classes) in spells {
            catalog.spells.push(SpellEntry {
                name: name.to_string(),
                level,
                classes: classes.to_vec(),
            });
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_whitespace_and_armor_suffix() {
        assert_eq!(normalize_name("  Leather Armor "), "leather");
        assert_eq!(normalize_name("Studded Leather"), "studded leather");
        assert_eq!(normalize_name("PLATE"), "plate");
        assert_eq!(normalize_name("shield"), "shield");
    }

    #[test]
    fn light_armor_display_names_carry_the_suffix() {
        let catalog = ReferenceCatalog::builtin();
        let leather = catalog.find_armor("Leather Armor").unwrap();
        assert_eq!(leather.name, "leather armor");
        assert_eq!(leather.armor_class, 11);
        assert!(leather.dex_bonus);
        assert_eq!(leather.max_dex_bonus, 0);

        let chain = catalog.find_armor("chain mail").unwrap();
        assert_eq!(chain.name, "chain mail");
        assert!(!chain.dex_bonus);
    }

    #[test]
    fn medium_armor_caps_dex_at_two() {
        let catalog = ReferenceCatalog::builtin();
        let scale = catalog.find_armor("scale mail").unwrap();
        assert_eq!(scale.armor_class, 14);
        assert_eq!(scale.max_dex_bonus, 2);
    }

    #[test]
    fn finesse_weapons_are_flagged() {
        let catalog = ReferenceCatalog::builtin();
        assert!(catalog.find_weapon("Rapier").unwrap().is_finesse);
        assert!(!catalog.find_weapon("greataxe").unwrap().is_finesse);
        assert!(catalog.find_weapon("halberd").is_none());
    }

    #[test]
    fn spell_lookup_filters_by_class() {
        let catalog = ReferenceCatalog::builtin();
        let fireball = catalog.find_spell("Fireball").unwrap();
        assert!(fireball.classes.contains(&ClassId::Wizard));
        assert!(!fireball.classes.contains(&ClassId::Cleric));

        let cleric_cantrips: Vec<Spell> = catalog
            .spells_for_class(ClassId::Cleric)
            .into_iter()
            .filter(|s| s.level == 0)
            .collect();
        assert!(!cleric_cantrips.is_empty());
    }

    #[test]
    fn json_override_round_trips() {
        let catalog = ReferenceCatalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let restored = ReferenceCatalog::from_json(&json).unwrap();
        assert_eq!(restored.armors.len(), catalog.armors.len());
        assert_eq!(restored.spells.len(), catalog.spells.len());
    }
}
