//! Class identifier and its casting profile

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Ability;

/// The twelve SRD classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassId {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

/// How a class gains spell slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasterKind {
    None,
    Full,
    Half,
    Pact,
}

impl ClassId {
    pub fn parse(name: &str) -> Option<ClassId> {
        match name.trim().to_lowercase().as_str() {
            "barbarian" => Some(ClassId::Barbarian),
            "bard" => Some(ClassId::Bard),
            "cleric" => Some(ClassId::Cleric),
            "druid" => Some(ClassId::Druid),
            "fighter" => Some(ClassId::Fighter),
            "monk" => Some(ClassId::Monk),
            "paladin" => Some(ClassId::Paladin),
            "ranger" => Some(ClassId::Ranger),
            "rogue" => Some(ClassId::Rogue),
            "sorcerer" => Some(ClassId::Sorcerer),
            "warlock" => Some(ClassId::Warlock),
            "wizard" => Some(ClassId::Wizard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassId::Barbarian => "barbarian",
            ClassId::Bard => "bard",
            ClassId::Cleric => "cleric",
            ClassId::Druid => "druid",
            ClassId::Fighter => "fighter",
            ClassId::Monk => "monk",
            ClassId::Paladin => "paladin",
            ClassId::Ranger => "ranger",
            ClassId::Rogue => "rogue",
            ClassId::Sorcerer => "sorcerer",
            ClassId::Warlock => "warlock",
            ClassId::Wizard => "wizard",
        }
    }

    pub fn caster_kind(&self) -> CasterKind {
        match self {
            ClassId::Bard | ClassId::Cleric | ClassId::Druid | ClassId::Sorcerer
            | ClassId::Wizard => CasterKind::Full,
            ClassId::Paladin | ClassId::Ranger => CasterKind::Half,
            ClassId::Warlock => CasterKind::Pact,
            ClassId::Barbarian | ClassId::Fighter | ClassId::Monk | ClassId::Rogue => {
                CasterKind::None
            }
        }
    }

    pub fn spellcasting_ability(&self) -> Option<Ability> {
        match self {
            ClassId::Bard | ClassId::Paladin | ClassId::Sorcerer | ClassId::Warlock => {
                Some(Ability::Charisma)
            }
            ClassId::Cleric | ClassId::Druid | ClassId::Ranger => Some(Ability::Wisdom),
            ClassId::Wizard => Some(Ability::Intelligence),
            _ => None,
        }
    }

    pub fn can_cast_spells(&self) -> bool {
        self.caster_kind() != CasterKind::None
    }

    /// Prepared casters swap spells from the full class list; known
    /// casters keep a fixed repertoire
    pub fn prepares_spells(&self) -> bool {
        matches!(
            self,
            ClassId::Cleric | ClassId::Druid | ClassId::Paladin | ClassId::Wizard
        )
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_closed() {
        assert_eq!(ClassId::parse("Wizard"), Some(ClassId::Wizard));
        assert_eq!(ClassId::parse(" BARBARIAN "), Some(ClassId::Barbarian));
        assert_eq!(ClassId::parse("artificer"), None);
        assert_eq!(ClassId::parse(""), None);
    }

    #[test]
    fn caster_kinds_cover_all_classes() {
        assert_eq!(ClassId::Wizard.caster_kind(), CasterKind::Full);
        assert_eq!(ClassId::Paladin.caster_kind(), CasterKind::Half);
        assert_eq!(ClassId::Warlock.caster_kind(), CasterKind::Pact);
        assert_eq!(ClassId::Rogue.caster_kind(), CasterKind::None);
        assert!(!ClassId::Fighter.can_cast_spells());
    }

    #[test]
    fn spellcasting_abilities_match_the_class() {
        assert_eq!(
            ClassId::Wizard.spellcasting_ability(),
            Some(Ability::Intelligence)
        );
        assert_eq!(
            ClassId::Cleric.spellcasting_ability(),
            Some(Ability::Wisdom)
        );
        assert_eq!(
            ClassId::Warlock.spellcasting_ability(),
            Some(Ability::Charisma)
        );
        assert_eq!(ClassId::Monk.spellcasting_ability(), None);
    }

    #[test]
    fn prepared_casters_are_the_four_list_casters() {
        for class in [
            ClassId::Cleric,
            ClassId::Druid,
            ClassId::Paladin,
            ClassId::Wizard,
        ] {
            assert!(class.prepares_spells(), "{class}");
        }
        assert!(!ClassId::Bard.prepares_spells());
        assert!(!ClassId::Warlock.prepares_spells());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ClassId::Wizard).unwrap();
        assert_eq!(json, "\"wizard\"");
        let back: ClassId = serde_json::from_str("\"paladin\"").unwrap();
        assert_eq!(back, ClassId::Paladin);
    }
}
