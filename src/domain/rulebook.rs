//! Rule tables driving character derivation
//!
//! The rulebook is immutable configuration data: built once at
//! startup (or replaced with custom tables in tests) and injected
//! into the services that need it, never consulted as global state.

use std::collections::HashMap;

use crate::domain::value_objects::{skill, Ability, ClassId};

/// The fixed ability-score array used when no scores are supplied,
/// assigned in the canonical ability order
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

/// Spell-slot counts per spell level (index 0 = slot level 1) for
/// full casters, one row per character level 1-20
pub const FULL_CASTER_SLOTS: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
];

/// Immutable rule tables for character building and derivation
#[derive(Debug, Clone)]
pub struct Rulebook {
    race_modifiers: HashMap<String, Vec<(Ability, i32)>>,
    class_skills: HashMap<ClassId, Vec<&'static str>>,
    skill_abilities: HashMap<&'static str, Ability>,
}

impl Rulebook {
    /// The SRD tables used in production
    pub fn srd() -> Self {
        use Ability::*;

        let mut race_modifiers = HashMap::new();
        let races: [(&str, &[(Ability, i32)]); 11] = [
            (
                "human",
                &[
                    (Strength, 1),
                    (Dexterity, 1),
                    (Constitution, 1),
                    (Intelligence, 1),
                    (Wisdom, 1),
                    (Charisma, 1),
                ],
            ),
            ("elf", &[(Dexterity, 2)]),
            ("dwarf", &[(Constitution, 2)]),
            ("lightfoot halfling", &[(Dexterity, 2), (Charisma, 1)]),
            ("dragonborn", &[(Strength, 2), (Charisma, 1)]),
            ("gnome", &[(Intelligence, 2)]),
            ("half-elf", &[(Charisma, 2)]),
            ("half-orc", &[(Strength, 2), (Constitution, 1)]),
            ("half orc", &[(Strength, 2), (Constitution, 1)]),
            ("tiefling", &[(Intelligence, 1), (Charisma, 2)]),
            ("hill dwarf", &[(Constitution, 2), (Wisdom, 1)]),
        ];
        for (race, mods) in races {
            race_modifiers.insert(race.to_string(), mods.to_vec());
        }

        let mut class_skills = HashMap::new();
        let skills_by_class: [(ClassId, &[&'static str]); 12] = [
            (
                ClassId::Barbarian,
                &[
                    skill::ANIMAL_HANDLING,
                    skill::ATHLETICS,
                    skill::INSIGHT,
                    skill::RELIGION,
                ],
            ),
            (
                ClassId::Bard,
                &[
                    skill::DECEPTION,
                    skill::HISTORY,
                    skill::INVESTIGATION,
                    skill::PERSUASION,
                    skill::SLEIGHT_OF_HAND,
                ],
            ),
            (
                ClassId::Cleric,
                &[skill::HISTORY, skill::INSIGHT, skill::RELIGION],
            ),
            (
                ClassId::Druid,
                &[
                    skill::ARCANA,
                    skill::ANIMAL_HANDLING,
                    skill::INSIGHT,
                    skill::MEDICINE,
                ],
            ),
            (
                ClassId::Fighter,
                &[
                    skill::ACROBATICS,
                    skill::ANIMAL_HANDLING,
                    skill::INSIGHT,
                    skill::RELIGION,
                ],
            ),
            (
                ClassId::Monk,
                &[
                    skill::ACROBATICS,
                    skill::ATHLETICS,
                    skill::INSIGHT,
                    skill::RELIGION,
                ],
            ),
            (
                ClassId::Paladin,
                &[skill::ATHLETICS, skill::INSIGHT, skill::RELIGION],
            ),
            (
                ClassId::Ranger,
                &[
                    skill::ANIMAL_HANDLING,
                    skill::ATHLETICS,
                    skill::INSIGHT,
                    skill::INVESTIGATION,
                ],
            ),
            (
                ClassId::Rogue,
                &[
                    skill::ACROBATICS,
                    skill::ATHLETICS,
                    skill::DECEPTION,
                    skill::INSIGHT,
                    skill::RELIGION,
                ],
            ),
            (
                ClassId::Sorcerer,
                &[
                    skill::ARCANA,
                    skill::DECEPTION,
                    skill::INSIGHT,
                    skill::INTIMIDATION,
                    skill::PERSUASION,
                    skill::RELIGION,
                ],
            ),
            (
                ClassId::Warlock,
                &[
                    skill::ARCANA,
                    skill::DECEPTION,
                    skill::INSIGHT,
                    skill::RELIGION,
                ],
            ),
            (
                ClassId::Wizard,
                &[
                    skill::ARCANA,
                    skill::HISTORY,
                    skill::INSIGHT,
                    skill::RELIGION,
                ],
            ),
        ];
        for (class, skills) in skills_by_class {
            class_skills.insert(class, skills.to_vec());
        }

        let mut skill_abilities = HashMap::new();
        let governing: [(&'static str, Ability); 18] = [
            (skill::ACROBATICS, Dexterity),
            (skill::ANIMAL_HANDLING, Wisdom),
            (skill::ARCANA, Intelligence),
            (skill::ATHLETICS, Strength),
            (skill::DECEPTION, Charisma),
            (skill::HISTORY, Intelligence),
            (skill::INSIGHT, Wisdom),
            (skill::INTIMIDATION, Charisma),
            (skill::INVESTIGATION, Intelligence),
            (skill::MEDICINE, Wisdom),
            (skill::NATURE, Intelligence),
            (skill::PERCEPTION, Wisdom),
            (skill::PERFORMANCE, Charisma),
            (skill::PERSUASION, Charisma),
            (skill::RELIGION, Intelligence),
            (skill::SLEIGHT_OF_HAND, Dexterity),
            (skill::STEALTH, Dexterity),
            (skill::SURVIVAL, Wisdom),
        ];
        for (name, ability) in governing {
            skill_abilities.insert(name, ability);
        }

        Self {
            race_modifiers,
            class_skills,
            skill_abilities,
        }
    }

    /// Flat racial bonus for one ability; 0 for unknown races
    pub fn race_modifier(&self, race: &str, ability: Ability) -> i32 {
        self.race_modifiers
            .get(race)
            .and_then(|mods| mods.iter().find(|(a, _)| *a == ability))
            .map(|(_, bonus)| *bonus)
            .unwrap_or(0)
    }

    /// Skills a class may choose proficiencies from, deduplicated in
    /// source order
    pub fn class_skills(&self, class: ClassId) -> Vec<&'static str> {
        let mut seen = Vec::new();
        if let Some(skills) = self.class_skills.get(&class) {
            for &s in skills {
                if !seen.contains(&s) {
                    seen.push(s);
                }
            }
        }
        seen
    }

    /// The ability governing a skill
    pub fn skill_ability(&self, skill_name: &str) -> Option<Ability> {
        self.skill_abilities.get(skill_name).copied()
    }

    /// Full-caster slot row for a character level, if within 1-20
    pub fn full_caster_row(&self, level: i32) -> Option<&'static [u8; 9]> {
        if (1..=20).contains(&level) {
            Some(&FULL_CASTER_SLOTS[(level - 1) as usize])
        } else {
            None
        }
    }
}
