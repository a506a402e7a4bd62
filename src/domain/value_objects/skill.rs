//! The 18 skill names, as they appear on the sheet

pub const ACROBATICS: &str = "Acrobatics";
pub const ANIMAL_HANDLING: &str = "Animal Handling";
pub const ARCANA: &str = "Arcana";
pub const ATHLETICS: &str = "Athletics";
pub const DECEPTION: &str = "Deception";
pub const HISTORY: &str = "History";
pub const INSIGHT: &str = "Insight";
pub const INTIMIDATION: &str = "Intimidation";
pub const INVESTIGATION: &str = "Investigation";
pub const MEDICINE: &str = "Medicine";
pub const NATURE: &str = "Nature";
pub const PERCEPTION: &str = "Perception";
pub const PERFORMANCE: &str = "Performance";
pub const PERSUASION: &str = "Persuasion";
pub const RELIGION: &str = "Religion";
pub const SLEIGHT_OF_HAND: &str = "Sleight of Hand";
pub const STEALTH: &str = "Stealth";
pub const SURVIVAL: &str = "Survival";

pub const ALL_SKILLS: [&str; 18] = [
    ACROBATICS,
    ANIMAL_HANDLING,
    ARCANA,
    ATHLETICS,
    DECEPTION,
    HISTORY,
    INSIGHT,
    INTIMIDATION,
    INVESTIGATION,
    MEDICINE,
    NATURE,
    PERCEPTION,
    PERFORMANCE,
    PERSUASION,
    RELIGION,
    SLEIGHT_OF_HAND,
    STEALTH,
    SURVIVAL,
];
