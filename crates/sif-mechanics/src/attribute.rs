//! Validated attribute keys.
//!
//! Transformer buckets are keyed by lowercase names. At the API boundary
//! those names are parsed into an [`AttributeKey`]: an ability, a derived
//! stat, or the global sentinel `all`. The persisted form stays a plain
//! string (see [`AttributeKey::as_str`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// The abilities of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ability {
    /// Agility.
    Agility,
    /// Animal Handling.
    AnimalHandling,
    /// Athletics.
    Athletics,
    /// Awareness.
    Awareness,
    /// Cunning.
    Cunning,
    /// Deception.
    Deception,
    /// Endurance.
    Endurance,
    /// Fighting.
    Fighting,
    /// Healing.
    Healing,
    /// Knowledge.
    Knowledge,
    /// Language.
    Language,
    /// Marksmanship.
    Marksmanship,
    /// Persuasion.
    Persuasion,
    /// Status.
    Status,
    /// Stealth.
    Stealth,
    /// Survival.
    Survival,
    /// Thievery.
    Thievery,
    /// Warfare.
    Warfare,
    /// Will.
    Will,
}

impl Ability {
    /// Every ability, in alphabetical order.
    pub const ALL: [Ability; 19] = [
        Self::Agility,
        Self::AnimalHandling,
        Self::Athletics,
        Self::Awareness,
        Self::Cunning,
        Self::Deception,
        Self::Endurance,
        Self::Fighting,
        Self::Healing,
        Self::Knowledge,
        Self::Language,
        Self::Marksmanship,
        Self::Persuasion,
        Self::Status,
        Self::Stealth,
        Self::Survival,
        Self::Thievery,
        Self::Warfare,
        Self::Will,
    ];

    /// Display name, as it appears on owned ability items.
    pub fn name(self) -> &'static str {
        match self {
            Self::Agility => "Agility",
            Self::AnimalHandling => "Animal Handling",
            Self::Athletics => "Athletics",
            Self::Awareness => "Awareness",
            Self::Cunning => "Cunning",
            Self::Deception => "Deception",
            Self::Endurance => "Endurance",
            Self::Fighting => "Fighting",
            Self::Healing => "Healing",
            Self::Knowledge => "Knowledge",
            Self::Language => "Language",
            Self::Marksmanship => "Marksmanship",
            Self::Persuasion => "Persuasion",
            Self::Status => "Status",
            Self::Stealth => "Stealth",
            Self::Survival => "Survival",
            Self::Thievery => "Thievery",
            Self::Warfare => "Warfare",
            Self::Will => "Will",
        }
    }

    /// The lowercase bucket key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Agility => "agility",
            Self::AnimalHandling => "animal handling",
            Self::Athletics => "athletics",
            Self::Awareness => "awareness",
            Self::Cunning => "cunning",
            Self::Deception => "deception",
            Self::Endurance => "endurance",
            Self::Fighting => "fighting",
            Self::Healing => "healing",
            Self::Knowledge => "knowledge",
            Self::Language => "language",
            Self::Marksmanship => "marksmanship",
            Self::Persuasion => "persuasion",
            Self::Status => "status",
            Self::Stealth => "stealth",
            Self::Survival => "survival",
            Self::Thievery => "thievery",
            Self::Warfare => "warfare",
            Self::Will => "will",
        }
    }

    /// Look up an ability by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.key() == lower)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values derived from abilities and transformers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedStat {
    /// Difficulty to hit in combat.
    CombatDefense,
    /// Discrete combat defense against Fighting tests.
    FightingDefense,
    /// Discrete combat defense against Marksmanship tests.
    MarksmanshipDefense,
    /// Difficulty to influence in intrigue.
    IntrigueDefense,
    /// Damage a character can take.
    Health,
    /// Influence a character can take.
    Composure,
    /// Damage reduction.
    ArmorRating,
    /// Yards moved per move action.
    Movement,
    /// Damage dealt by weapon attacks.
    Damage,
    /// Unit discipline (warfare).
    Discipline,
}

impl DerivedStat {
    /// Every derived stat.
    pub const ALL: [DerivedStat; 10] = [
        Self::CombatDefense,
        Self::FightingDefense,
        Self::MarksmanshipDefense,
        Self::IntrigueDefense,
        Self::Health,
        Self::Composure,
        Self::ArmorRating,
        Self::Movement,
        Self::Damage,
        Self::Discipline,
    ];

    /// The lowercase bucket key.
    pub fn key(self) -> &'static str {
        match self {
            Self::CombatDefense => "combat_defense",
            Self::FightingDefense => "fighting_defense",
            Self::MarksmanshipDefense => "marksmanship_defense",
            Self::IntrigueDefense => "intrigue_defense",
            Self::Health => "health",
            Self::Composure => "composure",
            Self::ArmorRating => "armor_rating",
            Self::Movement => "movement",
            Self::Damage => "damage",
            Self::Discipline => "discipline",
        }
    }
}

/// A validated transformer bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributeKey {
    /// The sentinel bucket that applies to every attribute of a type.
    All,
    /// An ability.
    Ability(Ability),
    /// A derived stat.
    Derived(DerivedStat),
}

impl AttributeKey {
    /// The persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Ability(a) => a.key(),
            Self::Derived(d) => d.key(),
        }
    }

    /// Whether this is the `all` sentinel.
    pub fn is_global(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Ability> for AttributeKey {
    fn from(ability: Ability) -> Self {
        Self::Ability(ability)
    }
}

impl From<DerivedStat> for AttributeKey {
    fn from(stat: DerivedStat) -> Self {
        Self::Derived(stat)
    }
}

impl FromStr for AttributeKey {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "all" {
            return Ok(Self::All);
        }
        if let Some(ability) = Ability::from_name(&lower) {
            return Ok(Self::Ability(ability));
        }
        DerivedStat::ALL
            .into_iter()
            .find(|d| d.key() == lower)
            .map(Self::Derived)
            .ok_or_else(|| MechError::UnknownAttribute(s.to_string()))
    }
}

impl TryFrom<String> for AttributeKey {
    type Error = MechError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeKey> for String {
    fn from(key: AttributeKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
