use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// An item owned by an actor. Abilities are items too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity; used as the transformer source ID for item effects.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Kind-specific data.
    pub kind: ItemKind,
}

impl Item {
    /// Create an item with a random ID.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind,
        }
    }

    /// Create an ability item.
    pub fn ability(name: impl Into<String>, rating: i32) -> Self {
        Self::new(
            name,
            ItemKind::Ability(AbilityData {
                rating,
                ..AbilityData::default()
            }),
        )
    }

    /// Returns the ability data if this item is an ability.
    pub fn as_ability(&self) -> Option<&AbilityData> {
        match &self.kind {
            ItemKind::Ability(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the weapon data if this item is a weapon.
    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    /// Returns the armor data if this item is armor.
    pub fn as_armor(&self) -> Option<&ArmorData> {
        match &self.kind {
            ItemKind::Armor(a) => Some(a),
            _ => None,
        }
    }

    /// Whether the item is currently equipped. Abilities are never equipped.
    pub fn is_equipped(&self) -> bool {
        match &self.kind {
            ItemKind::Ability(_) => false,
            ItemKind::Weapon(w) => w.equipped,
            ItemKind::Armor(a) => a.equipped,
            ItemKind::Equipment(e) => e.equipped,
        }
    }

    /// Set the equipped flag. Returns false for items that cannot be equipped.
    pub fn set_equipped(&mut self, equipped: bool) -> bool {
        match &mut self.kind {
            ItemKind::Ability(_) => false,
            ItemKind::Weapon(w) => {
                w.equipped = equipped;
                true
            }
            ItemKind::Armor(a) => {
                a.equipped = equipped;
                true
            }
            ItemKind::Equipment(e) => {
                e.equipped = equipped;
                true
            }
        }
    }
}

/// The closed set of item kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    /// A rated ability, optionally with specialties.
    Ability(AbilityData),
    /// A weapon used for weapon tests.
    Weapon(WeaponData),
    /// Worn armor.
    Armor(ArmorData),
    /// Anything else an actor carries.
    Equipment(EquipmentData),
}

impl ItemKind {
    /// Short lowercase name of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ability(_) => "ability",
            Self::Weapon(_) => "weapon",
            Self::Armor(_) => "armor",
            Self::Equipment(_) => "equipment",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rating, flat modifier, and specialties of an ability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityData {
    /// Number of test dice.
    pub rating: i32,
    /// Flat modifier added to the test result.
    pub modifier: i32,
    /// Sub-skills of this ability.
    pub specialties: Vec<Specialty>,
}

impl AbilityData {
    /// Find a specialty by name (case-insensitive).
    pub fn specialty(&self, name: &str) -> Option<&Specialty> {
        self.specialties
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// A specialty within an ability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Specialty {
    /// Display name, e.g. "Run" under Athletics.
    pub name: String,
    /// Bonus dice granted on matching tests.
    pub rating: i32,
    /// Flat modifier added on matching tests.
    pub modifier: i32,
}

impl Specialty {
    /// Create a specialty.
    pub fn new(name: impl Into<String>, rating: i32, modifier: i32) -> Self {
        Self {
            name: name.into(),
            rating,
            modifier,
        }
    }
}

/// Weapon data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeaponData {
    /// Ability tested when attacking (e.g. "Fighting", "Marksmanship").
    pub ability: String,
    /// Specialty used for the test (e.g. "Long Blades").
    pub specialty: Option<String>,
    /// Training requirement; bonus dice up to this count are absorbed.
    pub training: Option<i32>,
    /// Damage expression, e.g. `"@Athletics+1"`.
    pub damage: String,
    /// Fixed adjustment to the test pool.
    pub custom_pool_modifier: i32,
    /// Fixed adjustment to the bonus dice.
    pub custom_bonus_dice_modifier: i32,
    /// Fixed adjustment to the test result.
    pub custom_test_modifier: i32,
    /// Combat defense granted while equipped (shields, parrying weapons).
    pub defensive_bonus: i32,
    /// Whether the weapon is in hand.
    pub equipped: bool,
}

impl Default for WeaponData {
    fn default() -> Self {
        Self {
            ability: "Fighting".to_string(),
            specialty: None,
            training: None,
            damage: String::new(),
            custom_pool_modifier: 0,
            custom_bonus_dice_modifier: 0,
            custom_test_modifier: 0,
            defensive_bonus: 0,
            equipped: false,
        }
    }
}

/// Armor data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorData {
    /// Armor rating: damage reduction.
    pub rating: i32,
    /// Armor penalty applied to Agility and combat defense.
    pub penalty: i32,
    /// Bulk subtracted from movement.
    pub bulk: i32,
    /// Whether the armor is worn.
    pub equipped: bool,
}

/// Plain equipment with no rules effect of its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentData {
    /// Free-text notes.
    pub notes: String,
    /// Whether the equipment is carried in hand.
    pub equipped: bool,
}
