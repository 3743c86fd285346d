//! Building a [`DiceFormula`] from an actor's abilities and transformers.

use serde::{Deserialize, Serialize};
use sif_core::{Actor, EntityId};
use tracing::debug;

use crate::attribute::{Ability, AttributeKey};
use crate::error::MechResult;
use crate::formula::{DiceFormula, adjust_formula_by_weapon};
use crate::transformer::{AggregateOptions, TransformerStore, TransformerType};

/// Rating of an ability the actor does not own.
pub const UNTRAINED_RATING: i32 = 2;

/// What a roll tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RollKind {
    /// A plain ability test.
    Ability {
        /// Ability name.
        ability: String,
    },
    /// An ability test with a specialty's bonus dice.
    Specialty {
        /// Ability name.
        ability: String,
        /// Specialty name.
        specialty: String,
    },
    /// An attack with an owned weapon.
    WeaponTest {
        /// The weapon item.
        weapon: EntityId,
    },
    /// A Persuasion test using an intrigue technique.
    Persuasion {
        /// Technique name, used as the specialty.
        technique: String,
    },
    /// A Deception test using an intrigue technique.
    Deception {
        /// Technique name, used as the specialty.
        technique: String,
    },
    /// A hand-edited formula in canonical string form.
    Formula {
        /// The canonical `pool|bonusDice|reRoll|modifier|dicePenalty` string.
        formula: String,
    },
}

impl RollKind {
    /// Whether discrete defenses apply: weapon tests, and Fighting or
    /// Marksmanship tests.
    pub fn is_combat_test(&self) -> bool {
        match self {
            Self::WeaponTest { .. } => true,
            Self::Ability { ability } | Self::Specialty { ability, .. } => matches!(
                Ability::from_name(ability),
                Some(Ability::Fighting | Ability::Marksmanship)
            ),
            _ => false,
        }
    }
}

/// A named roll as a sheet or macro describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDefinition {
    /// Display label.
    pub label: String,
    /// What the roll tests.
    #[serde(flatten)]
    pub kind: RollKind,
}

impl RollDefinition {
    /// Create a roll definition.
    pub fn new(label: impl Into<String>, kind: RollKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Build the formula for testing `ability` (optionally with `specialty`).
///
/// Missing abilities roll at [`UNTRAINED_RATING`]; a specialty the ability
/// does not have contributes nothing. Transformers on the ability's key and
/// on `all` are summed into every field. A non-positive pool is floored to
/// one die with no penalty.
pub fn ability_test_formula(
    actor: &Actor,
    store: &mut TransformerStore,
    ability: &str,
    specialty: Option<&str>,
) -> MechResult<DiceFormula> {
    let key: AttributeKey = ability.parse()?;

    let owned = actor.find_ability(ability);
    let (rating, ability_modifier) = owned.map_or((UNTRAINED_RATING, 0), |a| (a.rating, a.modifier));
    let (specialty_rating, specialty_modifier) = specialty
        .and_then(|name| owned.and_then(|a| a.specialty(name)))
        .map_or((0, 0), |s| (s.rating, s.modifier));

    let mut total = |ty: TransformerType| -> MechResult<i32> {
        Ok(store.aggregate(actor, ty, key, AggregateOptions::GLOBAL)?.total)
    };

    let mut formula = DiceFormula {
        pool: rating + total(TransformerType::PoolMods)?,
        dice_penalty: total(TransformerType::Penalties)?,
        bonus_dice: specialty_rating + total(TransformerType::Bonuses)?,
        modifier: ability_modifier + specialty_modifier + total(TransformerType::Modifiers)?,
        re_roll: 0,
        is_user_changed: false,
    };

    if formula.apply_pool_floor() {
        debug!(ability, "pool floored to one die");
    }
    debug!(actor = %actor.name, ability, ?specialty, formula = %formula, "built test formula");
    Ok(formula)
}

/// Build the formula a roll definition asks for.
pub fn formula_for(
    definition: &RollDefinition,
    actor: &Actor,
    store: &mut TransformerStore,
) -> MechResult<DiceFormula> {
    match &definition.kind {
        RollKind::Ability { ability } => ability_test_formula(actor, store, ability, None),
        RollKind::Specialty { ability, specialty } => {
            ability_test_formula(actor, store, ability, Some(specialty.as_str()))
        }
        RollKind::WeaponTest { weapon } => {
            let weapon = actor.weapon(*weapon)?;
            let formula =
                ability_test_formula(actor, store, &weapon.ability, weapon.specialty.as_deref())?;
            Ok(adjust_formula_by_weapon(formula, weapon))
        }
        RollKind::Persuasion { technique } => {
            ability_test_formula(actor, store, Ability::Persuasion.name(), Some(technique.as_str()))
        }
        RollKind::Deception { technique } => {
            ability_test_formula(actor, store, Ability::Deception.name(), Some(technique.as_str()))
        }
        RollKind::Formula { formula } => {
            let mut parsed = DiceFormula::parse(formula)?;
            parsed.apply_pool_floor();
            parsed.is_user_changed = true;
            Ok(parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sif_core::{AbilityData, ActorKind, Item, ItemKind, Specialty, WeaponData};

    use crate::error::MechError;

    fn actor_with_athletics() -> Actor {
        let mut actor = Actor::new(ActorKind::Character, "Arya");
        actor
            .add_item(Item::new(
                "Athletics",
                ItemKind::Ability(AbilityData {
                    rating: 3,
                    modifier: 0,
                    specialties: vec![Specialty::new("Run", 2, 1)],
                }),
            ))
            .unwrap();
        actor
    }

    #[test]
    fn specialty_adds_bonus_dice_and_modifier() {
        let actor = actor_with_athletics();
        let mut store = TransformerStore::load(&actor).unwrap();
        let f = ability_test_formula(&actor, &mut store, "athletics", Some("run")).unwrap();
        assert_eq!((f.pool, f.bonus_dice, f.modifier, f.dice_penalty), (3, 2, 1, 0));
    }

    #[test]
    fn unknown_specialty_falls_back_to_ability() {
        let actor = actor_with_athletics();
        let mut store = TransformerStore::load(&actor).unwrap();
        let f = ability_test_formula(&actor, &mut store, "Athletics", Some("Climb")).unwrap();
        assert_eq!((f.pool, f.bonus_dice, f.modifier), (3, 0, 0));
    }

    #[test]
    fn missing_ability_is_untrained() {
        let actor = actor_with_athletics();
        let mut store = TransformerStore::load(&actor).unwrap();
        let f = ability_test_formula(&actor, &mut store, "Deception", None).unwrap();
        assert_eq!(f.to_string(), "2|0|0|0|0");
    }

    #[test]
    fn transformers_feed_every_field() {
        let actor = actor_with_athletics();
        let mut store = TransformerStore::load(&actor).unwrap();
        let key = AttributeKey::Ability(Ability::Athletics);
        store.add(TransformerType::PoolMods, key, "a", 1, false).unwrap();
        store.add(TransformerType::Penalties, AttributeKey::All, "b", 1, false).unwrap();
        store.add(TransformerType::Bonuses, key, "c", 1, false).unwrap();
        store.add(TransformerType::Modifiers, key, "d", -2, false).unwrap();

        let f = ability_test_formula(&actor, &mut store, "Athletics", Some("Run")).unwrap();
        assert_eq!((f.pool, f.dice_penalty, f.bonus_dice, f.modifier), (4, 1, 3, -1));
    }

    #[test]
    fn non_positive_pool_is_floored() {
        let mut actor = Actor::new(ActorKind::Character, "Hodor");
        actor.add_item(Item::ability("Cunning", 0)).unwrap();
        let mut store = TransformerStore::load(&actor).unwrap();
        let key = AttributeKey::Ability(Ability::Cunning);
        store.add(TransformerType::PoolMods, key, "x", -5, false).unwrap();
        store.add(TransformerType::Penalties, key, "y", 2, false).unwrap();

        let f = ability_test_formula(&actor, &mut store, "Cunning", None).unwrap();
        assert_eq!((f.pool, f.dice_penalty), (1, 0));
    }

    #[test]
    fn unknown_ability_name_is_an_error() {
        let actor = actor_with_athletics();
        let mut store = TransformerStore::load(&actor).unwrap();
        assert!(matches!(
            ability_test_formula(&actor, &mut store, "Sorcery", None),
            Err(MechError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn weapon_test_uses_weapon_ability_without_floor() {
        let mut actor = Actor::new(ActorKind::Character, "Podrick");
        actor.add_item(Item::ability("Fighting", 1)).unwrap();
        let axe = actor
            .add_item(Item::new(
                "Great Axe",
                ItemKind::Weapon(WeaponData {
                    training: Some(3),
                    ..WeaponData::default()
                }),
            ))
            .unwrap();
        let mut store = TransformerStore::load(&actor).unwrap();

        let def = RollDefinition::new("Axe", RollKind::WeaponTest { weapon: axe });
        let f = formula_for(&def, &actor, &mut store).unwrap();
        assert_eq!((f.pool, f.bonus_dice), (-2, 0));
    }

    #[test]
    fn weapon_test_on_non_weapon_fails() {
        let actor = actor_with_athletics();
        let athletics = actor.items[0].id;
        let mut store = TransformerStore::load(&actor).unwrap();
        let def = RollDefinition::new("Oops", RollKind::WeaponTest { weapon: athletics });
        assert!(matches!(
            formula_for(&def, &actor, &mut store),
            Err(MechError::Core(_))
        ));
    }

    #[test]
    fn persuasion_uses_technique_as_specialty() {
        let mut actor = Actor::new(ActorKind::Character, "Littlefinger");
        actor
            .add_item(Item::new(
                "Persuasion",
                ItemKind::Ability(AbilityData {
                    rating: 5,
                    modifier: 0,
                    specialties: vec![Specialty::new("Seduce", 2, 0)],
                }),
            ))
            .unwrap();
        let mut store = TransformerStore::load(&actor).unwrap();
        let def = RollDefinition::new(
            "Seduce",
            RollKind::Persuasion {
                technique: "seduce".into(),
            },
        );
        let f = formula_for(&def, &actor, &mut store).unwrap();
        assert_eq!((f.pool, f.bonus_dice), (5, 2));
    }

    #[test]
    fn literal_formula_is_user_changed_and_floored() {
        let actor = actor_with_athletics();
        let mut store = TransformerStore::new();
        let def = RollDefinition::new(
            "Custom",
            RollKind::Formula {
                formula: "0|1|0|2|3".into(),
            },
        );
        let f = formula_for(&def, &actor, &mut store).unwrap();
        assert!(f.is_user_changed);
        assert_eq!(f.to_string(), "1|1|0|2|0");
    }

    #[test]
    fn combat_test_classification() {
        assert!(RollKind::WeaponTest {
            weapon: EntityId::new()
        }
        .is_combat_test());
        assert!(RollKind::Ability {
            ability: "fighting".into()
        }
        .is_combat_test());
        assert!(RollKind::Specialty {
            ability: "Marksmanship".into(),
            specialty: "Bows".into()
        }
        .is_combat_test());
        assert!(!RollKind::Ability {
            ability: "Athletics".into()
        }
        .is_combat_test());
    }

    #[test]
    fn roll_definition_json_shape() {
        let def = RollDefinition::new(
            "Run",
            RollKind::Specialty {
                ability: "Athletics".into(),
                specialty: "Run".into(),
            },
        );
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["kind"], "specialty");
        assert_eq!(json["label"], "Run");
        let back: RollDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }
}
