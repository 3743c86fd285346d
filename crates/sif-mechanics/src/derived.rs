//! Stats derived from abilities and `modifiers` transformers.

use serde::{Deserialize, Serialize};
use sif_core::{Actor, EntityId};

use crate::attribute::{Ability, AttributeKey, DerivedStat};
use crate::error::MechResult;
use crate::formula::DamageExpr;
use crate::formula::builder::UNTRAINED_RATING;
use crate::roll::Difficulty;
use crate::rules::HouseRules;
use crate::transformer::{AggregateOptions, TransformerStore, TransformerType};

/// Base movement in yards before modifiers.
pub const BASE_MOVEMENT: i32 = 4;

/// An actor's derived combat and intrigue values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    /// Difficulty to hit in combat.
    pub combat_defense: i32,
    /// Difficulty of intrigue tests against the actor.
    pub intrigue_defense: i32,
    /// Damage the actor can take.
    pub health: i32,
    /// Influence the actor can take.
    pub composure: i32,
    /// Damage soaked per hit.
    pub armor_rating: i32,
    /// Yards per move action, at least one.
    pub movement: i32,
    /// Yards per sprint.
    pub sprint: i32,
    /// Defense against melee attacks, with discrete defenses on.
    pub fighting_defense: Option<i32>,
    /// Defense against ranged attacks, with discrete defenses on.
    pub marksmanship_defense: Option<i32>,
}

impl DerivedStats {
    /// The difficulty an attack against this actor rolls against.
    pub fn difficulty(&self) -> Difficulty {
        let mut difficulty = Difficulty::new(self.combat_defense);
        if let Some(value) = self.fighting_defense {
            difficulty = difficulty.with_discrete("fighting", value);
        }
        if let Some(value) = self.marksmanship_defense {
            difficulty = difficulty.with_discrete("marksmanship", value);
        }
        difficulty
    }
}

/// An ability's rating, or the untrained rating if the actor lacks it.
pub fn rating(actor: &Actor, ability: Ability) -> i32 {
    actor
        .find_ability(ability.name())
        .map_or(UNTRAINED_RATING, |a| a.rating)
}

fn modifiers(
    actor: &Actor,
    store: &mut TransformerStore,
    stat: DerivedStat,
    options: AggregateOptions,
) -> MechResult<i32> {
    let key = AttributeKey::Derived(stat);
    Ok(store
        .aggregate(actor, TransformerType::Modifiers, key, options)?
        .total)
}

/// Agility + Athletics + Awareness, plus modifiers.
///
/// With `combat_defense_includes_global` the `all` modifiers count too.
pub fn combat_defense(
    actor: &Actor,
    store: &mut TransformerStore,
    house_rules: &HouseRules,
) -> MechResult<i32> {
    let options = if house_rules.combat_defense_includes_global {
        AggregateOptions::GLOBAL
    } else {
        AggregateOptions::TOTAL
    };
    let base = rating(actor, Ability::Agility)
        + rating(actor, Ability::Athletics)
        + rating(actor, Ability::Awareness);
    Ok(base + modifiers(actor, store, DerivedStat::CombatDefense, options)?)
}

/// Awareness + Cunning + Status, plus modifiers.
pub fn intrigue_defense(actor: &Actor, store: &mut TransformerStore) -> MechResult<i32> {
    let base = rating(actor, Ability::Awareness)
        + rating(actor, Ability::Cunning)
        + rating(actor, Ability::Status);
    Ok(base + modifiers(actor, store, DerivedStat::IntrigueDefense, AggregateOptions::TOTAL)?)
}

/// Three times Endurance, plus modifiers.
pub fn health(actor: &Actor, store: &mut TransformerStore) -> MechResult<i32> {
    Ok(3 * rating(actor, Ability::Endurance)
        + modifiers(actor, store, DerivedStat::Health, AggregateOptions::TOTAL)?)
}

/// Three times Will, plus modifiers.
pub fn composure(actor: &Actor, store: &mut TransformerStore) -> MechResult<i32> {
    Ok(3 * rating(actor, Ability::Will)
        + modifiers(actor, store, DerivedStat::Composure, AggregateOptions::TOTAL)?)
}

/// Base movement plus modifiers, never below one.
pub fn movement(actor: &Actor, store: &mut TransformerStore) -> MechResult<i32> {
    let bonus = modifiers(actor, store, DerivedStat::Movement, AggregateOptions::TOTAL)?;
    Ok((BASE_MOVEMENT + bonus).max(1))
}

/// Damage of an owned weapon, from its damage expression.
pub fn weapon_damage(actor: &Actor, weapon: EntityId) -> MechResult<i32> {
    let weapon = actor.weapon(weapon)?;
    Ok(DamageExpr::parse(&weapon.damage)?.evaluate(actor))
}

/// Every derived stat at once.
pub fn derive(
    actor: &Actor,
    store: &mut TransformerStore,
    house_rules: &HouseRules,
) -> MechResult<DerivedStats> {
    let combat_defense = combat_defense(actor, store, house_rules)?;
    let movement = movement(actor, store)?;

    let (fighting_defense, marksmanship_defense) = if house_rules.discrete_defenses {
        let opts = AggregateOptions::TOTAL;
        (
            Some(combat_defense + modifiers(actor, store, DerivedStat::FightingDefense, opts)?),
            Some(combat_defense + modifiers(actor, store, DerivedStat::MarksmanshipDefense, opts)?),
        )
    } else {
        (None, None)
    };

    Ok(DerivedStats {
        combat_defense,
        intrigue_defense: intrigue_defense(actor, store)?,
        health: health(actor, store)?,
        composure: composure(actor, store)?,
        armor_rating: modifiers(actor, store, DerivedStat::ArmorRating, AggregateOptions::TOTAL)?,
        movement,
        sprint: movement * 4,
        fighting_defense,
        marksmanship_defense,
    })
}
