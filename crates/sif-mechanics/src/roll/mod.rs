//! Rolling a formula and classifying the result.
//!
//! [`do_roll`] casts the dice; [`resolve_dice`] does everything after that
//! and is deterministic, so callers with physical dice (or tests) can feed
//! faces in directly.

pub mod defense;
pub mod degree;

pub use defense::Difficulty;
pub use degree::Degree;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dice::{DicePool, DieResult, RollResult};
use crate::error::{MechError, MechResult};
use crate::formula::{DiceFormula, MAX_DICE, RollKind};

/// Everything the presentation layer needs to show a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    /// The formula that was rolled.
    pub formula: DiceFormula,
    /// Every die, in roll order.
    pub dice: Vec<DieResult>,
    /// Sum of the kept dice.
    pub kept_dice_total: i32,
    /// Kept dice plus the formula's modifier.
    pub final_total: i32,
    /// The primary difficulty, if any.
    pub difficulty: Option<i32>,
    /// `final_total - difficulty`.
    pub margin: Option<i32>,
    /// Degree against the primary difficulty.
    pub degree: Option<Degree>,
    /// Degrees against discrete defenses, where they differ from `degree`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secondary_degrees: BTreeMap<String, Degree>,
}

impl RollOutcome {
    /// Label of the primary degree.
    pub fn degree_label(&self) -> Option<&'static str> {
        self.degree.map(Degree::label)
    }

    /// Whether the roll beat its difficulty. `false` when there was none.
    pub fn is_success(&self) -> bool {
        self.degree.is_some_and(Degree::is_success)
    }
}

/// Reject formulas that would keep no dice or roll more than [`MAX_DICE`].
pub fn check_pool(formula: &DiceFormula) -> MechResult<()> {
    if formula.kept_dice() == 0 {
        warn!(
            pool = formula.pool,
            penalty = formula.dice_penalty,
            "invalid dice pool"
        );
        return Err(MechError::InvalidPool {
            pool: formula.pool,
            penalty: formula.dice_penalty,
        });
    }
    let dice = formula.dice_count();
    if dice > MAX_DICE {
        warn!(dice, max = MAX_DICE, "dice pool too large");
        return Err(MechError::PoolTooLarge {
            dice,
            max: MAX_DICE,
        });
    }
    Ok(())
}

/// Roll `formula` and classify it against `difficulty`.
pub fn do_roll(
    formula: &DiceFormula,
    kind: &RollKind,
    difficulty: Option<&Difficulty>,
    rng: &mut StdRng,
) -> MechResult<RollOutcome> {
    check_pool(formula)?;
    let dice = DicePool::from_formula(formula).roll(rng);
    let outcome = resolve_dice(formula, kind, difficulty, dice);
    debug!(
        formula = %formula,
        total = outcome.final_total,
        degree = ?outcome.degree,
        "rolled"
    );
    Ok(outcome)
}

/// Keep the highest dice of an already cast roll and classify it.
pub fn resolve_dice(
    formula: &DiceFormula,
    kind: &RollKind,
    difficulty: Option<&Difficulty>,
    mut dice: RollResult,
) -> RollOutcome {
    dice.keep_highest(formula.kept_dice() as usize);
    let kept_dice_total = i32::try_from(dice.kept_total()).unwrap_or(i32::MAX);
    let final_total = kept_dice_total.saturating_add(formula.modifier);

    let margin = difficulty.map(|d| final_total.saturating_sub(d.value));
    let degree = margin.map(Degree::from_margin);

    let secondary_degrees = match (difficulty, degree) {
        (Some(difficulty), Some(primary))
            if difficulty.has_discrete_defenses() && kind.is_combat_test() =>
        {
            difficulty
                .discrete
                .iter()
                .map(|(name, &value)| (name.clone(), Degree::from_margin(final_total.saturating_sub(value))))
                .filter(|(_, secondary)| *secondary != primary)
                .collect()
        }
        _ => BTreeMap::new(),
    };

    RollOutcome {
        formula: *formula,
        dice: dice.dice,
        kept_dice_total,
        final_total,
        difficulty: difficulty.map(|d| d.value),
        margin,
        degree,
        secondary_degrees,
    }
}
