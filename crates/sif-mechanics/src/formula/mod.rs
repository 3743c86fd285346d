//! Dice formulas: what a test rolls before any die is cast.
//!
//! A [`DiceFormula`] has a wire-stable canonical string form,
//! `pool|bonusDice|reRoll|modifier|dicePenalty`, used to persist formulas a
//! user edited by hand. Parsing is the exact inverse of formatting.

pub mod builder;
pub mod damage;
pub mod weapon;

pub use builder::{RollDefinition, RollKind, ability_test_formula, formula_for};
pub use damage::DamageExpr;
pub use weapon::adjust_formula_by_weapon;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Most dice a single roll may cast.
pub const MAX_DICE: i32 = 100;

/// The pending roll of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Test dice; the keep count starts here.
    pub pool: i32,
    /// Extra dice rolled but not added to the keep count.
    pub bonus_dice: i32,
    /// Flat adjustment to the total.
    pub modifier: i32,
    /// Reduces the keep count.
    pub dice_penalty: i32,
    /// Dice showing this face or lower are rerolled once.
    pub re_roll: i32,
    /// Whether a user edited this formula by hand. Not part of the canonical string.
    pub is_user_changed: bool,
}

impl Default for DiceFormula {
    fn default() -> Self {
        Self {
            pool: 2,
            bonus_dice: 0,
            modifier: 0,
            dice_penalty: 0,
            re_roll: 0,
            is_user_changed: false,
        }
    }
}

impl DiceFormula {
    /// Number of dice that count toward the total.
    pub fn kept_dice(&self) -> i32 {
        self.pool.saturating_sub(self.dice_penalty).max(0)
    }

    /// Number of dice physically rolled.
    pub fn dice_count(&self) -> i32 {
        self.pool.max(1).saturating_add(self.bonus_dice).max(0)
    }

    /// Guarantee at least one rollable die: a non-positive pool becomes a
    /// pool of one with no penalty. Returns whether the formula changed.
    pub fn apply_pool_floor(&mut self) -> bool {
        if self.pool > 0 {
            return false;
        }
        self.pool = 1;
        self.dice_penalty = 0;
        true
    }

    /// Parse the canonical `pool|bonusDice|reRoll|modifier|dicePenalty` form.
    pub fn parse(input: &str) -> MechResult<Self> {
        let malformed = |reason: String| MechError::MalformedFormula {
            input: input.to_string(),
            reason,
        };

        let parts: Vec<&str> = input.trim().split('|').collect();
        let [pool, bonus_dice, re_roll, modifier, dice_penalty] = parts.as_slice() else {
            return Err(malformed(format!(
                "expected 5 '|'-separated fields, found {}",
                parts.len()
            )));
        };

        let field = |name: &str, raw: &str| {
            raw.trim()
                .parse::<i32>()
                .map_err(|_| malformed(format!("{name} is not an integer: \"{raw}\"")))
        };

        Ok(Self {
            pool: field("pool", *pool)?,
            bonus_dice: field("bonusDice", *bonus_dice)?,
            re_roll: field("reRoll", *re_roll)?,
            modifier: field("modifier", *modifier)?,
            dice_penalty: field("dicePenalty", *dice_penalty)?,
            is_user_changed: false,
        })
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.pool, self.bonus_dice, self.re_roll, self.modifier, self.dice_penalty
        )
    }
}

impl FromStr for DiceFormula {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
