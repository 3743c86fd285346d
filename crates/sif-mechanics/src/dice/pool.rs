//! Dice pool construction and rolling.

use rand::Rng;
use rand::rngs::StdRng;

use super::roll::{DieResult, RollResult};
use super::{DiceTag, SIDES};
use crate::formula::{DiceFormula, MAX_DICE};

/// A collection of d6s to be rolled together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DicePool {
    /// The dice in this pool, test dice first.
    pub dice: Vec<DiceTag>,
    /// Dice showing this face or lower are rerolled once.
    pub re_roll: u32,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The dice a formula rolls: `max(pool, 1) + bonusDice`, between none
    /// and [`MAX_DICE`]. Negative bonus dice eat into the test dice.
    pub fn from_formula(formula: &DiceFormula) -> Self {
        let count = formula.dice_count().clamp(0, MAX_DICE) as usize;
        let test = (formula.pool.clamp(1, MAX_DICE) as usize).min(count);
        Self::new()
            .add(DiceTag::Test, test)
            .add(DiceTag::Bonus, count - test)
            .with_re_roll(formula.re_roll.max(0) as u32)
    }

    /// Add `count` dice with the given tag.
    pub fn add(mut self, tag: DiceTag, count: usize) -> Self {
        self.dice.extend(std::iter::repeat_n(tag, count));
        self
    }

    /// Set the reroll threshold.
    pub fn with_re_roll(mut self, re_roll: u32) -> Self {
        self.re_roll = re_roll;
        self
    }

    /// Roll all dice in the pool using the given RNG.
    ///
    /// A die at or below the reroll threshold is rolled again exactly once;
    /// the second face stands even if it is also low.
    pub fn roll(&self, rng: &mut StdRng) -> RollResult {
        let dice = self
            .dice
            .iter()
            .map(|&tag| {
                let first = rng.random_range(1..=SIDES);
                if first <= self.re_roll {
                    DieResult {
                        tag,
                        value: rng.random_range(1..=SIDES),
                        rerolled_from: Some(first),
                        kept: false,
                    }
                } else {
                    DieResult::new(tag, first)
                }
            })
            .collect();
        RollResult { dice }
    }
}
