//! Dice roll results and keep-highest selection.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::DiceTag;

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieResult {
    /// Test or bonus die.
    pub tag: DiceTag,
    /// The face that stands (1 to 6).
    pub value: u32,
    /// The first face, if the die was rerolled.
    pub rerolled_from: Option<u32>,
    /// Whether this die counts toward the total.
    pub kept: bool,
}

impl DieResult {
    /// A die that was not rerolled and is not yet kept.
    pub fn new(tag: DiceTag, value: u32) -> Self {
        Self {
            tag,
            value,
            rerolled_from: None,
            kept: false,
        }
    }
}

/// The result of rolling an entire dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual die results, in roll order.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Build a result from faces in roll order, none rerolled.
    pub fn from_faces(faces: &[(DiceTag, u32)]) -> Self {
        Self {
            dice: faces
                .iter()
                .map(|&(tag, value)| DieResult::new(tag, value))
                .collect(),
        }
    }

    /// Mark the `count` highest dice as kept.
    ///
    /// Ties are broken by roll order: of two equal faces the earlier die is
    /// kept. Any previous selection is cleared first.
    pub fn keep_highest(&mut self, count: usize) {
        let mut order: Vec<usize> = (0..self.dice.len()).collect();
        // Stable, so equal faces stay in roll order.
        order.sort_by_key(|&i| Reverse(self.dice[i].value));

        for die in &mut self.dice {
            die.kept = false;
        }
        for &index in order.iter().take(count) {
            self.dice[index].kept = true;
        }
    }

    /// Sum of the kept dice.
    pub fn kept_total(&self) -> u32 {
        self.dice.iter().filter(|d| d.kept).map(|d| d.value).sum()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self
            .dice
            .iter()
            .map(|d| {
                if d.kept {
                    format!("{}*", d.value)
                } else {
                    d.value.to_string()
                }
            })
            .collect();
        write!(f, "[{}] = {}", values.join(", "), self.kept_total())
    }
}
