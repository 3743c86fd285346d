//! Six-sided dice: pools, rerolls, and keep-highest selection.
//!
//! Every die in a test is a d6. Test dice come from the pool; bonus dice
//! are rolled alongside them and compete for the kept slots, but never add
//! to the number of dice kept.

pub mod pool;
pub mod roll;

pub use pool::DicePool;
pub use roll::{DieResult, RollResult};

use serde::{Deserialize, Serialize};

/// Number of faces on every die.
pub const SIDES: u32 = 6;

/// Which part of the formula a die came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceTag {
    /// A test die from the pool.
    #[default]
    Test,
    /// A bonus die.
    Bonus,
}

impl std::fmt::Display for DiceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Bonus => write!(f, "bonus"),
        }
    }
}
