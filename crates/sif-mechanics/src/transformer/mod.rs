//! Transformers: per-source contributions to attributes.
//!
//! Every actor carries four independent channels of contributions
//! ([`TransformerType`]), each keyed by attribute. Equipped items, statuses,
//! formations and dispositions each write one entry per attribute they
//! affect, identified by their source ID, so re-applying a source updates
//! its entry instead of stacking.
//!
//! A [`TransformerStore`] is loaded from an [`Actor`](sif_core::Actor)
//! document, mutated with [`add`](TransformerStore::add) and
//! [`remove`](TransformerStore::remove), read with
//! [`aggregate`](TransformerStore::aggregate), and written back with
//! [`save`](TransformerStore::save).

pub mod ops;
pub mod store;

pub use ops::{Aggregate, AggregateDetail, AggregateOptions, SourceNames};
pub use store::{StoreState, TransformerStore};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// The four channels a source can contribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransformerType {
    /// Adjusts the dice pool size.
    #[serde(rename = "poolMods")]
    PoolMods,
    /// Reduces the number of dice kept.
    #[serde(rename = "penalties")]
    Penalties,
    /// Adds bonus dice.
    #[serde(rename = "bonuses")]
    Bonuses,
    /// Flat adjustment to a roll total or derived value.
    #[serde(rename = "modifiers")]
    Modifiers,
}

impl TransformerType {
    /// All four types, in persisted order.
    pub const ALL: [TransformerType; 4] = [
        Self::PoolMods,
        Self::Penalties,
        Self::Bonuses,
        Self::Modifiers,
    ];

    /// The persisted key of this type.
    pub fn key(self) -> &'static str {
        match self {
            Self::PoolMods => "poolMods",
            Self::Penalties => "penalties",
            Self::Bonuses => "bonuses",
            Self::Modifiers => "modifiers",
        }
    }
}

impl FromStr for TransformerType {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| MechError::UnknownTransformerType(s.to_string()))
    }
}

impl fmt::Display for TransformerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
