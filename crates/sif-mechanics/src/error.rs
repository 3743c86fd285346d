//! Error types for the mechanics engine.

use sif_core::CoreError;

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A transformer type string outside the closed set.
    #[error("unknown transformer type: {0}")]
    UnknownTransformerType(String),

    /// An attribute key that names no ability, derived stat, or `all`.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The transformer store was mutated or saved before being loaded.
    #[error("transformer store used before load")]
    NotLoaded,

    /// The persisted buckets changed since this store loaded them.
    #[error("stale transformer store: loaded revision {loaded}, persisted revision {persisted}")]
    StaleTransformers {
        /// Revision the store was loaded at.
        loaded: u64,
        /// Revision currently on the document.
        persisted: u64,
    },

    /// The effective dice pool is not positive.
    #[error("invalid pool: {pool} dice with a penalty of {penalty} leaves nothing to keep")]
    InvalidPool {
        /// Pool size.
        pool: i32,
        /// Dice penalty.
        penalty: i32,
    },

    /// The formula would roll more dice than [`MAX_DICE`](crate::formula::MAX_DICE).
    #[error("pool too large: {dice} dice, at most {max} can be rolled")]
    PoolTooLarge {
        /// Dice the formula asks for.
        dice: i32,
        /// The limit.
        max: i32,
    },

    /// A degree value outside -2..=4, or zero.
    #[error("no degree of success has value {0}")]
    InvalidDegree(i8),

    /// A canonical formula string could not be parsed.
    #[error("malformed formula \"{input}\": {reason}")]
    MalformedFormula {
        /// The offending input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A damage expression could not be parsed.
    #[error("invalid damage expression \"{0}\"")]
    InvalidDamage(String),

    /// A rule table has no entry with this name.
    #[error("no {table} entry named \"{name}\"")]
    UnknownTableEntry {
        /// The table searched.
        table: &'static str,
        /// The requested entry.
        name: String,
    },

    /// The rules configuration is malformed.
    #[error("invalid rules config: {0}")]
    InvalidConfig(String),

    /// An error from the document layer.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
