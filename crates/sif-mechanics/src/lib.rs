//! Rules resolution for A Song of Ice and Fire style tabletop play.
//!
//! Provides the transformer store (layered, per-source attribute
//! modifiers), the dice formula builder, the d6 keep-highest roll resolver
//! with degrees of success, static rule tables, item hooks, and derived
//! combat stats. Documents live in [`sif_core`].

pub mod attribute;
pub mod derived;
pub mod dice;
pub mod error;
pub mod formula;
pub mod items;
pub mod roll;
pub mod rules;
pub mod transformer;
pub mod validate;

pub use attribute::{Ability, AttributeKey, DerivedStat};
pub use derived::DerivedStats;
pub use dice::{DicePool, DiceTag, DieResult, RollResult};
pub use error::{MechError, MechResult};
pub use formula::{DamageExpr, DiceFormula, RollDefinition, RollKind, ability_test_formula, formula_for};
pub use items::{ItemHooks, hooks_for};
pub use roll::{Degree, Difficulty, RollOutcome, do_roll};
pub use rules::{HouseRules, RuleTables, RulesConfig, RulesContext, TableKind};
pub use transformer::{Aggregate, AggregateOptions, TransformerStore, TransformerType};
pub use validate::{ValidationIssue, validate_actor, validate_tables};
