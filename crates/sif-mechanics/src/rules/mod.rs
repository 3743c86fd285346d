//! Rules context: house rules, rule tables, and the session RNG.
//!
//! A [`RulesContext`] is built from a [`RulesConfig`] and passed explicitly
//! to whatever needs tables or dice; nothing here is process-global.

pub mod preset;
pub mod tables;

pub use tables::{RuleEffect, RuleEntry, RuleTables, TableKind};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sif_core::Actor;
use tracing::debug;

use crate::derived;
use crate::error::{MechError, MechResult};
use crate::formula::{DiceFormula, RollDefinition, RollKind, formula_for};
use crate::roll::{self, Difficulty, RollOutcome};
use crate::transformer::TransformerStore;

/// Optional rule variants a table can switch on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseRules {
    /// Combat defense also sums the `all` modifiers bucket.
    pub combat_defense_includes_global: bool,
    /// Targets carry separate fighting and marksmanship defenses.
    pub discrete_defenses: bool,
}

impl HouseRules {
    /// Toggle the global bucket in combat defense.
    pub fn with_combat_defense_includes_global(mut self, on: bool) -> Self {
        self.combat_defense_includes_global = on;
        self
    }

    /// Toggle discrete defenses.
    pub fn with_discrete_defenses(mut self, on: bool) -> Self {
        self.discrete_defenses = on;
        self
    }
}

/// Everything needed to start a rules session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// RNG seed for reproducible rolls.
    pub seed: u64,
    /// House rule toggles.
    pub house_rules: HouseRules,
    /// Rule tables; the standard tables when absent.
    pub tables: Option<RuleTables>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            house_rules: HouseRules::default(),
            tables: None,
        }
    }
}

impl RulesConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> MechResult<Self> {
        serde_json::from_str(json).map_err(|e| MechError::InvalidConfig(e.to_string()))
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the house rules.
    pub fn with_house_rules(mut self, house_rules: HouseRules) -> Self {
        self.house_rules = house_rules;
        self
    }

    /// Use custom rule tables.
    pub fn with_tables(mut self, tables: RuleTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Start a session.
    pub fn build(self) -> RulesContext {
        RulesContext::new(self)
    }
}

/// A rules session: tables, house rules, and the dice.
#[derive(Debug, Clone)]
pub struct RulesContext {
    /// The active rule tables.
    pub tables: RuleTables,
    /// The active house rules.
    pub house_rules: HouseRules,
    rng: StdRng,
}

impl RulesContext {
    /// Start a session from a config.
    pub fn new(config: RulesConfig) -> Self {
        debug!(seed = config.seed, house_rules = ?config.house_rules, "rules session started");
        Self {
            tables: config.tables.unwrap_or_else(RuleTables::standard),
            house_rules: config.house_rules,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Roll a formula.
    pub fn roll(
        &mut self,
        formula: &DiceFormula,
        kind: &RollKind,
        difficulty: Option<&Difficulty>,
    ) -> MechResult<RollOutcome> {
        roll::do_roll(formula, kind, difficulty, &mut self.rng)
    }

    /// Build the formula for `definition` and roll it.
    pub fn roll_definition(
        &mut self,
        definition: &RollDefinition,
        actor: &Actor,
        store: &mut TransformerStore,
        difficulty: Option<&Difficulty>,
    ) -> MechResult<RollOutcome> {
        let formula = formula_for(definition, actor, store)?;
        debug!(label = %definition.label, formula = %formula, "rolling definition");
        self.roll(&formula, &definition.kind, difficulty)
    }

    /// The difficulty an attack against `actor` rolls against.
    pub fn defense_of(&self, actor: &Actor, store: &mut TransformerStore) -> MechResult<Difficulty> {
        Ok(derived::derive(actor, store, &self.house_rules)?.difficulty())
    }

    /// Apply a rule-table entry to `store`.
    pub fn apply(&self, store: &mut TransformerStore, kind: TableKind, name: &str) -> MechResult<()> {
        self.tables.apply(store, kind, name)
    }

    /// Revoke a rule-table entry from `store`.
    pub fn revoke(
        &self,
        store: &mut TransformerStore,
        kind: TableKind,
        name: &str,
    ) -> MechResult<usize> {
        self.tables.revoke(store, kind, name)
    }
}

impl Default for RulesContext {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}
