//! Weapon damage expressions such as `@Athletics+1`.
//!
//! An expression is an ability reference, optionally followed by one
//! operator (`+`, `-`, `*`) and one integer literal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sif_core::Actor;

use crate::attribute::Ability;
use crate::error::{MechError, MechResult};
use crate::formula::builder::UNTRAINED_RATING;

/// An arithmetic operator in a damage expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
}

impl DamageOp {
    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
        }
    }

    fn apply(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Self::Add => lhs.saturating_add(rhs),
            Self::Sub => lhs.saturating_sub(rhs),
            Self::Mul => lhs.saturating_mul(rhs),
        }
    }
}

/// A parsed damage expression. Serialized in its `@Ability+N` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DamageExpr {
    /// The ability whose rating is the base damage.
    pub ability: Ability,
    /// Optional operator and literal applied to the rating.
    pub adjust: Option<(DamageOp, i32)>,
}

impl DamageExpr {
    /// Parse an expression like `@Athletics`, `@Athletics+2`, or `@Agility*2`.
    pub fn parse(input: &str) -> MechResult<Self> {
        let invalid = || MechError::InvalidDamage(input.to_string());

        let body = input.trim().strip_prefix('@').ok_or_else(invalid)?;
        let op_at = body.find(['+', '-', '*']);

        let (name, adjust) = match op_at {
            None => (body, None),
            Some(at) => {
                let op = match &body[at..at + 1] {
                    "+" => DamageOp::Add,
                    "-" => DamageOp::Sub,
                    _ => DamageOp::Mul,
                };
                let literal: i32 = body[at + 1..].trim().parse().map_err(|_| invalid())?;
                (&body[..at], Some((op, literal)))
            }
        };

        let ability = Ability::from_name(name).ok_or_else(invalid)?;
        Ok(Self { ability, adjust })
    }

    /// Evaluate against an actor's ability rating. Never negative.
    pub fn evaluate(&self, actor: &Actor) -> i32 {
        let rating = actor
            .find_ability(self.ability.name())
            .map(|a| a.rating)
            .unwrap_or(UNTRAINED_RATING);
        let value = match self.adjust {
            Some((op, literal)) => op.apply(rating, literal),
            None => rating,
        };
        value.max(0)
    }
}

impl fmt::Display for DamageExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.ability)?;
        if let Some((op, literal)) = self.adjust {
            write!(f, "{}{literal}", op.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for DamageExpr {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DamageExpr {
    type Error = MechError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DamageExpr> for String {
    fn from(expr: DamageExpr) -> Self {
        expr.to_string()
    }
}
