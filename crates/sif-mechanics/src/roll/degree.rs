//! Degrees of success and failure.

use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// How well a test went, banded by margin over the difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Degree {
    /// Missed by five or more.
    CriticalFailure,
    /// Missed by one to four.
    MarginalFailure,
    /// Met or beat by up to four.
    MarginalSuccess,
    /// Beat by five to nine.
    GreatSuccess,
    /// Beat by ten to fourteen.
    IncredibleSuccess,
    /// Beat by fifteen or more.
    AstonishingSuccess,
}

impl Degree {
    /// Classify `final_total - difficulty`.
    pub fn from_margin(margin: i32) -> Self {
        match margin {
            ..=-5 => Self::CriticalFailure,
            -4..=-1 => Self::MarginalFailure,
            0..=4 => Self::MarginalSuccess,
            5..=9 => Self::GreatSuccess,
            10..=14 => Self::IncredibleSuccess,
            _ => Self::AstonishingSuccess,
        }
    }

    /// Signed degree: −2, −1 for failures, 1 to 4 for successes.
    pub fn value(self) -> i8 {
        match self {
            Self::CriticalFailure => -2,
            Self::MarginalFailure => -1,
            Self::MarginalSuccess => 1,
            Self::GreatSuccess => 2,
            Self::IncredibleSuccess => 3,
            Self::AstonishingSuccess => 4,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CriticalFailure => "critical failure",
            Self::MarginalFailure => "marginal failure",
            Self::MarginalSuccess => "marginal success",
            Self::GreatSuccess => "great success",
            Self::IncredibleSuccess => "incredible success",
            Self::AstonishingSuccess => "astonishing success",
        }
    }

    /// Whether the test succeeded.
    pub fn is_success(self) -> bool {
        self.value() > 0
    }
}

impl From<Degree> for i8 {
    fn from(degree: Degree) -> Self {
        degree.value()
    }
}

impl TryFrom<i8> for Degree {
    type Error = MechError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(Self::CriticalFailure),
            -1 => Ok(Self::MarginalFailure),
            1 => Ok(Self::MarginalSuccess),
            2 => Ok(Self::GreatSuccess),
            3 => Ok(Self::IncredibleSuccess),
            4 => Ok(Self::AstonishingSuccess),
            other => Err(MechError::InvalidDegree(other)),
        }
    }
}

impl std::fmt::Display for Degree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
