use serde::{Deserialize, Serialize};

/// Score at which the logistic curve crosses 0.5.
const LOGISTIC_MIDPOINT: f64 = 40.0;
/// Score distance over which the log-odds change by one.
const LOGISTIC_SCALE: f64 = 15.0;

const MODERATE_FLOOR: u8 = 25;
const HIGH_FLOOR: u8 = 50;
const VERY_HIGH_FLOOR: u8 = 75;

/// Ordered risk category derived from the capped score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const fn from_score(score: u8) -> Self {
        if score < MODERATE_FLOOR {
            RiskLevel::Low
        } else if score < HIGH_FLOOR {
            RiskLevel::Moderate
        } else if score < VERY_HIGH_FLOOR {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very-high",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }

    pub const fn ordered() -> [RiskLevel; 4] {
        [
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::VeryHigh,
        ]
    }

    pub const fn is_elevated(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::VeryHigh)
    }
}

/// Logistic transform of the score; stays strictly inside (0, 1).
pub fn probability(score: u8) -> f64 {
    let exponent = -(f64::from(score) - LOGISTIC_MIDPOINT) / LOGISTIC_SCALE;
    1.0 / (1.0 + exponent.exp())
}

pub fn classify(score: u8) -> (f64, RiskLevel) {
    (probability(score), RiskLevel::from_score(score))
}
