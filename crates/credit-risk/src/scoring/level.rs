use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest score classified as [`RiskLevel::Medium`].
pub const MEDIUM_RISK_FLOOR: u8 = 30;
/// Lowest score classified as [`RiskLevel::High`].
pub const HIGH_RISK_FLOOR: u8 = 60;

/// Categorical risk band derived from the rounded score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_FLOOR {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_FLOOR {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
