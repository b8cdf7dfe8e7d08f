//! Deterministic, explainable borrower risk scoring.
//!
//! A score is the sum of three bounded factors: credit score (up to 40), repayment history
//! (up to 30) and loan-to-income ratio (up to 30). Scores are recomputed on demand and never
//! stored.

mod config;
mod level;
mod rules;
mod summary;
mod validation;

#[cfg(test)]
mod tests;

pub use config::{
    RiskPolicy, CREDIT_SCORE_WEIGHT, DEFAULT_INCOME_CEILING, DEFAULT_LOAN_PERIOD_MONTHS,
    LOAN_TO_INCOME_WEIGHT, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE, REPAYMENT_HISTORY_WEIGHT,
};
pub use level::{RiskLevel, HIGH_RISK_FLOOR, MEDIUM_RISK_FLOOR};
pub use summary::PortfolioSummary;
pub use validation::{ProfileField, ValidationError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::customers::{CustomerId, CustomerProfile};

/// Per-factor contributions, each rounded independently for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub credit_score_impact: u8,
    pub repayment_history_impact: u8,
    pub loan_to_income_ratio_impact: u8,
}

impl RiskFactors {
    pub fn sum(&self) -> u16 {
        u16::from(self.credit_score_impact)
            + u16::from(self.repayment_history_impact)
            + u16::from(self.loan_to_income_ratio_impact)
    }
}

/// Scoring output. `score` is rounded once from the un-rounded factor total, so it may differ
/// from `factors.sum()` by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    pub customer_id: CustomerId,
    pub score: u8,
    pub level: RiskLevel,
    pub factors: RiskFactors,
}

impl RiskScore {
    pub fn is_high(&self) -> bool {
        self.level == RiskLevel::High
    }

    pub fn summary(&self) -> String {
        format!(
            "score {} ({}): credit {}, repayment {}, loan-to-income {}",
            self.score,
            self.level,
            self.factors.credit_score_impact,
            self.factors.repayment_history_impact,
            self.factors.loan_to_income_ratio_impact
        )
    }
}

/// Stateless scorer applying a [`RiskPolicy`] to customer profiles.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    policy: RiskPolicy,
}

impl RiskScorer {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Score using the policy's default loan period.
    pub fn score(&self, profile: &CustomerProfile) -> Result<RiskScore, ValidationError> {
        self.score_with_period(profile, self.policy.loan_period_months)
    }

    pub fn score_with_period(
        &self,
        profile: &CustomerProfile,
        loan_period_months: u32,
    ) -> Result<RiskScore, ValidationError> {
        validation::validate(profile, loan_period_months)?;

        let impacts = rules::score_factors(profile, &self.policy, loan_period_months);
        let score = round_impact(impacts.total());
        let level = RiskLevel::from_score(score);

        debug!(
            customer_id = %profile.customer_id,
            credit = impacts.credit_score,
            repayment = impacts.repayment_history,
            loan_to_income = impacts.loan_to_income,
            ratio = impacts.loan_to_income_ratio,
            score,
            %level,
            "scored customer"
        );

        Ok(RiskScore {
            customer_id: profile.customer_id.clone(),
            score,
            level,
            factors: RiskFactors {
                credit_score_impact: round_impact(impacts.credit_score),
                repayment_history_impact: round_impact(impacts.repayment_history),
                loan_to_income_ratio_impact: round_impact(impacts.loan_to_income),
            },
        })
    }

    /// Score every profile independently. Output order matches input order and a failing
    /// profile only affects its own slot.
    pub fn score_all(
        &self,
        profiles: &[CustomerProfile],
    ) -> Vec<Result<RiskScore, ValidationError>> {
        profiles.iter().map(|profile| self.score(profile)).collect()
    }
}

// Impacts are bounded to [0, 100] by construction.
fn round_impact(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
