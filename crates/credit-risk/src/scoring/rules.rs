use super::config::{
    RiskPolicy, CREDIT_SCORE_WEIGHT, LOAN_TO_INCOME_WEIGHT, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE,
    REPAYMENT_HISTORY_WEIGHT,
};
use crate::customers::CustomerProfile;

/// Un-rounded factor contributions. Callers must have validated the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FactorImpacts {
    pub credit_score: f64,
    pub repayment_history: f64,
    pub loan_to_income: f64,
    pub loan_to_income_ratio: f64,
}

impl FactorImpacts {
    pub fn total(&self) -> f64 {
        self.credit_score + self.repayment_history + self.loan_to_income
    }
}

pub(crate) fn score_factors(
    profile: &CustomerProfile,
    policy: &RiskPolicy,
    loan_period_months: u32,
) -> FactorImpacts {
    let ratio = loan_to_income_ratio(profile, loan_period_months);

    FactorImpacts {
        credit_score: credit_score_impact(profile.credit_score),
        repayment_history: repayment_history_impact(profile),
        loan_to_income: loan_to_income_impact(ratio, policy.loan_to_income_ceiling),
        loan_to_income_ratio: ratio,
    }
}

/// 850 contributes nothing, 300 contributes the full weight.
fn credit_score_impact(credit_score: i32) -> f64 {
    let span = f64::from(MAX_CREDIT_SCORE - MIN_CREDIT_SCORE);
    let normalized = (f64::from(MAX_CREDIT_SCORE - credit_score) / span).clamp(0.0, 1.0);
    normalized * CREDIT_SCORE_WEIGHT
}

/// Missing history counts as average risk: exactly half the weight.
fn repayment_history_impact(profile: &CustomerProfile) -> f64 {
    let periods = profile.loan_repayment_history.len();
    if periods == 0 {
        return REPAYMENT_HISTORY_WEIGHT / 2.0;
    }

    let missed_fraction = profile.missed_payments() as f64 / periods as f64;
    missed_fraction * REPAYMENT_HISTORY_WEIGHT
}

fn loan_to_income_ratio(profile: &CustomerProfile, loan_period_months: u32) -> f64 {
    let monthly_burden = profile.outstanding_loans / f64::from(loan_period_months);
    monthly_burden / profile.monthly_income
}

fn loan_to_income_impact(ratio: f64, ceiling: f64) -> f64 {
    let normalized = (ratio / ceiling.max(f64::MIN_POSITIVE)).clamp(0.0, 1.0);
    normalized * LOAN_TO_INCOME_WEIGHT
}
