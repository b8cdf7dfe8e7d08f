use serde::{Deserialize, Serialize};

/// Maximum contribution of the credit score factor.
pub const CREDIT_SCORE_WEIGHT: f64 = 40.0;
/// Maximum contribution of the repayment history factor.
pub const REPAYMENT_HISTORY_WEIGHT: f64 = 30.0;
/// Maximum contribution of the loan-to-income factor.
pub const LOAN_TO_INCOME_WEIGHT: f64 = 30.0;

/// Bureau scale bounds, inclusive.
pub const MIN_CREDIT_SCORE: i32 = 300;
pub const MAX_CREDIT_SCORE: i32 = 850;

pub const DEFAULT_LOAN_PERIOD_MONTHS: u32 = 24;
/// Debt-to-income ratio treated as maximal risk.
pub const DEFAULT_INCOME_CEILING: f64 = 0.5;

/// Policy values the scorer reads at call time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    pub loan_period_months: u32,
    pub loan_to_income_ceiling: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            loan_period_months: DEFAULT_LOAN_PERIOD_MONTHS,
            loan_to_income_ceiling: DEFAULT_INCOME_CEILING,
        }
    }
}
