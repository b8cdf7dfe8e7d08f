use std::fmt;

use serde::Serialize;

use super::config::{MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};
use crate::customers::{CustomerId, CustomerProfile};

/// Scoring inputs that carry a range precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    CreditScore,
    MonthlyIncome,
    OutstandingLoans,
    LoanPeriodMonths,
}

impl ProfileField {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileField::CreditScore => "credit_score",
            ProfileField::MonthlyIncome => "monthly_income",
            ProfileField::OutstandingLoans => "outstanding_loans",
            ProfileField::LoanPeriodMonths => "loan_period_months",
        }
    }

    const fn expected(self) -> &'static str {
        match self {
            ProfileField::CreditScore => "[300, 850]",
            ProfileField::MonthlyIncome | ProfileField::OutstandingLoans => "finite and >= 0",
            ProfileField::LoanPeriodMonths => "> 0",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A profile the scorer refuses to score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("customer {customer_id}: {field} = {value} is outside the expected range {expected}")]
    OutOfRange {
        customer_id: CustomerId,
        field: ProfileField,
        value: f64,
        expected: &'static str,
    },
    #[error("customer {customer_id}: monthly income is zero, loan-to-income ratio is undefined")]
    DivisionByZero { customer_id: CustomerId },
}

impl ValidationError {
    pub fn customer_id(&self) -> &CustomerId {
        match self {
            ValidationError::OutOfRange { customer_id, .. }
            | ValidationError::DivisionByZero { customer_id } => customer_id,
        }
    }

    /// Zero income points at an upstream data-quality problem rather than a bad request.
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, ValidationError::DivisionByZero { .. })
    }

    fn out_of_range(profile: &CustomerProfile, field: ProfileField, value: f64) -> Self {
        ValidationError::OutOfRange {
            customer_id: profile.customer_id.clone(),
            field,
            value,
            expected: field.expected(),
        }
    }
}

/// Check every precondition before any arithmetic happens.
pub(crate) fn validate(
    profile: &CustomerProfile,
    loan_period_months: u32,
) -> Result<(), ValidationError> {
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&profile.credit_score) {
        return Err(ValidationError::out_of_range(
            profile,
            ProfileField::CreditScore,
            f64::from(profile.credit_score),
        ));
    }

    if !is_non_negative(profile.monthly_income) {
        return Err(ValidationError::out_of_range(
            profile,
            ProfileField::MonthlyIncome,
            profile.monthly_income,
        ));
    }

    if !is_non_negative(profile.outstanding_loans) {
        return Err(ValidationError::out_of_range(
            profile,
            ProfileField::OutstandingLoans,
            profile.outstanding_loans,
        ));
    }

    if loan_period_months == 0 {
        return Err(ValidationError::out_of_range(
            profile,
            ProfileField::LoanPeriodMonths,
            0.0,
        ));
    }

    if profile.monthly_income == 0.0 {
        return Err(ValidationError::DivisionByZero {
            customer_id: profile.customer_id.clone(),
        });
    }

    Ok(())
}

// Rejects NaN and infinities along with negatives.
fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
