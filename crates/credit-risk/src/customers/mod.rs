//! Customer profiles as handed over by the customer store.

pub mod import;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use import::{parse_profiles, ImportError};

/// Identifier wrapper for borrowers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One period of repayment history. Serialized as `1` (paid) or `0` (missed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Repayment {
    Paid,
    Missed,
}

impl TryFrom<u8> for Repayment {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Repayment::Paid),
            0 => Ok(Repayment::Missed),
            other => Err(format!("repayment mark must be 0 or 1, got {other}")),
        }
    }
}

impl From<Repayment> for u8 {
    fn from(value: Repayment) -> Self {
        match value {
            Repayment::Paid => 1,
            Repayment::Missed => 0,
        }
    }
}

/// Workflow state of a customer. Every state may move to every other state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    #[default]
    Review,
    Approved,
    Rejected,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Review,
        CustomerStatus::Approved,
        CustomerStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            CustomerStatus::Review => "review",
            CustomerStatus::Approved => "approved",
            CustomerStatus::Rejected => "rejected",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "review" | "in review" | "pending" => Some(CustomerStatus::Review),
            "approved" => Some(CustomerStatus::Approved),
            "rejected" => Some(CustomerStatus::Rejected),
            _ => None,
        }
    }

    /// The workflow is unconstrained: any state can be requested from any state.
    pub const fn can_transition_to(self, _next: CustomerStatus) -> bool {
        true
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Financial snapshot of a borrower. Scoring only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub name: String,
    pub monthly_income: f64,
    pub outstanding_loans: f64,
    pub credit_score: i32,
    #[serde(default)]
    pub loan_repayment_history: Vec<Repayment>,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl CustomerProfile {
    pub fn missed_payments(&self) -> usize {
        self.loan_repayment_history
            .iter()
            .filter(|mark| **mark == Repayment::Missed)
            .count()
    }

    /// Copy of the profile with `status` replaced.
    pub fn with_status(&self, status: CustomerStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
