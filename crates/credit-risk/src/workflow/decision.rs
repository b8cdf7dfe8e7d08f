use crate::customers::{CustomerId, CustomerProfile, CustomerStatus};
use crate::scoring::RiskScore;

/// A requested status change paired with the risk computed for it. Lives only for the
/// duration of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDecision {
    pub from: CustomerStatus,
    pub to: CustomerStatus,
    pub risk: RiskScore,
}

impl WorkflowDecision {
    pub fn new(profile: &CustomerProfile, to: CustomerStatus, risk: RiskScore) -> Self {
        Self {
            from: profile.status,
            to,
            risk,
        }
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.risk.customer_id
    }

    /// Approving a High-risk customer cannot complete without an alert.
    pub fn requires_alert(&self) -> bool {
        self.to == CustomerStatus::Approved && self.risk.is_high()
    }
}
