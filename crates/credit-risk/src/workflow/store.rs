use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::customers::{CustomerId, CustomerProfile, CustomerStatus};
use crate::scoring::{RiskLevel, RiskScore};

/// Storage abstraction owning customer records so the coordinator can be exercised in
/// isolation.
pub trait CustomerStore: Send + Sync {
    fn list(&self) -> Result<Vec<CustomerProfile>, StoreError>;
    fn fetch(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, StoreError>;
    /// Persist a status change (and the reviewer's notes) and return the stored profile.
    fn update(
        &self,
        id: &CustomerId,
        status: CustomerStatus,
        notes: Option<&str>,
    ) -> Result<CustomerProfile, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("customer {0} not found")]
    NotFound(CustomerId),
    #[error("customer store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook for high-risk approvals (e-mail, pager, case queue, ...).
#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    async fn notify(&self, alert: &HighRiskAlert) -> Result<(), AlertError>;
}

/// Raised whenever a High-risk customer is approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighRiskAlert {
    pub customer_id: CustomerId,
    pub score: u8,
    pub level: RiskLevel,
    pub previous_status: CustomerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub raised_at: DateTime<Utc>,
}

impl HighRiskAlert {
    pub fn new(
        risk: &RiskScore,
        previous_status: CustomerStatus,
        notes: Option<String>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id: risk.customer_id.clone(),
            score: risk.score,
            level: risk.level,
            previous_status,
            notes,
            raised_at,
        }
    }
}

/// Alert dispatch error. Always retryable from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
    #[error("alert delivery timed out after {0:?}")]
    TimedOut(Duration),
}
