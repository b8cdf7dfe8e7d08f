//! Customer status workflow gated on the risk score.
//!
//! Any status may move to any other status. The one hard rule lives in side effects:
//! approving a High-risk customer is not complete until a high-risk alert was delivered.

mod coordinator;
mod decision;
pub mod locks;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use coordinator::{
    PortfolioRisk, WorkflowConfig, WorkflowCoordinator, WorkflowError, DEFAULT_ALERT_TIMEOUT,
};
pub use decision::WorkflowDecision;
pub use locks::{CustomerLease, CustomerLocks};
pub use router::risk_router;
pub use store::{AlertError, AlertSink, CustomerStore, HighRiskAlert, StoreError};
