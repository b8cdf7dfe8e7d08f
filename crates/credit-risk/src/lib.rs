//! Borrower risk scoring and the approval workflow gated on it.
//!
//! [`scoring::RiskScorer`] turns a [`customers::CustomerProfile`] into a bounded, explainable
//! [`scoring::RiskScore`]. [`workflow::WorkflowCoordinator`] applies status transitions and
//! refuses to report a High-risk approval as complete until its alert was delivered.

pub mod config;
pub mod customers;
pub mod error;
pub mod scoring;
pub mod telemetry;
pub mod workflow;

pub use customers::{CustomerId, CustomerProfile, CustomerStatus, Repayment};
pub use scoring::{RiskLevel, RiskScore, RiskScorer, ValidationError};
pub use workflow::{WorkflowCoordinator, WorkflowError};
