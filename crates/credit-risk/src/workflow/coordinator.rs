use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::decision::WorkflowDecision;
use super::locks::CustomerLocks;
use super::store::{AlertError, AlertSink, CustomerStore, HighRiskAlert, StoreError};
use crate::customers::{CustomerId, CustomerProfile, CustomerStatus};
use crate::scoring::{PortfolioSummary, RiskScore, RiskScorer, ValidationError};

pub const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime knobs for the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub alert_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            alert_timeout: DEFAULT_ALERT_TIMEOUT,
        }
    }
}

/// Scoring results for every customer in the store.
#[derive(Debug, Clone)]
pub struct PortfolioRisk {
    pub results: Vec<Result<RiskScore, ValidationError>>,
    pub summary: PortfolioSummary,
}

/// Coordinates status transitions, gating High-risk approvals on a delivered alert.
pub struct WorkflowCoordinator<S, A> {
    store: Arc<S>,
    alerts: Arc<A>,
    scorer: Arc<RiskScorer>,
    locks: CustomerLocks,
    config: WorkflowConfig,
}

impl<S, A> WorkflowCoordinator<S, A>
where
    S: CustomerStore + 'static,
    A: AlertSink + 'static,
{
    pub fn new(store: Arc<S>, alerts: Arc<A>, scorer: RiskScorer, config: WorkflowConfig) -> Self {
        Self {
            store,
            alerts,
            scorer: Arc::new(scorer),
            locks: CustomerLocks::default(),
            config,
        }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Move `profile` to `new_status`.
    ///
    /// Transitions on the same customer run one at a time. Once scoring succeeds, the status
    /// write and the mandatory alert run on their own task, so dropping the returned future
    /// cannot leave a status change without its alert attempt.
    pub async fn transition(
        &self,
        profile: &CustomerProfile,
        new_status: CustomerStatus,
        notes: Option<String>,
    ) -> Result<CustomerProfile, WorkflowError> {
        let lease = self.locks.acquire(&profile.customer_id).await;

        let risk = self.scorer.score(profile).map_err(|source| {
            warn!(
                customer_id = %profile.customer_id,
                to = %new_status,
                error = %source,
                "transition blocked by scoring failure"
            );
            WorkflowError::ScoringFailed {
                customer_id: profile.customer_id.clone(),
                source,
            }
        })?;

        let decision = WorkflowDecision::new(profile, new_status, risk);
        let store = Arc::clone(&self.store);
        let alerts = Arc::clone(&self.alerts);
        let alert_timeout = self.config.alert_timeout;

        let task = tokio::spawn(async move {
            let _lease = lease;
            apply_decision(store.as_ref(), alerts.as_ref(), decision, notes, alert_timeout).await
        });

        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => Err(WorkflowError::PersistenceFailed {
                customer_id: profile.customer_id.clone(),
                source: StoreError::Unavailable(format!("transition task cancelled: {err}")),
            }),
        }
    }

    /// Re-deliver an alert from a failed transition without touching status again.
    pub async fn retry_alert(&self, alert: &HighRiskAlert) -> Result<(), AlertError> {
        let _lease = self.locks.acquire(&alert.customer_id).await;
        deliver(self.alerts.as_ref(), alert, self.config.alert_timeout).await?;
        info!(customer_id = %alert.customer_id, score = alert.score, "high-risk alert re-delivered");
        Ok(())
    }

    /// Score every customer the store knows about.
    pub fn score_portfolio(&self) -> Result<PortfolioRisk, StoreError> {
        let profiles = self.store.list()?;
        let results = self.scorer.score_all(&profiles);
        let summary = PortfolioSummary::from_results(&results);
        Ok(PortfolioRisk { results, summary })
    }
}

async fn apply_decision<S, A>(
    store: &S,
    alerts: &A,
    decision: WorkflowDecision,
    notes: Option<String>,
    alert_timeout: Duration,
) -> Result<CustomerProfile, WorkflowError>
where
    S: CustomerStore + ?Sized,
    A: AlertSink + ?Sized,
{
    let customer_id = decision.customer_id().clone();

    let updated = store
        .update(&customer_id, decision.to, notes.as_deref())
        .map_err(|source| {
            warn!(%customer_id, to = %decision.to, error = %source, "status update failed");
            WorkflowError::PersistenceFailed {
                customer_id: customer_id.clone(),
                source,
            }
        })?;

    if decision.requires_alert() {
        let alert = HighRiskAlert::new(&decision.risk, decision.from, notes, Utc::now());
        if let Err(source) = deliver(alerts, &alert, alert_timeout).await {
            warn!(
                %customer_id,
                score = decision.risk.score,
                error = %source,
                "high-risk approval persisted but alert delivery failed"
            );
            return Err(WorkflowError::AlertDeliveryFailed {
                customer_id,
                profile: Box::new(updated),
                alert: Box::new(alert),
                source,
            });
        }
        info!(%customer_id, score = decision.risk.score, "high-risk approval alert delivered");
    }

    info!(
        %customer_id,
        from = %decision.from,
        to = %decision.to,
        score = decision.risk.score,
        level = %decision.risk.level,
        "customer status updated"
    );
    Ok(updated)
}

async fn deliver<A>(alerts: &A, alert: &HighRiskAlert, timeout: Duration) -> Result<(), AlertError>
where
    A: AlertSink + ?Sized,
{
    match tokio::time::timeout(timeout, alerts.notify(alert)).await {
        Ok(result) => result,
        Err(_) => Err(AlertError::TimedOut(timeout)),
    }
}

/// Error raised by a transition, naming where it stopped.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Invalid profile. Status unchanged; fix the data before retrying.
    #[error("transition rejected, status unchanged: {source}")]
    ScoringFailed {
        customer_id: CustomerId,
        source: ValidationError,
    },
    /// Status write failed. Status unchanged; the whole transition may be retried.
    #[error("customer {customer_id}: status update failed: {source}")]
    PersistenceFailed {
        customer_id: CustomerId,
        source: StoreError,
    },
    /// Status was changed but the high-risk alert was not delivered; retry only the alert.
    #[error(
        "customer {customer_id}: status changed to {} but the high-risk alert was not delivered: {source}",
        .profile.status
    )]
    AlertDeliveryFailed {
        customer_id: CustomerId,
        profile: Box<CustomerProfile>,
        alert: Box<HighRiskAlert>,
        source: AlertError,
    },
}

impl WorkflowError {
    pub fn customer_id(&self) -> &CustomerId {
        match self {
            WorkflowError::ScoringFailed { customer_id, .. }
            | WorkflowError::PersistenceFailed { customer_id, .. }
            | WorkflowError::AlertDeliveryFailed { customer_id, .. } => customer_id,
        }
    }

    pub fn status_changed(&self) -> bool {
        matches!(self, WorkflowError::AlertDeliveryFailed { .. })
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, WorkflowError::ScoringFailed { .. })
    }

    /// The alert still owed after a status change went through.
    pub fn pending_alert(&self) -> Option<&HighRiskAlert> {
        match self {
            WorkflowError::AlertDeliveryFailed { alert, .. } => Some(&**alert),
            _ => None,
        }
    }
}
