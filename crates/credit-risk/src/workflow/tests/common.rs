use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::response::Response;
use serde_json::Value;

use crate::customers::{CustomerId, CustomerProfile, CustomerStatus, Repayment};
use crate::scoring::RiskScorer;
use crate::workflow::{
    AlertError, AlertSink, CustomerStore, HighRiskAlert, StoreError, WorkflowConfig,
    WorkflowCoordinator,
};

pub(super) fn profile(
    id: &str,
    credit_score: i32,
    income: f64,
    loans: f64,
    history: &[u8],
) -> CustomerProfile {
    CustomerProfile {
        customer_id: CustomerId::from(id),
        name: format!("Borrower {id}"),
        monthly_income: income,
        outstanding_loans: loans,
        credit_score,
        loan_repayment_history: history
            .iter()
            .map(|mark| Repayment::try_from(*mark).expect("binary mark"))
            .collect(),
        status: CustomerStatus::Review,
    }
}

/// Scores 86: High.
pub(super) fn high_risk_profile(id: &str) -> CustomerProfile {
    profile(id, 350, 2000.0, 60000.0, &[0, 0, 1])
}

/// Scores 37: Medium.
pub(super) fn medium_risk_profile(id: &str) -> CustomerProfile {
    profile(id, 620, 4000.0, 24000.0, &[1, 1, 0, 1, 1, 1])
}

/// Scores 3: Low.
pub(super) fn low_risk_profile(id: &str) -> CustomerProfile {
    profile(id, 820, 9000.0, 1200.0, &[1, 1, 1, 1])
}

pub(super) fn zero_income_profile(id: &str) -> CustomerProfile {
    profile(id, 700, 0.0, 5000.0, &[1])
}

pub(super) fn workflow_config() -> WorkflowConfig {
    WorkflowConfig {
        alert_timeout: Duration::from_millis(200),
    }
}

pub(super) fn coordinator_with<A: AlertSink + 'static>(
    store: Arc<MemoryStore>,
    alerts: Arc<A>,
) -> WorkflowCoordinator<MemoryStore, A> {
    WorkflowCoordinator::new(store, alerts, RiskScorer::default(), workflow_config())
}

pub(super) fn build_coordinator(
    profiles: Vec<CustomerProfile>,
) -> (
    WorkflowCoordinator<MemoryStore, RecordingAlerts>,
    Arc<MemoryStore>,
    Arc<RecordingAlerts>,
) {
    let store = Arc::new(MemoryStore::with_profiles(profiles));
    let alerts = Arc::new(RecordingAlerts::default());
    let coordinator = coordinator_with(store.clone(), alerts.clone());
    (coordinator, store, alerts)
}

/// Status write recorded by [`MemoryStore`].
#[derive(Debug, Clone)]
pub(super) struct StoredChange {
    pub(super) customer_id: CustomerId,
    pub(super) status: CustomerStatus,
    pub(super) notes: Option<String>,
    pub(super) at: Instant,
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<HashMap<CustomerId, CustomerProfile>>>,
    changes: Arc<Mutex<Vec<StoredChange>>>,
}

impl MemoryStore {
    pub(super) fn with_profiles(profiles: Vec<CustomerProfile>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().expect("store mutex poisoned");
            for profile in profiles {
                guard.insert(profile.customer_id.clone(), profile);
            }
        }
        store
    }

    pub(super) fn status_of(&self, id: &str) -> Option<CustomerStatus> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(&CustomerId::from(id))
            .map(|profile| profile.status)
    }

    pub(super) fn changes(&self) -> Vec<StoredChange> {
        self.changes.lock().expect("store mutex poisoned").clone()
    }
}

impl CustomerStore for MemoryStore {
    fn list(&self) -> Result<Vec<CustomerProfile>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut profiles: Vec<_> = guard.values().cloned().collect();
        profiles.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
        Ok(profiles)
    }

    fn fetch(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(
        &self,
        id: &CustomerId,
        status: CustomerStatus,
        notes: Option<&str>,
    ) -> Result<CustomerProfile, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.status = status;
        self.changes
            .lock()
            .expect("store mutex poisoned")
            .push(StoredChange {
                customer_id: id.clone(),
                status,
                notes: notes.map(str::to_string),
                at: Instant::now(),
            });
        Ok(record.clone())
    }
}

pub(super) struct UnavailableStore;

impl CustomerStore for UnavailableStore {
    fn list(&self) -> Result<Vec<CustomerProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CustomerId) -> Result<Option<CustomerProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _id: &CustomerId,
        _status: CustomerStatus,
        _notes: Option<&str>,
    ) -> Result<CustomerProfile, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Alert sink recording every attempt, optionally slow or failing.
#[derive(Default, Clone)]
pub(super) struct RecordingAlerts {
    events: Arc<Mutex<Vec<HighRiskAlert>>>,
    finished: Arc<Mutex<Vec<Instant>>>,
    attempts: Arc<AtomicUsize>,
    failures_remaining: Arc<AtomicUsize>,
    delay: Duration,
}

impl RecordingAlerts {
    pub(super) fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub(super) fn failing(times: usize) -> Self {
        let alerts = Self::default();
        alerts.failures_remaining.store(times, Ordering::SeqCst);
        alerts
    }

    pub(super) fn events(&self) -> Vec<HighRiskAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }

    pub(super) fn finished_at(&self) -> Vec<Instant> {
        self.finished.lock().expect("alert mutex poisoned").clone()
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AlertSink for RecordingAlerts {
    async fn notify(&self, alert: &HighRiskAlert) -> Result<(), AlertError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AlertError::Transport("pager offline".to_string()));
        }

        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert.clone());
        self.finished
            .lock()
            .expect("alert mutex poisoned")
            .push(Instant::now());
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
