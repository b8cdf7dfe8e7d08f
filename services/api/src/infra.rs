use credit_risk::customers::{CustomerId, CustomerProfile, CustomerStatus};
use credit_risk::workflow::{AlertError, AlertSink, CustomerStore, HighRiskAlert, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local customer book keyed by id, listed in id order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCustomerStore {
    records: Arc<Mutex<BTreeMap<CustomerId, CustomerProfile>>>,
}

impl InMemoryCustomerStore {
    pub(crate) fn with_profiles(profiles: impl IntoIterator<Item = CustomerProfile>) -> Self {
        let records = profiles
            .into_iter()
            .map(|profile| (profile.customer_id.clone(), profile))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<CustomerId, CustomerProfile>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("customer store mutex poisoned".to_string()))
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn list(&self) -> Result<Vec<CustomerProfile>, StoreError> {
        Ok(self.guard()?.values().cloned().collect())
    }

    fn fetch(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, StoreError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn update(
        &self,
        id: &CustomerId,
        status: CustomerStatus,
        _notes: Option<&str>,
    ) -> Result<CustomerProfile, StoreError> {
        let mut guard = self.guard()?;
        let record = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.status = status;
        Ok(record.clone())
    }
}

/// Delivers high-risk alerts to the log stream and keeps a copy for inspection.
#[derive(Default, Clone)]
pub(crate) struct TracingAlertSink {
    delivered: Arc<Mutex<Vec<HighRiskAlert>>>,
}

impl TracingAlertSink {
    pub(crate) fn delivered(&self) -> Vec<HighRiskAlert> {
        self.delivered
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl AlertSink for TracingAlertSink {
    async fn notify(&self, alert: &HighRiskAlert) -> Result<(), AlertError> {
        warn!(
            target: "credit_risk::alerts",
            customer_id = %alert.customer_id,
            score = alert.score,
            level = %alert.level,
            previous_status = %alert.previous_status,
            raised_at = %alert.raised_at.to_rfc3339(),
            notes = alert.notes.as_deref().unwrap_or(""),
            "high-risk customer approved"
        );

        self.delivered
            .lock()
            .map_err(|_| AlertError::Transport("alert log mutex poisoned".to_string()))?
            .push(alert.clone());
        Ok(())
    }
}
