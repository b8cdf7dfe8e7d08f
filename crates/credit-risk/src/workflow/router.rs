use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::coordinator::{WorkflowCoordinator, WorkflowError};
use super::store::{AlertSink, CustomerStore, StoreError};
use crate::customers::{CustomerId, CustomerProfile, CustomerStatus};
use crate::scoring::{PortfolioSummary, RiskScore, ValidationError};

/// Router builder exposing scoring and status transition endpoints.
pub fn risk_router<S, A>(coordinator: Arc<WorkflowCoordinator<S, A>>) -> Router
where
    S: CustomerStore + 'static,
    A: AlertSink + 'static,
{
    Router::new()
        .route("/api/v1/risk/score", post(score_handler::<S, A>))
        .route("/api/v1/risk/batch", post(batch_handler::<S, A>))
        .route("/api/v1/customers/risk", get(portfolio_handler::<S, A>))
        .route(
            "/api/v1/customers/:customer_id/status",
            post(transition_handler::<S, A>),
        )
        .with_state(coordinator)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScoreQuery {
    pub(crate) loan_period_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    pub(crate) status: CustomerStatus,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

/// One slot of a batch response, mirroring the request order.
#[derive(Debug, Serialize)]
pub(crate) struct BatchEntry {
    pub(crate) customer_id: CustomerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) risk: Option<RiskScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) results: Vec<BatchEntry>,
    pub(crate) summary: PortfolioSummary,
}

impl BatchResponse {
    fn new(results: Vec<Result<RiskScore, ValidationError>>, summary: PortfolioSummary) -> Self {
        let results = results
            .into_iter()
            .map(|result| match result {
                Ok(risk) => BatchEntry {
                    customer_id: risk.customer_id.clone(),
                    risk: Some(risk),
                    error: None,
                },
                Err(error) => BatchEntry {
                    customer_id: error.customer_id().clone(),
                    risk: None,
                    error: Some(error.to_string()),
                },
            })
            .collect();
        Self { results, summary }
    }
}

pub(crate) async fn score_handler<S, A>(
    State(coordinator): State<Arc<WorkflowCoordinator<S, A>>>,
    Query(query): Query<ScoreQuery>,
    axum::Json(profile): axum::Json<CustomerProfile>,
) -> Response
where
    S: CustomerStore + 'static,
    A: AlertSink + 'static,
{
    let scorer = coordinator.scorer();
    let period = query
        .loan_period_months
        .unwrap_or(scorer.policy().loan_period_months);

    match scorer.score_with_period(&profile, period) {
        Ok(risk) => (StatusCode::OK, axum::Json(risk)).into_response(),
        Err(error) => validation_response(&error),
    }
}

pub(crate) async fn batch_handler<S, A>(
    State(coordinator): State<Arc<WorkflowCoordinator<S, A>>>,
    axum::Json(profiles): axum::Json<Vec<CustomerProfile>>,
) -> Response
where
    S: CustomerStore + 'static,
    A: AlertSink + 'static,
{
    let results = coordinator.scorer().score_all(&profiles);
    let summary = PortfolioSummary::from_results(&results);
    let payload = BatchResponse::new(results, summary);
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn portfolio_handler<S, A>(
    State(coordinator): State<Arc<WorkflowCoordinator<S, A>>>,
) -> Response
where
    S: CustomerStore + 'static,
    A: AlertSink + 'static,
{
    let portfolio = match coordinator.score_portfolio() {
        Ok(portfolio) => portfolio,
        Err(error) => return store_unavailable(&error),
    };
    let payload = BatchResponse::new(portfolio.results, portfolio.summary);
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn transition_handler<S, A>(
    State(coordinator): State<Arc<WorkflowCoordinator<S, A>>>,
    Path(customer_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    S: CustomerStore + 'static,
    A: AlertSink + 'static,
{
    let id = CustomerId(customer_id);
    let profile = match coordinator.store().fetch(&id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return not_found(&id),
        Err(error) => return store_unavailable(&error),
    };

    match coordinator
        .transition(&profile, request.status, request.notes)
        .await
    {
        Ok(updated) => (StatusCode::OK, axum::Json(updated)).into_response(),
        Err(WorkflowError::ScoringFailed { source, .. }) => validation_response(&source),
        Err(WorkflowError::PersistenceFailed {
            source: StoreError::NotFound(id),
            ..
        }) => not_found(&id),
        Err(error @ WorkflowError::PersistenceFailed { .. }) => {
            let payload = json!({
                "error": error.to_string(),
                "customer_id": error.customer_id(),
                "status_changed": false,
                "retryable": true,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(error @ WorkflowError::AlertDeliveryFailed { .. }) => {
            let payload = json!({
                "error": error.to_string(),
                "customer_id": error.customer_id(),
                "status_changed": true,
                "pending_alert": error.pending_alert(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

fn validation_response(error: &ValidationError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "customer_id": error.customer_id(),
        "division_by_zero": error.is_division_by_zero(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn not_found(id: &CustomerId) -> Response {
    let payload = json!({
        "error": format!("customer {id} not found"),
        "customer_id": id,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn store_unavailable(error: &StoreError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}
