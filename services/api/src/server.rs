use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCustomerStore, TracingAlertSink};
use crate::routes::with_risk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_risk::config::AppConfig;
use credit_risk::customers::parse_profiles;
use credit_risk::error::AppError;
use credit_risk::scoring::RiskScorer;
use credit_risk::telemetry;
use credit_risk::workflow::WorkflowCoordinator;
use std::fs::File;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = match args.customers.take() {
        Some(path) => {
            let profiles = parse_profiles(File::open(&path)?)?;
            info!(path = %path.display(), customers = profiles.len(), "seeded customer book");
            InMemoryCustomerStore::with_profiles(profiles)
        }
        None => InMemoryCustomerStore::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let coordinator = Arc::new(WorkflowCoordinator::new(
        Arc::new(store),
        Arc::new(TracingAlertSink::default()),
        RiskScorer::new(config.risk),
        config.workflow,
    ));

    let app = with_risk_routes(coordinator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        loan_period_months = config.risk.loan_period_months,
        "credit risk workflow service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
