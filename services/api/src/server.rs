use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_affinity_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skill_affinity::config::AppConfig;
use skill_affinity::error::AppError;
use skill_affinity::router::AffinityService;
use skill_affinity::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(AffinityService::new(config.budgets));

    let app = with_affinity_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        requirements_limit = config.budgets.requirements.max_attributes,
        profile_limit = config.budgets.profile.max_attributes,
        "affinity scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
