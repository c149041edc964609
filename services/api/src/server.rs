use crate::cli::ServeArgs;
use crate::infra::{
    session_from_config, AppState, InMemoryAssessmentRepository, LoggingDecisionPublisher,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use doctoral_assessment::config::AppConfig;
use doctoral_assessment::error::AppError;
use doctoral_assessment::telemetry;
use doctoral_assessment::workflows::assessment::AssessmentService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let session = Arc::new(session_from_config(&config.session));
    if config.session.reviewer.is_none() {
        warn!("APP_REVIEWER not set; scoring endpoints will answer 401");
    }

    let service = Arc::new(AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(LoggingDecisionPublisher::default()),
        session,
    ));

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "doctoral assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
