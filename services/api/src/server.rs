use crate::cli::ServeArgs;
use crate::infra::{
    AppState, BcryptHasher, InMemoryDirectoryRepository, LoggingNotifier, MemorySessionBroker,
};
use crate::routes::with_directory_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use intern_hub::config::AppConfig;
use intern_hub::error::AppError;
use intern_hub::telemetry;
use intern_hub::workflows::directory::service::DirectoryService;

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

    let repository = Arc::new(InMemoryDirectoryRepository::default());
    let notifier = Arc::new(LoggingNotifier::new(config.public_url.clone()));
    let directory_service = Arc::new(DirectoryService::new(
        repository,
        notifier,
        Arc::new(MemorySessionBroker::default()),
        Arc::new(BcryptHasher),
    ));

    if let Some(seed) = config.admin_seed.as_ref() {
        let admin = directory_service
            .seed_admin(&seed.email, &seed.password)
            .map_err(|err| {
                AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("unable to seed administrator: {err}"),
                ))
            })?;
        info!(email = %admin.email, "administrator account seeded");
    }

    let app = with_directory_routes(directory_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "internship directory service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
