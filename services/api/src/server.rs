use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryQuotationRepository, RateCardStatus};
use crate::routes::with_quotation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use quotation_engine::config::AppConfig;
use quotation_engine::error::AppError;
use quotation_engine::pricing::{PricingEngine, RateTable};
use quotation_engine::quotations::QuotationService;
use quotation_engine::telemetry;
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
    if let Some(path) = args.rate_card.take() {
        config.rates.path = path;
    }

    telemetry::init(&config.telemetry)?;

    // A missing or malformed rate card keeps the service up; every lookup
    // misses and the readiness payload says why.
    let (rates, load_error) = RateTable::load_or_empty(&config.rates.path);
    if let Some(err) = &load_error {
        warn!(path = %config.rates.path.display(), error = %err, "serving without a rate card");
    }
    let rate_card = RateCardStatus {
        rates_loaded: rates.len(),
        load_error: load_error.map(|err| err.to_string()),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        rate_card,
    };

    let repository = Arc::new(InMemoryQuotationRepository::default());
    let engine = Arc::new(PricingEngine::new(Arc::new(rates)));
    let quotation_service = Arc::new(QuotationService::new(repository, engine));

    let app = with_quotation_routes(quotation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quotation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
