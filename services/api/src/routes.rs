use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use quotation_engine::quotations::{
    catalog_router, quotation_router, QuotationRepository, QuotationService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_quotation_routes<R>(service: Arc<QuotationService<R>>) -> axum::Router
where
    R: QuotationRepository + 'static,
{
    quotation_router(service)
        .merge(catalog_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let mut payload = if ready {
        json!({ "status": "ready", "ratesLoaded": state.rate_card.rates_loaded })
    } else {
        json!({ "status": "initializing" })
    };
    if let Some(error) = &state.rate_card.load_error {
        payload["rateCardError"] = json!(error);
    }

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryQuotationRepository, RateCardStatus};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use quotation_engine::pricing::{PricingEngine, RateRow, RateTable};
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool, load_error: Option<&str>) -> axum::Router {
        let rates = RateTable::load(vec![RateRow::new(
            "cat2",
            "Pune",
            "500-1000",
            "PROJECT REGISTRATION SERVICES",
            "8000",
        )]);
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            rate_card: RateCardStatus {
                rates_loaded: rates.len(),
                load_error: load_error.map(str::to_string),
            },
        };
        let service = Arc::new(QuotationService::new(
            Arc::new(InMemoryQuotationRepository::default()),
            Arc::new(PricingEngine::new(Arc::new(rates))),
        ));
        with_quotation_routes(service).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reports_rate_card_state() {
        let response = app(false, None)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true, Some("rate card csv error"))
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["ratesLoaded"], 1);
        assert_eq!(payload["rateCardError"], "rate card csv error");
    }

    #[tokio::test]
    async fn merged_router_serves_pricing_and_catalog() {
        let router = app(true, None);

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/quotations/calculate-pricing")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "developerType": "cat2",
                            "projectRegion": "Pune - PCMC",
                            "plotArea": 750,
                            "headers": [{"name": "Project Registration", "services": [{"name": "PROJECT REGISTRATION SERVICES"}]}]
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["subtotal"], 8000);
        assert_eq!(payload["tax"], 1440);
        assert_eq!(payload["total"], 9440);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
