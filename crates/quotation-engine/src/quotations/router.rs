use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ListQuery, PricingUpdate, QuotationId, QuotationSubmission, TermsAcceptance,
};
use super::repository::{QuotationRepository, RepositoryError};
use super::service::{QuotationChange, QuotationService, QuotationServiceError};
use super::summary::{render_summary, service_summary};
use super::terms::applicable_terms;
use crate::pricing::{
    AgentPricingRequest, HeaderSelection, NumericInput, PackageExpander, PricingRequest,
    ServiceCatalog,
};

/// Router builder exposing quotation intake, pricing and lookup endpoints.
pub fn quotation_router<R>(service: Arc<QuotationService<R>>) -> Router
where
    R: QuotationRepository + 'static,
{
    Router::new()
        .route(
            "/api/quotations/calculate-pricing",
            post(calculate_pricing_handler::<R>),
        )
        .route(
            "/api/quotations",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/quotations/:quotation_id",
            get(fetch_handler::<R>).put(update_headers_handler::<R>),
        )
        .route(
            "/api/quotations/:quotation_id/pricing",
            put(price_handler::<R>),
        )
        .route(
            "/api/quotations/:quotation_id/terms",
            put(terms_handler::<R>),
        )
        .route(
            "/api/quotations/:quotation_id/summary",
            get(summary_handler::<R>),
        )
        .route("/api/rates/services", get(rates_handler::<R>))
        .with_state(service)
}

/// Static catalogue and fixed-price endpoints; no storage involved.
pub fn catalog_router() -> Router {
    Router::new()
        .route("/api/catalog/headers", get(headers_handler))
        .route(
            "/api/catalog/headers/:header/services",
            get(header_services_handler),
        )
        .route("/api/agent-registrations/pricing", post(agent_pricing_handler))
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn service_error_response(error: QuotationServiceError) -> Response {
    let status = match &error {
        QuotationServiceError::Intake(_)
        | QuotationServiceError::Validation(_)
        | QuotationServiceError::TermsNotAccepted => StatusCode::UNPROCESSABLE_ENTITY,
        QuotationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        QuotationServiceError::Repository(RepositoryError::Conflict)
        | QuotationServiceError::Completed(_)
        | QuotationServiceError::NotPriced(_) => StatusCode::CONFLICT,
        QuotationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error.to_string())
}

fn change_response(status: StatusCode, change: QuotationChange) -> Response {
    let payload = json!({
        "data": change.record,
        "droppedSubServices": change.dropped.messages(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn calculate_pricing_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    axum::Json(request): axum::Json<PricingRequest>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.calculate(&request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(QuotationServiceError::Validation(error)) => {
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    axum::Json(submission): axum::Json<QuotationSubmission>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.create(submission) {
        Ok(change) => change_response(StatusCode::CREATED, change),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.list(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(json!({ "data": page }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Path(quotation_id): Path<String>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.get(&QuotationId(quotation_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(json!({ "data": record }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadersBody {
    headers: Vec<HeaderSelection>,
}

pub(crate) async fn update_headers_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Path(quotation_id): Path<String>,
    axum::Json(body): axum::Json<HeadersBody>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.update_headers(&QuotationId(quotation_id), body.headers) {
        Ok(change) => change_response(StatusCode::OK, change),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn price_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Path(quotation_id): Path<String>,
    axum::Json(update): axum::Json<PricingUpdate>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.price(&QuotationId(quotation_id), update) {
        Ok(change) => change_response(StatusCode::OK, change),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn terms_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Path(quotation_id): Path<String>,
    axum::Json(terms): axum::Json<TermsAcceptance>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.complete(&QuotationId(quotation_id), terms) {
        Ok(record) => (StatusCode::OK, axum::Json(json!({ "data": record }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Path(quotation_id): Path<String>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.get(&QuotationId(quotation_id)) {
        Ok(record) => {
            let payload = json!({
                "data": {
                    "id": record.id,
                    "serviceSummary": service_summary(&record.headers),
                    "terms": applicable_terms(&record.headers),
                    "text": render_summary(&record),
                }
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RatesQuery {
    developer_type: Option<String>,
    project_region: Option<String>,
    plot_area: Option<String>,
}

pub(crate) async fn rates_handler<R>(
    State(service): State<Arc<QuotationService<R>>>,
    Query(query): Query<RatesQuery>,
) -> Response
where
    R: QuotationRepository + 'static,
{
    match service.available_services(
        query.developer_type.as_deref(),
        query.project_region.as_deref(),
        query.plot_area.map(NumericInput::Text),
    ) {
        Ok(view) => (StatusCode::OK, axum::Json(json!({ "data": view }))).into_response(),
        Err(QuotationServiceError::Validation(error)) => {
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn headers_handler() -> Response {
    let catalog = ServiceCatalog::standard();
    (StatusCode::OK, axum::Json(json!({ "data": catalog.headers() }))).into_response()
}

pub(crate) async fn header_services_handler(Path(header): Path<String>) -> Response {
    let services = PackageExpander::standard().services_for_header(&header);
    let payload = json!({ "header": header, "data": services });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn agent_pricing_handler(
    axum::Json(request): axum::Json<AgentPricingRequest>,
) -> Response {
    match request.quote() {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(StatusCode::BAD_REQUEST, error.to_string()),
    }
}
