use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::pricing::{
    HeaderSelection, NumericInput, PricingEngine, RateRow, RateTable, ServiceSelection,
    SubServiceRef,
};
use crate::quotations::domain::{
    ListQuery, QuotationId, QuotationRecord, QuotationSubmission, QuotationValidity,
};
use crate::quotations::repository::{page_records, QuotationRepository, RepositoryError};
use crate::quotations::service::QuotationService;

pub(super) fn engine() -> Arc<PricingEngine> {
    let rows = vec![
        RateRow::new(
            "cat1",
            "Mumbai Suburban",
            "1001-1500",
            "PROJECT REGISTRATION SERVICES",
            "10000",
        ),
        RateRow::new(
            "Category 1",
            "Mumbai Suburban",
            "1001-1500",
            "LEGAL CONSULTATION",
            "₹5,000",
        ),
        RateRow::new(
            "cat1",
            "Mumbai Suburban",
            "1001-1500",
            "Project Closure",
            "20000",
        ),
    ];
    Arc::new(PricingEngine::new(Arc::new(RateTable::load(rows))))
}

pub(super) fn registration_header(sub_ids: &[&str]) -> HeaderSelection {
    HeaderSelection::new(
        "Project Registration",
        vec![ServiceSelection {
            name: "PROJECT REGISTRATION SERVICES".to_string(),
            sub_services: sub_ids.iter().map(|id| SubServiceRef::new(*id)).collect(),
        }],
    )
}

pub(super) fn submission() -> QuotationSubmission {
    QuotationSubmission {
        developer_type: Some("cat1".to_string()),
        project_region: Some("Thane".to_string()),
        project_location: Some("Ghodbunder Road".to_string()),
        plot_area: Some(NumericInput::Number(1200.0)),
        developer_name: Some("Skyline Developers".to_string()),
        project_name: Some("Skyline Heights".to_string()),
        rera_number: Some("p517-201234".to_string()),
        contact_mobile: Some("98765 43210".to_string()),
        contact_email: Some("sales@skyline.example".to_string()),
        validity: Some(QuotationValidity::FifteenDays),
        payment_schedule: None,
        headers: vec![registration_header(&[
            "project-registration-services-1",
            "project-registration-services-2",
        ])],
    }
}

/// Two headers that both claim `project-registration-services-2`.
pub(super) fn duplicate_headers() -> Vec<HeaderSelection> {
    vec![
        registration_header(&[
            "project-registration-services-1",
            "project-registration-services-2",
        ]),
        HeaderSelection::new(
            "Customized Header",
            vec![ServiceSelection {
                name: "PROJECT REGISTRATION SERVICES".to_string(),
                sub_services: vec![
                    SubServiceRef::new("project-registration-services-2"),
                    SubServiceRef::new("project-registration-services-3"),
                ],
            }],
        ),
    ]
}

pub(super) fn build_service() -> (QuotationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = QuotationService::new(repository.clone(), engine());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<QuotationId, QuotationRecord>>>,
}

impl QuotationRepository for MemoryRepository {
    fn insert(&self, record: QuotationRecord) -> Result<QuotationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: QuotationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &QuotationId) -> Result<Option<QuotationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, query: &ListQuery) -> Result<(Vec<QuotationRecord>, usize), RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(page_records(guard.values().cloned(), query))
    }
}

/// Reads succeed from the wrapped store; every write fails.
pub(super) struct ReadOnlyRepository(pub(super) MemoryRepository);

impl QuotationRepository for ReadOnlyRepository {
    fn insert(&self, _record: QuotationRecord) -> Result<QuotationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: QuotationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &QuotationId) -> Result<Option<QuotationRecord>, RepositoryError> {
        self.0.fetch(id)
    }

    fn list(&self, query: &ListQuery) -> Result<(Vec<QuotationRecord>, usize), RepositoryError> {
        self.0.list(query)
    }
}

pub(super) struct UnavailableRepository;

impl QuotationRepository for UnavailableRepository {
    fn insert(&self, _record: QuotationRecord) -> Result<QuotationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: QuotationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &QuotationId) -> Result<Option<QuotationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _query: &ListQuery) -> Result<(Vec<QuotationRecord>, usize), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn quotation_router_with_service(
    service: QuotationService<MemoryRepository>,
) -> axum::Router {
    crate::quotations::quotation_router(Arc::new(service))
}
