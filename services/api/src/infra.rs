use metrics_exporter_prometheus::PrometheusHandle;
use quotation_engine::quotations::{
    page_records, ListQuery, QuotationId, QuotationRecord, QuotationRepository, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) rate_card: RateCardStatus,
}

/// What the server managed to load at startup, surfaced on `/ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RateCardStatus {
    pub(crate) rates_loaded: usize,
    pub(crate) load_error: Option<String>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryQuotationRepository {
    records: Arc<Mutex<HashMap<QuotationId, QuotationRecord>>>,
}

impl QuotationRepository for InMemoryQuotationRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
