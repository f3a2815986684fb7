use super::domain::{ListQuery, QuotationId, QuotationRecord};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait QuotationRepository: Send + Sync {
    fn insert(&self, record: QuotationRecord) -> Result<QuotationRecord, RepositoryError>;
    fn update(&self, record: QuotationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &QuotationId) -> Result<Option<QuotationRecord>, RepositoryError>;
    /// Records matching the query's search, newest first, plus the total
    /// match count before paging.
    fn list(&self, query: &ListQuery) -> Result<(Vec<QuotationRecord>, usize), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Applies search, newest-first ordering and paging to an unordered set of
/// records. Shared by in-memory repositories.
pub fn page_records<I>(records: I, query: &ListQuery) -> (Vec<QuotationRecord>, usize)
where
    I: IntoIterator<Item = QuotationRecord>,
{
    let needle = query.needle();
    let mut matching: Vec<QuotationRecord> = records
        .into_iter()
        .filter(|record| record.matches(&needle))
        .collect();
    matching.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    let total = matching.len();
    let limit = query.limit();
    let page = matching
        .into_iter()
        .skip((query.page() - 1).saturating_mul(limit))
        .take(limit)
        .collect();
    (page, total)
}
