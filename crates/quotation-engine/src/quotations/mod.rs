//! Stored quotations: intake validation, the draft → priced → completed
//! workflow, terms, printable summaries and the HTTP routes over them.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod summary;
pub mod terms;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    DiscountInput, ListQuery, PaymentSchedule, PricingUpdate, ProjectDetails, QuotationId,
    QuotationListItem, QuotationPage, QuotationRecord, QuotationStatus, QuotationSubmission,
    QuotationValidity, TermsAcceptance, MAX_PAGE_SIZE,
};
pub use repository::{page_records, QuotationRepository, RepositoryError};
pub use router::{catalog_router, quotation_router};
pub use service::{QuotationChange, QuotationService, QuotationServiceError, ServiceRatesView};
pub use summary::{format_rupees, render_summary, service_summary};
pub use terms::{applicable_terms, TermsSection};
pub use validation::{IntakeGuard, IntakeViolation};
