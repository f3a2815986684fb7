use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    DiscountInput, ListQuery, PricingUpdate, QuotationId, QuotationPage, QuotationRecord,
    QuotationStatus, QuotationSubmission, TermsAcceptance,
};
use super::repository::{QuotationRepository, RepositoryError};
use super::summary::service_summary;
use super::validation::{IntakeGuard, IntakeViolation};
use crate::pricing::{
    ConflictReport, HeaderSelection, NumericInput, PricingContext, PricingEngine, PricingRequest,
    PricingResponse, QuotationDraft, ServiceRate, ValidationError,
};

/// Service composing intake validation, the pricing engine, and storage.
pub struct QuotationService<R> {
    intake: IntakeGuard,
    repository: Arc<R>,
    engine: Arc<PricingEngine>,
}

/// A stored quotation together with the sub-services dropped while its
/// header list was rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationChange {
    pub record: QuotationRecord,
    pub dropped: ConflictReport,
}

/// Services priced for one (developer type, location, band) triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRatesView {
    #[serde(flatten)]
    pub context: PricingContext,
    pub services: Vec<ServiceRate>,
}

impl<R> QuotationService<R>
where
    R: QuotationRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<PricingEngine>) -> Self {
        Self {
            intake: IntakeGuard,
            repository,
            engine,
        }
    }

    /// Stateless pricing of an ad-hoc request; nothing is stored.
    pub fn calculate(
        &self,
        request: &PricingRequest,
    ) -> Result<PricingResponse, QuotationServiceError> {
        Ok(self.engine.quote(request)?)
    }

    pub fn available_services(
        &self,
        developer_type: Option<&str>,
        project_region: Option<&str>,
        plot_area: Option<NumericInput>,
    ) -> Result<ServiceRatesView, QuotationServiceError> {
        let request = PricingRequest {
            developer_type: developer_type.map(str::to_string),
            project_region: project_region.map(str::to_string),
            plot_area,
            ..PricingRequest::default()
        };
        let context = request.context()?;
        let services = self.engine.rates().services_for(
            &context.developer_type,
            context.location.label(),
            context.plot_area_band.label(),
        );
        Ok(ServiceRatesView { context, services })
    }

    /// Validate an intake form and store it as a draft quotation.
    pub fn create(
        &self,
        submission: QuotationSubmission,
    ) -> Result<QuotationChange, QuotationServiceError> {
        let headers = submission.headers.clone();
        let project = self.intake.project_from_submission(submission)?;
        let (headers, dropped) = rebuild_headers(headers);

        let now = Utc::now();
        let record = QuotationRecord {
            id: QuotationId::generate(now.date_naive()),
            status: QuotationStatus::Draft,
            project,
            service_summary: service_summary(&headers),
            headers,
            pricing: None,
            discount: DiscountInput::default(),
            terms: TermsAcceptance::default(),
            created_at: now,
            updated_at: now,
        };

        let record = self.repository.insert(record)?;
        info!(quotation_id = %record.id, "quotation created");
        Ok(QuotationChange { record, dropped })
    }

    pub fn get(&self, id: &QuotationId) -> Result<QuotationRecord, QuotationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self, query: &ListQuery) -> Result<QuotationPage, QuotationServiceError> {
        let (records, total) = self.repository.list(query)?;
        Ok(QuotationPage {
            items: records.iter().map(QuotationRecord::list_item).collect(),
            total,
            page: query.page(),
            limit: query.limit(),
        })
    }

    /// Replace the header list. Editing invalidates any earlier pricing, so
    /// the quotation falls back to draft.
    pub fn update_headers(
        &self,
        id: &QuotationId,
        headers: Vec<HeaderSelection>,
    ) -> Result<QuotationChange, QuotationServiceError> {
        let mut record = self.editable(id)?;
        let (headers, dropped) = rebuild_headers(headers);

        record.service_summary = service_summary(&headers);
        record.headers = headers;
        record.pricing = None;
        record.status = QuotationStatus::Draft;
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        Ok(QuotationChange { record, dropped })
    }

    /// Price the stored selection (or a replacement one) and persist the
    /// full response with the discount inputs that produced it.
    pub fn price(
        &self,
        id: &QuotationId,
        update: PricingUpdate,
    ) -> Result<QuotationChange, QuotationServiceError> {
        let mut record = self.editable(id)?;
        let dropped = match update.headers {
            Some(headers) => {
                let (headers, dropped) = rebuild_headers(headers);
                record.service_summary = service_summary(&headers);
                record.headers = headers;
                dropped
            }
            None => ConflictReport::default(),
        };

        let request = PricingRequest {
            developer_type: Some(record.project.developer_type.clone()),
            project_region: Some(record.project.project_region.clone()),
            plot_area: Some(NumericInput::Number(record.project.plot_area)),
            headers: record.headers.clone(),
            discount_amount: update.discount_amount,
            discount_percent: update.discount_percent,
        };
        let pricing = self.engine.quote(&request)?;
        if !pricing.warnings.is_empty() {
            warn!(
                quotation_id = %record.id,
                warnings = pricing.warnings.len(),
                "quotation priced with missing rates"
            );
        }

        record.pricing = Some(pricing);
        record.discount = DiscountInput {
            discount_amount: update.discount_amount,
            discount_percent: update.discount_percent,
        };
        record.status = QuotationStatus::Priced;
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        info!(quotation_id = %record.id, "quotation priced");
        Ok(QuotationChange { record, dropped })
    }

    /// Record terms acceptance. Only priced quotations can be completed;
    /// completed ones may have their custom terms revised.
    pub fn complete(
        &self,
        id: &QuotationId,
        terms: TermsAcceptance,
    ) -> Result<QuotationRecord, QuotationServiceError> {
        let mut record = self.get(id)?;
        if record.pricing.is_none() {
            return Err(QuotationServiceError::NotPriced(record.id));
        }
        if !terms.terms_accepted {
            return Err(QuotationServiceError::TermsNotAccepted);
        }

        record.terms = terms.normalized();
        record.status = QuotationStatus::Completed;
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        info!(quotation_id = %record.id, "quotation completed");
        Ok(record)
    }

    fn editable(&self, id: &QuotationId) -> Result<QuotationRecord, QuotationServiceError> {
        let record = self.get(id)?;
        if record.status == QuotationStatus::Completed {
            return Err(QuotationServiceError::Completed(record.id));
        }
        Ok(record)
    }
}

fn rebuild_headers(headers: Vec<HeaderSelection>) -> (Vec<HeaderSelection>, ConflictReport) {
    let (draft, dropped) = QuotationDraft::from_selection(headers);
    if dropped.has_conflicts {
        warn!(
            dropped = dropped.conflicts.len(),
            "duplicate sub-services dropped from header list"
        );
    }
    (draft.to_selection(), dropped)
}

/// Error raised by the quotation service.
#[derive(Debug, thiserror::Error)]
pub enum QuotationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("quotation {0} is completed and can no longer be changed")]
    Completed(QuotationId),
    #[error("quotation {0} must be priced before its terms can be accepted")]
    NotPriced(QuotationId),
    #[error("terms must be accepted to complete a quotation")]
    TermsNotAccepted,
}
