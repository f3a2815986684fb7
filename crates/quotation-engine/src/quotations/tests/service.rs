use super::common::*;
use crate::pricing::{NumericInput, PlotAreaBand, PricingLocation, ValidationError};
use crate::quotations::domain::{
    ListQuery, PaymentSchedule, PricingUpdate, QuotationId, QuotationStatus, TermsAcceptance,
};
use crate::quotations::repository::{QuotationRepository, RepositoryError};
use crate::quotations::validation::IntakeViolation;
use crate::quotations::{QuotationService, QuotationServiceError};
use std::sync::Arc;

fn ten_percent() -> PricingUpdate {
    PricingUpdate {
        discount_percent: Some(10.0),
        ..PricingUpdate::default()
    }
}

#[test]
fn create_stores_a_normalized_draft() {
    let (service, repository) = build_service();

    let change = service.create(submission()).expect("submission accepted");
    let record = change.record;

    assert!(!change.dropped.has_conflicts);
    assert_eq!(record.status, QuotationStatus::Draft);
    assert!(record.id.as_str().starts_with("QUO-"));
    assert_eq!(record.project.rera_number.as_deref(), Some("P517-201234"));
    assert_eq!(record.project.contact_mobile.as_deref(), Some("9876543210"));
    assert_eq!(record.project.payment_schedule, PaymentSchedule::Half);
    assert_eq!(
        record.service_summary,
        "Project Registration: PROJECT REGISTRATION SERVICES"
    );
    assert!(record.pricing.is_none());

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, record);
}

#[test]
fn create_propagates_intake_violations() {
    let (service, repository) = build_service();
    let mut missing_name = submission();
    missing_name.developer_name = Some("   ".to_string());

    match service.create(missing_name) {
        Err(QuotationServiceError::Intake(IntakeViolation::MissingField("developerName"))) => {}
        other => panic!("expected missing developer name, got {other:?}"),
    }
    assert!(repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .is_empty());
}

#[test]
fn create_drops_duplicate_sub_services() {
    let (service, _) = build_service();
    let mut submission = submission();
    submission.headers = duplicate_headers();

    let change = service.create(submission).expect("submission accepted");

    assert_eq!(
        change.dropped.conflicting_ids().collect::<Vec<_>>(),
        vec!["project-registration-services-2"]
    );
    let custom = &change.record.headers[1].services[0];
    assert_eq!(custom.sub_services.len(), 1);
    assert_eq!(custom.sub_services[0].id, "project-registration-services-3");
}

#[test]
fn price_persists_the_full_response() {
    let (service, repository) = build_service();
    let record = service.create(submission()).expect("created").record;

    let priced = service.price(&record.id, ten_percent()).expect("priced").record;

    assert_eq!(priced.status, QuotationStatus::Priced);
    assert_eq!(priced.discount.discount_percent, Some(10.0));
    let pricing = priced.pricing.as_ref().expect("pricing stored");
    assert_eq!(pricing.location, PricingLocation::MumbaiSuburban);
    assert_eq!(pricing.plot_area_band, PlotAreaBand::UpTo1500);
    assert_eq!(pricing.subtotal, 12_000);
    assert_eq!(pricing.discount, 1_200);
    assert_eq!(pricing.tax, 1_944);
    assert_eq!(pricing.total, 12_744);

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.pricing, priced.pricing);
}

#[test]
fn price_can_replace_the_selection() {
    let (service, _) = build_service();
    let record = service.create(submission()).expect("created").record;

    let change = service
        .price(
            &record.id,
            PricingUpdate {
                headers: Some(duplicate_headers()),
                discount_amount: Some(500.0),
                discount_percent: Some(50.0),
            },
        )
        .expect("priced");

    assert!(change.dropped.has_conflicts);
    let pricing = change.record.pricing.expect("pricing stored");
    // 10000 + 2 * 1000 in the first header, 10000 + 1000 in the second.
    assert_eq!(pricing.subtotal, 23_000);
    assert_eq!(pricing.discount, 500);
    assert_eq!(pricing.breakdown.len(), 2);
}

#[test]
fn editing_headers_resets_pricing() {
    let (service, _) = build_service();
    let record = service.create(submission()).expect("created").record;
    service.price(&record.id, ten_percent()).expect("priced");

    let change = service
        .update_headers(
            &record.id,
            vec![registration_header(&["project-registration-services-4"])],
        )
        .expect("headers updated");

    assert_eq!(change.record.status, QuotationStatus::Draft);
    assert!(change.record.pricing.is_none());
    assert_eq!(
        change.record.headers[0].services[0].sub_services[0].id,
        "project-registration-services-4"
    );
}

#[test]
fn complete_requires_pricing_and_acceptance() {
    let (service, _) = build_service();
    let record = service.create(submission()).expect("created").record;
    let accepted = TermsAcceptance {
        terms_accepted: true,
        custom_terms: vec!["".to_string(), "Site visits billed at actuals".to_string()],
    };

    assert!(matches!(
        service.complete(&record.id, accepted.clone()),
        Err(QuotationServiceError::NotPriced(_))
    ));

    service.price(&record.id, ten_percent()).expect("priced");
    assert!(matches!(
        service.complete(&record.id, TermsAcceptance::default()),
        Err(QuotationServiceError::TermsNotAccepted)
    ));

    let completed = service.complete(&record.id, accepted).expect("completed");
    assert_eq!(completed.status, QuotationStatus::Completed);
    assert_eq!(
        completed.terms.custom_terms,
        vec!["Site visits billed at actuals"]
    );

    assert!(matches!(
        service.update_headers(&record.id, Vec::new()),
        Err(QuotationServiceError::Completed(_))
    ));
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();
    match service.get(&QuotationId::from("QUO-20240101-DEADBEEF")) {
        Err(QuotationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn failed_writes_leave_prior_state_intact() {
    let (seed, repository) = build_service();
    let record = seed.create(submission()).expect("created").record;

    let service = QuotationService::new(
        Arc::new(ReadOnlyRepository(repository.as_ref().clone())),
        engine(),
    );
    match service.price(&record.id, ten_percent()) {
        Err(QuotationServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository, got {other:?}"),
    }

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, record);
}

#[test]
fn list_searches_and_pages_newest_first() {
    let (service, _) = build_service();
    let mut ids = Vec::new();
    for name in ["Harbour Residency", "Skyline Towers", "Skyline Annex"] {
        let mut form = submission();
        form.project_name = Some(name.to_string());
        ids.push(service.create(form).expect("created").record.id);
    }

    let page = service
        .list(&ListQuery {
            search: Some("skyline".to_string()),
            page: Some(1),
            limit: Some(1),
        })
        .expect("list succeeds");
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_ne!(page.items[0].project_name.as_deref(), Some("Harbour Residency"));

    let everything = service.list(&ListQuery::default()).expect("list succeeds");
    assert_eq!(everything.total, 3);
    assert!(everything
        .items
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let by_id = service
        .list(&ListQuery {
            search: Some(ids[0].as_str().to_lowercase()),
            ..ListQuery::default()
        })
        .expect("list succeeds");
    assert_eq!(by_id.total, 1);
}

#[test]
fn calculate_validates_before_pricing() {
    let (service, _) = build_service();
    let request = crate::pricing::PricingRequest {
        developer_type: Some("cat1".to_string()),
        project_region: Some("Thane".to_string()),
        plot_area: Some(NumericInput::Text("-1".to_string())),
        ..Default::default()
    };
    assert!(matches!(
        service.calculate(&request),
        Err(QuotationServiceError::Validation(ValidationError::InvalidPlotArea(_)))
    ));
}

#[test]
fn available_services_lists_rates_for_the_triple() {
    let (service, _) = build_service();
    let view = service
        .available_services(
            Some("Category 1"),
            Some("Palghar"),
            Some(NumericInput::Text("1,100".to_string())),
        )
        .expect("rates listed");
    assert_eq!(view.context.developer_type, "Category 1");
    let names: Vec<&str> = view.services.iter().map(|rate| rate.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "PROJECT REGISTRATION SERVICES",
            "LEGAL CONSULTATION",
            "Project Closure"
        ]
    );
    assert_eq!(view.services[1].amount, 5_000);
}

#[test]
fn unavailable_repository_surfaces_errors() {
    let service = QuotationService::new(Arc::new(UnavailableRepository), engine());
    assert!(matches!(
        service.create(submission()),
        Err(QuotationServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.list(&ListQuery::default()),
        Err(QuotationServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
