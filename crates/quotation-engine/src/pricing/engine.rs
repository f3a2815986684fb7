use super::classifier::{
    map_region_to_location, normalize_developer_type, plot_area_to_band, PlotAreaBand,
    PricingLocation,
};
use super::discount::percent_of;
use super::rates::RateTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Each selected sub-service adds this share of the service's base rate.
pub const SUB_SERVICE_RATE_PERCENT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSubService")]
pub struct SubServiceRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SubServiceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
        }
    }

    pub fn with_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
        }
    }

    pub fn label(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.id)
    }
}

// Clients send sub-services either as bare strings or as objects carrying
// an id, a text, or both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSubService {
    Bare(String),
    Object {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RawSubService> for SubServiceRef {
    fn from(raw: RawSubService) -> Self {
        match raw {
            RawSubService::Bare(id) => Self::new(id),
            RawSubService::Object { id, text, name } => {
                let text = text.or(name);
                let id = id.or_else(|| text.clone()).unwrap_or_default();
                Self { id, text }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSelection {
    #[serde(alias = "label", alias = "service")]
    pub name: String,
    #[serde(default)]
    pub sub_services: Vec<SubServiceRef>,
}

impl ServiceSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_services: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSelection {
    #[serde(alias = "header")]
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServiceSelection>,
}

impl HeaderSelection {
    pub fn new(name: impl Into<String>, services: Vec<ServiceSelection>) -> Self {
        Self {
            name: name.into(),
            services,
        }
    }
}

/// The three rate-card keys shared by every line of one quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingContext {
    pub developer_type: String,
    pub location: PricingLocation,
    pub plot_area_band: PlotAreaBand,
}

impl PricingContext {
    pub fn new(
        developer_type: &str,
        location: PricingLocation,
        plot_area_band: PlotAreaBand,
    ) -> Self {
        Self {
            developer_type: normalize_developer_type(developer_type),
            location,
            plot_area_band,
        }
    }

    /// Classifies raw intake values. The plot area must already be validated.
    pub fn classify(developer_type: &str, project_region: &str, plot_area: f64) -> Self {
        Self::new(
            developer_type,
            map_region_to_location(project_region),
            plot_area_to_band(plot_area),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PricingWarning {
    #[serde(rename_all = "camelCase")]
    MissingRate {
        header: String,
        service: String,
        developer_type: String,
        location: String,
        plot_area_band: String,
    },
}

impl PricingWarning {
    pub fn message(&self) -> String {
        match self {
            Self::MissingRate {
                service,
                developer_type,
                location,
                plot_area_band,
                ..
            } => format!(
                "no rate for \"{service}\" ({developer_type}, {location}, {plot_area_band}); priced at 0"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub service_name: String,
    pub sub_services: Vec<SubServiceRef>,
    pub sub_service_count: usize,
    pub base_amount: u64,
    pub sub_service_rate: u64,
    pub sub_service_amount: u64,
    pub total_amount: u64,
    /// False when no rate row matched and the line was priced at zero.
    pub rate_found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderBreakdown {
    pub header: String,
    pub services: Vec<ServiceLine>,
    pub header_total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub headers: Vec<HeaderBreakdown>,
    pub subtotal: u64,
    pub warnings: Vec<PricingWarning>,
}

impl PricingBreakdown {
    pub fn service_count(&self) -> usize {
        self.headers.iter().map(|header| header.services.len()).sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = (&str, &ServiceLine)> {
        self.headers.iter().flat_map(|header| {
            header
                .services
                .iter()
                .map(move |line| (header.header.as_str(), line))
        })
    }
}

/// Prices selections against a shared, read-only rate table.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rates: Arc<RateTable>,
}

impl PricingEngine {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Missing rates price the line at zero and add a warning. Never fails.
    pub fn price_selection(
        &self,
        context: &PricingContext,
        headers: &[HeaderSelection],
    ) -> PricingBreakdown {
        let mut breakdown = PricingBreakdown::default();

        for header in headers {
            let mut priced = HeaderBreakdown {
                header: header.name.clone(),
                services: Vec::with_capacity(header.services.len()),
                header_total: 0,
            };

            for service in &header.services {
                let line = self.price_service(context, service);
                if !line.rate_found {
                    warn!(
                        header = %header.name,
                        service = %service.name,
                        developer_type = %context.developer_type,
                        location = %context.location,
                        plot_area_band = %context.plot_area_band,
                        "no matching rate; service priced at zero"
                    );
                    breakdown.warnings.push(PricingWarning::MissingRate {
                        header: header.name.clone(),
                        service: line.service_name.clone(),
                        developer_type: context.developer_type.clone(),
                        location: context.location.label().to_string(),
                        plot_area_band: context.plot_area_band.label().to_string(),
                    });
                }
                priced.header_total = priced.header_total.saturating_add(line.total_amount);
                priced.services.push(line);
            }

            breakdown.subtotal = breakdown.subtotal.saturating_add(priced.header_total);
            breakdown.headers.push(priced);
        }

        breakdown
    }

    fn price_service(&self, context: &PricingContext, service: &ServiceSelection) -> ServiceLine {
        let service_name = service.name.trim().to_string();
        let rate = self.rates.lookup(
            &context.developer_type,
            context.location.label(),
            context.plot_area_band.label(),
            &service_name,
        );
        let base_amount = rate.unwrap_or(0);
        let sub_service_count = service.sub_services.len();
        let sub_service_rate = percent_of(base_amount, SUB_SERVICE_RATE_PERCENT);
        let sub_service_amount = sub_service_rate.saturating_mul(sub_service_count as u64);

        ServiceLine {
            service_name,
            sub_services: service.sub_services.clone(),
            sub_service_count,
            base_amount,
            sub_service_rate,
            sub_service_amount,
            total_amount: base_amount.saturating_add(sub_service_amount),
            rate_found: rate.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::rates::RateRow;

    fn engine(rows: Vec<RateRow>) -> PricingEngine {
        PricingEngine::new(Arc::new(RateTable::load(rows)))
    }

    fn context() -> PricingContext {
        PricingContext::classify("cat1", "Thane", 1200.0)
    }

    fn service(name: &str, subs: &[&str]) -> ServiceSelection {
        ServiceSelection {
            name: name.to_string(),
            sub_services: subs.iter().map(|id| SubServiceRef::new(*id)).collect(),
        }
    }

    #[test]
    fn prices_base_and_sub_services() {
        let engine = engine(vec![RateRow::new(
            "Category 1",
            "Mumbai Suburban",
            "1001-1500",
            "PROJECT REGISTRATION SERVICES",
            "10000",
        )]);
        let headers = vec![HeaderSelection::new(
            "Project Registration",
            vec![service("PROJECT REGISTRATION SERVICES", &["a", "b"])],
        )];

        let breakdown = engine.price_selection(&context(), &headers);
        let line = &breakdown.headers[0].services[0];
        assert_eq!(line.base_amount, 10_000);
        assert_eq!(line.sub_service_rate, 1_000);
        assert_eq!(line.sub_service_count, 2);
        assert_eq!(line.sub_service_amount, 2_000);
        assert_eq!(line.total_amount, 12_000);
        assert!(line.rate_found);
        assert_eq!(breakdown.headers[0].header_total, 12_000);
        assert_eq!(breakdown.subtotal, 12_000);
        assert!(breakdown.warnings.is_empty());
    }

    #[test]
    fn sub_service_rate_rounds_ties_away_from_zero() {
        let engine = engine(vec![
            RateRow::new("cat1", "Mumbai Suburban", "1001-1500", "Tie", "15"),
            RateRow::new("cat1", "Mumbai Suburban", "1001-1500", "Below", "14"),
        ]);
        let headers = vec![HeaderSelection::new(
            "Custom",
            vec![service("Tie", &["t"]), service("Below", &["b"])],
        )];

        let breakdown = engine.price_selection(&context(), &headers);
        assert_eq!(breakdown.headers[0].services[0].sub_service_rate, 2);
        assert_eq!(breakdown.headers[0].services[1].sub_service_rate, 1);
    }

    #[test]
    fn missing_rate_prices_at_zero_with_warning() {
        let engine = engine(Vec::new());
        let headers = vec![HeaderSelection::new(
            "Project Compliance",
            vec![service("Project Closure", &["x", "y", "z"])],
        )];

        let breakdown = engine.price_selection(&context(), &headers);
        let line = &breakdown.headers[0].services[0];
        assert_eq!(line.base_amount, 0);
        assert_eq!(line.sub_service_amount, 0);
        assert_eq!(line.total_amount, 0);
        assert!(!line.rate_found);
        assert_eq!(breakdown.warnings.len(), 1);
        assert!(breakdown.warnings[0].message().contains("Project Closure"));
    }

    #[test]
    fn oversized_rate_cells_price_without_overflow() {
        let engine = engine(vec![
            RateRow::new("cat1", "Mumbai Suburban", "1001-1500", "Big", "1e19"),
            RateRow::new("cat1", "Mumbai Suburban", "1001-1500", "Typo", "1e30"),
            RateRow::new("cat1", "Mumbai Suburban", "1001-1500", "Ceiling", "1000000000000"),
        ]);
        let headers = vec![HeaderSelection::new(
            "Custom",
            vec![
                service("Big", &["a", "b"]),
                service("Typo", &["c"]),
                service("Ceiling", &["d", "e", "f"]),
            ],
        )];

        let breakdown = engine.price_selection(&context(), &headers);
        let lines = &breakdown.headers[0].services;
        assert_eq!(lines[0].total_amount, 0);
        assert_eq!(lines[1].total_amount, 0);
        assert_eq!(lines[2].sub_service_rate, 100_000_000_000);
        assert_eq!(lines[2].total_amount, 1_300_000_000_000);
        assert_eq!(breakdown.subtotal, 1_300_000_000_000);
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let engine = engine(Vec::new());
        let breakdown = engine.price_selection(&context(), &[]);
        assert_eq!(breakdown, PricingBreakdown::default());

        let empty_header = [HeaderSelection::new("Legal Consultation", vec![])];
        let breakdown = engine.price_selection(&context(), &empty_header);
        assert_eq!(breakdown.subtotal, 0);
        assert_eq!(breakdown.headers[0].header_total, 0);
    }

    #[test]
    fn service_names_are_trimmed_before_lookup() {
        let engine = engine(vec![RateRow::new(
            "cat1",
            "Mumbai Suburban",
            "1001-1500",
            "LEGAL CONSULTATION",
            "5000",
        )]);
        let headers = vec![HeaderSelection::new(
            "Legal Consultation",
            vec![service("  LEGAL CONSULTATION  ", &[])],
        )];
        let breakdown = engine.price_selection(&context(), &headers);
        assert_eq!(breakdown.subtotal, 5_000);
        assert_eq!(breakdown.headers[0].services[0].service_name, "LEGAL CONSULTATION");
    }

    #[test]
    fn sub_services_deserialize_from_strings_and_objects() {
        let selection: ServiceSelection = serde_json::from_value(serde_json::json!({
            "label": "Project Closure",
            "subServices": ["project-closure-1", {"id": "project-closure-2", "text": "Consultation"}, {"name": "Uploading"}]
        }))
        .expect("selection parses");

        assert_eq!(selection.name, "Project Closure");
        assert_eq!(selection.sub_services[0], SubServiceRef::new("project-closure-1"));
        assert_eq!(selection.sub_services[1].label(), "Consultation");
        assert_eq!(selection.sub_services[2].id, "Uploading");
    }
}
