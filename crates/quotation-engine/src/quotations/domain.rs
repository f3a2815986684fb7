use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pricing::{HeaderSelection, NumericInput, PricingResponse};

/// Identifier of a stored quotation, e.g. `QUO-20240315-7F3A9C01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuotationId(pub String);

impl QuotationId {
    pub fn generate(issued_on: NaiveDate) -> Self {
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "QUO-{}-{}",
            issued_on.format("%Y%m%d"),
            random[..8].to_ascii_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuotationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Draft,
    Priced,
    Completed,
}

impl QuotationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Priced => "priced",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotationValidity {
    #[default]
    #[serde(rename = "7 days")]
    SevenDays,
    #[serde(rename = "15 days")]
    FifteenDays,
    #[serde(rename = "30 days")]
    ThirtyDays,
}

impl QuotationValidity {
    pub const fn days(self) -> u32 {
        match self {
            Self::SevenDays => 7,
            Self::FifteenDays => 15,
            Self::ThirtyDays => 30,
        }
    }
}

/// Share of the fee collected up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentSchedule {
    #[default]
    #[serde(rename = "50%")]
    Half,
    #[serde(rename = "70%")]
    SeventyPercent,
    #[serde(rename = "100%")]
    Full,
}

impl PaymentSchedule {
    pub const fn upfront_percent(self) -> u8 {
        match self {
            Self::Half => 50,
            Self::SeventyPercent => 70,
            Self::Full => 100,
        }
    }
}

/// Intake form as posted by the client. Every field is optional on the wire
/// so missing keys surface as intake violations rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotationSubmission {
    pub developer_type: Option<String>,
    pub project_region: Option<String>,
    pub project_location: Option<String>,
    pub plot_area: Option<NumericInput>,
    pub developer_name: Option<String>,
    pub project_name: Option<String>,
    pub rera_number: Option<String>,
    pub contact_mobile: Option<String>,
    pub contact_email: Option<String>,
    pub validity: Option<QuotationValidity>,
    pub payment_schedule: Option<PaymentSchedule>,
    pub headers: Vec<HeaderSelection>,
}

/// Validated project facts carried by every quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub developer_type: String,
    pub project_region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_location: Option<String>,
    pub plot_area: f64,
    pub developer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rera_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub validity: QuotationValidity,
    pub payment_schedule: PaymentSchedule,
}

/// Discount inputs as last supplied for pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscountInput {
    pub discount_amount: Option<f64>,
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermsAcceptance {
    pub terms_accepted: bool,
    pub custom_terms: Vec<String>,
}

impl TermsAcceptance {
    /// Drops blank custom clauses and trims the rest.
    pub fn normalized(self) -> Self {
        Self {
            terms_accepted: self.terms_accepted,
            custom_terms: self
                .custom_terms
                .into_iter()
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRecord {
    pub id: QuotationId,
    pub status: QuotationStatus,
    pub project: ProjectDetails,
    pub headers: Vec<HeaderSelection>,
    pub service_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingResponse>,
    pub discount: DiscountInput,
    pub terms: TermsAcceptance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuotationRecord {
    /// True when `needle` (already lower-cased) appears in the id, developer
    /// name or project name.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.id.as_str().to_lowercase().contains(needle)
            || self.project.developer_name.to_lowercase().contains(needle)
            || self
                .project
                .project_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }

    pub fn list_item(&self) -> QuotationListItem {
        QuotationListItem {
            id: self.id.clone(),
            status: self.status,
            developer_name: self.project.developer_name.clone(),
            project_name: self.project.project_name.clone(),
            total: self.pricing.as_ref().map(|pricing| pricing.total),
            created_at: self.created_at,
        }
    }
}

/// Row shown in quotation listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationListItem {
    pub id: QuotationId,
    pub status: QuotationStatus,
    pub developer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn needle(&self) -> String {
        self.search
            .as_deref()
            .map(|value| value.trim().to_lowercase())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPage {
    pub items: Vec<QuotationListItem>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Body of `PUT /api/quotations/:id/pricing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingUpdate {
    pub headers: Option<Vec<HeaderSelection>>,
    pub discount_amount: Option<f64>,
    pub discount_percent: Option<f64>,
}
