use super::classifier::{PlotAreaBand, PricingLocation};
use super::discount::finalize;
use super::engine::{
    HeaderBreakdown, HeaderSelection, PricingContext, PricingEngine, PricingWarning,
};
use serde::{Deserialize, Serialize};

/// Numeric field that clients send either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().replace(',', "").parse::<f64>().ok(),
        }
    }

    pub fn raw(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    #[serde(default)]
    pub developer_type: Option<String>,
    #[serde(default)]
    pub project_region: Option<String>,
    #[serde(default)]
    pub plot_area: Option<NumericInput>,
    #[serde(default)]
    pub headers: Vec<HeaderSelection>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("plot area must be a finite, non-negative number (got {0:?})")]
    InvalidPlotArea(String),
    #[error("{0} must be a finite, non-negative number")]
    InvalidDiscount(&'static str),
}

/// Checks a raw plot area before it is banded.
pub fn validate_plot_area(area: f64) -> Result<f64, ValidationError> {
    if area.is_finite() && area >= 0.0 {
        Ok(area)
    } else {
        Err(ValidationError::InvalidPlotArea(area.to_string()))
    }
}

pub(crate) fn validate_discount(
    value: Option<f64>,
    field: &'static str,
) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(ValidationError::InvalidDiscount(field))
        }
        other => Ok(other),
    }
}

impl PricingRequest {
    /// Validates the required keys and classifies them. A blank region is
    /// allowed and falls back to `ROM`; a missing one is not.
    pub fn context(&self) -> Result<PricingContext, ValidationError> {
        let developer_type = self
            .developer_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::MissingField("developerType"))?;
        let region = self
            .project_region
            .as_deref()
            .ok_or(ValidationError::MissingField("projectRegion"))?;
        let raw_area = self
            .plot_area
            .as_ref()
            .ok_or(ValidationError::MissingField("plotArea"))?;
        let area = raw_area
            .parse()
            .ok_or_else(|| ValidationError::InvalidPlotArea(raw_area.raw()))
            .and_then(validate_plot_area)?;

        validate_discount(self.discount_amount, "discountAmount")?;
        validate_discount(self.discount_percent, "discountPercent")?;

        Ok(PricingContext::classify(developer_type, region, area))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub breakdown: Vec<HeaderBreakdown>,
    pub subtotal: u64,
    pub discount: u64,
    pub subtotal_after_discount: u64,
    pub tax: u64,
    pub total: u64,
    pub discount_percent: f64,
    pub developer_type: String,
    pub location: PricingLocation,
    pub plot_area_band: PlotAreaBand,
    pub warnings: Vec<PricingWarning>,
}

impl PricingEngine {
    /// Validates, prices and finalizes a request. Validation failures abort
    /// with no partial result; missing rates come back as warnings.
    pub fn quote(&self, request: &PricingRequest) -> Result<PricingResponse, ValidationError> {
        let context = request.context()?;
        let breakdown = self.price_selection(&context, &request.headers);
        let totals = finalize(
            breakdown.subtotal,
            request.discount_amount,
            request.discount_percent,
        );

        Ok(PricingResponse {
            breakdown: breakdown.headers,
            subtotal: totals.subtotal,
            discount: totals.discount,
            subtotal_after_discount: totals.subtotal_after_discount,
            tax: totals.tax,
            total: totals.total,
            discount_percent: totals.effective_percent,
            developer_type: context.developer_type,
            location: context.location,
            plot_area_band: context.plot_area_band,
            warnings: breakdown.warnings,
        })
    }
}
