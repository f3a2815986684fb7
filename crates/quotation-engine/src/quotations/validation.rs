use regex::Regex;
use std::sync::OnceLock;

use super::domain::{ProjectDetails, QuotationSubmission};
use crate::pricing::{normalize_developer_type, validate_plot_area};

/// Validation errors raised while accepting a quotation intake form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("plot area must be a finite, non-negative number (got {0:?})")]
    InvalidPlotArea(String),
    #[error("RERA number should look like ABC-123456 or P517-201234 (got {0:?})")]
    InvalidReraNumber(String),
    #[error("contact mobile must be a 10 digit Indian mobile number (got {0:?})")]
    InvalidMobile(String),
    #[error("contactMobile is required for agent quotations")]
    AgentMobileRequired,
    #[error("contact email is not a valid address (got {0:?})")]
    InvalidEmail(String),
}

fn rera_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9]{3,5}-[A-Z0-9]{6,10}$").expect("rera pattern compiles")
    })
}

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[6-9]\d{9}$").expect("mobile pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Turns raw intake forms into validated `ProjectDetails`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn project_from_submission(
        &self,
        submission: QuotationSubmission,
    ) -> Result<ProjectDetails, IntakeViolation> {
        let developer_type = non_blank(submission.developer_type)
            .ok_or(IntakeViolation::MissingField("developerType"))?;
        let project_region = non_blank(submission.project_region)
            .ok_or(IntakeViolation::MissingField("projectRegion"))?;
        let raw_area = submission
            .plot_area
            .ok_or(IntakeViolation::MissingField("plotArea"))?;
        let plot_area = raw_area
            .parse()
            .and_then(|area| validate_plot_area(area).ok())
            .ok_or_else(|| IntakeViolation::InvalidPlotArea(raw_area.raw()))?;
        let developer_name = non_blank(submission.developer_name)
            .ok_or(IntakeViolation::MissingField("developerName"))?;

        let rera_number = non_blank(submission.rera_number)
            .map(|number| {
                if rera_pattern().is_match(&number) {
                    Ok(number.to_ascii_uppercase())
                } else {
                    Err(IntakeViolation::InvalidReraNumber(number))
                }
            })
            .transpose()?;

        let contact_mobile = non_blank(submission.contact_mobile)
            .map(|mobile| {
                let digits: String = mobile.chars().filter(|c| !c.is_whitespace()).collect();
                if mobile_pattern().is_match(&digits) {
                    Ok(digits)
                } else {
                    Err(IntakeViolation::InvalidMobile(mobile))
                }
            })
            .transpose()?;

        if normalize_developer_type(&developer_type) == "Agent" && contact_mobile.is_none() {
            return Err(IntakeViolation::AgentMobileRequired);
        }

        let contact_email = non_blank(submission.contact_email)
            .map(|email| {
                if email_pattern().is_match(&email) {
                    Ok(email)
                } else {
                    Err(IntakeViolation::InvalidEmail(email))
                }
            })
            .transpose()?;

        Ok(ProjectDetails {
            developer_type,
            project_region,
            project_location: non_blank(submission.project_location),
            plot_area,
            developer_name,
            project_name: non_blank(submission.project_name),
            rera_number,
            contact_mobile,
            contact_email,
            validity: submission.validity.unwrap_or_default(),
            payment_schedule: submission.payment_schedule.unwrap_or_default(),
        })
    }
}
