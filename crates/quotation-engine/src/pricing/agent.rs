//! Fixed-price registration services for real-estate agents. Unlike project
//! quotations these do not go through the rate card.

use super::discount::{finalize, FinalTotals};
use super::quote::{validate_discount, ValidationError};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    Individual,
    Proprietary,
    #[serde(rename = "Private Ltd")]
    PrivateLimited,
    #[serde(rename = "LLP")]
    LimitedLiabilityPartnership,
    Partnership,
    Others,
}

impl AgentType {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Individual,
            Self::Proprietary,
            Self::PrivateLimited,
            Self::LimitedLiabilityPartnership,
            Self::Partnership,
            Self::Others,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Proprietary => "Proprietary",
            Self::PrivateLimited => "Private Ltd",
            Self::LimitedLiabilityPartnership => "LLP",
            Self::Partnership => "Partnership",
            Self::Others => "Others",
        }
    }

    /// Unknown labels price as `Individual`.
    pub fn from_label(value: &str) -> Self {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|agent| agent.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or(Self::Individual)
    }

    pub const fn price_list(self) -> AgentPriceList {
        match self {
            Self::Individual => INDIVIDUAL,
            Self::Proprietary => AgentPriceList {
                registration_only_rera: 5000,
                renewal_only_rera: 5000,
                ..INDIVIDUAL
            },
            Self::PrivateLimited
            | Self::LimitedLiabilityPartnership
            | Self::Partnership
            | Self::Others => ENTITY,
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPriceList {
    pub training: u64,
    pub exam: u64,
    pub government_fees: u64,
    pub registration_only_training_exam: u64,
    pub registration_only_rera: u64,
    pub registration_with_training_exam: u64,
    pub renewal_only_rera: u64,
    pub renewal_with_training_exam: u64,
    pub scrutiny_assistance: u64,
    pub hpr_nil: u64,
    pub hpr_up_to_50: u64,
    pub deregistration: u64,
    pub correction: u64,
}

const INDIVIDUAL: AgentPriceList = AgentPriceList {
    training: 5900,
    exam: 1500,
    government_fees: 11121,
    registration_only_training_exam: 2500,
    registration_only_rera: 4000,
    registration_with_training_exam: 7000,
    renewal_only_rera: 4000,
    renewal_with_training_exam: 7000,
    scrutiny_assistance: 3000,
    hpr_nil: 1500,
    hpr_up_to_50: 2500,
    deregistration: 3000,
    correction: 2500,
};

const ENTITY: AgentPriceList = AgentPriceList {
    government_fees: 101121,
    registration_only_rera: 10000,
    registration_with_training_exam: 15000,
    renewal_only_rera: 10000,
    renewal_with_training_exam: 15000,
    scrutiny_assistance: 7000,
    deregistration: 5000,
    correction: 5000,
    ..INDIVIDUAL
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOption {
    OnlyTrainingExam,
    OnlyRera,
    WithTrainingExam,
}

impl RegistrationOption {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnlyTrainingExam => "Only Training Exam",
            Self::OnlyRera => "Only Rera",
            Self::WithTrainingExam => "With Training Exam",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalOption {
    OnlyRera,
    WithTrainingExam,
}

impl RenewalOption {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnlyRera => "Only Rera",
            Self::WithTrainingExam => "With Training Exam",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HprOption {
    #[serde(rename = "nil")]
    Nil,
    #[serde(rename = "upto_50")]
    UpTo50,
}

impl HprOption {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nil => "NIL",
            Self::UpTo50 => "Up to 50",
        }
    }
}

/// Services ticked on the agent form. Radio groups left blank arrive as
/// empty strings and read as "not selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSelection {
    pub training: bool,
    pub exam: bool,
    #[serde(alias = "govtFees")]
    pub government_fees: bool,
    #[serde(deserialize_with = "blank_as_none")]
    pub registration_professional: Option<RegistrationOption>,
    #[serde(deserialize_with = "blank_as_none")]
    pub renewal: Option<RenewalOption>,
    pub scrutiny_assistance: bool,
    #[serde(deserialize_with = "blank_as_none")]
    pub hpr: Option<HprOption>,
    pub deregistration: bool,
    pub correction: bool,
}

impl AgentSelection {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::deserialize(value.into_deserializer()).map(Some),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLine {
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentQuote {
    pub agent_type: AgentType,
    pub lines: Vec<AgentLine>,
    pub subtotal: u64,
}

pub fn price_agent_selection(agent_type: AgentType, selection: &AgentSelection) -> AgentQuote {
    let prices = agent_type.price_list();
    let mut lines = Vec::new();
    let mut push = |name: String, price: u64| lines.push(AgentLine { name, price });

    if selection.training {
        push("Training".into(), prices.training);
    }
    if selection.exam {
        push("Exam".into(), prices.exam);
    }
    if selection.government_fees {
        push("Government Fees".into(), prices.government_fees);
    }
    if selection.scrutiny_assistance {
        push("Scrutiny Assistance".into(), prices.scrutiny_assistance);
    }
    if selection.deregistration {
        push("Deregistration".into(), prices.deregistration);
    }
    if selection.correction {
        push("Correction".into(), prices.correction);
    }
    if let Some(option) = selection.registration_professional {
        let price = match option {
            RegistrationOption::OnlyTrainingExam => prices.registration_only_training_exam,
            RegistrationOption::OnlyRera => prices.registration_only_rera,
            RegistrationOption::WithTrainingExam => prices.registration_with_training_exam,
        };
        push(format!("Registration & Professional ({})", option.label()), price);
    }
    if let Some(option) = selection.renewal {
        let price = match option {
            RenewalOption::OnlyRera => prices.renewal_only_rera,
            RenewalOption::WithTrainingExam => prices.renewal_with_training_exam,
        };
        push(format!("Renewal ({})", option.label()), price);
    }
    if let Some(option) = selection.hpr {
        let price = match option {
            HprOption::Nil => prices.hpr_nil,
            HprOption::UpTo50 => prices.hpr_up_to_50,
        };
        push(format!("HPR ({})", option.label()), price);
    }

    let subtotal = lines.iter().map(|line| line.price).sum();
    AgentQuote {
        agent_type,
        lines,
        subtotal,
    }
}

/// Body of the agent pricing endpoint. The agent type arrives as a free-form
/// label so unknown values can fall back to `Individual`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentPricingRequest {
    pub agent_type: String,
    pub selection: AgentSelection,
    pub discount_amount: Option<f64>,
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPricingResponse {
    pub agent_type: AgentType,
    pub lines: Vec<AgentLine>,
    #[serde(flatten)]
    pub totals: FinalTotals,
}

impl AgentPricingRequest {
    pub fn quote(&self) -> Result<AgentPricingResponse, ValidationError> {
        validate_discount(self.discount_amount, "discountAmount")?;
        validate_discount(self.discount_percent, "discountPercent")?;

        let quote = price_agent_selection(AgentType::from_label(&self.agent_type), &self.selection);
        let totals = finalize(quote.subtotal, self.discount_amount, self.discount_percent);
        Ok(AgentPricingResponse {
            agent_type: quote.agent_type,
            lines: quote.lines,
            totals,
        })
    }
}
