//! Rate-card pricing core: classification of raw inputs, the rate table,
//! the service catalogue with its package tiers, the pricing engine and the
//! duplicate-selection bookkeeping behind quotation drafts.

pub mod agent;
pub mod catalog;
pub mod classifier;
pub mod discount;
pub mod draft;
pub mod engine;
pub mod guard;
pub mod packages;
pub mod quote;
pub mod rates;

pub use agent::{
    price_agent_selection, AgentLine, AgentPriceList, AgentPricingRequest, AgentPricingResponse,
    AgentQuote, AgentSelection, AgentType, HprOption, RegistrationOption, RenewalOption,
};
pub use catalog::{
    all_sub_service_ids, HeaderDefinition, HeaderKind, PackageTier, ServiceCatalog,
    ServiceCategory, ServiceDefinition, SubServiceDefinition,
};
pub use classifier::{
    map_region_to_location, normalize_developer_type, plot_area_to_band, PlotAreaBand,
    PricingLocation,
};
pub use discount::{
    finalize, percent_of, round2, DiscountKind, DiscountState, FinalTotals, TAX_RATE_PERCENT,
};
pub use draft::{ConflictPolicy, DraftError, QuotationDraft, SelectionOutcome};
pub use engine::{
    HeaderBreakdown, HeaderSelection, PricingBreakdown, PricingContext, PricingEngine,
    PricingWarning, ServiceLine, ServiceSelection, SubServiceRef, SUB_SERVICE_RATE_PERCENT,
};
pub use guard::{ConflictReport, DuplicateGuard, SubServiceConflict, SubServiceLocation};
pub use packages::PackageExpander;
pub use quote::{validate_plot_area, NumericInput, PricingRequest, PricingResponse, ValidationError};
pub use rates::{RateLoadError, RateLoadStats, RateRecord, RateRow, RateTable, ServiceRate};
