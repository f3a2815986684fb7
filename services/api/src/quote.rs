use clap::Args;
use quotation_engine::config::AppConfig;
use quotation_engine::error::AppError;
use quotation_engine::pricing::{
    AgentPricingRequest, AgentPricingResponse, AgentSelection, ConflictPolicy, HprOption,
    NumericInput, PackageExpander, PricingEngine, PricingRequest, PricingResponse,
    QuotationDraft, RateTable, RegistrationOption, RenewalOption, ServiceCatalog, SubServiceRef,
    TAX_RATE_PERCENT,
};
use quotation_engine::quotations::{applicable_terms, format_rupees, service_summary};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Developer type, e.g. cat1 or "Category 2"
    #[arg(long)]
    pub(crate) developer_type: String,
    /// Project region as shown on the intake form, e.g. Thane
    #[arg(long)]
    pub(crate) region: String,
    /// Plot area in square metres
    #[arg(long)]
    pub(crate) plot_area: f64,
    /// Header to add; package headers bring their services (repeatable)
    #[arg(long = "header")]
    pub(crate) headers: Vec<String>,
    /// Service to add with all of its sub-services, as "Header=Service" (repeatable)
    #[arg(long = "service")]
    pub(crate) services: Vec<String>,
    /// Flat discount in rupees; wins over --discount-percent
    #[arg(long)]
    pub(crate) discount_amount: Option<f64>,
    /// Discount as a percentage of the subtotal
    #[arg(long)]
    pub(crate) discount_percent: Option<f64>,
    /// Rate card CSV (defaults to RATE_CARD_PATH or the bundled card)
    #[arg(long)]
    pub(crate) rate_card: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Show the services offered under this header instead of the header list
    #[arg(long)]
    pub(crate) header: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AgentArgs {
    /// Individual, Proprietary, Private Ltd, LLP, Partnership or Others
    #[arg(long, default_value = "Individual")]
    pub(crate) agent_type: String,
    #[arg(long)]
    pub(crate) training: bool,
    #[arg(long)]
    pub(crate) exam: bool,
    #[arg(long)]
    pub(crate) government_fees: bool,
    /// only-training-exam, only-rera or with-training-exam
    #[arg(long, value_parser = parse_registration)]
    pub(crate) registration: Option<RegistrationOption>,
    /// only-rera or with-training-exam
    #[arg(long, value_parser = parse_renewal)]
    pub(crate) renewal: Option<RenewalOption>,
    #[arg(long)]
    pub(crate) scrutiny_assistance: bool,
    /// nil or upto-50
    #[arg(long, value_parser = parse_hpr)]
    pub(crate) hpr: Option<HprOption>,
    #[arg(long)]
    pub(crate) deregistration: bool,
    #[arg(long)]
    pub(crate) correction: bool,
    #[arg(long)]
    pub(crate) discount_amount: Option<f64>,
    #[arg(long)]
    pub(crate) discount_percent: Option<f64>,
}

fn parse_registration(raw: &str) -> Result<RegistrationOption, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "only-training-exam" => Ok(RegistrationOption::OnlyTrainingExam),
        "only-rera" => Ok(RegistrationOption::OnlyRera),
        "with-training-exam" => Ok(RegistrationOption::WithTrainingExam),
        other => Err(format!("unknown registration option '{other}'")),
    }
}

fn parse_renewal(raw: &str) -> Result<RenewalOption, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "only-rera" => Ok(RenewalOption::OnlyRera),
        "with-training-exam" => Ok(RenewalOption::WithTrainingExam),
        other => Err(format!("unknown renewal option '{other}'")),
    }
}

fn parse_hpr(raw: &str) -> Result<HprOption, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "nil" => Ok(HprOption::Nil),
        "upto-50" | "up-to-50" => Ok(HprOption::UpTo50),
        other => Err(format!("unknown HPR option '{other}'")),
    }
}

/// Builds the selection through a draft so package expansion and duplicate
/// handling match the interactive flow.
pub(crate) fn build_request(args: &QuoteArgs) -> Result<PricingRequest, AppError> {
    let mut draft = QuotationDraft::new();

    for header in &args.headers {
        let outcome = draft.add_header(header)?;
        for message in outcome.conflicts.messages() {
            println!("skipped: {message}");
        }
    }

    for entry in &args.services {
        let (header, service) = entry
            .split_once('=')
            .map(|(header, service)| (header.trim(), service.trim()))
            .unwrap_or((entry.trim(), ""));

        let header_index = match draft
            .headers()
            .iter()
            .position(|existing| existing.name.eq_ignore_ascii_case(header))
        {
            Some(index) => index,
            None => {
                draft.add_header(header)?;
                draft.headers().len() - 1
            }
        };

        let sub_services = ServiceCatalog::standard()
            .service(service)
            .map(|definition| {
                definition
                    .sub_services
                    .iter()
                    .map(|sub| SubServiceRef::with_text(sub.id.clone(), sub.text.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let outcome = draft.add_service(
            header_index,
            service,
            sub_services,
            ConflictPolicy::SkipConflicting,
        )?;
        for message in outcome.conflicts.messages() {
            println!("skipped: {message}");
        }
    }

    Ok(PricingRequest {
        developer_type: Some(args.developer_type.clone()),
        project_region: Some(args.region.clone()),
        plot_area: Some(NumericInput::Number(args.plot_area)),
        headers: draft.to_selection(),
        discount_amount: args.discount_amount,
        discount_percent: args.discount_percent,
    })
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let path = match &args.rate_card {
        Some(path) => path.clone(),
        None => AppConfig::load()?.rates.path,
    };
    let rates = RateTable::from_path(&path)?;
    let engine = PricingEngine::new(Arc::new(rates));

    let request = build_request(&args)?;
    let response = engine.quote(&request)?;
    render_pricing(&request, &response);
    Ok(())
}

fn render_pricing(request: &PricingRequest, response: &PricingResponse) {
    println!(
        "{} | {} | plot area band {}",
        response.developer_type,
        response.location.label(),
        response.plot_area_band.label()
    );
    let summary = service_summary(&request.headers);
    if !summary.is_empty() {
        println!("{summary}");
    }

    for header in &response.breakdown {
        println!("\n{}", header.header);
        for line in &header.services {
            println!(
                "  - {:<50} base {:>10}  + {} x {:>8} = {:>10}{}",
                line.service_name,
                format_rupees(line.base_amount),
                line.sub_service_count,
                format_rupees(line.sub_service_rate),
                format_rupees(line.total_amount),
                if line.rate_found { "" } else { "  (no rate)" }
            );
        }
        println!("  Header total: {}", format_rupees(header.header_total));
    }

    println!("\nSubtotal: {}", format_rupees(response.subtotal));
    if response.discount > 0 {
        println!(
            "Discount ({:.2}%): -{}",
            response.discount_percent,
            format_rupees(response.discount)
        );
    }
    println!(
        "GST ({TAX_RATE_PERCENT}%): {}",
        format_rupees(response.tax)
    );
    println!("Total: {}", format_rupees(response.total));

    for warning in &response.warnings {
        println!("warning: {}", warning.message());
    }

    let sections: Vec<&str> = applicable_terms(&request.headers)
        .into_iter()
        .map(|section| section.title)
        .collect();
    println!("\nTerms: {}", sections.join(", "));
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = ServiceCatalog::standard();
    match args.header {
        Some(header) => {
            let services = PackageExpander::standard().services_for_header(&header);
            println!("{header}: {} services", services.len());
            for service in services {
                println!("  - {} ({} sub-services)", service.name, service.sub_services.len());
            }
        }
        None => {
            for header in catalog.headers() {
                println!(
                    "{:<22} {:<10} {} services",
                    header.name,
                    header.kind.label(),
                    header.services.len()
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn agent_request(args: AgentArgs) -> AgentPricingRequest {
    AgentPricingRequest {
        agent_type: args.agent_type,
        selection: AgentSelection {
            training: args.training,
            exam: args.exam,
            government_fees: args.government_fees,
            registration_professional: args.registration,
            renewal: args.renewal,
            scrutiny_assistance: args.scrutiny_assistance,
            hpr: args.hpr,
            deregistration: args.deregistration,
            correction: args.correction,
        },
        discount_amount: args.discount_amount,
        discount_percent: args.discount_percent,
    }
}

pub(crate) fn run_agent_quote(args: AgentArgs) -> Result<(), AppError> {
    let response = agent_request(args).quote()?;
    render_agent(&response);
    Ok(())
}

fn render_agent(response: &AgentPricingResponse) {
    println!("Agent type: {}", response.agent_type);
    for line in &response.lines {
        println!("  - {:<45} {:>10}", line.name, format_rupees(line.price));
    }
    let totals = &response.totals;
    println!("Subtotal: {}", format_rupees(totals.subtotal));
    if totals.discount > 0 {
        println!("Discount: -{}", format_rupees(totals.discount));
    }
    println!("GST ({TAX_RATE_PERCENT}%): {}", format_rupees(totals.tax));
    println!("Total: {}", format_rupees(totals.total));
}
