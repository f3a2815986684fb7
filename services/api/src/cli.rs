use crate::quote::{run_agent_quote, run_catalog, run_quote, AgentArgs, CatalogArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use quotation_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "RERA Quotation Engine",
    about = "Price RERA compliance services and serve the quotation API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a selection against the rate card and print the breakdown
    Quote(QuoteArgs),
    /// List catalogue headers, or the services a header offers
    Catalog(CatalogArgs),
    /// Price real-estate agent registration services
    Agent(AgentArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured rate card CSV
    #[arg(long)]
    pub(crate) rate_card: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Catalog(args) => run_catalog(args),
        Command::Agent(args) => run_agent_quote(args),
    }
}
