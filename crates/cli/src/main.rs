use clap::{Parser, Subcommand};

mod commands;

use commands::{AnalyzeArgs, ProcessArgs, ServerArgs};

#[derive(Parser)]
#[command(name = "price-outlier")]
#[command(about = "Two-sigma outlier reports for per-exchange stock price files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process up to COUNT stocks per exchange and write `{ticker}_outliers.csv` reports
    Process(ProcessArgs),
    /// Analyze a single price file and print its outlier report
    Analyze(AnalyzeArgs),
    /// Start the web API server
    Server(ServerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => {
            commands::run_process(&args)?;
        }
        Commands::Analyze(args) => {
            commands::run_analyze(&args)?;
        }
        Commands::Server(args) => {
            commands::run_server(&args).await?;
        }
    }

    Ok(())
}
