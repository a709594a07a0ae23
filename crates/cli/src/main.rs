use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{ReportKind, TargetsArgs};

#[derive(Parser)]
#[command(name = "celo-reserve")]
#[command(about = "Reserve accounting: stable supply, reserve totals, and target allocation", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "config/Reserve.toml")]
    config: PathBuf,

    /// Recorded measurements to answer chain, rate, and holdings queries from
    #[arg(short, long, global = true, env = "RESERVE_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconciled record for every configured stable token
    Stables,
    /// Outstanding stable value in USD and the tokens it leaves out
    Totals,
    /// Total reserve value in USD
    Reserve,
    /// Reserve value divided by outstanding stable value
    Ratio,
    /// Totals, ratio, and target allocation in one pass
    Health,
    /// Native asset custody, frozen, and unfrozen balances
    Custody,
    /// Target allocation for given totals, without touching any source
    Targets(TargetsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON only
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let report = match cli.command {
        Commands::Targets(args) => return commands::run_targets(&args),
        Commands::Stables => ReportKind::Stables,
        Commands::Totals => ReportKind::Totals,
        Commands::Reserve => ReportKind::Reserve,
        Commands::Ratio => ReportKind::Ratio,
        Commands::Health => ReportKind::Health,
        Commands::Custody => ReportKind::Custody,
    };

    commands::run_report(report, &cli.config, cli.snapshot.as_deref()).await
}
