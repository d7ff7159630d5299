use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sales_reports::concurrent_engine::generate_reports_parallel;
use sales_reports::config::{ReportConfig, SellerGrouping, DEFAULT_DATA_DIR};
use sales_reports::{fixtures, generate_reports, Reports};

#[derive(Debug, Parser)]
#[command(name = "sales-reports", version)]
#[command(about = "Generate seller revenue and product quantity reports from sales files")]
struct Cli {
    /// Directory holding the seller, product, sales and report files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// How sellers are grouped in the revenue report
    #[arg(long, value_enum, default_value_t = GroupBy::FullName)]
    group_by: GroupBy,

    /// Aggregate sellers' sales files in parallel
    #[arg(long)]
    parallel: bool,

    /// Log debug events (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace the data directory with a random dataset
    Generate,
    /// Write both reports
    Report,
    /// Interactive menu
    Menu,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupBy {
    FullName,
    DocumentId,
}

impl From<GroupBy> for SellerGrouping {
    fn from(group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::FullName => SellerGrouping::FullName,
            GroupBy::DocumentId => SellerGrouping::DocumentId,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    ensure!(
        !cli.data_dir.is_file(),
        "Data directory '{}' is a file",
        cli.data_dir.display()
    );

    let config = ReportConfig::in_dir(&cli.data_dir).with_grouping(cli.group_by.into());

    match cli.command.unwrap_or(Command::Menu) {
        Command::Generate => {
            generate(&config).context("Failed to generate info files")?;
            println!("Files generated successfully.");
        }
        Command::Report => {
            let reports = report(&config, cli.parallel).context("Failed to generate reports")?;
            print_reports(&reports);
        }
        Command::Menu => menu(&config, cli.parallel)?,
    }

    Ok(())
}

fn generate(config: &ReportConfig) -> sales_reports::error::Result<()> {
    fixtures::generate_info_files(config, &mut rand::thread_rng()).map(|_| ())
}

fn report(config: &ReportConfig, parallel: bool) -> sales_reports::error::Result<Reports> {
    if parallel {
        generate_reports_parallel(config)
    } else {
        generate_reports(config)
    }
}

fn print_reports(reports: &Reports) {
    println!("Reports generated successfully.");
    println!(
        "  {} ({} rows)",
        reports.sellers.path.display(),
        reports.sellers.rows
    );
    println!(
        "  {} ({} rows)",
        reports.products.path.display(),
        reports.products.rows
    );
}

/// Prompt loop: 1 generates files, 2 writes reports, 3 exits
fn menu(config: &ReportConfig, parallel: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("Menu:");
        println!("1. Generate Info Files");
        println!("2. Generate Reports");
        println!("3. Exit");
        print!("Choose an option: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read menu choice")?;

        match line.trim() {
            "1" => match generate(config) {
                Ok(()) => println!("Files generated successfully."),
                Err(e) => println!("Error generating files: {}", e),
            },
            "2" => match report(config, parallel) {
                Ok(reports) => print_reports(&reports),
                Err(e) => println!("Error generating reports: {}", e),
            },
            "3" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid option. Please try again."),
        }
    }

    Ok(())
}
