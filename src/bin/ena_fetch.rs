use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use ena_accession_fetcher::app::{DownloadOptions, DownloadReport, Fetcher};
use ena_accession_fetcher::domain::{Accession, Lineage};
use ena_accession_fetcher::ena::{EnaClient, EnaHttpClient};
use ena_accession_fetcher::error::FetchError;
use ena_accession_fetcher::manifest::Manifest;
use ena_accession_fetcher::output::JsonOutput;
use ena_accession_fetcher::store::Store;

#[derive(Parser)]
#[command(name = "ena-fetch")]
#[command(about = "Fetch viral genome sequences from the EBI ENA browser API by accession")]
#[command(version, author)]
struct Cli {
    /// Path to the accessions manifest.
    #[arg(long, global = true, default_value = "accessions.tsv")]
    manifest: Utf8PathBuf,

    /// Directory downloaded FASTA files are stored in.
    #[arg(long, global = true, default_value = "data/raw")]
    data_dir: Utf8PathBuf,

    /// Print machine-readable JSON instead of a human summary.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Download a batch of accessions")]
    Fetch(FetchArgs),
    #[command(about = "List lineages known to the manifest")]
    Lineages,
    #[command(about = "List the accessions recorded for a lineage")]
    Accessions(AccessionsArgs),
}

#[derive(Args)]
struct FetchArgs {
    #[arg(required = true)]
    accessions: Vec<String>,

    /// Download the known accessions even if the request names unknown ones.
    #[arg(long)]
    partial: bool,
}

#[derive(Args)]
struct AccessionsArgs {
    lineage: String,
}

/// Placeholder client for commands that never touch the network.
struct NopEna;

impl EnaClient for NopEna {
    fn download_sequence(
        &self,
        _accession: &Accession,
        _destination: &Path,
    ) -> Result<(), FetchError> {
        Err(FetchError::EnaHttp("no network client configured".to_string()))
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(fetch) = report.downcast_ref::<FetchError>() {
            return ExitCode::from(map_exit_code(fetch));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &FetchError) -> u8 {
    match error {
        FetchError::MissingManifest(_) => 2,
        FetchError::EnaHttp(_) | FetchError::EnaStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let manifest = match Manifest::load(&cli.manifest) {
        Ok(manifest) => manifest,
        Err(err @ FetchError::MissingManifest(_)) => {
            tracing::error!(path = %cli.manifest, "the accessions manifest does not exist");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    let store = Store::open(cli.data_dir.clone()).into_diagnostic()?;

    match cli.command {
        Commands::Fetch(args) => {
            let requested = args
                .accessions
                .iter()
                .map(|value| Accession::from_str(value))
                .collect::<Result<Vec<_>, FetchError>>()?;
            let ena = EnaHttpClient::new().into_diagnostic()?;
            let mut fetcher = Fetcher::new(manifest, store, ena).into_diagnostic()?;
            let report = fetcher.download_accessions(
                &requested,
                DownloadOptions {
                    download_all: !args.partial,
                },
            );
            if cli.json {
                JsonOutput::print_report(&report).into_diagnostic()?;
            } else {
                print_report_summary(&report);
            }
            Ok(())
        }
        Commands::Lineages => {
            let fetcher = Fetcher::new(manifest, store, NopEna).into_diagnostic()?;
            let result = fetcher.lineages();
            if cli.json {
                JsonOutput::print_lineages(&result).into_diagnostic()?;
            } else {
                for lineage in &result.lineages {
                    println!("{lineage}");
                }
            }
            Ok(())
        }
        Commands::Accessions(args) => {
            let lineage = Lineage::from_str(&args.lineage)?;
            let fetcher = Fetcher::new(manifest, store, NopEna).into_diagnostic()?;
            let result = fetcher.accessions_by_lineage(&lineage);
            if cli.json {
                JsonOutput::print_lineage_accessions(&result).into_diagnostic()?;
            } else if result.accessions.is_empty() {
                println!("lineage {lineage} is not present in the manifest");
            } else {
                for accession in &result.accessions {
                    println!("{accession}");
                }
            }
            Ok(())
        }
    }
}

fn print_report_summary(report: &DownloadReport) {
    for accession in &report.unknown {
        println!("accession {accession} does not exist in the manifest");
    }
    if report.aborted {
        println!(
            "no accessions were downloaded; rerun with --partial to fetch the known ones only"
        );
        return;
    }
    for accession in &report.skipped {
        println!("accession {accession} is already present locally");
    }
    for accession in &report.downloaded {
        println!("downloaded {accession}");
    }
    if report.all_verified() {
        println!(
            "all requested accessions are available locally ({} downloaded, {} skipped)",
            report.downloaded.len(),
            report.skipped.len()
        );
    } else {
        println!(
            "not all accessions were downloaded successfully; check the log for details"
        );
    }
}
