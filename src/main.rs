use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use relic::application::dto::{CarveOptions, GenerateOptions, ValidateOptions};
use relic::application::{CarveImageUseCase, GenerateDiskUseCase, ValidateRecoveryUseCase};
use relic::domain::entities::{FooterRule, ScanProgress};
use relic::domain::services::SignatureRegistry;
use relic::presentation::cli::{Cli, Commands, ProgressReporter, mib, parse_file_types};

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.debug {
        "relic=trace"
    } else if cli.verbose {
        "relic=debug"
    } else {
        "relic=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Carve {
            input,
            output,
            max_size_mb,
            types,
            strict_png,
            records,
            no_progress,
        } => {
            let mut options = CarveOptions::new(input, output)
                .with_types(parse_file_types(types))
                .with_max_file_size(mib(max_size_mb))
                .with_strict_png(strict_png);
            if let Some(path) = records {
                options = options.with_records(path);
            }
            run_carve(&options, !no_progress)
        }
        Commands::Generate {
            source,
            output,
            ground_truth,
            size_mb,
            max_attempts,
            seed,
        } => {
            let disk_size = usize::try_from(mib(size_mb)).context("Disk size too large")?;
            let mut options = GenerateOptions::new(source, output, ground_truth)
                .with_disk_size(disk_size)
                .with_max_attempts(max_attempts);
            if let Some(seed) = seed {
                options = options.with_seed(seed);
            }
            let summary = GenerateDiskUseCase::new().execute(&options)?;
            println!("{}", summary.summary());
            Ok(())
        }
        Commands::Validate {
            recovered,
            ground_truth,
            report,
            sort,
        } => {
            let mut options = ValidateOptions::new(recovered, ground_truth);
            if let Some(path) = report {
                options = options.with_report(path);
            }
            if sort {
                options = options.sorted();
            }
            let report = ValidateRecoveryUseCase::new().execute(&options)?;
            println!("{}", report.render());
            Ok(())
        }
        Commands::ListSignatures => {
            list_signatures();
            Ok(())
        }
    }
}

fn run_carve(options: &CarveOptions, show_progress: bool) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let use_case = CarveImageUseCase::from_options(options)?;
    let progress = ScanProgress::new();

    let total = std::fs::metadata(&options.input).map(|m| m.len()).unwrap_or(0);
    let reporter = if show_progress {
        ProgressReporter::for_carve(progress.clone(), total)
    } else {
        ProgressReporter::hidden()
    };

    let result = use_case.execute(options, &progress, &running);
    match &result {
        Ok((summary, _)) if summary.cancelled => reporter.finish("Interrupted"),
        Ok(_) => reporter.finish("Done"),
        Err(_) => reporter.finish("Failed"),
    }

    let (summary, _) = result?;
    println!("{}", summary.summary());
    Ok(())
}

fn list_signatures() {
    let registry = SignatureRegistry::default_images();

    println!("{:<6} {:<24} {:<28} FOOTER", "TAG", "HEADER", "NAME");
    println!("{}", "-".repeat(80));
    for signature in registry.signatures() {
        let footer = match signature.footer() {
            FooterRule::EndMarker(marker) => hex_bytes(marker),
            FooterRule::MarkerWithTrailer {
                marker,
                trailer_len,
                ..
            } => format!("{} +{} bytes", hex_bytes(marker), trailer_len),
        };
        println!(
            "{:<6} {:<24} {:<28} {}",
            signature.file_type().tag(),
            hex_bytes(signature.header()),
            signature.file_type().name(),
            footer
        );
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
