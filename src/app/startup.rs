//! Application startup and the interactive scan loop

use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use crate::app::cli::args::Args;
use crate::app::feedback::TerminalBellFeedback;
use crate::audit::api::{
    ArrivalAuditEngine, AuditError, FeedbackSink, NullFeedback, OrgContext,
};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::store::api::{MemoryStore, RecordStore, RetryingStore, SeedData};

/// Initialize application startup
pub fn startup() {
    let mut args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        let config_file = args.config_file.clone();
        Args::parse_config_file(&mut args, config_file).await;

        if let Err(e) = init_logging(
            args.log_level.as_deref(),
            args.log_format.as_deref(),
            args.log_file.as_deref().and_then(|p| p.to_str()),
            args.use_color(),
        ) {
            eprintln!("Error: failed to initialise logging: {}", e);
            std::process::exit(1);
        }

        log::info!("scandock: arrival audit terminal starting");

        if let Err(e) = run(args).await {
            log::error!("{}", e);
            std::process::exit(1);
        }
    });
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = build_store(&args).await?;
    let feedback: Arc<dyn FeedbackSink> = if args.no_bell {
        Arc::new(NullFeedback)
    } else {
        Arc::new(TerminalBellFeedback)
    };

    let mut engine =
        ArrivalAuditEngine::new(store, feedback, OrgContext::new(args.org_id()));

    if let Some(code) = &args.manifest {
        match engine.resolve_manifest(code).await {
            Ok(manifest) => {
                let stats = engine.stats();
                println!(
                    "Auditing manifest {} ({} -> {}, {} expected items)",
                    manifest.manifest_no, manifest.origin, manifest.destination, stats.total
                );
            }
            Err(err) => {
                log_error_with_context(&err, "Manifest resolution");
                return Err(err.into());
            }
        }
    } else {
        println!("Scan or enter a manifest code to start an audit session.");
    }

    scan_loop(&mut engine).await;
    Ok(())
}

async fn build_store(args: &Args) -> Result<Arc<dyn RecordStore>, Box<dyn std::error::Error>> {
    let seed = match &args.seed {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path).await?;
            SeedData::from_json(&contents)?
        }
        None => SeedData::default(),
    };

    log::debug!(
        "Store seeded with {} manifests and {} shipments",
        seed.manifests.len(),
        seed.shipments.len()
    );

    Ok(Arc::new(RetryingStore::new(MemoryStore::with_seed(seed))))
}

/// Read scan inputs and commands from stdin until EOF or `quit`
///
/// Everything that is not a recognised command is treated as a scan.
async fn scan_loop(engine: &mut ArrivalAuditEngine) {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                match input {
                    "quit" | "exit" => break,
                    "stats" => print_stats(engine),
                    "clear" => {
                        engine.clear_session().await;
                        println!("Session cleared.");
                    }
                    "refresh" => match engine.refresh_session().await {
                        Ok(_) => print_stats(engine),
                        Err(err) => log_error_with_context(&err, "Session refresh"),
                    },
                    _ => {
                        if let Some(rest) = input.strip_prefix("exception ") {
                            let (awb, reason) = match rest.trim().split_once(' ') {
                                Some((awb, reason)) => (awb, Some(reason.trim())),
                                None => (rest.trim(), None),
                            };
                            match engine.mark_exception(awb, reason).await {
                                Ok(outcome) => println!("{}", outcome.message()),
                                Err(err) => log_error_with_context(&err, "Exception marking"),
                            }
                        } else {
                            apply_scan(engine, input).await;
                        }
                    }
                }
            }
            Ok(None) => break, // EOF
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    engine.clear_session().await;
}

async fn apply_scan(engine: &mut ArrivalAuditEngine, input: &str) {
    match engine.apply_scan(input).await {
        Ok(outcome) => {
            println!("{}", outcome.message());
            if engine.active_manifest().is_some() {
                print_stats(engine);
            }
        }
        Err(err @ AuditError::NotOnManifest { .. }) => {
            // Hard stop: the operator must set the item aside
            println!("REJECTED: {}", err);
        }
        Err(err) => log_error_with_context(&err, "Scan application"),
    }
}

fn print_stats(engine: &ArrivalAuditEngine) {
    let stats = engine.stats();
    println!(
        "  scanned {}/{} | missing {} | exceptions {}",
        stats.scanned, stats.total, stats.missing, stats.exceptions
    );
}
