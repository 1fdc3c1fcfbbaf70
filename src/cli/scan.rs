use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::commands::ScanArgs;
use crate::config::DefensisConfig;
use crate::display::{ScanDialog, ScanEvent, ScanProgress};
use crate::errors::DefensisError;
use crate::pipeline::{Clock, RunOutcome, TokioClock, VirtualClock};
use crate::utils::formatting::{format_duration, pluralize};

pub async fn handle_scan(args: ScanArgs, config: &DefensisConfig, quiet: bool) -> Result<(), DefensisError> {
    let plan = config.scan_plan(args.repo.as_deref())?;
    let json = args.json || config.output.as_ref().and_then(|o| o.json).unwrap_or(false);
    info!(
        subject = %plan.subject(),
        phases = plan.phases().len(),
        findings = plan.findings().len(),
        instant = args.instant,
        "Preparing scan"
    );

    let clock: Arc<dyn Clock> = if args.instant {
        Arc::new(VirtualClock::new())
    } else {
        Arc::new(TokioClock::new())
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping scan");
            ctrl_c.cancel();
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dialog = ScanDialog::new(plan, clock)
        .with_event_channel(tx)
        .with_cancel_token(cancel);
    dialog.set_open(true).await?;

    let mut progress = if json || quiet {
        ScanProgress::hidden()
    } else {
        print_banner();
        ScanProgress::new()
    };
    while let Some(event) = rx.recv().await {
        progress.handle_event(&event);
        if matches!(event, ScanEvent::ScanCompleted { .. } | ScanEvent::ScanCancelled { .. }) {
            break;
        }
    }

    let outcome = dialog.wait().await?;
    if json {
        let snapshot = dialog.snapshot().await;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    match outcome {
        Some(RunOutcome::Completed(summary)) => {
            summary.log();
            if let Some(notice) = dialog.take_notice() {
                println!();
                println!("  {} {}", style("✔").green(), style(&notice.title).bold());
                println!("  {}", notice.description);
            }
            if !quiet {
                let mut counts: Vec<_> = summary.finding_counts.iter().collect();
                counts.sort_by_key(|(severity, _)| severity.rank());
                let breakdown: Vec<String> = counts
                    .iter()
                    .map(|(severity, n)| format!("{} {}", n, severity))
                    .collect();
                println!(
                    "  {} | {} simulated",
                    if breakdown.is_empty() {
                        pluralize(0, "finding")
                    } else {
                        breakdown.join(", ")
                    },
                    format_duration(summary.simulated_duration_ms),
                );
            }
        }
        Some(RunOutcome::Cancelled { progress, .. }) => {
            println!("  Scan stopped at {:.0}%", progress);
        }
        None => {}
    }

    Ok(())
}

fn print_banner() {
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");
    println!(
        "{} {}",
        style(format!("defensis v{}", env!("CARGO_PKG_VERSION"))).cyan().bold(),
        style(format!("({}, built {})", git_hash, build_ts)).dim()
    );
}
