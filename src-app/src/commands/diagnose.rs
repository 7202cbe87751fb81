//! Device diagnostic command with paced progress output.

use crate::state::AppState;
use anyhow::Context;
use qrkit_diagnostics::{
    BatterySettings, DiagnosticBattery, DiagnosticEvent, DiagnosticResult, DiagnosticStatus,
    DiagnosticSummary, Environment, EnvironmentReport, HostEnvironment, ReportedEnvironment,
};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the battery against a report file, or the native host when no report
/// is given.
pub async fn diagnose(
    state: &AppState,
    report: Option<&Path>,
    out: &mut dyn Write,
) -> anyhow::Result<DiagnosticSummary> {
    let env: Box<dyn Environment> = match report {
        Some(path) => {
            let report = EnvironmentReport::from_path(path)
                .with_context(|| format!("failed to load report {}", path.display()))?;
            Box::new(ReportedEnvironment::new(report))
        }
        None => Box::new(HostEnvironment::new()),
    };

    let config = &state.config.diagnostics;
    let mut battery = DiagnosticBattery::new(BatterySettings::from_config(config));
    let delay = Duration::from_millis(config.display_delay_ms);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let run = async {
        let summary = battery.run_with_progress(env.as_ref(), &tx).await;
        drop(tx);
        summary
    };
    let (summary, printed) = tokio::join!(run, print_events(&mut rx, delay, out));
    printed?;
    Ok(summary)
}

/// Print events as they arrive, pausing `delay` after each finished check.
async fn print_events(
    rx: &mut mpsc::UnboundedReceiver<DiagnosticEvent>,
    delay: Duration,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    while let Some(event) = rx.recv().await {
        match event {
            DiagnosticEvent::Started { total } => writeln!(out, "Running {total} checks...")?,
            DiagnosticEvent::CheckStarted { .. } => {}
            DiagnosticEvent::CheckFinished { result, .. } => {
                write_result(&result, out)?;
                out.flush()?;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            DiagnosticEvent::Completed(summary) => writeln!(
                out,
                "\n{} passed, {} failed, {} skipped",
                summary.passed, summary.failed, summary.skipped
            )?,
        }
    }
    Ok(())
}

fn write_result(result: &DiagnosticResult, out: &mut dyn Write) -> std::io::Result<()> {
    let marker = match result.status() {
        DiagnosticStatus::Passed => "PASS",
        DiagnosticStatus::Failed => "FAIL",
        DiagnosticStatus::Skipped => "SKIP",
        DiagnosticStatus::Pending => "....",
    };
    writeln!(out, "[{marker}] {:<15} {}", result.name(), result.message())?;
    if let Some(details) = result.details() {
        writeln!(out, "       {details}")?;
    }
    Ok(())
}
