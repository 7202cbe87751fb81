//! The diagnostic battery: ordered, sequential, one result per check.

use crate::bot::BotProbe;
use crate::check::{BatteryState, CheckKind, DiagnosticResult, DiagnosticSummary, Outcome};
use crate::checks::run_check;
use crate::environment::Environment;
use qrkit_core::DiagnosticsConfig;
use std::time::Duration;
use tokio::sync::mpsc;

/// Progress notifications emitted during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// Every result has been reset to pending
    Started {
        /// Number of checks in the pass
        total: usize,
    },
    /// A check is about to run
    CheckStarted {
        /// Position in the check order
        index: usize,
        /// The check
        check: CheckKind,
    },
    /// A check reached its terminal status
    CheckFinished {
        /// Position in the check order
        index: usize,
        /// Its resolved result
        result: DiagnosticResult,
    },
    /// The pass is complete
    Completed(DiagnosticSummary),
}

/// Tunables for a battery pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySettings {
    /// Pause between checks. Zero by default; pacing belongs to the display.
    pub inter_check_delay: Duration,
    /// Bot heuristic parameters
    pub bot: BotProbe,
}

impl Default for BatterySettings {
    fn default() -> Self {
        Self::from_config(&DiagnosticsConfig::default())
    }
}

impl BatterySettings {
    /// Settings from the diagnostics section of the app config.
    #[must_use]
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        Self {
            inter_check_delay: Duration::ZERO,
            bot: BotProbe::from_config(config),
        }
    }
}

/// Runs every [`CheckKind`] in order and keeps the latest results.
#[derive(Debug)]
pub struct DiagnosticBattery {
    checks: Vec<CheckKind>,
    results: Vec<DiagnosticResult>,
    state: BatteryState,
    settings: BatterySettings,
}

impl Default for DiagnosticBattery {
    fn default() -> Self {
        Self::new(BatterySettings::default())
    }
}

impl DiagnosticBattery {
    /// Battery over the full check list.
    #[must_use]
    pub fn new(settings: BatterySettings) -> Self {
        Self::with_checks(CheckKind::all().to_vec(), settings)
    }

    /// Battery over an explicit, ordered subset of checks.
    #[must_use]
    pub fn with_checks(checks: Vec<CheckKind>, settings: BatterySettings) -> Self {
        let results = checks.iter().copied().map(DiagnosticResult::pending).collect();
        Self {
            checks,
            results,
            state: BatteryState::Idle,
            settings,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> BatteryState {
        self.state
    }

    /// Results of the current or last pass, in check order.
    #[must_use]
    pub fn results(&self) -> &[DiagnosticResult] {
        &self.results
    }

    /// Counts derived from the current results.
    #[must_use]
    pub fn summary(&self) -> DiagnosticSummary {
        DiagnosticSummary::from_results(&self.results)
    }

    /// Run one full pass.
    pub async fn run(&mut self, env: &dyn Environment) -> DiagnosticSummary {
        self.execute(env, None).await
    }

    /// Run one full pass, reporting progress on `events`.
    ///
    /// A closed receiver does not stop the pass.
    pub async fn run_with_progress(
        &mut self,
        env: &dyn Environment,
        events: &mpsc::UnboundedSender<DiagnosticEvent>,
    ) -> DiagnosticSummary {
        self.execute(env, Some(events)).await
    }

    async fn execute(
        &mut self,
        env: &dyn Environment,
        events: Option<&mpsc::UnboundedSender<DiagnosticEvent>>,
    ) -> DiagnosticSummary {
        let emit = |event: DiagnosticEvent| {
            if let Some(sender) = events {
                let _ = sender.send(event);
            }
        };

        self.state = BatteryState::Running;
        self.results = self.checks.iter().copied().map(DiagnosticResult::pending).collect();
        tracing::info!(checks = self.checks.len(), "Starting diagnostic battery");
        emit(DiagnosticEvent::Started {
            total: self.checks.len(),
        });

        for index in 0..self.checks.len() {
            let check = self.checks[index];
            if index > 0 && !self.settings.inter_check_delay.is_zero() {
                tokio::time::sleep(self.settings.inter_check_delay).await;
            }
            emit(DiagnosticEvent::CheckStarted { index, check });

            let outcome = match run_check(check, env, &self.settings.bot).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(check = %check, error = %e, "Diagnostic check errored");
                    Outcome::failed(format!("{check} check failed")).with_details(e.to_string())
                }
            };

            let result = &mut self.results[index];
            if let Err(e) = result.resolve(outcome) {
                // Results were reset above, so this only fires on a logic error
                tracing::error!(check = %check, error = %e, "Could not record diagnostic result");
                continue;
            }
            tracing::debug!(check = %check, status = %result.status(), "Diagnostic check finished");
            emit(DiagnosticEvent::CheckFinished {
                index,
                result: result.clone(),
            });
        }

        self.state = BatteryState::Complete;
        let summary = self.summary();
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Diagnostic battery complete"
        );
        emit(DiagnosticEvent::Completed(summary));
        summary
    }
}
