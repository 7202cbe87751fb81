//! Human/bot heuristic scoring.
//!
//! Five boolean signals, weighted equally. None of them is conclusive alone;
//! the score only sorts a session into likely human, uncertain or likely
//! automated.

use crate::check::{DiagnosticStatus, Outcome};
use crate::environment::{Capability, Environment, Feature};
use once_cell::sync::Lazy;
use qrkit_core::DiagnosticsConfig;
use regex::Regex;
use serde::Serialize;
use std::time::Duration;

static BOT_USER_AGENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)bot|crawler|spider|headless|phantom|selenium|puppeteer|playwright|webdriver")
        .expect("valid regex")
});

/// Score at or above which the session is treated as human.
pub const HUMAN_THRESHOLD: f64 = 0.7;

/// Score below which the session is treated as automated.
pub const BOT_THRESHOLD: f64 = 0.4;

/// Number of heuristics contributing to the score.
pub const SIGNAL_COUNT: usize = 5;

/// Probe parameters for the bot heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotProbe {
    /// Fixed wait across which timer jitter is sampled
    pub timing_wait: Duration,
    /// Number of timer samples
    pub timing_samples: usize,
    /// Variance (ms²) above which jitter looks like a real device
    pub variance_threshold: f64,
    /// Window for observing pointer movement
    pub pointer_window: Duration,
}

impl Default for BotProbe {
    fn default() -> Self {
        Self::from_config(&DiagnosticsConfig::default())
    }
}

impl BotProbe {
    /// Probe timings and threshold from the app config.
    #[must_use]
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        Self {
            timing_wait: Duration::from_millis(config.timing_probe_ms),
            timing_samples: config.timing_samples,
            variance_threshold: config.timing_variance_threshold,
            pointer_window: Duration::from_millis(config.pointer_window_ms),
        }
    }
}

/// The five heuristic signals. `true` means "looks human".
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSignals {
    /// Timer samples varied more than the threshold
    pub timing_jitter: bool,
    /// Pointer moved within the window
    pub pointer_movement: bool,
    /// A WebGL context could be created
    pub webgl_context: bool,
    /// At least two logical cores
    pub multi_core: bool,
    /// User agent names no automation tool
    pub ordinary_user_agent: bool,
}

impl BotSignals {
    /// Gather every signal from `env`.
    pub async fn collect(env: &dyn Environment, probe: &BotProbe) -> Self {
        let samples = env.timer_samples(probe.timing_wait, probe.timing_samples).await;
        let timing_jitter = variance(&samples).is_some_and(|v| v > probe.variance_threshold);

        let pointer_movement = env.pointer_moved(probe.pointer_window).await;

        // A failing probe counts as no context
        let webgl_context = matches!(env.probe(Feature::WebGl).await, Ok(Capability::Present));

        let multi_core = env.hardware_concurrency().is_some_and(|n| n >= 2);

        let ordinary_user_agent = env
            .user_agent()
            .map_or(true, |ua| !is_bot_user_agent(&ua));

        let signals = Self {
            timing_jitter,
            pointer_movement,
            webgl_context,
            multi_core,
            ordinary_user_agent,
        };
        tracing::debug!(?signals, samples = samples.len(), "Collected bot signals");
        signals
    }

    /// Number of signals that look human.
    #[must_use]
    pub fn passed(&self) -> usize {
        [
            self.timing_jitter,
            self.pointer_movement,
            self.webgl_context,
            self.multi_core,
            self.ordinary_user_agent,
        ]
        .into_iter()
        .filter(|&signal| signal)
        .count()
    }

    /// Fraction of signals that look human, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self) -> f64 {
        self.passed() as f64 / SIGNAL_COUNT as f64
    }

    /// Turn the score into a check outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        let score = self.score();
        let details = format!("{}/{SIGNAL_COUNT} human signals", self.passed());
        let outcome = match classify(score) {
            DiagnosticStatus::Passed => Outcome::passed(format!("Likely human (score {score:.1})")),
            DiagnosticStatus::Skipped => {
                Outcome::skipped(format!("Uncertain (score {score:.1})"))
            }
            _ => Outcome::failed(format!("Likely automated (score {score:.1})")),
        };
        outcome.with_details(details)
    }
}

/// Map a score to a terminal status.
#[must_use]
pub fn classify(score: f64) -> DiagnosticStatus {
    if score >= HUMAN_THRESHOLD {
        DiagnosticStatus::Passed
    } else if score >= BOT_THRESHOLD {
        DiagnosticStatus::Skipped
    } else {
        DiagnosticStatus::Failed
    }
}

/// Whether `user_agent` names a known automation tool or crawler.
#[must_use]
pub fn is_bot_user_agent(user_agent: &str) -> bool {
    BOT_USER_AGENT.is_match(user_agent)
}

/// Population variance, or `None` for fewer than two samples.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn variance(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    Some(samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n)
}
