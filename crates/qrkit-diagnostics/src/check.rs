//! Check identities, statuses and results.

use crate::error::{DiagnosticError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One check in the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Peer connection API
    WebRtc,
    /// GPU rendering context
    WebGl,
    /// Background worker registration
    ServiceWorker,
    /// Structured client-side storage
    IndexedDb,
    /// Audio processing graph
    AudioContext,
    /// Video input device
    Camera,
    /// Audio input device
    Microphone,
    /// Notification permission
    Notifications,
    /// Human/bot heuristic score
    BotDetection,
}

impl CheckKind {
    /// Every check, in the order the battery runs them.
    #[must_use]
    pub fn all() -> &'static [CheckKind] {
        &[
            Self::WebRtc,
            Self::WebGl,
            Self::ServiceWorker,
            Self::IndexedDb,
            Self::AudioContext,
            Self::Camera,
            Self::Microphone,
            Self::Notifications,
            Self::BotDetection,
        ]
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WebRtc => "WebRTC",
            Self::WebGl => "WebGL",
            Self::ServiceWorker => "Service Worker",
            Self::IndexedDb => "IndexedDB",
            Self::AudioContext => "AudioContext",
            Self::Camera => "Camera",
            Self::Microphone => "Microphone",
            Self::Notifications => "Notifications",
            Self::BotDetection => "Bot Detection",
        }
    }

    /// What the check looks at.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::WebRtc => "Real-time peer connections",
            Self::WebGl => "Hardware accelerated graphics context",
            Self::ServiceWorker => "Offline and background worker support",
            Self::IndexedDb => "Client-side structured storage",
            Self::AudioContext => "Audio processing and playback",
            Self::Camera => "Video input for scanning QR codes",
            Self::Microphone => "Audio input access",
            Self::Notifications => "Permission to show notifications",
            Self::BotDetection => "Behavioural signals that a person is present",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Status of one check within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    /// Not yet run in the current pass
    Pending,
    /// Capability present or signal positive
    Passed,
    /// Capability missing, denied or broken
    Failed,
    /// Not applicable or inconclusive
    Skipped,
}

impl DiagnosticStatus {
    /// Whether this status ends a check.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for DiagnosticStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Lifecycle of the battery as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryState {
    /// Never run
    #[default]
    Idle,
    /// A pass is in progress
    Running,
    /// The last pass finished
    Complete,
}

/// What a check concluded, before it is written into its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Terminal status
    pub status: DiagnosticStatus,
    /// Short user-facing message
    pub message: String,
    /// Optional guidance or raw error text
    pub details: Option<String>,
}

impl Outcome {
    /// A passing outcome.
    pub fn passed(message: impl Into<String>) -> Self {
        Self::new(DiagnosticStatus::Passed, message)
    }

    /// A failing outcome.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(DiagnosticStatus::Failed, message)
    }

    /// An outcome for a check that could not apply.
    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(DiagnosticStatus::Skipped, message)
    }

    fn new(status: DiagnosticStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Attach details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Result slot for one check.
///
/// Starts pending and moves to a terminal status at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticResult {
    check: CheckKind,
    name: &'static str,
    status: DiagnosticStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl DiagnosticResult {
    /// Fresh pending result for `check`.
    #[must_use]
    pub fn pending(check: CheckKind) -> Self {
        Self {
            check,
            name: check.display_name(),
            status: DiagnosticStatus::Pending,
            message: "Waiting to run".to_string(),
            details: None,
        }
    }

    /// Record the outcome. Fails if already terminal or if the outcome is
    /// itself pending.
    pub fn resolve(&mut self, outcome: Outcome) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DiagnosticError::AlreadyResolved {
                check: self.check,
                status: self.status,
            });
        }
        if !outcome.status.is_terminal() {
            return Err(DiagnosticError::NotTerminal { check: self.check });
        }

        self.status = outcome.status;
        self.message = outcome.message;
        self.details = outcome.details;
        Ok(())
    }

    /// Which check this result belongs to.
    #[must_use]
    pub fn check(&self) -> CheckKind {
        self.check
    }

    /// Display name of the check.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> DiagnosticStatus {
        self.status
    }

    /// Short user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Guidance or raw error text, when any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

/// Counts derived from a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiagnosticSummary {
    /// Number of checks
    pub total: usize,
    /// Checks that passed
    pub passed: usize,
    /// Checks that failed
    pub failed: usize,
    /// Checks that were skipped
    pub skipped: usize,
    /// Checks not yet resolved
    pub pending: usize,
}

impl DiagnosticSummary {
    /// Count statuses in `results`.
    #[must_use]
    pub fn from_results(results: &[DiagnosticResult]) -> Self {
        let count = |status: DiagnosticStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            total: results.len(),
            passed: count(DiagnosticStatus::Passed),
            failed: count(DiagnosticStatus::Failed),
            skipped: count(DiagnosticStatus::Skipped),
            pending: count(DiagnosticStatus::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checks_unique_and_ordered() {
        let all = CheckKind::all();
        assert_eq!(all.len(), 9);
        assert_eq!(all.first(), Some(&CheckKind::WebRtc));
        assert_eq!(all.last(), Some(&CheckKind::BotDetection));
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_resolve_is_one_way() {
        let mut result = DiagnosticResult::pending(CheckKind::Camera);
        assert_eq!(result.status(), DiagnosticStatus::Pending);

        result
            .resolve(Outcome::skipped("No camera found"))
            .unwrap();
        assert_eq!(result.status(), DiagnosticStatus::Skipped);

        let err = result.resolve(Outcome::passed("late")).unwrap_err();
        assert!(matches!(err, DiagnosticError::AlreadyResolved { .. }));
        assert_eq!(result.message(), "No camera found");
    }

    #[test]
    fn test_resolve_rejects_pending_outcome() {
        let mut result = DiagnosticResult::pending(CheckKind::WebGl);
        let outcome = Outcome {
            status: DiagnosticStatus::Pending,
            message: String::new(),
            details: None,
        };
        assert!(matches!(
            result.resolve(outcome),
            Err(DiagnosticError::NotTerminal { .. })
        ));
        assert_eq!(result.status(), DiagnosticStatus::Pending);
    }

    #[test]
    fn test_summary_counts() {
        let mut results: Vec<_> = CheckKind::all()
            .iter()
            .copied()
            .map(DiagnosticResult::pending)
            .collect();
        results[0].resolve(Outcome::passed("ok")).unwrap();
        results[1].resolve(Outcome::failed("no").with_details("why")).unwrap();
        results[2].resolve(Outcome::skipped("n/a")).unwrap();

        let summary = DiagnosticSummary::from_results(&results);
        assert_eq!(summary.total, 9);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.pending, 6);
        assert_eq!(results[1].details(), Some("why"));
    }

    #[test]
    fn test_result_serializes() {
        let result = DiagnosticResult::pending(CheckKind::IndexedDb);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["check"], "indexed_db");
        assert_eq!(json["name"], "IndexedDB");
        assert_eq!(json["status"], "pending");
        assert!(json.get("details").is_none());
    }
}
