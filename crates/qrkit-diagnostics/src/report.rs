//! Environment built from a capability report.
//!
//! A browser front-end gathers what it can about its page (feature presence,
//! permission states, timer samples, pointer activity) and posts it as JSON.
//! [`ReportedEnvironment`] replays that report to the battery.

use crate::environment::{
    Capability, Environment, Feature, MediaError, MediaHandle, MediaKind, NotificationPermission,
};
use crate::error::{DiagnosticError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What happened when the front-end asked for a media device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaReport {
    /// Device opened
    Granted,
    /// Access refused
    Denied,
    /// No such device
    #[default]
    NotFound,
    /// Any other failure, with the raw message
    Error(String),
}

/// Capability report posted by a front-end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentReport {
    /// Browser user agent string
    pub user_agent: Option<String>,
    /// Logical core count, when exposed
    pub hardware_concurrency: Option<usize>,
    /// Feature probe answers. Missing features read as absent.
    pub capabilities: HashMap<Feature, Capability>,
    /// Features whose probe threw, with the error text
    pub probe_errors: HashMap<Feature, String>,
    /// Camera request result
    pub camera: MediaReport,
    /// Microphone request result
    pub microphone: MediaReport,
    /// Notification permission before any request
    pub notifications: Option<NotificationPermission>,
    /// Answer given when permission was requested from the default state
    pub notification_request: Option<NotificationPermission>,
    /// Measured timer intervals in milliseconds
    pub timing_samples_ms: Vec<f64>,
    /// Whether the pointer moved during the observation window
    pub pointer_moved: bool,
}

impl EnvironmentReport {
    /// Parse a report from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a report file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[derive(Debug, Default)]
struct MediaLedger {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

struct ReportedHandle {
    kind: MediaKind,
    ledger: Arc<MediaLedger>,
}

impl MediaHandle for ReportedHandle {
    fn release(self: Box<Self>) {
        self.ledger.released.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(device = self.kind.noun(), "Released reported media handle");
    }
}

/// [`Environment`] that answers from an [`EnvironmentReport`].
#[derive(Debug, Clone)]
pub struct ReportedEnvironment {
    report: EnvironmentReport,
    ledger: Arc<MediaLedger>,
}

impl ReportedEnvironment {
    /// Wrap a parsed report.
    #[must_use]
    pub fn new(report: EnvironmentReport) -> Self {
        Self {
            report,
            ledger: Arc::new(MediaLedger::default()),
        }
    }

    /// Parse a JSON report.
    pub fn from_json(json: &str) -> Result<Self> {
        EnvironmentReport::from_json(json).map(Self::new)
    }

    /// The underlying report.
    #[must_use]
    pub fn report(&self) -> &EnvironmentReport {
        &self.report
    }

    /// Media handles handed out so far.
    #[must_use]
    pub fn media_acquired(&self) -> usize {
        self.ledger.acquired.load(Ordering::SeqCst)
    }

    /// Handles acquired but not yet released.
    #[must_use]
    pub fn media_outstanding(&self) -> usize {
        self.media_acquired() - self.ledger.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Environment for ReportedEnvironment {
    async fn probe(&self, feature: Feature) -> Result<Capability> {
        if let Some(message) = self.report.probe_errors.get(&feature) {
            return Err(DiagnosticError::Probe(message.clone()));
        }
        Ok(self
            .report
            .capabilities
            .get(&feature)
            .cloned()
            .unwrap_or(Capability::Absent))
    }

    async fn acquire_media(&self, kind: MediaKind) -> std::result::Result<Box<dyn MediaHandle>, MediaError> {
        let report = match kind {
            MediaKind::Camera => &self.report.camera,
            MediaKind::Microphone => &self.report.microphone,
        };
        match report {
            MediaReport::Granted => {
                self.ledger.acquired.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ReportedHandle {
                    kind,
                    ledger: Arc::clone(&self.ledger),
                }))
            }
            MediaReport::Denied => Err(MediaError::PermissionDenied),
            MediaReport::NotFound => Err(MediaError::NotFound),
            MediaReport::Error(message) => Err(MediaError::Other(message.clone())),
        }
    }

    async fn notification_permission(&self) -> NotificationPermission {
        self.report
            .notifications
            .unwrap_or(NotificationPermission::Default)
    }

    async fn request_notification_permission(&self) -> NotificationPermission {
        self.report
            .notification_request
            .unwrap_or_else(|| self.report.notifications.unwrap_or(NotificationPermission::Default))
    }

    async fn timer_samples(&self, _wait: Duration, samples: usize) -> Vec<f64> {
        self.report.timing_samples_ms.iter().copied().take(samples).collect()
    }

    async fn pointer_moved(&self, _window: Duration) -> bool {
        self.report.pointer_moved
    }

    fn hardware_concurrency(&self) -> Option<usize> {
        self.report.hardware_concurrency
    }

    fn user_agent(&self) -> Option<String> {
        self.report.user_agent.clone()
    }
}
