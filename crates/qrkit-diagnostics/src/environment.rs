//! The environment the battery probes.
//!
//! Each check only talks to an [`Environment`], so the same battery runs
//! against a browser capability report, the native host, or a test double.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Feature-presence probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Peer connections
    WebRtc,
    /// WebGL rendering context
    WebGl,
    /// Service worker registration
    ServiceWorker,
    /// IndexedDB storage
    IndexedDb,
    /// Web Audio context
    AudioContext,
}

/// Answer to a feature probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Feature exists and could be constructed
    Present,
    /// Feature does not exist
    Absent,
    /// Feature exists but construction failed
    Broken(String),
}

/// Media input devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Video input
    Camera,
    /// Audio input
    Microphone,
}

impl MediaKind {
    /// Lowercase noun used in messages.
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Microphone => "microphone",
        }
    }
}

/// Why a media device could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The user or system refused access
    #[error("permission denied")]
    PermissionDenied,

    /// No device of this kind is attached
    #[error("no device found")]
    NotFound,

    /// Any other failure, with the raw message
    #[error("{0}")]
    Other(String),
}

/// Notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPermission {
    /// Notifications allowed
    Granted,
    /// Notifications blocked
    Denied,
    /// Not yet decided; asking is allowed
    Default,
}

/// An acquired media device. Must be released before the next check runs.
pub trait MediaHandle: Send {
    /// Stop every track and give the device back.
    fn release(self: Box<Self>);
}

/// Host surface probed by the diagnostic battery.
#[async_trait]
pub trait Environment: Send + Sync {
    /// Probe whether `feature` is available.
    ///
    /// An `Err` means the probe itself failed; the battery records it as a
    /// failed check with the error text as details.
    async fn probe(&self, feature: Feature) -> Result<Capability>;

    /// Acquire a media input device.
    async fn acquire_media(&self, kind: MediaKind) -> std::result::Result<Box<dyn MediaHandle>, MediaError>;

    /// Current notification permission.
    async fn notification_permission(&self) -> NotificationPermission;

    /// Ask for notification permission and return the answer.
    async fn request_notification_permission(&self) -> NotificationPermission;

    /// Measured durations (ms) of `samples` consecutive timer waits spread
    /// across `wait`.
    async fn timer_samples(&self, wait: Duration, samples: usize) -> Vec<f64>;

    /// Whether pointer movement was seen within `window`.
    async fn pointer_moved(&self, window: Duration) -> bool;

    /// Logical processors available, if known.
    fn hardware_concurrency(&self) -> Option<usize>;

    /// Reported user agent string, if any.
    fn user_agent(&self) -> Option<String>;
}
