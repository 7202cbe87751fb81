//! Native host environment.
//!
//! Outside a browser there are no web APIs, devices are not opened and no
//! pointer is observed. Timer jitter and processor count are measured for
//! real.

use crate::environment::{
    Capability, Environment, Feature, MediaError, MediaHandle, MediaKind, NotificationPermission,
};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// [`Environment`] for the machine the binary runs on.
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    user_agent: Option<String>,
}

impl HostEnvironment {
    /// Host environment reporting a `qrkit/<version>` user agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_agent: Some(format!(
                "qrkit/{} ({}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            )),
        }
    }

    /// Override the reported user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[async_trait]
impl Environment for HostEnvironment {
    async fn probe(&self, _feature: Feature) -> Result<Capability> {
        Ok(Capability::Absent)
    }

    async fn acquire_media(&self, _kind: MediaKind) -> std::result::Result<Box<dyn MediaHandle>, MediaError> {
        Err(MediaError::NotFound)
    }

    async fn notification_permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    async fn request_notification_permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    async fn timer_samples(&self, wait: Duration, samples: usize) -> Vec<f64> {
        if samples == 0 {
            return Vec::new();
        }
        let slice = wait / u32::try_from(samples).unwrap_or(u32::MAX);
        let mut measured = Vec::with_capacity(samples);
        for _ in 0..samples {
            let start = Instant::now();
            tokio::time::sleep(slice).await;
            measured.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        measured
    }

    async fn pointer_moved(&self, _window: Duration) -> bool {
        false
    }

    fn hardware_concurrency(&self) -> Option<usize> {
        std::thread::available_parallelism().ok().map(std::num::NonZeroUsize::get)
    }

    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }
}
