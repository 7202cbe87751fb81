//! Per-check classification policy.

use crate::bot::{BotProbe, BotSignals};
use crate::check::{CheckKind, Outcome};
use crate::environment::{Capability, Environment, Feature, MediaError, MediaKind, NotificationPermission};
use crate::error::Result;

/// Run a single check against `env`.
///
/// `Err` means the probe itself failed; the battery turns that into a failed
/// result.
pub async fn run_check(kind: CheckKind, env: &dyn Environment, bot: &BotProbe) -> Result<Outcome> {
    match kind {
        CheckKind::WebRtc => capability(env, Feature::WebRtc, kind).await,
        CheckKind::WebGl => capability(env, Feature::WebGl, kind).await,
        CheckKind::ServiceWorker => capability(env, Feature::ServiceWorker, kind).await,
        CheckKind::IndexedDb => capability(env, Feature::IndexedDb, kind).await,
        CheckKind::AudioContext => capability(env, Feature::AudioContext, kind).await,
        CheckKind::Camera => Ok(media(env, MediaKind::Camera).await),
        CheckKind::Microphone => Ok(media(env, MediaKind::Microphone).await),
        CheckKind::Notifications => Ok(notifications(env).await),
        CheckKind::BotDetection => Ok(BotSignals::collect(env, bot).await.outcome()),
    }
}

async fn capability(env: &dyn Environment, feature: Feature, kind: CheckKind) -> Result<Outcome> {
    let outcome = match env.probe(feature).await? {
        Capability::Present => Outcome::passed(format!("{kind} is supported")),
        Capability::Absent => Outcome::failed(format!("{kind} is not supported")),
        Capability::Broken(reason) => {
            Outcome::failed(format!("{kind} could not be initialised")).with_details(reason)
        }
    };
    Ok(outcome)
}

/// Acquire and immediately release a media device.
async fn media(env: &dyn Environment, kind: MediaKind) -> Outcome {
    let noun = kind.noun();
    match env.acquire_media(kind).await {
        Ok(handle) => {
            handle.release();
            tracing::debug!(device = noun, "Media device acquired and released");
            Outcome::passed(format!("Access to the {noun} granted"))
        }
        Err(MediaError::PermissionDenied) => Outcome::failed(format!("Permission to use the {noun} was denied"))
            .with_details(format!(
                "Allow {noun} access in your browser or system settings, then run the diagnostic again"
            )),
        Err(MediaError::NotFound) => Outcome::skipped(format!("No {noun} found")),
        Err(MediaError::Other(message)) => {
            Outcome::failed(format!("Could not access the {noun}")).with_details(message)
        }
    }
}

async fn notifications(env: &dyn Environment) -> Outcome {
    let permission = match env.notification_permission().await {
        NotificationPermission::Default => {
            tracing::debug!("Requesting notification permission");
            env.request_notification_permission().await
        }
        decided => decided,
    };

    match permission {
        NotificationPermission::Granted => Outcome::passed("Notifications are allowed"),
        NotificationPermission::Denied => Outcome::failed("Notifications are blocked"),
        NotificationPermission::Default => {
            Outcome::failed("Notification permission was not granted")
        }
    }
}
