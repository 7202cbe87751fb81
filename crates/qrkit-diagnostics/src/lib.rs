//! QRKit Diagnostics - Device capability battery.
//!
//! Runs an ordered list of environment checks one at a time, each ending
//! passed, failed or skipped, and scores how human the session looks.
//!
//! # Modules
//!
//! - [`check`] - check kinds, statuses, results and summaries
//! - [`environment`] - the probed surface, as an async trait
//! - [`checks`] - how each check classifies what the environment reports
//! - [`bot`] - heuristic human/bot scoring
//! - [`battery`] - the sequential runner and its progress events
//! - [`report`] - environment replayed from a front-end JSON report
//! - [`host`] - environment for the native host
//!
//! # Example
//!
//! ```rust,no_run
//! use qrkit_diagnostics::{DiagnosticBattery, HostEnvironment};
//!
//! # async fn example() {
//! let mut battery = DiagnosticBattery::default();
//! let summary = battery.run(&HostEnvironment::new()).await;
//! println!("{} passed, {} failed", summary.passed, summary.failed);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod battery;
pub mod bot;
pub mod check;
pub mod checks;
pub mod environment;
pub mod error;
pub mod host;
pub mod report;

pub use battery::{BatterySettings, DiagnosticBattery, DiagnosticEvent};
pub use bot::{BotProbe, BotSignals};
pub use check::{
    BatteryState, CheckKind, DiagnosticResult, DiagnosticStatus, DiagnosticSummary, Outcome,
};
pub use environment::{
    Capability, Environment, Feature, MediaError, MediaHandle, MediaKind, NotificationPermission,
};
pub use error::{DiagnosticError, Result};
pub use host::HostEnvironment;
pub use report::{EnvironmentReport, MediaReport, ReportedEnvironment};
