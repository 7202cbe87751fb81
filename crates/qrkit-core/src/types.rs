//! Shared types used across the QRKit workspace.
//!
//! This module defines common newtypes that provide type safety
//! and clear domain modeling.

use crate::error::QrkitError;
use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix appended to a generated `HistoryId`.
const RANDOM_SUFFIX_LEN: usize = 6;

/// Newtype for history entry identifiers.
///
/// Generated IDs are `<epoch-ms in base 36>-<random base 36 suffix>`, so they
/// sort roughly by creation time and stay unique within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryId(String);

impl HistoryId {
    /// Create a `HistoryId` from an existing string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains characters outside
    /// lowercase alphanumerics and hyphens.
    pub fn new(id: impl Into<String>) -> Result<Self, QrkitError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Generate a new ID from the current time plus a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_at(Timestamp::now())
    }

    /// Generate an ID for a specific creation time.
    #[must_use]
    pub fn generate_at(at: Timestamp) -> Self {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or_default();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("{}-{suffix}", to_base36(millis)))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), QrkitError> {
        static ID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            ID_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,63}$").expect("valid regex"));

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(QrkitError::Validation(format!(
                "invalid history ID: must be 1-64 lowercase alphanumerics or hyphens, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        // value % 36 is always < 36
        #[allow(clippy::cast_possible_truncation)]
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
///
/// Serializes as milliseconds since the Unix epoch, the form persisted in
/// history snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment, truncated to
    /// the millisecond precision it is stored with.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(3))
    }

    /// Create a timestamp from milliseconds since the Unix epoch.
    ///
    /// # Errors
    /// Returns error if the value is outside the representable range.
    pub fn from_millis(millis: i64) -> Result<Self, QrkitError> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(Self)
            .ok_or_else(|| QrkitError::Validation(format!("invalid timestamp: {millis} ms")))
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Get milliseconds since Unix epoch.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_id_generate_unique() {
        let at = Timestamp::now();
        let id1 = HistoryId::generate_at(at);
        let id2 = HistoryId::generate_at(at);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_history_id_time_prefix() {
        let at = Timestamp::from_millis(1_700_000_000_000).expect("valid millis");
        let id = HistoryId::generate_at(at);
        let (prefix, suffix) = id.as_str().split_once('-').expect("has separator");
        assert_eq!(prefix, to_base36(1_700_000_000_000));
        assert_eq!(suffix.len(), RANDOM_SUFFIX_LEN);
        assert!(HistoryId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_history_id_invalid() {
        let too_long = "a".repeat(65);
        for id in ["", "Upper", "has space", "-leading", too_long.as_str()] {
            assert!(HistoryId::new(id).is_err(), "Should fail for: {id}");
        }
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_timestamp_serializes_as_millis() {
        let ts = Timestamp::from_millis(1_700_000_000_123).expect("valid millis");
        let json = serde_json::to_string(&ts).expect("serialize timestamp");
        assert_eq!(json, "1700000000123");

        let parsed: Timestamp = serde_json::from_str(&json).expect("deserialize timestamp");
        assert_eq!(parsed, ts);
    }

    #[test]
    fn test_timestamp_now_survives_serialization() {
        let now = Timestamp::now();
        let json = serde_json::to_string(&now).expect("serialize timestamp");
        let parsed: Timestamp = serde_json::from_str(&json).expect("deserialize timestamp");
        assert_eq!(parsed, now);
        assert_eq!(now.as_datetime().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_timestamp_ordering() {
        let ts1 = Timestamp::from_millis(1_000).expect("valid millis");
        let ts2 = Timestamp::from_millis(2_000).expect("valid millis");
        assert!(ts2 > ts1);
    }
}
