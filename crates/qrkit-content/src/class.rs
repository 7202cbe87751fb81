//! The closed set of QR content classes.

use crate::sanitize;
use crate::template;
use crate::validation::{self, ValidationOptions, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of payload a QR code carries.
///
/// Every class dispatches to its own sanitizer, validator rule and payload
/// formatter through exhaustive matches, so adding a class forces all three
/// to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentClass {
    /// Free-form text
    Text,
    /// Web address
    Url,
    /// WiFi network credentials (`SSID,password,security`)
    Wifi,
    /// Contact card (`name,phone,email`)
    Contact,
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl ContentClass {
    /// Stable identifier used in persisted data and on the command line.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Wifi => "wifi",
            Self::Contact => "contact",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// All classes in catalogue order.
    #[must_use]
    pub fn all() -> &'static [ContentClass] {
        &[
            Self::Text,
            Self::Url,
            Self::Wifi,
            Self::Contact,
            Self::Email,
            Self::Phone,
        ]
    }

    /// Apply this class's sanitizer.
    #[must_use]
    pub fn sanitize(&self, input: &str) -> String {
        match self {
            Self::Text => sanitize::text(input),
            Self::Url => sanitize::url(input),
            Self::Wifi | Self::Contact => sanitize::structured(input),
            Self::Email => sanitize::email(input),
            Self::Phone => sanitize::phone(input),
        }
    }

    /// Validate input as this class.
    #[must_use]
    pub fn validate(&self, input: &str, options: &ValidationOptions) -> ValidationResult {
        validation::validate_as(*self, input, options)
    }

    /// Turn an already validated value into the QR payload string.
    #[must_use]
    pub fn format(&self, value: &str) -> String {
        template::format(*self, value)
    }
}

impl fmt::Display for ContentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Returned when a string names no known content class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content class '{0}' (expected text, url, wifi, contact, email or phone)")]
pub struct ParseContentClassError(pub String);

impl FromStr for ContentClass {
    type Err = ParseContentClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|class| class.id() == needle)
            .ok_or_else(|| ParseContentClassError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = ContentClass::all().iter().map(ContentClass::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ContentClass::all().len());
    }

    #[test]
    fn test_parse_round_trips_ids() {
        for class in ContentClass::all() {
            assert_eq!(class.id().parse::<ContentClass>(), Ok(*class));
        }
        assert_eq!(" WiFi ".parse::<ContentClass>(), Ok(ContentClass::Wifi));
        assert!("vcard".parse::<ContentClass>().is_err());
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&ContentClass::Contact).expect("serialize class");
        assert_eq!(json, "\"contact\"");
    }

    #[test]
    fn test_dispatch_uses_class_sanitizer() {
        assert_eq!(ContentClass::Email.sanitize(" Jane@X.COM "), "jane@x.com");
        assert_eq!(ContentClass::Wifi.sanitize("a;b\"c"), "abc");
    }
}
