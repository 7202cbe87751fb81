//! Generic input validation.
//!
//! Validation always runs in this order:
//!
//! 1. sanitize (the `text` rule for [`validate`], the class rule for [`validate_as`])
//! 2. `required`
//! 3. `min_length` / `max_length`
//! 4. `pattern`
//! 5. the class rule from [`crate::rules`] ([`validate_as`] only)
//! 6. `custom_validator`, whose result is returned as-is
//!
//! Steps 2-5 short-circuit: the custom validator only sees input that
//! already passed every generic and class check.

use crate::class::ContentClass;
use crate::rules;
use crate::sanitize;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied final check run on the sanitized value.
pub type CustomValidator = Arc<dyn Fn(&str) -> ValidationResult + Send + Sync>;

/// Outcome of a validation call.
///
/// A valid result always carries the sanitized value and never an error; an
/// invalid one carries only the error. The constructors are the only way to
/// build one, so the pairing cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sanitized_value: Option<String>,
}

impl ValidationResult {
    /// A passing result carrying the normalized value.
    #[must_use]
    pub fn valid(sanitized_value: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            error: None,
            sanitized_value: Some(sanitized_value.into()),
        }
    }

    /// A failing result carrying a user-facing message.
    #[must_use]
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            sanitized_value: None,
        }
    }

    /// Whether the input passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The sanitized value, present only on success.
    #[must_use]
    pub fn sanitized_value(&self) -> Option<&str> {
        self.sanitized_value.as_deref()
    }

    /// Convert into a `Result` of sanitized value or error message.
    pub fn into_result(self) -> Result<String, String> {
        match (self.sanitized_value, self.error) {
            (Some(value), None) => Ok(value),
            (_, Some(error)) => Err(error),
            (None, None) => Err("Invalid input".to_string()),
        }
    }
}

/// Per-call validation constraints.
#[derive(Clone, Default)]
pub struct ValidationOptions {
    /// Maximum length in characters
    pub max_length: Option<usize>,
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Reject empty input
    pub required: bool,
    /// Pattern the sanitized value must match
    pub pattern: Option<Regex>,
    /// Terminal check run after all others pass
    pub custom_validator: Option<CustomValidator>,
}

impl ValidationOptions {
    /// Options with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the minimum length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set whether empty input is rejected.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Require the sanitized value to match `pattern`.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Install a custom validator.
    #[must_use]
    pub fn custom_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        self.custom_validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("max_length", &self.max_length)
            .field("min_length", &self.min_length)
            .field("required", &self.required)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom_validator", &self.custom_validator.is_some())
            .finish()
    }
}

/// Validate general text input using the `text` sanitizer.
#[must_use]
pub fn validate(input: &str, options: &ValidationOptions) -> ValidationResult {
    run(sanitize::text(input), None, options)
}

/// Validate input as a specific content class.
///
/// Uses the class sanitizer, then the generic checks, then the class rule.
#[must_use]
pub fn validate_as(class: ContentClass, input: &str, options: &ValidationOptions) -> ValidationResult {
    run(class.sanitize(input), Some(class), options)
}

fn run(sanitized: String, class: Option<ContentClass>, options: &ValidationOptions) -> ValidationResult {
    if let Some(error) = generic_error(&sanitized, options) {
        tracing::debug!(?class, %error, "generic validation failed");
        return ValidationResult::invalid(error);
    }

    if let Some(class) = class {
        if let Err(error) = rules::check(class, &sanitized) {
            tracing::debug!(%class, %error, "class validation failed");
            return ValidationResult::invalid(error);
        }
    }

    if let Some(custom) = &options.custom_validator {
        return custom(&sanitized);
    }

    ValidationResult::valid(sanitized)
}

fn generic_error(value: &str, options: &ValidationOptions) -> Option<String> {
    if options.required && value.is_empty() {
        return Some("This field is required".to_string());
    }

    let len = value.chars().count();
    if let Some(min) = options.min_length {
        if len < min {
            return Some(format!("Must be at least {min} characters"));
        }
    }
    if let Some(max) = options.max_length {
        if len > max {
            return Some(format!("Must be no more than {max} characters"));
        }
    }

    if let Some(pattern) = &options.pattern {
        if !pattern.is_match(value) {
            return Some("Invalid format".to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_result_pairing() {
        let ok = ValidationResult::valid("x");
        assert!(ok.is_valid());
        assert_eq!(ok.sanitized_value(), Some("x"));
        assert!(ok.error().is_none());

        let bad = ValidationResult::invalid("nope");
        assert!(!bad.is_valid());
        assert!(bad.sanitized_value().is_none());
        assert_eq!(bad.error(), Some("nope"));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(ValidationResult::valid("hi")).expect("serialize result");
        assert_eq!(json, serde_json::json!({"isValid": true, "sanitizedValue": "hi"}));
    }

    #[test]
    fn test_required_rejects_empty_after_sanitizing() {
        let options = ValidationOptions::new().required(true);
        let result = validate("  <>  ", &options);
        assert_eq!(result.error(), Some("This field is required"));
    }

    #[test]
    fn test_optional_empty_passes() {
        let result = validate("", &ValidationOptions::new());
        assert_eq!(result.sanitized_value(), Some(""));
    }

    #[test]
    fn test_length_bounds_name_the_bound() {
        let options = ValidationOptions::new().min_length(3).max_length(5);
        assert_eq!(
            validate("ab", &options).error(),
            Some("Must be at least 3 characters")
        );
        assert_eq!(
            validate("abcdef", &options).error(),
            Some("Must be no more than 5 characters")
        );
        assert!(validate("abcd", &options).is_valid());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let options = ValidationOptions::new().max_length(3);
        assert!(validate("äöü", &options).is_valid());
    }

    #[test]
    fn test_pattern_mismatch() {
        let options = ValidationOptions::new().pattern(Regex::new(r"^\d+$").expect("valid regex"));
        assert_eq!(validate("12a", &options).error(), Some("Invalid format"));
        assert_eq!(validate(" 123 ", &options).sanitized_value(), Some("123"));
    }

    #[test]
    fn test_custom_validator_is_terminal() {
        let options = ValidationOptions::new()
            .custom_validator(|value| ValidationResult::valid(value.to_uppercase()));
        assert_eq!(validate("abc", &options).sanitized_value(), Some("ABC"));

        let rejecting =
            ValidationOptions::new().custom_validator(|_| ValidationResult::invalid("custom says no"));
        assert_eq!(validate("abc", &rejecting).error(), Some("custom says no"));
    }

    #[test]
    fn test_generic_checks_short_circuit_custom_validator() {
        let options = ValidationOptions::new()
            .required(true)
            .custom_validator(|_| ValidationResult::valid("should not run"));
        assert_eq!(
            validate("", &options).error(),
            Some("This field is required")
        );
    }

    #[test]
    fn test_class_rule_runs_before_custom_validator() {
        let options =
            ValidationOptions::new().custom_validator(|_| ValidationResult::valid("override"));
        let result = validate_as(ContentClass::Email, "not-an-email", &options);
        assert_eq!(result.error(), Some("Invalid email format"));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationResult::valid("v").into_result(), Ok("v".to_string()));
        assert_eq!(
            ValidationResult::invalid("e").into_result(),
            Err("e".to_string())
        );
    }
}
