//! Per-class structural rules layered on top of the generic validator.
//!
//! Each rule receives an already sanitized value and returns the user-facing
//! error message on failure.

use crate::class::ContentClass;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[0-9\s\-\(\)\.]{7,}$").expect("valid phone regex"));

/// Security tokens accepted in WiFi input, compared case-insensitively.
pub const WIFI_SECURITY_TYPES: [&str; 5] = ["WPA", "WPA2", "WPA3", "WEP", "NONE"];

/// Run the rule for `class` against a sanitized value.
pub fn check(class: ContentClass, value: &str) -> Result<(), String> {
    match class {
        ContentClass::Text => Ok(()),
        ContentClass::Url => check_url(value),
        ContentClass::Email => check_email(value),
        ContentClass::Phone => check_phone(value),
        ContentClass::Wifi => check_wifi(value),
        ContentClass::Contact => check_contact(value),
    }
}

/// Absolute `http`/`https` URL with a host.
pub fn check_url(value: &str) -> Result<(), String> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(()),
        _ => Err("Invalid URL format".to_string()),
    }
}

/// `local@domain.tld` shape with no whitespace.
pub fn check_email(value: &str) -> Result<(), String> {
    if EMAIL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Optional leading `+` followed by at least seven dial characters.
pub fn check_phone(value: &str) -> Result<(), String> {
    if PHONE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err("Invalid phone number format".to_string())
    }
}

/// `SSID,password,security` with a recognised security token.
pub fn check_wifi(value: &str) -> Result<(), String> {
    let parts = split_fields(value);
    let [ssid, password, security, ..] = parts.as_slice() else {
        return Err("Please provide NetworkName,Password,SecurityType".to_string());
    };

    if ssid.is_empty() {
        return Err("Network name (SSID) is required".to_string());
    }
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if !WIFI_SECURITY_TYPES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(security))
    {
        return Err(format!(
            "Security type must be one of: {}",
            WIFI_SECURITY_TYPES.join(", ")
        ));
    }

    Ok(())
}

/// `name,phone,email`; phone and email are optional but checked when present.
pub fn check_contact(value: &str) -> Result<(), String> {
    let parts = split_fields(value);
    let [name, phone, email, ..] = parts.as_slice() else {
        return Err("Please provide Name,Phone,Email".to_string());
    };

    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if !phone.is_empty() {
        check_phone(phone).map_err(|e| format!("Phone: {e}"))?;
    }
    if !email.is_empty() {
        check_email(email).map_err(|e| format!("Email: {e}"))?;
    }

    Ok(())
}

/// Split comma-separated input into trimmed fields.
pub(crate) fn split_fields(value: &str) -> Vec<&str> {
    value.split(',').map(str::trim).collect()
}
