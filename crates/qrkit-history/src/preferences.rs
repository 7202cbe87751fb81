//! Persisted QR colour preferences.

use crate::error::{HistoryError, Result};
use crate::store::{KeyValueStore, KeyValueStoreExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Storage key for the module (foreground) colour.
pub const DARK_COLOR_KEY: &str = "qr-dark-color";

/// Storage key for the background colour.
pub const LIGHT_COLOR_KEY: &str = "qr-light-color";

static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
});

/// A `#rgb`, `#rrggbb` or `#rrggbbaa` colour, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse and normalise a hex colour.
    pub fn new(value: &str) -> Result<Self> {
        let value = value.trim();
        if HEX_COLOR_REGEX.is_match(value) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(HistoryError::InvalidColor(value.to_string()))
        }
    }

    /// Default dark colour (`#000000`).
    #[must_use]
    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    /// Default light colour (`#ffffff`).
    #[must_use]
    pub fn white() -> Self {
        Self("#ffffff".to_string())
    }

    /// The normalised string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RGBA channels. Short forms expand each digit; alpha defaults to opaque.
    #[must_use]
    pub fn rgba(&self) -> [u8; 4] {
        let digits = &self.0[1..];
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);

        match digits.len() {
            3 => {
                let mut out = [0xff; 4];
                for (i, c) in digits.chars().enumerate() {
                    let v = channel(&c.to_string());
                    out[i] = v * 16 + v;
                }
                out
            }
            8 => [
                channel(&digits[0..2]),
                channel(&digits[2..4]),
                channel(&digits[4..6]),
                channel(&digits[6..8]),
            ],
            _ => [
                channel(&digits[0..2]),
                channel(&digits[2..4]),
                channel(&digits[4..6]),
                0xff,
            ],
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = HistoryError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Dark and light colours used when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPair {
    /// Module colour
    pub dark: HexColor,
    /// Background colour
    pub light: HexColor,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            dark: HexColor::black(),
            light: HexColor::white(),
        }
    }
}

/// Colour preferences over a [`KeyValueStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    /// Create preferences over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current colours. Missing or invalid stored values fall back to the
    /// defaults independently.
    #[must_use]
    pub fn colors(&self) -> ColorPair {
        ColorPair {
            dark: self.color(DARK_COLOR_KEY, HexColor::black()),
            light: self.color(LIGHT_COLOR_KEY, HexColor::white()),
        }
    }

    /// Persist the dark colour.
    pub fn set_dark(&self, color: &HexColor) -> bool {
        tracing::debug!(color = %color, "Setting dark colour");
        self.store.set(DARK_COLOR_KEY, color)
    }

    /// Persist the light colour.
    pub fn set_light(&self, color: &HexColor) -> bool {
        tracing::debug!(color = %color, "Setting light colour");
        self.store.set(LIGHT_COLOR_KEY, color)
    }

    fn color(&self, key: &str, default: HexColor) -> HexColor {
        // Deserialization goes through HexColor::new, so bad values land on the default
        self.store.get(key, default)
    }
}
