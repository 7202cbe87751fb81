//! QR symbol encoding to PNG data URIs.

use crate::error::{EngineError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use qrkit_history::HexColor;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// Prefix of every URI produced by [`QrCodeEngine`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Largest image edge [`QrCodeEngine::render`] will allocate, in pixels.
pub const MAX_IMAGE_EDGE: u32 = 4096;

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// ~7% recovery
    Low,
    /// ~15% recovery
    #[default]
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

impl ErrorCorrection {
    fn level(self) -> EcLevel {
        match self {
            Self::Low => EcLevel::L,
            Self::Medium => EcLevel::M,
            Self::Quartile => EcLevel::Q,
            Self::High => EcLevel::H,
        }
    }

    /// Single-letter form (`L`, `M`, `Q`, `H`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::Low),
            "M" => Ok(Self::Medium),
            "Q" => Ok(Self::Quartile),
            "H" => Ok(Self::High),
            other => Err(EngineError::InvalidOption {
                field: "error_correction",
                reason: format!("'{other}' is not one of L, M, Q, H"),
            }),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering options for a single encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Output image edge in pixels. Raised to the symbol size when smaller.
    pub width: u32,
    /// Quiet zone in modules
    pub margin: u32,
    /// Module colour
    pub dark_color: HexColor,
    /// Background colour
    pub light_color: HexColor,
    /// Error correction level
    pub error_correction: ErrorCorrection,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            width: 256,
            margin: 4,
            dark_color: HexColor::black(),
            light_color: HexColor::white(),
            error_correction: ErrorCorrection::Medium,
        }
    }
}

impl EncodeOptions {
    /// Options from the generator section of the app config.
    pub fn from_config(config: &qrkit_core::GeneratorConfig) -> Result<Self> {
        Ok(Self {
            width: config.width,
            margin: config.margin,
            error_correction: config.error_correction.parse()?,
            ..Self::default()
        })
    }

    /// Replace both colours.
    #[must_use]
    pub fn with_colors(mut self, dark: HexColor, light: HexColor) -> Self {
        self.dark_color = dark;
        self.light_color = light;
        self
    }
}

/// Encodes payload strings into image data URIs.
pub trait QrEncoder: Send + Sync {
    /// Encode `payload` and return a `data:` URI of the rendered image.
    fn encode(&self, payload: &str, options: &EncodeOptions) -> Result<String>;
}

/// [`QrEncoder`] backed by the `qrcode` crate, rendering PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEngine;

impl QrCodeEngine {
    /// Create the engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render `payload` to an RGBA bitmap.
    pub fn render(&self, payload: &str, options: &EncodeOptions) -> Result<RgbaImage> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), options.error_correction.level())
            .map_err(|e| EngineError::Encode(e.to_string()))?;

        let modules = u32::try_from(code.width()).map_err(|e| EngineError::Encode(e.to_string()))?;
        let colors = code.to_colors();
        let total = options
            .margin
            .checked_mul(2)
            .and_then(|quiet| quiet.checked_add(modules))
            .filter(|total| *total <= MAX_IMAGE_EDGE)
            .ok_or_else(|| EngineError::InvalidOption {
                field: "margin",
                reason: format!("{} modules of quiet zone do not fit the image", options.margin),
            })?;
        if options.width > MAX_IMAGE_EDGE {
            return Err(EngineError::InvalidOption {
                field: "width",
                reason: format!("{} exceeds the {MAX_IMAGE_EDGE} pixel limit", options.width),
            });
        }
        let size = options.width.max(total);

        let dark = Rgba(options.dark_color.rgba());
        let light = Rgba(options.light_color.rgba());

        let image = RgbaImage::from_fn(size, size, |x, y| {
            // Map each pixel back onto the module grid, quiet zone included
            let mx = u64::from(x) * u64::from(total) / u64::from(size);
            let my = u64::from(y) * u64::from(total) / u64::from(size);
            let margin = u64::from(options.margin);
            let width = u64::from(modules);

            if mx < margin || my < margin || mx >= margin + width || my >= margin + width {
                return light;
            }
            #[allow(clippy::cast_possible_truncation)]
            let index = ((my - margin) * width + (mx - margin)) as usize;
            match colors.get(index) {
                Some(Color::Dark) => dark,
                _ => light,
            }
        });

        tracing::debug!(
            version = ?code.version(),
            modules,
            size,
            ecc = %options.error_correction,
            "Rendered QR symbol"
        );
        Ok(image)
    }
}

impl QrEncoder for QrCodeEngine {
    fn encode(&self, payload: &str, options: &EncodeOptions) -> Result<String> {
        let image = self.render(payload, options)?;
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| EngineError::ImageWrite(e.to_string()))?;
        Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(buffer)))
    }
}

/// Decode the bytes of a data URI produced by [`QrCodeEngine`].
pub fn data_uri_bytes(uri: &str) -> Result<Vec<u8>> {
    let encoded = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or_else(|| EngineError::ImageLoad("not a PNG data URI".to_string()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| EngineError::ImageLoad(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_correction_parse() {
        assert_eq!("m".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::Medium);
        assert_eq!(" H ".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::High);
        assert!("X".parse::<ErrorCorrection>().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = EncodeOptions::default();
        assert_eq!(options.width, 256);
        assert_eq!(options.margin, 4);
        assert_eq!(options.dark_color.as_str(), "#000000");
        assert_eq!(options.light_color.as_str(), "#ffffff");
        assert_eq!(options.error_correction, ErrorCorrection::Medium);
    }

    #[test]
    fn test_options_from_config() {
        let config = qrkit_core::GeneratorConfig {
            width: 300,
            error_correction: "q".to_string(),
            ..Default::default()
        };
        let options = EncodeOptions::from_config(&config).unwrap();
        assert_eq!(options.width, 300);
        assert_eq!(options.error_correction, ErrorCorrection::Quartile);
    }

    #[test]
    fn test_render_size_and_colors() {
        let options = EncodeOptions::default().with_colors(
            HexColor::new("#ff0000").unwrap(),
            HexColor::new("#00ff00").unwrap(),
        );
        let image = QrCodeEngine::new().render("hello", &options).unwrap();
        assert_eq!(image.dimensions(), (256, 256));
        // Quiet zone corner is background
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert!(image.pixels().any(|p| p == &Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_small_width_grows_to_symbol() {
        let options = EncodeOptions {
            width: 1,
            ..EncodeOptions::default()
        };
        let image = QrCodeEngine::new().render("hello", &options).unwrap();
        // Version 1 is 21 modules, plus 4 on each side
        assert_eq!(image.width(), 29);
    }

    #[test]
    fn test_oversized_margin_and_width_are_rejected() {
        let engine = QrCodeEngine::new();
        let huge_margin = EncodeOptions {
            margin: u32::MAX,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            engine.render("hello", &huge_margin),
            Err(EngineError::InvalidOption { field: "margin", .. })
        ));

        let huge_width = EncodeOptions {
            width: 4_000_000_000,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            engine.render("hello", &huge_width),
            Err(EngineError::InvalidOption { field: "width", .. })
        ));

        let at_limit = EncodeOptions {
            width: 512,
            margin: 64,
            ..EncodeOptions::default()
        };
        assert_eq!(engine.render("hello", &at_limit).unwrap().width(), 512);
    }

    #[test]
    fn test_encode_produces_png_data_uri() {
        let uri = QrCodeEngine::new()
            .encode("https://example.com", &EncodeOptions::default())
            .unwrap();
        assert!(uri.starts_with(PNG_DATA_URI_PREFIX));
        let bytes = data_uri_bytes(&uri).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_oversized_payload_fails() {
        let payload = "x".repeat(8000);
        let err = QrCodeEngine::new()
            .encode(&payload, &EncodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Encode(_)));
    }
}
