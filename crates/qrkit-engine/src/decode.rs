//! QR decoding from image frames.
//!
//! Scan results are raw strings. They are not sanitized or validated here;
//! what the caller does with them is up to the caller.

use crate::error::{EngineError, Result};
use futures::{Stream, StreamExt};
use image::GrayImage;
use rqrr::PreparedImage;

/// Decodes QR payloads from greyscale frames.
pub trait QrDecoder: Send + Sync {
    /// Every payload found in `frame`, in detection order.
    ///
    /// A frame with no symbol yields [`EngineError::NoCodeFound`].
    fn decode_frame(&self, frame: &GrayImage) -> Result<Vec<String>>;
}

/// [`QrDecoder`] backed by `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create the decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoder for RqrrDecoder {
    #[allow(clippy::cast_possible_truncation)]
    fn decode_frame(&self, frame: &GrayImage) -> Result<Vec<String>> {
        let (width, height) = frame.dimensions();
        let mut prepared = PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| frame.get_pixel(x as u32, y as u32)[0],
        );

        let grids = prepared.detect_grids();
        if grids.is_empty() {
            return Err(EngineError::NoCodeFound);
        }

        let mut payloads = Vec::with_capacity(grids.len());
        for grid in grids {
            let (meta, content) = grid
                .decode()
                .map_err(|e| EngineError::Decode(e.to_string()))?;
            tracing::debug!(version = ?meta.version, ecc = meta.ecc_level, "Decoded QR grid");
            payloads.push(content);
        }
        Ok(payloads)
    }
}

/// Load an encoded image (PNG or JPEG) and convert it to a greyscale frame.
pub fn load_frame(bytes: &[u8]) -> Result<GrayImage> {
    if bytes.is_empty() {
        return Err(EngineError::ImageLoad("image is empty".to_string()));
    }
    let image = image::load_from_memory(bytes).map_err(|e| EngineError::ImageLoad(e.to_string()))?;
    Ok(image.to_luma8())
}

/// Decode every payload in an encoded image.
pub fn decode_image_bytes(decoder: &dyn QrDecoder, bytes: &[u8]) -> Result<Vec<String>> {
    decoder.decode_frame(&load_frame(bytes)?)
}

/// Pulls frames until one decodes.
#[derive(Debug, Clone, Default)]
pub struct Scanner<D> {
    decoder: D,
}

impl<D: QrDecoder> Scanner<D> {
    /// Create a scanner around `decoder`.
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// First payload decoded from `frames`, or `None` once the stream ends.
    ///
    /// Per-frame failures are logged and skipped.
    pub async fn next_payload<S>(&self, frames: S) -> Option<String>
    where
        S: Stream<Item = GrayImage>,
    {
        futures::pin_mut!(frames);
        let mut index = 0_usize;

        while let Some(frame) = frames.next().await {
            match self.decoder.decode_frame(&frame) {
                Ok(payloads) => {
                    if let Some(payload) = payloads.into_iter().next() {
                        tracing::info!(frame = index, "QR code scanned");
                        return Some(payload);
                    }
                }
                Err(e) => tracing::debug!(frame = index, error = %e, "Frame did not decode"),
            }
            index += 1;
        }

        tracing::debug!(frames = index, "Frame stream ended without a QR code");
        None
    }
}
