//! Template, validation, generation and scan commands.

use crate::state::AppState;
use anyhow::Context;
use qrkit_content::{ContentClass, QrTemplate, ValidationOptions, TEMPLATES};
use qrkit_engine::{data_uri_bytes, decode_image_bytes};
use std::io::Write;
use std::path::Path;

/// Print the template catalogue.
pub fn templates(out: &mut dyn Write) -> anyhow::Result<()> {
    for template in &TEMPLATES {
        writeln!(
            out,
            "{:<8} {:<14} {}",
            template.id.id(),
            template.name,
            template.placeholder
        )?;
    }
    Ok(())
}

/// Validate `input` as a required field of `class` and print the result as
/// JSON. Returns whether it was valid.
pub fn validate(class: ContentClass, input: &str, out: &mut dyn Write) -> anyhow::Result<bool> {
    let result = class.validate(input, &ValidationOptions::new().required(true));
    writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    Ok(result.is_valid())
}

/// Generate a code, record it, and either save the PNG or print the data URI.
pub async fn generate(
    state: &AppState,
    class: ContentClass,
    input: &str,
    out_path: Option<&Path>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let options = state.encode_options()?;
    let generated = state.generator.generate(class, input, &options).await?;
    let template = QrTemplate::for_class(class);

    writeln!(out, "Template: {}", template.name)?;
    writeln!(out, "Payload:  {}", generated.payload.escape_debug())?;
    writeln!(out, "History:  {}", generated.entry.id)?;

    match out_path {
        Some(path) => {
            let bytes = data_uri_bytes(&generated.image)?;
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(out, "Saved:    {}", path.display())?;
        }
        None => writeln!(out, "{}", generated.image)?,
    }
    Ok(())
}

/// Decode every QR code in an image file and print the raw payloads.
pub fn scan(state: &AppState, image: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let bytes = std::fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
    let payloads = decode_image_bytes(&state.decoder, &bytes)?;
    tracing::info!(count = payloads.len(), "Decoded image");
    for payload in payloads {
        writeln!(out, "{payload}")?;
    }
    Ok(())
}
