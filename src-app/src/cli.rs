use clap::{Parser, Subcommand};
use qrkit_content::ContentClass;
use std::path::PathBuf;

/// QRKit - generate and scan QR codes, check device capabilities
#[derive(Debug, Parser)]
#[command(name = "qrkit")]
#[command(version, about = "Generate and scan QR codes and run device diagnostics")]
pub struct Cli {
    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the available templates
    Templates,
    /// Sanitize and validate input for a template, printing the result as JSON
    Validate {
        /// Template id: text, url, wifi, contact, email or phone
        template: ContentClass,
        input: String,
    },
    /// Generate a QR code and record it in history
    Generate {
        /// Template id: text, url, wifi, contact, email or phone
        template: ContentClass,
        input: String,
        /// Write the PNG here instead of printing a data URI
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect or edit generation history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Show or change the QR colours
    Colors {
        #[command(subcommand)]
        action: ColorsAction,
    },
    /// Decode QR codes from an image file
    Scan { image: PathBuf },
    /// Run the device capability diagnostic
    Diagnose {
        /// Capability report (JSON) posted by a browser front-end
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List entries, newest first
    List,
    /// Remove one entry
    Remove { id: String },
    /// Remove every entry
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ColorsAction {
    /// Print the current colours
    Show,
    /// Change one or both colours (#rgb, #rrggbb or #rrggbbaa)
    Set {
        #[arg(long)]
        dark: Option<String>,
        #[arg(long)]
        light: Option<String>,
    },
}
