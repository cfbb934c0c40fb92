//! Core CLI arguments structure
//!
//! Validation-light by design: the interactive loop and the record store do
//! the real checking. Configuration file loading lives in the sibling
//! `config` module.

use clap::Parser;
use std::path::PathBuf;

/// Command-line options for the arrival audit terminal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scandock")]
#[command(about = "Arrival audit terminal for scan-driven manifest reconciliation")]
#[command(version)]
pub struct Args {
    /// Organization id scoping all manifest lookups
    #[arg(short = 'O', long = "org", value_name = "ORG_ID")]
    pub org: Option<String>,

    /// Seed data file (JSON manifests and shipments) for the in-memory store
    #[arg(short = 's', long = "seed", value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Manifest code to open an audit session for at startup
    #[arg(short = 'm', long = "manifest", value_name = "CODE")]
    pub manifest: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Disable the terminal bell feedback signals
    #[arg(long = "no-bell")]
    pub no_bell: bool,
}

impl Args {
    /// Effective organization id; a single-tenant default keeps ad-hoc use
    /// working without flags
    pub fn org_id(&self) -> &str {
        self.org.as_deref().unwrap_or("default")
    }

    pub fn use_color(&self) -> bool {
        self.color || !self.no_color
    }
}
