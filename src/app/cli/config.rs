//! TOML configuration file parsing and loading
//!
//! Handles loading and parsing of TOML configuration files, including
//! default config file discovery. Command-line flags take precedence over
//! file values.

use std::path::PathBuf;

use super::args::Args;

impl Args {
    /// Load the config file (explicit path or default location) and fill in
    /// any options the command line left unset
    pub async fn parse_config_file(args: &mut Self, config_file: Option<PathBuf>) {
        let config_path = match config_file {
            Some(path) => {
                // User specified a config file - it must exist
                if !path.exists() {
                    eprintln!(
                        "Error: The specified configuration file does not exist: {}",
                        path.display()
                    );
                    std::process::exit(1);
                }
                Some(path)
            }
            None => {
                let default_path =
                    dirs::config_dir().map(|d| d.join("scandock").join("scandock.toml"));
                match default_path {
                    Some(path) if path.exists() => Some(path),
                    _ => None, // No config file to load
                }
            }
        };

        let Some(path) = config_path else {
            return;
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match toml::from_str::<toml::Table>(&contents) {
                Ok(config) => Self::apply_toml_values(args, &config),
                Err(e) => {
                    eprintln!("Error parsing configuration file {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error reading configuration file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    /// Apply TOML configuration values to Args
    ///
    /// File values only fill gaps; anything already set on the command line
    /// is left alone.
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) {
        if args.org.is_none() {
            if let Some(org) = config.get("org").and_then(|v| v.as_str()) {
                args.org = Some(org.to_string());
            }
        }
        if args.seed.is_none() {
            if let Some(seed) = config.get("seed").and_then(|v| v.as_str()) {
                args.seed = Some(PathBuf::from(seed));
            }
        }
        if args.manifest.is_none() {
            if let Some(manifest) = config.get("manifest").and_then(|v| v.as_str()) {
                args.manifest = Some(manifest.to_string());
            }
        }
        if args.log_level.is_none() {
            if let Some(level) = config.get("log-level").and_then(|v| v.as_str()) {
                args.log_level = Some(level.to_string());
            }
        }
        if args.log_format.is_none() {
            if let Some(format) = config.get("log-format").and_then(|v| v.as_str()) {
                args.log_format = Some(format.to_string());
            }
        }
        if args.log_file.is_none() {
            if let Some(file) = config.get("log-file").and_then(|v| v.as_str()) {
                args.log_file = Some(PathBuf::from(file));
            }
        }
        if let Some(no_bell) = config.get("no-bell").and_then(|v| v.as_bool()) {
            args.no_bell = args.no_bell || no_bell;
        }
        if let Some(no_color) = config.get("no-color").and_then(|v| v.as_bool()) {
            args.no_color = args.no_color || no_color;
        }
    }
}
