use std::path::PathBuf;

use clap::Parser;

/// Dataset read when neither `--data` nor `STEAM_DASHBOARD_DATA` is given.
pub const DEFAULT_DATA_PATH: &str = "./Steam_2024_bestRevenue_1500.csv";

// ---------------------------------------------------------------------------
// Command line / environment configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Parser)]
#[command(name = "steam-dashboard")]
#[command(about = "Interactive dashboard for storefront game sales", long_about = None)]
#[command(version)]
pub struct Config {
    /// Dataset to load (.csv, .tsv, .json or .parquet)
    #[arg(long, env = "STEAM_DASHBOARD_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Field separator for delimited files (`,`, `;`, `tab`, ...)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Debug logging and recompute timings in the status bar
    #[arg(long)]
    pub debug: bool,

    /// Initial window width
    #[arg(long, default_value_t = 1400.0)]
    pub width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

impl Config {
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_bundled_dataset() {
        let config = Config::try_parse_from(["steam-dashboard"]).expect("parse");
        // The env var may be set in the test environment; only check it when not.
        if std::env::var_os("STEAM_DASHBOARD_DATA").is_none() {
            assert_eq!(config.data, PathBuf::from(DEFAULT_DATA_PATH));
        }
        assert_eq!(config.delimiter, None);
        assert!(!config.debug);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn flags_are_parsed() {
        let config = Config::try_parse_from([
            "steam-dashboard",
            "--data",
            "games.tsv",
            "--delimiter",
            "tab",
            "--debug",
            "--width",
            "800",
        ])
        .expect("parse");
        assert_eq!(config.data, PathBuf::from("games.tsv"));
        assert_eq!(config.delimiter, Some(b'\t'));
        assert!(config.debug);
        assert_eq!(config.log_filter(), "debug");
        assert_eq!(config.width, 800.0);
    }

    #[test]
    fn multi_character_delimiters_are_rejected() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter("::").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(Config::try_parse_from(["steam-dashboard", "--delimiter", "ab"]).is_err());
    }
}
