//! CLI definition

use clap::Parser;
use std::path::PathBuf;

/// ingestd - priority batch ingestion daemon
#[derive(Debug, Parser)]
#[command(
    name = "ind",
    about = "Priority-scheduled batch ingestion daemon",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::parse_from(["ind"]);
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["ind", "-c", "custom.yml", "--log-level", "DEBUG", "-p", "9000"]);
        assert_eq!(cli.config.unwrap(), PathBuf::from("custom.yml"));
        assert_eq!(cli.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(cli.port, Some(9000));
    }
}
