use clap::Parser;
use mentions_core::DEFAULT_ERROR_LOG;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reddit-mentions")]
#[command(version, about = "Search Reddit for mentions within a timeframe.", long_about = None)]
pub struct Cli {
    /// Number of days to search (0 for today only)
    #[arg(long, default_value_t = 0)]
    pub days: u32,

    /// Path to the JSON file naming the subreddit and search phrases
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Directory holding the daily and weekly result files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Append-only log of caught failures
    #[arg(long, default_value = DEFAULT_ERROR_LOG)]
    pub error_log: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["reddit-mentions"]).unwrap();
        assert_eq!(cli.days, 0);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.error_log, PathBuf::from("logs/error.log"));
    }

    #[test]
    fn test_days_flag() {
        let cli = Cli::try_parse_from(["reddit-mentions", "--days", "7"]).unwrap();
        assert_eq!(cli.days, 7);
    }

    #[test]
    fn test_rejects_non_integer_days() {
        assert!(Cli::try_parse_from(["reddit-mentions", "--days", "week"]).is_err());
        assert!(Cli::try_parse_from(["reddit-mentions", "--days", "-1"]).is_err());
    }
}
