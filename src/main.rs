use anyhow::{Context, Result};
use clap::Parser;
use mentions_core::{ErrorExt, ErrorLog, Settings, Timeframe};
use notifier::EmailNotifier;
use reddit_client::RedditClient;
use reddit_mentions::cli::Cli;
use reddit_mentions::run_once;
use result_store::ResultStore;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str =
    "reddit_mentions=info,reddit_client=info,result_store=info,notifier=info,mentions_core=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();

    // Startup failures are fatal but not written to the error log
    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            e.log_error();
            eprintln!("Startup failed: {}", e.user_friendly_message());
            return ExitCode::FAILURE;
        }
    };

    let error_log = ErrorLog::new(&cli.error_log);
    if let Err(e) = execute(&cli, &settings, &error_log).await {
        let message = format!("Script execution failed: {:#}", e);
        if let Err(log_err) = error_log.record(&message, Some(&format!("{:?}", e))) {
            tracing::warn!(
                "Could not write to error log {}: {}",
                error_log.path().display(),
                log_err
            );
        }
        eprintln!("{}", message);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn execute(cli: &Cli, settings: &Settings, error_log: &ErrorLog) -> Result<()> {
    let timeframe = Timeframe::new(cli.days);
    let store = ResultStore::for_timeframe(&cli.output_dir, timeframe);

    let reddit = RedditClient::connect(settings.reddit.clone())
        .await
        .context("Could not authenticate with Reddit")?;
    let notifier = EmailNotifier::new(settings.smtp.clone());

    let summary = run_once(
        &reddit,
        &notifier,
        &store,
        error_log,
        &settings.search,
        timeframe,
    )
    .await
    .with_context(|| format!("Search of r/{} failed", settings.search.subreddit_name))?;

    tracing::info!(
        "Run complete: {} posts, {} comments, {} new, email sent: {}",
        summary.posts_found,
        summary.comments_found,
        summary.new_results.len(),
        summary.notified
    );
    Ok(())
}
