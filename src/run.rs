use crate::search::{search_comments, search_posts};
use mentions_core::{
    cause_chain, CoreError, ErrorExt, ErrorLog, MatchRecord, SearchConfig, SearchSource, Timeframe,
};
use notifier::Notifier;
use result_store::{new_results, ResultStore};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub posts_found: usize,
    pub comments_found: usize,
    pub new_results: Vec<MatchRecord>,
    pub notified: bool,
}

/// One pass: search posts, scan comments, keep what the previous run did not
/// report, overwrite the result file, then send the digest.
///
/// A failed digest is written to `error_log` and does not fail the run.
/// Any other error aborts before the result file is touched.
pub async fn run_once<S, N>(
    source: &S,
    notifier: &N,
    store: &ResultStore,
    error_log: &ErrorLog,
    search: &SearchConfig,
    timeframe: Timeframe,
) -> Result<RunSummary, CoreError>
where
    S: SearchSource + ?Sized,
    N: Notifier + ?Sized,
{
    let community = search.subreddit_name.as_str();
    let phrases = search.search_phrases.as_slice();

    let existing_urls = store.load_existing().await;

    let (post_results, mut known_urls) =
        search_posts(source, community, phrases, timeframe).await?;
    known_urls.extend(existing_urls.iter().cloned());
    let comment_results =
        search_comments(source, community, phrases, timeframe, &mut known_urls).await?;

    let posts_found = post_results.len();
    let comments_found = comment_results.len();

    let mut all_results = post_results;
    all_results.extend(comment_results);
    let fresh = new_results(all_results, &existing_urls);

    store.save(&fresh).await?;

    let mut notified = false;
    if fresh.is_empty() {
        info!("No new results; skipping email");
    } else {
        match notifier.notify(&fresh, timeframe).await {
            Ok(()) => notified = true,
            Err(e) => {
                e.log_error();
                let message = format!("Failed to send email: {}", e);
                if let Err(log_err) = error_log.record(&message, Some(&cause_chain(&e))) {
                    warn!(
                        "Could not write to error log {}: {}",
                        error_log.path().display(),
                        log_err
                    );
                }
            }
        }
    }

    Ok(RunSummary {
        posts_found,
        comments_found,
        new_results: fresh,
        notified,
    })
}
