use mentions_core::{CoreError, MatchRecord, SearchSource, Submission, Timeframe};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Submissions requested per phrase.
pub const POST_SEARCH_LIMIT: usize = 100;

/// Most recent comments scanned per run.
pub const COMMENT_SCAN_LIMIT: usize = 2000;

fn window_description(timeframe: Timeframe) -> String {
    if timeframe.is_today_only() {
        "day".to_string()
    } else {
        format!("{} days", timeframe.days())
    }
}

/// Searches submissions phrase by phrase.
///
/// A submission is kept when it falls inside `timeframe` and is reportable.
/// When several phrases find the same submission the earliest phrase in
/// `phrases` wins. Returns the records and the canonical URLs they cover.
pub async fn search_posts<S>(
    source: &S,
    community: &str,
    phrases: &[String],
    timeframe: Timeframe,
) -> Result<(Vec<MatchRecord>, HashSet<String>), CoreError>
where
    S: SearchSource + ?Sized,
{
    info!(
        "Searching posts in /r/{} for the past {}...",
        community,
        window_description(timeframe)
    );

    let mut results = Vec::new();
    let mut unique_urls = HashSet::new();

    for phrase in phrases {
        let submissions = source
            .search_submissions(community, phrase, POST_SEARCH_LIMIT)
            .await?;

        for submission in submissions {
            if !timeframe.contains(submission.created_utc) || !submission.is_reportable() {
                continue;
            }

            let url = submission.canonical_url();
            if unique_urls.insert(url) {
                results.push(MatchRecord::for_post(&submission, phrase));
            }
        }
    }

    debug!("Post search produced {} records", results.len());
    Ok((results, unique_urls))
}

/// Scans the newest comments for any configured phrase.
///
/// Comments whose parent submission is unreportable or already in
/// `known_urls` are skipped before any phrase is checked. A matching comment
/// yields one record for its first matching phrase and adds the parent URL to
/// `known_urls`, so each submission contributes at most one comment.
pub async fn search_comments<S>(
    source: &S,
    community: &str,
    phrases: &[String],
    timeframe: Timeframe,
    known_urls: &mut HashSet<String>,
) -> Result<Vec<MatchRecord>, CoreError>
where
    S: SearchSource + ?Sized,
{
    info!(
        "Searching comments in /r/{} for the past {}...",
        community,
        window_description(timeframe)
    );

    let lowered_phrases: Vec<(&String, String)> = phrases
        .iter()
        .map(|phrase| (phrase, phrase.to_lowercase()))
        .collect();

    let comments = source.recent_comments(community, COMMENT_SCAN_LIMIT).await?;
    let mut parents: HashMap<String, Submission> = HashMap::new();
    let mut results = Vec::new();

    for comment in comments {
        if !timeframe.contains(comment.created_utc) {
            continue;
        }

        if !parents.contains_key(&comment.submission_id) {
            let parent = source.submission(&comment.submission_id).await?;
            parents.insert(comment.submission_id.clone(), parent);
        }
        let Some(parent) = parents.get(&comment.submission_id) else {
            continue;
        };

        let parent_url = parent.canonical_url();
        if !parent.is_reportable() || known_urls.contains(&parent_url) {
            continue;
        }

        let body = comment.body.to_lowercase();
        if let Some((phrase, _)) = lowered_phrases
            .iter()
            .find(|(_, lowered)| body.contains(lowered.as_str()))
        {
            known_urls.insert(parent_url);
            results.push(MatchRecord::for_comment(&comment, parent, phrase));
        }
    }

    debug!(
        "Comment scan produced {} records ({} parents resolved)",
        results.len(),
        parents.len()
    );
    Ok(results)
}
