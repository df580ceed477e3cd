#![allow(dead_code)]

use async_trait::async_trait;
use mentions_core::{
    Comment, CoreError, MatchRecord, NotifyError, RedditApiError, SearchSource, Submission,
    Timeframe,
};
use notifier::Notifier;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn now_ts() -> f64 {
    chrono::Utc::now().timestamp() as f64
}

pub fn days_ago(days: i64) -> f64 {
    (chrono::Utc::now() - chrono::Duration::days(days)).timestamp() as f64
}

pub fn submission(id: &str, title: &str, created_utc: f64) -> Submission {
    Submission {
        id: id.to_string(),
        title: title.to_string(),
        selftext: format!("{} body", title),
        author: Some("poster".to_string()),
        permalink: format!("/r/testsub/comments/{}/post/", id),
        created_utc,
        locked: false,
        removed_by_category: None,
    }
}

pub fn comment(id: &str, submission_id: &str, body: &str, created_utc: f64) -> Comment {
    Comment {
        id: id.to_string(),
        body: body.to_string(),
        created_utc,
        submission_id: submission_id.to_string(),
    }
}

pub fn url_of(id: &str) -> String {
    format!("https://reddit.com/r/testsub/comments/{}/post/", id)
}

/// In-memory platform: canned search hits per phrase, a comment feed and a
/// submission table for parent lookups.
#[derive(Default)]
pub struct FakeSource {
    pub search_hits: HashMap<String, Vec<Submission>>,
    pub comments: Vec<Comment>,
    pub submissions: HashMap<String, Submission>,
    pub lookups: Mutex<Vec<String>>,
    pub searches: Mutex<Vec<(String, usize)>>,
    pub comment_scans: Mutex<Vec<usize>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(mut self, phrase: &str, submission: Submission) -> Self {
        self.submissions
            .insert(submission.id.clone(), submission.clone());
        self.search_hits
            .entry(phrase.to_string())
            .or_default()
            .push(submission);
        self
    }

    pub fn with_submission(mut self, submission: Submission) -> Self {
        self.submissions.insert(submission.id.clone(), submission);
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchSource for FakeSource {
    async fn search_submissions(
        &self,
        community: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, CoreError> {
        assert_eq!(community, "testsub");
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), limit));
        Ok(self
            .search_hits
            .get(query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect())
    }

    async fn recent_comments(
        &self,
        community: &str,
        limit: usize,
    ) -> Result<Vec<Comment>, CoreError> {
        assert_eq!(community, "testsub");
        self.comment_scans.lock().unwrap().push(limit);
        Ok(self.comments.iter().take(limit).cloned().collect())
    }

    async fn submission(&self, id: &str) -> Result<Submission, CoreError> {
        self.lookups.lock().unwrap().push(id.to_string());
        self.submissions.get(id).cloned().ok_or_else(|| {
            CoreError::RedditApi(RedditApiError::PostNotFound {
                post_id: id.to_string(),
            })
        })
    }
}

/// Source whose search endpoint always fails.
pub struct BrokenSource;

#[async_trait]
impl SearchSource for BrokenSource {
    async fn search_submissions(
        &self,
        _community: &str,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<Submission>, CoreError> {
        Err(CoreError::RedditApi(RedditApiError::ServerError {
            status_code: 503,
        }))
    }

    async fn recent_comments(
        &self,
        _community: &str,
        _limit: usize,
    ) -> Result<Vec<Comment>, CoreError> {
        Ok(Vec::new())
    }

    async fn submission(&self, id: &str) -> Result<Submission, CoreError> {
        Err(CoreError::RedditApi(RedditApiError::PostNotFound {
            post_id: id.to_string(),
        }))
    }
}

/// Notifier that records every digest it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<(Vec<MatchRecord>, Timeframe)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(Vec<MatchRecord>, Timeframe)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        records: &[MatchRecord],
        timeframe: Timeframe,
    ) -> Result<(), CoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((records.to_vec(), timeframe));
        if self.fail {
            return Err(CoreError::Notify(NotifyError::Transport {
                reason: "connection refused".to_string(),
            }));
        }
        Ok(())
    }
}
