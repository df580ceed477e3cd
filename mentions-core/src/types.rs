use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

const REDDIT_WEB_BASE: &str = "https://reddit.com";

/// Whether a match came from a submission itself or from a comment on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    Post,
    Comment,
}

/// One reported occurrence of a configured phrase.
///
/// `url` is always the canonical URL of the submission, so a post and the
/// comments under it share a dedup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub title: String,
    pub body: String,
    pub url: String,
    pub created_utc: f64,
    pub date: String,
    pub matched_phrase: String,
}

impl MatchRecord {
    pub fn for_post(submission: &Submission, phrase: &str) -> Self {
        Self {
            kind: MatchKind::Post,
            title: submission.title.clone(),
            body: submission.selftext.clone(),
            url: submission.canonical_url(),
            created_utc: submission.created_utc,
            date: local_date(submission.created_utc),
            matched_phrase: phrase.to_string(),
        }
    }

    pub fn for_comment(comment: &Comment, parent: &Submission, phrase: &str) -> Self {
        Self {
            kind: MatchKind::Comment,
            title: parent.title.clone(),
            body: comment.body.clone(),
            url: parent.canonical_url(),
            created_utc: comment.created_utc,
            date: local_date(comment.created_utc),
            matched_phrase: phrase.to_string(),
        }
    }
}

/// A submission as returned by the search capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub selftext: String,
    /// `None` when the author account was deleted.
    pub author: Option<String>,
    pub permalink: String,
    pub created_utc: f64,
    pub locked: bool,
    pub removed_by_category: Option<String>,
}

impl Submission {
    pub fn canonical_url(&self) -> String {
        format!("{}{}", REDDIT_WEB_BASE, self.permalink)
    }

    /// Locked, removed and authorless submissions are never reported, and
    /// neither are comments beneath them.
    pub fn is_reportable(&self) -> bool {
        !self.locked && self.removed_by_category.is_none() && self.author.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub created_utc: f64,
    /// Base36 id of the parent submission, without the `t3_` prefix.
    pub submission_id: String,
}

/// Formats an epoch timestamp as `YYYY-MM-DD` in the host's local zone.
pub fn local_date(created_utc: f64) -> String {
    let seconds = created_utc.floor() as i64;
    match Local.timestamp_opt(seconds, 0).single() {
        Some(local) => local.format("%Y-%m-%d").to_string(),
        None => "1970-01-01".to_string(),
    }
}
