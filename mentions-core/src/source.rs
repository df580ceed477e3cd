use crate::{Comment, CoreError, Submission};
use async_trait::async_trait;

/// Keyword search and recent-comment feed for one community.
///
/// The Reddit client is the production implementation; tests substitute an
/// in-memory one.
#[async_trait]
pub trait SearchSource {
    /// Submissions in `community` matching `query`, at most `limit` of them,
    /// in the order the platform ranks them.
    async fn search_submissions(
        &self,
        community: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, CoreError>;

    /// The `limit` most recent comments in `community`, newest first.
    async fn recent_comments(
        &self,
        community: &str,
        limit: usize,
    ) -> Result<Vec<Comment>, CoreError>;

    /// Resolves the submission a comment belongs to.
    async fn submission(&self, id: &str) -> Result<Submission, CoreError>;
}
