use mentions_core::{Comment, CoreError, RedditApiError, Submission};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit refuses listing pages larger than this.
pub const MAX_PAGE_SIZE: usize = 100;

const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub dist: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,
    pub subreddit: String,
    pub permalink: String,
    pub created_utc: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub removed_by_category: Option<String>,
    #[serde(default)]
    pub num_comments: u32,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    pub created_utc: f64,
    /// Fullname of the parent submission, e.g. `t3_abc123`.
    pub link_id: String,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RedditApiClient {
    http_client: Client,
    user_agent: String,
    base_url: String,
}

impl RedditApiClient {
    pub fn new(user_agent: String) -> Result<Self, CoreError> {
        Self::with_base_url(user_agent, REDDIT_API_BASE.to_string())
    }

    pub fn with_base_url(user_agent: String, base_url: String) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            user_agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        access_token: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<Response, CoreError> {
        let url = self.endpoint_url(endpoint);

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(access_token)
            .header("User-Agent", &self.user_agent);

        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }

        info!("Making Reddit API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        Err(CoreError::RedditApi(status_error(
            status,
            endpoint,
            retry_after,
        )))
    }

    /// Keyword search restricted to one subreddit.
    pub async fn search_subreddit(
        &self,
        access_token: &str,
        subreddit: &str,
        query: &str,
        limit: usize,
    ) -> Result<RedditListing<RedditPostData>, CoreError> {
        let endpoint = format!("/r/{}/search", subreddit);
        let limit_str = limit.min(MAX_PAGE_SIZE).to_string();
        let params = [
            ("q", query),
            ("restrict_sr", "on"),
            ("sort", "relevance"),
            ("t", "all"),
            ("limit", limit_str.as_str()),
        ];

        let response = self
            .make_request(Method::GET, &endpoint, access_token, Some(&params[..]))
            .await?;

        let listing: RedditListing<RedditPostData> = response.json().await.map_err(|e| {
            error!("Failed to parse search results: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse search results for r/{}", subreddit),
            })
        })?;

        info!(
            "Search for {:?} returned {} posts from r/{}",
            query,
            listing.data.children.len(),
            subreddit
        );
        Ok(listing)
    }

    /// One page of the subreddit's newest comments.
    pub async fn get_subreddit_comments(
        &self,
        access_token: &str,
        subreddit: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<RedditListing<RedditCommentData>, CoreError> {
        let endpoint = format!("/r/{}/comments", subreddit);
        let limit_str = limit.min(MAX_PAGE_SIZE).to_string();
        let mut params = Vec::with_capacity(2);
        params.push(("limit", limit_str.as_str()));
        if let Some(after_val) = after {
            params.push(("after", after_val));
        }

        let response = self
            .make_request(Method::GET, &endpoint, access_token, Some(params.as_slice()))
            .await?;

        let listing: RedditListing<RedditCommentData> = response.json().await.map_err(|e| {
            error!("Failed to parse subreddit comments: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse comments for r/{}", subreddit),
            })
        })?;

        debug!(
            "Retrieved {} comments from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing)
    }

    pub async fn get_submission(
        &self,
        access_token: &str,
        submission_id: &str,
    ) -> Result<RedditPostData, CoreError> {
        let endpoint = format!("/by_id/t3_{}", submission_id);

        let response = self
            .make_request(Method::GET, &endpoint, access_token, None)
            .await?;

        let listing: RedditListing<RedditPostData> = response.json().await.map_err(|e| {
            error!("Failed to parse submission {}: {}", submission_id, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse submission {}", submission_id),
            })
        })?;

        listing
            .data
            .children
            .into_iter()
            .next()
            .map(|child| child.data)
            .ok_or_else(|| {
                warn!("Submission {} not returned by Reddit", submission_id);
                CoreError::RedditApi(RedditApiError::PostNotFound {
                    post_id: submission_id.to_string(),
                })
            })
    }
}

/// Maps a non-success status to the matching API error.
pub fn status_error(status: StatusCode, endpoint: &str, retry_after: Option<u64>) -> RedditApiError {
    match status.as_u16() {
        429 => {
            let retry_after = retry_after.unwrap_or(60);
            warn!("Rate limited, retry after {} seconds", retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        401 => RedditApiError::InvalidToken,
        403 => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        404 => match subreddit_of(endpoint) {
            Some(subreddit) => RedditApiError::SubredditNotFound {
                subreddit: subreddit.to_string(),
            },
            None => RedditApiError::InvalidResponse {
                details: "Resource not found".to_string(),
            },
        },
        code if status.is_server_error() => RedditApiError::ServerError { status_code: code },
        code => RedditApiError::InvalidResponse {
            details: format!("Unexpected status {} for {}", code, endpoint),
        },
    }
}

fn subreddit_of(endpoint: &str) -> Option<&str> {
    endpoint
        .strip_prefix("/r/")
        .and_then(|rest| rest.split('/').next())
        .filter(|name| !name.is_empty())
}

fn present_author(author: Option<String>) -> Option<String> {
    author.filter(|name| !name.is_empty() && name != DELETED_AUTHOR)
}

impl From<RedditPostData> for Submission {
    fn from(post_data: RedditPostData) -> Self {
        Self {
            id: post_data.id,
            title: post_data.title,
            selftext: post_data.selftext,
            author: present_author(post_data.author),
            permalink: post_data.permalink,
            created_utc: post_data.created_utc,
            locked: post_data.locked,
            removed_by_category: post_data.removed_by_category,
        }
    }
}

impl From<RedditCommentData> for Comment {
    fn from(comment_data: RedditCommentData) -> Self {
        let submission_id = comment_data
            .link_id
            .strip_prefix("t3_")
            .unwrap_or(&comment_data.link_id)
            .to_string();

        Self {
            id: comment_data.id,
            body: comment_data.body,
            created_utc: comment_data.created_utc,
            submission_id,
        }
    }
}
