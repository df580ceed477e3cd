pub mod api;

use api::{RedditApiClient, MAX_PAGE_SIZE};
use async_trait::async_trait;
use mentions_core::{
    Comment, CoreError, RedditApiError, RedditCredentials, SearchSource, Submission,
};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, Scope, TokenResponse, TokenUrl,
};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct RedditToken {
    pub access_token: String,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

/// Read-only Reddit client authenticated as an application.
#[derive(Debug)]
pub struct RedditClient {
    credentials: RedditCredentials,
    api: RedditApiClient,
    token: Option<RedditToken>,
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Result<Self, CoreError> {
        let api = RedditApiClient::new(credentials.user_agent.clone())?;
        Ok(Self::with_api(credentials, api))
    }

    /// Uses an already configured API client, e.g. one with a custom base URL.
    pub fn with_api(credentials: RedditCredentials, api: RedditApiClient) -> Self {
        Self {
            credentials,
            api,
            token: None,
        }
    }

    /// Creates a client and obtains an application token in one step.
    pub async fn connect(credentials: RedditCredentials) -> Result<Self, CoreError> {
        let mut client = Self::new(credentials)?;
        client.authenticate().await?;
        Ok(client)
    }

    pub fn get_required_scopes() -> Vec<&'static str> {
        vec!["read"]
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_expired())
    }

    pub fn set_token(&mut self, token: RedditToken) {
        self.token = Some(token);
    }

    fn oauth_client(&self) -> Result<BasicClient, CoreError> {
        let auth_url = AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(|e| {
            RedditApiError::AuthenticationFailed {
                reason: format!("Invalid authorize URL: {}", e),
            }
        })?;
        let token_url = TokenUrl::new(REDDIT_TOKEN_URL.to_string()).map_err(|e| {
            RedditApiError::AuthenticationFailed {
                reason: format!("Invalid token URL: {}", e),
            }
        })?;

        Ok(BasicClient::new(
            ClientId::new(self.credentials.client_id.clone()),
            Some(ClientSecret::new(self.credentials.client_secret.clone())),
            auth_url,
            Some(token_url),
        ))
    }

    /// Client-credentials grant. Requests go through the API client's own
    /// HTTP client so Reddit always sees the configured user agent.
    pub async fn authenticate(&mut self) -> Result<(), CoreError> {
        let oauth = self.oauth_client()?;
        let http_client = self.api.http_client().clone();

        let mut request = oauth.exchange_client_credentials();
        for scope in Self::get_required_scopes() {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        let response = request
            .request_async(move |req| send_oauth_request(http_client, req))
            .await
            .map_err(|e| RedditApiError::AuthenticationFailed {
                reason: e.to_string(),
            })?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let scope = response
            .scopes()
            .map(|scopes| scopes.iter().map(|s| s.as_str().to_string()).collect())
            .unwrap_or_else(|| {
                Self::get_required_scopes()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            });

        self.token = Some(RedditToken {
            access_token: response.access_token().secret().clone(),
            expires_at: SystemTime::now() + lifetime,
            scope,
        });

        info!(
            "Authenticated with Reddit as application (registered by u/{})",
            self.credentials.username
        );
        Ok(())
    }

    fn access_token(&self) -> Result<&str, CoreError> {
        match &self.token {
            None => Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: "Not authenticated. Call authenticate() first".to_string(),
            })),
            Some(token) if token.is_expired() => Err(CoreError::RedditApi(
                RedditApiError::AuthenticationFailed {
                    reason: "Access token expired".to_string(),
                },
            )),
            Some(token) => Ok(&token.access_token),
        }
    }
}

async fn send_oauth_request(
    client: reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = client
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

#[async_trait]
impl SearchSource for RedditClient {
    async fn search_submissions(
        &self,
        community: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, CoreError> {
        let token = self.access_token()?;
        let listing = self
            .api
            .search_subreddit(token, community, query, limit)
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .take(limit)
            .map(|child| Submission::from(child.data))
            .collect())
    }

    async fn recent_comments(
        &self,
        community: &str,
        limit: usize,
    ) -> Result<Vec<Comment>, CoreError> {
        let token = self.access_token()?;
        let mut comments = Vec::with_capacity(limit.min(1000));
        let mut after: Option<String> = None;

        while comments.len() < limit {
            let page_size = (limit - comments.len()).min(MAX_PAGE_SIZE);
            let listing = self
                .api
                .get_subreddit_comments(token, community, page_size, after.as_deref())
                .await?;

            let fetched = listing.data.children.len();
            comments.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .map(|child| Comment::from(child.data)),
            );

            after = listing.data.after;
            if fetched == 0 || after.is_none() {
                break;
            }
        }

        comments.truncate(limit);
        debug!("Fetched {} recent comments from r/{}", comments.len(), community);
        Ok(comments)
    }

    async fn submission(&self, id: &str) -> Result<Submission, CoreError> {
        let token = self.access_token()?;
        let post = self.api.get_submission(token, id).await?;
        Ok(post.into())
    }
}
