use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::ClientError;
use crate::models::{FeedPatch, Keyword, KeywordPatch, NewFeed, NewKeyword, ResultPage, RssFeed};

/// Error payload the server attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Thin wrapper around the monitoring service's HTTP/JSON API. All
/// endpoint methods funnel through one request path so error mapping
/// and no-content handling live in a single place.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Sends the request and returns the raw body, or `None` for a
    /// 204. Non-2xx responses are mapped to `ClientError::Api` carrying
    /// the server's `detail` message when one is present, otherwise a
    /// `"<status> <reason>"` fallback.
    async fn execute(&self, request: RequestBuilder) -> Result<Option<Vec<u8>>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let detail = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.detail);
            let message = detail.unwrap_or_else(|| {
                format!(
                    "{} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Error")
                )
            });
            debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api(message));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = response.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }

    async fn request_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let bytes = self
            .execute(request)
            .await?
            .ok_or_else(|| ClientError::Api("unexpected empty response".to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn request_no_content<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await?;
        Ok(())
    }

    pub async fn list_keywords(&self) -> Result<Vec<Keyword>, ClientError> {
        self.request_json(Method::GET, "keywords/", None::<&()>).await
    }

    pub async fn create_keyword(&self, keyword: &NewKeyword) -> Result<Keyword, ClientError> {
        self.request_json(Method::POST, "keywords/", Some(keyword)).await
    }

    pub async fn update_keyword(&self, id: i64, patch: &KeywordPatch) -> Result<Keyword, ClientError> {
        self.request_json(Method::PUT, &format!("keywords/{id}"), Some(patch)).await
    }

    pub async fn delete_keyword(&self, id: i64) -> Result<(), ClientError> {
        self.request_no_content(Method::DELETE, &format!("keywords/{id}"), None::<&()>)
            .await
    }

    pub async fn list_feeds(&self) -> Result<Vec<RssFeed>, ClientError> {
        self.request_json(Method::GET, "rss-feeds/", None::<&()>).await
    }

    pub async fn create_feed(&self, feed: &NewFeed) -> Result<RssFeed, ClientError> {
        self.request_json(Method::POST, "rss-feeds/", Some(feed)).await
    }

    pub async fn update_feed(&self, id: i64, patch: &FeedPatch) -> Result<RssFeed, ClientError> {
        self.request_json(Method::PUT, &format!("rss-feeds/{id}"), Some(patch)).await
    }

    pub async fn delete_feed(&self, id: i64) -> Result<(), ClientError> {
        self.request_no_content(Method::DELETE, &format!("rss-feeds/{id}"), None::<&()>)
            .await
    }

    /// Asks the server to re-ingest the feed immediately. New matches
    /// land asynchronously, so no result payload is expected.
    pub async fn refetch_feed(&self, id: i64) -> Result<(), ClientError> {
        self.request_no_content(Method::POST, &format!("rss-feeds/{id}/refetch"), None::<&()>)
            .await
    }

    pub async fn fetch_results(
        &self,
        page: u32,
        page_size: u32,
        keywords: Option<&str>,
    ) -> Result<ResultPage, ClientError> {
        let mut url = self.endpoint("results/")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("page_size", &page_size.to_string());
            if let Some(keywords) = keywords {
                pairs.append_pair("keywords", keywords);
            }
        }
        let bytes = self
            .execute(self.client.get(url))
            .await?
            .ok_or_else(|| ClientError::Api("unexpected empty response".to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
