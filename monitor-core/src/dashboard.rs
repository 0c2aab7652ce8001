use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::filter::{FilterOutcome, FilterSet};
use crate::models::{FeedPatch, Keyword, KeywordPatch, NewFeed, NewKeyword, ResultPage, RssFeed};

/// Distinguishes a user-driven load from the background scheduler's.
/// Manual loads blank the view to a loading placeholder immediately;
/// auto-refresh loads keep the previous content visible until the new
/// data replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Manual,
    AutoRefresh,
}

/// What the result area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Loading,
    Empty,
    Page(ResultPage),
    Error(String),
}

#[derive(Debug)]
struct DashState {
    filter: FilterSet,
    current_page: u32,
    keywords: Vec<Keyword>,
    feeds: Vec<RssFeed>,
    results: ResultsView,
}

/// Cloned view of the dashboard state, taken once per frame by the
/// frontend so painting never holds the state lock.
#[derive(Debug, Clone)]
pub struct DashSnapshot {
    pub filter_keywords: Vec<String>,
    pub current_page: u32,
    pub keywords: Vec<Keyword>,
    pub feeds: Vec<RssFeed>,
    pub results: ResultsView,
}

/// The result-view controller: owns the filter set, the pagination
/// cursor, the keyword/feed registries and the rendered result state,
/// and reconciles filter edits, page navigation and the background
/// refresh into single idempotent loads.
///
/// Cheap to clone; all clones share state. Responses are stamped with
/// a monotonic token and applied only while still the latest issued,
/// so an out-of-order arrival can never overwrite a newer request's
/// view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: ApiClient,
    page_size: u32,
    state: Arc<RwLock<DashState>>,
    load_seq: Arc<AtomicU64>,
}

impl Dashboard {
    pub fn new(api: ApiClient, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            state: Arc::new(RwLock::new(DashState {
                filter: FilterSet::new(),
                current_page: 1,
                keywords: Vec::new(),
                feeds: Vec::new(),
                results: ResultsView::Loading,
            })),
            load_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn snapshot(&self) -> DashSnapshot {
        let state = self.state.read().await;
        DashSnapshot {
            filter_keywords: state.filter.keywords().to_vec(),
            current_page: state.current_page,
            keywords: state.keywords.clone(),
            feeds: state.feeds.clone(),
            results: state.results.clone(),
        }
    }

    /// The pagination cursor as of now. The refresh scheduler reads
    /// this at fire time rather than capturing it when started.
    pub async fn current_page(&self) -> u32 {
        self.state.read().await.current_page
    }

    /// Issues exactly one result request for `page` with the current
    /// filter and applies the response unless a newer load has been
    /// issued since.
    pub async fn load_results(&self, page: u32, kind: LoadKind) {
        let token = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let keywords_param = {
            let mut state = self.state.write().await;
            if self.load_seq.load(Ordering::SeqCst) == token {
                state.current_page = page;
                if kind == LoadKind::Manual {
                    state.results = ResultsView::Loading;
                }
            }
            state.filter.as_param()
        };

        let outcome = self
            .api
            .fetch_results(page, self.page_size, keywords_param.as_deref())
            .await;

        let mut state = self.state.write().await;
        if self.load_seq.load(Ordering::SeqCst) != token {
            debug!(token, "discarding stale result response");
            return;
        }
        state.results = match outcome {
            Ok(result_page) if result_page.items.is_empty() => ResultsView::Empty,
            Ok(result_page) => {
                debug!(
                    page = result_page.current_page,
                    total = result_page.total_pages,
                    items = result_page.items.len(),
                    "loaded results"
                );
                ResultsView::Page(result_page)
            }
            Err(err) => {
                warn!(error = %err, page, "failed to load results");
                ResultsView::Error(err.to_string())
            }
        };
    }

    pub async fn go_to_page(&self, page: u32) {
        self.load_results(page, LoadKind::Manual).await;
    }

    /// Adds a keyword to the filter. Successful adds reset the cursor
    /// to page 1 and trigger exactly one reload; rejections leave the
    /// set untouched and trigger none.
    pub async fn add_filter(&self, raw: &str) -> FilterOutcome {
        let outcome = {
            let mut state = self.state.write().await;
            let known: Vec<String> =
                state.keywords.iter().map(|k| k.keyword.clone()).collect();
            state.filter.add(raw, &known)
        };
        if outcome == FilterOutcome::Added {
            self.load_results(1, LoadKind::Manual).await;
        }
        outcome
    }

    pub async fn remove_filter(&self, keyword: &str) {
        let removed = self.state.write().await.filter.remove(keyword);
        if removed {
            self.load_results(1, LoadKind::Manual).await;
        }
    }

    pub async fn clear_filters(&self) {
        let cleared = self.state.write().await.filter.clear();
        if cleared {
            self.load_results(1, LoadKind::Manual).await;
        }
    }

    /// Re-fetches the keyword registry. Filter members whose keyword
    /// no longer exists are dropped, and a drop re-triggers a load so
    /// the view cannot keep filtering on deleted keywords.
    pub async fn refresh_keywords(&self) -> Result<(), ClientError> {
        if self.refresh_keywords_inner().await? {
            self.load_results(1, LoadKind::Manual).await;
        }
        Ok(())
    }

    /// Registry fetch + filter intersection without the follow-up
    /// load; returns whether filter members were dropped. CRUD paths
    /// use this so their own page-1 reload stays the only one.
    async fn refresh_keywords_inner(&self) -> Result<bool, ClientError> {
        let keywords = self.api.list_keywords().await?;
        let mut state = self.state.write().await;
        let known: Vec<String> = keywords.iter().map(|k| k.keyword.clone()).collect();
        state.keywords = keywords;
        let dropped = state.filter.retain_known(&known);
        if dropped {
            info!("dropped filter keywords missing from the registry");
        }
        Ok(dropped)
    }

    pub async fn refresh_feeds(&self) -> Result<(), ClientError> {
        let feeds = self.api.list_feeds().await?;
        self.state.write().await.feeds = feeds;
        Ok(())
    }

    pub async fn create_keyword(&self, keyword: &str) -> Result<(), ClientError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ClientError::Validation("keyword must not be empty".into()));
        }
        self.api
            .create_keyword(&NewKeyword {
                keyword: keyword.to_string(),
            })
            .await?;
        self.refresh_keywords_inner().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn update_keyword(
        &self,
        id: i64,
        keyword: &str,
        is_active: bool,
    ) -> Result<(), ClientError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ClientError::Validation("keyword must not be empty".into()));
        }
        self.api
            .update_keyword(
                id,
                &KeywordPatch {
                    keyword: Some(keyword.to_string()),
                    is_active: Some(is_active),
                },
            )
            .await?;
        self.refresh_keywords_inner().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn toggle_keyword(&self, id: i64, is_active: bool) -> Result<(), ClientError> {
        self.api
            .update_keyword(
                id,
                &KeywordPatch {
                    keyword: None,
                    is_active: Some(is_active),
                },
            )
            .await?;
        self.refresh_keywords_inner().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn delete_keyword(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete_keyword(id).await?;
        self.refresh_keywords_inner().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn create_feed(
        &self,
        url: &str,
        name: Option<String>,
        fetch_interval_minutes: u32,
    ) -> Result<(), ClientError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::Validation("feed URL must not be empty".into()));
        }
        if fetch_interval_minutes == 0 {
            return Err(ClientError::Validation(
                "fetch interval must be at least one minute".into(),
            ));
        }
        self.api
            .create_feed(&NewFeed {
                url: url.to_string(),
                name: name.filter(|n| !n.trim().is_empty()),
                fetch_interval_minutes,
            })
            .await?;
        self.refresh_feeds().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn update_feed(&self, id: i64, patch: &FeedPatch) -> Result<(), ClientError> {
        if matches!(patch.url.as_deref(), Some(url) if url.trim().is_empty()) {
            return Err(ClientError::Validation("feed URL must not be empty".into()));
        }
        if matches!(patch.fetch_interval_minutes, Some(0)) {
            return Err(ClientError::Validation(
                "fetch interval must be at least one minute".into(),
            ));
        }
        self.api.update_feed(id, patch).await?;
        self.refresh_feeds().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn toggle_feed(&self, id: i64, is_active: bool) -> Result<(), ClientError> {
        self.api
            .update_feed(
                id,
                &FeedPatch {
                    is_active: Some(is_active),
                    ..FeedPatch::default()
                },
            )
            .await?;
        self.refresh_feeds().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    pub async fn delete_feed(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete_feed(id).await?;
        self.refresh_feeds().await?;
        self.load_results(1, LoadKind::Manual).await;
        Ok(())
    }

    /// Triggers a server-side re-ingestion of the feed. Matches land
    /// asynchronously, so only the feed list (for `last_fetched`) is
    /// refreshed here; the next scheduled refresh picks up new results.
    pub async fn refetch_feed(&self, id: i64) -> Result<(), ClientError> {
        self.api.refetch_feed(id).await?;
        self.refresh_feeds().await?;
        Ok(())
    }
}
