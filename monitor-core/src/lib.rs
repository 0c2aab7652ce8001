pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod refresh;

pub use api::ApiClient;
pub use config::DashConfig;
pub use dashboard::{DashSnapshot, Dashboard, LoadKind, ResultsView};
pub use error::ClientError;
pub use filter::{FilterOutcome, FilterSet};
pub use models::{FeedPatch, Keyword, KeywordPatch, NewFeed, NewKeyword, ResultItem, ResultPage, RssFeed};
pub use pagination::{page_controls, PageControl};
pub use refresh::{spawn_refresher, RefreshConfig, RefresherHandle};
