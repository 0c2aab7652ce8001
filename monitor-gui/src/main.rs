mod app;

use std::sync::Arc;

use eframe::{egui, NativeOptions};
use monitor_core::{
    spawn_refresher, ApiClient, DashConfig, Dashboard, LoadKind, RefreshConfig,
};
use reqwest::{redirect, ClientBuilder, Url};
use tokio::runtime::Runtime;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::app::MonitorApp;

fn main() -> eframe::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let config = DashConfig::load();
    let base_url = Url::parse(&config.base_url).expect("invalid base_url in config");
    let client = ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .timeout(config.request_timeout())
        .user_agent("keyword-monitor/0.1")
        .build()
        .expect("failed to build HTTP client");

    let dashboard = Dashboard::new(ApiClient::new(client, base_url), config.page_size);

    // Populate registries and the first result page in the background
    // so the window opens immediately.
    {
        let dashboard = dashboard.clone();
        runtime.spawn(async move {
            if let Err(err) = dashboard.refresh_keywords().await {
                warn!(error = %err, "initial keyword load failed");
            }
            if let Err(err) = dashboard.refresh_feeds().await {
                warn!(error = %err, "initial feed load failed");
            }
            dashboard.load_results(1, LoadKind::Manual).await;
        });
    }

    let refresher = {
        let guard = runtime.enter();
        let handle = spawn_refresher(
            dashboard.clone(),
            RefreshConfig {
                interval: config.refresh_interval(),
            },
        );
        drop(guard);
        handle
    };

    eframe::run_native(
        "Keyword Monitor",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 780.0])
                .with_min_inner_size([800.0, 560.0]),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(MonitorApp::new(runtime, dashboard, refresher))),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
