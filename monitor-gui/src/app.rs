use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use eframe::egui::{self, Color32, RichText};
use monitor_core::{
    page_controls, ClientError, DashSnapshot, Dashboard, FeedPatch, FilterOutcome, PageControl,
    RefresherHandle, ResultItem, ResultsView,
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::warn;

const SUMMARY_PREVIEW_CHARS: usize = 300;

/// What the edit modal is currently editing.
enum EditTarget {
    Keyword {
        id: i64,
        text: String,
        is_active: bool,
    },
    Feed {
        id: i64,
        url: String,
        name: String,
        interval: String,
        is_active: bool,
    },
}

pub struct MonitorApp {
    runtime: Arc<Runtime>,
    dashboard: Dashboard,
    refresher: Option<RefresherHandle>,
    status_tx: mpsc::Sender<(bool, String)>,
    status_rx: mpsc::Receiver<(bool, String)>,
    status: Option<(bool, String, DateTime<Local>)>,
    new_keyword: String,
    new_feed_url: String,
    new_feed_name: String,
    new_feed_interval: String,
    filter_input: String,
    edit: Option<EditTarget>,
}

impl MonitorApp {
    pub fn new(runtime: Arc<Runtime>, dashboard: Dashboard, refresher: RefresherHandle) -> Self {
        let (status_tx, status_rx) = mpsc::channel(16);
        Self {
            runtime,
            dashboard,
            refresher: Some(refresher),
            status_tx,
            status_rx,
            status: None,
            new_keyword: String::new(),
            new_feed_url: String::new(),
            new_feed_name: String::new(),
            new_feed_interval: "5".to_string(),
            filter_input: String::new(),
            edit: None,
        }
    }

    fn set_status(&mut self, ok: bool, message: impl Into<String>) {
        self.status = Some((ok, message.into(), Local::now()));
    }

    fn drain_status(&mut self) {
        while let Ok((ok, message)) = self.status_rx.try_recv() {
            self.status = Some((ok, message, Local::now()));
        }
    }

    /// Runs a fallible dashboard operation on the runtime, funnelling
    /// the outcome back into the status line.
    fn spawn_op<F>(&self, ok_message: Option<&str>, fut: F)
    where
        F: Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        let tx = self.status_tx.clone();
        let ok_message = ok_message.map(str::to_string);
        self.runtime.spawn(async move {
            match fut.await {
                Ok(()) => {
                    if let Some(message) = ok_message {
                        let _ = tx.send((true, message)).await;
                    }
                }
                Err(err) => {
                    let _ = tx.send((false, err.to_string())).await;
                }
            }
        });
    }

    fn go_to_page(&self, page: u32) {
        let dashboard = self.dashboard.clone();
        self.runtime.spawn(async move {
            dashboard.go_to_page(page).await;
        });
    }

    fn apply_filter_input(&mut self) {
        let keyword = self.filter_input.trim().to_string();
        if keyword.is_empty() {
            return;
        }
        self.filter_input.clear();
        let dashboard = self.dashboard.clone();
        let tx = self.status_tx.clone();
        self.runtime.spawn(async move {
            let message = match dashboard.add_filter(&keyword).await {
                FilterOutcome::Added | FilterOutcome::Empty => None,
                FilterOutcome::AlreadyApplied => {
                    Some(format!("\"{keyword}\" is already applied as a filter."))
                }
                FilterOutcome::Unknown => Some(format!(
                    "\"{keyword}\" is not a registered keyword. Add it first."
                )),
            };
            if let Some(message) = message {
                let _ = tx.send((false, message)).await;
            }
        });
    }

    fn draw_left_panel(&mut self, ctx: &egui::Context, snapshot: &DashSnapshot) {
        egui::SidePanel::left("registry_panel")
            .min_width(300.0)
            .max_width(400.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        self.draw_keyword_section(ui, snapshot);
                        ui.add_space(10.0);
                        self.draw_feed_section(ui, snapshot);
                    });
            });
    }

    fn draw_keyword_section(&mut self, ui: &mut egui::Ui, snapshot: &DashSnapshot) {
        ui.group(|group| {
            group.vertical(|ui| {
                ui.label(RichText::new("Tracked keywords").strong().size(15.0));
                ui.separator();

                ui.horizontal(|ui| {
                    let response = ui.text_edit_singleline(&mut self.new_keyword);
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Add").clicked() || submitted {
                        let keyword = self.new_keyword.trim().to_string();
                        if keyword.is_empty() {
                            self.set_status(false, "Keyword must not be empty.");
                        } else {
                            self.new_keyword.clear();
                            let dashboard = self.dashboard.clone();
                            self.spawn_op(Some("Keyword added."), async move {
                                dashboard.create_keyword(&keyword).await
                            });
                        }
                    }
                });

                if snapshot.keywords.is_empty() {
                    ui.label(RichText::new("No keywords added yet.").weak());
                    return;
                }

                for kw in &snapshot.keywords {
                    ui.horizontal(|ui| {
                        let text = if kw.is_active {
                            RichText::new(&kw.keyword)
                        } else {
                            RichText::new(&kw.keyword).weak().italics()
                        };
                        ui.label(text);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete keyword").clicked() {
                                let dashboard = self.dashboard.clone();
                                let id = kw.id;
                                self.spawn_op(Some("Keyword deleted."), async move {
                                    dashboard.delete_keyword(id).await
                                });
                            }
                            if ui.small_button("✏").on_hover_text("Edit keyword").clicked() {
                                self.edit = Some(EditTarget::Keyword {
                                    id: kw.id,
                                    text: kw.keyword.clone(),
                                    is_active: kw.is_active,
                                });
                            }
                            let (icon, hover) = if kw.is_active {
                                ("⏸", "Pause monitoring for this keyword")
                            } else {
                                ("▶", "Resume monitoring for this keyword")
                            };
                            if ui.small_button(icon).on_hover_text(hover).clicked() {
                                let dashboard = self.dashboard.clone();
                                let (id, active) = (kw.id, !kw.is_active);
                                self.spawn_op(None, async move {
                                    dashboard.toggle_keyword(id, active).await
                                });
                            }
                        });
                    });
                }
            });
        });
    }

    fn draw_feed_section(&mut self, ui: &mut egui::Ui, snapshot: &DashSnapshot) {
        ui.group(|group| {
            group.vertical(|ui| {
                ui.label(RichText::new("RSS feeds").strong().size(15.0));
                ui.separator();

                ui.label(RichText::new("URL:").size(13.0));
                ui.text_edit_singleline(&mut self.new_feed_url);
                ui.label(RichText::new("Name (optional):").size(13.0));
                ui.text_edit_singleline(&mut self.new_feed_name);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Interval (min):").size(13.0));
                    ui.add(egui::TextEdit::singleline(&mut self.new_feed_interval).desired_width(50.0));
                    if ui.button("Add feed").clicked() {
                        self.submit_new_feed();
                    }
                });

                if snapshot.feeds.is_empty() {
                    ui.label(RichText::new("No RSS feeds added yet.").weak());
                    return;
                }

                for feed in &snapshot.feeds {
                    ui.group(|inner| {
                        inner.vertical(|ui| {
                            let name = if feed.is_active {
                                RichText::new(feed.display_name()).strong()
                            } else {
                                RichText::new(feed.display_name()).weak().italics()
                            };
                            ui.label(name);
                            ui.label(RichText::new(&feed.url).weak().size(11.0));
                            ui.label(
                                RichText::new(format!(
                                    "Interval: {} min | Last fetched: {}",
                                    feed.fetch_interval_minutes,
                                    feed.display_last_fetched()
                                ))
                                .weak()
                                .size(11.0),
                            );
                            ui.horizontal(|ui| {
                                let (icon, hover) = if feed.is_active {
                                    ("⏸", "Pause monitoring for this feed")
                                } else {
                                    ("▶", "Resume monitoring for this feed")
                                };
                                if ui.small_button(icon).on_hover_text(hover).clicked() {
                                    let dashboard = self.dashboard.clone();
                                    let (id, active) = (feed.id, !feed.is_active);
                                    self.spawn_op(None, async move {
                                        dashboard.toggle_feed(id, active).await
                                    });
                                }
                                if ui.small_button("✏").on_hover_text("Edit feed settings").clicked() {
                                    self.edit = Some(EditTarget::Feed {
                                        id: feed.id,
                                        url: feed.url.clone(),
                                        name: feed.name.clone().unwrap_or_default(),
                                        interval: feed.fetch_interval_minutes.to_string(),
                                        is_active: feed.is_active,
                                    });
                                }
                                if ui
                                    .small_button("⟳")
                                    .on_hover_text("Manually re-fetch this feed")
                                    .clicked()
                                {
                                    let dashboard = self.dashboard.clone();
                                    let id = feed.id;
                                    self.spawn_op(
                                        Some("Re-fetch initiated; new matches will appear shortly."),
                                        async move { dashboard.refetch_feed(id).await },
                                    );
                                }
                                if ui
                                    .small_button("🗑")
                                    .on_hover_text("Delete feed and its results")
                                    .clicked()
                                {
                                    let dashboard = self.dashboard.clone();
                                    let id = feed.id;
                                    self.spawn_op(Some("Feed deleted."), async move {
                                        dashboard.delete_feed(id).await
                                    });
                                }
                            });
                        });
                    });
                    ui.add_space(4.0);
                }
            });
        });
    }

    fn submit_new_feed(&mut self) {
        let url = self.new_feed_url.trim().to_string();
        if url.is_empty() {
            self.set_status(false, "Feed URL must not be empty.");
            return;
        }
        let Ok(interval) = self.new_feed_interval.trim().parse::<u32>() else {
            self.set_status(false, "Fetch interval must be a whole number of minutes.");
            return;
        };
        let name = {
            let trimmed = self.new_feed_name.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        self.new_feed_url.clear();
        self.new_feed_name.clear();
        self.new_feed_interval = "5".to_string();

        let dashboard = self.dashboard.clone();
        self.spawn_op(Some("Feed added."), async move {
            dashboard.create_feed(&url, name, interval).await
        });
    }

    fn draw_filter_bar(&mut self, ui: &mut egui::Ui, snapshot: &DashSnapshot) {
        ui.group(|group| {
            group.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Filter by keyword:").strong());
                    let response = ui.text_edit_singleline(&mut self.filter_input);
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Apply").clicked() || submitted {
                        self.apply_filter_input();
                    }
                    if !snapshot.filter_keywords.is_empty() && ui.button("Clear all").clicked() {
                        let dashboard = self.dashboard.clone();
                        self.runtime.spawn(async move {
                            dashboard.clear_filters().await;
                        });
                    }
                });

                ui.horizontal_wrapped(|ui| {
                    if snapshot.filter_keywords.is_empty() {
                        ui.label(RichText::new("No filters applied.").weak());
                        return;
                    }
                    for keyword in &snapshot.filter_keywords {
                        if ui
                            .small_button(format!("{keyword} ✕"))
                            .on_hover_text("Remove this filter")
                            .clicked()
                        {
                            let dashboard = self.dashboard.clone();
                            let keyword = keyword.clone();
                            self.runtime.spawn(async move {
                                dashboard.remove_filter(&keyword).await;
                            });
                        }
                    }
                });
            });
        });
    }

    fn draw_results(&mut self, ui: &mut egui::Ui, snapshot: &DashSnapshot) {
        match &snapshot.results {
            ResultsView::Loading => {
                ui.add_space(30.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Loading results...").weak().size(15.0));
                });
            }
            ResultsView::Empty => {
                ui.add_space(30.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("No matching results found.").weak().size(15.0));
                });
            }
            ResultsView::Error(message) => {
                ui.add_space(30.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(format!("Error loading results: {message}"))
                            .color(Color32::from_rgb(229, 57, 53))
                            .size(15.0),
                    );
                });
            }
            ResultsView::Page(page) => {
                let page = page.clone();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        for item in &page.items {
                            self.draw_result_card(ui, item);
                            ui.add_space(5.0);
                        }
                    });
                ui.separator();
                self.draw_pagination(ui, page.current_page, page.total_pages);
            }
        }
    }

    fn draw_result_card(&self, ui: &mut egui::Ui, item: &ResultItem) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical(|ui| {
                if ui
                    .link(RichText::new(item.display_title()).strong().size(16.0))
                    .clicked()
                {
                    if let Err(err) = webbrowser::open(&item.link) {
                        warn!(error = %err, link = %item.link, "failed to open result link");
                    }
                }

                let summary = html2text::from_read(item.display_summary().as_bytes(), 100);
                let summary = summary.trim();
                let preview = if summary.chars().count() > SUMMARY_PREVIEW_CHARS {
                    let cut: String = summary.chars().take(SUMMARY_PREVIEW_CHARS - 3).collect();
                    format!("{cut}...")
                } else {
                    summary.to_string()
                };
                ui.label(RichText::new(preview).weak().size(13.0));

                ui.horizontal_wrapped(|ui| {
                    for tag in item.keyword_tags() {
                        ui.label(
                            RichText::new(tag)
                                .size(11.0)
                                .color(Color32::from_rgb(0, 122, 204)),
                        );
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(item.display_published()).weak().size(11.0));
                    });
                });
            });
        });
    }

    fn draw_pagination(&self, ui: &mut egui::Ui, current_page: u32, total_pages: u32) {
        ui.horizontal(|ui| {
            for control in page_controls(current_page, total_pages) {
                match control {
                    PageControl::Previous { enabled } => {
                        if ui
                            .add_enabled(enabled, egui::Button::new("Previous"))
                            .clicked()
                        {
                            self.go_to_page(current_page - 1);
                        }
                    }
                    PageControl::Number { page, active } => {
                        if ui.selectable_label(active, page.to_string()).clicked() && !active {
                            self.go_to_page(page);
                        }
                    }
                    PageControl::Ellipsis => {
                        ui.label("...");
                    }
                    PageControl::Next { enabled } => {
                        if ui.add_enabled(enabled, egui::Button::new("Next")).clicked() {
                            self.go_to_page(current_page + 1);
                        }
                    }
                }
            }
        });
    }

    fn draw_central_panel(&mut self, ctx: &egui::Context, snapshot: &DashSnapshot) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Matched results").size(18.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some((ok, message, at)) = &self.status {
                        let color = if *ok {
                            Color32::from_rgb(67, 160, 71)
                        } else {
                            Color32::from_rgb(229, 57, 53)
                        };
                        ui.label(
                            RichText::new(format!("{} ({})", message, at.format("%H:%M:%S")))
                                .color(color)
                                .size(12.0),
                        );
                    }
                });
            });
            ui.separator();
            self.draw_filter_bar(ui, snapshot);
            ui.add_space(6.0);
            self.draw_results(ui, snapshot);
        });
    }

    fn draw_edit_modal(&mut self, ctx: &egui::Context) {
        let Some(edit) = &mut self.edit else { return };
        let title = match edit {
            EditTarget::Keyword { .. } => "Edit keyword",
            EditTarget::Feed { .. } => "Edit RSS feed",
        };

        let mut open = true;
        let mut save = false;
        egui::Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                match edit {
                    EditTarget::Keyword { text, is_active, .. } => {
                        ui.label("Keyword:");
                        ui.text_edit_singleline(text);
                        ui.checkbox(is_active, "Is active");
                    }
                    EditTarget::Feed {
                        url,
                        name,
                        interval,
                        is_active,
                        ..
                    } => {
                        ui.label("URL:");
                        ui.text_edit_singleline(url);
                        ui.label("Name:");
                        ui.text_edit_singleline(name);
                        ui.label("Fetch interval (minutes):");
                        ui.text_edit_singleline(interval);
                        ui.checkbox(is_active, "Is active");
                    }
                }
                if ui.button("Save changes").clicked() {
                    save = true;
                }
            });

        if save {
            match self.edit.take() {
                Some(EditTarget::Keyword { id, text, is_active }) => {
                    let dashboard = self.dashboard.clone();
                    self.spawn_op(Some("Keyword updated."), async move {
                        dashboard.update_keyword(id, &text, is_active).await
                    });
                }
                Some(EditTarget::Feed {
                    id,
                    url,
                    name,
                    interval,
                    is_active,
                }) => {
                    let Ok(interval) = interval.trim().parse::<u32>() else {
                        self.set_status(false, "Fetch interval must be a whole number of minutes.");
                        return;
                    };
                    let name = {
                        let trimmed = name.trim();
                        (!trimmed.is_empty()).then(|| trimmed.to_string())
                    };
                    let patch = FeedPatch {
                        url: Some(url.trim().to_string()),
                        name,
                        fetch_interval_minutes: Some(interval),
                        is_active: Some(is_active),
                    };
                    let dashboard = self.dashboard.clone();
                    self.spawn_op(Some("Feed updated."), async move {
                        dashboard.update_feed(id, &patch).await
                    });
                }
                None => {}
            }
        } else if !open {
            self.edit = None;
        }
    }
}

impl Drop for MonitorApp {
    fn drop(&mut self) {
        if let Some(handle) = self.refresher.take() {
            let _ = self.runtime.block_on(handle.stop());
        }
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_status();
        let snapshot = self.runtime.block_on(self.dashboard.snapshot());

        self.draw_left_panel(ctx, &snapshot);
        self.draw_central_panel(ctx, &snapshot);
        self.draw_edit_modal(ctx);

        // Background loads mutate shared state without any UI event,
        // so keep repainting at a coarse cadence.
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}
