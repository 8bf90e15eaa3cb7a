use crate::client::{HttpBackend, SearchBackend, SearchError, SearchResponse};
use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::controller::{ResultArea, SearchController, SearchTicket};
use crate::export;
use crate::notify::Severity;
use crate::opener;
use crate::render::{resolve_card_click, CardAction, CardViewModel, PageView};
use eframe::egui;
use log::{error, info};
use rfd::FileDialog;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const CARD_SIZE: egui::Vec2 = egui::vec2(280.0, 44.0);
const CARD_SPACING: f32 = 10.0;
const CARD_PADDING: f32 = 8.0;
const FADE_IN: Duration = Duration::from_millis(500);

// Messages sent from background threads to GUI
enum BackgroundMessage {
    SearchComplete {
        ticket: SearchTicket,
        result: Result<SearchResponse, SearchError>,
    },
}

// Collected while drawing, applied once the frame's widgets are laid out
enum UiAction {
    Search,
    Example(String),
    Filter(String),
    PrevPage,
    NextPage,
    CopyAll,
    Export,
    Card(CardAction),
}

pub struct RevwhoixApp {
    config: Config,
    backend: Result<Arc<dyn SearchBackend>, String>,
    clipboard: SystemClipboard,
    controller: SearchController,

    keyword_input: String,

    // Card entrance animation
    seen_generation: u64,
    page_shown_at: Instant,

    // Channel for background thread communication
    bg_receiver: Receiver<BackgroundMessage>,
    bg_sender: Sender<BackgroundMessage>,
}

impl RevwhoixApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let backend = match HttpBackend::new(&config.endpoint, config.timeout) {
            Ok(backend) => {
                info!("Search requests go to {}", backend.url());
                Ok(Arc::new(backend) as Arc<dyn SearchBackend>)
            }
            Err(e) => {
                error!("Failed to initialise HTTP client: {}", e);
                Err(format!("Failed to initialise HTTP client: {}", e))
            }
        };
        Self::with_backend(config, backend)
    }

    fn with_backend(config: Config, backend: Result<Arc<dyn SearchBackend>, String>) -> Self {
        let (bg_sender, bg_receiver) = mpsc::channel();

        Self {
            config,
            backend,
            clipboard: SystemClipboard::new(),
            controller: SearchController::new(),
            keyword_input: String::new(),
            seen_generation: 0,
            page_shown_at: Instant::now(),
            bg_receiver,
            bg_sender,
        }
    }

    fn perform_search(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.controller.begin_search(&self.keyword_input) else {
            return;
        };

        let backend = match &self.backend {
            Ok(backend) => Arc::clone(backend),
            Err(err) => {
                self.controller
                    .finish_search(pending.ticket, Err(SearchError::Unavailable(err.clone())));
                return;
            }
        };

        let sender = self.bg_sender.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let result = backend.search(&pending.keyword);
            let _ = sender.send(BackgroundMessage::SearchComplete {
                ticket: pending.ticket,
                result,
            });
            ctx.request_repaint();
        });
    }

    fn export_domains(&mut self) {
        let Some(plan) = self.controller.prepare_export(export::today()) else {
            return;
        };

        if let Some(path) = FileDialog::new()
            .set_file_name(&plan.file_name)
            .add_filter("CSV", &["csv"])
            .save_file()
        {
            let result = export::write_domains_to_path(&path, &plan.domains);
            if result.is_ok() {
                info!(
                    "Exported {} domains to {}",
                    plan.domains.len(),
                    path.display()
                );
            }
            self.controller.finish_export(result);
        }
    }

    fn visit(&mut self, domain: &str) {
        if let Err(e) = opener::open_domain(domain) {
            error!("Failed to open {}: {}", domain, e);
            self.controller.notify(
                format!("Failed to open {}: {}", opener::visit_url(domain), e),
                Severity::Error,
            );
        }
    }

    fn apply(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::Search => self.perform_search(ctx),
            UiAction::Example(keyword) => {
                self.keyword_input = keyword;
                self.perform_search(ctx);
            }
            UiAction::Filter(filter) => self.controller.set_filter(&filter),
            UiAction::PrevPage => {
                self.controller.prev_page();
            }
            UiAction::NextPage => {
                self.controller.next_page();
            }
            UiAction::CopyAll => self.controller.copy_all(&mut self.clipboard),
            UiAction::Export => self.export_domains(),
            UiAction::Card(CardAction::Copy(domain)) => {
                self.controller.copy_domain(&domain, &mut self.clipboard)
            }
            UiAction::Card(CardAction::Visit(domain)) => self.visit(&domain),
        }
    }

    fn process_background_messages(&mut self) {
        // Process all pending messages from background threads
        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BackgroundMessage::SearchComplete { ticket, result } => {
                    self.controller.finish_search(ticket, result);
                }
            }
        }
    }

    fn draw_search_section(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.heading("🔍 revwhoix");
        ui.label("Find every domain registered with a keyword in its WHOIS record.");
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.keyword_input)
                    .hint_text("Enter a keyword, e.g. a company name")
                    .desired_width(360.0),
            );
            if self.controller.take_focus_request() {
                response.request_focus();
            }
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("🔍 Search").clicked() || submitted {
                actions.push(UiAction::Search);
            }
        });

        ui.add_space(5.0);

        ui.horizontal_wrapped(|ui| {
            ui.label("Try:");
            for keyword in &self.config.examples {
                if ui.small_button(keyword.as_str()).clicked() {
                    actions.push(UiAction::Example(keyword.clone()));
                }
            }
        });
    }

    fn draw_result_area(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        match self.controller.area().clone() {
            ResultArea::Idle => {
                ui.label("Enter a keyword and click Search to find registered domains.");
            }
            ResultArea::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Searching for domains...");
                });
            }
            ResultArea::NoResults => {
                ui.heading("No domains found");
                ui.label("Try a different keyword.");
            }
            ResultArea::Error(message) => {
                ui.heading("Something went wrong");
                ui.colored_label(egui::Color32::RED, message);
            }
            ResultArea::Results => self.draw_results(ui, actions),
        }
    }

    fn draw_results(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let view = self.controller.render();

        let heading = match self.controller.header() {
            Some(header) => format!(
                "Results for '{}' ({} domains)",
                header.keyword, header.count
            ),
            None => "Results".to_string(),
        };
        let header_response = ui.heading(heading);
        if self.controller.take_scroll_request() {
            header_response.scroll_to_me(Some(egui::Align::TOP));
        }

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Filter:");
            let mut filter = self.controller.state().filter.clone();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut filter)
                        .hint_text("Filter domains...")
                        .desired_width(240.0),
                )
                .changed()
            {
                actions.push(UiAction::Filter(filter));
            }

            if ui.button("📋 Copy All").clicked() {
                actions.push(UiAction::CopyAll);
            }
            if ui.button("📤 Export CSV").clicked() {
                actions.push(UiAction::Export);
            }
        });

        ui.add_space(10.0);

        self.draw_grid(ui, &view, actions);

        ui.add_space(10.0);

        // Pagination controls
        ui.horizontal(|ui| {
            if ui
                .add_enabled(view.prev_enabled, egui::Button::new("◀ Previous"))
                .clicked()
            {
                actions.push(UiAction::PrevPage);
            }

            ui.label(view.page_indicator());

            if ui
                .add_enabled(view.next_enabled, egui::Button::new("Next ▶"))
                .clicked()
            {
                actions.push(UiAction::NextPage);
            }

            let state = self.controller.state();
            ui.weak(format!(
                "{} of {} domains match",
                state.filtered_domains.len(),
                state.all_domains.len()
            ));
        });
    }

    fn draw_grid(&self, ui: &mut egui::Ui, view: &PageView, actions: &mut Vec<UiAction>) {
        if let Some(placeholder) = view.placeholder {
            ui.add_space(20.0);
            ui.vertical_centered(|ui| ui.weak(placeholder));
            ui.add_space(20.0);
            return;
        }

        let columns = ((ui.available_width() + CARD_SPACING) / (CARD_SIZE.x + CARD_SPACING))
            .floor()
            .max(1.0) as usize;
        let elapsed = self.page_shown_at.elapsed();
        let mut animating = false;

        egui::Grid::new("domains_grid")
            .spacing([CARD_SPACING, CARD_SPACING])
            .show(ui, |ui| {
                for (i, card) in view.cards.iter().enumerate() {
                    let opacity = entrance_opacity(card.entrance_delay, elapsed);
                    animating |= opacity < 1.0;

                    if let Some(action) = draw_card(ui, card, opacity) {
                        actions.push(UiAction::Card(action));
                    }
                    if (i + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });

        if animating {
            ui.ctx().request_repaint();
        }
    }

    fn draw_notification(&self, ctx: &egui::Context) {
        let notifier = self.controller.notifier();
        let Some(notification) = notifier.visible() else {
            return;
        };

        egui::Area::new(egui::Id::new("notification"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(notification.severity.color())
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} {}",
                                notification.severity.icon(),
                                notification.message
                            ))
                            .color(egui::Color32::WHITE),
                        );
                    });
            });

        if let Some(remaining) = notifier.remaining_at(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }
}

/// One grid cell. The card's own click area is registered before its buttons
/// so the buttons sit on top and take their clicks for themselves.
fn draw_card(ui: &mut egui::Ui, card: &CardViewModel, opacity: f32) -> Option<CardAction> {
    ui.allocate_ui(CARD_SIZE, |ui| {
        ui.set_opacity(opacity);

        let rect = egui::Rect::from_min_size(ui.max_rect().min, CARD_SIZE);
        let card_response = ui
            .interact(rect, ui.id().with(("domain_card", card.slot)), egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .on_hover_text(card.visit_url.as_str());

        let visuals = ui.style().interact(&card_response);
        ui.painter()
            .rect(rect, 6.0, visuals.weak_bg_fill, visuals.bg_stroke);

        let mut copy_clicked = false;
        let mut visit_clicked = false;

        egui::Frame::none()
            .inner_margin(CARD_PADDING)
            .show(ui, |ui| {
                ui.set_min_size(CARD_SIZE - egui::vec2(2.0 * CARD_PADDING, 2.0 * CARD_PADDING));
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new(&card.domain).monospace());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        visit_clicked = ui
                            .small_button("↗")
                            .on_hover_text("Visit domain")
                            .clicked();
                        copy_clicked = ui
                            .small_button("📋")
                            .on_hover_text("Copy domain")
                            .clicked();
                    });
                });
            });

        resolve_card_click(card, copy_clicked, visit_clicked, card_response.clicked())
    })
    .inner
}

fn entrance_opacity(delay: Duration, elapsed: Duration) -> f32 {
    if elapsed <= delay {
        return 0.0;
    }
    ((elapsed - delay).as_secs_f32() / FADE_IN.as_secs_f32()).min(1.0)
}

impl eframe::App for RevwhoixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process messages from background threads
        self.process_background_messages();

        if self.controller.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if self.controller.generation() != self.seen_generation {
            self.seen_generation = self.controller.generation();
            self.page_shown_at = Instant::now();
        }

        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.draw_search_section(ui, &mut actions);

                    ui.add_space(10.0);
                    ui.separator();
                    ui.add_space(10.0);

                    self.draw_result_area(ui, &mut actions);
                });
        });

        self.draw_notification(ctx);

        for action in actions {
            self.apply(action, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend(Vec<String>);

    impl SearchBackend for FixedBackend {
        fn search(&self, keyword: &str) -> Result<SearchResponse, SearchError> {
            Ok(SearchResponse {
                status: "success".into(),
                keyword: keyword.into(),
                count: Some(self.0.len() as u64),
                domains: Some(self.0.clone()),
                message: None,
            })
        }
    }

    fn wait_for_result(app: &mut RevwhoixApp) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.controller.is_loading() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
            app.process_background_messages();
        }
    }

    #[test]
    fn search_runs_on_background_thread() {
        let backend: Arc<dyn SearchBackend> =
            Arc::new(FixedBackend(vec!["a.example.com".into(), "b.example.com".into()]));
        let mut app = RevwhoixApp::with_backend(Config::default(), Ok(backend));
        let ctx = egui::Context::default();

        app.apply(UiAction::Example("example".into()), &ctx);
        assert_eq!(app.keyword_input, "example");
        assert!(app.controller.is_loading());

        wait_for_result(&mut app);
        assert_eq!(app.controller.area(), &ResultArea::Results);
        assert_eq!(app.controller.header().unwrap().count, "2");
    }

    #[test]
    fn missing_backend_surfaces_error() {
        let mut app = RevwhoixApp::with_backend(Config::default(), Err("no TLS".into()));
        let ctx = egui::Context::default();
        app.keyword_input = "tesla".into();

        app.apply(UiAction::Search, &ctx);
        match app.controller.area() {
            ResultArea::Error(message) => assert!(message.contains("no TLS")),
            other => panic!("unexpected area: {other:?}"),
        }
    }

    #[test]
    fn filter_and_paging_actions_reach_controller() {
        let domains: Vec<String> = (0..35).map(|i| format!("d{i}.example.com")).collect();
        let backend: Arc<dyn SearchBackend> = Arc::new(FixedBackend(domains));
        let mut app = RevwhoixApp::with_backend(Config::default(), Ok(backend));
        let ctx = egui::Context::default();
        app.keyword_input = "example".into();
        app.apply(UiAction::Search, &ctx);
        wait_for_result(&mut app);

        app.apply(UiAction::NextPage, &ctx);
        assert_eq!(app.controller.state().current_page, 2);

        app.apply(UiAction::Filter("d1".into()), &ctx);
        assert_eq!(app.controller.state().current_page, 1);
        assert_eq!(app.controller.state().filtered_domains.len(), 11);

        app.apply(UiAction::PrevPage, &ctx);
        assert_eq!(app.controller.state().current_page, 1);
    }

    #[test]
    fn cards_fade_in_after_their_delay() {
        let delay = Duration::from_millis(100);
        assert_eq!(entrance_opacity(delay, Duration::from_millis(50)), 0.0);
        assert!((entrance_opacity(delay, Duration::from_millis(350)) - 0.5).abs() < 1e-3);
        assert_eq!(entrance_opacity(delay, Duration::from_secs(2)), 1.0);
    }
}
