use std::rc::Rc;

use bubblescope_core::brush::PixelSpan;
use bubblescope_core::parsers;
use bubblescope_core::state::GameType;
use bubblescope_core::{ChartDashboard, DashboardConfig, SelectionError};
use bubblescope_protocol::ThemeToken;
use eframe::egui;

use crate::renderer::{self, Transform};
use crate::theme::{self, ThemeMode};

/// Share of the chart column given to the timeline.
const TIMELINE_FRACTION: f32 = 0.2;

/// Main application state.
pub struct DashboardApp {
    dashboard: Option<ChartDashboard>,
    config: DashboardConfig,
    theme_mode: ThemeMode,
    /// Screen x where the current timeline drag began.
    drag_origin: Option<f32>,
    /// Rejected control change or load failure to display.
    error: Option<String>,
    /// Pending CSV data from async load.
    pending_data: std::sync::Arc<std::sync::Mutex<Option<Vec<u8>>>>,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(ThemeMode::Dark.visuals());

        let pending_data: std::sync::Arc<std::sync::Mutex<Option<Vec<u8>>>> =
            std::sync::Arc::new(std::sync::Mutex::new(None));

        // On WASM, check URL hash for auto-load (e.g. #demo)
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window();
            if let Some(w) = window {
                let hash = w.location().hash().unwrap_or_default();
                if hash == "#demo" {
                    let pd = pending_data.clone();
                    let ctx = cc.egui_ctx.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        match Self::fetch_bytes("/assets/steam_games.csv").await {
                            Ok(resp) => {
                                if let Ok(mut lock) = pd.lock() {
                                    *lock = Some(resp);
                                }
                                ctx.request_repaint();
                            }
                            Err(e) => {
                                web_sys::console::error_1(
                                    &format!("bubblescope: fetch error: {e}").into(),
                                );
                            }
                        }
                    });
                }
            }
        }

        Self {
            dashboard: None,
            config: DashboardConfig::default(),
            theme_mode: ThemeMode::Dark,
            drag_origin: None,
            error: None,
            pending_data,
        }
    }

    fn load_csv(&mut self, data: &[u8]) {
        let loaded = parsers::load_dataset(data)
            .map_err(|e| e.to_string())
            .and_then(|(dataset, _report)| {
                ChartDashboard::with_charts(Rc::new(dataset), self.config.clone())
                    .map_err(|e| e.to_string())
            });
        match loaded {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.error = None;
            }
            Err(e) => self.error = Some(format!("Failed to load dataset: {e}")),
        }
    }

    fn apply(&mut self, result: Result<(), SelectionError>) {
        match result {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let Some(dashboard) = self.dashboard.as_mut() else {
            ui.label("No dataset loaded");
            return;
        };
        let mut results = Vec::new();
        let state = dashboard.state().clone();

        ui.heading("Game type");
        let mut game_type = state.game_type;
        ui.radio_value(&mut game_type, GameType::Indie, GameType::Indie.label());
        ui.radio_value(&mut game_type, GameType::Studio, GameType::Studio.label());
        if game_type != state.game_type {
            results.push(dashboard.select_game_type(game_type));
        }

        let mut compare = state.compare_mode;
        if ui.checkbox(&mut compare, "Compare indie and studio").changed() {
            results.push(dashboard.set_compare_mode(compare));
        }

        ui.separator();
        ui.heading("Genres");
        let catalog = dashboard.config().genre_catalog.clone();
        for genre in &catalog {
            let mut checked = state.required_genres.contains(genre.as_str());
            if ui.checkbox(&mut checked, genre.as_str()).changed() {
                results.push(dashboard.toggle_genre(genre));
            }
        }

        ui.separator();
        ui.heading("Bubble size");
        let (lo, hi) = dashboard.config().radius.slider_bounds();
        let mut min_radius = state.radius_extent.min;
        if ui
            .add(egui::Slider::new(&mut min_radius, lo..=hi).text("min radius"))
            .changed()
        {
            results.push(dashboard.set_min_radius(min_radius));
        }

        ui.separator();
        ui.label(format!("Years: {}", state.year_range));
        if ui.button("Clear brush").clicked() {
            results.push(dashboard.brush(None));
        }

        let stats = dashboard.stats();
        ui.separator();
        ui.label(format!("Timeline: {} games", stats.timeline));
        ui.label(format!(
            "Bubbles: {} (indie {}, studio {})",
            stats.bubble_total(),
            stats.indie,
            stats.studio
        ));

        for result in results {
            self.apply(result);
        }
    }

    fn charts(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        let timeline_height = (available.height() * TIMELINE_FRACTION).max(60.0);
        let timeline_rect = egui::Rect::from_min_size(
            available.min,
            egui::vec2(available.width(), timeline_height),
        );
        let bubble_rect = egui::Rect::from_min_max(
            egui::pos2(available.left(), timeline_rect.bottom() + 4.0),
            available.max,
        );

        let timeline_response = ui.allocate_rect(timeline_rect, egui::Sense::click_and_drag());
        let bubble_response = ui.allocate_rect(bubble_rect, egui::Sense::hover());

        let Some(dashboard) = self.dashboard.as_ref() else {
            return;
        };
        let mode = self.theme_mode;
        let mut painter = ui.painter_at(available);
        painter.rect_filled(
            available,
            egui::CornerRadius::ZERO,
            theme::resolve(ThemeToken::Background, mode),
        );

        let timeline_tf = Transform::fit(&dashboard.config().timeline_viewport, timeline_rect);
        renderer::render_commands(
            &mut painter,
            &dashboard.timeline_commands(),
            timeline_tf,
            mode,
        );

        let bubble_tf = Transform::fit(&dashboard.config().bubble_viewport, bubble_rect);
        let bubbles = renderer::render_commands(
            &mut painter,
            &dashboard.bubble_commands(),
            bubble_tf,
            mode,
        );

        if let Some(pos) = bubble_response.hover_pos()
            && let Some(index) = bubbles.hit(pos)
            && let Some(record) = dashboard.dataset().record(index)
        {
            let text = bubblescope_core::views::bubble::tooltip(record);
            bubble_response.on_hover_text_at_pointer(text.as_str());
        }

        // Brush gesture on the timeline.
        if timeline_response.drag_started() {
            self.drag_origin = timeline_response.interact_pointer_pos().map(|p| p.x);
        }
        if let (Some(origin), Some(pos)) =
            (self.drag_origin, timeline_response.interact_pointer_pos())
        {
            let preview = egui::Rect::from_x_y_ranges(
                origin.min(pos.x)..=origin.max(pos.x),
                timeline_rect.y_range(),
            );
            painter.rect_filled(
                preview,
                egui::CornerRadius::ZERO,
                theme::resolve(ThemeToken::BrushFill, mode),
            );
        }

        let mut gesture = None;
        if timeline_response.drag_stopped() {
            if let (Some(origin), Some(pos)) =
                (self.drag_origin.take(), timeline_response.interact_pointer_pos())
            {
                gesture = Some(Some(PixelSpan::new(
                    timeline_tf.invert_x(origin),
                    timeline_tf.invert_x(pos.x),
                )));
            }
        } else if timeline_response.clicked() {
            gesture = Some(None);
        }

        if let Some(selection) = gesture
            && let Some(dashboard) = self.dashboard.as_mut()
        {
            let result = dashboard.brush(selection);
            self.apply(result);
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window = web_sys::window().ok_or("no window")?;
        let resp_value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| format!("{e:?}"))?;
        let resp: web_sys::Response = resp_value.dyn_into().map_err(|_| "not a Response")?;
        if !resp.ok() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let buf = JsFuture::from(resp.array_buffer().map_err(|e| format!("{e:?}"))?)
            .await
            .map_err(|e| format!("{e:?}"))?;
        let uint8 = js_sys::Uint8Array::new(&buf);
        Ok(uint8.to_vec())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pending = {
            let mut lock = self
                .pending_data
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            lock.take()
        };
        if let Some(data) = pending {
            self.load_csv(&data);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("bubblescope");
                ui.separator();

                if ui.button("Open CSV").clicked() {
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Steam export", &["csv"])
                            .pick_file()
                        {
                            match std::fs::read(&path) {
                                Ok(data) => self.load_csv(&data),
                                Err(e) => {
                                    self.error = Some(format!("Failed to read file: {e}"));
                                }
                            }
                        }
                    }
                }

                ui.separator();
                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "Dark",
                    ThemeMode::Light => "Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = self.theme_mode.toggled();
                    ctx.set_visuals(self.theme_mode.visuals());
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                } else if let Some(dashboard) = &self.dashboard {
                    ui.label(format!(
                        "{} games loaded | drag on the timeline to filter years, click to clear",
                        dashboard.dataset().len()
                    ));
                } else {
                    ui.label("No dataset loaded: click Open CSV or drop a Steam export here");
                }
            });
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.dashboard.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Drop a Steam games CSV here or click Open CSV");
                });
                return;
            }
            self.charts(ui);
        });

        // Handle file drop
        let dropped: Option<Vec<u8>> = ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|file| file.bytes.as_ref())
                .map(|bytes| bytes.to_vec())
        });
        if let Some(data) = dropped {
            self.load_csv(&data);
        }
    }
}
