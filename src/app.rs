use std::path::PathBuf;

use eframe::egui;
use log::{info, warn};

use crate::config::DashboardConfig;
use crate::constants::layout::{CATEGORY_PANEL_WIDTH, HISTOGRAM_HEIGHT, PREVIEW_PANEL_HEIGHT};
use crate::data::{DatasetSource, FileSource, SodaSource};
use crate::state::AppState;
use crate::ui;
use crate::views::group_thousands;
use crate::worker::{BackgroundLoader, LoadResult};

pub struct CrimeScope {
    pub state: AppState,

    /// Source settings and the values the controls started from
    pub config: DashboardConfig,

    /// Local export used instead of the endpoint, when one was opened
    pub current_file: Option<PathBuf>,

    loader: BackgroundLoader,
}

impl CrimeScope {
    /// Build the app and start the first load
    pub fn new(config: DashboardConfig) -> Self {
        let mut app = Self {
            state: AppState::new(&config),
            config,
            current_file: None,
            loader: BackgroundLoader::spawn(),
        };
        app.reload();
        app
    }

    fn source(&self) -> Box<dyn DatasetSource> {
        let fields = self.config.fields.clone();
        match &self.current_file {
            Some(path) => Box::new(FileSource::new(path.clone(), fields)),
            None => Box::new(SodaSource::new(self.config.endpoint.clone(), fields)),
        }
    }

    /// Fetch the current source again with the current row limit
    pub fn reload(&mut self) {
        let source = self.source();
        let label = source.describe();
        let limit = self.state.controls.data_limit;
        match self.loader.request(source, limit) {
            Ok(()) => self.state.begin_load(label),
            Err(e) => self.state.load_failed(e.user_message()),
        }
    }

    pub fn open_file(&mut self, path: PathBuf) {
        info!("Switching to local file {}", path.display());
        self.current_file = Some(path);
        self.reload();
    }

    pub fn use_endpoint(&mut self) {
        self.current_file = None;
        self.reload();
    }

    /// Install whatever the loader finished since the last frame
    fn poll_loader(&mut self) {
        while let Some(result) = self.loader.poll() {
            match result {
                LoadResult::Loaded(store) => self.state.install(store),
                LoadResult::Failed { source, error } => {
                    warn!("{}: {}", error.title(), error);
                    let message = if source.is_empty() {
                        error.user_message()
                    } else {
                        format!("{} ({})", error.user_message(), source)
                    };
                    self.state.load_failed(message);
                }
            }
        }
    }

    pub fn save_config(&mut self) {
        let mut config = self.config.clone();
        config.store_controls(&self.state.controls);

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("crimescope.json")
            .save_file()
        {
            match config.write(&path) {
                Ok(()) => {
                    info!("Saved configuration to {}", path.display());
                    self.config = config;
                }
                Err(e) => self.state.ui.set_error(format!("Failed to save config: {}", e.user_message())),
            }
        }
    }

    /// Adopt a config file: controls change immediately, a new endpoint or
    /// row limit takes effect through a reload
    pub fn load_config(&mut self) {
        let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() else {
            return;
        };
        match DashboardConfig::read(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                let controls = config.controls();
                let needs_reload = config.endpoint != self.config.endpoint
                    || config.fields != self.config.fields
                    || controls.data_limit != self.state.controls.data_limit;

                self.state.preview_rows = config.preview_rows;
                self.state.controls.data_limit = controls.data_limit;
                self.state.set_top_n(controls.top_n);
                self.state.set_granularity(controls.granularity);
                self.config = config;
                if needs_reload {
                    self.reload();
                }
            }
            Err(e) => self.state.ui.set_error(format!("Failed to load config: {}", e.user_message())),
        }
    }

    fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.state.ui.is_loading() {
                ui.spinner();
            }
            ui.label(self.state.status_text());
            if self.state.has_data() {
                ui.separator();
                ui.weak(self.state.store.source_label());
                let dropped = self.state.store.dropped();
                if dropped > 0 {
                    ui.separator();
                    ui.weak(format!("{} malformed rows dropped", group_thousands(dropped)));
                }
            }
        });
    }

    fn render_error_window(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.ui.error_message.clone() else {
            return;
        };
        egui::Window::new("Error")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.state.ui.clear_error();
                }
            });
    }
}

impl eframe::App for CrimeScope {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        self.poll_loader();
        if self.loader.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::render_toolbar(self, ctx, ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.render_status_bar(ui);
        });

        egui::TopBottomPanel::bottom("preview_table")
            .resizable(true)
            .default_height(PREVIEW_PANEL_HEIGHT)
            .show(ctx, |ui| {
                ui::render_preview_table(&mut self.state, ui);
            });

        egui::TopBottomPanel::top("time_histogram")
            .resizable(true)
            .default_height(HISTOGRAM_HEIGHT)
            .show(ctx, |ui| {
                ui::render_time_histogram(&mut self.state, ui);
            });

        egui::SidePanel::left("category_bars")
            .resizable(true)
            .default_width(CATEGORY_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui::render_category_bars(&mut self.state, ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::render_scatter(&mut self.state, ui);
        });

        self.render_error_window(ctx);
    }
}
