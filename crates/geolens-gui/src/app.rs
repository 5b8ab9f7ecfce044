use std::path::PathBuf;
use std::sync::mpsc;

use geolens_core::classify::DisplayMode;
use geolens_core::config::AppConfig;
use geolens_core::consts::UNSUPPORTED_FORMAT_MESSAGE;
use geolens_core::file::SelectedFile;
use geolens_core::preview::{PreviewOutcome, RasterPreview, ZoomPreview};
use geolens_core::upload::UploadSession;
use geolens_core::viewport::MapView;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::convert::rgba_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{ImageState, MapState, PreviewState, UIState};
use crate::worker;

pub struct GeolensApp {
    pub cmd_tx: UnboundedSender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub ui_state: UIState,
    pub preview: PreviewState,
    pub session: UploadSession,
    pub config: AppConfig,
    image_generation: u64,
    pub show_about: bool,
}

impl GeolensApp {
    pub fn new(ctx: &egui::Context) -> std::io::Result<Self> {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone())?;
        let config = AppConfig::default();

        Ok(Self {
            cmd_tx,
            result_tx,
            result_rx,
            ui_state: UIState::default(),
            preview: PreviewState::default(),
            session: UploadSession::new(config.upload.clone()),
            config,
            image_generation: 0,
            show_about: false,
        })
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::FileSelected { path } => {
                    self.select_file(path);
                }
                WorkerResult::RasterReady { ticket, overlay } => {
                    let PreviewState::Raster(map) = &mut self.preview else {
                        continue;
                    };
                    let outcome = map.preview.apply(ticket, overlay);
                    if outcome != PreviewOutcome::Stale {
                        map.loading = false;
                    }
                    match outcome {
                        PreviewOutcome::Fitted(bounds) => {
                            map.texture = overlay_texture(ctx, map.preview.viewport());
                            self.ui_state.add_log(format!("Overlay fitted to {bounds}"));
                        }
                        PreviewOutcome::Fallback => {
                            map.texture = overlay_texture(ctx, map.preview.viewport());
                            self.ui_state
                                .add_log("Invalid or missing bounds, using default view".into());
                        }
                        PreviewOutcome::Failed(message) => {
                            self.ui_state
                                .add_log(format!("ERROR: Error loading GeoTIFF: {message}"));
                        }
                        PreviewOutcome::Stale => {}
                    }
                }
                WorkerResult::ImageReady { generation, image } => {
                    let PreviewState::Image(state) = &mut self.preview else {
                        continue;
                    };
                    if state.generation != generation {
                        continue;
                    }
                    state.loading = false;
                    match image {
                        Ok(image) => {
                            let texture = ctx.load_texture(
                                "zoom_image",
                                rgba_to_color_image(&image),
                                egui::TextureOptions::LINEAR,
                            );
                            state.preview.select(texture);
                            self.ui_state.add_log(format!(
                                "Image ready ({}x{})",
                                image.width(),
                                image.height()
                            ));
                        }
                        Err(e) => {
                            self.ui_state.add_log(format!("ERROR: {e}"));
                        }
                    }
                }
                WorkerResult::Upload { id, event } => {
                    if self.session.apply(id, event) && self.session.state().is_terminal() {
                        self.ui_state
                            .add_log(format!("Analysis {}", self.session.state()));
                    }
                }
                WorkerResult::ConfigImported { config } => {
                    self.apply_config(config);
                    self.ui_state.add_log("Config imported".into());
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    /// Replace the current selection and its preview.
    pub fn select_file(&mut self, path: PathBuf) {
        if self.session.is_uploading() {
            self.send_command(WorkerCommand::CancelUpload);
        }
        self.session.abort();
        self.ui_state.warning = None;

        let file = match SelectedFile::from_path(&path) {
            Ok(file) => file,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                return;
            }
        };
        let mode = file.display_mode();
        info!(file = file.name(), %mode, "file selected");
        self.ui_state.add_log(format!("Opened: {} ({mode})", path.display()));

        self.preview = match mode {
            DisplayMode::RasterOverlay => {
                let mut preview =
                    RasterPreview::new(MapView::new(self.config.viewport.size_px), self.config.viewport);
                let ticket = preview.begin();
                self.send_command(WorkerCommand::LoadRaster {
                    ticket,
                    file: file.clone(),
                    options: self.config.overlay,
                });
                PreviewState::Raster(MapState {
                    preview,
                    texture: None,
                    loading: true,
                })
            }
            DisplayMode::ZoomImage => {
                self.image_generation += 1;
                self.send_command(WorkerCommand::LoadImage {
                    generation: self.image_generation,
                    file: file.clone(),
                });
                PreviewState::Image(ImageState {
                    preview: ZoomPreview::new(),
                    generation: self.image_generation,
                    loading: true,
                })
            }
            DisplayMode::Unsupported => {
                warn!(file = file.name(), "unsupported file type");
                self.ui_state.warning = Some(UNSUPPORTED_FORMAT_MESSAGE.to_string());
                PreviewState::Empty
            }
        };

        self.ui_state.selected = Some(file);
    }

    /// Start an analysis of the selected file. Does nothing while one runs.
    pub fn start_analysis(&mut self) {
        let Some(id) = self.session.begin(self.ui_state.selected.as_ref()) else {
            return;
        };
        let Some(file) = self.ui_state.selected.clone() else {
            return;
        };
        self.ui_state
            .add_log(format!("Analyzing {} via {}", file.name(), self.config.endpoint));
        self.send_command(WorkerCommand::Analyze {
            id,
            file,
            endpoint: self.config.endpoint.clone(),
            upload: self.config.upload.clone(),
        });
    }

    /// Replace the settings. Upload timing takes effect now if idle, else
    /// from the next session.
    pub fn apply_config(&mut self, config: AppConfig) {
        self.session.reconfigure(config.upload.clone());
        self.config = config;
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

/// Upload the most recently attached overlay as a texture.
fn overlay_texture(ctx: &egui::Context, view: &MapView) -> Option<egui::TextureHandle> {
    view.overlays().last().map(|overlay| {
        ctx.load_texture(
            "raster_overlay",
            rgba_to_color_image(overlay.image()),
            egui::TextureOptions::LINEAR,
        )
    })
}

impl eframe::App for GeolensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);
        panels::report::show(ctx, self);

        // Keep the progress bar moving while the worker ticks.
        if self.session.is_uploading() || self.preview.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if self.show_about {
            egui::Window::new("About GeoLens")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("GeoLens");
                        ui.label("Geospatial Imagery Preview and Analysis");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
