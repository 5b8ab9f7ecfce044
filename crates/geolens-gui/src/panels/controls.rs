use geolens_core::classify::DisplayMode;
use geolens_core::preview::ZoomFactor;
use geolens_core::upload::SessionState;

use crate::app::GeolensApp;
use crate::panels::menu_bar::open_file;
use crate::panels::section_header;
use crate::state::PreviewState;

const LEFT_PANEL_WIDTH: f32 = 280.0;

pub fn show(ctx: &egui::Context, app: &mut GeolensApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                file_section(ctx, ui, app);
                ui.separator();
                preview_section(ui, app);
                ui.separator();
                analysis_section(ui, app);
            });
        });
}

fn file_section(ctx: &egui::Context, ui: &mut egui::Ui, app: &mut GeolensApp) {
    section_header(ui, "File", None);
    ui.add_space(4.0);

    if ui.button("Open...").clicked() {
        open_file(ctx, app);
    }

    if let Some(ref file) = app.ui_state.selected {
        ui.label(file.name());
        ui.small(format!("{} ({})", file.display_mode(), file.content_type()));
    }

    if let Some(ref warning) = app.ui_state.warning {
        ui.add_space(4.0);
        ui.colored_label(egui::Color32::YELLOW, warning);
    }
}

fn preview_section(ui: &mut egui::Ui, app: &mut GeolensApp) {
    let status = match app.ui_state.display_mode() {
        Some(DisplayMode::RasterOverlay) => Some("map"),
        Some(DisplayMode::ZoomImage) => Some("image"),
        _ => None,
    };
    section_header(ui, "Preview", status);
    ui.add_space(4.0);

    match &mut app.preview {
        PreviewState::Image(state) => {
            let factor = state.preview.factor();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(factor < ZoomFactor::MAX, egui::Button::new("Zoom In"))
                    .clicked()
                {
                    state.preview.zoom_in();
                }
                if ui
                    .add_enabled(factor > ZoomFactor::MIN, egui::Button::new("Zoom Out"))
                    .clicked()
                {
                    state.preview.zoom_out();
                }
                ui.label(format!("{}", state.preview.factor()));
            });
        }
        PreviewState::Raster(map) => {
            let view = map.preview.viewport();
            ui.small(format!("Center {}", view.center()));
            ui.small(format!("Zoom {:.0}", view.zoom()));
        }
        PreviewState::Empty => {}
    }

    ui.add_space(4.0);
    ui.add(
        egui::Slider::new(&mut app.config.overlay.opacity, 0.0..=1.0)
            .text("Overlay opacity")
            .clamping(egui::SliderClamping::Always),
    );
}

fn analysis_section(ui: &mut egui::Ui, app: &mut GeolensApp) {
    let status = match app.session.state() {
        SessionState::Idle => None,
        state => Some(state.to_string()),
    };
    section_header(ui, "Analysis", status.as_deref());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Endpoint:");
        ui.add_enabled(
            !app.session.is_uploading(),
            egui::TextEdit::singleline(&mut app.config.endpoint),
        );
    });
    ui.add_space(4.0);

    let can_run = app.session.can_begin(app.ui_state.selected.as_ref());
    let label = if app.session.is_uploading() {
        "Analyzing..."
    } else {
        "Analyze File"
    };
    if ui
        .add_enabled(can_run, egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 28.0)))
        .clicked()
    {
        app.start_analysis();
    }

    if app.session.state() != SessionState::Idle {
        ui.add_space(4.0);
        let progress = app.session.progress();
        ui.add(
            egui::ProgressBar::new(progress as f32 / 100.0)
                .text(format!("{progress}%"))
                .animate(app.session.is_uploading()),
        );
    }
}
