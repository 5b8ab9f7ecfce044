use crate::app::GeolensApp;
use crate::state::PreviewState;

pub fn show(ctx: &egui::Context, app: &mut GeolensApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            if let Some(ref file) = app.ui_state.selected {
                ui.label(file.name());
                ui.separator();
                ui.label(file.display_mode().to_string());
                ui.separator();
            }
            match &app.preview {
                PreviewState::Raster(map) => {
                    ui.label(format!("Map zoom: {:.0}", map.preview.viewport().zoom()));
                    ui.separator();
                }
                PreviewState::Image(image) => {
                    if let Some(texture) = image.preview.image() {
                        let [w, h] = texture.size();
                        ui.label(format!("{w}x{h}"));
                        ui.separator();
                    }
                    ui.label(format!("Zoom: {}", image.preview.factor()));
                    ui.separator();
                }
                PreviewState::Empty => {}
            }
            ui.label(format!("Analysis: {}", app.session.state()));
        });

        ui.add_space(2.0);
    });
}
