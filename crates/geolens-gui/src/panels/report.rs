use geolens_core::report::{render, ReportLine, ReportView, REPORT_TITLE};

use crate::app::GeolensApp;

/// Report window, open whenever the session holds a result.
pub fn show(ctx: &egui::Context, app: &mut GeolensApp) {
    let Some(view) = app.session.result().map(render) else {
        return;
    };

    let mut close = false;
    egui::Window::new(REPORT_TITLE)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                report_body(ui, &view);
            });
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });

    if close {
        app.session.dismiss();
    }
}

fn report_body(ui: &mut egui::Ui, view: &ReportView) {
    match view {
        ReportView::Error(message) => {
            ui.colored_label(egui::Color32::from_rgb(230, 80, 80), message);
        }
        ReportView::Sections(sections) => {
            for section in sections {
                ui.strong(section.kind.title());
                egui::Grid::new(section.kind.title())
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for line in &section.lines {
                            match line {
                                ReportLine::Field { label, value } => {
                                    ui.label(label);
                                    ui.label(value);
                                }
                                ReportLine::Item(text) => {
                                    ui.label(format!("\u{2022} {text}"));
                                    ui.label("");
                                }
                            }
                            ui.end_row();
                        }
                    });
                ui.add_space(6.0);
            }
        }
    }
}
