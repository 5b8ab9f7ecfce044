use geolens_core::geo::LatLng;
use geolens_core::viewport::MapView;

use crate::app::GeolensApp;
use crate::state::{ImageState, MapState, PreviewState};

/// Map zoom levels per point of scroll.
const SCROLL_ZOOM_RATE: f64 = 0.01;

const GRATICULE_COLOR: egui::Color32 = egui::Color32::from_gray(60);

pub fn show(ctx: &egui::Context, app: &mut GeolensApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        match &mut app.preview {
            PreviewState::Raster(map) => show_map(ui, rect, map),
            PreviewState::Image(image) => show_image(ui, image),
            PreviewState::Empty => show_placeholder(ui, "Open a GeoTIFF, JPG, or PNG to begin"),
        }
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn show_map(ui: &mut egui::Ui, rect: egui::Rect, map: &mut MapState) {
    let view = map.preview.viewport_mut();
    view.set_size([rect.width() as f64, rect.height() as f64]);

    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    handle_zoom(ui, &response, view);
    if response.dragged_by(egui::PointerButton::Primary) {
        let d = response.drag_delta();
        view.pan_by([d.x as f64, d.y as f64]);
    }

    let painter = ui.painter_at(rect);
    draw_graticule(&painter, rect, view);

    let placed = map.texture.as_ref().and_then(|texture| {
        let overlay = view.overlays().last()?;
        let (sw, ne) = overlay.bounds().corners()?;
        Some((texture.id(), screen_rect(rect, view, sw, ne)))
    });
    match placed {
        Some((texture_id, img_rect)) => {
            painter.image(
                texture_id,
                img_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None if map.loading => draw_label(&painter, rect, "Loading raster..."),
        None if !view.overlays().is_empty() => {
            draw_label(&painter, rect, "Overlay has no usable bounds")
        }
        None => {}
    }

    draw_label(
        &painter,
        rect.translate(egui::vec2(0.0, rect.height() - 32.0)),
        &format!("{}  z{:.0}", view.center(), view.zoom()),
    );
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, view: &mut MapView) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }
    view.zoom_by(scroll_delta as f64 * SCROLL_ZOOM_RATE);
}

fn to_pos(rect: egui::Rect, view: &MapView, p: LatLng) -> egui::Pos2 {
    let [x, y] = view.to_screen(p);
    rect.min + egui::vec2(x as f32, y as f32)
}

fn screen_rect(rect: egui::Rect, view: &MapView, sw: LatLng, ne: LatLng) -> egui::Rect {
    egui::Rect::from_two_pos(to_pos(rect, view, sw), to_pos(rect, view, ne))
}

/// Degrees between graticule lines, or `None` when zoomed in too far for
/// whole-degree lines to be useful.
fn graticule_step(zoom: f64) -> Option<f64> {
    match zoom {
        z if z < 2.0 => Some(30.0),
        z if z < 4.0 => Some(15.0),
        z if z < 6.0 => Some(5.0),
        z if z < 8.0 => Some(1.0),
        _ => None,
    }
}

fn draw_graticule(painter: &egui::Painter, rect: egui::Rect, view: &MapView) {
    let Some(step) = graticule_step(view.zoom()) else {
        return;
    };
    let stroke = egui::Stroke::new(1.0, GRATICULE_COLOR);
    let lat_limit = 80.0;

    let mut lng = -180.0;
    while lng <= 180.0 {
        let top = to_pos(rect, view, LatLng::new(lat_limit, lng));
        let bottom = to_pos(rect, view, LatLng::new(-lat_limit, lng));
        if top.x >= rect.left() && top.x <= rect.right() {
            painter.line_segment([top, bottom], stroke);
        }
        lng += step;
    }

    let mut lat = -lat_limit;
    while lat <= lat_limit {
        let west = to_pos(rect, view, LatLng::new(lat, -180.0));
        let east = to_pos(rect, view, LatLng::new(lat, 180.0));
        if west.y >= rect.top() && west.y <= rect.bottom() {
            painter.line_segment([west, east], stroke);
        }
        lat += step;
    }
}

fn draw_label(painter: &egui::Painter, rect: egui::Rect, label: &str) {
    painter.text(
        rect.left_top() + egui::vec2(8.0, 8.0),
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}

fn show_image(ui: &mut egui::Ui, state: &ImageState) {
    let Some(texture) = state.preview.image() else {
        if state.loading {
            show_placeholder(ui, "Loading image...");
        }
        return;
    };

    let size = texture.size_vec2() * state.preview.factor().value();
    egui::ScrollArea::both().show(ui, |ui| {
        ui.add(egui::Image::new((texture.id(), size)));
    });
}

fn show_placeholder(ui: &mut egui::Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new(text)
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
