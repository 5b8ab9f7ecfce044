use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{
    DEFAULT_FIT_PADDING_PX, DEFAULT_VIEWPORT_SIZE, FALLBACK_MAP_ZOOM, INITIAL_MAP_ZOOM,
    MAX_MAP_ZOOM, MIN_MAP_ZOOM, TILE_SIZE_PX,
};
use crate::geo::{mercator_unit, mercator_unit_inverse, LatLng, OverlayBounds};
use crate::raster::overlay::Overlay;

/// A map surface that overlays can be attached to.
pub trait MapViewport {
    /// Center the map on `center` at `zoom`.
    fn set_view(&mut self, center: LatLng, zoom: f64);

    /// Show `bounds` entirely, keeping `padding_px` free on every side.
    fn fit_bounds(&mut self, bounds: &OverlayBounds, padding_px: f64);

    fn add_overlay(&mut self, overlay: Overlay);

    /// Release every overlay and reset the view. The viewport must not be
    /// used for drawing afterwards.
    fn teardown(&mut self);
}

/// Viewport policy settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Pixel margin used when fitting to an overlay.
    pub padding_px: f64,
    /// Zoom of the neutral view shown before any overlay is applied.
    pub initial_zoom: f64,
    /// Zoom of the world view used when bounds are unusable.
    pub fallback_zoom: f64,
    /// Viewport size in pixels for headless use.
    pub size_px: [f64; 2],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding_px: DEFAULT_FIT_PADDING_PX,
            initial_zoom: INITIAL_MAP_ZOOM,
            fallback_zoom: FALLBACK_MAP_ZOOM,
            size_px: DEFAULT_VIEWPORT_SIZE,
        }
    }
}

/// How the viewport is positioned after an overlay is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportFit {
    /// Fit to the overlay bounds with padding.
    Fit { bounds: OverlayBounds, padding_px: f64 },
    /// Neutral world view; the overlay had no usable bounds.
    Fallback { center: LatLng, zoom: f64 },
}

/// Decide how to position the map for an overlay with `bounds`.
pub fn resolve_fit(bounds: &OverlayBounds, config: &ViewportConfig) -> ViewportFit {
    if bounds.is_valid() && bounds.south_west.is_some() && bounds.north_east.is_some() {
        ViewportFit::Fit {
            bounds: *bounds,
            padding_px: config.padding_px,
        }
    } else {
        ViewportFit::Fallback {
            center: LatLng::ORIGIN,
            zoom: config.fallback_zoom,
        }
    }
}

/// Apply a resolved fit to a viewport. Fallbacks are logged as degraded
/// previews, not errors.
pub fn apply_fit<V: MapViewport + ?Sized>(viewport: &mut V, fit: &ViewportFit) {
    match *fit {
        ViewportFit::Fit { bounds, padding_px } => {
            debug!(%bounds, padding_px, "fitting viewport to overlay");
            viewport.fit_bounds(&bounds, padding_px);
        }
        ViewportFit::Fallback { center, zoom } => {
            warn!("Invalid or missing bounds, using default view");
            viewport.set_view(center, zoom);
        }
    }
}

/// Web-Mercator map state: a center, a zoom, a pixel size, and the attached
/// overlays. Zoom math follows the slippy-map convention of a 256px world
/// at zoom 0.
#[derive(Clone, Debug)]
pub struct MapView {
    center: LatLng,
    zoom: f64,
    size_px: [f64; 2],
    overlays: Vec<Overlay>,
    torn_down: bool,
}

impl MapView {
    /// A map of `size_px` showing the neutral starting view.
    pub fn new(size_px: [f64; 2]) -> Self {
        Self {
            center: LatLng::ORIGIN,
            zoom: INITIAL_MAP_ZOOM,
            size_px,
            overlays: Vec::new(),
            torn_down: false,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size_px(&self) -> [f64; 2] {
        self.size_px
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn set_size(&mut self, size_px: [f64; 2]) {
        self.size_px = size_px;
    }

    /// Change zoom by `delta` levels, clamped to the map's zoom range.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM);
    }

    /// Move the center by a screen-space drag of `delta_px`.
    pub fn pan_by(&mut self, delta_px: [f64; 2]) {
        let world = world_size(self.zoom);
        let c = mercator_unit(self.center);
        let moved = [
            (c[0] - delta_px[0] / world).rem_euclid(1.0),
            (c[1] - delta_px[1] / world).clamp(0.0, 1.0),
        ];
        self.center = mercator_unit_inverse(moved);
    }

    /// Screen position (pixels from the top-left corner) of a coordinate.
    pub fn to_screen(&self, p: LatLng) -> [f64; 2] {
        let world = world_size(self.zoom);
        let c = mercator_unit(self.center);
        let q = mercator_unit(p);
        [
            (q[0] - c[0]) * world + self.size_px[0] / 2.0,
            (q[1] - c[1]) * world + self.size_px[1] / 2.0,
        ]
    }

    /// Largest integer zoom at which `bounds` fits inside the padded viewport.
    pub fn bounds_zoom(&self, bounds: &OverlayBounds, padding_px: f64) -> f64 {
        let Some((sw, ne)) = bounds.corners() else {
            return self.zoom;
        };
        let a = mercator_unit(sw);
        let b = mercator_unit(ne);
        let span_x = (b[0] - a[0]).abs() * TILE_SIZE_PX;
        let span_y = (b[1] - a[1]).abs() * TILE_SIZE_PX;
        let avail_x = (self.size_px[0] - 2.0 * padding_px).max(1.0);
        let avail_y = (self.size_px[1] - 2.0 * padding_px).max(1.0);

        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (avail_x / span_x).min(avail_y / span_y),
            (true, false) => avail_x / span_x,
            (false, true) => avail_y / span_y,
            (false, false) => return MAX_MAP_ZOOM,
        };
        scale.log2().floor().clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM)
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_SIZE)
    }
}

impl MapViewport for MapView {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM);
    }

    fn fit_bounds(&mut self, bounds: &OverlayBounds, padding_px: f64) {
        let Some((sw, ne)) = bounds.corners() else {
            return;
        };
        let a = mercator_unit(sw);
        let b = mercator_unit(ne);
        self.zoom = self.bounds_zoom(bounds, padding_px);
        self.center = mercator_unit_inverse([(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]);
    }

    fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    fn teardown(&mut self) {
        self.overlays.clear();
        self.center = LatLng::ORIGIN;
        self.zoom = INITIAL_MAP_ZOOM;
        self.torn_down = true;
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE_PX * zoom.exp2()
}
