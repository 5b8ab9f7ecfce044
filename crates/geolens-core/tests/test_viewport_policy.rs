mod common;

use approx::assert_abs_diff_eq;
use geolens_core::geo::{LatLng, OverlayBounds};
use geolens_core::viewport::{
    apply_fit, resolve_fit, MapView, MapViewport, ViewportConfig, ViewportFit,
};

use common::sample_bounds;

fn fallback() -> ViewportFit {
    ViewportFit::Fallback {
        center: LatLng::ORIGIN,
        zoom: 2.0,
    }
}

#[test]
fn test_valid_bounds_fit_with_padding() {
    let fit = resolve_fit(&sample_bounds(), &ViewportConfig::default());
    assert_eq!(
        fit,
        ViewportFit::Fit {
            bounds: sample_bounds(),
            padding_px: 20.0
        }
    );
}

#[test]
fn test_missing_corner_falls_back() {
    let bounds = OverlayBounds {
        south_west: Some(LatLng::new(49.0, 10.0)),
        north_east: None,
    };
    assert_eq!(resolve_fit(&bounds, &ViewportConfig::default()), fallback());
    assert_eq!(
        resolve_fit(&OverlayBounds::undefined(), &ViewportConfig::default()),
        fallback()
    );
}

#[test]
fn test_non_finite_bounds_fall_back() {
    let bounds = OverlayBounds::new(LatLng::new(f64::NAN, 10.0), LatLng::new(50.0, 12.0));
    assert_eq!(resolve_fit(&bounds, &ViewportConfig::default()), fallback());
}

#[test]
fn test_out_of_range_bounds_fall_back() {
    // Raw projected metres read as degrees.
    let bounds = OverlayBounds::new(
        LatLng::new(5_500_000.0, 400_000.0),
        LatLng::new(5_600_000.0, 500_000.0),
    );
    assert_eq!(resolve_fit(&bounds, &ViewportConfig::default()), fallback());
}

#[test]
fn test_inverted_bounds_fall_back() {
    let bounds = OverlayBounds::new(LatLng::new(50.0, 12.0), LatLng::new(49.0, 10.0));
    assert_eq!(resolve_fit(&bounds, &ViewportConfig::default()), fallback());
}

#[test]
fn test_fallback_uses_configured_zoom() {
    let config = ViewportConfig {
        fallback_zoom: 3.0,
        ..ViewportConfig::default()
    };
    match resolve_fit(&OverlayBounds::undefined(), &config) {
        ViewportFit::Fallback { center, zoom } => {
            assert_eq!(center, LatLng::ORIGIN);
            assert_eq!(zoom, 3.0);
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[test]
fn test_apply_fit_centers_map_on_bounds() {
    let mut view = MapView::new([800.0, 600.0]);
    let fit = resolve_fit(&sample_bounds(), &ViewportConfig::default());
    apply_fit(&mut view, &fit);

    assert_abs_diff_eq!(view.center().lng, 11.0, epsilon = 1e-9);
    // Mercator midpoint sits slightly north of the arithmetic one.
    assert!(view.center().lat > 49.5 && view.center().lat < 50.0);
    assert_eq!(view.zoom(), view.zoom().floor());

    // The fitted bounds stay inside the padded viewport.
    let (sw, ne) = sample_bounds().corners().unwrap();
    let a = view.to_screen(sw);
    let b = view.to_screen(ne);
    for p in [a, b] {
        assert!(p[0] >= 20.0 - 1e-6 && p[0] <= 780.0 + 1e-6, "{p:?}");
        assert!(p[1] >= 20.0 - 1e-6 && p[1] <= 580.0 + 1e-6, "{p:?}");
    }
}

#[test]
fn test_fit_zoom_is_largest_that_fits() {
    let view = MapView::new([1000.0, 1000.0]);
    let z = view.bounds_zoom(&sample_bounds(), 20.0);
    // 2 degrees of longitude are ~728px wide at z=9 and ~1456px at z=10.
    assert_eq!(z, 9.0);
}

#[test]
fn test_apply_fallback_resets_view() {
    let mut view = MapView::new([800.0, 600.0]);
    view.set_view(LatLng::new(10.0, 10.0), 9.0);
    apply_fit(&mut view, &fallback());
    assert_eq!(view.center(), LatLng::ORIGIN);
    assert_eq!(view.zoom(), 2.0);
}
