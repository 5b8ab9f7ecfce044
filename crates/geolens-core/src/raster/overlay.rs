use std::sync::Arc;

use image::RgbaImage;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_OVERLAY_OPACITY, DEFAULT_OVERLAY_RESOLUTION, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{GeolensError, Result};
use crate::geo::OverlayBounds;
use crate::raster::grid::RasterGrid;
use crate::viewport::MapViewport;

/// Presentation settings for a raster overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Layer opacity in [0.0, 1.0].
    pub opacity: f32,
    /// Samples per tile edge when rasterizing the grid.
    pub resolution: u32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OVERLAY_OPACITY,
            resolution: DEFAULT_OVERLAY_RESOLUTION,
        }
    }
}

impl OverlayOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(GeolensError::Overlay(format!(
                "opacity {} outside [0, 1]",
                self.opacity
            )));
        }
        if self.resolution == 0 {
            return Err(GeolensError::Overlay("resolution must be positive".into()));
        }
        Ok(())
    }
}

/// A rasterized, georeferenced layer ready to be drawn on a map.
///
/// Cloning is cheap; the rendered pixels are shared.
#[derive(Clone, Debug)]
pub struct Overlay {
    options: OverlayOptions,
    bounds: OverlayBounds,
    image: Arc<RgbaImage>,
    source_size: [usize; 2],
    band_count: usize,
}

impl Overlay {
    /// Rasterize `grid` at `options.resolution` samples per edge.
    ///
    /// One or two bands render as grayscale, three or more as RGB. Each band
    /// is stretched between its own min and max; no-data samples are
    /// transparent.
    pub fn build(grid: &RasterGrid, options: OverlayOptions) -> Result<Self> {
        options.validate()?;
        if grid.is_empty() {
            return Err(GeolensError::Overlay("raster has no pixels".into()));
        }

        let (w, h) = (grid.width(), grid.height());
        let scale = (options.resolution as f64 / w.max(h) as f64).min(1.0);
        let out_w = ((w as f64 * scale).round() as usize).max(1);
        let out_h = ((h as f64 * scale).round() as usize).max(1);

        let channels: Vec<&Array2<f32>> = if grid.band_count() >= 3 {
            grid.bands[..3].iter().collect()
        } else {
            vec![&grid.bands[0]; 3]
        };
        let ranges: Vec<(f32, f32)> = channels
            .iter()
            .map(|band| band_range(band, grid).unwrap_or((0.0, 0.0)))
            .collect();
        let alpha = (options.opacity * 255.0).round() as u8;

        let mut buf = vec![0u8; out_w * out_h * 4];
        buf.par_chunks_mut(out_w * 4)
            .enumerate()
            .for_each(|(out_row, line)| {
                let row = (out_row * h / out_h).min(h - 1);
                for out_col in 0..out_w {
                    let col = (out_col * w / out_w).min(w - 1);
                    let px = &mut line[out_col * 4..out_col * 4 + 4];
                    let mut transparent = false;
                    for (c, band) in channels.iter().enumerate() {
                        let v = band[[row, col]];
                        if grid.is_no_data(v) {
                            transparent = true;
                            break;
                        }
                        px[c] = stretch(v, ranges[c]);
                    }
                    px[3] = if transparent { 0 } else { alpha };
                }
            });

        let image = RgbaImage::from_raw(out_w as u32, out_h as u32, buf)
            .ok_or_else(|| GeolensError::Overlay("rendered buffer size mismatch".into()))?;

        Ok(Self {
            options,
            bounds: grid.bounds(),
            image: Arc::new(image),
            source_size: [w, h],
            band_count: grid.band_count(),
        })
    }

    pub fn bounds(&self) -> OverlayBounds {
        self.bounds
    }

    pub fn options(&self) -> OverlayOptions {
        self.options
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width and height of the source grid, in pixels.
    pub fn source_size(&self) -> [usize; 2] {
        self.source_size
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Add this overlay to a map viewport.
    pub fn attach_to<V: MapViewport + ?Sized>(&self, viewport: &mut V) {
        viewport.add_overlay(self.clone());
    }
}

/// Min and max of the valid samples of a band, or `None` if all are no-data.
fn band_range(band: &Array2<f32>, grid: &RasterGrid) -> Option<(f32, f32)> {
    let init = (f32::INFINITY, f32::NEG_INFINITY);
    let fold = |acc: (f32, f32), v: &f32| {
        if grid.is_no_data(*v) {
            acc
        } else {
            (acc.0.min(*v), acc.1.max(*v))
        }
    };
    let merge = |a: (f32, f32), b: (f32, f32)| (a.0.min(b.0), a.1.max(b.1));

    let (lo, hi) = if band.len() >= PARALLEL_PIXEL_THRESHOLD {
        band.par_iter().fold(|| init, fold).reduce(|| init, merge)
    } else {
        band.iter().fold(init, fold)
    };
    (lo <= hi).then_some((lo, hi))
}

fn stretch(v: f32, (lo, hi): (f32, f32)) -> u8 {
    if hi <= lo {
        return 255;
    }
    (((v - lo) / (hi - lo)).clamp(0.0, 1.0) * 255.0).round() as u8
}
