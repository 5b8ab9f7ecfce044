use ndarray::Array2;

use crate::geo::{web_mercator_to_lat_lng, LatLng, OverlayBounds};
use crate::raster::projection::Reprojector;

/// Coordinate reference system of a raster's model space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crs {
    /// Longitude/latitude degrees (EPSG:4326 or any geographic model).
    Geographic,
    /// Spherical Web-Mercator metres (EPSG:3857).
    WebMercator,
    /// Any other projected system, identified by EPSG code when known.
    Projected(Option<u16>),
}

/// Affine mapping from pixel (col, row) to model coordinates.
///
/// `x = origin_x + col * pixel_width + row * rotation_x`
/// `y = origin_y + col * rotation_y + row * pixel_height`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
}

impl GeoTransform {
    /// North-up transform from an upper-left origin and pixel size.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height: -pixel_height.abs(),
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }

    pub fn pixel_to_model(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.rotation_x;
        let y = self.origin_y + col * self.rotation_y + row * self.pixel_height;
        (x, y)
    }
}

/// Georeferencing attached to a decoded raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Georeference {
    pub transform: GeoTransform,
    pub crs: Crs,
}

/// A decoded raster: one `(height, width)` array per band.
#[derive(Clone, Debug)]
pub struct RasterGrid {
    pub bands: Vec<Array2<f32>>,
    pub no_data: Option<f64>,
    pub georef: Option<Georeference>,
}

impl RasterGrid {
    pub fn width(&self) -> usize {
        self.bands.first().map(|b| b.ncols()).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.bands.first().map(|b| b.nrows()).unwrap_or(0)
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn is_no_data(&self, value: f32) -> bool {
        match self.no_data {
            Some(nd) => value.is_nan() || (value as f64 - nd).abs() < 1e-6,
            None => value.is_nan(),
        }
    }

    /// Geographic bounds of the grid's outer pixel edges.
    ///
    /// Without georeferencing both corners are undefined. Projected rasters
    /// with a known EPSG code are reprojected to WGS84; if a corner cannot be
    /// reprojected the bounds are undefined. Rasters in an unrecognized
    /// projected CRS keep their raw model coordinates, which normally fail
    /// [`OverlayBounds::is_valid`].
    pub fn bounds(&self) -> OverlayBounds {
        let Some(georef) = self.georef else {
            return OverlayBounds::undefined();
        };
        let (w, h) = (self.width() as f64, self.height() as f64);
        let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];
        let model = corners.map(|(col, row)| georef.transform.pixel_to_model(col, row));

        let points: Option<Vec<LatLng>> = match georef.crs {
            Crs::Geographic => Some(model.iter().map(|&(x, y)| LatLng::new(y, x)).collect()),
            Crs::WebMercator => Some(
                model
                    .iter()
                    .map(|&(x, y)| web_mercator_to_lat_lng(x, y))
                    .collect(),
            ),
            Crs::Projected(code) => match code.and_then(Reprojector::for_epsg) {
                Some(reprojector) => model
                    .iter()
                    .map(|&(x, y)| reprojector.to_lat_lng(x, y))
                    .collect(),
                None => Some(model.iter().map(|&(x, y)| LatLng::new(y, x)).collect()),
            },
        };
        match points {
            Some(points) => OverlayBounds::from_points(&points),
            None => OverlayBounds::undefined(),
        }
    }
}
