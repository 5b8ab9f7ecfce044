use serde::{Deserialize, Serialize};

use crate::consts::{EARTH_RADIUS_M, MAX_MERCATOR_LATITUDE};

/// A geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const ORIGIN: LatLng = LatLng { lat: 0.0, lng: 0.0 };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.5}, {:.5}]", self.lat, self.lng)
    }
}

/// Geographic rectangle of an overlay. Either corner may be undefined when the
/// source carries no usable georeferencing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayBounds {
    pub south_west: Option<LatLng>,
    pub north_east: Option<LatLng>,
}

impl OverlayBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west: Some(south_west),
            north_east: Some(north_east),
        }
    }

    /// Bounds with no defined corner.
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Smallest bounds containing every given point.
    pub fn from_points(points: &[LatLng]) -> Self {
        let Some(first) = points.first() else {
            return Self::undefined();
        };
        let (mut sw, mut ne) = (*first, *first);
        for p in &points[1..] {
            sw.lat = sw.lat.min(p.lat);
            sw.lng = sw.lng.min(p.lng);
            ne.lat = ne.lat.max(p.lat);
            ne.lng = ne.lng.max(p.lng);
        }
        Self::new(sw, ne)
    }

    /// Both corners defined, finite, in range, and ordered.
    pub fn is_valid(&self) -> bool {
        match self.corners() {
            Some((sw, ne)) => {
                sw.is_finite()
                    && ne.is_finite()
                    && sw.in_range()
                    && ne.in_range()
                    && sw.lat <= ne.lat
                    && sw.lng <= ne.lng
            }
            None => false,
        }
    }

    pub fn corners(&self) -> Option<(LatLng, LatLng)> {
        Some((self.south_west?, self.north_east?))
    }

    pub fn center(&self) -> Option<LatLng> {
        let (sw, ne) = self.corners()?;
        Some(LatLng::new((sw.lat + ne.lat) / 2.0, (sw.lng + ne.lng) / 2.0))
    }
}

impl std::fmt::Display for OverlayBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let corner = |c: Option<LatLng>| c.map(|c| c.to_string()).unwrap_or_else(|| "undefined".into());
        write!(
            f,
            "SW {} / NE {}",
            corner(self.south_west),
            corner(self.north_east)
        )
    }
}

/// Project a position to normalized Web-Mercator coordinates, both in [0, 1]
/// with the origin at the north-west corner of the world.
pub fn mercator_unit(p: LatLng) -> [f64; 2] {
    let lat = p.lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let y = 0.5 - (lat.tan() + 1.0 / lat.cos()).ln() / (2.0 * std::f64::consts::PI);
    [x, y]
}

/// Inverse of [`mercator_unit`].
pub fn mercator_unit_inverse(xy: [f64; 2]) -> LatLng {
    let lng = xy[0] * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * xy[1]);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Convert EPSG:3857 metres to a geographic position.
pub fn web_mercator_to_lat_lng(x: f64, y: f64) -> LatLng {
    let lng = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LatLng::new(lat, lng)
}
