use proj4rs::Proj;
use tracing::{debug, warn};

use crate::geo::LatLng;

const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// ETRS89 / LAEA Europe.
const EPSG_ETRS89_LAEA: u16 = 3035;

/// proj definition for a projected EPSG code, when the code is known.
///
/// Covers WGS84 / UTM (32601..=32660 north, 32701..=32760 south) and
/// ETRS89 / LAEA Europe.
pub fn proj_definition(epsg: u16) -> Option<String> {
    match epsg {
        32601..=32660 => Some(format!(
            "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs",
            epsg - 32600
        )),
        32701..=32760 => Some(format!(
            "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
            epsg - 32700
        )),
        EPSG_ETRS89_LAEA => Some(
            "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs"
                .to_string(),
        ),
        _ => None,
    }
}

/// Inverse projection from a projected CRS to WGS84 degrees.
pub struct Reprojector {
    source: Proj,
    wgs84: Proj,
}

impl Reprojector {
    /// `None` when the code is unknown or its definition is rejected.
    pub fn for_epsg(epsg: u16) -> Option<Self> {
        let definition = proj_definition(epsg)?;
        let source = match Proj::from_proj_string(&definition) {
            Ok(proj) => proj,
            Err(e) => {
                warn!(epsg, "Failed to create projection: {e:?}");
                return None;
            }
        };
        let wgs84 = Proj::from_proj_string(WGS84_LONGLAT).ok()?;
        debug!(epsg, "reprojecting raster bounds to WGS84");
        Some(Self { source, wgs84 })
    }

    /// Geographic position of model coordinates `(x, y)` in metres.
    pub fn to_lat_lng(&self, x: f64, y: f64) -> Option<LatLng> {
        let mut point = (x, y, 0.0);
        proj4rs::transform::transform(&self.source, &self.wgs84, &mut point).ok()?;
        let p = LatLng::new(point.1.to_degrees(), point.0.to_degrees());
        p.is_finite().then_some(p)
    }
}
