pub mod geotiff;
pub mod grid;
pub mod overlay;
pub mod projection;

pub use geotiff::{GeoTiffDecoder, RasterDecoder};
pub use grid::{Crs, GeoTransform, Georeference, RasterGrid};
pub use overlay::{Overlay, OverlayOptions};
pub use projection::Reprojector;
