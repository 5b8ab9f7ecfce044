pub mod raster;
pub mod zoom;

pub use raster::{prepare_overlay, LoadTicket, PreviewOutcome, RasterPreview};
pub use zoom::{load_image, ZoomFactor, ZoomPreview};
