/// File suffixes rendered as a georeferenced overlay on the map.
pub const RASTER_EXTENSIONS: &[&str] = &["tiff", "geotiff"];

/// File suffixes rendered as a static zoomable image.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Warning shown when a selected file is neither a raster nor an image.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Accepted formats: JPG, PNG, GeoTIFF";

/// Overlay opacity applied to decoded rasters.
pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.7;

/// Samples per tile edge when rasterizing an overlay.
pub const DEFAULT_OVERLAY_RESOLUTION: u32 = 256;

/// Pixel margin kept on every side when fitting the map to an overlay.
pub const DEFAULT_FIT_PADDING_PX: f64 = 20.0;

/// Zoom of the map view before any overlay has been applied.
pub const INITIAL_MAP_ZOOM: f64 = 1.0;

/// Wide world view used when an overlay has no usable bounds.
pub const FALLBACK_MAP_ZOOM: f64 = 2.0;

/// Zoom range of the bundled map viewport.
pub const MIN_MAP_ZOOM: f64 = 0.0;
pub const MAX_MAP_ZOOM: f64 = 18.0;

/// Edge length in pixels of one Web-Mercator tile at zoom 0.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Map viewport size assumed by headless callers (CLI).
pub const DEFAULT_VIEWPORT_SIZE: [f64; 2] = [800.0, 600.0];

/// Largest latitude representable in Web-Mercator.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_6;

/// WGS84 semi-major axis, used by EPSG:3857.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Image zoom bounds, in tenths (0.5 ..= 3.0).
pub const MIN_ZOOM_TENTHS: u8 = 5;
pub const MAX_ZOOM_TENTHS: u8 = 30;
pub const DEFAULT_ZOOM_TENTHS: u8 = 10;

/// Period of the simulated upload progress timer.
pub const DEFAULT_PROGRESS_TICK_MS: u64 = 500;

/// Progress added on every timer tick.
pub const DEFAULT_PROGRESS_STEP: u8 = 10;

/// Simulated progress never passes this value before the response arrives.
pub const DEFAULT_PROGRESS_CAP: u8 = 90;

/// Requests to the analysis service are abandoned after this long.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Endpoint of the remote analysis service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/upload";

/// Multipart field the analysis service reads the file from.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Report text used when the analysis request fails without a server message.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis Failed: Unable to process the file";

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
