#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use geolens_core::analysis::AnalysisResult;
use geolens_core::file::SelectedFile;
use geolens_core::geo::{LatLng, OverlayBounds};
use geolens_core::raster::Overlay;
use geolens_core::upload::{AnalysisClient, AnalysisError, ProgressReporter, SessionState};
use geolens_core::viewport::MapViewport;
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

pub const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
pub const TAG_MODEL_TIEPOINT: u16 = 33922;
pub const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
pub const TAG_GDAL_NODATA: u16 = 42113;

/// GeoKey directory: geographic model, pixel-is-area raster.
pub const GEOGRAPHIC_KEYS: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 2, 1025, 0, 1, 1];

/// GeoKey directory: geographic model, pixel-is-point raster.
pub const GEOGRAPHIC_POINT_KEYS: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 2, 1025, 0, 1, 2];

/// GeoKey directory: projected model in EPSG:3857.
pub const WEB_MERCATOR_KEYS: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 3857];

/// GeoKey directory: projected model in WGS84 / UTM zone 33N.
pub const UTM_33N_KEYS: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 32633];

/// GeoKey directory: projected model in RGF93 / Lambert-93, which has no
/// bundled projection definition.
pub const LAMBERT_93_KEYS: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 2154];

/// Georeferencing to embed in a synthetic GeoTIFF.
#[derive(Clone, Copy, Debug)]
pub struct GeoTags<'a> {
    /// Model coordinates of the top-left pixel corner.
    pub origin: (f64, f64),
    /// Pixel size in model units.
    pub pixel: (f64, f64),
    pub keys: &'a [u16],
    pub no_data: Option<&'a str>,
}

impl GeoTags<'static> {
    pub fn geographic(origin_lng: f64, origin_lat: f64, pixel_deg: f64) -> Self {
        Self {
            origin: (origin_lng, origin_lat),
            pixel: (pixel_deg, pixel_deg),
            keys: &GEOGRAPHIC_KEYS,
            no_data: None,
        }
    }
}

/// Single-band float32 values as a row-major ramp.
pub fn ramp(width: u32, height: u32) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}

/// Encode a single-band float32 GeoTIFF.
pub fn gray_geotiff(width: u32, height: u32, data: &[f32], geo: Option<GeoTags>) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder
            .new_image::<colortype::Gray32Float>(width, height)
            .unwrap();
        if let Some(geo) = geo {
            let dir = image.encoder();
            dir.write_tag(
                Tag::from_u16_exhaustive(TAG_MODEL_PIXEL_SCALE),
                &[geo.pixel.0, geo.pixel.1, 0.0][..],
            )
            .unwrap();
            dir.write_tag(
                Tag::from_u16_exhaustive(TAG_MODEL_TIEPOINT),
                &[0.0, 0.0, 0.0, geo.origin.0, geo.origin.1, 0.0][..],
            )
            .unwrap();
            dir.write_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY), geo.keys)
                .unwrap();
            if let Some(no_data) = geo.no_data {
                dir.write_tag(Tag::from_u16_exhaustive(TAG_GDAL_NODATA), no_data)
                    .unwrap();
            }
        }
        image.write_data(data).unwrap();
    }
    cursor.into_inner()
}

/// Encode a three-band 8-bit GeoTIFF in geographic coordinates.
pub fn rgb_geotiff(width: u32, height: u32, geo: GeoTags) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height * 3).map(|i| (i % 256) as u8).collect();
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder.new_image::<colortype::RGB8>(width, height).unwrap();
        let dir = image.encoder();
        dir.write_tag(
            Tag::from_u16_exhaustive(TAG_MODEL_PIXEL_SCALE),
            &[geo.pixel.0, geo.pixel.1, 0.0][..],
        )
        .unwrap();
        dir.write_tag(
            Tag::from_u16_exhaustive(TAG_MODEL_TIEPOINT),
            &[0.0, 0.0, 0.0, geo.origin.0, geo.origin.1, 0.0][..],
        )
        .unwrap();
        dir.write_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY), geo.keys)
            .unwrap();
        image.write_data(&data).unwrap();
    }
    cursor.into_inner()
}

/// A 20x10 geographic raster covering lng 10..12, lat 49..50.
pub fn sample_geotiff() -> Vec<u8> {
    gray_geotiff(20, 10, &ramp(20, 10), Some(GeoTags::geographic(10.0, 50.0, 0.1)))
}

/// A 20x10 raster of 30 m pixels in UTM 33N, its west edge on the zone's
/// central meridian (15°E) at about 49.65°N.
pub fn utm_geotiff() -> Vec<u8> {
    let geo = GeoTags {
        origin: (500_000.0, 5_500_000.0),
        pixel: (30.0, 30.0),
        keys: &UTM_33N_KEYS,
        no_data: None,
    };
    gray_geotiff(20, 10, &ramp(20, 10), Some(geo))
}

pub fn sample_bounds() -> OverlayBounds {
    OverlayBounds::new(LatLng::new(49.0, 10.0), LatLng::new(50.0, 12.0))
}

/// Write `bytes` to `name` inside a fresh temp directory. Keep the
/// `TempDir` alive for as long as the file is needed.
pub fn write_temp(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

/// Viewport that records every call, shared with the test through an `Arc`.
#[derive(Clone, Default)]
pub struct RecordingViewport {
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingViewport {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MapViewport for RecordingViewport {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("set_view {} {}", center, zoom));
    }

    fn fit_bounds(&mut self, _bounds: &OverlayBounds, padding_px: f64) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("fit_bounds {}", padding_px));
    }

    fn add_overlay(&mut self, _overlay: Overlay) {
        self.calls.lock().unwrap().push("add_overlay".into());
    }

    fn teardown(&mut self) {
        self.calls.lock().unwrap().push("teardown".into());
    }
}

type Respond = Box<dyn Fn() -> Result<AnalysisResult, AnalysisError> + Send + Sync>;

/// Analysis client that answers after a fixed delay.
pub struct MockClient {
    pub delay: Duration,
    respond: Respond,
}

impl MockClient {
    pub fn new(
        delay: Duration,
        respond: impl Fn() -> Result<AnalysisResult, AnalysisError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            delay,
            respond: Box::new(respond),
        }
    }

    pub fn ok(delay: Duration, body: &'static str) -> Self {
        Self::new(delay, move || {
            Ok(AnalysisResult::from_json(body.as_bytes()).unwrap())
        })
    }

    pub fn status(delay: Duration, status: u16) -> Self {
        Self::new(delay, move || {
            Err(AnalysisError::Status {
                status,
                message: None,
            })
        })
    }
}

impl AnalysisClient for MockClient {
    async fn submit(&self, _file: &SelectedFile) -> Result<AnalysisResult, AnalysisError> {
        tokio::time::sleep(self.delay).await;
        (self.respond)()
    }
}

/// Collects every progress value reported during a run.
#[derive(Default)]
pub struct RecordingReporter {
    pub progress: Mutex<Vec<u8>>,
    pub finished: Mutex<Option<SessionState>>,
}

impl RecordingReporter {
    pub fn values(&self) -> Vec<u8> {
        self.progress.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn progress(&self, percent: u8) {
        self.progress.lock().unwrap().push(percent);
    }

    fn finished(&self, state: SessionState) {
        *self.finished.lock().unwrap() = Some(state);
    }
}

pub fn image_file() -> SelectedFile {
    SelectedFile::from_bytes("harbor.png", vec![0x89u8, b'P', b'N', b'G'])
}
