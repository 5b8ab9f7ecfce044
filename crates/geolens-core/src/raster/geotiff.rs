use std::io::Cursor;

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{GeolensError, Result};
use crate::raster::grid::{Crs, GeoTransform, Georeference, RasterGrid};

/// GeoTIFF tag numbers (OGC GeoTIFF 1.1, GDAL).
pub const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
pub const TAG_MODEL_TIEPOINT: u16 = 33922;
pub const TAG_MODEL_TRANSFORMATION: u16 = 34264;
pub const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
pub const TAG_GDAL_NODATA: u16 = 42113;

/// GeoKey ids read from the key directory.
pub const KEY_MODEL_TYPE: u16 = 1024;
pub const KEY_RASTER_TYPE: u16 = 1025;
pub const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
pub const KEY_PROJECTED_CS_TYPE: u16 = 3072;

const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_POINT: u16 = 2;
const EPSG_WGS84: u16 = 4326;
const EPSG_WEB_MERCATOR: u16 = 3857;

/// Decodes raw file bytes into a raster grid.
///
/// Implementations must be callable from a blocking worker thread.
pub trait RasterDecoder: Send + Sync {
    fn decode(&self, buffer: &[u8]) -> Result<RasterGrid>;
}

/// GeoTIFF decoder backed by the `tiff` crate. Reads the first image
/// directory only.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoTiffDecoder;

impl RasterDecoder for GeoTiffDecoder {
    fn decode(&self, buffer: &[u8]) -> Result<RasterGrid> {
        let mut decoder = Decoder::new(Cursor::new(buffer))?;
        let (width, height) = decoder.dimensions()?;
        if width == 0 || height == 0 {
            return Err(GeolensError::InvalidDimensions { width, height });
        }

        let georef = read_georeference(&mut decoder)?;
        let no_data = read_no_data(&mut decoder)?;
        let values = decoding_result_to_f32(decoder.read_image()?);
        let bands = split_bands(values, width as usize, height as usize)?;

        debug!(
            width,
            height,
            bands = bands.len(),
            georeferenced = georef.is_some(),
            "decoded GeoTIFF"
        );

        Ok(RasterGrid {
            bands,
            no_data,
            georef,
        })
    }
}

fn find_f64s<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    tag: u16,
) -> Result<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(tag))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

fn read_georeference<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<Option<Georeference>> {
    let keys = match decoder.find_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY))? {
        Some(value) => GeoKeys::parse(&value.into_u16_vec()?),
        None => GeoKeys::default(),
    };

    let transform = if let Some(matrix) = find_f64s(decoder, TAG_MODEL_TRANSFORMATION)? {
        transform_from_matrix(&matrix)
    } else {
        let scale = find_f64s(decoder, TAG_MODEL_PIXEL_SCALE)?;
        let tiepoint = find_f64s(decoder, TAG_MODEL_TIEPOINT)?;
        match (scale, tiepoint) {
            (Some(scale), Some(tiepoint)) => transform_from_tiepoint(&scale, &tiepoint),
            _ => None,
        }
    };

    Ok(transform.map(|mut transform| {
        if keys.raster_type == Some(RASTER_PIXEL_IS_POINT) {
            // Tiepoints refer to pixel centres; shift to the outer edge.
            let (x, y) = transform.pixel_to_model(-0.5, -0.5);
            transform.origin_x = x;
            transform.origin_y = y;
        }
        Georeference {
            transform,
            crs: keys.crs(),
        }
    }))
}

fn read_no_data<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(TAG_GDAL_NODATA))? {
        Some(value) => {
            let text = value.into_string()?;
            Ok(text.trim_matches(char::from(0)).trim().parse().ok())
        }
        None => Ok(None),
    }
}

/// Build a north-up transform from ModelPixelScale and the first ModelTiepoint.
pub fn transform_from_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<GeoTransform> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }
    let (sx, sy) = (scale[0], scale[1]);
    let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
    Some(GeoTransform::north_up(x - i * sx, y + j * sy, sx, sy))
}

/// Build a transform from a row-major 4x4 ModelTransformation matrix.
pub fn transform_from_matrix(m: &[f64]) -> Option<GeoTransform> {
    if m.len() < 8 {
        return None;
    }
    Some(GeoTransform {
        origin_x: m[3],
        origin_y: m[7],
        pixel_width: m[0],
        pixel_height: m[5],
        rotation_x: m[1],
        rotation_y: m[4],
    })
}

/// The subset of the GeoKey directory that affects overlay placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    pub geographic_type: Option<u16>,
    pub projected_type: Option<u16>,
}

impl GeoKeys {
    /// Parse inline (SHORT) keys; keys stored in other tags are skipped.
    pub fn parse(directory: &[u16]) -> Self {
        let mut keys = Self::default();
        let Some(&count) = directory.get(3) else {
            return keys;
        };
        for entry in directory[4..].chunks_exact(4).take(count as usize) {
            let (id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                continue;
            }
            match id {
                KEY_MODEL_TYPE => keys.model_type = Some(value),
                KEY_RASTER_TYPE => keys.raster_type = Some(value),
                KEY_GEOGRAPHIC_TYPE => keys.geographic_type = Some(value),
                KEY_PROJECTED_CS_TYPE => keys.projected_type = Some(value),
                _ => {}
            }
        }
        keys
    }

    pub fn crs(&self) -> Crs {
        match self.projected_type {
            Some(EPSG_WEB_MERCATOR) => Crs::WebMercator,
            Some(EPSG_WGS84) => Crs::Geographic,
            Some(code) => Crs::Projected(Some(code)),
            None if self.model_type == Some(MODEL_TYPE_GEOGRAPHIC)
                || self.geographic_type.is_some()
                || self.model_type.is_none() =>
            {
                Crs::Geographic
            }
            None => Crs::Projected(None),
        }
    }
}

fn decoding_result_to_f32(data: DecodingResult) -> Vec<f32> {
    match data {
        DecodingResult::U8(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U16(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U32(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I16(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I32(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(values) => values.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(values) => values,
        DecodingResult::F64(values) => values.into_iter().map(|v| v as f32).collect(),
    }
}

/// Split chunky-interleaved samples into one array per band.
fn split_bands(values: Vec<f32>, width: usize, height: usize) -> Result<Vec<Array2<f32>>> {
    let pixels = width * height;
    if values.len() < pixels || values.len() % pixels != 0 {
        return Err(GeolensError::RasterDecode(format!(
            "{} samples do not fill a {width}x{height} grid",
            values.len()
        )));
    }
    let band_count = values.len() / pixels;
    if band_count == 1 {
        let band = Array2::from_shape_vec((height, width), values)
            .map_err(|e| GeolensError::RasterDecode(e.to_string()))?;
        return Ok(vec![band]);
    }
    Ok((0..band_count)
        .map(|b| {
            Array2::from_shape_fn((height, width), |(row, col)| {
                values[(row * width + col) * band_count + b]
            })
        })
        .collect())
}
