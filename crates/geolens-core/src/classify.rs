use crate::consts::{IMAGE_EXTENSIONS, RASTER_EXTENSIONS};

/// How a selected file is previewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Georeferenced raster drawn over the map.
    RasterOverlay,
    /// Plain image with zoom controls.
    ZoomImage,
    /// No preview; the user is warned instead.
    Unsupported,
}

impl DisplayMode {
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RasterOverlay => write!(f, "Raster overlay"),
            Self::ZoomImage => write!(f, "Zoom image"),
            Self::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Lower-cased substring after the last `.`, or `None` when the name has no dot.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Classify a file by its name suffix.
pub fn classify(filename: &str) -> DisplayMode {
    match extension(filename) {
        Some(ext) if RASTER_EXTENSIONS.contains(&ext.as_str()) => DisplayMode::RasterOverlay,
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => DisplayMode::ZoomImage,
        _ => DisplayMode::Unsupported,
    }
}

/// Every accepted suffix, raster first. Used for file-picker filters.
pub fn accepted_extensions() -> Vec<&'static str> {
    RASTER_EXTENSIONS
        .iter()
        .chain(IMAGE_EXTENSIONS.iter())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_takes_last_segment() {
        assert_eq!(extension("scene.tar.GeoTIFF").as_deref(), Some("geotiff"));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension("trailing.").as_deref(), Some(""));
    }

    #[test]
    fn accepted_extensions_cover_both_sets() {
        assert_eq!(
            accepted_extensions(),
            vec!["tiff", "geotiff", "jpg", "jpeg", "png"]
        );
    }
}
