use geolens_core::classify::DisplayMode;
use geolens_core::file::SelectedFile;
use geolens_core::preview::{RasterPreview, ZoomPreview};
use geolens_core::viewport::MapView;

const MAX_LOG_MESSAGES: usize = 200;

/// UI-level state: the current selection and the log.
#[derive(Default)]
pub struct UIState {
    pub selected: Option<SelectedFile>,
    /// Shown under the file name when the selection cannot be previewed.
    pub warning: Option<String>,
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            let excess = self.log_messages.len() - MAX_LOG_MESSAGES;
            self.log_messages.drain(..excess);
        }
    }

    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.selected.as_ref().map(SelectedFile::display_mode)
    }
}

/// Map preview of a GeoTIFF selection.
pub struct MapState {
    pub preview: RasterPreview<MapView>,
    /// Texture of the attached overlay, once it has been built.
    pub texture: Option<egui::TextureHandle>,
    pub loading: bool,
}

/// Zoom preview of a JPEG/PNG selection.
pub struct ImageState {
    pub preview: ZoomPreview<egui::TextureHandle>,
    /// Matches the `LoadImage` command whose result may fill this preview.
    pub generation: u64,
    pub loading: bool,
}

/// What the central viewport currently shows. Replacing the value drops the
/// previous preview, which tears down its map or releases its texture.
#[derive(Default)]
pub enum PreviewState {
    #[default]
    Empty,
    Raster(MapState),
    Image(ImageState),
}

impl PreviewState {
    pub fn is_loading(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Raster(map) => map.loading,
            Self::Image(image) => image.loading,
        }
    }
}
