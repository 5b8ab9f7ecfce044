use image::RgbaImage;
use tracing::debug;

use crate::consts::{DEFAULT_ZOOM_TENTHS, MAX_ZOOM_TENTHS, MIN_ZOOM_TENTHS};
use crate::error::Result;
use crate::file::SelectedFile;

/// Image zoom in tenths, always within 0.5 ..= 3.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomFactor(u8);

impl ZoomFactor {
    pub const MIN: ZoomFactor = ZoomFactor(MIN_ZOOM_TENTHS);
    pub const MAX: ZoomFactor = ZoomFactor(MAX_ZOOM_TENTHS);
    pub const DEFAULT: ZoomFactor = ZoomFactor(DEFAULT_ZOOM_TENTHS);

    pub fn from_tenths(tenths: u8) -> Self {
        Self(tenths.clamp(MIN_ZOOM_TENTHS, MAX_ZOOM_TENTHS))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    /// Scale to apply to the rendered image.
    pub fn value(self) -> f32 {
        self.0 as f32 / 10.0
    }

    pub fn zoomed_in(self) -> Self {
        Self::from_tenths(self.0.saturating_add(1))
    }

    pub fn zoomed_out(self) -> Self {
        Self::from_tenths(self.0.saturating_sub(1))
    }
}

impl Default for ZoomFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for ZoomFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0 as u32 * 10)
    }
}

/// Zoomable preview of a plain image.
///
/// `T` is whatever handle keeps the displayed image alive (a GPU texture,
/// a decoded buffer). Replacing or clearing the image drops the old handle.
pub struct ZoomPreview<T> {
    factor: ZoomFactor,
    image: Option<T>,
}

impl<T> ZoomPreview<T> {
    pub fn new() -> Self {
        Self {
            factor: ZoomFactor::DEFAULT,
            image: None,
        }
    }

    pub fn factor(&self) -> ZoomFactor {
        self.factor
    }

    pub fn zoom_in(&mut self) -> ZoomFactor {
        self.factor = self.factor.zoomed_in();
        self.factor
    }

    pub fn zoom_out(&mut self) -> ZoomFactor {
        self.factor = self.factor.zoomed_out();
        self.factor
    }

    pub fn image(&self) -> Option<&T> {
        self.image.as_ref()
    }

    /// Show a newly selected file: zoom returns to 1.0 and the previous
    /// image is released.
    pub fn select(&mut self, image: T) {
        self.factor = ZoomFactor::DEFAULT;
        self.image = Some(image);
    }

    /// Release the image and reset zoom.
    pub fn clear(&mut self) {
        self.factor = ZoomFactor::DEFAULT;
        self.image = None;
    }
}

impl<T> Default for ZoomPreview<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and decode a JPEG or PNG for display. Decoding runs on the
/// blocking pool.
pub async fn load_image(file: &SelectedFile) -> Result<RgbaImage> {
    let bytes = file.read_all().await?;
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await??
        .to_rgba8();
    debug!(file = file.name(), width = image.width(), height = image.height(), "decoded image");
    Ok(image)
}
