use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeolensError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Raster decode failed: {0}")]
    RasterDecode(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Overlay construction failed: {0}")]
    Overlay(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, GeolensError>;
