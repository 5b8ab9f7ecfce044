use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classify::{classify, extension, DisplayMode};
use crate::error::{GeolensError, Result};

/// Where the bytes of a selected file live.
#[derive(Clone, Debug)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file chosen by the user. Never mutated; a new selection replaces it.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    source: FileSource,
}

impl SelectedFile {
    /// Select a file on disk. The name is the final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                GeolensError::UnsupportedFileType(format!("{} has no file name", path.display()))
            })?;
        Ok(Self {
            content_type: content_type_for(&name).to_string(),
            name,
            source: FileSource::Path(path),
        })
    }

    /// Select an in-memory blob under the given name.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        Self {
            content_type: content_type_for(&name).to_string(),
            name,
            source: FileSource::Memory(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(p) => Some(p),
            FileSource::Memory(_) => None,
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        classify(&self.name)
    }

    /// Read the full contents. Suspends on disk I/O for path-backed files.
    pub async fn read_all(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => Ok(tokio::fs::read(path).await?),
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Declared MIME type for a file name, derived from its suffix.
pub fn content_type_for(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("tiff" | "geotiff" | "tif") => "image/tiff",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_suffix() {
        assert_eq!(content_type_for("a.GEOTIFF"), "image/tiff");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.bmp"), "application/octet-stream");
    }

    #[test]
    fn from_path_uses_file_name() {
        let file = SelectedFile::from_path("/tmp/data/harbor.TIFF").unwrap();
        assert_eq!(file.name(), "harbor.TIFF");
        assert_eq!(file.display_mode(), DisplayMode::RasterOverlay);
        assert!(file.path().is_some());
    }

    #[test]
    fn from_path_rejects_root() {
        assert!(SelectedFile::from_path("/").is_err());
    }
}
