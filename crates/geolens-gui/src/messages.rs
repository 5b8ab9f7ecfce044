use std::path::PathBuf;

use geolens_core::config::AppConfig;
use geolens_core::error::Result;
use geolens_core::file::SelectedFile;
use geolens_core::preview::LoadTicket;
use geolens_core::raster::{Overlay, OverlayOptions};
use geolens_core::upload::{SessionEvent, SessionId, UploadConfig};
use image::RgbaImage;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Decode a GeoTIFF and rasterize its overlay. Replaces any preview load.
    LoadRaster {
        ticket: LoadTicket,
        file: SelectedFile,
        options: OverlayOptions,
    },

    /// Decode a JPEG/PNG for the zoom preview. Replaces any preview load.
    LoadImage { generation: u64, file: SelectedFile },

    /// Submit a file to the analysis service. Replaces any running upload.
    Analyze {
        id: SessionId,
        file: SelectedFile,
        endpoint: String,
        upload: UploadConfig,
    },

    /// Abort the running upload, if any.
    CancelUpload,
}

/// Results sent back to the UI thread.
pub enum WorkerResult {
    /// The user picked a file in the open dialog.
    FileSelected { path: PathBuf },

    RasterReady {
        ticket: LoadTicket,
        overlay: Result<Overlay>,
    },

    ImageReady {
        generation: u64,
        image: Result<RgbaImage>,
    },

    /// Progress tick or completion of upload `id`.
    Upload { id: SessionId, event: SessionEvent },

    ConfigImported { config: AppConfig },

    Log { message: String },
}
