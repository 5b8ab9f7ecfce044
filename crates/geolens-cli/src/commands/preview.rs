use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use geolens_core::classify::DisplayMode;
use geolens_core::consts::UNSUPPORTED_FORMAT_MESSAGE;
use geolens_core::file::SelectedFile;
use geolens_core::preview::{load_image, prepare_overlay, RasterPreview, ZoomFactor};
use geolens_core::raster::GeoTiffDecoder;
use geolens_core::viewport::MapView;

use crate::summary::{print_overlay_summary, print_warning, OverlaySummary};

#[derive(Args)]
pub struct PreviewArgs {
    /// GeoTIFF, JPEG or PNG file
    pub file: PathBuf,

    /// Map viewport width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Map viewport height in pixels
    #[arg(long)]
    pub height: Option<f64>,

    /// Overlay opacity (0.0-1.0)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the rendered overlay as PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(opacity) = args.opacity {
        config.overlay.opacity = opacity;
    }
    config.overlay.validate()?;

    let file = SelectedFile::from_path(&args.file)?;
    let rt = super::runtime()?;

    match file.display_mode() {
        DisplayMode::RasterOverlay => {
            let size = [
                args.width.unwrap_or(config.viewport.size_px[0]),
                args.height.unwrap_or(config.viewport.size_px[1]),
            ];
            let mut preview = RasterPreview::new(MapView::new(size), config.viewport);
            let ticket = preview.begin();
            let prepared = rt.block_on(prepare_overlay(
                &file,
                Arc::new(GeoTiffDecoder),
                config.overlay,
            ));
            let overlay = match prepared {
                Ok(overlay) => overlay,
                Err(e) => bail!("Error loading GeoTIFF: {e}"),
            };

            if let Some(ref path) = args.output {
                overlay
                    .image()
                    .save(path)
                    .with_context(|| format!("Failed to write overlay to {}", path.display()))?;
            }

            let bounds = overlay.bounds();
            let summary = OverlaySummary {
                file: file.name(),
                source_size: overlay.source_size(),
                image_size: overlay.image().dimensions(),
                band_count: overlay.band_count(),
                opacity: overlay.options().opacity,
                bounds,
            };
            let outcome = preview.apply(ticket, Ok(overlay));
            print_overlay_summary(&summary, &outcome, preview.viewport());

            if let Some(ref path) = args.output {
                println!("\nOverlay saved to {}", path.display());
            }
        }
        DisplayMode::ZoomImage => {
            let image = rt
                .block_on(load_image(&file))
                .with_context(|| format!("Failed to decode {}", file.name()))?;
            println!("File:        {}", file.name());
            println!("Preview:     {}", DisplayMode::ZoomImage);
            println!("Dimensions:  {}x{}", image.width(), image.height());
            println!(
                "Zoom:        {} ({} - {})",
                ZoomFactor::DEFAULT,
                ZoomFactor::MIN,
                ZoomFactor::MAX
            );
        }
        DisplayMode::Unsupported => {
            print_warning(UNSUPPORTED_FORMAT_MESSAGE);
        }
    }

    Ok(())
}
