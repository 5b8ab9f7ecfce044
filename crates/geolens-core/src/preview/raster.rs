use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::Result;
use crate::file::SelectedFile;
use crate::geo::{LatLng, OverlayBounds};
use crate::raster::geotiff::RasterDecoder;
use crate::raster::overlay::{Overlay, OverlayOptions};
use crate::viewport::{apply_fit, resolve_fit, MapViewport, ViewportConfig, ViewportFit};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one raster load. Only the most recent ticket of a live preview
/// may apply its overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// What happened when a prepared overlay was applied.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewOutcome {
    /// Overlay attached and the viewport fit to its bounds.
    Fitted(OverlayBounds),
    /// Overlay attached but its bounds were unusable; world view shown.
    Fallback,
    /// Reading, decoding, or overlay construction failed. Viewport untouched.
    Failed(String),
    /// The load was superseded or the preview was torn down.
    Stale,
}

/// Read a file, decode it, and rasterize it into an overlay.
///
/// Decoding runs on the blocking pool. Nothing here touches a viewport, so
/// the result can be dropped safely if the preview has moved on.
pub async fn prepare_overlay<D>(
    file: &SelectedFile,
    decoder: Arc<D>,
    options: OverlayOptions,
) -> Result<Overlay>
where
    D: RasterDecoder + ?Sized + 'static,
{
    let buffer = file.read_all().await?;
    debug!(file = file.name(), bytes = buffer.len(), "read raster file");
    tokio::task::spawn_blocking(move || {
        let grid = decoder.decode(&buffer)?;
        Overlay::build(&grid, options)
    })
    .await?
}

/// Map preview for one selected raster file.
///
/// Owns its viewport. Dropping the preview tears the viewport down and
/// invalidates any load still in flight.
pub struct RasterPreview<V: MapViewport> {
    viewport: V,
    config: ViewportConfig,
    current: Option<LoadTicket>,
    torn_down: bool,
}

impl<V: MapViewport> RasterPreview<V> {
    /// Wrap `viewport`, centering it on the neutral starting view.
    pub fn new(mut viewport: V, config: ViewportConfig) -> Self {
        viewport.set_view(LatLng::ORIGIN, config.initial_zoom);
        Self {
            viewport,
            config,
            current: None,
            torn_down: false,
        }
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// Start a new load; any earlier ticket becomes stale.
    pub fn begin(&mut self) -> LoadTicket {
        let ticket = LoadTicket::next();
        self.current = Some(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.torn_down && self.current == Some(ticket)
    }

    /// Apply the result of [`prepare_overlay`] if `ticket` is still current.
    pub fn apply(&mut self, ticket: LoadTicket, prepared: Result<Overlay>) -> PreviewOutcome {
        if !self.is_current(ticket) {
            debug!(?ticket, "discarding stale raster load");
            return PreviewOutcome::Stale;
        }
        self.current = None;

        match prepared {
            Ok(overlay) => {
                overlay.attach_to(&mut self.viewport);
                let fit = resolve_fit(&overlay.bounds(), &self.config);
                apply_fit(&mut self.viewport, &fit);
                match fit {
                    ViewportFit::Fit { bounds, .. } => PreviewOutcome::Fitted(bounds),
                    ViewportFit::Fallback { .. } => PreviewOutcome::Fallback,
                }
            }
            Err(e) => {
                error!("Error loading GeoTIFF: {e}");
                PreviewOutcome::Failed(e.to_string())
            }
        }
    }

    /// Read, decode, and apply in one step.
    pub async fn load<D>(
        &mut self,
        file: &SelectedFile,
        decoder: Arc<D>,
        options: OverlayOptions,
    ) -> PreviewOutcome
    where
        D: RasterDecoder + ?Sized + 'static,
    {
        let ticket = self.begin();
        let prepared = prepare_overlay(file, decoder, options).await;
        self.apply(ticket, prepared)
    }

    /// Release the viewport and invalidate pending loads. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.current = None;
        self.viewport.teardown();
        self.torn_down = true;
        debug!("raster preview torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<V: MapViewport> Drop for RasterPreview<V> {
    fn drop(&mut self) {
        self.teardown();
    }
}
