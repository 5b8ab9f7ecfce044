use std::sync::mpsc;
use std::sync::Arc;

use geolens_core::file::SelectedFile;
use geolens_core::preview::{load_image, prepare_overlay, LoadTicket};
use geolens_core::raster::{GeoTiffDecoder, OverlayOptions};
use geolens_core::upload::{drive, HttpAnalysisClient, SessionEvent, SessionId, UploadConfig};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::messages::{WorkerCommand, WorkerResult};

/// Tasks currently running on the worker runtime. At most one preview load
/// and one upload exist at a time.
#[derive(Default)]
struct InFlight {
    preview: Option<JoinHandle<()>>,
    upload: Option<JoinHandle<()>>,
}

impl InFlight {
    fn replace_preview(&mut self, task: JoinHandle<()>) {
        if let Some(old) = self.preview.replace(task) {
            old.abort();
        }
    }

    fn replace_upload(&mut self, task: Option<JoinHandle<()>>) {
        if let Some(old) = std::mem::replace(&mut self.upload, task) {
            old.abort();
        }
    }
}

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<UnboundedSender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = unbounded_channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("geolens-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn worker_loop(
    mut cmd_rx: UnboundedReceiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start worker runtime: {e}");
            send_log(&tx, &ctx, format!("ERROR: worker unavailable: {e}"));
            return;
        }
    };

    rt.block_on(async move {
        let mut tasks = InFlight::default();

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                WorkerCommand::LoadRaster {
                    ticket,
                    file,
                    options,
                } => {
                    let task = tokio::spawn(load_raster(ticket, file, options, tx.clone(), ctx.clone()));
                    tasks.replace_preview(task);
                }
                WorkerCommand::LoadImage { generation, file } => {
                    let task = tokio::spawn(load_zoom_image(generation, file, tx.clone(), ctx.clone()));
                    tasks.replace_preview(task);
                }
                WorkerCommand::Analyze {
                    id,
                    file,
                    endpoint,
                    upload,
                } => {
                    let task = tokio::spawn(analyze(id, file, endpoint, upload, tx.clone(), ctx.clone()));
                    tasks.replace_upload(Some(task));
                }
                WorkerCommand::CancelUpload => {
                    tasks.replace_upload(None);
                }
            }
        }
        debug!("worker command channel closed");
    });
}

async fn load_raster(
    ticket: LoadTicket,
    file: SelectedFile,
    options: OverlayOptions,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let overlay = prepare_overlay(&file, Arc::new(GeoTiffDecoder), options).await;
    send(&tx, &ctx, WorkerResult::RasterReady { ticket, overlay });
}

async fn load_zoom_image(
    generation: u64,
    file: SelectedFile,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let image = load_image(&file).await;
    send(&tx, &ctx, WorkerResult::ImageReady { generation, image });
}

async fn analyze(
    id: SessionId,
    file: SelectedFile,
    endpoint: String,
    upload: UploadConfig,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let client = match HttpAnalysisClient::new(endpoint, upload.timeout()) {
        Ok(client) => client,
        Err(e) => {
            let event = SessionEvent::Completed(Err(e));
            send(&tx, &ctx, WorkerResult::Upload { id, event });
            return;
        }
    };

    drive(&client, &file, upload.tick_period(), |event| {
        send(&tx, &ctx, WorkerResult::Upload { id, event });
    })
    .await;
}
