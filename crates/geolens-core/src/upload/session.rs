use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::analysis::AnalysisResult;
use crate::consts::{
    DEFAULT_PROGRESS_CAP, DEFAULT_PROGRESS_STEP, DEFAULT_PROGRESS_TICK_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::error::{GeolensError, Result};
use crate::file::SelectedFile;

use super::client::{AnalysisClient, AnalysisError};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Identifies one submission. Events carrying an older id are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Uploading => write!(f, "Uploading"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Something that happened to an in-flight submission.
#[derive(Debug)]
pub enum SessionEvent {
    /// Progress timer fired.
    Tick,
    /// The submission finished, successfully or not.
    Completed(std::result::Result<AnalysisResult, AnalysisError>),
}

/// Timing of the simulated progress bar and the request timeout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub tick_ms: u64,
    pub step: u8,
    pub cap: u8,
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_PROGRESS_TICK_MS,
            step: DEFAULT_PROGRESS_STEP,
            cap: DEFAULT_PROGRESS_CAP,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl UploadConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(GeolensError::Config("upload.tick_ms must be positive".into()));
        }
        if self.cap >= 100 {
            return Err(GeolensError::Config(format!(
                "upload.cap {} must stay below 100",
                self.cap
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GeolensError::Config(
                "upload.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Receives progress updates from [`UploadSession::run`].
pub trait ProgressReporter: Send + Sync {
    /// A submission has started; progress is 0.
    fn started(&self, _file: &SelectedFile) {}

    /// Progress changed.
    fn progress(&self, _percent: u8) {}

    /// The session reached a terminal state.
    fn finished(&self, _state: SessionState) {}
}

pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// One analysis submission and its (simulated) progress.
///
/// Progress only moves while `Uploading` and never passes the configured
/// cap until the response arrives, at which point it becomes exactly 100.
#[derive(Debug)]
pub struct UploadSession {
    config: UploadConfig,
    state: SessionState,
    progress: u8,
    result: Option<AnalysisResult>,
    current: Option<SessionId>,
}

impl UploadSession {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            progress: 0,
            result: None,
            current: None,
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Result to show in the report, once the session is terminal.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.state == SessionState::Uploading
    }

    pub fn current_id(&self) -> Option<SessionId> {
        self.current
    }

    /// Whether a submission may start for `file`.
    pub fn can_begin(&self, file: Option<&SelectedFile>) -> bool {
        file.is_some() && !self.is_uploading()
    }

    /// Start a submission. Returns `None` without changing anything when no
    /// file is selected or a submission is already running.
    pub fn begin(&mut self, file: Option<&SelectedFile>) -> Option<SessionId> {
        let file = file.filter(|_| !self.is_uploading())?;
        let id = SessionId::next();
        self.state = SessionState::Uploading;
        self.progress = 0;
        self.result = None;
        self.current = Some(id);
        info!(file = file.name(), ?id, "upload started");
        Some(id)
    }

    /// Advance simulated progress by one step, saturating at the cap.
    pub fn tick(&mut self) -> u8 {
        if self.is_uploading() {
            self.progress = self
                .progress
                .saturating_add(self.config.step)
                .min(self.config.cap);
        }
        self.progress
    }

    /// Finish the submission. Ignored unless `Uploading`.
    pub fn complete(&mut self, outcome: std::result::Result<AnalysisResult, AnalysisError>) {
        if !self.is_uploading() {
            return;
        }
        self.progress = 100;
        self.current = None;
        match outcome {
            Ok(result) => {
                self.state = if result.is_error() {
                    SessionState::Failed
                } else {
                    SessionState::Succeeded
                };
                self.result = Some(result);
            }
            Err(e) => {
                error!("Upload failed: {e}");
                self.state = SessionState::Failed;
                self.result = Some(AnalysisResult::failed(e.report_message()));
            }
        }
        debug!(state = %self.state, "upload finished");
    }

    /// Apply an event produced for session `id`. Returns `false` if the
    /// event is stale.
    pub fn apply(&mut self, id: SessionId, event: SessionEvent) -> bool {
        if self.current != Some(id) {
            debug!(?id, "discarding stale upload event");
            return false;
        }
        match event {
            SessionEvent::Tick => {
                self.tick();
            }
            SessionEvent::Completed(outcome) => self.complete(outcome),
        }
        true
    }

    /// Replace the timing settings. Refused while uploading so a running
    /// submission keeps the settings it started with.
    pub fn reconfigure(&mut self, config: UploadConfig) -> bool {
        if self.is_uploading() {
            return false;
        }
        self.config = config;
        true
    }

    /// Close the report. The selected file is left alone.
    pub fn dismiss(&mut self) {
        if self.is_uploading() {
            return;
        }
        self.result = None;
        self.progress = 0;
        self.state = SessionState::Idle;
    }

    /// Abandon any in-flight submission; late events will be ignored.
    pub fn abort(&mut self) {
        if let Some(id) = self.current.take() {
            debug!(?id, "upload aborted");
        }
        self.result = None;
        self.progress = 0;
        self.state = SessionState::Idle;
    }

    /// Submit `file` and drive the session to a terminal state.
    ///
    /// Returns `None` if a submission could not start.
    pub async fn run<C>(
        &mut self,
        client: &C,
        file: &SelectedFile,
        reporter: &dyn ProgressReporter,
    ) -> Option<&AnalysisResult>
    where
        C: AnalysisClient + ?Sized,
    {
        let id = self.begin(Some(file))?;
        reporter.started(file);
        reporter.progress(self.progress);

        let period = self.config.tick_period();
        drive(client, file, period, |event| {
            if self.apply(id, event) {
                reporter.progress(self.progress);
            }
        })
        .await;

        reporter.finished(self.state);
        self.result.as_ref()
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new(UploadConfig::default())
    }
}

/// Race the submission against the progress timer on the current task.
///
/// Emits a `Tick` every `period` (first one after `period`) until the
/// submission finishes, then exactly one `Completed`. The timer is dropped
/// with this future, so cancelling it stops both.
pub async fn drive<C, F>(client: &C, file: &SelectedFile, period: Duration, mut on_event: F)
where
    C: AnalysisClient + ?Sized,
    F: FnMut(SessionEvent),
{
    let submission = client.submit(file);
    tokio::pin!(submission);

    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            outcome = &mut submission => {
                on_event(SessionEvent::Completed(outcome));
                return;
            }
            _ = ticker.tick() => on_event(SessionEvent::Tick),
        }
    }
}
