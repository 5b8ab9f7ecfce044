pub mod client;
pub mod session;

pub use client::{parse_response, AnalysisClient, AnalysisError, HttpAnalysisClient};
pub use session::{
    drive, NoOpReporter, ProgressReporter, SessionEvent, SessionId, SessionState, UploadConfig,
    UploadSession,
};
