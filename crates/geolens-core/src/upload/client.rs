use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::analysis::AnalysisResult;
use crate::consts::{ANALYSIS_FAILED_MESSAGE, UPLOAD_FIELD_NAME};
use crate::error::GeolensError;
use crate::file::SelectedFile;

/// Why a submission produced no usable result.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}")]
    Status { status: u16, message: Option<String> },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("could not read file: {0}")]
    Read(#[from] GeolensError),
}

impl AnalysisError {
    /// Text shown as the sole content of the failure report.
    pub fn report_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Submits a file to the analysis service.
pub trait AnalysisClient: Send + Sync {
    fn submit(
        &self,
        file: &SelectedFile,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send;
}

/// Multipart `POST` to the analysis endpoint.
pub struct HttpAnalysisClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AnalysisClient for HttpAnalysisClient {
    async fn submit(&self, file: &SelectedFile) -> Result<AnalysisResult, AnalysisError> {
        let bytes = file.read_all().await?;
        debug!(
            file = file.name(),
            bytes = bytes.len(),
            endpoint = %self.endpoint,
            "submitting file for analysis"
        );

        let part = Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(file.content_type())?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        parse_response(status, &body)
    }
}

/// Interpret a service response.
///
/// A 2xx body must be a JSON object. Any other status is a failure; if its
/// body carries the service's `{"error": ...}` shape, that message is kept.
pub fn parse_response(status: u16, body: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    if (200..300).contains(&status) {
        return Ok(AnalysisResult::from_json(body)?);
    }
    let message = AnalysisResult::from_json(body)
        .ok()
        .and_then(|r| r.error_message().map(str::to_string));
    Err(AnalysisError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_is_parsed() {
        let r = parse_response(200, br#"{"classification": {"label": "Ship"}}"#).unwrap();
        assert_eq!(r.classification.unwrap().label.as_deref(), Some("Ship"));
    }

    #[test]
    fn non_json_success_is_malformed() {
        let err = parse_response(200, b"<html>").unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
        assert_eq!(err.report_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn array_success_is_malformed() {
        let bodies: [&[u8]; 2] = [b"[]", br#"["boom"]"#];
        for body in bodies {
            let err = parse_response(200, body).unwrap_err();
            assert!(matches!(err, AnalysisError::Malformed(_)));
            assert_eq!(err.report_message(), ANALYSIS_FAILED_MESSAGE);
        }
    }

    #[test]
    fn server_error_message_is_kept() {
        let err = parse_response(400, br#"{"error": "No selected file"}"#).unwrap_err();
        assert_eq!(err.report_message(), "No selected file");
    }

    #[test]
    fn bare_server_error_uses_generic_message() {
        let err = parse_response(502, b"Bad Gateway").unwrap_err();
        assert!(matches!(err, AnalysisError::Status { status: 502, message: None }));
        assert_eq!(err.report_message(), ANALYSIS_FAILED_MESSAGE);
    }
}
