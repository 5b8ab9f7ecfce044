//! Text projection of an [`AnalysisResult`] into report sections.

use serde_json::Value;

use crate::analysis::{
    AnalysisResult, Anomalies, Caption, Classification, DetectionSummary, FileInfo,
    NavalAssessment,
};

pub const REPORT_TITLE: &str = "Mission Log: Intelligence Report";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_CAPTION: &str = "No caption available";

/// Rendered report.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportView {
    /// The analysis failed; nothing else is shown.
    Error(String),
    /// One entry per section present in the result, in display order.
    Sections(Vec<ReportSection>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub lines: Vec<ReportLine>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    File,
    Caption,
    Classification,
    Detections,
    Anomalies,
    NavalAssessment,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Caption => "Caption",
            Self::Classification => "Classification",
            Self::Detections => "Object Detection Summary",
            Self::Anomalies => "Anomaly Detection",
            Self::NavalAssessment => "Naval Assessment",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportLine {
    /// `label: value`
    Field { label: String, value: String },
    /// Bulleted list entry.
    Item(String),
}

impl ReportLine {
    fn field(label: &str, value: impl Into<String>) -> Self {
        Self::Field {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for ReportLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field { label, value } => write!(f, "{label}: {value}"),
            Self::Item(text) => write!(f, "\u{2022} {text}"),
        }
    }
}

/// Project a result into a report. Sections absent from the result produce
/// no output; an error suppresses everything else.
pub fn render(result: &AnalysisResult) -> ReportView {
    if let Some(message) = result.error_message() {
        return ReportView::Error(message.to_string());
    }

    let sections = [
        result.file_info.as_ref().map(file_section),
        result.caption.as_ref().map(caption_section),
        result.classification.as_ref().map(classification_section),
        result
            .detections
            .as_ref()
            .and_then(|d| d.summary.as_ref())
            .map(detections_section),
        result.anomalies_detected.as_ref().map(anomalies_section),
        result.naval_assessment.as_ref().map(naval_section),
    ];
    ReportView::Sections(sections.into_iter().flatten().collect())
}

impl ReportView {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn sections(&self) -> &[ReportSection] {
        match self {
            Self::Error(_) => &[],
            Self::Sections(s) => s,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections().iter().find(|s| s.kind == kind)
    }

    /// Report body as plain text lines, without the title.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Self::Error(message) => vec![message.clone()],
            Self::Sections(sections) => sections
                .iter()
                .flat_map(|s| {
                    std::iter::once(format!("{}:", s.kind.title()))
                        .chain(s.lines.iter().map(|l| format!("  {l}")))
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for ReportView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{REPORT_TITLE}")?;
        for line in self.to_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Upper-case the first character of `label`.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a [0, 1] probability as a percentage with one decimal.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) => format!("{:.1}%", c * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn file_section(info: &FileInfo) -> ReportSection {
    let size = info
        .size
        .map(|[w, h]| format!("{w}x{h}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    ReportSection {
        kind: SectionKind::File,
        lines: vec![
            ReportLine::field("File", or_na(info.filename.as_deref())),
            ReportLine::field("Size", size),
            ReportLine::field("Format", or_na(info.format.as_deref())),
        ],
    }
}

fn caption_section(caption: &Caption) -> ReportSection {
    let text = caption
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_CAPTION);
    ReportSection {
        kind: SectionKind::Caption,
        lines: vec![
            ReportLine::field("Caption", text),
            ReportLine::field("Object Count", value_text(caption.object_count.as_ref())),
            ReportLine::field("Confidence", value_text(caption.confidence.as_ref())),
        ],
    }
}

fn classification_section(classification: &Classification) -> ReportSection {
    ReportSection {
        kind: SectionKind::Classification,
        lines: vec![
            ReportLine::field("Classification", or_na(classification.label.as_deref())),
            ReportLine::field("Confidence", format_confidence(classification.confidence)),
        ],
    }
}

fn detections_section(summary: &DetectionSummary) -> ReportSection {
    let mut lines: Vec<ReportLine> = summary
        .entries()
        .iter()
        .map(|(label, count)| ReportLine::Item(format!("{}: {count}", capitalize(label))))
        .collect();
    lines.push(ReportLine::field(
        "Total Detected Objects",
        summary.total().to_string(),
    ));
    ReportSection {
        kind: SectionKind::Detections,
        lines,
    }
}

fn anomalies_section(anomalies: &Anomalies) -> ReportSection {
    let mut lines: Vec<ReportLine> = anomalies
        .anomalies_detected
        .iter()
        .map(|a| ReportLine::Item(a.clone()))
        .collect();
    let count = anomalies
        .count
        .map(|c| c.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    lines.push(ReportLine::field("Total Anomalies", count));
    ReportSection {
        kind: SectionKind::Anomalies,
        lines,
    }
}

fn naval_section(naval: &NavalAssessment) -> ReportSection {
    ReportSection {
        kind: SectionKind::NavalAssessment,
        lines: vec![
            ReportLine::field("Status", or_na(naval.status.as_deref())),
            ReportLine::field("Priority", or_na(naval.priority.as_deref())),
            ReportLine::field("Recommendation", or_na(naval.recommendation.as_deref())),
        ],
    }
}
