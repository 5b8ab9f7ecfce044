use geolens_core::analysis::AnalysisResult;
use geolens_core::report::{render, ReportLine, ReportView, SectionKind, REPORT_TITLE};

fn parse(json: &str) -> AnalysisResult {
    AnalysisResult::from_json(json.as_bytes()).unwrap()
}

fn field(label: &str, value: &str) -> ReportLine {
    ReportLine::Field {
        label: label.into(),
        value: value.into(),
    }
}

const FULL: &str = r#"{
    "file_info": {"filename": "harbor.png", "size": [1024, 768], "format": "PNG"},
    "caption": {"text": "ships docked at a pier", "object_count": 5, "confidence": "85.0%"},
    "classification": {"label": "Cargo Ship", "confidence": 0.8742},
    "detections": {"objects_detected": [], "summary": {"ship": 3, "boat": 2}},
    "anomalies_detected": {"anomalies_detected": ["Unusual pattern detected"], "count": 1},
    "naval_assessment": {"status": "Alert", "priority": "Medium", "recommendation": "Monitor"}
}"#;

#[test]
fn test_sections_in_display_order() {
    let view = render(&parse(FULL));
    let kinds: Vec<SectionKind> = view.sections().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::File,
            SectionKind::Caption,
            SectionKind::Classification,
            SectionKind::Detections,
            SectionKind::Anomalies,
            SectionKind::NavalAssessment,
        ]
    );
}

#[test]
fn test_detection_total_and_capitalized_labels() {
    let view = render(&parse(FULL));
    let detections = view.section(SectionKind::Detections).unwrap();
    assert_eq!(
        detections.lines,
        vec![
            ReportLine::Item("Ship: 3".into()),
            ReportLine::Item("Boat: 2".into()),
            field("Total Detected Objects", "5"),
        ]
    );
}

#[test]
fn test_error_only_result_has_single_line() {
    let view = render(&parse(r#"{"error": "Analysis Failed: Unable to process the file"}"#));
    assert!(view.is_error());
    assert!(view.sections().is_empty());
    assert_eq!(
        view.to_lines(),
        vec!["Analysis Failed: Unable to process the file".to_string()]
    );
}

#[test]
fn test_error_hides_other_sections() {
    let view = render(&parse(
        r#"{"error": "boom", "classification": {"label": "Ship", "confidence": 0.5}}"#,
    ));
    assert_eq!(view, ReportView::Error("boom".into()));
}

#[test]
fn test_empty_error_renders_sections() {
    let view = render(&parse(
        r#"{"error": "", "classification": {"label": "Ship", "confidence": 0.5}}"#,
    ));
    assert!(!view.is_error());
    let section = view.section(SectionKind::Classification).unwrap();
    assert_eq!(section.lines[1], field("Confidence", "50.0%"));
}

#[test]
fn test_classification_confidence_formatting() {
    let view = render(&parse(FULL));
    let section = view.section(SectionKind::Classification).unwrap();
    assert_eq!(
        section.lines,
        vec![
            field("Classification", "Cargo Ship"),
            field("Confidence", "87.4%"),
        ]
    );
}

#[test]
fn test_caption_defaults() {
    let view = render(&parse(r#"{"caption": {}}"#));
    let section = view.section(SectionKind::Caption).unwrap();
    assert_eq!(
        section.lines,
        vec![
            field("Caption", "No caption available"),
            field("Object Count", "N/A"),
            field("Confidence", "N/A"),
        ]
    );
}

#[test]
fn test_caption_confidence_is_verbatim() {
    let view = render(&parse(FULL));
    let section = view.section(SectionKind::Caption).unwrap();
    assert!(section.lines.contains(&field("Confidence", "85.0%")));
    assert!(section.lines.contains(&field("Object Count", "5")));
}

#[test]
fn test_anomaly_count_is_not_recomputed() {
    let view = render(&parse(
        r#"{"anomalies_detected": {"anomalies_detected": ["a", "b"], "count": 7}}"#,
    ));
    let section = view.section(SectionKind::Anomalies).unwrap();
    assert_eq!(section.lines.last(), Some(&field("Total Anomalies", "7")));
    assert_eq!(section.lines.len(), 3);
}

#[test]
fn test_missing_naval_fields_are_na() {
    let view = render(&parse(r#"{"naval_assessment": {"status": "Normal"}}"#));
    let section = view.section(SectionKind::NavalAssessment).unwrap();
    assert_eq!(
        section.lines,
        vec![
            field("Status", "Normal"),
            field("Priority", "N/A"),
            field("Recommendation", "N/A"),
        ]
    );
}

#[test]
fn test_file_size_format() {
    let view = render(&parse(FULL));
    let section = view.section(SectionKind::File).unwrap();
    assert_eq!(section.lines[1], field("Size", "1024x768"));
}

#[test]
fn test_absent_sections_are_skipped() {
    let view = render(&parse(r#"{"classification": {"label": "Ship"}}"#));
    assert_eq!(view.sections().len(), 1);
    assert!(view.section(SectionKind::Detections).is_none());
}

#[test]
fn test_display_starts_with_title() {
    let text = render(&parse(FULL)).to_string();
    assert!(text.starts_with(REPORT_TITLE));
    assert!(text.contains("Object Detection Summary:"));
    assert!(text.contains("  Total Detected Objects: 5"));
}
