use serde::de::{DeserializeOwned, Unexpected};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

/// Response of the remote analysis service.
///
/// Every section is optional. A section that is present but has an
/// unexpected shape is treated as absent rather than failing the whole
/// response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub file_info: Option<FileInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub caption: Option<Caption>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub classification: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub detections: Option<Detections>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub anomalies_detected: Option<Anomalies>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub naval_assessment: Option<NavalAssessment>,
}

impl AnalysisResult {
    /// A result carrying only an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// The service's error message. An empty message counts as no error.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.is_empty())
    }

    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }

    /// Parse a response body. The top level must be a JSON object.
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        match serde_json::from_slice::<Value>(body)? {
            object @ Value::Object(_) => serde_json::from_value(object),
            other => Err(serde::de::Error::invalid_type(
                unexpected(&other),
                &"a JSON object",
            )),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub filename: Option<String>,
    /// Width and height in pixels.
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<[u64; 2]>,
    #[serde(default, deserialize_with = "lenient")]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    /// Number or null, shown as given.
    #[serde(default)]
    pub object_count: Option<Value>,
    /// Free-form: the service sends either a number or a string like "85.0%".
    #[serde(default)]
    pub confidence: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
    /// Probability in [0, 1].
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Detections {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<DetectionSummary>,
}

/// Label → count, in the order the service listed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectionSummary(pub Vec<(String, u64)>);

impl DetectionSummary {
    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |total, (_, count)| total.saturating_add(*count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, u64); N]> for DetectionSummary {
    fn from(entries: [(&str, u64); N]) -> Self {
        Self(entries.iter().map(|(l, c)| (l.to_string(), *c)).collect())
    }
}

impl Serialize for DetectionSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DetectionSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        map.into_iter()
            .map(|(label, count)| match count.as_u64() {
                Some(c) => Ok((label, c)),
                None => Err(serde::de::Error::custom(format!(
                    "count for {label:?} is not a non-negative integer"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anomalies {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub anomalies_detected: Vec<String>,
    /// Reported count; not derived from the list.
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavalAssessment {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub recommendation: Option<String>,
}

/// Deserialize a field, turning null or a mistyped value into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("ignoring malformed analysis field: {e}");
            None
        }
    }))
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
