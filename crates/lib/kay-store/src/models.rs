use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row keyed by column name.
pub type Row = Map<String, Value>;

/// Uniform success shape returned by every catalog entry.
///
/// Entry-specific fields (`total`, `vps_crons`, ...) live in `extra` and are
/// flattened next to `description` when serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            success: true,
            description: description.into(),
            data: Value::Null,
            note: None,
            metrics: None,
            extra: Map::new(),
        }
    }

    /// Builds an envelope whose extra fields are the members of `object`.
    ///
    /// Non-object values are stored under `data` instead.
    #[must_use]
    pub fn from_object(description: impl Into<String>, object: Value) -> Self {
        let envelope = Self::new(description);
        match object {
            Value::Object(extra) => Self { extra, ..envelope },
            other => envelope.with_data(other),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Map<String, Value>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Failure shape for a catalog key outside the closed set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnknownKey {
    pub success: bool,
    pub error: String,
    pub available: Vec<String>,
}

impl UnknownKey {
    pub fn new<'a>(
        kind: &str,
        name: &str,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            success: false,
            error: format!("Unknown {kind}: {name}"),
            available: available.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Result of a catalog lookup that reached the catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Outcome {
    Found(Envelope),
    Unknown(UnknownKey),
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl From<Envelope> for Outcome {
    fn from(envelope: Envelope) -> Self {
        Self::Found(envelope)
    }
}

impl From<UnknownKey> for Outcome {
    fn from(unknown: UnknownKey) -> Self {
        Self::Unknown(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_flattens_extra_fields() {
        let envelope = Envelope::new("stats")
            .with_data(json!([{"count": 1}]))
            .with_field("total", 1);

        let value = serde_json::to_value(&envelope).expect("envelope serializes");
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["total"], json!(1));
        assert!(value.get("note").is_none());
        assert!(value.get("metrics").is_none());
    }

    #[test]
    fn envelope_omits_null_data() {
        let envelope = Envelope::from_object("config", json!({"deployment": "VPS"}));

        let value = serde_json::to_value(&envelope).expect("envelope serializes");
        assert!(value.get("data").is_none());
        assert_eq!(value["deployment"], json!("VPS"));
    }

    #[test]
    fn unknown_key_serializes_as_failure() {
        let unknown = UnknownKey::new("entity", "bogus", ["a", "b"]);
        let value = serde_json::to_value(Outcome::from(unknown)).expect("outcome serializes");

        assert_eq!(
            value,
            json!({"success": false, "error": "Unknown entity: bogus", "available": ["a", "b"]})
        );
    }
}
