//! Normalized resource records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region sentinel used by collectors of globally-scoped services.
pub const GLOBAL_REGION: &str = "global";

/// Provider-specific attribute value.
///
/// A closed set of scalar shapes so reports serialize and compare
/// predictably. Serialized untagged (plain JSON values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
}

impl core::fmt::Display for ExtraValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExtraValue::Bool(v) => write!(f, "{v}"),
            ExtraValue::Integer(v) => write!(f, "{v}"),
            ExtraValue::Float(v) => write!(f, "{v}"),
            ExtraValue::String(v) => f.write_str(v),
            ExtraValue::StringList(v) => f.write_str(&v.join(",")),
        }
    }
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ExtraValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ExtraValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<String>> for ExtraValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

/// One normalized cloud resource.
///
/// Produced by a collector for one region and never mutated afterwards.
/// `id` is unique within `(service, region)` only; global services report
/// [`GLOBAL_REGION`] as their region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub service: String,
    pub region: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Instance type, engine, runtime...
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// DB class, memory size, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, ExtraValue>,
}

impl ResourceRecord {
    pub fn new(service: impl Into<String>, region: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            id: id.into(),
            name: None,
            kind: None,
            state: None,
            class: None,
            created_at: None,
            tags: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// State, if the collector reported a non-empty one.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn json_uses_camel_case_and_omits_empty_fields() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = ResourceRecord::new("ec2", "us-east-1", "i-1234567890abcdef0")
            .with_name("web")
            .with_kind("t3.micro")
            .with_state("running")
            .with_created_at(created)
            .with_tag("Environment", "test")
            .with_extra("privateIp", "10.0.1.100");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "t3.micro");
        assert_eq!(json["createdAt"], "2024-03-01T12:00:00Z");
        assert_eq!(json["extra"]["privateIp"], "10.0.1.100");
        assert!(json.get("class").is_none());

        let back: ResourceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn extra_values_deserialize_to_narrowest_shape() {
        let extra: BTreeMap<String, ExtraValue> = serde_json::from_str(
            r#"{"a": true, "b": 128, "c": 0.5, "d": "x86_64", "e": ["arm64", "x86_64"]}"#,
        )
        .unwrap();

        assert_eq!(extra["a"], ExtraValue::Bool(true));
        assert_eq!(extra["b"], ExtraValue::Integer(128));
        assert_eq!(extra["c"], ExtraValue::Float(0.5));
        assert_eq!(extra["d"], ExtraValue::String("x86_64".into()));
        assert_eq!(extra["e"].to_string(), "arm64,x86_64");
    }

    #[test]
    fn empty_state_is_treated_as_absent() {
        let record = ResourceRecord::new("s3", GLOBAL_REGION, "bucket").with_state("");
        assert_eq!(record.state(), None);
    }
}
