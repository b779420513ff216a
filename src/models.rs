use crate::range::RangeWindow;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 2;

/// One day of measurements. Fields other than `date` are kept verbatim so
/// unknown keys survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entry {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            fields: Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Present means the key exists and is not `null`.
    pub fn is_present(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(value) if !value.is_null())
    }

    /// Finite numeric value of a field; booleans read as 1/0.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn set_number(&mut self, key: &str, value: Option<f64>) {
        let value = value.map(json_number).unwrap_or(Value::Null);
        self.fields.insert(key.to_string(), value);
    }

    pub fn with_number(mut self, key: &str, value: f64) -> Self {
        self.set_number(key, Some(value));
        self
    }
}

/// Integral values are written as JSON integers so documents stay readable
/// by tools that wrote `3` rather than `3.0`.
pub fn json_number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        return Value::Number(Number::from(value as i64));
    }
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub created: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    pub fn new(created: impl Into<String>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            created: created.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub meta: Meta,
    pub entries: Vec<Entry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Database {
    pub fn empty(created: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(created),
            entries: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// One day of the entry form: what the page submits and what "fill from
/// latest" sends back.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    #[serde(default)]
    pub date: Option<String>,
    /// Raw strings as typed into the form, keyed by metric key.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// Metric keys whose privacy toggle is checked.
    #[serde(default)]
    pub hidden: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub metric: Option<String>,
    pub range: Option<RangeWindow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatus {
    pub connected: bool,
    pub direct_save: bool,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_keeps_unknown_fields() {
        let raw = json!({ "date": "2024-01-02", "moneyBank": 1200, "note": "hello" });
        let entry: Entry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.number("moneyBank"), Some(1200.0));
        assert_eq!(entry.get("note"), Some(&json!("hello")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn presence_and_numbers() {
        let entry: Entry = serde_json::from_value(json!({
            "date": "2024-01-02",
            "phoneHours": null,
            "gym": true,
            "classAvg": "n/a"
        }))
        .unwrap();
        assert!(!entry.is_present("phoneHours"));
        assert!(!entry.is_present("teeth"));
        assert!(entry.is_present("classAvg"));
        assert_eq!(entry.number("classAvg"), None);
        assert_eq!(entry.number("gym"), Some(1.0));
    }

    #[test]
    fn integral_numbers_serialise_as_integers() {
        assert_eq!(json_number(3.0), json!(3));
        assert_eq!(json_number(2.5), json!(2.5));
        assert_eq!(json_number(f64::NAN), Value::Null);
    }

    #[test]
    fn meta_version_defaults_to_first_schema() {
        let meta: Meta = serde_json::from_value(json!({ "created": "2024-01-01" })).unwrap();
        assert_eq!(meta.version, 1);
    }
}
