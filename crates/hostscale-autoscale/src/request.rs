//! Scale request shapes.
//!
//! `ScaleConfig` is the loosely-typed payload exactly as a webhook caller
//! sends it. Numeric fields stay as raw JSON numbers so that `1.5` can be
//! rejected by validation (a bad request) rather than by decoding (an
//! internal failure). `ScalingRequest` is the typed, validated form the
//! scaler runs on; see [`crate::validate`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{ScaleError, ScaleResult};

/// Direction of a scaling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleAction {
    Up,
    Down,
}

impl ScaleAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(ScaleAction::Up),
            "down" => Some(ScaleAction::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScaleAction::Up => "up",
            ScaleAction::Down => "down",
        }
    }
}

impl std::fmt::Display for ScaleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which healthy hosts go first when scaling down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOption {
    /// Remove the newest hosts, keeping the oldest.
    MostRecent,
    /// Remove the oldest hosts, keeping the newest.
    LeastRecent,
}

impl DeleteOption {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mostRecent" => Some(DeleteOption::MostRecent),
            "leastRecent" => Some(DeleteOption::LeastRecent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeleteOption::MostRecent => "mostRecent",
            DeleteOption::LeastRecent => "leastRecent",
        }
    }
}

impl std::fmt::Display for DeleteOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw scale configuration as carried by a webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    /// Driver type stamped on by `convert_config`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub driver_type: String,
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(default)]
    pub host_template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    #[serde(default)]
    pub delete_option: String,
}

impl ScaleConfig {
    /// Decode a raw JSON config, reporting the first field that has the
    /// wrong JSON type. Unknown fields are ignored.
    pub fn from_value(value: &Value) -> ScaleResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ScaleError::Decode("config must be a JSON object".to_string()))?;

        Ok(Self {
            driver_type: field(map, "type")?.unwrap_or_default(),
            action: field(map, "action")?.unwrap_or_default(),
            amount: field(map, "amount")?,
            host_template_id: field(map, "hostTemplateId")?.unwrap_or_default(),
            min: field(map, "min")?,
            max: field(map, "max")?,
            delete_option: field(map, "deleteOption")?.unwrap_or_default(),
        })
    }
}

/// Decode one field; absent and `null` both read as `None`.
fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> ScaleResult<Option<T>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| ScaleError::Decode(format!("field `{key}`: {e}"))),
    }
}

/// Read a JSON number as an integer. Float encodings are accepted only
/// when they carry no fractional part (`2.0` but not `2.5`).
pub(crate) fn whole_number(value: Option<&Number>) -> Option<i64> {
    let n = value?;
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// A validated scale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingRequest {
    pub action: ScaleAction,
    pub amount: u64,
    pub host_template_id: String,
    pub min: u64,
    pub max: u64,
    /// Present exactly when `action` is `Down`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_option: Option<DeleteOption>,
}
