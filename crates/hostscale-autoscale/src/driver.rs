//! Webhook drivers — pluggable actions selected by a driver-type string.
//!
//! A driver validates and executes a raw JSON config and reports the
//! result as an HTTP-style status plus an optional error message. The
//! [`DriverRegistry`] maps driver names to drivers; the scaling driver is
//! registered as [`SCALE_BY_HOST_TEMPLATE_ID`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{ScaleError, ScaleResult};
use crate::request::ScaleConfig;
use crate::scaler::GroupScaler;
use crate::validate::validate;

/// Name of the host-template scaling driver.
pub const SCALE_BY_HOST_TEMPLATE_ID: &str = "scaleByHostTemplateID";

/// Caller-facing result of a driver call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverOutcome {
    /// 200 accepted, 400 bad request, 500 internal.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl DriverOutcome {
    pub fn ok() -> Self {
        Self {
            status: 200,
            error: None,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn from_error(err: &ScaleError) -> Self {
        Self {
            status: err.status_code(),
            error: Some(err.to_string()),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// 200 carrying `data`, or 500 when it cannot be encoded.
fn data_outcome<T: Serialize>(data: &T) -> DriverOutcome {
    match serde_json::to_value(data) {
        Ok(value) => DriverOutcome::ok().with_data(value),
        Err(e) => {
            let err = ScaleError::Encode(e.to_string());
            warn!(error = %err, "driver result not encodable");
            DriverOutcome::from_error(&err)
        }
    }
}

impl<T> From<ScaleResult<T>> for DriverOutcome {
    fn from(result: ScaleResult<T>) -> Self {
        match result {
            Ok(_) => DriverOutcome::ok(),
            Err(e) => DriverOutcome::from_error(&e),
        }
    }
}

/// Description of one config field, for clients building forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    /// Value a form should prefill. Configs are validated as sent; a
    /// missing field is not filled in from here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSchema {
    fn new(field_type: &str, required: bool) -> Self {
        Self {
            field_type: field_type.to_string(),
            required,
            default: None,
            min: None,
            options: Vec::new(),
        }
    }

    fn enumeration(options: &[&str], required: bool) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::new("enum", required)
        }
    }

    fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }
}

/// Config schema published by a driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSchema {
    pub driver: String,
    pub resource_fields: BTreeMap<String, FieldSchema>,
}

/// An action a webhook can trigger.
pub trait WebhookDriver: Send + Sync {
    /// Driver-type string this driver is registered under.
    fn name(&self) -> &str;

    /// Check a raw config without side effects.
    fn validate_payload(&self, config: &Value) -> DriverOutcome;

    /// Perform the action described by a raw config.
    fn execute(&self, config: &Value) -> DriverOutcome;

    /// Decode a raw config into this driver's canonical form, stamped
    /// with the driver type.
    fn convert_config(&self, config: &Value) -> ScaleResult<Value>;

    /// Describe the config fields this driver accepts.
    fn describe_schema(&self) -> DriverSchema;
}

// ── Scale by host template ─────────────────────────────────────────

/// Scales the group of hosts sharing a host template.
#[derive(Clone)]
pub struct ScaleByHostTemplateDriver {
    scaler: GroupScaler,
}

impl ScaleByHostTemplateDriver {
    pub fn new(scaler: GroupScaler) -> Self {
        Self { scaler }
    }
}

impl WebhookDriver for ScaleByHostTemplateDriver {
    fn name(&self) -> &str {
        SCALE_BY_HOST_TEMPLATE_ID
    }

    fn validate_payload(&self, config: &Value) -> DriverOutcome {
        ScaleConfig::from_value(config)
            .and_then(|cfg| validate(&cfg))
            .into()
    }

    fn execute(&self, config: &Value) -> DriverOutcome {
        let result = ScaleConfig::from_value(config)
            .and_then(|cfg| validate(&cfg))
            .and_then(|request| self.scaler.execute(&request));

        match result {
            Ok(report) => {
                debug!(host_template_id = %report.host_template_id, "driver executed");
                data_outcome(&report)
            }
            Err(e) => {
                warn!(driver = SCALE_BY_HOST_TEMPLATE_ID, error = %e, "scale request failed");
                DriverOutcome::from_error(&e)
            }
        }
    }

    fn convert_config(&self, config: &Value) -> ScaleResult<Value> {
        let mut cfg = ScaleConfig::from_value(config)?;
        cfg.driver_type = self.name().to_string();
        serde_json::to_value(&cfg).map_err(|e| ScaleError::Encode(e.to_string()))
    }

    fn describe_schema(&self) -> DriverSchema {
        let mut fields = BTreeMap::new();
        fields.insert(
            "action".to_string(),
            FieldSchema::enumeration(&["up", "down"], true),
        );
        fields.insert(
            "amount".to_string(),
            FieldSchema::new("int", true).with_min(1),
        );
        fields.insert(
            "hostTemplateId".to_string(),
            FieldSchema::new("string", true),
        );
        fields.insert(
            "min".to_string(),
            FieldSchema::new("int", true).with_default(json!(1)).with_min(1),
        );
        fields.insert(
            "max".to_string(),
            FieldSchema::new("int", true).with_default(json!(100)).with_min(1),
        );
        fields.insert(
            "deleteOption".to_string(),
            FieldSchema::enumeration(&["mostRecent", "leastRecent"], false),
        );
        DriverSchema {
            driver: self.name().to_string(),
            resource_fields: fields,
        }
    }
}

// ── Registry ───────────────────────────────────────────────────────

/// Drivers keyed by driver-type string.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Arc<dyn WebhookDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in driver.
    pub fn with_builtin(scaler: GroupScaler) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ScaleByHostTemplateDriver::new(scaler)));
        registry
    }

    /// Register a driver under its name, returning any driver it replaced.
    pub fn register(&mut self, driver: Arc<dyn WebhookDriver>) -> Option<Arc<dyn WebhookDriver>> {
        self.drivers.insert(driver.name().to_string(), driver)
    }

    pub fn get(&self, name: &str) -> ScaleResult<&Arc<dyn WebhookDriver>> {
        self.drivers
            .get(name)
            .ok_or_else(|| ScaleError::UnknownDriver(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }

    pub fn schemas(&self) -> Vec<DriverSchema> {
        self.drivers.values().map(|d| d.describe_schema()).collect()
    }

    /// Validate a config with the named driver.
    pub fn validate(&self, driver: &str, config: &Value) -> DriverOutcome {
        match self.get(driver) {
            Ok(d) => d.validate_payload(config),
            Err(e) => DriverOutcome::from_error(&e),
        }
    }

    /// Execute a config with the named driver.
    pub fn execute(&self, driver: &str, config: &Value) -> DriverOutcome {
        match self.get(driver) {
            Ok(d) => d.execute(config),
            Err(e) => DriverOutcome::from_error(&e),
        }
    }
}
