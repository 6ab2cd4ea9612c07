//! Error types for the group scaler.

use thiserror::Error;

use hostscale_state::StateError;

/// Result type alias for scaling operations.
pub type ScaleResult<T> = Result<T, ScaleError>;

/// Result type alias for fleet calls.
pub type FleetResult<T> = Result<T, FleetError>;

/// Errors that can occur while validating or executing a scale request.
#[derive(Debug, Error)]
pub enum ScaleError {
    // ── Invalid request ────────────────────────────────────────────
    #[error("scale action not provided")]
    MissingAction,

    #[error("invalid action {0}")]
    InvalidAction(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("host template id not provided")]
    MissingHostTemplateId,

    #[error("minimum scale not provided/invalid")]
    InvalidMin,

    #[error("maximum scale not provided/invalid")]
    InvalidMax,

    #[error("max must be greater than min")]
    MinNotBelowMax,

    #[error("delete option must not be provided while scaling up")]
    DeleteOptionOnScaleUp,

    #[error("invalid delete option/delete option missing {0}")]
    InvalidDeleteOption(String),

    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    // ── Precondition failures ──────────────────────────────────────
    #[error("no hosts for scaling found for host template {0}")]
    NoHosts(String),

    #[error("cannot use manually-added hosts as a scaling template for host template {0}")]
    NoProvisionedHost(String),

    #[error("cannot scale above provided max scale value: {current} hosts + {amount} > {max}")]
    AboveMax { current: u64, amount: u64, max: u64 },

    #[error("cannot scale below provided min scale value: {current} hosts - {amount} < {min}")]
    BelowMin { current: u64, amount: u64, min: u64 },

    #[error("cannot scale down beyond the requested amount ({amount}) using only unhealthy hosts")]
    UnhealthyExceedsAmount { amount: u64 },

    // ── Infrastructure ─────────────────────────────────────────────
    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),

    #[error("couldn't decode config: {0}")]
    Decode(String),

    #[error("couldn't encode result: {0}")]
    Encode(String),
}

impl ScaleError {
    /// HTTP-style status for the caller-facing result taxonomy.
    pub fn status_code(&self) -> u16 {
        match self {
            ScaleError::Fleet(_) | ScaleError::Decode(_) | ScaleError::Encode(_) => 500,
            _ => 400,
        }
    }
}

/// Errors reported by a fleet implementation.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("host not found: {0}")]
    NotFound(String),

    #[error("fleet request failed: {0}")]
    Request(String),

    #[error("store error: {0}")]
    State(#[from] StateError),
}
