//! hostscale-autoscale — scale a group of hosts that share a host template.
//!
//! A scale request names a host template, a direction, an amount, and the
//! group-size bounds. The request is validated, the group is listed once
//! (most recently created first), and hosts are created or deleted one at
//! a time through a [`Fleet`].
//!
//! # Scaling Algorithm
//!
//! ```text
//! up:
//!     base     = first host with a machine driver
//!     reject if group + amount > max
//!     names    = continue the numeric suffix of the newest host that
//!                shares base's name prefix ("2" if there is none)
//!     create a clone of base for each name
//!
//! down:
//!     reject if group - amount < min
//!     delete inactive/deactivating/reconnecting/disconnected hosts first
//!         (fail once more of them turn up than amount)
//!     delete the rest from the newest end (mostRecent)
//!         or the oldest end (leastRecent), skipping hosts already gone
//! ```
//!
//! Fleet failures stop the sequence; completed creates and deletes are
//! not rolled back.

pub mod driver;
pub mod error;
pub mod fleet;
pub mod memory;
pub mod naming;
pub mod request;
pub mod scaler;
pub mod validate;

pub use driver::{
    DriverOutcome, DriverRegistry, DriverSchema, FieldSchema, SCALE_BY_HOST_TEMPLATE_ID,
    ScaleByHostTemplateDriver, WebhookDriver,
};
pub use error::{FleetError, FleetResult, ScaleError, ScaleResult};
pub use fleet::{Fleet, ListFilter, SortOrder};
pub use memory::{FleetCall, MemoryFleet};
pub use request::{DeleteOption, ScaleAction, ScaleConfig, ScalingRequest};
pub use scaler::{GroupScaler, HostGroup, ScaleReport};
pub use validate::validate;
