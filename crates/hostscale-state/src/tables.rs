//! redb table definitions for the host store.

use redb::TableDefinition;

/// Host records keyed by host id.
pub const HOSTS: TableDefinition<&str, &[u8]> = TableDefinition::new("hosts");

/// Named monotonic counters (`host_id`, `created_seq`).
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Counter used to mint host ids (`1h1`, `1h2`, ...).
pub const HOST_ID_COUNTER: &str = "host_id";

/// Counter used to order hosts created within the same second.
pub const CREATED_SEQ_COUNTER: &str = "created_seq";
