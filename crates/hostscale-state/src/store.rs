//! HostStore — redb-backed host inventory.
//!
//! Provides typed CRUD operations over host records. All values are
//! JSON-serialized into redb's `&[u8]` value columns. The store supports
//! both on-disk and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe host store backed by redb.
#[derive(Clone)]
pub struct HostStore {
    db: Arc<Database>,
}

impl HostStore {
    /// Open (or create) a persistent host store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "host store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory host store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory host store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(HOSTS).map_err(map_err!(Table))?;
        txn.open_table(COUNTERS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Bump a named counter inside an open write transaction.
    fn next_counter(txn: &WriteTransaction, name: &str) -> StateResult<u64> {
        let mut table = txn.open_table(COUNTERS).map_err(map_err!(Table))?;
        let current = table
            .get(name)
            .map_err(map_err!(Read))?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(name, next).map_err(map_err!(Write))?;
        Ok(next)
    }

    // ── Hosts ──────────────────────────────────────────────────────

    /// Create a host from a draft, assigning its id and creation order.
    pub fn create_host(&self, draft: NewHost) -> StateResult<HostRecord> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let id_num = Self::next_counter(&txn, HOST_ID_COUNTER)?;
        let seq = Self::next_counter(&txn, CREATED_SEQ_COUNTER)?;
        let record = draft.into_record(format!("1h{id_num}"), epoch_secs(), seq);
        let value = serde_json::to_vec(&record).map_err(map_err!(Serialize))?;
        {
            let mut table = txn.open_table(HOSTS).map_err(map_err!(Table))?;
            table
                .insert(record.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(host = %record.id, hostname = %record.hostname, "host created");
        Ok(record)
    }

    /// Insert or update a host record as-is.
    pub fn put_host(&self, host: &HostRecord) -> StateResult<()> {
        let value = serde_json::to_vec(host).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(HOSTS).map_err(map_err!(Table))?;
            table
                .insert(host.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(host = %host.id, "host stored");
        Ok(())
    }

    /// Get a host by id.
    pub fn get_host(&self, id: &str) -> StateResult<Option<HostRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(HOSTS).map_err(map_err!(Table))?;
        match table.get(id).map_err(map_err!(Read))? {
            Some(guard) => {
                let host: HostRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(host))
            }
            None => Ok(None),
        }
    }

    /// List all hosts, most recently created first.
    pub fn list_hosts(&self) -> StateResult<Vec<HostRecord>> {
        let mut hosts = self.scan(|_| true)?;
        sort_most_recent_first(&mut hosts);
        Ok(hosts)
    }

    /// List the hosts created from a template, most recently created first.
    pub fn list_hosts_for_template(&self, host_template_id: &str) -> StateResult<Vec<HostRecord>> {
        let mut hosts = self.scan(|h| h.host_template_id == host_template_id)?;
        sort_most_recent_first(&mut hosts);
        Ok(hosts)
    }

    fn scan(&self, keep: impl Fn(&HostRecord) -> bool) -> StateResult<Vec<HostRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(HOSTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let host: HostRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            if keep(&host) {
                results.push(host);
            }
        }
        Ok(results)
    }

    /// Delete a host by id. Returns true if it existed.
    pub fn delete_host(&self, id: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(HOSTS).map_err(map_err!(Table))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(host = %id, existed, "host deleted");
        Ok(existed)
    }

    /// Update a host's lifecycle state.
    pub fn set_host_state(&self, id: &str, state: HostState) -> StateResult<HostRecord> {
        let mut host = self
            .get_host(id)?
            .ok_or_else(|| StateError::NotFound(format!("host {id}")))?;
        host.state = state;
        self.put_host(&host)?;
        Ok(host)
    }
}

fn sort_most_recent_first(hosts: &mut [HostRecord]) {
    hosts.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| b.created_seq.cmp(&a.created_seq))
    });
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
