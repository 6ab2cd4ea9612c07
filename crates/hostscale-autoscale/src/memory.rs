//! In-memory fleet that records every call, for tests and dry runs.
//!
//! Hosts are kept most-recent-first; created hosts go to the front.
//! Creates and deletes can be told to start failing after a number of
//! successful calls to exercise partial execution; lists and gets can be
//! failed outright.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hostscale_state::{HostRecord, NewHost};

use crate::error::{FleetError, FleetResult};
use crate::fleet::{Fleet, ListFilter, SortOrder};

/// A call observed by [`MemoryFleet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetCall {
    List(String),
    Get(String),
    Create(String),
    Delete(String),
}

#[derive(Debug, Default)]
struct Inner {
    hosts: Vec<HostRecord>,
    calls: Vec<FleetCall>,
    next_id: u64,
    creates_left: Option<usize>,
    deletes_left: Option<usize>,
    fail_lists: bool,
    fail_gets: bool,
}

/// Recording in-memory fleet.
#[derive(Debug, Default)]
pub struct MemoryFleet {
    inner: Mutex<Inner>,
}

impl MemoryFleet {
    /// Seed the fleet with hosts listed most-recent-first.
    pub fn new(hosts: Vec<HostRecord>) -> Self {
        let next_id = hosts.len() as u64 + 1;
        Self {
            inner: Mutex::new(Inner {
                hosts,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Fail every create after `n` successful ones.
    pub fn fail_creates_after(self, n: usize) -> Self {
        self.lock().creates_left = Some(n);
        self
    }

    /// Fail every delete after `n` successful ones.
    pub fn fail_deletes_after(self, n: usize) -> Self {
        self.lock().deletes_left = Some(n);
        self
    }

    /// Fail every list call.
    pub fn fail_lists(self) -> Self {
        self.lock().fail_lists = true;
        self
    }

    /// Fail every get-by-id call.
    pub fn fail_gets(self) -> Self {
        self.lock().fail_gets = true;
        self
    }

    /// Current hosts, most-recent-first.
    pub fn hosts(&self) -> Vec<HostRecord> {
        self.lock().hosts.clone()
    }

    pub fn calls(&self) -> Vec<FleetCall> {
        self.lock().calls.clone()
    }

    /// Hostnames passed to successful and failed creates, in call order.
    pub fn created_hostnames(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FleetCall::Create(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Host ids passed to deletes, in call order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FleetCall::Delete(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Consume one unit of a failure budget; `false` once it is exhausted.
fn take_budget(budget: &mut Option<usize>) -> bool {
    match budget {
        None => true,
        Some(0) => false,
        Some(n) => {
            *n -= 1;
            true
        }
    }
}

impl Fleet for MemoryFleet {
    fn list(&self, filter: &ListFilter) -> FleetResult<Vec<HostRecord>> {
        let mut inner = self.lock();
        inner.calls.push(FleetCall::List(filter.host_template_id.clone()));
        if inner.fail_lists {
            return Err(FleetError::Request(format!(
                "list {} rejected",
                filter.host_template_id
            )));
        }
        let mut hosts: Vec<HostRecord> = inner
            .hosts
            .iter()
            .filter(|h| h.host_template_id == filter.host_template_id)
            .cloned()
            .collect();
        if filter.order == SortOrder::Asc {
            hosts.reverse();
        }
        Ok(hosts)
    }

    fn create(&self, draft: NewHost) -> FleetResult<HostRecord> {
        let mut inner = self.lock();
        inner.calls.push(FleetCall::Create(draft.hostname.clone()));
        if !take_budget(&mut inner.creates_left) {
            return Err(FleetError::Request(format!(
                "create {} rejected",
                draft.hostname
            )));
        }
        let seq = inner.next_id;
        inner.next_id += 1;
        let record = draft.into_record(format!("1h{seq}"), seq, seq);
        inner.hosts.insert(0, record.clone());
        Ok(record)
    }

    fn delete(&self, host: &HostRecord) -> FleetResult<()> {
        let mut inner = self.lock();
        inner.calls.push(FleetCall::Delete(host.id.clone()));
        if !take_budget(&mut inner.deletes_left) {
            return Err(FleetError::Request(format!("delete {} rejected", host.id)));
        }
        let before = inner.hosts.len();
        inner.hosts.retain(|h| h.id != host.id);
        if inner.hosts.len() == before {
            return Err(FleetError::NotFound(host.id.clone()));
        }
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> FleetResult<HostRecord> {
        let mut inner = self.lock();
        inner.calls.push(FleetCall::Get(id.to_string()));
        if inner.fail_gets {
            return Err(FleetError::Request(format!("get {id} rejected")));
        }
        inner
            .hosts
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or_else(|| FleetError::NotFound(id.to_string()))
    }
}
