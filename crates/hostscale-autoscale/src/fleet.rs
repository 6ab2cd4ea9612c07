//! Fleet — the provisioning API the scaler drives.
//!
//! The scaler only ever lists a group, reads one host in full, creates
//! clones, and deletes hosts. Calls are blocking; callers that need a
//! deadline run the scaler on a blocking worker and time out around it.

use hostscale_state::{HostRecord, HostStore, NewHost};

use crate::error::{FleetError, FleetResult};

/// Sort direction for host listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filter for listing the hosts of one group, ordered by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub host_template_id: String,
    pub order: SortOrder,
}

impl ListFilter {
    /// Hosts of a template, most recently created first.
    pub fn most_recent_first(host_template_id: &str) -> Self {
        Self {
            host_template_id: host_template_id.to_string(),
            order: SortOrder::Desc,
        }
    }
}

/// Provisioning operations on individual hosts.
pub trait Fleet: Send + Sync {
    /// List hosts matching the filter, sorted by creation time.
    fn list(&self, filter: &ListFilter) -> FleetResult<Vec<HostRecord>>;

    /// Create a host from a draft.
    fn create(&self, draft: NewHost) -> FleetResult<HostRecord>;

    /// Delete a host.
    fn delete(&self, host: &HostRecord) -> FleetResult<()>;

    /// Fetch the full record of a host.
    fn get_by_id(&self, id: &str) -> FleetResult<HostRecord>;
}

impl Fleet for HostStore {
    fn list(&self, filter: &ListFilter) -> FleetResult<Vec<HostRecord>> {
        let mut hosts = self.list_hosts_for_template(&filter.host_template_id)?;
        if filter.order == SortOrder::Asc {
            hosts.reverse();
        }
        Ok(hosts)
    }

    fn create(&self, draft: NewHost) -> FleetResult<HostRecord> {
        Ok(self.create_host(draft)?)
    }

    fn delete(&self, host: &HostRecord) -> FleetResult<()> {
        if self.delete_host(&host.id)? {
            Ok(())
        } else {
            Err(FleetError::NotFound(host.id.clone()))
        }
    }

    fn get_by_id(&self, id: &str) -> FleetResult<HostRecord> {
        self.get_host(id)?
            .ok_or_else(|| FleetError::NotFound(id.to_string()))
    }
}
