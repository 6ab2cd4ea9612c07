//! Group scaler — executes a validated scale request against the fleet.
//!
//! One invocation fetches the group once, then issues creates or deletes
//! one at a time. Every decision is made against that single snapshot.
//! A failing fleet call stops the sequence; hosts already created or
//! deleted stay that way and the caller should re-fetch before retrying.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use hostscale_state::{HostRecord, NewHost};

use crate::error::{ScaleError, ScaleResult};
use crate::fleet::{Fleet, ListFilter};
use crate::naming::NameSequence;
use crate::request::{DeleteOption, ScaleAction, ScalingRequest};

/// Point-in-time view of the hosts sharing a template, most-recent-first.
#[derive(Debug, Clone, PartialEq)]
pub struct HostGroup {
    pub host_template_id: String,
    pub hosts: Vec<HostRecord>,
}

impl HostGroup {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// The most recent host created by a machine driver. Manually added
    /// hosts cannot serve as a cloning template.
    pub fn base_host(&self) -> Option<&HostRecord> {
        self.hosts.iter().find(|h| h.is_provisioned())
    }
}

/// What a successful invocation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReport {
    pub host_template_id: String,
    pub action: ScaleAction,
    pub created: Vec<HostRecord>,
    pub deleted: Vec<HostRecord>,
}

/// Per-group critical sections, so two requests for the same template in
/// this process never work from overlapping snapshots.
///
/// An entry lives only while some request holds or waits on it.
#[derive(Debug, Default)]
struct GroupLocks {
    groups: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GroupLocks {
    fn groups(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter<'a>(&'a self, host_template_id: &'a str) -> GroupEntry<'a> {
        let section = self
            .groups()
            .entry(host_template_id.to_string())
            .or_default()
            .clone();
        GroupEntry {
            locks: self,
            host_template_id,
            section,
        }
    }
}

/// A request's claim on its group's section. Dropping the last claim
/// removes the group from the map.
struct GroupEntry<'a> {
    locks: &'a GroupLocks,
    host_template_id: &'a str,
    section: Arc<Mutex<()>>,
}

impl GroupEntry<'_> {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.section.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GroupEntry<'_> {
    fn drop(&mut self) {
        // Claims are only handed out under the map lock, so the count
        // cannot grow while it is held.
        let mut groups = self.locks.groups();
        if Arc::strong_count(&self.section) == 2 {
            groups.remove(self.host_template_id);
        }
    }
}

/// Scales host groups through an injected [`Fleet`].
#[derive(Clone)]
pub struct GroupScaler {
    fleet: Arc<dyn Fleet>,
    locks: Option<Arc<GroupLocks>>,
}

impl GroupScaler {
    /// Create a scaler that serializes requests per host template.
    pub fn new(fleet: Arc<dyn Fleet>) -> Self {
        Self {
            fleet,
            locks: Some(Arc::new(GroupLocks::default())),
        }
    }

    /// Let concurrent requests for the same group run unserialized.
    pub fn without_group_lock(mut self) -> Self {
        self.locks = None;
        self
    }

    pub fn fleet(&self) -> &Arc<dyn Fleet> {
        &self.fleet
    }

    /// Run a validated request to completion.
    pub fn execute(&self, request: &ScalingRequest) -> ScaleResult<ScaleReport> {
        let entry = self
            .locks
            .as_ref()
            .map(|locks| locks.enter(&request.host_template_id));
        let _guard = entry.as_ref().map(GroupEntry::lock);

        let group = self.fetch_group(&request.host_template_id)?;
        debug!(
            host_template_id = %group.host_template_id,
            action = %request.action,
            amount = request.amount,
            group_size = group.len(),
            "scaling group"
        );

        let mut report = ScaleReport {
            host_template_id: group.host_template_id.clone(),
            action: request.action,
            created: Vec::new(),
            deleted: Vec::new(),
        };

        match request.action {
            ScaleAction::Up => {
                report.created = self.scale_up(&group, request.amount, request.max)?;
            }
            ScaleAction::Down => {
                let option = request
                    .delete_option
                    .ok_or_else(|| ScaleError::InvalidDeleteOption(String::new()))?;
                report.deleted = self.scale_down(&group, request.amount, request.min, option)?;
            }
        }

        info!(
            host_template_id = %report.host_template_id,
            action = %report.action,
            created = report.created.len(),
            deleted = report.deleted.len(),
            "scale request completed"
        );
        Ok(report)
    }

    /// Fetch the group for a template, most recently created first.
    pub fn fetch_group(&self, host_template_id: &str) -> ScaleResult<HostGroup> {
        let hosts = self
            .fleet
            .list(&ListFilter::most_recent_first(host_template_id))?;
        if hosts.is_empty() {
            return Err(ScaleError::NoHosts(host_template_id.to_string()));
        }
        Ok(HostGroup {
            host_template_id: host_template_id.to_string(),
            hosts,
        })
    }

    /// Clone the base host `amount` times, continuing the group's naming.
    pub fn scale_up(&self, group: &HostGroup, amount: u64, max: u64) -> ScaleResult<Vec<HostRecord>> {
        let base = group
            .base_host()
            .ok_or_else(|| ScaleError::NoProvisionedHost(group.host_template_id.clone()))?;

        let current = group.len() as u64;
        if current.saturating_add(amount) > max {
            warn!(
                host_template_id = %group.host_template_id,
                current, amount, max,
                "scale up rejected"
            );
            return Err(ScaleError::AboveMax { current, amount, max });
        }

        let template = self.fleet.get_by_id(&base.id)?;
        let names = NameSequence::for_group(base, &group.hosts);

        let mut created = Vec::new();
        for hostname in names.take(amount as usize) {
            info!(
                host_template_id = %group.host_template_id,
                base = %base.id,
                %hostname,
                "creating host"
            );
            created.push(self.fleet.create(NewHost::clone_of(&template, hostname))?);
        }
        Ok(created)
    }

    /// Remove `amount` hosts: unhealthy ones first, then healthy ones in
    /// `option` order.
    ///
    /// If more unhealthy hosts exist than `amount`, the excess is detected
    /// while scanning, after `amount` of them have already been deleted.
    /// Those deletions are not undone.
    pub fn scale_down(
        &self,
        group: &HostGroup,
        amount: u64,
        min: u64,
        option: DeleteOption,
    ) -> ScaleResult<Vec<HostRecord>> {
        let current = group.len() as u64;
        if current < amount.saturating_add(min) {
            warn!(
                host_template_id = %group.host_template_id,
                current, amount, min,
                "scale down rejected"
            );
            return Err(ScaleError::BelowMin { current, amount, min });
        }

        let mut deleted: Vec<HostRecord> = Vec::new();
        let mut removed: HashSet<&str> = HashSet::new();

        for host in group.hosts.iter().filter(|h| h.state.is_unhealthy()) {
            if deleted.len() as u64 >= amount {
                warn!(
                    host_template_id = %group.host_template_id,
                    amount,
                    deleted = deleted.len(),
                    "more unhealthy hosts than requested amount"
                );
                return Err(ScaleError::UnhealthyExceedsAmount { amount });
            }
            info!(
                host = %host.id,
                state = %host.state,
                "deleting host with priority because of bad state"
            );
            self.fleet.delete(host)?;
            removed.insert(host.id.as_str());
            deleted.push(host.clone());
        }

        let remaining = (amount - deleted.len() as u64) as usize;
        if remaining == 0 {
            return Ok(deleted);
        }

        info!(
            host_template_id = %group.host_template_id,
            order = %option,
            remaining,
            "deleting healthy hosts"
        );
        let healthy = group.hosts.iter().filter(|h| !removed.contains(h.id.as_str()));
        let victims: Vec<&HostRecord> = match option {
            DeleteOption::MostRecent => healthy.take(remaining).collect(),
            DeleteOption::LeastRecent => healthy.rev().take(remaining).collect(),
        };
        for host in victims {
            info!(host = %host.id, hostname = %host.display_name(), "deleting host");
            self.fleet.delete(host)?;
            deleted.push(host.clone());
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FleetCall, MemoryFleet};
    use hostscale_state::HostState;
    use std::collections::HashMap as Labels;

    fn host(id: &str, hostname: &str, state: HostState) -> HostRecord {
        HostRecord {
            id: id.to_string(),
            name: String::new(),
            hostname: hostname.to_string(),
            driver: "amazonec2".to_string(),
            state,
            host_template_id: "1ht1".to_string(),
            labels: Labels::new(),
            created: 0,
            created_seq: 0,
        }
    }

    fn active(id: &str, hostname: &str) -> HostRecord {
        host(id, hostname, HostState::Active)
    }

    /// `n` healthy hosts `host{n}..host1`, most recent first.
    fn healthy_group(n: usize) -> Vec<HostRecord> {
        (1..=n)
            .rev()
            .map(|i| active(&format!("1h{i}"), &format!("host{i}")))
            .collect()
    }

    fn scaler(fleet: &Arc<MemoryFleet>) -> GroupScaler {
        GroupScaler::new(fleet.clone())
    }

    fn up(amount: u64, max: u64) -> ScalingRequest {
        ScalingRequest {
            action: ScaleAction::Up,
            amount,
            host_template_id: "1ht1".to_string(),
            min: 1,
            max,
            delete_option: None,
        }
    }

    fn down(amount: u64, min: u64, option: DeleteOption) -> ScalingRequest {
        ScalingRequest {
            action: ScaleAction::Down,
            amount,
            host_template_id: "1ht1".to_string(),
            min,
            max: 10,
            delete_option: Some(option),
        }
    }

    fn surviving_ids(fleet: &MemoryFleet) -> Vec<String> {
        fleet.hosts().into_iter().map(|h| h.id).collect()
    }

    // ── Fetch ──────────────────────────────────────────────────────

    #[test]
    fn empty_group_is_rejected() {
        let fleet = Arc::new(MemoryFleet::new(Vec::new()));
        let err = scaler(&fleet).execute(&up(1, 10)).unwrap_err();
        assert!(matches!(err, ScaleError::NoHosts(ref t) if t == "1ht1"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn fetch_ignores_other_templates() {
        let mut other = active("1h9", "db1");
        other.host_template_id = "1ht2".to_string();
        let mut hosts = healthy_group(2);
        hosts.insert(0, other);
        let fleet = Arc::new(MemoryFleet::new(hosts));

        let group = scaler(&fleet).fetch_group("1ht1").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.hosts[0].id, "1h2");
    }

    // ── Scale up ───────────────────────────────────────────────────

    #[test]
    fn scale_up_continues_numbering() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(3)));
        let report = scaler(&fleet).execute(&up(2, 10)).unwrap();

        assert_eq!(fleet.created_hostnames(), vec!["host4", "host5"]);
        assert_eq!(report.created.len(), 2);
        assert!(report.created.iter().all(|h| h.name.is_empty()));
        assert!(report.created.iter().all(|h| h.driver == "amazonec2"));
        assert_eq!(fleet.hosts().len(), 5);
    }

    #[test]
    fn scale_up_reads_base_host_in_full_before_creating() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(1)));
        scaler(&fleet).execute(&up(1, 10)).unwrap();

        assert_eq!(
            fleet.calls(),
            vec![
                FleetCall::List("1ht1".to_string()),
                FleetCall::Get("1h1".to_string()),
                FleetCall::Create("host2".to_string()),
            ]
        );
    }

    #[test]
    fn scale_up_above_max_creates_nothing() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(3)));
        let err = scaler(&fleet).execute(&up(2, 4)).unwrap_err();

        assert!(matches!(err, ScaleError::AboveMax { current: 3, amount: 2, max: 4 }));
        assert!(fleet.created_hostnames().is_empty());
    }

    #[test]
    fn scale_up_to_exactly_max_is_allowed() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(3)));
        scaler(&fleet).execute(&up(1, 4)).unwrap();
        assert_eq!(fleet.hosts().len(), 4);
    }

    #[test]
    fn scale_up_needs_a_provisioned_host() {
        let mut hosts = healthy_group(2);
        for h in &mut hosts {
            h.driver.clear();
        }
        let fleet = Arc::new(MemoryFleet::new(hosts));
        let err = scaler(&fleet).execute(&up(1, 10)).unwrap_err();

        assert!(matches!(err, ScaleError::NoProvisionedHost(_)));
        assert!(fleet.created_hostnames().is_empty());
    }

    #[test]
    fn base_host_is_most_recent_provisioned_member() {
        // The newest host was added by hand; the next one is the template.
        let mut custom = active("1h9", "custom-box");
        custom.driver.clear();
        let mut hosts = vec![custom];
        hosts.extend(healthy_group(2));
        let fleet = Arc::new(MemoryFleet::new(hosts));

        let group = scaler(&fleet).fetch_group("1ht1").unwrap();
        assert_eq!(group.base_host().map(|h| h.id.as_str()), Some("1h2"));

        scaler(&fleet).execute(&up(1, 10)).unwrap();
        assert_eq!(fleet.created_hostnames(), vec!["host3"]);
    }

    #[test]
    fn scale_up_without_numeric_suffix_starts_at_two() {
        let fleet = Arc::new(MemoryFleet::new(vec![active("1h1", "worker.example.com")]));
        scaler(&fleet).execute(&up(2, 10)).unwrap();
        assert_eq!(fleet.created_hostnames(), vec!["worker2", "worker3"]);
    }

    #[test]
    fn scale_up_preserves_zero_padding() {
        let fleet = Arc::new(MemoryFleet::new(vec![active("1h1", "node098")]));
        scaler(&fleet).execute(&up(3, 10)).unwrap();
        assert_eq!(fleet.created_hostnames(), vec!["node099", "node100", "node101"]);
    }

    #[test]
    fn create_failure_stops_sequence_without_rollback() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(2)).fail_creates_after(1));
        let err = scaler(&fleet).execute(&up(3, 10)).unwrap_err();

        assert!(matches!(err, ScaleError::Fleet(_)));
        assert_eq!(err.status_code(), 500);
        // host3 was created, host4 was attempted, host5 never was.
        assert_eq!(fleet.created_hostnames(), vec!["host3", "host4"]);
        assert_eq!(fleet.hosts().len(), 3);
    }

    #[test]
    fn list_failure_is_internal_and_creates_nothing() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(2)).fail_lists());
        let err = scaler(&fleet).execute(&up(1, 10)).unwrap_err();

        assert!(matches!(err, ScaleError::Fleet(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(fleet.calls(), vec![FleetCall::List("1ht1".to_string())]);
    }

    #[test]
    fn base_host_read_failure_is_internal_and_creates_nothing() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(2)).fail_gets());
        let err = scaler(&fleet).execute(&up(1, 10)).unwrap_err();

        assert!(matches!(err, ScaleError::Fleet(_)));
        assert_eq!(err.status_code(), 500);
        assert!(fleet.created_hostnames().is_empty());
        assert_eq!(fleet.hosts().len(), 2);
    }

    #[test]
    fn clones_of_unhealthy_base_start_active() {
        let fleet = Arc::new(MemoryFleet::new(vec![host(
            "1h1",
            "host1",
            HostState::Disconnected,
        )]));
        let report = scaler(&fleet).execute(&up(1, 10)).unwrap();

        assert_eq!(report.created[0].hostname, "host2");
        assert_eq!(report.created[0].state, HostState::Active);
    }

    // ── Scale down ─────────────────────────────────────────────────

    #[test]
    fn scale_down_below_min_deletes_nothing() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(3)));
        let err = scaler(&fleet)
            .execute(&down(3, 1, DeleteOption::MostRecent))
            .unwrap_err();

        assert!(matches!(err, ScaleError::BelowMin { current: 3, amount: 3, min: 1 }));
        assert!(fleet.deleted_ids().is_empty());
    }

    #[test]
    fn most_recent_keeps_oldest_hosts() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(5)));
        scaler(&fleet)
            .execute(&down(2, 1, DeleteOption::MostRecent))
            .unwrap();

        assert_eq!(fleet.deleted_ids(), vec!["1h5", "1h4"]);
        assert_eq!(surviving_ids(&fleet), vec!["1h3", "1h2", "1h1"]);
    }

    #[test]
    fn least_recent_keeps_newest_hosts() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(5)));
        scaler(&fleet)
            .execute(&down(2, 1, DeleteOption::LeastRecent))
            .unwrap();

        assert_eq!(fleet.deleted_ids(), vec!["1h1", "1h2"]);
        assert_eq!(surviving_ids(&fleet), vec!["1h5", "1h4", "1h3"]);
    }

    #[test]
    fn disconnected_host_goes_first() {
        let fleet = Arc::new(MemoryFleet::new(vec![
            active("1h4", "host4"),
            host("1h3", "host3", HostState::Disconnected),
            active("1h2", "host2"),
            active("1h1", "host1"),
        ]));
        let report = scaler(&fleet)
            .execute(&down(2, 1, DeleteOption::MostRecent))
            .unwrap();

        assert_eq!(fleet.deleted_ids(), vec!["1h3", "1h4"]);
        assert_eq!(surviving_ids(&fleet), vec!["1h2", "1h1"]);
        assert_eq!(report.deleted.len(), 2);
    }

    #[test]
    fn unhealthy_hosts_satisfy_whole_amount() {
        let fleet = Arc::new(MemoryFleet::new(vec![
            active("1h4", "host4"),
            host("1h3", "host3", HostState::Reconnecting),
            host("1h2", "host2", HostState::Deactivating),
            active("1h1", "host1"),
        ]));
        scaler(&fleet)
            .execute(&down(2, 1, DeleteOption::LeastRecent))
            .unwrap();

        assert_eq!(fleet.deleted_ids(), vec!["1h3", "1h2"]);
        assert_eq!(surviving_ids(&fleet), vec!["1h4", "1h1"]);
    }

    #[test]
    fn least_recent_walk_skips_hosts_removed_for_bad_state() {
        let fleet = Arc::new(MemoryFleet::new(vec![
            active("1h5", "host5"),
            active("1h4", "host4"),
            host("1h3", "host3", HostState::Disconnected),
            active("1h2", "host2"),
            host("1h1", "host1", HostState::Inactive),
        ]));
        scaler(&fleet)
            .execute(&down(3, 1, DeleteOption::LeastRecent))
            .unwrap();

        // Bad hosts in listed order, then the oldest healthy one.
        assert_eq!(fleet.deleted_ids(), vec!["1h3", "1h1", "1h2"]);
        assert_eq!(surviving_ids(&fleet), vec!["1h5", "1h4"]);
    }

    #[test]
    fn most_recent_walk_skips_hosts_removed_for_bad_state() {
        let fleet = Arc::new(MemoryFleet::new(vec![
            host("1h5", "host5", HostState::Inactive),
            active("1h4", "host4"),
            active("1h3", "host3"),
            active("1h2", "host2"),
        ]));
        scaler(&fleet)
            .execute(&down(2, 1, DeleteOption::MostRecent))
            .unwrap();

        assert_eq!(fleet.deleted_ids(), vec!["1h5", "1h4"]);
    }

    #[test]
    fn excess_unhealthy_hosts_fail_after_partial_deletion() {
        // Two unhealthy hosts but only one requested: the first is deleted
        // before the second is seen, and that deletion stands.
        let fleet = Arc::new(MemoryFleet::new(vec![
            host("1h4", "host4", HostState::Disconnected),
            host("1h3", "host3", HostState::Inactive),
            active("1h2", "host2"),
            active("1h1", "host1"),
        ]));
        let err = scaler(&fleet)
            .execute(&down(1, 1, DeleteOption::MostRecent))
            .unwrap_err();

        assert!(matches!(err, ScaleError::UnhealthyExceedsAmount { amount: 1 }));
        assert_eq!(err.status_code(), 400);
        assert_eq!(fleet.deleted_ids(), vec!["1h4"]);
        assert_eq!(surviving_ids(&fleet), vec!["1h3", "1h2", "1h1"]);
    }

    #[test]
    fn delete_failure_stops_sequence_without_rollback() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(5)).fail_deletes_after(1));
        let err = scaler(&fleet)
            .execute(&down(3, 1, DeleteOption::MostRecent))
            .unwrap_err();

        assert!(matches!(err, ScaleError::Fleet(_)));
        assert_eq!(fleet.deleted_ids(), vec!["1h5", "1h4"]);
        assert_eq!(fleet.hosts().len(), 4);
    }

    #[test]
    fn scale_down_to_exactly_min_is_allowed() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(4)));
        scaler(&fleet)
            .execute(&down(2, 2, DeleteOption::MostRecent))
            .unwrap();
        assert_eq!(fleet.hosts().len(), 2);
    }

    // ── Group lock ─────────────────────────────────────────────────

    /// Fleet whose creates are slow enough for two requests to overlap.
    struct SlowFleet(MemoryFleet);

    impl Fleet for SlowFleet {
        fn list(&self, filter: &ListFilter) -> crate::error::FleetResult<Vec<HostRecord>> {
            self.0.list(filter)
        }
        fn create(&self, draft: NewHost) -> crate::error::FleetResult<HostRecord> {
            std::thread::sleep(std::time::Duration::from_millis(50));
            self.0.create(draft)
        }
        fn delete(&self, host: &HostRecord) -> crate::error::FleetResult<()> {
            self.0.delete(host)
        }
        fn get_by_id(&self, id: &str) -> crate::error::FleetResult<HostRecord> {
            self.0.get_by_id(id)
        }
    }

    #[test]
    fn group_lock_serializes_requests_for_same_template() {
        let fleet = Arc::new(SlowFleet(MemoryFleet::new(healthy_group(2))));
        let scaler = GroupScaler::new(fleet.clone());

        let results: Vec<ScaleResult<ScaleReport>> = std::thread::scope(|s| {
            let a = s.spawn(|| scaler.execute(&up(2, 4)));
            let b = s.spawn(|| scaler.execute(&up(2, 4)));
            vec![a.join().unwrap(), b.join().unwrap()]
        });

        let ok = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ScaleError::AboveMax { current: 4, .. }))));
        assert_eq!(fleet.0.hosts().len(), 4);
    }

    fn lock_entries(scaler: &GroupScaler) -> usize {
        scaler.locks.as_ref().map_or(0, |locks| locks.groups().len())
    }

    #[test]
    fn group_lock_entries_are_released_after_requests() {
        let fleet = Arc::new(MemoryFleet::new(healthy_group(2)));
        let scaler = scaler(&fleet);

        for i in 0..1000 {
            let mut request = up(1, 10);
            request.host_template_id = format!("missing-{i}");
            assert!(matches!(scaler.execute(&request), Err(ScaleError::NoHosts(_))));
        }
        assert_eq!(lock_entries(&scaler), 0);

        scaler.execute(&up(1, 10)).unwrap();
        scaler.execute(&up(1, 2)).unwrap_err();
        assert_eq!(lock_entries(&scaler), 0);
    }

    #[test]
    fn group_lock_entry_survives_while_another_request_waits() {
        let fleet = Arc::new(SlowFleet(MemoryFleet::new(healthy_group(2))));
        let scaler = GroupScaler::new(fleet.clone());

        std::thread::scope(|s| {
            let a = s.spawn(|| scaler.execute(&up(1, 10)));
            let b = s.spawn(|| scaler.execute(&up(1, 10)));
            a.join().unwrap().unwrap();
            b.join().unwrap().unwrap();
        });

        assert_eq!(fleet.0.created_hostnames(), vec!["host3", "host4"]);
        assert_eq!(lock_entries(&scaler), 0);
    }
}
