// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory collaborators for service tests

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::CdpIdentity;
use crate::errors::{FailedOperation, ProvisionResult};
use crate::hdfs::FilesystemGateway;
use crate::principal::{PrincipalResolver, Resolution};
use crate::ranger::{PolicyEngine, RangerPolicy, RangerRole, RangerSecurityZone};

#[derive(Default)]
struct EngineState {
    next_id: i64,
    zones: BTreeMap<String, RangerSecurityZone>,
    roles: BTreeMap<String, RangerRole>,
    policies: BTreeMap<String, RangerPolicy>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

impl EngineState {
    fn call(&mut self, operation: &str) -> ProvisionResult<()> {
        self.calls.push(operation.to_string());
        if self.failing.contains(operation) {
            Err(FailedOperation::message(format!("{} failed", operation)))
        } else {
            Ok(())
        }
    }

    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Policy engine keeping entities in maps keyed by name
#[derive(Default)]
pub struct InMemoryPolicyEngine {
    state: Mutex<EngineState>,
}

impl InMemoryPolicyEngine {
    /// Make every call of `operation` (e.g. "create_role") fail
    pub fn fail_on(&self, operation: &str) {
        self.state.lock().unwrap().failing.insert(operation.to_string());
    }

    pub fn zone(&self, name: &str) -> Option<RangerSecurityZone> {
        self.state.lock().unwrap().zones.get(name).cloned()
    }

    pub fn role(&self, name: &str) -> Option<RangerRole> {
        self.state.lock().unwrap().roles.get(name).cloned()
    }

    pub fn policy(&self, name: &str) -> Option<RangerPolicy> {
        self.state.lock().unwrap().policies.get(name).cloned()
    }

    pub fn insert_role(&self, mut role: RangerRole) {
        let mut state = self.state.lock().unwrap();
        role.id = Some(state.assign_id());
        state.roles.insert(role.name.clone(), role);
    }

    pub fn zone_count(&self) -> usize {
        self.state.lock().unwrap().zones.len()
    }

    pub fn policy_count(&self) -> usize {
        self.state.lock().unwrap().policies.len()
    }

    pub fn role_count(&self) -> usize {
        self.state.lock().unwrap().roles.len()
    }

    /// Names of the operations called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl PolicyEngine for InMemoryPolicyEngine {
    async fn find_security_zone(&self, name: &str) -> ProvisionResult<Option<RangerSecurityZone>> {
        let mut state = self.state.lock().unwrap();
        state.call("find_security_zone")?;
        Ok(state.zones.get(name).cloned())
    }

    async fn create_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone> {
        let mut state = self.state.lock().unwrap();
        state.call("create_security_zone")?;
        let mut created = zone.clone();
        created.id = Some(state.assign_id());
        state.zones.insert(created.name.clone(), created.clone());
        Ok(created)
    }

    async fn update_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone> {
        let mut state = self.state.lock().unwrap();
        state.call("update_security_zone")?;
        state.zones.insert(zone.name.clone(), zone.clone());
        Ok(zone.clone())
    }

    async fn find_policy(
        &self,
        service_name: &str,
        policy_name: &str,
        zone_name: Option<&str>,
    ) -> ProvisionResult<Option<RangerPolicy>> {
        let mut state = self.state.lock().unwrap();
        state.call("find_policy")?;
        Ok(state
            .policies
            .get(policy_name)
            .filter(|p| p.service == service_name)
            .filter(|p| zone_name.is_none() || p.zone_name.as_deref() == zone_name)
            .cloned())
    }

    async fn create_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy> {
        let mut state = self.state.lock().unwrap();
        state.call("create_policy")?;
        let mut created = policy.clone();
        created.id = Some(state.assign_id());
        state.policies.insert(created.name.clone(), created.clone());
        Ok(created)
    }

    async fn update_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy> {
        let mut state = self.state.lock().unwrap();
        state.call("update_policy")?;
        state.policies.insert(policy.name.clone(), policy.clone());
        Ok(policy.clone())
    }

    async fn delete_policy(&self, policy: &RangerPolicy) -> ProvisionResult<()> {
        let mut state = self.state.lock().unwrap();
        state.call("delete_policy")?;
        state.policies.remove(&policy.name);
        Ok(())
    }

    async fn find_role(&self, name: &str) -> ProvisionResult<Option<RangerRole>> {
        let mut state = self.state.lock().unwrap();
        state.call("find_role")?;
        Ok(state.roles.get(name).cloned())
    }

    async fn create_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole> {
        let mut state = self.state.lock().unwrap();
        state.call("create_role")?;
        let mut created = role.clone();
        created.id = Some(state.assign_id());
        state.roles.insert(created.name.clone(), created.clone());
        Ok(created)
    }

    async fn update_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole> {
        let mut state = self.state.lock().unwrap();
        state.call("update_role")?;
        state.roles.insert(role.name.clone(), role.clone());
        Ok(role.clone())
    }

    async fn delete_role(&self, role: &RangerRole) -> ProvisionResult<()> {
        let mut state = self.state.lock().unwrap();
        state.call("delete_role")?;
        state.roles.remove(&role.name);
        Ok(())
    }
}

/// Policy engine that records how many of its calls overlap
///
/// Every call yields to the runtime while counted as in flight, so calls
/// that are not serialized by the caller are seen overlapping.
#[derive(Default)]
pub struct OverlapRecordingEngine {
    inner: InMemoryPolicyEngine,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl OverlapRecordingEngine {
    /// Highest number of calls seen running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryPolicyEngine {
        &self.inner
    }

    async fn enter(&self) {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

macro_rules! overlapping {
    ($self:ident, $call:expr) => {{
        $self.enter().await;
        let result = $call.await;
        $self.leave();
        result
    }};
}

#[async_trait]
impl PolicyEngine for OverlapRecordingEngine {
    async fn find_security_zone(&self, name: &str) -> ProvisionResult<Option<RangerSecurityZone>> {
        overlapping!(self, self.inner.find_security_zone(name))
    }

    async fn create_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone> {
        overlapping!(self, self.inner.create_security_zone(zone))
    }

    async fn update_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone> {
        overlapping!(self, self.inner.update_security_zone(zone))
    }

    async fn find_policy(
        &self,
        service_name: &str,
        policy_name: &str,
        zone_name: Option<&str>,
    ) -> ProvisionResult<Option<RangerPolicy>> {
        overlapping!(self, self.inner.find_policy(service_name, policy_name, zone_name))
    }

    async fn create_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy> {
        overlapping!(self, self.inner.create_policy(policy))
    }

    async fn update_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy> {
        overlapping!(self, self.inner.update_policy(policy))
    }

    async fn delete_policy(&self, policy: &RangerPolicy) -> ProvisionResult<()> {
        overlapping!(self, self.inner.delete_policy(policy))
    }

    async fn find_role(&self, name: &str) -> ProvisionResult<Option<RangerRole>> {
        overlapping!(self, self.inner.find_role(name))
    }

    async fn create_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole> {
        overlapping!(self, self.inner.create_role(role))
    }

    async fn update_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole> {
        overlapping!(self, self.inner.update_role(role))
    }

    async fn delete_role(&self, role: &RangerRole) -> ProvisionResult<()> {
        overlapping!(self, self.inner.delete_role(role))
    }
}

/// Filesystem recording the folders it was asked to create and delete
#[derive(Default)]
pub struct InMemoryFilesystem {
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    failing: bool,
}

impl InMemoryFilesystem {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FilesystemGateway for InMemoryFilesystem {
    async fn create_folder(&self, path: &str) -> ProvisionResult<String> {
        if self.failing {
            return Err(FailedOperation::message(format!(
                "Failed to create the folder '{}'",
                path
            )));
        }
        self.created.lock().unwrap().push(path.to_string());
        Ok(path.to_string())
    }

    async fn delete_folder(&self, path: &str) -> ProvisionResult<String> {
        self.deleted.lock().unwrap().push(path.to_string());
        Ok(path.to_string())
    }
}

/// Resolver answering from a fixed subject table; unknown subjects fail
#[derive(Default)]
pub struct TableResolver {
    table: HashMap<String, CdpIdentity>,
}

impl TableResolver {
    pub fn with_user(mut self, subject: &str, user_id: &str) -> Self {
        self.table.insert(
            subject.to_string(),
            CdpIdentity::User {
                user_id: user_id.to_string(),
                mail: format!("{}@example.com", user_id),
            },
        );
        self
    }

    pub fn with_group(mut self, subject: &str, name: &str) -> Self {
        self.table.insert(
            subject.to_string(),
            CdpIdentity::Group {
                name: name.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl PrincipalResolver for TableResolver {
    async fn resolve(&self, subjects: &BTreeSet<String>) -> Resolution {
        subjects
            .iter()
            .map(|subject| {
                let outcome = self.table.get(subject).cloned().ok_or_else(|| {
                    FailedOperation::message(format!("The subject {} was not found", subject))
                });
                (subject.clone(), outcome)
            })
            .collect()
    }
}
