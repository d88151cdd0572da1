//! # In-Memory Access Control
//!
//! Role membership kept as one [`CompactAddressSet`] per role, so member
//! counts are O(1).

use crate::domain::roles::RoleId;
use crate::ports::outbound::AccessControl;
use parking_lot::RwLock;
use registry_types::{Address, CompactAddressSet};
use std::collections::HashMap;

/// In-memory role storage.
#[derive(Debug, Default)]
pub struct InMemoryAccessControl {
    members: RwLock<HashMap<RoleId, CompactAddressSet>>,
}

impl InMemoryAccessControl {
    /// Create storage with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current members of `role`. Order is unspecified.
    pub fn members(&self, role: RoleId) -> Vec<Address> {
        self.members
            .read()
            .get(&role)
            .map(CompactAddressSet::to_vec)
            .unwrap_or_default()
    }
}

impl AccessControl for InMemoryAccessControl {
    fn has_role(&self, role: RoleId, account: Address) -> bool {
        self.members
            .read()
            .get(&role)
            .is_some_and(|set| set.exists(&account))
    }

    fn grant_role(&self, role: RoleId, account: Address) -> bool {
        self.members
            .write()
            .entry(role)
            .or_default()
            .create(account)
            .is_ok()
    }

    fn revoke_role(&self, role: RoleId, account: Address) -> bool {
        let mut members = self.members.write();
        let Some(set) = members.get_mut(&role) else {
            return false;
        };
        let removed = set.remove(account).is_ok();
        if set.is_empty() {
            members.remove(&role);
        }
        removed
    }

    fn role_member_count(&self, role: RoleId) -> usize {
        self.members
            .read()
            .get(&role)
            .map_or(0, CompactAddressSet::length)
    }
}
