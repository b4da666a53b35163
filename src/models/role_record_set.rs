use crate::models::{Role, UserRecord};

/// The records stored for one role, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecordSet {
    pub role: Role,
    pub records: Vec<UserRecord>,
}

impl RoleRecordSet {
    pub fn empty(role: Role) -> Self {
        Self { role, records: Vec::new() }
    }

    /// Case-sensitive exact match.
    pub fn contains(&self, username: &str) -> bool {
        self.records.iter().any(|r| r.username == username)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
