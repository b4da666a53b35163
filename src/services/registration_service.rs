use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::RegistrationError;
use crate::models::{RegistrationRequest, Role, RoleRecordSet, UserRecord};
use crate::store::{decode_records, encode_records, ConcurrencyToken, ContentStore, ContentUpdate};

use super::password_service::hash_password;

/// Read-modify-write registration against one repository.
///
/// Each call reads the role's file, appends one record and writes the file
/// back with the token from the read. Nothing is cached or locked between
/// calls; a concurrent writer makes the later write fail instead.
pub struct RegistrationService {
    store: Arc<dyn ContentStore>,
    base_path: String,
    bcrypt_cost: u32,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn ContentStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            base_path: config.base_path.clone(),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub fn store_path(&self, role: Role) -> String {
        role.store_path(&self.base_path)
    }

    pub async fn register(&self, request: RegistrationRequest) -> Result<UserRecord, RegistrationError> {
        self.register_at(request, Utc::now()).await
    }

    /// Same as [`register`](Self::register) with the creation time supplied.
    pub async fn register_at(
        &self,
        request: RegistrationRequest,
        created_at: DateTime<Utc>,
    ) -> Result<UserRecord, RegistrationError> {
        let (mut set, token) = self.read_record_set(request.role).await?;
        let record = self.add_user(&mut set, &request, created_at).await?;
        self.write_record_set(&set, &request.username, token).await?;
        tracing::info!(
            role = %request.role,
            username = %request.username,
            total = set.len(),
            "Registered user"
        );
        Ok(record)
    }

    /// Current records for `role`. A missing file is an empty set with no token.
    pub async fn read_record_set(
        &self,
        role: Role,
    ) -> Result<(RoleRecordSet, Option<ConcurrencyToken>), RegistrationError> {
        let path = self.store_path(role);
        let stored = self
            .store
            .get_content(&path)
            .await
            .map_err(RegistrationError::StoreUnavailable)?;

        match stored {
            Some(content) => {
                let records = decode_records(&content.encoded).map_err(RegistrationError::CorruptStore)?;
                tracing::debug!(%path, count = records.len(), "Loaded record set");
                Ok((RoleRecordSet { role, records }, Some(content.token)))
            }
            None => {
                tracing::debug!(%path, "No record set yet, starting empty");
                Ok((RoleRecordSet::empty(role), None))
            }
        }
    }

    /// Rejects a taken username before hashing; otherwise appends the new record.
    pub async fn add_user(
        &self,
        set: &mut RoleRecordSet,
        request: &RegistrationRequest,
        created_at: DateTime<Utc>,
    ) -> Result<UserRecord, RegistrationError> {
        if set.contains(&request.username) {
            return Err(RegistrationError::DuplicateUsername {
                role: set.role,
                username: request.username.clone(),
            });
        }
        let password_hash = hash_password(&request.password, self.bcrypt_cost).await?;
        let record = UserRecord::new(request.username.clone(), password_hash, created_at);
        set.records.push(record.clone());
        Ok(record)
    }

    /// Replaces the role's file. `token` must be the one returned by the read.
    pub async fn write_record_set(
        &self,
        set: &RoleRecordSet,
        username: &str,
        token: Option<ConcurrencyToken>,
    ) -> Result<(), RegistrationError> {
        let encoded = encode_records(&set.records).map_err(RegistrationError::CorruptStore)?;
        let update = ContentUpdate {
            message: format!("Add user {} to {}", username, set.role),
            encoded,
            token,
        };
        self.store
            .put_content(&self.store_path(set.role), update)
            .await
            .map_err(RegistrationError::StoreWriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::verify_password;
    use crate::store::{MemoryContentStore, StoreError};
    use crate::config::MIN_BCRYPT_COST;
    use chrono::TimeZone;

    fn service(store: Arc<MemoryContentStore>) -> RegistrationService {
        let config = StoreConfig::new("t", "octo/db").with_bcrypt_cost(MIN_BCRYPT_COST);
        RegistrationService::new(store, &config)
    }

    fn request(role: &str, username: &str, password: &str) -> RegistrationRequest {
        RegistrationRequest::validate(Some(role), Some(username), Some(password)).unwrap()
    }

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_registration_creates_file() {
        let store = Arc::new(MemoryContentStore::new());
        let svc = service(store.clone());

        let record = svc.register_at(request("owner", "alice", "pw"), jan_first()).await.unwrap();
        assert_eq!(record.username, "alice");
        assert_eq!(record.created_at, "2024-01-01T00:00:00.000Z");

        let stored = decode_records(&store.contents("database/user/owner.json").unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], record);
        assert_ne!(stored[0].password_hash, "pw");
        assert!(verify_password(&stored[0].password_hash, "pw"));
        assert_eq!(
            store.last_message("database/user/owner.json").as_deref(),
            Some("Add user alice to owner")
        );
    }

    #[tokio::test]
    async fn test_appends_preserving_order() {
        let store = Arc::new(MemoryContentStore::new());
        let svc = service(store.clone());
        for name in ["alice", "bob", "carol"] {
            svc.register(request("adminpanel", name, "pw")).await.unwrap();
        }
        let (set, token) = svc.read_record_set(Role::AdminPanel).await.unwrap();
        let names: Vec<_> = set.records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
        assert!(token.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_skips_hash_and_write() {
        let store = Arc::new(MemoryContentStore::new());
        let svc = service(store.clone());
        svc.register(request("owner", "alice", "pw")).await.unwrap();
        let before = store.contents("database/user/owner.json");

        for _ in 0..2 {
            let err = svc.register(request("owner", "  alice ", "other")).await.unwrap_err();
            assert!(matches!(
                err,
                RegistrationError::DuplicateUsername { role: Role::Owner, ref username } if username == "alice"
            ));
        }
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.contents("database/user/owner.json"), before);
    }

    #[tokio::test]
    async fn test_roles_are_independent() {
        let store = Arc::new(MemoryContentStore::new());
        let svc = service(store.clone());
        svc.register(request("owner", "alice", "pw")).await.unwrap();
        svc.register(request("resellerpanel", "alice", "pw")).await.unwrap();
        assert!(store.contents("database/user/resellerpanel.json").is_some());
    }

    #[tokio::test]
    async fn test_stale_token_fails_write() {
        let store = Arc::new(MemoryContentStore::new());
        let svc = service(store.clone());
        svc.register(request("owner", "alice", "pw")).await.unwrap();

        let (mut set, stale) = svc.read_record_set(Role::Owner).await.unwrap();
        svc.register(request("owner", "bob", "pw")).await.unwrap();

        let late = request("owner", "carol", "pw");
        svc.add_user(&mut set, &late, jan_first()).await.unwrap();
        let err = svc.write_record_set(&set, "carol", stale).await.unwrap_err();
        assert!(matches!(err, RegistrationError::StoreWriteFailed(StoreError::Conflict { .. })));

        let (current, _) = svc.read_record_set(Role::Owner).await.unwrap();
        assert!(current.contains("bob"));
        assert!(!current.contains("carol"));
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let store = Arc::new(MemoryContentStore::new().with_file("database/user/owner.json", "e30="));
        let svc = service(store.clone());
        let err = svc.register(request("owner", "alice", "pw")).await.unwrap_err();
        assert!(matches!(err, RegistrationError::CorruptStore(_)));
        assert_eq!(store.write_count(), 0);
    }
}
