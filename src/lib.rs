//! Role-scoped user registration stored in a GitHub repository
//!
//! Each role (`resellerpanel`, `adminpanel`, `pantherpanel`, `owner`) owns a
//! JSON file in the repository. Registering reads that file through the
//! GitHub contents API, rejects a username that is already present, appends a
//! bcrypt-hashed record and writes the file back with the blob sha from the
//! read, so a concurrent writer makes the later write fail instead of being
//! silently overwritten.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use rolereg::config::StoreConfig;
//! use rolereg::models::RegistrationRequest;
//! use rolereg::services::RegistrationService;
//! use rolereg::store::GitHubContentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::new("ghp_example", "octo/users-db");
//! let store = Arc::new(GitHubContentStore::new(&config)?);
//! let service = RegistrationService::new(store, &config);
//!
//! let request = RegistrationRequest::validate(Some("owner"), Some("alice"), Some("s3cret"))?;
//! let record = service.register(request).await?;
//! println!("created {} at {}", record.username, record.created_at);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
