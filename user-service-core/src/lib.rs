//! # User Service Core
//!
//! Data-access layer for the user service: user records, sequential
//! identifier allocation, and the repository that transport adapters call.
//!
//! ## Overview
//!
//! - [`user`]: the user record, its identifier, and the insertion token
//! - [`database`]: the collection port, the Postgres and in-memory adapters,
//!   and the [`StoreConnector`](database::StoreConnector) handle
//! - [`allocator`]: `max(id) + 1` identifier allocation
//! - [`repository`]: `create_user`, `get_user_by_id`, `get_users` with
//!   caller cancellation and a bounded list read
//! - [`error`]: the error taxonomy shared by all of the above
//!
//! ## Feature Flags
//!
//! - `postgres` (default): PostgreSQL collection via SQLx
//! - `pg-tests`: enables integration tests that need a live database
//!
//! ## Examples
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use tokio_util::sync::CancellationToken;
//! use user_service_core::{
//!     NewUser, UserRepository,
//!     database::{InMemoryUserCollection, StoreConnector},
//! };
//!
//! async fn create_first_user() -> Result<(), Box<dyn std::error::Error>> {
//!     let connector = StoreConnector::from_collection(
//!         Arc::new(InMemoryUserCollection::new()),
//!         Duration::from_secs(10),
//!     );
//!     let repository = UserRepository::new(connector);
//!
//!     let created = repository
//!         .create_user(NewUser::new("Ada"), &CancellationToken::new())
//!         .await?;
//!     assert_eq!(created.user.user_id.as_i64(), 1);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Sequential identifier allocation
pub mod allocator;

/// Store connector, collection port, and its adapters
pub mod database;

/// Error types and error handling utilities
pub mod error;

/// Repository facade consumed by the HTTP and RPC adapters
pub mod repository;

/// User record types
pub mod user;

pub use error::{BackendError, Result, UserStoreError};
pub use repository::UserRepository;
pub use user::{CreatedUser, InsertedId, NewUser, User, UserId};
