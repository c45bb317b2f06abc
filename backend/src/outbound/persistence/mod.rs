//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` pooling.
//!
//! - Adapters only translate between row structs and domain types; rules
//!   live in the domain services.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Multi-statement writes run inside a single transaction.
//!
//! # Example
//!
//! ```no_run
//! use nexus::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), nexus::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/nexus")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_analytics_repository;
mod diesel_basic_error_mapping;
mod diesel_notification_repository;
mod diesel_project_repository;
mod diesel_task_repository;
mod diesel_user_repository;
mod diesel_workspace_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_analytics_repository::DieselAnalyticsRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_workspace_repository::DieselWorkspaceRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
