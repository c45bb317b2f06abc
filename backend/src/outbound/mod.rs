//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: a mutex-guarded store implementing the same ports, for
//!   development without a database and for scenario tests.
//! - **security**: Argon2id password hashing and HS256 session tokens.
//!
//! Adapters translate between domain types and infrastructure
//! representations; they hold no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
