//! Task Nexus backend library.
//!
//! Hexagonal layout: `domain` holds types, services and ports; `inbound`
//! serves them over HTTP; `outbound` implements the driven ports on
//! PostgreSQL, in memory and with the security primitives.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
