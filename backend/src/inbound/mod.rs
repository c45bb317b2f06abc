//! Inbound adapters translating external requests into domain port calls.
//!
//! - **http**: REST endpoints served by Actix Web.

pub mod http;
