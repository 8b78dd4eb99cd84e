//! Session-level scenario tests.
//!
//! - `integration.rs`: end-to-end flows through [`Session`](crate::session::Session)
//!   with every collaborator recorded
//! - `properties.rs`: property-based checks of the resolver invariants
//! - `helpers.rs`: layouts and session factories shared by both

mod helpers;

pub use helpers::*;
