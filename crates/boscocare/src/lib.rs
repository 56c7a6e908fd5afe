//! BoscoCare school administration service library.
//!
//! The crate is organized around workflow modules: each owns its domain
//! types, a repository seam over the record store, a service facade that
//! enforces the workflow's invariants, and the HTTP router exposing it.

pub mod config;
pub mod error;
pub mod identity;
pub mod telemetry;
pub mod workflows;
