//! HTTP API modules
//!
//! One module per resource, each exposing a `router()` merged by the
//! server builder.

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod upload;
