//! Domain logic for the timekeep backend.
//!
//! This crate has zero internal dependencies so the repository layer, the
//! API server, and any future CLI tooling can all build on it.

pub mod apply;
pub mod error;
pub mod template;
pub mod types;
pub mod wallclock;
