//! Core types shared across printwatch facilities
//!
//! This crate provides foundational types used by the tracker, the
//! logging facility and the engine:
//!
//! - **Correlation types**: SessionId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::SessionId;
