//! Shared types and view-state logic for the marchés dashboard.
//!
//! Everything in this crate is target independent: the Yew frontend renders
//! and drives it, the host uses the route table, and the tests run natively.

pub mod error;
pub mod geo;
pub mod handoff;
pub mod model;
pub mod pagination;
pub mod route;
pub mod sequence;
pub mod state;
pub mod stats;
pub mod sync;
pub mod tree;
pub mod validation;
