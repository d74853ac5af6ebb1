//! UI state machines driven by the frontend components.

pub mod dialog;
pub mod map;
