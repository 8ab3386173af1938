//! Shared utilities for the QuillSync workspace.
//!
//! Time handling and logging setup used by the server binary and its tests.

pub mod logger;
pub mod time;
