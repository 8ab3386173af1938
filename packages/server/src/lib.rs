//! Collaborative text editing room server library.
//!
//! Coordinates named rooms in which participants share a document body and a
//! comment thread over WebSocket, with a read-only HTTP status surface.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
