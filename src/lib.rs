//! Library crate for boards-play, exposing the session state layer to the console binary and integration tests.

/// Runtime configuration.
pub mod config;
/// Persistence of session slots.
pub mod dao;
/// Outward-facing serialisable types.
pub mod dto;
/// Console error types.
pub mod error;
/// Session orchestration and the host console.
pub mod services;
/// Domain state of a board session.
pub mod state;
