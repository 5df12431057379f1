//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `EnergyError`, so functions can simply return `Result<T>`.
use crate::error::EnergyError;

/// Workspace-wide `Result` alias with `EnergyError` as the default error.
pub type Result<T, E = EnergyError> = std::result::Result<T, E>;
