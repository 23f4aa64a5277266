// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Engine error types.

use crate::models::CityId;
use crate::services::land::LandError;

/// Errors surfaced by the safe-zone engine.
///
/// Degenerate inputs (empty land, no restricted places, zones filtered away)
/// are not errors; they produce empty results.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Land geometry not configured for city {0}")]
    LandNotConfigured(CityId),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Invalid configuration for city {city}: {reason}")]
    InvalidCity { city: CityId, reason: String },

    #[error("Geometry operation '{operation}' failed: {detail}")]
    GeometryOperation {
        operation: &'static str,
        detail: String,
    },

    #[error("Land geometry error: {0}")]
    Land(#[from] LandError),
}

impl EngineError {
    /// Configuration problems are fatal for a sync run and should not be retried.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::LandNotConfigured(_)
                | EngineError::UnknownCity(_)
                | EngineError::InvalidCity { .. }
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
