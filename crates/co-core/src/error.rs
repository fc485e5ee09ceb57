//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::RouteId;

/// The error type for `co-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("route {0} is not registered")]
    UnknownRoute(RouteId),

    #[error("route {0} is registered twice")]
    DuplicateRoute(RouteId),

    #[error("route {0} has no edges")]
    EmptyRoute(RouteId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `co-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
