//! Geometry error types

use std::io;
use thiserror::Error;

use crate::context::{ContextId, GeometryKey};

/// Errors raised when releasing geometry from a context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The context was torn down or never existed
    #[error("unknown render context {0:?}")]
    UnknownContext(ContextId),

    /// The geometry slot is empty
    #[error("geometry {key:?} already released from context {context:?}")]
    AlreadyReleased {
        context: ContextId,
        key: GeometryKey,
    },
}

/// Errors from font loading and text shaping
#[derive(Error, Debug)]
pub enum TextError {
    /// Font data could not be parsed
    #[error("Failed to parse font: {0}")]
    FontParse(String),

    /// No font registered under the requested name and no fallback
    #[error("Font not found: {0}")]
    FontNotFound(String),

    /// The shaping engine rejected the font
    #[error("Failed to shape text with font {0}")]
    Shaping(String),
}

/// Errors from loading a [`GeometryConfig`](crate::config::GeometryConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
