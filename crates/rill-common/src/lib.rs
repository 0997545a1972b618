//! Common types and utilities shared across Rill components.

pub mod error;

pub use error::{Error, Result};

/// Re-export commonly used external types
pub use bytes::Bytes;
