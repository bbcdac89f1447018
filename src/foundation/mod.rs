//! Shared primitives: geometry re-exports, errors, ids and pixel math.

/// Geometry re-exports, canvas constants and premultiplied color.
pub mod core;
/// Error type and result alias.
pub mod error;
/// Layer and slide id generation.
pub mod ids;
pub(crate) mod math;
