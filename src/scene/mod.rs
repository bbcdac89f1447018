//! Slide scene model.
//!
//! Everything here is plain data with serde support; the camelCase field names match the
//! session store's JSON.

/// Straight-alpha color value.
pub mod color;
/// Slide list plus editing cursor.
pub mod document;
/// Layer variants and their styles.
pub mod layer;
/// Structural repair of external slide lists.
pub mod repair;
/// Slides and legacy migration.
pub mod slide;
