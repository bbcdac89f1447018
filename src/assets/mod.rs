//! Image and font assets used while painting.

/// Image decoding and PNG encoding.
pub mod decode;
/// Font registration and text shaping.
pub mod fonts;
/// Asynchronous image cache.
pub mod images;
