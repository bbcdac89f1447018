//! Slide rendering.
//!
//! [`plan::compile_slide`] turns a slide and a viewport into a [`plan::RenderPlan`]; the
//! [`cpu::CpuRenderer`] executes plans on `vello_cpu`. Hit-testing lives next to the
//! geometry it shares with the selection overlay.

/// Frame type and backend trait.
pub mod backend;
pub(crate) mod blur;
/// `vello_cpu` raster backend.
pub mod cpu;
/// Image fit rectangle math.
pub mod fit;
/// Gradient rasterization.
pub mod gradient;
/// Layer hit-testing and handle geometry.
pub mod hit;
/// Slide to draw-op compilation.
pub mod plan;
/// Text wrapping and block layout.
pub mod text;
