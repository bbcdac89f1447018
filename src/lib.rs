//! slidecraft is the core of a layered slide editor.
//!
//! Slides are square 1080×1080 canvases built from stacked layers (background, text,
//! image, shape). The crate covers:
//!
//! - the scene model ([`Slide`], [`Layer`], [`Document`]) with serde support
//! - rendering: [`compile_slide`] produces a [`RenderPlan`], [`CpuRenderer`] paints it and
//!   exports PNG
//! - editing: [`EditorStore`] with bounded snapshot undo/redo, driven by the
//!   [`InteractionController`] for pointer move/resize
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod assets;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod session;

pub use crate::foundation::core::{
    Affine, BezPath, CANVAS_SIZE, Point, Rect, Rgba8Premul, Vec2, canvas_rect,
};
pub use crate::foundation::error::{SlideError, SlideResult};

pub use crate::assets::decode::PreparedImage;
pub use crate::assets::fonts::FontBook;
pub use crate::assets::images::{FsImageSource, ImageCache, ImageSource, ImageState};
pub use crate::render::backend::{FrameRGBA, RenderBackend};
pub use crate::render::cpu::{CpuRenderer, RendererOpts};
pub use crate::render::hit::{ResizeHandle, hit_test};
pub use crate::render::plan::{DrawOp, RenderPlan, Viewport, compile_slide};
pub use crate::scene::color::Color;
pub use crate::scene::document::Document;
pub use crate::scene::layer::{
    BackgroundLayer, BackgroundType, FontWeight, Gradient, GradientKind, GradientStop,
    ImageFit, ImageLayer, Layer, LayerKind, Shadow, ShapeLayer, ShapeType, TextAlign,
    TextLayer, TextOverflow, TextStyle, TextTransform, Transform,
};
pub use crate::scene::repair::{RepairReport, repair_slides, validate_slides};
pub use crate::scene::slide::{LegacySlide, Slide, SlideType, migrate_legacy};
pub use crate::session::bulk_edit::{BrandContext, BulkEditRequest, BulkEditService};
pub use crate::session::history::{History, HistoryEntry};
pub use crate::session::interaction::{Cursor, DragMode, InteractionController};
pub use crate::session::opts::EditorOpts;
pub use crate::session::store::EditorStore;
