use kurbo::{Circle, Line, RoundedRect, Shape, Stroke, StrokeOpts};

use crate::foundation::core::{
    Affine, BezPath, CANVAS_SIZE, GRID_DIVISIONS, HANDLE_SIZE_PX, Point, Rect, canvas_rect,
};
use crate::render::hit::{ResizeHandle, handle_box};
use crate::render::text::{TextBlock, TextMeasure, layout_text_block};
use crate::scene::color::Color;
use crate::scene::layer::{
    BackgroundLayer, BackgroundType, Gradient, ImageFit, ImageLayer, Layer, Shadow, ShapeLayer,
    ShapeType, TextLayer, TextStyle,
};
use crate::scene::slide::Slide;

const PATH_TOLERANCE: f64 = 0.1;
const SELECTION_COLOR: Color = Color::rgb(0x3b, 0x82, 0xf6);
const GRID_COLOR: Color = Color::rgba(0, 0, 0, 26);
const GRID_CENTER_COLOR: Color = Color::rgba(0x3b, 0x82, 0xf6, 128);

/// What to render and how the logical canvas maps to pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Pixels per logical unit.
    pub zoom: f64,
    /// Draw the grid overlay.
    pub show_grid: bool,
    /// Draw the selection overlay around this layer.
    pub selected_layer_id: Option<String>,
    /// On-screen handle size in pixels.
    pub handle_px: f64,
}

impl Viewport {
    /// Full-resolution export: 1080×1080, zoom 1, no overlays.
    pub fn export() -> Self {
        Self {
            width: CANVAS_SIZE as u32,
            height: CANVAS_SIZE as u32,
            zoom: 1.0,
            show_grid: false,
            selected_layer_id: None,
            handle_px: HANDLE_SIZE_PX,
        }
    }

    /// On-screen editor view sized to the zoomed canvas.
    pub fn editor(zoom: f64, show_grid: bool, selected_layer_id: Option<String>) -> Self {
        let side = (CANVAS_SIZE * zoom).round().max(1.0) as u32;
        Self {
            width: side,
            height: side,
            zoom,
            show_grid,
            selected_layer_id,
            handle_px: HANDLE_SIZE_PX,
        }
    }

    /// Same viewport with a different handle size.
    pub fn with_handle_px(mut self, handle_px: f64) -> Self {
        self.handle_px = handle_px;
        self
    }
}

/// Backend-agnostic paint plan for one slide.
///
/// All geometry is in logical canvas units; backends scale by [`RenderPlan::scale`].
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Pixels per logical unit.
    pub scale: f64,
    /// Ordered draw operations; later ops paint on top.
    pub ops: Vec<DrawOp>,
}

impl RenderPlan {
    /// Layer ids in paint order, one entry per layer.
    pub fn layer_sequence(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for id in self.ops.iter().filter_map(DrawOp::layer_id) {
            if out.last() != Some(&id) {
                out.push(id);
            }
        }
        out
    }

    /// Image URLs the plan will try to paint.
    pub fn image_urls(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Draw operation emitted by [`compile_slide`].
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill path geometry with a flat color.
    FillPath {
        /// Originating layer; `None` for overlays.
        layer_id: Option<String>,
        /// Geometry in logical units.
        path: BezPath,
        /// Layer-local rotation.
        transform: Affine,
        /// Straight-alpha color.
        color: Color,
        /// Opacity multiplier in `[0, 1]`.
        opacity: f64,
    },
    /// Fill a rectangle with a rasterised gradient.
    Gradient {
        /// Originating layer.
        layer_id: String,
        /// Area the gradient spans.
        rect: Rect,
        /// Gradient description.
        gradient: Gradient,
    },
    /// Draw a cached image fitted into a box.
    Image {
        /// Originating layer.
        layer_id: String,
        /// Image cache key.
        url: String,
        /// Destination box.
        dest: Rect,
        /// Placement in the box.
        fit: ImageFit,
        /// Rounded clip corner radius; 0 for none.
        corner_radius: f64,
        /// Optional drop shadow under the image.
        shadow: Option<Shadow>,
        /// Layer-local rotation.
        transform: Affine,
        /// Opacity multiplier in `[0, 1]`.
        opacity: f64,
    },
    /// Draw a laid-out text block.
    Text {
        /// Originating layer.
        layer_id: String,
        /// Lines and their placement.
        block: TextBlock,
        /// Typography.
        style: TextStyle,
        /// Layer-local rotation.
        transform: Affine,
        /// Opacity multiplier in `[0, 1]`.
        opacity: f64,
    },
}

impl DrawOp {
    /// Originating layer id, if the op belongs to a layer.
    pub fn layer_id(&self) -> Option<&str> {
        match self {
            DrawOp::FillPath { layer_id, .. } => layer_id.as_deref(),
            DrawOp::Gradient { layer_id, .. }
            | DrawOp::Image { layer_id, .. }
            | DrawOp::Text { layer_id, .. } => Some(layer_id),
        }
    }
}

/// Compile a slide into a [`RenderPlan`].
///
/// The background paints first, then visible layers ascending by zIndex (list order on
/// ties). Grid and selection overlays follow when the viewport asks for them.
#[tracing::instrument(skip(slide, measure), fields(slide = %slide.id, layers = slide.layers.len()))]
pub fn compile_slide(
    slide: &Slide,
    viewport: &Viewport,
    measure: &mut dyn TextMeasure,
) -> RenderPlan {
    let mut ops = Vec::new();
    for layer in slide.paint_order() {
        if !layer.is_visible() {
            continue;
        }
        match layer {
            Layer::Background(bg) => compile_background(bg, &mut ops),
            Layer::Shape(shape) => compile_shape(shape, &mut ops),
            Layer::Image(img) => compile_image(img, &mut ops),
            Layer::Text(text) => compile_text(text, measure, &mut ops),
        }
    }

    let scale = if viewport.zoom > 0.0 { viewport.zoom } else { 1.0 };
    if viewport.show_grid {
        compile_grid(scale, &mut ops);
    }
    if let Some(sel) = viewport.selected_layer_id.as_deref()
        && let Some(t) = slide
            .layer(sel)
            .filter(|l| l.is_visible())
            .and_then(Layer::transform)
    {
        compile_selection(t.rect(), scale, viewport.handle_px, &mut ops);
    }

    tracing::debug!(ops = ops.len(), "slide compiled");
    RenderPlan {
        width: viewport.width,
        height: viewport.height,
        scale,
        ops,
    }
}

fn rect_path(rect: Rect) -> BezPath {
    rect.to_path(PATH_TOLERANCE)
}

fn stroke_outline(path: &BezPath, width: f64, dash: Option<[f64; 2]>) -> BezPath {
    let mut style = Stroke::new(width);
    if let Some(pattern) = dash {
        style = style.with_dashes(0.0, pattern);
    }
    kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), PATH_TOLERANCE)
}

fn compile_background(bg: &BackgroundLayer, ops: &mut Vec<DrawOp>) {
    let canvas = canvas_rect();
    let solid = |ops: &mut Vec<DrawOp>| {
        ops.push(DrawOp::FillPath {
            layer_id: Some(bg.id.clone()),
            path: rect_path(canvas),
            transform: Affine::IDENTITY,
            color: bg.color,
            opacity: 1.0,
        });
    };

    match bg.background_type {
        BackgroundType::Solid => solid(ops),
        BackgroundType::Gradient => match &bg.gradient {
            Some(g) if !g.stops.is_empty() => ops.push(DrawOp::Gradient {
                layer_id: bg.id.clone(),
                rect: canvas,
                gradient: g.clone(),
            }),
            _ => solid(ops),
        },
        BackgroundType::Image => {
            solid(ops);
            if let Some(url) = bg.image_url.as_deref().filter(|u| !u.is_empty()) {
                ops.push(DrawOp::Image {
                    layer_id: bg.id.clone(),
                    url: url.to_owned(),
                    dest: canvas,
                    fit: bg.image_fit,
                    corner_radius: 0.0,
                    shadow: None,
                    transform: Affine::IDENTITY,
                    opacity: bg.image_opacity.clamp(0.0, 1.0),
                });
            }
        }
    }
}

fn compile_shape(shape: &ShapeLayer, ops: &mut Vec<DrawOp>) {
    let t = &shape.transform;
    let transform = t.rotation_affine();
    let opacity = t.effective_opacity();
    let layer_id = Some(shape.id.clone());

    let (outline, fill) = match shape.shape_type {
        ShapeType::Rectangle => {
            let rect = t.rect();
            let radius = shape
                .border_radius
                .unwrap_or(0.0)
                .clamp(0.0, rect.width().min(rect.height()) / 2.0);
            let path = if radius > 0.0 {
                RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE)
            } else {
                rect_path(rect)
            };
            (path, shape.fill)
        }
        ShapeType::Circle => {
            let r = t.width.abs().min(t.height.abs()) / 2.0;
            (Circle::new(t.center(), r).to_path(PATH_TOLERANCE), shape.fill)
        }
        ShapeType::Line => {
            let line = Line::new(
                Point::new(t.x, t.y),
                Point::new(t.x + t.width, t.y + t.height),
            );
            (line.to_path(PATH_TOLERANCE), None)
        }
    };

    if let Some(color) = fill {
        ops.push(DrawOp::FillPath {
            layer_id: layer_id.clone(),
            path: outline.clone(),
            transform,
            color,
            opacity,
        });
    }

    let stroke = match shape.shape_type {
        // A line with no stroke color still shows, using its fill or black.
        ShapeType::Line => Some((
            shape.stroke.or(shape.fill).unwrap_or(Color::BLACK),
            shape.stroke_width.max(1.0),
        )),
        _ => shape
            .stroke
            .filter(|_| shape.stroke_width > 0.0)
            .map(|c| (c, shape.stroke_width)),
    };
    if let Some((color, width)) = stroke {
        ops.push(DrawOp::FillPath {
            layer_id,
            path: stroke_outline(&outline, width, None),
            transform,
            color,
            opacity,
        });
    }
}

fn compile_image(img: &ImageLayer, ops: &mut Vec<DrawOp>) {
    if img.src.is_empty() {
        return;
    }
    let t = &img.transform;
    ops.push(DrawOp::Image {
        layer_id: img.id.clone(),
        url: img.src.clone(),
        dest: t.rect(),
        fit: img.fit,
        corner_radius: img.border_radius.unwrap_or(0.0).max(0.0),
        shadow: img.shadow.clone(),
        transform: t.rotation_affine(),
        opacity: t.effective_opacity(),
    });
}

fn compile_text(text: &TextLayer, measure: &mut dyn TextMeasure, ops: &mut Vec<DrawOp>) {
    let block = layout_text_block(text, measure);
    if block.lines.iter().all(|l| l.text.trim().is_empty()) {
        return;
    }
    ops.push(DrawOp::Text {
        layer_id: text.id.clone(),
        block,
        style: text.style.clone(),
        transform: text.transform.rotation_affine(),
        opacity: text.transform.effective_opacity(),
    });
}

fn overlay(path: BezPath, color: Color, ops: &mut Vec<DrawOp>) {
    ops.push(DrawOp::FillPath {
        layer_id: None,
        path,
        transform: Affine::IDENTITY,
        color,
        opacity: 1.0,
    });
}

fn compile_grid(scale: f64, ops: &mut Vec<DrawOp>) {
    let step = CANVAS_SIZE / f64::from(GRID_DIVISIONS);
    let thin = 1.0 / scale;
    let thick = 2.0 / scale;
    for i in 1..GRID_DIVISIONS {
        let at = step * f64::from(i);
        let centre = i * 2 == GRID_DIVISIONS;
        let (w, color) = if centre {
            (thick, GRID_CENTER_COLOR)
        } else {
            (thin, GRID_COLOR)
        };
        let v = Rect::new(at - w / 2.0, 0.0, at + w / 2.0, CANVAS_SIZE);
        let h = Rect::new(0.0, at - w / 2.0, CANVAS_SIZE, at + w / 2.0);
        overlay(rect_path(v), color, ops);
        overlay(rect_path(h), color, ops);
    }
}

fn compile_selection(rect: Rect, scale: f64, handle_px: f64, ops: &mut Vec<DrawOp>) {
    let dash = [6.0 / scale, 4.0 / scale];
    overlay(
        stroke_outline(&rect_path(rect), 2.0 / scale, Some(dash)),
        SELECTION_COLOR,
        ops,
    );
    for h in ResizeHandle::PRIORITY {
        let b = handle_box(h.position(rect), scale, handle_px);
        overlay(rect_path(b), Color::WHITE, ops);
        overlay(
            stroke_outline(&rect_path(b), 1.5 / scale, None),
            SELECTION_COLOR,
            ops,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
