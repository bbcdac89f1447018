use std::collections::HashMap;
use std::sync::Arc;

use kurbo::{RoundedRect, Shape};

use crate::assets::fonts::{FontBook, ShapedLine};
use crate::assets::images::ImageCache;
use crate::foundation::core::{Affine, BezPath, Rect};
use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::Fnv1a64;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::blur::blur_rgba8_premul;
use crate::render::fit::fit_image;
use crate::render::gradient::rasterize_gradient;
use crate::render::plan::{DrawOp, RenderPlan, Viewport, compile_slide};
use crate::render::text::{TextBlock, line_left};
use crate::scene::color::Color;
use crate::scene::layer::{Gradient, GradientKind, Shadow, TextStyle};
use crate::scene::slide::Slide;

/// Largest side of an offscreen shadow surface, in pixels.
const MAX_OFFSCREEN_PX: f64 = 4096.0;

/// Options for the CPU renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl RendererOpts {
    /// Return options with a configured clear color painted under the background.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
    source: Arc<Vec<u8>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    fingerprint: u64,
    w: u32,
    h: u32,
}

/// Raster renderer backed by `vello_cpu`.
///
/// Owns the image side table and the font book so that a slide can be painted or exported
/// with a single call. Images that are not loaded yet are skipped.
pub struct CpuRenderer {
    opts: RendererOpts,
    ctx: Option<vello_cpu::RenderContext>,
    images: ImageCache,
    fonts: FontBook,
    image_paint_cache: HashMap<String, ImagePaint>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl CpuRenderer {
    /// Renderer painting from `images` and shaping with `fonts`.
    pub fn new(images: ImageCache, fonts: FontBook, opts: RendererOpts) -> Self {
        Self {
            opts,
            ctx: None,
            images,
            fonts,
            image_paint_cache: HashMap::new(),
            gradient_cache: HashMap::new(),
        }
    }

    /// Image side table.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Mutable image side table, for preloading and polling.
    pub fn images_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    /// Mutable font book, for registering faces.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Compile `slide` for `viewport` using the registered fonts for measurement.
    pub fn compile(&mut self, slide: &Slide, viewport: &Viewport) -> RenderPlan {
        compile_slide(slide, viewport, &mut self.fonts)
    }

    /// Compile and paint `slide` for `viewport`.
    #[tracing::instrument(skip(self, slide), fields(slide = %slide.id))]
    pub fn render(&mut self, slide: &Slide, viewport: &Viewport) -> SlideResult<FrameRGBA> {
        let plan = self.compile(slide, viewport);
        self.render_plan(&plan)
    }

    /// Paint `slide` at 1080×1080 without overlays, loading its images synchronously first.
    pub fn export_frame(&mut self, slide: &Slide) -> SlideResult<FrameRGBA> {
        let urls: Vec<&str> = slide.layers.iter().flat_map(|l| l.image_urls()).collect();
        self.images.load_blocking(urls);
        self.render(slide, &Viewport::export())
    }

    /// [`CpuRenderer::export_frame`] encoded as PNG bytes.
    #[tracing::instrument(skip(self, slide), fields(slide = %slide.id))]
    pub fn export_flat(&mut self, slide: &Slide) -> SlideResult<Vec<u8>> {
        self.export_frame(slide)?.to_png()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> SlideResult<R>,
    ) -> SlideResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn image_paint_for(&mut self, url: &str) -> Option<ImagePaint> {
        let prepared = self.images.get(url)?.clone();
        if let Some(p) = self.image_paint_cache.get(url)
            && Arc::ptr_eq(&p.source, &prepared.rgba8_premul)
        {
            return Some(p.clone());
        }
        let paint = match rgba_premul_to_image(&prepared.rgba8_premul, prepared.width, prepared.height)
        {
            Ok(paint) => paint,
            Err(err) => {
                tracing::warn!(url, error = %err, "image cannot be painted; skipping");
                return None;
            }
        };
        let out = ImagePaint {
            paint,
            w: prepared.width,
            h: prepared.height,
            source: prepared.rgba8_premul,
        };
        self.image_paint_cache.insert(url.to_owned(), out.clone());
        Some(out)
    }

    fn gradient_paint(
        &mut self,
        gradient: &Gradient,
        w: u32,
        h: u32,
    ) -> SlideResult<vello_cpu::Image> {
        let key = GradientKey {
            fingerprint: gradient_fingerprint(gradient),
            w,
            h,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let bytes = rasterize_gradient(gradient, w, h);
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    fn draw_op(
        &mut self,
        op: &DrawOp,
        scale: f64,
        ctx: &mut vello_cpu::RenderContext,
    ) -> SlideResult<()> {
        let view = Affine::scale(scale);

        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillPath {
                path,
                transform,
                color,
                opacity,
                ..
            } => {
                ctx.set_transform(affine_to_cpu(view * *transform));
                ctx.set_paint(solid_paint(*color));
                let cpu_path = bezpath_to_cpu(path);
                with_opacity(ctx, *opacity, |ctx| ctx.fill_path(&cpu_path));
                Ok(())
            }
            DrawOp::Gradient { rect, gradient, .. } => {
                let iw = (rect.width() * scale).ceil().max(1.0) as u32;
                let ih = (rect.height() * scale).ceil().max(1.0) as u32;
                let img = self.gradient_paint(gradient, iw, ih)?;
                let tr = view
                    * Affine::translate(rect.origin().to_vec2())
                    * Affine::scale_non_uniform(
                        rect.width() / f64::from(iw),
                        rect.height() / f64::from(ih),
                    );
                ctx.set_transform(affine_to_cpu(tr));
                ctx.set_paint(img);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(iw),
                    f64::from(ih),
                ));
                Ok(())
            }
            DrawOp::Image {
                url,
                dest,
                fit,
                corner_radius,
                shadow,
                transform,
                opacity,
                ..
            } => {
                let Some(p) = self.image_paint_for(url) else {
                    tracing::trace!(url = %url, "image not ready; skipped");
                    return Ok(());
                };
                let placement = fit_image(*fit, *dest, p.w, p.h);
                let visible = placement.draw.intersect(placement.clip);
                if visible.width() <= 0.0 || visible.height() <= 0.0 {
                    return Ok(());
                }
                let outline = rounded_outline(visible, *corner_radius);
                let base = view * *transform;

                if let Some(s) = shadow {
                    let color_path = bezpath_to_cpu(&outline);
                    draw_shadow(ctx, visible, s, base, scale, *opacity, |c, tr, color| {
                        c.set_transform(affine_to_cpu(tr));
                        c.set_paint(solid_paint(color));
                        c.fill_path(&color_path);
                    })?;
                }

                let draw = placement.draw;
                ctx.set_transform(affine_to_cpu(base));
                ctx.set_paint_transform(affine_to_cpu(
                    Affine::translate(draw.origin().to_vec2())
                        * Affine::scale_non_uniform(
                            draw.width() / f64::from(p.w),
                            draw.height() / f64::from(p.h),
                        ),
                ));
                ctx.set_paint(p.paint);
                let cpu_path = bezpath_to_cpu(&outline);
                with_opacity(ctx, *opacity, |ctx| ctx.fill_path(&cpu_path));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                Ok(())
            }
            DrawOp::Text {
                block,
                style,
                transform,
                opacity,
                ..
            } => self.draw_text(block, style, view * *transform, scale, *opacity, ctx),
        }
    }

    fn draw_text(
        &mut self,
        block: &TextBlock,
        style: &TextStyle,
        base: Affine,
        scale: f64,
        opacity: f64,
        ctx: &mut vello_cpu::RenderContext,
    ) -> SlideResult<()> {
        let mut lines: Vec<(ShapedLine, f64, f64)> = Vec::with_capacity(block.lines.len());
        for line in &block.lines {
            if line.text.is_empty() {
                continue;
            }
            let Some(shaped) = self.fonts.shape_line(&line.text, style) else {
                continue;
            };
            let left = line_left(block.align, line.anchor_x, shaped.width);
            let top = line.center_y - shaped.height / 2.0;
            lines.push((shaped, left, top));
        }
        if lines.is_empty() {
            return Ok(());
        }

        let paint_lines = |c: &mut vello_cpu::RenderContext, tr: Affine, color: Color| {
            for (shaped, left, top) in &lines {
                paint_glyphs(c, shaped, tr * Affine::translate((*left, *top)), color);
            }
        };

        if let Some(s) = &style.text_shadow {
            let bounds = lines
                .iter()
                .map(|(shaped, left, top)| {
                    Rect::new(*left, *top, left + shaped.width, top + shaped.height)
                })
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO);
            draw_shadow(ctx, bounds, s, base, scale, opacity, paint_lines)?;
        }

        with_opacity(ctx, opacity, |ctx| paint_lines(ctx, base, style.color));
        Ok(())
    }
}

impl RenderBackend for CpuRenderer {
    fn render_plan(&mut self, plan: &RenderPlan) -> SlideResult<FrameRGBA> {
        let width: u16 = plan
            .width
            .try_into()
            .map_err(|_| SlideError::render("frame width exceeds u16"))?;
        let height: u16 = plan
            .height
            .try_into()
            .map_err(|_| SlideError::render("frame height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(SlideError::render("frame size must be non-zero"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.with_ctx_mut(width, height, |this, ctx| {
            if let Some([r, g, b, a]) = this.opts.clear_rgba {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }
            for op in &plan.ops {
                this.draw_op(op, plan.scale, ctx)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: plan.width,
            height: plan.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("opts", &self.opts)
            .field("images", &self.images)
            .field("fonts", &self.fonts)
            .finish()
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f64,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let opacity = opacity.clamp(0.0, 1.0) as f32;
    if opacity <= 0.0 {
        return;
    }
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
        f(ctx);
        ctx.pop_layer();
    } else {
        f(ctx);
    }
}

/// Paint a shadow of whatever `paint` draws, offset and blurred.
///
/// `paint` receives the context, the logical-to-device transform to draw with, and the shadow
/// color. Unblurred shadows go straight to `ctx`; blurred ones are rendered offscreen over
/// `bounds` (logical units, before the offset), blurred, then composited.
fn draw_shadow(
    ctx: &mut vello_cpu::RenderContext,
    bounds: Rect,
    shadow: &Shadow,
    base: Affine,
    scale: f64,
    opacity: f64,
    paint: impl Fn(&mut vello_cpu::RenderContext, Affine, Color),
) -> SlideResult<()> {
    let offset = Affine::translate((shadow.offset_x, shadow.offset_y));
    if shadow.blur <= 0.0 {
        with_opacity(ctx, opacity, |c| paint(c, base * offset, shadow.color));
        return Ok(());
    }

    let pad = shadow.blur * 1.5 + 1.0;
    let area = Rect::new(
        bounds.x0 + shadow.offset_x - pad,
        bounds.y0 + shadow.offset_y - pad,
        bounds.x1 + shadow.offset_x + pad,
        bounds.y1 + shadow.offset_y + pad,
    );
    let side = area.width().max(area.height()).max(1.0);
    let s = scale.min(MAX_OFFSCREEN_PX / side);
    let w = (area.width() * s).ceil().clamp(1.0, MAX_OFFSCREEN_PX) as u16;
    let h = (area.height() * s).ceil().clamp(1.0, MAX_OFFSCREEN_PX) as u16;

    let mut offscreen = vello_cpu::RenderContext::new(w, h);
    paint(
        &mut offscreen,
        Affine::scale(s) * Affine::translate(-area.origin().to_vec2()) * offset,
        shadow.color,
    );
    offscreen.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    offscreen.render_to_pixmap(&mut pixmap);

    let blurred = blur_rgba8_premul(
        pixmap.data_as_u8_slice(),
        u32::from(w),
        u32::from(h),
        shadow.blur * s,
    )?;
    let img = rgba_premul_to_image(&blurred, u32::from(w), u32::from(h))?;

    ctx.set_transform(affine_to_cpu(
        base * Affine::translate(area.origin().to_vec2()) * Affine::scale(1.0 / s),
    ));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(img);
    with_opacity(ctx, opacity, |c| {
        c.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ))
    });
    Ok(())
}

fn paint_glyphs(ctx: &mut vello_cpu::RenderContext, line: &ShapedLine, tr: Affine, color: Color) {
    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint(solid_paint(color));
    let glyphs = line.glyphs.iter().map(|g| vello_cpu::Glyph {
        id: g.id,
        x: g.x,
        y: g.y,
    });
    ctx.glyph_run(&line.font)
        .font_size(line.font_size)
        .fill_glyphs(glyphs);
}

fn rounded_outline(rect: Rect, radius: f64) -> BezPath {
    let r = radius.clamp(0.0, rect.width().min(rect.height()) / 2.0);
    if r > 0.0 {
        RoundedRect::from_rect(rect, r).to_path(0.1)
    } else {
        rect.to_path(0.1)
    }
}

fn gradient_fingerprint(g: &Gradient) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u8(match g.kind {
        GradientKind::Linear => 0,
        GradientKind::Radial => 1,
    });
    h.write_f64(g.angle);
    for stop in &g.stops {
        h.write_bytes(&[stop.color.r, stop.color.g, stop.color.b, stop.color.a]);
        h.write_f64(stop.position);
    }
    h.finish()
}

fn solid_paint(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlideResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SlideError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SlideError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SlideError::render("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> SlideResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
