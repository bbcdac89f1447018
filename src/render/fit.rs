use crate::foundation::core::Rect;
use crate::scene::layer::ImageFit;

/// Where a `src_w × src_h` image lands for a destination box.
///
/// `draw` is the rectangle the whole image is scaled into; it may extend past `dest` for
/// [`ImageFit::Cover`], in which case painting is clipped to `dest`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitPlacement {
    /// Full image rectangle.
    pub draw: Rect,
    /// Visible region.
    pub clip: Rect,
}

/// Place an image into `dest` per `fit`, centred.
pub fn fit_image(fit: ImageFit, dest: Rect, src_w: u32, src_h: u32) -> FitPlacement {
    let (sw, sh) = (f64::from(src_w.max(1)), f64::from(src_h.max(1)));
    let (dw, dh) = (dest.width(), dest.height());
    let draw = match fit {
        ImageFit::Fill => dest,
        ImageFit::Cover | ImageFit::Contain => {
            let sx = dw / sw;
            let sy = dh / sh;
            let s = if fit == ImageFit::Cover {
                sx.max(sy)
            } else {
                sx.min(sy)
            };
            let (w, h) = (sw * s, sh * s);
            let x0 = dest.x0 + (dw - w) / 2.0;
            let y0 = dest.y0 + (dh - h) / 2.0;
            Rect::new(x0, y0, x0 + w, y0 + h)
        }
    };
    FitPlacement { draw, clip: dest }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
