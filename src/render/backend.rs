use crate::assets::decode::encode_png_premul;
use crate::foundation::error::{SlideError, SlideResult};
use crate::render::plan::RenderPlan;

/// A rendered slide as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> SlideResult<Vec<u8>> {
        if !self.premultiplied {
            return Err(SlideError::render("expected a premultiplied frame"));
        }
        encode_png_premul(self.width, self.height, &self.data)
    }
}

/// A renderer that can execute a compiled [`RenderPlan`] into a [`FrameRGBA`].
pub trait RenderBackend {
    /// Execute a plan and read back the final frame.
    fn render_plan(&mut self, plan: &RenderPlan) -> SlideResult<FrameRGBA>;
}
