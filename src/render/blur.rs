use crate::foundation::error::{SlideError, SlideResult};

const Q16_ONE: i64 = 1 << 16;

/// Normalised 1-D gaussian taps in Q16 fixed point, summing to exactly `1 << 16`.
struct Kernel {
    taps: Vec<u32>,
    radius: usize,
}

impl Kernel {
    /// Kernel for a CSS shadow blur: sigma is half the blur value, taps reach three sigma.
    fn for_css_blur(blur: f64) -> Self {
        let sigma = blur / 2.0;
        let radius = (sigma * 3.0).ceil().max(1.0) as usize;
        let denom = 2.0 * sigma * sigma;
        let raw: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-x * x / denom).exp()
            })
            .collect();
        let total: f64 = raw.iter().sum();

        let mut taps: Vec<u32> = raw
            .iter()
            .map(|w| ((w / total) * Q16_ONE as f64).round() as u32)
            .collect();
        // Rounding drift goes to the centre tap.
        let drift = Q16_ONE - taps.iter().map(|&t| i64::from(t)).sum::<i64>();
        taps[radius] = (i64::from(taps[radius]) + drift).clamp(0, Q16_ONE) as u32;
        Self { taps, radius }
    }
}

/// Separable gaussian blur of a premultiplied RGBA8 buffer.
///
/// `blur` follows the CSS shadow convention: sigma is half the blur radius. Pixels outside
/// the buffer count as transparent, so blurred content fades out at the edges.
pub fn blur_rgba8_premul(src: &[u8], width: u32, height: u32, blur: f64) -> SlideResult<Vec<u8>> {
    let (w, h) = (width as usize, height as usize);
    if src.len() != w.saturating_mul(h).saturating_mul(4) {
        return Err(SlideError::render("blur buffer does not match its size"));
    }
    if !blur.is_finite() || blur <= 0.0 || w == 0 || h == 0 {
        return Ok(src.to_vec());
    }
    let kernel = Kernel::for_css_blur(blur);

    let mut tmp = vec![0u8; src.len()];
    let mut dst = vec![0u8; src.len()];
    // Rows, then columns.
    blur_pass(src, &mut tmp, &kernel, w, h, 4, w * 4);
    blur_pass(&tmp, &mut dst, &kernel, h, w, w * 4, 4);
    Ok(dst)
}

/// Convolve `lines` runs of `len` pixels each; `step` is the byte distance between
/// neighbours in a run and `line_step` the distance between runs.
fn blur_pass(
    src: &[u8],
    dst: &mut [u8],
    kernel: &Kernel,
    len: usize,
    lines: usize,
    step: usize,
    line_step: usize,
) {
    for line in 0..lines {
        let base = line * line_step;
        for i in 0..len {
            let mut acc = [0u64; 4];
            for (k, &tap) in kernel.taps.iter().enumerate() {
                let Some(j) = (i + k).checked_sub(kernel.radius).filter(|&j| j < len) else {
                    continue;
                };
                let idx = base + j * step;
                for (a, &c) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                    *a += u64::from(tap) * u64::from(c);
                }
            }
            let out = base + i * step;
            for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                *d = ((a + 32768) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
