use crate::foundation::core::{HANDLE_SIZE_PX, MIN_LAYER_SIZE};

/// Default number of undo snapshots kept.
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Options controlling an [`EditorStore`](crate::session::store::EditorStore) and its
/// interaction controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorOpts {
    /// Maximum number of history entries; the oldest is evicted past this.
    pub history_cap: usize,
    /// Smallest zoom factor.
    pub min_zoom: f64,
    /// Largest zoom factor.
    pub max_zoom: f64,
    /// Increment applied by `zoom_in` / `zoom_out`.
    pub zoom_step: f64,
    /// Side of a resize handle in screen pixels.
    pub handle_size_px: f64,
    /// Lower bound for layer width and height during resize, logical units.
    pub min_layer_size: f64,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            min_zoom: 0.25,
            max_zoom: 2.0,
            zoom_step: 0.1,
            handle_size_px: HANDLE_SIZE_PX,
            min_layer_size: MIN_LAYER_SIZE,
        }
    }
}

impl EditorOpts {
    /// Defaults with `SLIDECRAFT_HISTORY_CAP` applied when set to a positive integer.
    pub fn from_env() -> Self {
        let opts = Self::default();
        match std::env::var("SLIDECRAFT_HISTORY_CAP")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            Some(cap) => opts.with_history_cap(cap),
            None => opts,
        }
    }

    /// Return options with a different history cap (at least 1).
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self
    }

    /// Return options with a different zoom range. Bounds are reordered if swapped.
    pub fn with_zoom_range(mut self, min: f64, max: f64) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.min_zoom = lo.max(f64::EPSILON);
        self.max_zoom = hi.max(self.min_zoom);
        self
    }

    /// Return options with a different zoom increment.
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step.abs();
        self
    }

    /// Return options with a different handle size.
    pub fn with_handle_size_px(mut self, px: f64) -> Self {
        self.handle_size_px = px.max(1.0);
        self
    }

    /// Return options with a different minimum layer size.
    pub fn with_min_layer_size(mut self, size: f64) -> Self {
        self.min_layer_size = size.max(1.0);
        self
    }

    /// Clamp `zoom` into the configured range. NaN maps to 1.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
