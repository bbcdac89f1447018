use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{SlideError, SlideResult};
use crate::scene::slide::Slide;

/// Where image bytes come from. Implementations are called from rayon workers.
pub trait ImageSource: Send + Sync {
    /// Fetch the encoded bytes behind `url`.
    fn fetch(&self, url: &str) -> SlideResult<Vec<u8>>;
}

/// Reads images from a directory; URLs are relative paths (optionally `file://`-prefixed).
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from `SLIDECRAFT_IMAGE_ROOT`, else the working directory.
    pub fn from_env() -> Self {
        let root = std::env::var("SLIDECRAFT_IMAGE_ROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }

    /// Directory URLs are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for FsImageSource {
    fn fetch(&self, url: &str) -> SlideResult<Vec<u8>> {
        if url.contains("://") && !url.starts_with("file://") {
            return Err(SlideError::validation(format!(
                "unsupported image url scheme: {url}"
            )));
        }
        let rel = normalize_rel_path(url.trim_start_matches("file://"))?;
        let p = self.root.join(Path::new(&rel));
        std::fs::read(&p).map_err(|e| {
            SlideError::decode(format!("failed to read image '{}': {e}", p.display()))
        })
    }
}

/// Normalize and validate a root-relative image path.
///
/// The result uses `/` separators, drops `.` segments and rejects absolute paths or parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> SlideResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SlideError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(SlideError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SlideError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SlideError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Load state of one URL.
#[derive(Clone, Debug)]
pub enum ImageState {
    /// Fetch or decode in flight.
    Pending,
    /// Decoded and ready to paint.
    Ready(PreparedImage),
    /// Fetch or decode failed; never retried.
    Failed,
}

type LoadResult = (String, SlideResult<PreparedImage>);

/// URL-keyed side table of decoded images.
///
/// [`ImageCache::preload`] starts background loads on the rayon pool; [`ImageCache::poll`]
/// drains finished loads on the caller's thread. Painting consults [`ImageCache::get`] and
/// simply skips anything not ready.
pub struct ImageCache {
    source: Arc<dyn ImageSource>,
    entries: HashMap<String, ImageState>,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl ImageCache {
    /// Empty cache fetching through `source`.
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            entries: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start loading every URL not seen before. Returns how many loads were started.
    pub fn preload<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> usize {
        let mut started = 0;
        for url in urls {
            if self.entries.contains_key(url) {
                continue;
            }
            self.entries.insert(url.to_owned(), ImageState::Pending);
            let source = Arc::clone(&self.source);
            let tx = self.tx.clone();
            let url = url.to_owned();
            tracing::debug!(url = %url, "image preload started");
            rayon::spawn(move || {
                let res = source.fetch(&url).and_then(|bytes| decode_image(&bytes));
                // The receiver only disappears with the cache itself.
                let _ = tx.send((url, res));
            });
            started += 1;
        }
        started
    }

    /// Preload every image referenced by `slide`.
    pub fn preload_slide(&mut self, slide: &Slide) -> usize {
        let urls: Vec<&str> = slide.layers.iter().flat_map(|l| l.image_urls()).collect();
        self.preload(urls)
    }

    /// Apply finished loads without blocking. Returns how many became ready or failed.
    pub fn poll(&mut self) -> usize {
        let mut n = 0;
        while let Ok((url, res)) = self.rx.try_recv() {
            self.settle(url, res);
            n += 1;
        }
        n
    }

    /// Block until nothing is pending or `timeout` elapses. Returns `true` when idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.pending_count() > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            match self.rx.recv_timeout(left) {
                Ok((url, res)) => self.settle(url, res),
                Err(_) => return false,
            }
        }
        true
    }

    /// Fetch and decode synchronously on the caller's thread, skipping known URLs.
    pub fn load_blocking<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) {
        for url in urls {
            if matches!(
                self.entries.get(url),
                Some(ImageState::Ready(_) | ImageState::Failed)
            ) {
                continue;
            }
            let res = self.source.fetch(url).and_then(|bytes| decode_image(&bytes));
            self.settle(url.to_owned(), res);
        }
    }

    /// Register an already decoded image under `url`.
    pub fn insert(&mut self, url: impl Into<String>, image: PreparedImage) {
        self.entries.insert(url.into(), ImageState::Ready(image));
    }

    /// Decoded image for `url`, if ready.
    pub fn get(&self, url: &str) -> Option<&PreparedImage> {
        match self.entries.get(url) {
            Some(ImageState::Ready(img)) => Some(img),
            _ => None,
        }
    }

    /// Load state for `url`; `None` when never requested.
    pub fn state(&self, url: &str) -> Option<&ImageState> {
        self.entries.get(url)
    }

    /// Loads still in flight.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|s| matches!(s, ImageState::Pending))
            .count()
    }

    fn settle(&mut self, url: String, res: SlideResult<PreparedImage>) {
        let state = match res {
            Ok(img) => {
                tracing::debug!(url = %url, w = img.width, h = img.height, "image ready");
                ImageState::Ready(img)
            }
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "image load failed; layer will be skipped");
                ImageState::Failed
            }
        };
        self.entries.insert(url, state);
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/images.rs"]
mod tests;
