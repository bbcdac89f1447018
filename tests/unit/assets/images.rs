use std::collections::HashMap;
use std::io::Cursor;

use super::*;
use crate::scene::color::Color;
use crate::scene::layer::{BackgroundType, ImageLayer, Layer};
use crate::scene::slide::SlideType;

struct MemSource(HashMap<String, Vec<u8>>);

impl ImageSource for MemSource {
    fn fetch(&self, url: &str) -> SlideResult<Vec<u8>> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| SlideError::decode(format!("missing {url}")))
    }
}

fn png_1x1(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn cache() -> ImageCache {
    let mut m = HashMap::new();
    m.insert("red.png".to_owned(), png_1x1([255, 0, 0, 255]));
    m.insert("broken.png".to_owned(), b"nope".to_vec());
    ImageCache::new(Arc::new(MemSource(m)))
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b\\c.png").unwrap(), "a/b/c.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn preload_then_wait_resolves_ready_and_failed() {
    let mut c = cache();
    assert_eq!(c.preload(["red.png", "broken.png", "missing.png"]), 3);
    // Already requested URLs are not started twice.
    assert_eq!(c.preload(["red.png"]), 0);
    assert!(c.wait_idle(Duration::from_secs(10)));

    assert_eq!(c.get("red.png").map(|i| i.width), Some(1));
    assert!(matches!(c.state("broken.png"), Some(ImageState::Failed)));
    assert!(matches!(c.state("missing.png"), Some(ImageState::Failed)));
    assert!(c.get("missing.png").is_none());
    assert_eq!(c.pending_count(), 0);
}

#[test]
fn failed_images_are_not_retried() {
    let mut c = cache();
    c.load_blocking(["broken.png"]);
    assert!(matches!(c.state("broken.png"), Some(ImageState::Failed)));
    assert_eq!(c.preload(["broken.png"]), 0);
}

#[test]
fn preload_slide_collects_background_and_image_urls() {
    let mut slide = Slide::new(SlideType::Content, 1);
    if let Some(bg) = slide.background_mut() {
        bg.background_type = BackgroundType::Image;
        bg.image_url = Some("red.png".into());
        bg.color = Color::WHITE;
    }
    slide.layers.push(Layer::Image(ImageLayer::new("broken.png")));
    let mut c = cache();
    assert_eq!(c.preload_slide(&slide), 2);
    assert!(c.wait_idle(Duration::from_secs(10)));
    assert!(c.get("red.png").is_some());
}

#[test]
fn fs_source_rejects_remote_urls() {
    let src = FsImageSource::new(".");
    assert!(src.fetch("https://example.com/a.png").is_err());
}
