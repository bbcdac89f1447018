use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::foundation::ids::fresh_id;
use crate::scene::color::Color;
use crate::scene::layer::{
    BackgroundLayer, FontWeight, ImageFit, ImageLayer, Layer, TextAlign, TextLayer, Transform,
};

/// Role of a slide in the carousel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    /// Opening slide.
    Hook,
    /// Body slide.
    #[default]
    Content,
    /// Closing call to action.
    Cta,
    /// Anything else.
    Custom,
}

/// One square composition: an ordered stack of layers with exactly one background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Slide id.
    pub id: String,
    /// Dense 1-based position in the document.
    pub slide_number: u32,
    /// Role.
    pub slide_type: SlideType,
    /// Layers in list order; paint order is decided by the renderer.
    pub layers: Vec<Layer>,
    /// Set once the slide was changed in the editor.
    #[serde(default)]
    pub is_edited: bool,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Slide {
    /// New slide whose only layer is the default background for `slide_type`.
    pub fn new(slide_type: SlideType, slide_number: u32) -> Self {
        let now = Utc::now();
        Self {
            id: fresh_id("slide"),
            slide_number,
            slide_type,
            layers: vec![Layer::Background(BackgroundLayer::for_slide_type(slide_type))],
            is_edited: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The background layer, if present.
    pub fn background(&self) -> Option<&BackgroundLayer> {
        self.layers.iter().find_map(|l| match l {
            Layer::Background(bg) => Some(bg),
            _ => None,
        })
    }

    /// Mutable background layer, if present.
    pub fn background_mut(&mut self) -> Option<&mut BackgroundLayer> {
        self.layers.iter_mut().find_map(|l| match l {
            Layer::Background(bg) => Some(bg),
            _ => None,
        })
    }

    /// Layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Mutable layer by id.
    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    /// Position of a layer in `layers`.
    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Highest zIndex among non-background layers.
    pub fn max_z_index(&self) -> Option<i32> {
        self.layers.iter().filter_map(Layer::z_index).max()
    }

    /// Lowest zIndex among non-background layers.
    pub fn min_z_index(&self) -> Option<i32> {
        self.layers.iter().filter_map(Layer::z_index).min()
    }

    /// zIndex that puts a new layer on top.
    pub fn next_z_index(&self) -> i32 {
        self.max_z_index().map_or(1, |z| z + 1)
    }

    /// Background first, then the remaining layers ascending by zIndex (stable on ties).
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut out: Vec<&Layer> = self.layers.iter().filter(|l| l.is_background()).collect();
        let mut rest: Vec<&Layer> = self.layers.iter().filter(|l| !l.is_background()).collect();
        rest.sort_by_key(|l| l.z_index().unwrap_or(0));
        out.extend(rest);
        out
    }

    /// Mark the slide edited now.
    pub fn touch(&mut self) {
        self.is_edited = true;
        self.updated_at = Utc::now();
    }

    /// Deep copy with a fresh slide id and fresh ids for every layer.
    pub fn duplicate(&self) -> Slide {
        let now = Utc::now();
        Slide {
            id: fresh_id("slide"),
            layers: self.layers.iter().map(Layer::with_fresh_id).collect(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Migrate a flat legacy slide into a layer stack.
    pub fn from_legacy(legacy: &LegacySlide) -> Slide {
        let mut slide = Slide::new(legacy.slide_type, legacy.slide_number);
        if let Some(bg) = slide.background_mut()
            && let Some(color) = legacy.background_color
        {
            bg.color = color;
        }

        let text_color = legacy.text_color.unwrap_or_else(|| match legacy.slide_type {
            SlideType::Hook => Color::WHITE,
            _ => Color::BLACK,
        });

        let mut z = 1;
        if let Some(title) = legacy.title.as_deref().filter(|s| !s.trim().is_empty()) {
            let mut t = TextLayer::new(title);
            t.name = "Title".to_owned();
            t.transform = Transform::new(90.0, 160.0, 900.0, 260.0, z);
            t.style.font_size = 64.0;
            t.style.color = text_color;
            slide.layers.push(Layer::Text(t));
            z += 1;
        }
        if let Some(body) = legacy.content.as_deref().filter(|s| !s.trim().is_empty()) {
            let mut t = TextLayer::new(body);
            t.name = "Body".to_owned();
            t.transform = Transform::new(90.0, 440.0, 900.0, 320.0, z);
            t.style.font_size = 36.0;
            t.style.font_weight = FontWeight::NORMAL;
            t.style.text_align = TextAlign::Center;
            t.style.color = text_color;
            slide.layers.push(Layer::Text(t));
            z += 1;
        }
        if let Some(url) = legacy.image_url.as_deref().filter(|s| !s.is_empty()) {
            let mut img = ImageLayer::new(url);
            img.transform = Transform::new(290.0, 780.0, 500.0, 240.0, z);
            img.fit = ImageFit::Cover;
            img.border_radius = Some(16.0);
            slide.layers.push(Layer::Image(img));
        }
        slide
    }
}

/// Flat slide format produced by the text-generation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySlide {
    /// 1-based position.
    pub slide_number: u32,
    /// Role.
    #[serde(default)]
    pub slide_type: SlideType,
    /// Headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Body copy.
    #[serde(default)]
    pub content: Option<String>,
    /// Backdrop color.
    #[serde(default)]
    pub background_color: Option<Color>,
    /// Color for title and body.
    #[serde(default)]
    pub text_color: Option<Color>,
    /// Illustration.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Migrate a legacy list, ordered by `slide_number` and renumbered densely.
pub fn migrate_legacy(legacy: &[LegacySlide]) -> Vec<Slide> {
    let mut sorted: Vec<&LegacySlide> = legacy.iter().collect();
    sorted.sort_by_key(|s| s.slide_number);
    let mut slides: Vec<Slide> = sorted.into_iter().map(Slide::from_legacy).collect();
    renumber(&mut slides);
    slides
}

/// Rewrite `slide_number` as `1..=len` in list order.
pub fn renumber(slides: &mut [Slide]) {
    for (i, s) in slides.iter_mut().enumerate() {
        s.slide_number = (i + 1) as u32;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/slide.rs"]
mod tests;
