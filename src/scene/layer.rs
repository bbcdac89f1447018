use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, CANVAS_SIZE, Point, Rect};
use crate::foundation::ids::fresh_id;
use crate::scene::color::Color;
use crate::scene::slide::SlideType;

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

/// Position, size and stacking of a non-background layer, in logical canvas units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width. For lines this is the x component of the direction vector.
    pub width: f64,
    /// Box height. For lines this is the y component of the direction vector.
    pub height: f64,
    /// Rotation in degrees, clockwise, around the box centre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Layer opacity in `[0, 1]`; `None` means opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Paint-order key; higher paints later.
    pub z_index: i32,
}

impl Transform {
    /// Axis-aligned transform without rotation or opacity.
    pub fn new(x: f64, y: f64, width: f64, height: f64, z_index: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: None,
            opacity: None,
            z_index,
        }
    }

    /// Box centred on the canvas.
    pub fn centered(width: f64, height: f64, z_index: i32) -> Self {
        Self::new(
            (CANVAS_SIZE - width) / 2.0,
            (CANVAS_SIZE - height) / 2.0,
            width,
            height,
            z_index,
        )
    }

    /// Unrotated bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Rotation pivot.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Opacity clamped to `[0, 1]`.
    pub fn effective_opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Rotation about [`Transform::center`], or identity.
    pub fn rotation_affine(&self) -> Affine {
        match self.rotation {
            Some(deg) if deg != 0.0 && deg.is_finite() => {
                Affine::rotate_about(deg.to_radians(), self.center())
            }
            _ => Affine::IDENTITY,
        }
    }

    /// Translate by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// How a background is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    /// Flat color.
    #[default]
    Solid,
    /// Linear or radial gradient.
    Gradient,
    /// Image fitted to the canvas.
    Image,
}

/// Gradient geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Along a direction given by `angle`.
    #[default]
    Linear,
    /// Outward from the canvas centre.
    Radial,
}

/// One color stop; `position` is a percentage in `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Stop color.
    pub color: Color,
    /// Offset along the gradient, percent.
    pub position: f64,
}

/// Gradient fill description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Linear or radial.
    #[serde(rename = "type", default)]
    pub kind: GradientKind,
    /// CSS angle in degrees (0 points up, 90 points right). Ignored for radial gradients.
    #[serde(default = "default_gradient_angle")]
    pub angle: f64,
    /// Color stops, in any order.
    pub stops: Vec<GradientStop>,
}

fn default_gradient_angle() -> f64 {
    180.0
}

/// How an image is placed into its destination box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to cover the box and crop the overflow, centred.
    Cover,
    /// Scale to fit inside the box, letterboxed and centred.
    Contain,
    /// Stretch to the box.
    #[default]
    Fill,
}

fn default_background_fit() -> ImageFit {
    ImageFit::Cover
}

/// Drop shadow for images and text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    /// Shadow color, alpha included.
    pub color: Color,
    /// Gaussian blur radius in logical units.
    #[serde(default)]
    pub blur: f64,
    /// Horizontal offset.
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset.
    #[serde(default)]
    pub offset_y: f64,
}

/// The slide backdrop. Always fills the canvas and has no transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundLayer {
    /// Layer id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hidden backgrounds are not painted.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Which of the fill fields is used.
    #[serde(default)]
    pub background_type: BackgroundType,
    /// Solid color, also the fallback under gradients and images.
    #[serde(default = "default_background_color")]
    pub color: Color,
    /// Gradient used when `background_type` is `gradient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    /// Image used when `background_type` is `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Image placement.
    #[serde(default = "default_background_fit")]
    pub image_fit: ImageFit,
    /// Image opacity in `[0, 1]`.
    #[serde(default = "default_one")]
    pub image_opacity: f64,
    /// Brand-kit color this background was picked from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color_id: Option<String>,
    /// Brand-kit image this background was picked from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_image_id: Option<String>,
}

fn default_background_color() -> Color {
    Color::WHITE
}

impl BackgroundLayer {
    /// Solid background.
    pub fn solid(color: Color) -> Self {
        Self {
            id: fresh_id(LayerKind::Background.as_str()),
            name: "Background".to_owned(),
            visible: true,
            background_type: BackgroundType::Solid,
            color,
            gradient: None,
            image_url: None,
            image_fit: ImageFit::Cover,
            image_opacity: 1.0,
            brand_color_id: None,
            brand_image_id: None,
        }
    }

    /// Default backdrop for a new slide: black for hooks, white otherwise.
    pub fn for_slide_type(slide_type: SlideType) -> Self {
        match slide_type {
            SlideType::Hook => Self::solid(Color::BLACK),
            _ => Self::solid(Color::WHITE),
        }
    }
}

/// Font weight, 100..=900. Deserialises from a number or a CSS keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// 400.
    pub const NORMAL: FontWeight = FontWeight(400);
    /// 700.
    pub const BOLD: FontWeight = FontWeight(700);

    fn parse_keyword(s: &str) -> Result<Self, String> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "normal" | "regular" => Ok(Self::NORMAL),
            "bold" => Ok(Self::BOLD),
            "lighter" | "light" => Ok(FontWeight(300)),
            "bolder" => Ok(FontWeight(800)),
            other => other
                .parse::<u16>()
                .map(|w| FontWeight(w.clamp(1, 1000)))
                .map_err(|_| format!("invalid font weight \"{s}\"")),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(FontWeight(n.round().clamp(1.0, 1000.0) as u16)),
            Repr::Str(s) => Self::parse_keyword(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Lines start at the box's left edge.
    Left,
    /// Lines are centred on the box's horizontal centre.
    #[default]
    Center,
    /// Lines end at the box's right edge.
    Right,
}

/// Case transformation applied before layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// Unchanged.
    #[default]
    None,
    /// All caps.
    Uppercase,
    /// All lowercase.
    Lowercase,
    /// First letter of each word capitalised.
    Capitalize,
}

/// What happens to lines beyond `maxLines`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOverflow {
    /// Lines beyond the limit are still dropped; nothing is marked.
    #[default]
    Visible,
    /// Same as `visible` for painting purposes.
    Hidden,
    /// The final kept line ends in `...`.
    Ellipsis,
}

/// Typography of a text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Family name, resolved against registered fonts.
    pub font_family: String,
    /// Size in logical units.
    pub font_size: f64,
    /// Weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Fill color.
    pub color: Color,
    /// Horizontal anchor.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Line pitch as a multiple of `font_size`; defaults to 1.2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// Extra advance between characters, logical units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    /// Case transformation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    /// Optional shadow behind the glyphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<Shadow>,
    /// Brand-kit font reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_font_id: Option<String>,
    /// Brand-kit color reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color_id: Option<String>,
}

/// Default line pitch multiplier.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

impl TextStyle {
    /// Line pitch in logical units.
    pub fn line_pitch(&self) -> f64 {
        self.line_height.unwrap_or(DEFAULT_LINE_HEIGHT) * self.font_size
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_owned(),
            font_size: 48.0,
            font_weight: FontWeight::BOLD,
            color: Color::BLACK,
            text_align: TextAlign::Center,
            line_height: Some(DEFAULT_LINE_HEIGHT),
            letter_spacing: None,
            text_transform: None,
            text_shadow: None,
            brand_font_id: None,
            brand_color_id: None,
        }
    }
}

/// A wrapped text block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Layer id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hidden layers are neither painted nor hit-testable.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Geometry.
    pub transform: Transform,
    /// Raw text; `\n` forces a line break.
    pub content: String,
    /// Typography.
    pub style: TextStyle,
    /// Maximum number of painted lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u32>,
    /// Behaviour past `max_lines`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<TextOverflow>,
}

impl TextLayer {
    /// New text layer with the default box (900×200 at (90, 400)) and style.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: fresh_id(LayerKind::Text.as_str()),
            name: "Text".to_owned(),
            visible: true,
            transform: Transform::new(90.0, 400.0, 900.0, 200.0, 0),
            content: content.into(),
            style: TextStyle::default(),
            max_lines: None,
            overflow: None,
        }
    }
}

/// A bitmap placed into a box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    /// Layer id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hidden layers are neither painted nor hit-testable.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Geometry.
    pub transform: Transform,
    /// Image URL or path.
    pub src: String,
    /// Corner radius of the clip, logical units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    /// Drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Placement in the box.
    #[serde(default)]
    pub fit: ImageFit,
    /// Brand-kit image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_image_id: Option<String>,
    /// Brand-kit logo reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_logo_id: Option<String>,
}

impl ImageLayer {
    /// New 400×400 image centred on the canvas.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            id: fresh_id(LayerKind::Image.as_str()),
            name: "Image".to_owned(),
            visible: true,
            transform: Transform::centered(400.0, 400.0, 0),
            src: src.into(),
            border_radius: None,
            shadow: None,
            fit: ImageFit::Fill,
            brand_image_id: None,
            brand_logo_id: None,
        }
    }
}

/// Geometric primitive drawn by a shape layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    /// Optionally rounded rectangle filling the box.
    #[default]
    Rectangle,
    /// Circle of radius `min(w, h) / 2` centred in the box.
    Circle,
    /// Segment from `(x, y)` to `(x + w, y + h)`.
    Line,
}

/// A filled and/or stroked primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    /// Layer id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hidden layers are neither painted nor hit-testable.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Geometry.
    pub transform: Transform,
    /// Primitive.
    pub shape_type: ShapeType,
    /// Interior color. Lines ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// Outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    /// Outline width, logical units.
    #[serde(default)]
    pub stroke_width: f64,
    /// Rectangle corner radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    /// Brand-kit color reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color_id: Option<String>,
}

impl ShapeLayer {
    /// New shape with per-type default geometry: 300×300 centred, or a 600×4 centred line.
    pub fn new(shape_type: ShapeType) -> Self {
        let (name, transform, fill, stroke, stroke_width) = match shape_type {
            ShapeType::Rectangle => (
                "Rectangle",
                Transform::centered(300.0, 300.0, 0),
                Some(Color::rgb(0x33, 0x66, 0xcc)),
                None,
                0.0,
            ),
            ShapeType::Circle => (
                "Circle",
                Transform::centered(300.0, 300.0, 0),
                Some(Color::rgb(0x33, 0x66, 0xcc)),
                None,
                0.0,
            ),
            ShapeType::Line => (
                "Line",
                Transform::centered(600.0, 4.0, 0),
                None,
                Some(Color::BLACK),
                4.0,
            ),
        };
        Self {
            id: fresh_id(LayerKind::Shape.as_str()),
            name: name.to_owned(),
            visible: true,
            transform,
            shape_type,
            fill,
            stroke,
            stroke_width,
            border_radius: None,
            brand_color_id: None,
        }
    }
}

/// Layer discriminant, also the id prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// [`BackgroundLayer`].
    Background,
    /// [`TextLayer`].
    Text,
    /// [`ImageLayer`].
    Image,
    /// [`ShapeLayer`].
    Shape,
}

impl LayerKind {
    /// Lowercase tag as used in JSON and ids.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Text => "text",
            LayerKind::Image => "image",
            LayerKind::Shape => "shape",
        }
    }
}

/// One visual element of a slide, discriminated by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    /// Canvas backdrop.
    Background(BackgroundLayer),
    /// Text block.
    Text(TextLayer),
    /// Bitmap.
    Image(ImageLayer),
    /// Primitive.
    Shape(ShapeLayer),
}

impl Layer {
    /// Layer id.
    pub fn id(&self) -> &str {
        match self {
            Layer::Background(l) => &l.id,
            Layer::Text(l) => &l.id,
            Layer::Image(l) => &l.id,
            Layer::Shape(l) => &l.id,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Layer::Background(l) => &l.name,
            Layer::Text(l) => &l.name,
            Layer::Image(l) => &l.name,
            Layer::Shape(l) => &l.name,
        }
    }

    /// Discriminant.
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Background(_) => LayerKind::Background,
            Layer::Text(_) => LayerKind::Text,
            Layer::Image(_) => LayerKind::Image,
            Layer::Shape(_) => LayerKind::Shape,
        }
    }

    /// Whether the layer is painted and hit-testable.
    pub fn is_visible(&self) -> bool {
        match self {
            Layer::Background(l) => l.visible,
            Layer::Text(l) => l.visible,
            Layer::Image(l) => l.visible,
            Layer::Shape(l) => l.visible,
        }
    }

    /// `true` for the backdrop.
    pub fn is_background(&self) -> bool {
        matches!(self, Layer::Background(_))
    }

    /// Geometry; `None` for the background.
    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Layer::Background(_) => None,
            Layer::Text(l) => Some(&l.transform),
            Layer::Image(l) => Some(&l.transform),
            Layer::Shape(l) => Some(&l.transform),
        }
    }

    /// Mutable geometry; `None` for the background.
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        match self {
            Layer::Background(_) => None,
            Layer::Text(l) => Some(&mut l.transform),
            Layer::Image(l) => Some(&mut l.transform),
            Layer::Shape(l) => Some(&mut l.transform),
        }
    }

    /// Stacking key; `None` for the background.
    pub fn z_index(&self) -> Option<i32> {
        self.transform().map(|t| t.z_index)
    }

    /// Replace the id with a fresh one of the same kind.
    pub fn refresh_id(&mut self) {
        let id = fresh_id(self.kind().as_str());
        match self {
            Layer::Background(l) => l.id = id,
            Layer::Text(l) => l.id = id,
            Layer::Image(l) => l.id = id,
            Layer::Shape(l) => l.id = id,
        }
    }

    /// Copy of this layer under a fresh id.
    pub fn with_fresh_id(&self) -> Layer {
        let mut out = self.clone();
        out.refresh_id();
        out
    }

    /// Image URLs this layer needs painted.
    pub fn image_urls(&self) -> Vec<&str> {
        match self {
            Layer::Background(bg) if bg.background_type == BackgroundType::Image => {
                bg.image_url.as_deref().into_iter().collect()
            }
            Layer::Image(img) if !img.src.is_empty() => vec![img.src.as_str()],
            _ => Vec::new(),
        }
    }
}

impl From<BackgroundLayer> for Layer {
    fn from(v: BackgroundLayer) -> Self {
        Layer::Background(v)
    }
}

impl From<TextLayer> for Layer {
    fn from(v: TextLayer) -> Self {
        Layer::Text(v)
    }
}

impl From<ImageLayer> for Layer {
    fn from(v: ImageLayer) -> Self {
        Layer::Image(v)
    }
}

impl From<ShapeLayer> for Layer {
    fn from(v: ShapeLayer) -> Self {
        Layer::Shape(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
