use serde::{Deserialize, Serialize};

use crate::foundation::error::SlideResult;
use crate::scene::color::Color;
use crate::scene::slide::Slide;

/// A named brand color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandColor {
    /// Catalog id, stored on layers as `brandColorId`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resolved color.
    pub value: Color,
}

/// A named brand image or logo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandImage {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Image URL.
    pub url: String,
}

/// A named brand font.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFont {
    /// Catalog id, stored on text styles as `brandFontId`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// CSS family name.
    pub family: String,
}

/// Read-only brand catalog handed to the bulk-edit collaborator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandContext {
    /// Brand colors.
    #[serde(default)]
    pub colors: Vec<BrandColor>,
    /// Brand images.
    #[serde(default)]
    pub images: Vec<BrandImage>,
    /// Brand logos.
    #[serde(default)]
    pub logos: Vec<BrandImage>,
    /// Brand fonts.
    #[serde(default)]
    pub fonts: Vec<BrandFont>,
}

impl BrandContext {
    /// Look up a color by catalog id.
    pub fn color(&self, id: &str) -> Option<&BrandColor> {
        self.colors.iter().find(|c| c.id == id)
    }

    /// Look up an image or logo by catalog id.
    pub fn image(&self, id: &str) -> Option<&BrandImage> {
        self.images.iter().chain(&self.logos).find(|i| i.id == id)
    }

    /// Look up a font by catalog id.
    pub fn font(&self, id: &str) -> Option<&BrandFont> {
        self.fonts.iter().find(|f| f.id == id)
    }
}

/// Everything an AI bulk-edit collaborator receives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditRequest {
    /// Current slide list.
    pub slides: Vec<Slide>,
    /// Slide the user is looking at.
    pub slide_index: usize,
    /// Brand catalog.
    #[serde(default)]
    pub brand: BrandContext,
    /// Free-text instruction.
    pub instruction: String,
}

/// A collaborator that turns a [`BulkEditRequest`] into a replacement slide list.
///
/// The result is applied through
/// [`EditorStore::apply_bulk_edit`](crate::session::store::EditorStore::apply_bulk_edit),
/// which repairs structural problems instead of trusting the answer.
pub trait BulkEditService {
    /// Produce the edited slide list.
    fn edit(&self, request: &BulkEditRequest) -> SlideResult<Vec<Slide>>;
}

#[cfg(test)]
#[path = "../../tests/unit/session/bulk_edit.rs"]
mod tests;
