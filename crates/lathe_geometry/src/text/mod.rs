//! Text to extruded geometry
//!
//! Text building runs in two stages behind traits so a render context can
//! swap either one:
//!
//! 1. an [`OutlineShaper`] lays the string out and returns its glyph outlines
//!    as a single 2D [`Outline`]
//! 2. an [`OutlineExtruder`] fills that outline and extrudes it into
//!    position/normal triangles
//!
//! [`FontOutlineShaper`] (rustybuzz + ttf-parser) and [`LyonExtruder`] are the
//! default implementations.

mod extrude;
mod shaper;

pub use extrude::LyonExtruder;
pub use shaper::FontOutlineShaper;

use crate::descriptor::{ParagraphAlignment, TextAlignment, TextDescriptor};
use crate::error::TextError;
use crate::vertex::PositionNormal;

/// 2D glyph outlines in layout units, Y up
pub type Outline = lyon::path::Path;

/// Everything a shaper needs to lay out one string
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextRequest<'a> {
    pub text: &'a str,
    pub font_name: &'a str,
    pub font_size: f32,
    pub alignment: TextAlignment,
    pub paragraph_alignment: ParagraphAlignment,
}

impl<'a> From<&'a TextDescriptor> for TextRequest<'a> {
    fn from(desc: &'a TextDescriptor) -> Self {
        Self {
            text: &desc.text,
            font_name: &desc.font_name,
            font_size: desc.font_size,
            alignment: desc.alignment,
            paragraph_alignment: desc.paragraph_alignment,
        }
    }
}

/// Lays out text into a 2D outline
pub trait OutlineShaper {
    fn shape(&self, request: &TextRequest<'_>) -> Result<Outline, TextError>;
}

/// Turns a 2D outline into extruded triangles
///
/// The result is a non-indexed triangle list.
pub trait OutlineExtruder {
    fn extrude(&self, outline: &Outline, depth: f32) -> Vec<PositionNormal>;
}

/// Shaper and extruder owned by a render context
pub struct TextPipeline {
    pub shaper: Box<dyn OutlineShaper>,
    pub extruder: Box<dyn OutlineExtruder>,
}

impl TextPipeline {
    pub fn new(shaper: impl OutlineShaper + 'static, extruder: impl OutlineExtruder + 'static) -> Self {
        Self {
            shaper: Box::new(shaper),
            extruder: Box::new(extruder),
        }
    }
}

impl std::fmt::Debug for TextPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPipeline").finish_non_exhaustive()
    }
}
