//! Font outline shaping using rustybuzz (HarfBuzz)
//!
//! Fonts are resolved through a fontdb database. Names registered with
//! [`FontOutlineShaper::register_font`] win over installed families; system
//! fonts are scanned lazily on the first name that is not already loaded.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight, ID};
use lyon::math::point;
use lyon::path::path::Builder;
use lyon::path::Path;
use rustc_hash::FxHashMap;
use rustybuzz::{Face, UnicodeBuffer};
use ttf_parser::{GlyphId, OutlineBuilder};

use super::{Outline, OutlineShaper, TextRequest};
use crate::descriptor::{ParagraphAlignment, TextAlignment};
use crate::error::TextError;

/// Shaper backed by a font database
///
/// Lookup order for a requested name: fonts registered under that name,
/// families already in the database, then (if enabled) a one-time scan of
/// the system fonts. Unknown names fall back to the configured fallback
/// font if there is one.
#[derive(Clone)]
pub struct FontOutlineShaper {
    db: RefCell<Database>,
    /// Registered name -> face in `db`
    registered: FxHashMap<String, ID>,
    fallback: Option<String>,
    scan_system: bool,
    system_fonts_loaded: Cell<bool>,
}

impl Default for FontOutlineShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl FontOutlineShaper {
    /// Shaper that only knows explicitly registered fonts
    pub fn new() -> Self {
        Self {
            db: RefCell::new(Database::new()),
            registered: FxHashMap::default(),
            fallback: None,
            scan_system: false,
            system_fonts_loaded: Cell::new(false),
        }
    }

    /// Shaper that also resolves names against installed system fonts
    pub fn with_system_fonts() -> Self {
        Self {
            scan_system: true,
            ..Self::new()
        }
    }

    /// Name of the font used for unknown names
    pub fn with_fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = Some(name.into());
        self
    }

    /// Register TTF/OTF data under `name`, replacing any previous font
    pub fn register_font(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<(), TextError> {
        self.register_font_with_index(name, data, 0)
    }

    /// Register one face of a font collection
    pub fn register_font_with_index(
        &mut self,
        name: impl Into<String>,
        data: Vec<u8>,
        face_index: u32,
    ) -> Result<(), TextError> {
        ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParse(format!("{:?}", e)))?;

        let db = self.db.get_mut();
        let ids = db.load_font_source(Source::Binary(Arc::new(data)));
        let mut chosen = None;
        for id in ids {
            if chosen.is_none() && db.face(id).map(|face| face.index) == Some(face_index) {
                chosen = Some(id);
            } else {
                db.remove_face(id);
            }
        }
        let id = chosen.ok_or_else(|| TextError::FontParse(format!("No face at index {}", face_index)))?;

        let name = name.into();
        tracing::debug!("Registered font {}", name);
        if let Some(previous) = self.registered.insert(name, id) {
            db.remove_face(previous);
        }
        Ok(())
    }

    /// Load a font file and register it under `name`
    pub fn register_font_file(&mut self, name: impl Into<String>, path: &std::path::Path) -> Result<(), TextError> {
        let data = std::fs::read(path)
            .map_err(|e| TextError::FontParse(format!("Failed to read {}: {}", path.display(), e)))?;
        self.register_font(name, data)
    }

    /// Whether `name` resolves without falling back or scanning
    pub fn has_font(&self, name: &str) -> bool {
        self.registered.contains_key(name) || self.query(name).is_some()
    }

    /// Number of faces currently in the database
    pub fn face_count(&self) -> usize {
        self.db.borrow().len()
    }

    fn query(&self, name: &str) -> Option<ID> {
        let query = Query {
            families: &[Family::Name(name)],
            weight: Weight::NORMAL,
            style: Style::Normal,
            stretch: Stretch::Normal,
        };
        self.db.borrow().query(&query)
    }

    fn ensure_system_fonts_loaded(&self) {
        if !self.scan_system || self.system_fonts_loaded.get() {
            return;
        }
        let mut db = self.db.borrow_mut();
        db.load_system_fonts();
        self.system_fonts_loaded.set(true);
        tracing::debug!("System fonts loaded: {} faces", db.len());
    }

    fn lookup(&self, name: &str) -> Option<ID> {
        if let Some(&id) = self.registered.get(name) {
            return Some(id);
        }
        if let Some(id) = self.query(name) {
            return Some(id);
        }
        if self.scan_system && !self.system_fonts_loaded.get() {
            self.ensure_system_fonts_loaded();
            return self.query(name);
        }
        None
    }

    fn resolve(&self, name: &str) -> Result<ID, TextError> {
        if let Some(id) = self.lookup(name) {
            return Ok(id);
        }
        self.fallback
            .as_deref()
            .and_then(|fallback| self.lookup(fallback))
            .ok_or_else(|| TextError::FontNotFound(name.to_string()))
    }
}

impl std::fmt::Debug for FontOutlineShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontOutlineShaper")
            .field("faces", &self.face_count())
            .field("registered", &self.registered.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .field("scan_system", &self.scan_system)
            .finish()
    }
}

/// Offset of the first glyph's baseline origin so the text block sits at
/// the requested alignment around (0, 0)
pub(crate) fn layout_origin(
    width: f32,
    ascender: f32,
    descender: f32,
    alignment: TextAlignment,
    paragraph_alignment: ParagraphAlignment,
) -> (f32, f32) {
    let x = match alignment {
        TextAlignment::Leading | TextAlignment::Justified => 0.0,
        TextAlignment::Center => -width / 2.0,
        TextAlignment::Trailing => -width,
    };
    let y = match paragraph_alignment {
        ParagraphAlignment::Near => -ascender,
        ParagraphAlignment::Far => -descender,
        ParagraphAlignment::Center => -(ascender + descender) / 2.0,
    };
    (x, y)
}

impl OutlineShaper for FontOutlineShaper {
    fn shape(&self, request: &TextRequest<'_>) -> Result<Outline, TextError> {
        let id = self.resolve(request.font_name)?;
        self.db
            .borrow()
            .with_face_data(id, |data, face_index| shape_face(data, face_index, request))
            .ok_or_else(|| TextError::FontNotFound(request.font_name.to_string()))?
    }
}

fn shape_face(data: &[u8], face_index: u32, request: &TextRequest<'_>) -> Result<Outline, TextError> {
    let face = Face::from_slice(data, face_index).ok_or_else(|| TextError::Shaping(request.font_name.to_string()))?;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(request.text);
    let output = rustybuzz::shape(&face, &[], buffer);

    let scale = request.font_size / face.units_per_em() as f32;
    let width: i32 = output.glyph_positions().iter().map(|p| p.x_advance).sum();
    let (origin_x, origin_y) = layout_origin(
        width as f32 * scale,
        face.ascender() as f32 * scale,
        face.descender() as f32 * scale,
        request.alignment,
        request.paragraph_alignment,
    );

    let mut sink = PathSink {
        builder: Path::builder(),
        origin: (origin_x, origin_y),
        scale,
        open: false,
    };

    let mut pen_x = 0i32;
    let mut pen_y = 0i32;
    for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
        sink.origin = (
            origin_x + (pen_x + pos.x_offset) as f32 * scale,
            origin_y + (pen_y + pos.y_offset) as f32 * scale,
        );
        // Glyphs without outlines (spaces) only advance the pen
        face.outline_glyph(GlyphId(info.glyph_id as u16), &mut sink);
        sink.finish_subpath();

        pen_x += pos.x_advance;
        pen_y += pos.y_advance;
    }

    Ok(sink.builder.build())
}

/// Receives glyph outlines in font units and writes them into a lyon path
struct PathSink {
    builder: Builder,
    origin: (f32, f32),
    scale: f32,
    open: bool,
}

impl PathSink {
    fn map(&self, x: f32, y: f32) -> lyon::math::Point {
        point(self.origin.0 + x * self.scale, self.origin.1 + y * self.scale)
    }

    fn finish_subpath(&mut self) {
        if self.open {
            self.builder.end(false);
            self.open = false;
        }
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish_subpath();
        let at = self.map(x, y);
        self.builder.begin(at);
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.map(x, y);
        self.builder.line_to(to);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.map(x1, y1);
        let to = self.map(x, y);
        self.builder.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let ctrl1 = self.map(x1, y1);
        let ctrl2 = self.map(x2, y2);
        let to = self.map(x, y);
        self.builder.cubic_bezier_to(ctrl1, ctrl2, to);
    }

    fn close(&mut self) {
        if self.open {
            self.builder.close();
            self.open = false;
        }
    }
}
