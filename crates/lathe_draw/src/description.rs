//! Draw descriptions
//!
//! A [`DrawDescription`] pairs a [`GeometryDescriptor`] with the state needed
//! to draw it (transform, color, blending, space, clip, texture, layer
//! order) and a per-context [`GeometryCache`]. The typed wrappers
//! [`DrawGeometryDescription`] and [`DrawTextDescription`] are what layers
//! hold.

use std::ops::{Deref, DerefMut};

use lathe_core::{BlendMode, Color, Mat4, Rect, TransformationSpace};
use lathe_geometry::{
    ContextId, ContextRegistry, DisposeReport, GeometryCache, GeometryDescriptor, GeometryKey,
    RenderContext, TextDescriptor,
};
use serde::{Deserialize, Serialize};

fn default_clip_rect() -> Rect {
    Rect::CLIP_FULL
}

/// Draw state for one shape
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrawDescription {
    descriptor: GeometryDescriptor,
    pub transformation: Mat4,
    pub color: Color,
    #[serde(default)]
    pub space: TransformationSpace,
    #[serde(default)]
    pub blending: BlendMode,
    #[serde(default = "default_clip_rect")]
    pub clip_rect: Rect,
    #[serde(default)]
    pub texture_path: String,
    #[serde(default)]
    pub layer_order: i32,
    #[serde(skip)]
    cache: GeometryCache,
}

impl Default for DrawDescription {
    fn default() -> Self {
        Self::new(
            GeometryDescriptor::default(),
            Mat4::IDENTITY,
            Color::WHITE,
            BlendMode::default(),
        )
    }
}

impl DrawDescription {
    pub fn new(
        descriptor: GeometryDescriptor,
        transformation: Mat4,
        color: Color,
        blending: BlendMode,
    ) -> Self {
        Self {
            descriptor,
            transformation,
            color,
            space: TransformationSpace::default(),
            blending,
            clip_rect: Rect::CLIP_FULL,
            texture_path: String::new(),
            layer_order: 0,
            cache: GeometryCache::new(),
        }
    }

    pub fn descriptor(&self) -> &GeometryDescriptor {
        &self.descriptor
    }

    /// Replace the shape, releasing geometry built from the old one
    pub fn set_descriptor(&mut self, descriptor: GeometryDescriptor, registry: &mut ContextRegistry) -> DisposeReport {
        let report = self.cache.dispose(registry);
        self.descriptor = descriptor;
        report
    }

    pub fn set_space(&mut self, space: TransformationSpace) {
        self.space = space;
    }

    pub fn set_clip_rect(&mut self, clip_rect: Rect) {
        self.clip_rect = clip_rect;
    }

    pub fn set_layer_order(&mut self, layer_order: i32) {
        self.layer_order = layer_order;
    }

    /// Append `delta` to the transform: points see the current transform
    /// first, then `delta`
    pub fn transform(&mut self, delta: &Mat4) {
        self.transformation = self.transformation.then(delta);
    }

    /// Geometry for `context`, built on first use
    pub fn get_geometry(&self, context: &mut RenderContext) -> GeometryKey {
        self.cache.get_or_build(context, &self.descriptor)
    }

    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// Release all cached geometry; safe to call repeatedly
    pub fn dispose(&self, registry: &mut ContextRegistry) -> DisposeReport {
        self.cache.dispose(registry)
    }

    /// Drop cache entries for a torn-down context
    pub fn forget_context(&self, context: ContextId) -> bool {
        self.cache.forget_context(context)
    }

    /// Independent copy with an empty cache
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

/// Description of a library or synthesized shape
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawGeometryDescription {
    base: DrawDescription,
}

impl DrawGeometryDescription {
    pub fn new(
        descriptor: GeometryDescriptor,
        transformation: Mat4,
        color: Color,
        blending: BlendMode,
    ) -> Self {
        Self {
            base: DrawDescription::new(descriptor, transformation, color, blending),
        }
    }

    pub fn deep_copy(&self) -> Self {
        Self {
            base: self.base.deep_copy(),
        }
    }
}

impl Deref for DrawGeometryDescription {
    type Target = DrawDescription;

    fn deref(&self) -> &DrawDescription {
        &self.base
    }
}

impl DerefMut for DrawGeometryDescription {
    fn deref_mut(&mut self) -> &mut DrawDescription {
        &mut self.base
    }
}

/// Description of extruded 3D text
///
/// Blends with [`BlendMode::TextDefault`] unless changed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawTextDescription {
    base: DrawDescription,
}

impl Default for DrawTextDescription {
    fn default() -> Self {
        Self::new(TextDescriptor::default(), Mat4::IDENTITY, Color::WHITE)
    }
}

impl DrawTextDescription {
    pub fn new(text: TextDescriptor, transformation: Mat4, color: Color) -> Self {
        Self {
            base: DrawDescription::new(
                GeometryDescriptor::Text(text),
                transformation,
                color,
                BlendMode::TextDefault,
            ),
        }
    }

    /// Text parameters, unless the descriptor was replaced by another kind
    pub fn text(&self) -> Option<&TextDescriptor> {
        match &self.base.descriptor {
            GeometryDescriptor::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn deep_copy(&self) -> Self {
        Self {
            base: self.base.deep_copy(),
        }
    }
}

impl Deref for DrawTextDescription {
    type Target = DrawDescription;

    fn deref(&self) -> &DrawDescription {
        &self.base
    }
}

impl DerefMut for DrawTextDescription {
    fn deref_mut(&mut self) -> &mut DrawDescription {
        &mut self.base
    }
}
