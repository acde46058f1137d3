//! Instanced unit boxes

use std::ops::{Deref, DerefMut};

use lathe_core::{BlendMode, Color, Mat4};
use lathe_geometry::{BoxSettings, GeometryDescriptor, GeometryKey, RenderContext};

use crate::description::DrawDescription;

/// Instanced box batch with per-instance transforms and colors
///
/// Always draws at least one instance. The geometry is the same unit box for
/// every batch, cached once per context.
#[derive(Clone, Debug)]
pub struct BufferGeometry {
    base: DrawDescription,
    instance_transforms: Vec<Mat4>,
    instance_colors: Vec<Color>,
    instance_count: usize,
}

impl Default for BufferGeometry {
    fn default() -> Self {
        let mut batch = Self {
            base: DrawDescription::new(unit_box(), Mat4::IDENTITY, Color::GREEN, BlendMode::Blend),
            instance_transforms: Vec::new(),
            instance_colors: Vec::new(),
            instance_count: 1,
        };
        batch.update(Mat4::IDENTITY, Color::GREEN, "", Some(Vec::new()), Some(Vec::new()));
        batch
    }
}

fn unit_box() -> GeometryDescriptor {
    GeometryDescriptor::Box(BoxSettings::default())
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the batch
    ///
    /// `None` transforms mean one identity instance; `None` or empty colors
    /// mean one instance of `color`.
    pub fn update(
        &mut self,
        transformation: Mat4,
        color: Color,
        texture_path: impl Into<String>,
        transforms: Option<Vec<Mat4>>,
        colors: Option<Vec<Color>>,
    ) {
        self.base.transformation = transformation;
        self.base.color = color;
        self.base.texture_path = texture_path.into();

        let colors = colors.unwrap_or_default();
        self.instance_count = transforms
            .as_ref()
            .map_or(0, Vec::len)
            .max(colors.len())
            .max(1);

        self.instance_transforms = transforms.unwrap_or_else(|| vec![Mat4::IDENTITY]);
        self.instance_colors = if colors.is_empty() { vec![color] } else { colors };
    }

    pub fn instance_transforms(&self) -> &[Mat4] {
        &self.instance_transforms
    }

    pub fn instance_colors(&self) -> &[Color] {
        &self.instance_colors
    }

    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    /// The shared unit box for `context`
    pub fn get_geometry(&self, context: &mut RenderContext) -> GeometryKey {
        self.base.cache().get_or_build(context, &unit_box())
    }
}

impl Deref for BufferGeometry {
    type Target = DrawDescription;

    fn deref(&self) -> &DrawDescription {
        &self.base
    }
}

impl DerefMut for BufferGeometry {
    fn deref_mut(&mut self) -> &mut DrawDescription {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_geometry::{ContextBuilder, ContextRegistry, QuadSettings};

    #[test]
    fn test_default_batch() {
        let batch = BufferGeometry::new();
        assert_eq!(batch.color, Color::GREEN);
        assert_eq!(batch.instance_count(), 1);
        assert!(batch.instance_transforms().is_empty());
        assert_eq!(batch.instance_colors(), &[Color::GREEN]);
    }

    #[test]
    fn test_transforms_without_colors() {
        let mut batch = BufferGeometry::new();
        let transforms = vec![
            Mat4::translation(0.0, 0.0, 0.0),
            Mat4::translation(1.0, 0.0, 0.0),
            Mat4::translation(2.0, 0.0, 0.0),
        ];
        batch.update(Mat4::IDENTITY, Color::RED, "", Some(transforms), Some(Vec::new()));

        assert_eq!(batch.instance_count(), 3);
        assert_eq!(batch.instance_colors(), &[Color::RED]);
    }

    #[test]
    fn test_nothing_given() {
        let mut batch = BufferGeometry::new();
        batch.update(Mat4::scale(2.0, 2.0, 2.0), Color::BLUE, "wood.png", None, None);

        assert_eq!(batch.instance_count(), 1);
        assert_eq!(batch.instance_transforms(), &[Mat4::IDENTITY]);
        assert_eq!(batch.instance_colors(), &[Color::BLUE]);
        assert_eq!(batch.texture_path, "wood.png");
    }

    #[test]
    fn test_geometry_is_unit_box() {
        let mut registry = ContextRegistry::new();
        let id = registry.create(ContextBuilder::new());

        let mut batch = BufferGeometry::new();
        batch.set_descriptor(GeometryDescriptor::Quad(QuadSettings::default()), &mut registry);

        let ctx = registry.get_mut(id).unwrap();
        let key = batch.get_geometry(ctx);
        assert_eq!(batch.get_geometry(ctx), key);
        assert_eq!(ctx.geometry(key).unwrap().vertex_count(), 24);
        assert_eq!(ctx.build_count(), 1);

        assert_eq!(batch.dispose(&mut registry).released, 1);
    }
}
