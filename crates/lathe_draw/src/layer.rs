//! Draw description layers
//!
//! A [`DrawDescriptionLayer`] is one frame's draw set: three ordered lists of
//! shared descriptions. Order is draw order. Combining layers with
//! [`concat`](DrawDescriptionLayer::concat) or
//! [`unite`](DrawDescriptionLayer::unite) shares the descriptions (and so
//! their geometry caches); only [`deep_copy`](DrawDescriptionLayer::deep_copy)
//! produces independent ones.

use std::rc::Rc;

use lathe_geometry::{ContextId, ContextRegistry, DisposeReport};
use serde::{Deserialize, Serialize};

use crate::description::{DrawGeometryDescription, DrawTextDescription};
use crate::sprites::DrawSpritesDescription;

thread_local! {
    static DEFAULT_LAYER: DrawDescriptionLayer = DrawDescriptionLayer::new(
        vec![Rc::new(DrawGeometryDescription::default())],
        vec![Rc::new(DrawTextDescription::default())],
        vec![Rc::new(DrawSpritesDescription::default())],
    );
}

/// Ordered geometry, text and sprite descriptions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrawDescriptionLayer {
    geometry_descriptions: Vec<Rc<DrawGeometryDescription>>,
    text_descriptions: Vec<Rc<DrawTextDescription>>,
    sprites_descriptions: Vec<Rc<DrawSpritesDescription>>,
}

/// The render thread's default layer: one default description of each kind,
/// shared by every layer created with [`Default`]
impl Default for DrawDescriptionLayer {
    fn default() -> Self {
        DEFAULT_LAYER.with(Clone::clone)
    }
}

impl DrawDescriptionLayer {
    pub fn new(
        geometry_descriptions: Vec<Rc<DrawGeometryDescription>>,
        text_descriptions: Vec<Rc<DrawTextDescription>>,
        sprites_descriptions: Vec<Rc<DrawSpritesDescription>>,
    ) -> Self {
        Self {
            geometry_descriptions,
            text_descriptions,
            sprites_descriptions,
        }
    }

    /// Layer with nothing to draw
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn geometry_descriptions(&self) -> &[Rc<DrawGeometryDescription>] {
        &self.geometry_descriptions
    }

    pub fn text_descriptions(&self) -> &[Rc<DrawTextDescription>] {
        &self.text_descriptions
    }

    pub fn sprites_descriptions(&self) -> &[Rc<DrawSpritesDescription>] {
        &self.sprites_descriptions
    }

    /// Total number of descriptions across all three lists
    pub fn len(&self) -> usize {
        self.geometry_descriptions.len() + self.text_descriptions.len() + self.sprites_descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `first`'s descriptions followed by `second`'s, per list
    pub fn concat(first: &DrawDescriptionLayer, second: &DrawDescriptionLayer) -> Self {
        Self::unite([first, second])
    }

    /// All layers' descriptions in input order, per list
    pub fn unite<'a>(layers: impl IntoIterator<Item = &'a DrawDescriptionLayer>) -> Self {
        let mut united = Self::empty();
        for layer in layers {
            united
                .geometry_descriptions
                .extend(layer.geometry_descriptions.iter().cloned());
            united
                .text_descriptions
                .extend(layer.text_descriptions.iter().cloned());
            united
                .sprites_descriptions
                .extend(layer.sprites_descriptions.iter().cloned());
        }
        united
    }

    /// Independent copies of every description, each with an empty cache
    pub fn deep_copy(&self) -> Self {
        Self::new(
            self.geometry_descriptions
                .iter()
                .map(|d| Rc::new(d.deep_copy()))
                .collect(),
            self.text_descriptions
                .iter()
                .map(|d| Rc::new(d.deep_copy()))
                .collect(),
            self.sprites_descriptions
                .iter()
                .map(|d| Rc::new(d.deep_copy()))
                .collect(),
        )
    }

    /// Release the geometry of every description in the layer
    pub fn dispose(&self, registry: &mut ContextRegistry) -> DisposeReport {
        let mut report = DisposeReport::default();
        for desc in &self.geometry_descriptions {
            report += desc.dispose(registry);
        }
        for desc in &self.text_descriptions {
            report += desc.dispose(registry);
        }
        for desc in &self.sprites_descriptions {
            report += desc.dispose(registry);
        }
        if report.failed > 0 {
            tracing::debug!(
                "Layer disposal released {} geometries, skipped {}",
                report.released,
                report.failed
            );
        }
        report
    }

    /// Drop cache entries for a torn-down context in every description
    pub fn forget_context(&self, context: ContextId) {
        for desc in &self.geometry_descriptions {
            desc.forget_context(context);
        }
        for desc in &self.text_descriptions {
            desc.forget_context(context);
        }
        for desc in &self.sprites_descriptions {
            desc.forget_context(context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_core::{BlendMode, Color, Mat4};
    use lathe_geometry::{ContextBuilder, GeometryDescriptor, TextDescriptor};

    fn geometry(order: i32) -> Rc<DrawGeometryDescription> {
        let mut desc = DrawGeometryDescription::new(
            GeometryDescriptor::default(),
            Mat4::IDENTITY,
            Color::WHITE,
            BlendMode::Blend,
        );
        desc.set_layer_order(order);
        Rc::new(desc)
    }

    fn text(label: &str) -> Rc<DrawTextDescription> {
        Rc::new(DrawTextDescription::new(
            TextDescriptor {
                text: label.to_string(),
                ..Default::default()
            },
            Mat4::IDENTITY,
            Color::WHITE,
        ))
    }

    fn orders(layer: &DrawDescriptionLayer) -> Vec<i32> {
        layer.geometry_descriptions().iter().map(|d| d.layer_order).collect()
    }

    #[test]
    fn test_default_layer_is_shared() {
        let a = DrawDescriptionLayer::default();
        let b = DrawDescriptionLayer::default();
        assert_eq!(a.geometry_descriptions().len(), 1);
        assert_eq!(a.text_descriptions().len(), 1);
        assert_eq!(a.sprites_descriptions().len(), 1);
        assert!(Rc::ptr_eq(&a.geometry_descriptions()[0], &b.geometry_descriptions()[0]));
    }

    #[test]
    fn test_concat_keeps_order_and_shares() {
        let g1 = geometry(1);
        let g2 = geometry(2);
        let a = DrawDescriptionLayer::new(vec![g1.clone()], vec![text("a")], Vec::new());
        let b = DrawDescriptionLayer::new(vec![g2.clone()], Vec::new(), Vec::new());

        let joined = DrawDescriptionLayer::concat(&a, &b);
        assert_eq!(orders(&joined), vec![1, 2]);
        assert_eq!(joined.text_descriptions().len(), 1);
        assert!(Rc::ptr_eq(&joined.geometry_descriptions()[0], &g1));
        assert!(Rc::ptr_eq(&joined.geometry_descriptions()[1], &g2));
    }

    #[test]
    fn test_unite_flattens_in_order() {
        let layers = [
            DrawDescriptionLayer::new(vec![geometry(1)], vec![text("x")], Vec::new()),
            DrawDescriptionLayer::new(vec![geometry(2), geometry(3)], Vec::new(), Vec::new()),
            DrawDescriptionLayer::new(
                vec![geometry(4)],
                vec![text("y")],
                vec![Rc::new(DrawSpritesDescription::default())],
            ),
        ];

        let united = DrawDescriptionLayer::unite(&layers);
        assert_eq!(orders(&united), vec![1, 2, 3, 4]);
        let labels: Vec<_> = united
            .text_descriptions()
            .iter()
            .map(|d| d.text().unwrap().text.clone())
            .collect();
        assert_eq!(labels, vec!["x", "y"]);
        assert_eq!(united.sprites_descriptions().len(), 1);
        assert_eq!(united.len(), 7);

        assert!(DrawDescriptionLayer::unite(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut registry = ContextRegistry::new();
        let id = registry.create(ContextBuilder::new());
        let layer = DrawDescriptionLayer::new(
            vec![geometry(7)],
            Vec::new(),
            vec![Rc::new(DrawSpritesDescription::default())],
        );
        layer.geometry_descriptions()[0].get_geometry(registry.get_mut(id).unwrap());

        let copy = layer.deep_copy();
        assert_eq!(orders(&copy), vec![7]);
        assert!(!Rc::ptr_eq(&copy.geometry_descriptions()[0], &layer.geometry_descriptions()[0]));
        assert!(copy.geometry_descriptions()[0].cache().is_empty());
        assert!(!Rc::ptr_eq(&copy.sprites_descriptions()[0], &layer.sprites_descriptions()[0]));
    }

    #[test]
    fn test_dispose_and_forget() {
        let mut registry = ContextRegistry::new();
        let gone = registry.create(ContextBuilder::new());
        let live = registry.create(ContextBuilder::new());
        let layer = DrawDescriptionLayer::new(vec![geometry(0), geometry(1)], Vec::new(), Vec::new());
        for desc in layer.geometry_descriptions() {
            desc.get_geometry(registry.get_mut(gone).unwrap());
            desc.get_geometry(registry.get_mut(live).unwrap());
        }

        registry.teardown(gone);
        layer.forget_context(gone);

        let report = layer.dispose(&mut registry);
        assert_eq!(report, DisposeReport { released: 2, failed: 0 });
        assert_eq!(layer.dispose(&mut registry), DisposeReport::default());
    }
}
