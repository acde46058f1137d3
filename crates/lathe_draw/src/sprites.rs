//! Sprite batches

use std::ops::{Deref, DerefMut};

use lathe_core::{BlendMode, Color, Mat4, TransformationSpace, Vec2, Vec3};
use lathe_geometry::GeometryDescriptor;
use serde::{Deserialize, Serialize};

use crate::description::DrawDescription;

/// Size used when positions are given without sizes
pub const DEFAULT_SPRITE_SIZE: Vec2 = Vec2::splat(0.01);

/// Inputs to [`DrawSpritesDescription::update`]
///
/// `None` sizes or colors default to a single value that the renderer repeats
/// across all sprites; with no positions they default to nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteParams {
    pub transformation: Mat4,
    pub blend_mode: BlendMode,
    pub positions: Vec<Vec3>,
    pub sizes: Option<Vec<Vec2>>,
    pub colors: Option<Vec<Color>>,
    /// Color used when `colors` is `None`
    pub default_color: Color,
    pub texture_path: String,
}

impl Default for SpriteParams {
    fn default() -> Self {
        Self {
            transformation: Mat4::IDENTITY,
            blend_mode: BlendMode::Blend,
            positions: Vec::new(),
            sizes: None,
            colors: None,
            default_color: Color::WHITE,
            texture_path: String::new(),
        }
    }
}

/// Batch of camera-facing sprites
///
/// Geometry for sprites is a null placeholder; the renderer expands the
/// per-sprite lists itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrawSpritesDescription {
    base: DrawDescription,
    positions: Vec<Vec3>,
    sizes: Vec<Vec2>,
    colors: Vec<Color>,
}

impl Default for DrawSpritesDescription {
    fn default() -> Self {
        Self::new(SpriteParams::default())
    }
}

impl DrawSpritesDescription {
    pub fn new(params: SpriteParams) -> Self {
        let mut sprites = Self {
            base: DrawDescription::new(
                GeometryDescriptor::Sprites,
                Mat4::IDENTITY,
                Color::WHITE,
                BlendMode::Blend,
            ),
            positions: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
        };
        sprites.update(params);
        sprites
    }

    /// Replace the batch contents
    ///
    /// Resets the space to world; place the call before any space change.
    pub fn update(&mut self, params: SpriteParams) {
        let SpriteParams {
            transformation,
            blend_mode,
            positions,
            sizes,
            colors,
            default_color,
            texture_path,
        } = params;

        self.base.transformation = transformation;
        self.base.texture_path = texture_path;
        self.base.space = TransformationSpace::World;
        self.base.blending = blend_mode;

        let has_positions = !positions.is_empty();
        self.sizes = sizes.unwrap_or_else(|| {
            if has_positions {
                vec![DEFAULT_SPRITE_SIZE]
            } else {
                Vec::new()
            }
        });
        self.colors = colors.unwrap_or_else(|| {
            if has_positions {
                vec![default_color]
            } else {
                Vec::new()
            }
        });
        self.positions = positions;
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn sizes(&self) -> &[Vec2] {
        &self.sizes
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Length of the longest of the three lists
    pub fn sprite_count(&self) -> usize {
        self.positions.len().max(self.sizes.len()).max(self.colors.len())
    }

    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

impl Deref for DrawSpritesDescription {
    type Target = DrawDescription;

    fn deref(&self) -> &DrawDescription {
        &self.base
    }
}

impl DerefMut for DrawSpritesDescription {
    fn deref_mut(&mut self) -> &mut DrawDescription {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_only() {
        let sprites = DrawSpritesDescription::new(SpriteParams {
            positions: vec![Vec3::ZERO, Vec3::ONE],
            ..Default::default()
        });

        assert_eq!(sprites.sprite_count(), 2);
        assert_eq!(sprites.sizes(), &[DEFAULT_SPRITE_SIZE]);
        assert_eq!(sprites.colors(), &[Color::WHITE]);
    }

    #[test]
    fn test_empty_batch() {
        let sprites = DrawSpritesDescription::default();
        assert_eq!(sprites.sprite_count(), 0);
        assert!(sprites.sizes().is_empty());
        assert!(sprites.colors().is_empty());
        assert_eq!(sprites.descriptor(), &GeometryDescriptor::Sprites);
    }

    #[test]
    fn test_longest_list_wins() {
        let sprites = DrawSpritesDescription::new(SpriteParams {
            positions: vec![Vec3::ZERO],
            colors: Some(vec![Color::RED, Color::GREEN, Color::BLUE]),
            default_color: Color::BLACK,
            ..Default::default()
        });
        assert_eq!(sprites.sprite_count(), 3);
        assert_eq!(sprites.colors().len(), 3);
    }

    #[test]
    fn test_decoded_count_follows_lists() {
        let sprites = DrawSpritesDescription::new(SpriteParams {
            positions: vec![Vec3::ZERO, Vec3::ONE],
            ..Default::default()
        });
        let mut json: serde_json::Value = serde_json::to_value(&sprites).unwrap();
        assert!(json.get("sprite_count").is_none());

        json["colors"] = serde_json::to_value(vec![Color::RED, Color::GREEN, Color::BLUE]).unwrap();
        let back: DrawSpritesDescription = serde_json::from_value(json).unwrap();
        assert_eq!(back.sprite_count(), 3);
    }

    #[test]
    fn test_update_resets_space() {
        let mut sprites = DrawSpritesDescription::default();
        sprites.set_space(TransformationSpace::Projection);
        sprites.set_layer_order(4);

        sprites.update(SpriteParams {
            positions: vec![Vec3::ZERO],
            default_color: Color::RED,
            blend_mode: BlendMode::Add,
            texture_path: "particle.png".into(),
            ..Default::default()
        });

        assert_eq!(sprites.space, TransformationSpace::World);
        assert_eq!(sprites.blending, BlendMode::Add);
        assert_eq!(sprites.texture_path, "particle.png");
        assert_eq!(sprites.colors(), &[Color::RED]);
        assert_eq!(sprites.layer_order, 4);
    }
}
