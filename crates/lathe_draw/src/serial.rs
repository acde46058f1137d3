//! Layer wire formats
//!
//! Four encoders and one decoder:
//!
//! - [`to_bincode`]: compact binary (bincode)
//! - [`to_msgpack`]: compact MessagePack, structs as arrays
//! - [`to_document`]: MessagePack with field names, for tools that inspect it
//! - [`to_json`] / [`from_json`]: indented JSON, the only format read back
//!
//! Caches never reach the wire, and `Mat4` writes only its columns. Box and
//! cylinder parameters are encode-only: JSON decoding yields the unit box and
//! the default cylinder regardless of what was written.

use thiserror::Error;

use crate::layer::DrawDescriptionLayer;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("bincode encoding failed: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("MessagePack encoding failed: {0}")]
    MsgPack(#[from] rmp_serde::encode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;

/// Encode with bincode
pub fn to_bincode(layer: &DrawDescriptionLayer) -> Result<Vec<u8>> {
    Ok(bincode::serialize(layer)?)
}

/// Encode as compact MessagePack
pub fn to_msgpack(layer: &DrawDescriptionLayer) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(layer)?)
}

/// Encode as MessagePack maps keyed by field name
pub fn to_document(layer: &DrawDescriptionLayer) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(layer)?)
}

/// Encode as indented JSON
pub fn to_json(layer: &DrawDescriptionLayer) -> Result<String> {
    Ok(serde_json::to_string_pretty(layer)?)
}

/// Decode a layer written by [`to_json`]
pub fn from_json(source: &str) -> Result<DrawDescriptionLayer> {
    let layer: DrawDescriptionLayer = serde_json::from_str(source)?;
    tracing::debug!(
        "Decoded layer with {} geometry, {} text and {} sprite descriptions",
        layer.geometry_descriptions().len(),
        layer.text_descriptions().len(),
        layer.sprites_descriptions().len()
    );
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{DrawGeometryDescription, DrawTextDescription};
    use crate::sprites::{DrawSpritesDescription, SpriteParams};
    use lathe_core::{BlendMode, Color, Mat4, Vec3};
    use lathe_geometry::{
        BoxSettings, ContextBuilder, ContextRegistry, GeometryDescriptor, TextDescriptor,
    };
    use std::rc::Rc;

    fn sample_layer() -> DrawDescriptionLayer {
        let cube = DrawGeometryDescription::new(
            GeometryDescriptor::Box(BoxSettings {
                size: Vec3::new(2.0, 3.0, 4.0),
            }),
            Mat4::translation(1.0, 2.0, 3.0),
            Color::RED,
            BlendMode::Add,
        );
        let line = DrawGeometryDescription::new(
            GeometryDescriptor::line(vec![Vec3::ZERO, Vec3::ONE], vec![Vec3::UP], true),
            Mat4::IDENTITY,
            Color::WHITE,
            BlendMode::Blend,
        );
        let label = DrawTextDescription::new(
            TextDescriptor {
                text: "Hello".into(),
                ..Default::default()
            },
            Mat4::scale(0.5, 0.5, 0.5),
            Color::BLACK,
        );
        let sprites = DrawSpritesDescription::new(SpriteParams {
            positions: vec![Vec3::ZERO, Vec3::ONE],
            ..Default::default()
        });

        DrawDescriptionLayer::new(
            vec![Rc::new(cube), Rc::new(line)],
            vec![Rc::new(label)],
            vec![Rc::new(sprites)],
        )
    }

    #[test]
    fn test_json_round_trip_keeps_counts() {
        let layer = sample_layer();
        let json = to_json(&layer).unwrap();
        let back = from_json(&json).unwrap();

        assert_eq!(back.geometry_descriptions().len(), 2);
        assert_eq!(back.text_descriptions().len(), 1);

        let line = &back.geometry_descriptions()[1];
        assert_eq!(line.descriptor(), layer.geometry_descriptions()[1].descriptor());
        assert_eq!(back.text_descriptions()[0].text().unwrap().text, "Hello");
        assert_eq!(back.text_descriptions()[0].blending, BlendMode::TextDefault);
    }

    #[test]
    fn test_box_parameters_are_encode_only() {
        let layer = sample_layer();
        let json = to_json(&layer).unwrap();
        assert!(json.contains("4.0"));

        let back = from_json(&json).unwrap();
        let cube = &back.geometry_descriptions()[0];
        assert_eq!(cube.descriptor(), &GeometryDescriptor::Box(BoxSettings::default()));
        assert_eq!(cube.transformation, Mat4::translation(1.0, 2.0, 3.0));
        assert_eq!(cube.color, Color::RED);
    }

    #[test]
    fn test_cache_is_not_serialized() {
        let mut registry = ContextRegistry::new();
        let id = registry.create(ContextBuilder::new());
        let layer = sample_layer();
        layer.geometry_descriptions()[0].get_geometry(registry.get_mut(id).unwrap());

        let json = to_json(&layer).unwrap();
        assert!(!json.contains("cache"));
        let back = from_json(&json).unwrap();
        assert!(back.geometry_descriptions()[0].cache().is_empty());
    }

    #[test]
    fn test_binary_encoders() {
        let layer = sample_layer();

        let bincode = to_bincode(&layer).unwrap();
        let compact = to_msgpack(&layer).unwrap();
        let document = to_document(&layer).unwrap();

        assert!(!bincode.is_empty());
        assert!(!compact.is_empty());
        // Named encoding carries the field names, the compact one does not
        let contains = |bytes: &[u8], needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
        assert!(contains(&document, b"transformation"));
        assert!(!contains(&compact, b"transformation"));
        assert!(document.len() > compact.len());
    }

    #[test]
    fn test_unknown_kind_with_params_decodes() {
        let layer = DrawDescriptionLayer::new(
            vec![Rc::new(DrawGeometryDescription::default())],
            Vec::new(),
            Vec::new(),
        );
        let json = to_json(&layer)
            .unwrap()
            .replace(r#""kind": "Quad""#, r#""kind": "Torus""#);
        assert!(json.contains("Torus"));

        let back = from_json(&json).unwrap();
        assert_eq!(back.geometry_descriptions().len(), 1);
        assert_eq!(back.geometry_descriptions()[0].descriptor(), &GeometryDescriptor::Unknown);

        let mut registry = ContextRegistry::new();
        let id = registry.create(ContextBuilder::new());
        let ctx = registry.get_mut(id).unwrap();
        let key = back.geometry_descriptions()[0].get_geometry(ctx);
        assert_eq!(ctx.geometry(key).unwrap().vertex_count(), 4);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(from_json("{"), Err(SerialError::Json(_))));
    }
}
