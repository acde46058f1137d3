//! # Lathe Draw
//!
//! Per-frame draw state on top of [`lathe_geometry`].
//!
//! - **Descriptions**: transform, color and blend state around a geometry
//!   descriptor, with a per-context geometry cache
//! - **Sprites and instanced boxes**: batches with derived instance counts
//! - **Layers**: ordered draw sets with concat, unite and deep copy
//! - **Wire formats**: bincode, MessagePack and JSON encoders
//! - **Raw buffers**: uniform access to pointer, owned and shared bytes
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use lathe_core::{BlendMode, Color, Mat4};
//! use lathe_draw::{DrawDescriptionLayer, DrawGeometryDescription};
//! use lathe_geometry::{ContextBuilder, ContextRegistry, GeometryDescriptor};
//!
//! let mut registry = ContextRegistry::new();
//! let context = registry.create(ContextBuilder::new());
//!
//! let quad = DrawGeometryDescription::new(
//!     GeometryDescriptor::default(),
//!     Mat4::IDENTITY,
//!     Color::WHITE,
//!     BlendMode::Blend,
//! );
//! let layer = DrawDescriptionLayer::new(vec![Rc::new(quad)], Vec::new(), Vec::new());
//!
//! for desc in layer.geometry_descriptions() {
//!     let key = desc.get_geometry(registry.get_mut(context).unwrap());
//!     assert!(registry.get(context).unwrap().geometry(key).is_some());
//! }
//! layer.dispose(&mut registry);
//! ```

pub mod buffer_geometry;
pub mod description;
pub mod layer;
pub mod raw_buffer;
pub mod serial;
pub mod sprites;

pub use buffer_geometry::BufferGeometry;
pub use description::{DrawDescription, DrawGeometryDescription, DrawTextDescription};
pub use layer::DrawDescriptionLayer;
pub use raw_buffer::{RawBufferDataType, RawBufferDescription};
pub use serial::SerialError;
pub use sprites::{DrawSpritesDescription, SpriteParams, DEFAULT_SPRITE_SIZE};
