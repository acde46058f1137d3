//! # Lathe Geometry
//!
//! Geometry synthesis for the Lathe draw pipeline.
//!
//! This crate provides:
//! - **Descriptors**: immutable, serializable shape requests
//! - **Primitive factory**: descriptor to packed vertex buffers
//! - **Text outlines**: shaping and extrusion of 3D text
//! - **Render contexts**: per-device geometry arenas and caches
//!
//! ## Quick Start
//!
//! ```rust
//! use lathe_geometry::{ContextBuilder, ContextRegistry, GeometryCache, GeometryDescriptor};
//!
//! let mut registry = ContextRegistry::new();
//! let id = registry.create(ContextBuilder::new());
//!
//! let cache = GeometryCache::new();
//! let descriptor = GeometryDescriptor::default();
//! let key = cache.get_or_build(registry.get_mut(id).unwrap(), &descriptor);
//!
//! let quad = registry.get(id).unwrap().geometry(key).unwrap();
//! assert_eq!(quad.vertex_count(), 4);
//!
//! let report = cache.dispose(&mut registry);
//! assert_eq!(report.released, 1);
//! ```

// Vertex formats and packed buffers
pub mod bounds;
pub mod buffer;
pub mod vertex;

// Shape requests
pub mod descriptor;

// Builders
pub mod factory;
pub mod primitives;
pub mod text;

// Context lifecycle and caching
pub mod cache;
pub mod context;

pub mod config;
pub mod error;

pub use bounds::BoundingBox;
pub use buffer::GeometryBuffer;
pub use cache::{DisposeReport, GeometryCache};
pub use config::GeometryConfig;
pub use context::{ContextBuilder, ContextId, ContextRegistry, GeometryKey, RenderContext};
pub use descriptor::{
    BoxSettings, CylinderSettings, DiscSettings, GeometryDescriptor, LineDescriptor,
    MeshJoinDescriptor, ParagraphAlignment, PolygonDescriptor, QuadSettings, RoundQuadSettings,
    SphereSettings, TextAlignment, TextDescriptor, TubeSettings,
};
pub use error::{ConfigError, GeometryError, TextError};
pub use primitives::{BuiltinPrimitives, PrimitiveLibrary};
pub use text::{FontOutlineShaper, LyonExtruder, Outline, OutlineExtruder, OutlineShaper, TextPipeline, TextRequest};
pub use vertex::{PositionNormal, Topology, Vertex, VertexFormat, VertexLayout};
