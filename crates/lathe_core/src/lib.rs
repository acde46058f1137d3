//! Lathe Core
//!
//! Plain value types shared by the geometry and draw crates:
//!
//! - **Math**: `Vec2`, `Vec3` and the column-major `Mat4`
//! - **Color**: linear RGBA colors
//! - **Draw state**: blend modes, transformation spaces and clip rectangles
//!
//! Everything here is `Copy`, serializable with serde, and free of any
//! graphics API.
//!
//! # Example
//!
//! ```rust
//! use lathe_core::{Mat4, Vec3};
//!
//! // Move first, then scale
//! let m = Mat4::translation(1.0, 0.0, 0.0).then(&Mat4::scale(2.0, 2.0, 2.0));
//! assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
//! ```

pub mod color;
pub mod math;
pub mod state;

pub use color::Color;
pub use math::{Mat4, Vec2, Vec3};
pub use state::{BlendMode, Point, Rect, Size, TransformationSpace};
