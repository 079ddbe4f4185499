//! Pan/zoom transform, content bounds and fit-to-view framing

pub mod bounds;
pub mod camera;

pub use bounds::Bounds;
pub use camera::{Camera, ZoomTransform};
