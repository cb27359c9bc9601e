/// Polyview Core Library - multi-view layout and placement engine
///
/// This library provides the stateless core for comparing legacy VTK
/// polydata meshes side by side: viewport partitioning, canonical
/// per-slot placements, a shared orbit camera, and the scene model a
/// frontend rasterizes.

pub mod camera;
pub mod color;
pub mod error;
pub mod fiber;
pub mod geometry;
pub mod placement;
pub mod scene;
pub mod viewport;
pub mod vtk;

// Re-export commonly used types
pub use camera::{apply_spec, CameraControls, SharedCamera, ViewCamera};
pub use color::{ColorScheme, Rgb};
pub use error::Error;
pub use fiber::tube_filter;
pub use geometry::{Bounds, Mesh, Polyline, Triangle};
pub use placement::{combi_placements, tiled_placements, Axis, Placement};
pub use scene::{compose, compose_tiled, Actor, DrawStyle, Material, Renderer, Scene};
pub use viewport::{layout, PixelRect, Viewport};
pub use vtk::{parse_vtk, VtkError};
