/// Scene model: actors, per-viewport renderers and composed windows
use nalgebra::Matrix4;

use crate::camera::SharedCamera;
use crate::color::Rgb;
use crate::error::Error;
use crate::geometry::{Bounds, Mesh};
use crate::viewport::Viewport;

/// How an actor's geometry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    /// Shaded triangles, plus any free-standing curves.
    Surface,
    /// Curves only.
    Lines,
}

/// Lighting terms for an actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub style: DrawStyle,
}

/// One displayed object: a mesh with its placement baked into a model
/// matrix.
#[derive(Debug, Clone)]
pub struct Actor {
    pub mesh: Mesh,
    pub model: Matrix4<f32>,
    pub material: Material,
}

impl Actor {
    pub fn new(mesh: Mesh, model: Matrix4<f32>, material: Material) -> Self {
        Self { mesh, model, material }
    }

    /// A bounding-box outline: the twelve box edges drawn as lines,
    /// under the same model matrix as the object they frame.
    pub fn outline(bounds: &Bounds, model: Matrix4<f32>, color: Rgb) -> Self {
        Self {
            mesh: bounds.outline(),
            model,
            material: Material {
                ambient: color,
                diffuse: Rgb::BLACK,
                style: DrawStyle::Lines,
            },
        }
    }

    /// World-space bounds after the model transform, `None` for an
    /// empty mesh.
    pub fn world_bounds(&self) -> Option<Bounds> {
        self.mesh.bounds().map(|b| b.transformed(&self.model))
    }
}

/// One viewport's drawable context. Every renderer of a scene holds a
/// handle to the same shared camera.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub viewport: Viewport,
    pub background: Rgb,
    pub actors: Vec<Actor>,
    pub camera: SharedCamera,
}

impl Renderer {
    pub fn new(viewport: Viewport, background: Rgb, camera: SharedCamera) -> Self {
        Self {
            viewport,
            background,
            actors: Vec::new(),
            camera,
        }
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }
}

/// A composed window: at least one renderer, in display order, plus
/// the pixel dimensions they share. Immutable once composed.
#[derive(Debug, Clone)]
pub struct Scene {
    renderers: Vec<Renderer>,
    width: u32,
    height: u32,
}

impl Scene {
    pub fn renderers(&self) -> &[Renderer] {
        &self.renderers
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Handle to the camera all renderers share.
    pub fn camera(&self) -> SharedCamera {
        self.renderers[0].camera.clone()
    }

    /// Union of the world-space bounds of every actor, `None` when all
    /// meshes are empty.
    pub fn bounds(&self) -> Option<Bounds> {
        self.renderers
            .iter()
            .flat_map(|r| r.actors.iter())
            .filter_map(Actor::world_bounds)
            .reduce(|a, b| a.union(&b))
    }
}

/// Size a window for `renderers.len()` tiles of `tile_size` pixels:
/// up to three tiles sit in one row, four form a 2x2 grid.
pub fn compose(renderers: Vec<Renderer>, tile_size: u32) -> Result<Scene, Error> {
    let tiles = renderers.len();
    compose_tiled(renderers, tile_size, tiles)
}

/// Size a window for `tiles` logical tiles of `tile_size` pixels.
/// Combi-view passes more tiles than renderers: two overlaid objects
/// widen the window to two tiles even though they share one viewport.
pub fn compose_tiled(
    renderers: Vec<Renderer>,
    tile_size: u32,
    tiles: usize,
) -> Result<Scene, Error> {
    if renderers.is_empty() {
        return Err(Error::InvalidTileCount(0));
    }
    let (width, height) = match tiles {
        0 => return Err(Error::InvalidTileCount(0)),
        n if n < 4 => (tile_size * n as u32, tile_size),
        4 => (tile_size * 2, tile_size * 2),
        n => return Err(Error::TooManyTiles(n)),
    };
    Ok(Scene {
        renderers,
        width,
        height,
    })
}
