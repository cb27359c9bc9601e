/// Polyview demo - two overlaid cubes
///
/// Builds a combi-view scene from two generated cubes and writes it
/// to cubes.png, the same pipeline a real run drives with .vtk files.
use std::path::Path;

use polyview_core::placement::combi_placements;
use polyview_core::scene::{compose, Actor, DrawStyle, Material, Renderer};
use polyview_core::viewport::layout;
use polyview_core::{ColorScheme, Mesh, SharedCamera, ViewCamera};
use polyview_term::capture::{batch, RenderBackend};

fn main() -> anyhow::Result<()> {
    let scheme = ColorScheme::Default;
    let material = Material {
        ambient: scheme.surface_ambient(),
        diffuse: scheme.surface_diffuse(false),
        style: DrawStyle::Surface,
    };

    let camera = SharedCamera::new(ViewCamera::new());
    let mut renderer = Renderer::new(layout(1)?[0], scheme.background(), camera);
    for placement in combi_placements(2, 4.0)? {
        renderer.add_actor(Actor::new(
            Mesh::cube(2.0),
            placement.model_matrix(),
            material,
        ));
    }

    let scene = compose(vec![renderer], 400)?;
    let bounds = scene.bounds().expect("cubes have bounds");
    scene.camera().borrow_mut().reset_to_bounds(&bounds);

    batch(&scene, Path::new("cubes.png"), RenderBackend::Offscreen)?;
    println!("wrote cubes.png");
    Ok(())
}
