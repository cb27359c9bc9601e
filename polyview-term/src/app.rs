/// End-to-end pipeline: flags to a written image or a viewer session
use std::fs;

use anyhow::{Context, Result};
use log::{info, warn};
use polyview_core::placement::{combi_placements, tiled_placements, Placement};
use polyview_core::scene::{compose, compose_tiled, Actor, DrawStyle, Material, Renderer};
use polyview_core::viewport::layout;
use polyview_core::{
    apply_spec, parse_vtk, tube_filter, ColorScheme, Mesh, Scene, SharedCamera, ViewCamera,
};

use crate::capture::{self, RenderBackend};
use crate::config::Config;
use crate::viewer::TerminalViewer;

// Tube sweep parameters for --fiber.
const FIBER_RADIUS: f32 = 0.5;
const FIBER_SIDES: usize = 8;

pub fn run(config: &Config) -> Result<()> {
    config.validate()?;
    let meshes = load_meshes(config)?;
    let scene = build_scene(config, meshes)?;

    match &config.outfile {
        Some(path) => {
            let backend = if config.offscreen {
                RenderBackend::Offscreen
            } else {
                RenderBackend::Onscreen
            };
            capture::batch(&scene, path, backend)?;
        }
        None => TerminalViewer::new(scene).run()?,
    }
    Ok(())
}

fn load_meshes(config: &Config) -> Result<Vec<Mesh>> {
    let mut meshes = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        let data =
            fs::read(path).with_context(|| format!("cannot read `{}`", path.display()))?;
        let mut mesh =
            parse_vtk(&data).with_context(|| format!("cannot parse `{}`", path.display()))?;
        info!(
            "{}: {} triangles, {} polylines",
            path.display(),
            mesh.triangles.len(),
            mesh.polylines.len()
        );
        if config.fiber {
            mesh = tube_filter(&mesh, FIBER_RADIUS, FIBER_SIDES);
            if mesh.is_empty() {
                warn!("{}: no polylines to render as fibers", path.display());
            }
        }
        meshes.push(mesh);
    }
    Ok(meshes)
}

/// Assemble renderers from meshes and placements, share one camera
/// across all of them, frame it on the scene bounds and apply the
/// camera spec.
pub fn build_scene(config: &Config, meshes: Vec<Mesh>) -> Result<Scene> {
    let count = meshes.len();
    let scheme = config.scheme;
    let material = Material {
        ambient: scheme.surface_ambient(),
        diffuse: scheme.surface_diffuse(config.fiber),
        style: DrawStyle::Surface,
    };
    let camera = SharedCamera::new(ViewCamera::new());

    let scene = if config.multiview {
        let placements = tiled_placements(count, config.rotations)?;
        let renderers = layout(count)?
            .into_iter()
            .zip(meshes.into_iter().zip(placements))
            .map(|(viewport, (mesh, placement))| {
                let mut renderer = Renderer::new(viewport, scheme.background(), camera.clone());
                add_object(&mut renderer, mesh, &placement, material, config, scheme);
                renderer
            })
            .collect();
        compose(renderers, config.size)?
    } else {
        let placements = combi_placements(count, config.separation as f32)?;
        let viewport = layout(1)?[0];
        let mut renderer = Renderer::new(viewport, scheme.background(), camera.clone());
        for (mesh, placement) in meshes.into_iter().zip(placements) {
            add_object(&mut renderer, mesh, &placement, material, config, scheme);
        }
        // The shared viewport is still one tile per overlaid object
        // wide, so two objects get a double-width window.
        compose_tiled(vec![renderer], config.size, count)?
    };
    if let Some(bounds) = scene.bounds() {
        scene.camera().borrow_mut().reset_to_bounds(&bounds);
    }
    let shared = scene.camera();
    apply_spec(
        &mut *shared.borrow_mut(),
        config.camera.as_deref(),
        config.angle,
    )?;
    Ok(scene)
}

fn add_object(
    renderer: &mut Renderer,
    mesh: Mesh,
    placement: &Placement,
    material: Material,
    config: &Config,
    scheme: ColorScheme,
) {
    let model = placement.model_matrix();
    if config.outline {
        if let Some(bounds) = mesh.bounds() {
            renderer.add_actor(Actor::outline(&bounds, model, scheme.outline()));
        }
    }
    renderer.add_actor(Actor::new(mesh, model, material));
}
