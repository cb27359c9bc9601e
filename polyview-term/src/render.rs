/// CPU rasterizer: composed scenes to pixel framebuffers
use nalgebra::{Matrix4, Point3, Vector3};
use polyview_core::scene::{Actor, DrawStyle};
use polyview_core::viewport::PixelRect;
use polyview_core::{Rgb, Scene};

/// Character luminosity ramp for the terminal preview (darkest to
/// lightest).
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// An RGB color buffer with a matching depth buffer.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<Rgb>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![Rgb::BLACK; size],
            depth: vec![f32::INFINITY; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.color[(y * self.width + x) as usize]
    }

    /// Reset a rectangle to its background color and clear its depth.
    fn fill_rect(&mut self, rect: &PixelRect, background: Rgb) {
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                let idx = (y * self.width + x) as usize;
                self.color[idx] = background;
                self.depth[idx] = f32::INFINITY;
            }
        }
    }

    /// Depth-tested write, clipped to `rect`.
    fn plot(&mut self, x: i32, y: i32, rect: &PixelRect, depth: f32, color: Rgb) {
        if x < rect.x as i32
            || y < rect.y as i32
            || x >= (rect.x + rect.w) as i32
            || y >= (rect.y + rect.h) as i32
        {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.color[idx] = color;
        }
    }

    /// Quantize to an 8-bit RGB image.
    pub fn to_image(&self) -> image::RgbImage {
        let mut img = image::RgbImage::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb(self.pixel(x, y).to_u8());
        }
        img
    }

    /// One string per pixel row, luminance mapped onto the character
    /// ramp.
    pub fn ascii_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let c = self.pixel(x, y);
                        let luminance = 0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b;
                        let index = (luminance.clamp(0.0, 1.0)
                            * (LUMINOSITY_RAMP.len() - 1) as f32)
                            .round() as usize;
                        LUMINOSITY_RAMP[index]
                    })
                    .collect()
            })
            .collect()
    }
}

/// Render the scene at its composed dimensions.
pub fn render_scene(scene: &Scene) -> FrameBuffer {
    render_scaled(scene, scene.width(), scene.height())
}

/// Render the scene into an arbitrary target size; viewports keep
/// their normalized rectangles. Used for the terminal preview.
pub fn render_scaled(scene: &Scene, width: u32, height: u32) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height);
    for renderer in scene.renderers() {
        let rect = renderer.viewport.to_pixels(width, height);
        if rect.w == 0 || rect.h == 0 {
            continue;
        }
        frame.fill_rect(&rect, renderer.background);

        let camera = renderer.camera.borrow();
        let aspect = rect.w as f32 / rect.h as f32;
        let view_proj = camera.projection_matrix(aspect) * camera.view_matrix();
        let eye = camera.position;
        for actor in &renderer.actors {
            draw_actor(&mut frame, &rect, actor, &view_proj, &eye);
        }
    }
    frame
}

fn draw_actor(
    frame: &mut FrameBuffer,
    rect: &PixelRect,
    actor: &Actor,
    view_proj: &Matrix4<f32>,
    eye: &Point3<f32>,
) {
    if actor.material.style == DrawStyle::Surface {
        for triangle in &actor.mesh.triangles {
            let world = triangle.points.map(|p| actor.model.transform_point(&p));
            draw_triangle(frame, rect, &world, actor, view_proj, eye);
        }
    }
    for polyline in &actor.mesh.polylines {
        for pair in polyline.points.windows(2) {
            let a = actor.model.transform_point(&pair[0]);
            let b = actor.model.transform_point(&pair[1]);
            draw_segment(frame, rect, a, b, actor.material.ambient, view_proj);
        }
    }
}

/// Project a world point into `rect`. `None` behind the camera;
/// off-rect points are clipped pixel by pixel during rasterization.
fn project(point: &Point3<f32>, view_proj: &Matrix4<f32>, rect: &PixelRect) -> Option<[f32; 3]> {
    let clip = view_proj * point.to_homogeneous();
    if clip.w <= 1.0e-6 {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    let x = rect.x as f32 + (ndc.x + 1.0) / 2.0 * rect.w as f32;
    let y = rect.y as f32 + (1.0 - ndc.y) / 2.0 * rect.h as f32;
    Some([x, y, ndc.z])
}

fn draw_triangle(
    frame: &mut FrameBuffer,
    rect: &PixelRect,
    world: &[Point3<f32>; 3],
    actor: &Actor,
    view_proj: &Matrix4<f32>,
    eye: &Point3<f32>,
) {
    let v0 = match project(&world[0], view_proj, rect) {
        Some(v) => v,
        None => return,
    };
    let v1 = match project(&world[1], view_proj, rect) {
        Some(v) => v,
        None => return,
    };
    let v2 = match project(&world[2], view_proj, rect) {
        Some(v) => v,
        None => return,
    };

    // Headlight shading: diffuse falls off with the angle between the
    // face normal and the eye direction, double-sided.
    let edge1 = world[1] - world[0];
    let edge2 = world[2] - world[0];
    let normal = edge1
        .cross(&edge2)
        .try_normalize(1.0e-12)
        .unwrap_or_else(Vector3::zeros);
    let centroid = Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);
    let light = (eye - centroid)
        .try_normalize(1.0e-6)
        .unwrap_or_else(Vector3::z);
    let brightness = normal.dot(&light).abs();
    let shade = actor
        .material
        .ambient
        .plus(&actor.material.diffuse.scaled(brightness));

    // Bounding box, clipped to the viewport rectangle
    let min_x = (v0[0].min(v1[0]).min(v2[0]).floor() as i32).max(rect.x as i32);
    let max_x = (v0[0].max(v1[0]).max(v2[0]).ceil() as i32).min((rect.x + rect.w) as i32 - 1);
    let min_y = (v0[1].min(v1[1]).min(v2[1]).floor() as i32).max(rect.y as i32);
    let max_y = (v0[1].max(v1[1]).max(v2[1]).ceil() as i32).min((rect.y + rect.h) as i32 - 1);

    // Scanline rasterization
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            if let Some((w0, w1, w2)) = barycentric(
                (v0[0], v0[1]),
                (v1[0], v1[1]),
                (v2[0], v2[1]),
                (px, py),
            ) {
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0[2] + w1 * v1[2] + w2 * v2[2];
                    frame.plot(x, y, rect, depth, shade);
                }
            }
        }
    }
}

fn draw_segment(
    frame: &mut FrameBuffer,
    rect: &PixelRect,
    a: Point3<f32>,
    b: Point3<f32>,
    color: Rgb,
    view_proj: &Matrix4<f32>,
) {
    let (Some(a), Some(b)) = (project(&a, view_proj, rect), project(&b, view_proj, rect)) else {
        return;
    };
    let steps = (b[0] - a[0]).abs().max((b[1] - a[1]).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (a[0] + (b[0] - a[0]) * t).round() as i32;
        let y = (a[1] + (b[1] - a[1]) * t).round() as i32;
        // Lines win ties against the surface they trace.
        let depth = a[2] + (b[2] - a[2]) * t - 1.0e-3;
        frame.plot(x, y, rect, depth, color);
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);
    if denom.abs() < 1e-6 {
        return None;
    }
    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix4;
    use polyview_core::scene::{compose, Material, Renderer};
    use polyview_core::viewport::layout;
    use polyview_core::{Mesh, Polyline, SharedCamera, Triangle, ViewCamera};

    fn flat_material(ambient: Rgb) -> Material {
        Material {
            ambient,
            diffuse: Rgb::BLACK,
            style: DrawStyle::Surface,
        }
    }

    fn facing_triangle(z: f32) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(0.0, 1.0, z),
        ));
        mesh
    }

    #[test]
    fn test_viewports_keep_their_backgrounds() {
        let camera = SharedCamera::new(ViewCamera::new());
        let viewports = layout(2).unwrap();
        let red = Rgb::new(1.0, 0.0, 0.0);
        let blue = Rgb::new(0.0, 0.0, 1.0);
        let renderers = vec![
            Renderer::new(viewports[0], red, camera.clone()),
            Renderer::new(viewports[1], blue, camera),
        ];
        let scene = compose(renderers, 50).unwrap();
        let frame = render_scene(&scene);
        assert_eq!((frame.width(), frame.height()), (100, 50));
        assert_eq!(frame.pixel(25, 25), red);
        assert_eq!(frame.pixel(75, 25), blue);
    }

    #[test]
    fn test_triangle_covers_the_center() {
        let camera = SharedCamera::new(ViewCamera::new());
        let viewport = layout(1).unwrap()[0];
        let mut renderer = Renderer::new(viewport, Rgb::BLACK, camera);
        let green = Rgb::new(0.0, 1.0, 0.0);
        renderer.add_actor(Actor::new(
            facing_triangle(0.0),
            Matrix4::identity(),
            flat_material(green),
        ));
        let scene = compose(vec![renderer], 100).unwrap();
        let frame = render_scene(&scene);
        assert_eq!(frame.pixel(50, 50), green);
        // Corners stay background
        assert_eq!(frame.pixel(2, 2), Rgb::BLACK);
    }

    #[test]
    fn test_depth_test_keeps_the_nearer_triangle() {
        // Camera sits at +z, so z = 1 is nearer than z = -1.
        let camera = SharedCamera::new(ViewCamera::new());
        let viewport = layout(1).unwrap()[0];
        let mut renderer = Renderer::new(viewport, Rgb::BLACK, camera);
        let near = Rgb::new(1.0, 0.0, 0.0);
        let far = Rgb::new(0.0, 1.0, 0.0);
        renderer.add_actor(Actor::new(
            facing_triangle(-1.0),
            Matrix4::identity(),
            flat_material(far),
        ));
        renderer.add_actor(Actor::new(
            facing_triangle(1.0),
            Matrix4::identity(),
            flat_material(near),
        ));
        let scene = compose(vec![renderer], 100).unwrap();
        let frame = render_scene(&scene);
        assert_eq!(frame.pixel(50, 50), near);
    }

    #[test]
    fn test_polylines_draw_in_the_ambient_color() {
        let camera = SharedCamera::new(ViewCamera::new());
        let viewport = layout(1).unwrap()[0];
        let mut renderer = Renderer::new(viewport, Rgb::BLACK, camera);
        let mut mesh = Mesh::new();
        mesh.add_polyline(Polyline::new(vec![
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]));
        renderer.add_actor(Actor::new(
            mesh,
            Matrix4::identity(),
            Material {
                ambient: Rgb::WHITE,
                diffuse: Rgb::BLACK,
                style: DrawStyle::Lines,
            },
        ));
        let scene = compose(vec![renderer], 100).unwrap();
        let frame = render_scene(&scene);
        assert_eq!(frame.pixel(50, 50), Rgb::WHITE);
        assert_eq!(frame.pixel(50, 25), Rgb::BLACK);
    }

    #[test]
    fn test_ascii_rows_ramp_dark_to_light() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.color[1] = Rgb::WHITE;
        let rows = frame.ascii_rows();
        assert_eq!(rows, vec![" @".to_string()]);
    }
}
