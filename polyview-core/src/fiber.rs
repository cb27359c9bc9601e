/// Tube sweep for polyline data
use nalgebra::{Point3, Vector3};

use crate::geometry::{Mesh, Triangle};

/// Sweep a circular cross-section of `radius` with `sides` facets along
/// every polyline of `mesh`, producing a surface mesh of stitched quads
/// without end caps. Input triangles are ignored; a mesh without
/// polylines yields an empty result.
pub fn tube_filter(mesh: &Mesh, radius: f32, sides: usize) -> Mesh {
    let mut tubes = Mesh::new();
    for polyline in &mesh.polylines {
        sweep(&mut tubes, &polyline.points, radius, sides);
    }
    tubes
}

fn sweep(out: &mut Mesh, points: &[Point3<f32>], radius: f32, sides: usize) {
    if points.len() < 2 || sides < 3 {
        return;
    }

    // One cross-section ring per point, the frame parallel-transported
    // along the curve so the tube does not twist between segments.
    let mut rings: Vec<Vec<Point3<f32>>> = Vec::with_capacity(points.len());
    let mut tangent = direction(points[0], points[1]);
    let mut normal = perpendicular(&tangent);

    for i in 0..points.len() {
        let next_tangent = if i + 1 < points.len() {
            direction(points[i], points[i + 1])
        } else {
            tangent
        };
        let joint = (tangent + next_tangent)
            .try_normalize(1.0e-6)
            .unwrap_or(tangent);
        normal = (normal - joint * normal.dot(&joint))
            .try_normalize(1.0e-6)
            .unwrap_or_else(|| perpendicular(&joint));
        let binormal = joint.cross(&normal);

        let ring = (0..sides)
            .map(|s| {
                let theta = s as f32 / sides as f32 * std::f32::consts::TAU;
                points[i] + (normal * theta.cos() + binormal * theta.sin()) * radius
            })
            .collect();
        rings.push(ring);
        tangent = next_tangent;
    }

    for pair in rings.windows(2) {
        for s in 0..sides {
            let t = (s + 1) % sides;
            out.add_triangle(Triangle::new(pair[0][s], pair[0][t], pair[1][s]));
            out.add_triangle(Triangle::new(pair[0][t], pair[1][t], pair[1][s]));
        }
    }
}

fn direction(from: Point3<f32>, to: Point3<f32>) -> Vector3<f32> {
    (to - from).try_normalize(1.0e-9).unwrap_or_else(Vector3::z)
}

/// Any unit vector perpendicular to `v`.
fn perpendicular(v: &Vector3<f32>) -> Vector3<f32> {
    let other = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&other).normalize()
}
