/// Geometry primitives: triangles, polylines, meshes and bounds
use nalgebra::{Matrix4, Point3, Vector3};

/// A triangle face defined by three corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self { points: [p0, p1, p2] }
    }

    /// Unit face normal, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vector3<f32> {
        let edge1 = self.points[1] - self.points[0];
        let edge2 = self.points[2] - self.points[0];
        edge1
            .cross(&edge2)
            .try_normalize(1.0e-12)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// An open polygonal curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point3<f32>>,
}

impl Polyline {
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        Self { points }
    }
}

/// Mesh data as read from a polydata file: surface triangles plus
/// free-standing curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub polylines: Vec<Polyline>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangles),
            polylines: Vec::new(),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn add_polyline(&mut self, polyline: Polyline) {
        self.polylines.push(polyline);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.polylines.is_empty()
    }

    /// Axis-aligned bounds over all triangle and polyline points, or
    /// `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let triangle_points = self.triangles.iter().flat_map(|t| t.points.iter());
        let polyline_points = self.polylines.iter().flat_map(|p| p.points.iter());
        Bounds::from_points(triangle_points.chain(polyline_points))
    }

    /// A cube centered on the origin, for demos and tests.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corner = [
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        // Outward-facing quads, split into two triangles each.
        const FACES: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // +z
            [1, 0, 3, 2], // -z
            [3, 7, 6, 2], // +y
            [0, 1, 5, 4], // -y
            [1, 2, 6, 5], // +x
            [0, 4, 7, 3], // -x
        ];

        let mut mesh = Self::with_capacity(12);
        for face in FACES {
            mesh.add_triangle(Triangle::new(corner[face[0]], corner[face[1]], corner[face[2]]));
            mesh.add_triangle(Triangle::new(corner[face[0]], corner[face[2]], corner[face[3]]));
        }
        mesh
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Tight bounds around a set of points, or `None` when empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = Self::new(first, first);
        for point in points {
            bounds.expand(point);
        }
        Some(bounds)
    }

    /// Grow to include `point`.
    pub fn expand(&mut self, point: &Point3<f32>) {
        self.min = Point3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Point3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    /// Smallest box covering `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut bounds = *self;
        bounds.expand(&other.min);
        bounds.expand(&other.max);
        bounds
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Radius of the bounding sphere around the center.
    pub fn radius(&self) -> f32 {
        ((self.max - self.min) / 2.0).norm()
    }

    /// The eight corners, bottom ring (min z) first, both rings wound
    /// counter-clockwise from the min corner.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ]
    }

    /// The twelve box edges as two-point polylines.
    pub fn outline(&self) -> Mesh {
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (1, 2), (2, 3), (3, 0), // bottom ring
            (4, 5), (5, 6), (6, 7), (7, 4), // top ring
            (0, 4), (1, 5), (2, 6), (3, 7), // verticals
        ];
        let corner = self.corners();
        let mut mesh = Mesh::new();
        for (a, b) in EDGES {
            mesh.add_polyline(Polyline::new(vec![corner[a], corner[b]]));
        }
        mesh
    }

    /// Axis-aligned bounds of the transformed box corners.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point(&c));
        Self::from_points(corners.iter()).unwrap_or(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_triangle_count() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.triangles.len(), 12);
        assert!(mesh.polylines.is_empty());
    }

    #[test]
    fn test_cube_normals_face_outward() {
        let mesh = Mesh::cube(2.0);
        for triangle in &mesh.triangles {
            let centroid = (triangle.points[0].coords
                + triangle.points[1].coords
                + triangle.points[2].coords)
                / 3.0;
            assert!(triangle.normal().dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_meshes_compare_by_value() {
        assert_eq!(Mesh::cube(2.0), Mesh::cube(2.0));
        assert_ne!(Mesh::cube(2.0), Mesh::cube(1.0));
    }

    #[test]
    fn test_mesh_bounds() {
        let mesh = Mesh::cube(2.0);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));
        assert!((bounds.radius() - 3.0_f32.sqrt()).abs() < 1e-6);
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Bounds::new(Point3::new(-2.0, 0.5, 0.0), Point3::new(0.0, 3.0, 0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(u.max, Point3::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn test_outline_has_twelve_edges() {
        let bounds = Bounds::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        let outline = bounds.outline();
        assert_eq!(outline.polylines.len(), 12);
        assert!(outline.polylines.iter().all(|p| p.points.len() == 2));
        assert!(outline.triangles.is_empty());
        // Each corner is touched by exactly three edges.
        for corner in bounds.corners() {
            let touching = outline
                .polylines
                .iter()
                .filter(|p| p.points.contains(&corner))
                .count();
            assert_eq!(touching, 3);
        }
    }

    #[test]
    fn test_transformed_bounds_follow_translation() {
        let bounds = Bounds::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let shift = Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0));
        let moved = bounds.transformed(&shift);
        assert_eq!(moved.min, Point3::new(4.0, -1.0, -1.0));
        assert_eq!(moved.max, Point3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_degenerate_triangle_normal_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let triangle = Triangle::new(p, p, p);
        assert_eq!(triangle.normal(), Vector3::zeros());
    }
}
