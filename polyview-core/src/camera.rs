/// Shared orbit camera and camera-spec application
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

use crate::error::Error;
use crate::geometry::Bounds;

/// Orbit operations a camera spec can drive.
pub trait CameraControls {
    fn azimuth(&mut self, degrees: f32);
    fn elevation(&mut self, degrees: f32);
    fn roll(&mut self, degrees: f32);
}

/// Apply a camera spec string: each character turns the camera by
/// `angle` degrees, `a` for azimuth, `e` for elevation, `r` for roll,
/// case-insensitively and in the given order. `None` leaves the camera
/// untouched.
pub fn apply_spec(
    camera: &mut impl CameraControls,
    spec: Option<&str>,
    angle: f32,
) -> Result<(), Error> {
    let Some(spec) = spec else {
        return Ok(());
    };
    for step in spec.chars().map(|c| c.to_ascii_lowercase()) {
        match step {
            'a' => camera.azimuth(angle),
            'e' => camera.elevation(angle),
            'r' => camera.roll(angle),
            other => return Err(Error::InvalidCameraSpec(other)),
        }
    }
    Ok(())
}

/// Perspective orbit camera. Every viewport of a scene renders through
/// the same instance, via `SharedCamera`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCamera {
    pub position: Point3<f32>,
    pub focal: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewCamera {
    pub fn new() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            focal: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::PI / 6.0, // 30 degrees
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.focal, &self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }

    /// Distance from the camera to its focal point.
    pub fn focal_distance(&self) -> f32 {
        (self.focal - self.position).norm()
    }

    fn view_dir(&self) -> Vector3<f32> {
        self.focal - self.position
    }

    /// Re-frame on `bounds`: keep the current view direction, center
    /// the focal point and back off until the bounding sphere fits the
    /// vertical field of view, then reset the clipping range.
    pub fn reset_to_bounds(&mut self, bounds: &Bounds) {
        let direction = self
            .view_dir()
            .try_normalize(1.0e-6)
            .unwrap_or_else(|| -Vector3::z());
        let radius = bounds.radius().max(1.0e-3);
        let distance = radius / (self.fov / 2.0).sin();
        self.focal = bounds.center();
        self.position = self.focal - direction * distance;
        self.near = (distance - 2.0 * radius).max(distance / 100.0);
        self.far = distance + 2.0 * radius;
    }

    fn orbit_position(&mut self, axis: Vector3<f32>, degrees: f32) {
        let Some(axis) = Unit::try_new(axis, 1.0e-6) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.position = self.focal + rotation * (self.position - self.focal);
        self.up = rotation * self.up;
    }
}

impl CameraControls for ViewCamera {
    /// Orbit horizontally about the focal point, around the view-up
    /// axis.
    fn azimuth(&mut self, degrees: f32) {
        let axis = self.up;
        self.orbit_position(axis, degrees);
    }

    /// Orbit vertically about the focal point; positive angles raise
    /// the camera. The up vector follows to stay orthogonal.
    fn elevation(&mut self, degrees: f32) {
        let axis = self.up.cross(&self.view_dir());
        self.orbit_position(axis, degrees);
    }

    /// Rotate the up vector about the view direction.
    fn roll(&mut self, degrees: f32) {
        let Some(axis) = Unit::try_new(self.view_dir(), 1.0e-6) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.up = rotation * self.up;
    }
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheaply clonable single-threaded handle to a camera. Clones share
/// one instance: a mutation through any handle is visible through all
/// of them.
#[derive(Debug, Clone)]
pub struct SharedCamera {
    inner: Rc<RefCell<ViewCamera>>,
}

impl SharedCamera {
    pub fn new(camera: ViewCamera) -> Self {
        Self {
            inner: Rc::new(RefCell::new(camera)),
        }
    }

    pub fn borrow(&self) -> Ref<'_, ViewCamera> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ViewCamera> {
        self.inner.borrow_mut()
    }

    /// True when both handles refer to the same camera instance.
    pub fn shares_with(&self, other: &SharedCamera) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which operations ran, in order.
    struct Recorder {
        calls: Vec<(char, f32)>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { calls: Vec::new() }
        }
    }

    impl CameraControls for Recorder {
        fn azimuth(&mut self, degrees: f32) {
            self.calls.push(('a', degrees));
        }
        fn elevation(&mut self, degrees: f32) {
            self.calls.push(('e', degrees));
        }
        fn roll(&mut self, degrees: f32) {
            self.calls.push(('r', degrees));
        }
    }

    #[test]
    fn test_spec_applies_in_order_case_insensitively() {
        let mut recorder = Recorder::new();
        apply_spec(&mut recorder, Some("aEr"), 30.0).unwrap();
        assert_eq!(recorder.calls, vec![('a', 30.0), ('e', 30.0), ('r', 30.0)]);
    }

    #[test]
    fn test_spec_absent_is_a_noop() {
        let mut recorder = Recorder::new();
        apply_spec(&mut recorder, None, 90.0).unwrap();
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_spec_rejects_unknown_direction() {
        let mut recorder = Recorder::new();
        let result = apply_spec(&mut recorder, Some("axe"), 90.0);
        assert_eq!(result, Err(Error::InvalidCameraSpec('x')));
        // Steps before the offending character have already run.
        assert_eq!(recorder.calls, vec![('a', 90.0)]);
    }

    #[test]
    fn test_orbit_preserves_focal_distance() {
        let mut camera = ViewCamera::new();
        let distance = camera.focal_distance();
        camera.azimuth(37.0);
        camera.elevation(23.0);
        camera.roll(11.0);
        assert!((camera.focal_distance() - distance).abs() < 1e-4);
    }

    #[test]
    fn test_positive_elevation_raises_the_camera() {
        let mut camera = ViewCamera::new();
        camera.elevation(45.0);
        assert!(camera.position.y > 0.0);
    }

    #[test]
    fn test_spec_order_changes_the_result() {
        let mut ae = ViewCamera::new();
        let mut ea = ViewCamera::new();
        apply_spec(&mut ae, Some("ae"), 90.0).unwrap();
        apply_spec(&mut ea, Some("ea"), 90.0).unwrap();
        assert!((ae.position - ea.position).norm() > 1e-3);
    }

    #[test]
    fn test_reset_frames_unit_cube() {
        let bounds = Bounds::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let mut camera = ViewCamera::new();
        camera.azimuth(30.0);
        camera.elevation(-20.0);
        camera.reset_to_bounds(&bounds);

        assert_eq!(camera.focal, Point3::origin());
        let mvp = camera.projection_matrix(1.0) * camera.view_matrix();
        for corner in bounds.corners() {
            let clip = mvp * corner.to_homogeneous();
            assert!(clip.w > 0.0);
            let ndc = clip.xyz() / clip.w;
            assert!(ndc.x.abs() <= 1.001, "corner {corner} out of view: {ndc}");
            assert!(ndc.y.abs() <= 1.001, "corner {corner} out of view: {ndc}");
            assert!(ndc.z.abs() <= 1.001, "corner {corner} clipped: {ndc}");
        }
    }

    #[test]
    fn test_shared_camera_identity() {
        let shared = SharedCamera::new(ViewCamera::new());
        let alias = shared.clone();
        let separate = SharedCamera::new(ViewCamera::new());
        assert!(shared.shares_with(&alias));
        assert!(!shared.shares_with(&separate));
    }

    #[test]
    fn test_mutation_visible_through_every_handle() {
        let shared = SharedCamera::new(ViewCamera::new());
        let alias = shared.clone();
        let before = shared.borrow().position;
        alias.borrow_mut().azimuth(90.0);
        let after = shared.borrow().position;
        assert!((after - before).norm() > 1e-3);
        assert_eq!(*shared.borrow(), *alias.borrow());
    }
}
