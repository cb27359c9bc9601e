/// Canonical per-slot object placements
use nalgebra::{Matrix4, Vector3};

use crate::error::Error;

/// World axis of a fixed-axis rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Rotation steps (degrees) and an optional translation applied to one
/// displayed object.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub rotations: Vec<(Axis, f32)>,
    pub translation: Option<Vector3<f32>>,
}

impl Placement {
    /// Compose the rotations in listed order about fixed world axes,
    /// then the translation.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        for (axis, degrees) in &self.rotations {
            matrix = Matrix4::new_rotation(axis.unit() * degrees.to_radians()) * matrix;
        }
        if let Some(translation) = self.translation {
            matrix = Matrix4::new_translation(&translation) * matrix;
        }
        matrix
    }
}

/// Canonical orientations for tiled slots. Slot 2 carries an explicit
/// 0-degree Z step.
const TILED_ROTATIONS: [&[(Axis, f32)]; 4] = [
    &[(Axis::Y, -90.0)],
    &[(Axis::Y, 90.0)],
    &[(Axis::X, -90.0), (Axis::Z, 0.0)],
    &[(Axis::Z, -90.0)],
];

/// Placement for one tile of a side-by-side comparison.
pub fn tiled(slot: usize) -> Result<Placement, Error> {
    let rotations = TILED_ROTATIONS
        .get(slot)
        .ok_or(Error::InvalidPlacementSlot(slot))?;
    Ok(Placement {
        rotations: rotations.to_vec(),
        translation: None,
    })
}

/// Placements for `count` tiles, in display order. With `distinct` each
/// tile advances to the next slot; otherwise every object receives the
/// slot 0 orientation.
pub fn tiled_placements(count: usize, distinct: bool) -> Result<Vec<Placement>, Error> {
    (0..count)
        .map(|index| tiled(if distinct { index } else { 0 }))
        .collect()
}

/// Placement for one side of an overlaid comparison: slot 0 turns away
/// and backs off along -X by `separation`, slot 1 only turns to face
/// the other way.
pub fn combi(slot: usize, separation: f32) -> Result<Placement, Error> {
    match slot {
        0 => Ok(Placement {
            rotations: vec![(Axis::Y, -90.0)],
            translation: Some(Vector3::new(-separation, 0.0, 0.0)),
        }),
        1 => Ok(Placement {
            rotations: vec![(Axis::Y, 90.0)],
            translation: None,
        }),
        other => Err(Error::InvalidPlacementSlot(other)),
    }
}

/// Placements for objects overlaid in a single viewport. More than two
/// objects cannot overlay; a lone object keeps the slot 0 orientation
/// without the separating shift.
pub fn combi_placements(count: usize, separation: f32) -> Result<Vec<Placement>, Error> {
    if count > 2 {
        return Err(Error::CombiViewOverflow(count));
    }
    if count == 1 {
        let mut placement = combi(0, separation)?;
        placement.translation = None;
        return Ok(vec![placement]);
    }
    (0..count).map(|slot| combi(slot, separation)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_tiled_slot_table() {
        assert_eq!(tiled(0).unwrap().rotations, vec![(Axis::Y, -90.0)]);
        assert_eq!(tiled(1).unwrap().rotations, vec![(Axis::Y, 90.0)]);
        assert_eq!(
            tiled(2).unwrap().rotations,
            vec![(Axis::X, -90.0), (Axis::Z, 0.0)]
        );
        assert_eq!(tiled(3).unwrap().rotations, vec![(Axis::Z, -90.0)]);
        assert!(tiled(0).unwrap().translation.is_none());
    }

    #[test]
    fn test_tiled_rejects_slot_out_of_range() {
        assert_eq!(tiled(4), Err(Error::InvalidPlacementSlot(4)));
    }

    #[test]
    fn test_tiled_placements_share_first_slot_by_default() {
        let placements = tiled_placements(3, false).unwrap();
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().all(|p| *p == placements[0]));
        assert_eq!(placements[0], tiled(0).unwrap());
    }

    #[test]
    fn test_tiled_placements_advance_when_distinct() {
        let placements = tiled_placements(4, true).unwrap();
        for (slot, placement) in placements.iter().enumerate() {
            assert_eq!(*placement, tiled(slot).unwrap());
        }
    }

    #[test]
    fn test_combi_pair_separated() {
        let placements = combi_placements(2, 45.0).unwrap();
        assert_eq!(placements[0].rotations, vec![(Axis::Y, -90.0)]);
        assert_eq!(
            placements[0].translation,
            Some(Vector3::new(-45.0, 0.0, 0.0))
        );
        assert_eq!(placements[1].rotations, vec![(Axis::Y, 90.0)]);
        assert_eq!(placements[1].translation, None);
    }

    #[test]
    fn test_combi_single_is_centered() {
        let placements = combi_placements(1, 45.0).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].rotations, vec![(Axis::Y, -90.0)]);
        assert_eq!(placements[0].translation, None);
    }

    #[test]
    fn test_combi_overflow() {
        assert_eq!(combi_placements(3, 45.0), Err(Error::CombiViewOverflow(3)));
        assert_eq!(combi(2, 45.0), Err(Error::InvalidPlacementSlot(2)));
    }

    #[test]
    fn test_model_matrix_rotation_order_matters() {
        let xz = Placement {
            rotations: vec![(Axis::X, 90.0), (Axis::Z, 90.0)],
            translation: None,
        };
        let zx = Placement {
            rotations: vec![(Axis::Z, 90.0), (Axis::X, 90.0)],
            translation: None,
        };
        let p = Point3::new(1.0, 2.0, 3.0);
        let a = xz.model_matrix().transform_point(&p);
        let b = zx.model_matrix().transform_point(&p);
        assert!((a - b).norm() > 1e-3);
    }

    #[test]
    fn test_model_matrix_translates_after_rotating() {
        let placement = combi(0, 45.0).unwrap();
        let moved = placement.model_matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        // RotateY(-90) sends +z to -x, then the shift adds another -45.
        assert!((moved - Point3::new(-46.0, 0.0, 0.0)).norm() < 1e-4);
    }
}
