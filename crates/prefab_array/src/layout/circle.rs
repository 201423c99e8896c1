//! Circle layout: instances evenly spaced on a ring in the XZ plane.
use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::layout::grid::clamp_count;
use crate::layout::{prealloc, Placement, PlacementPattern};

/// Ring of `count` instances at `radius` around the root.
///
/// Instance `i` sits at angle `i * 2π / count` and is yawed by the negated
/// angle, so every instance's local +Z axis runs along the ring's tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleLayout {
    /// Number of instances on the ring.
    pub count: u32,
    /// Ring radius. Negative values mirror the ring through the origin.
    pub radius: f32,
}

impl CircleLayout {
    /// Create a circle layout. A negative count is clamped to zero.
    pub fn new(count: i32, radius: f32) -> Self {
        Self {
            count: clamp_count(count),
            radius,
        }
    }

    /// Angle in radians of instance `index`.
    #[inline]
    pub fn angle_of(&self, index: u32) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        index as f32 * TAU / self.count as f32
    }
}

impl Default for CircleLayout {
    fn default() -> Self {
        Self {
            count: 8,
            radius: 5.0,
        }
    }
}

impl PlacementPattern for CircleLayout {
    fn placements(&self) -> Vec<Placement> {
        let len = self.len();
        if len == 0 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(prealloc(len));
        for i in 0..self.count {
            let angle = self.angle_of(i);
            let (sin, cos) = angle.sin_cos();
            out.push(Placement::new(
                Vec3::new(cos * self.radius, 0.0, sin * self.radius),
                Quat::from_rotation_y(-angle),
            ));
        }
        out
    }

    fn len(&self) -> usize {
        if !self.radius.is_finite() {
            return 0;
        }
        self.count as usize
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn zero_count_yields_empty_sequence() {
        assert!(CircleLayout::new(0, 5.0).placements().is_empty());
        assert!(CircleLayout::new(-4, 5.0).placements().is_empty());
    }

    #[test]
    fn four_on_radius_five_hit_the_axes() {
        let placements = CircleLayout::new(4, 5.0).placements();
        let expected = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -5.0),
        ];
        assert_eq!(placements.len(), 4);
        for (placement, expected) in placements.iter().zip(expected) {
            assert!(
                placement.position.abs_diff_eq(expected, EPS),
                "{:?} != {:?}",
                placement.position,
                expected
            );
        }
    }

    #[test]
    fn four_on_radius_five_yaw_by_negated_angle() {
        let placements = CircleLayout::new(4, 5.0).placements();
        for (placement, degrees) in placements.iter().zip([0.0f32, -90.0, -180.0, -270.0]) {
            let expected = Quat::from_rotation_y(degrees.to_radians());
            assert!(
                placement.rotation.angle_between(expected) < EPS,
                "yaw mismatch for {degrees}"
            );
        }
    }

    #[test]
    fn instances_face_along_the_tangent() {
        let placements = CircleLayout::new(12, 3.0).placements();
        for placement in placements {
            let radial = placement.position.normalize();
            let forward = placement.rotation * Vec3::Z;
            assert!(forward.dot(radial).abs() < EPS);
        }
    }

    #[test]
    fn positions_lie_on_ring_with_even_angular_spacing() {
        for (count, radius) in [(1, 2.0f32), (3, 7.5), (16, -4.0), (33, 0.5)] {
            let layout = CircleLayout::new(count, radius);
            let placements = layout.placements();
            assert_eq!(placements.len(), count as usize);

            let step = 2.0 * PI / count as f32;
            for (i, placement) in placements.iter().enumerate() {
                let p = placement.position;
                assert_eq!(p.y, 0.0);
                let norm = (p.x * p.x + p.z * p.z).sqrt();
                assert!((norm - radius.abs()).abs() < EPS);

                let expected = Vec3::new(
                    (i as f32 * step).cos() * radius,
                    0.0,
                    (i as f32 * step).sin() * radius,
                );
                assert!(p.abs_diff_eq(expected, EPS));
            }
        }
    }

    #[test]
    fn zero_radius_collapses_to_origin() {
        let placements = CircleLayout::new(5, 0.0).placements();
        assert_eq!(placements.len(), 5);
        assert!(placements.iter().all(|p| p.position == Vec3::ZERO));
    }

    #[test]
    fn non_finite_radius_yields_nothing() {
        assert!(CircleLayout::new(5, f32::NAN).placements().is_empty());
    }
}
