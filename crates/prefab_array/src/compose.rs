//! Per-instance transform compositing.
//!
//! Combines a [`Placement`] from the layout engine with an array set's
//! [`Modifiers`] into the final local transform applied to a spawned instance.
use glam::{EulerRot, Quat, Vec3};
use rand::RngCore;

use crate::layout::Placement;

/// Range (degrees) each Euler component is drawn from when rotation is randomized.
pub const RANDOM_ROTATION_RANGE: (f32, f32) = (0.0, 360.0);

/// Range each scale component is drawn from when scale is randomized.
pub const RANDOM_SCALE_RANGE: (f32, f32) = (0.5, 1.5);

/// Source of uniform random floats.
///
/// Implemented for every [`RngCore`], so seeded or process-wide generators can
/// be passed directly. Tests may supply their own deterministic source.
pub trait RandomSource {
    /// Draw a float uniformly from `[min, max)`.
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        let value = min + unit_f32(self.next_u32()) * (max - min);
        // Rounding can land exactly on `max`; keep the upper bound open.
        if max > min && value >= max {
            next_down(max)
        } else {
            value
        }
    }
}

/// Map a raw 32-bit draw to `[0, 1)` using its top 24 bits.
#[inline]
fn unit_f32(bits: u32) -> f32 {
    (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Compute the next smaller representable float value.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() || val == f32::NEG_INFINITY {
        return val;
    }
    if val == f32::INFINITY {
        return f32::MAX;
    }
    if val == 0.0 {
        return -f32::from_bits(1);
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}

/// Transform adjustments applied uniformly to every instance of an array set.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifiers {
    /// Added to every placement position, in root-local space.
    pub position_offset: Vec3,
    /// Extra rotation as Euler angles in degrees.
    pub rotation_offset: Vec3,
    /// Component-wise multiplier on the prefab's own scale.
    pub scale_multiplier: Vec3,
    /// Append a random Euler rotation per instance.
    pub randomize_rotation: bool,
    /// Multiply scale by a random factor per axis per instance.
    pub randomize_scale: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            position_offset: Vec3::ZERO,
            rotation_offset: Vec3::ZERO,
            scale_multiplier: Vec3::ONE,
            randomize_rotation: false,
            randomize_scale: false,
        }
    }
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position_offset(mut self, offset: Vec3) -> Self {
        self.position_offset = offset;
        self
    }

    pub fn with_rotation_offset(mut self, degrees: Vec3) -> Self {
        self.rotation_offset = degrees;
        self
    }

    pub fn with_scale_multiplier(mut self, multiplier: Vec3) -> Self {
        self.scale_multiplier = multiplier;
        self
    }

    pub fn with_random_rotation(mut self, enabled: bool) -> Self {
        self.randomize_rotation = enabled;
        self
    }

    pub fn with_random_scale(mut self, enabled: bool) -> Self {
        self.randomize_scale = enabled;
        self
    }

    /// True when compositing consumes random draws.
    pub fn is_randomized(&self) -> bool {
        self.randomize_rotation || self.randomize_scale
    }
}

/// Final local transform for one spawned instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Convert editor-style Euler angles (degrees) to a quaternion.
///
/// Rotation is applied about Z, then X, then Y.
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Composite `placement` with `modifiers` and the prefab's own `prefab_scale`.
///
/// Random draws happen in a fixed order: rotation x, y, z, then scale x, y, z.
/// Only the enabled randomizations consume draws.
pub fn compose_instance<R: RandomSource + ?Sized>(
    placement: &Placement,
    modifiers: &Modifiers,
    prefab_scale: Vec3,
    rng: &mut R,
) -> InstanceTransform {
    let translation = placement.position + modifiers.position_offset;

    let mut rotation = placement.rotation * euler_degrees_to_quat(modifiers.rotation_offset);
    if modifiers.randomize_rotation {
        let (min, max) = RANDOM_ROTATION_RANGE;
        let jitter = Vec3::new(
            rng.uniform(min, max),
            rng.uniform(min, max),
            rng.uniform(min, max),
        );
        rotation *= euler_degrees_to_quat(jitter);
    }

    let mut scale = prefab_scale * modifiers.scale_multiplier;
    if modifiers.randomize_scale {
        let (min, max) = RANDOM_SCALE_RANGE;
        scale *= Vec3::new(
            rng.uniform(min, max),
            rng.uniform(min, max),
            rng.uniform(min, max),
        );
    }

    InstanceTransform {
        translation,
        rotation,
        scale,
    }
}
