//! Placement engine: layout modes that map a handful of parameters to an ordered
//! sequence of local placements.
//!
//! Every layout is a pure function of its parameters. Given identical inputs the
//! returned sequence is identical, element for element and in the same order.
//! Per-instance modifiers (offsets, multipliers, randomization) are not applied
//! here; see [`crate::compose`].
use glam::{Quat, Vec3};

pub mod circle;
pub mod grid;

pub use circle::CircleLayout;
pub use grid::GridLayout;

/// Upper bound on up-front allocation for generated sequences.
const PREALLOC_LIMIT: usize = 4096;

/// A computed local pose for one instance, prior to modifier compositing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Position relative to the array root.
    pub position: Vec3,
    /// Rotation relative to the array root.
    pub rotation: Quat,
}

impl Placement {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Placement at `position` with identity rotation.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

/// Trait for layout patterns.
pub trait PlacementPattern {
    /// Generate the ordered placements for this pattern.
    fn placements(&self) -> Vec<Placement>;

    /// Number of placements [`PlacementPattern::placements`] yields.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Layout mode with its mode-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    Grid(GridLayout),
    Circle(CircleLayout),
}

impl Layout {
    /// Short mode name, used in logs and events.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Layout::Grid(_) => "grid",
            Layout::Circle(_) => "circle",
        }
    }

    /// Number of placements this layout produces, without generating them.
    pub fn placement_count(&self) -> usize {
        match self {
            Layout::Grid(grid) => grid.len(),
            Layout::Circle(circle) => circle.len(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Grid(GridLayout::default())
    }
}

impl From<GridLayout> for Layout {
    fn from(value: GridLayout) -> Self {
        Layout::Grid(value)
    }
}

impl From<CircleLayout> for Layout {
    fn from(value: CircleLayout) -> Self {
        Layout::Circle(value)
    }
}

/// Generate the ordered placements for `layout`.
pub fn generate_placements(layout: &Layout) -> Vec<Placement> {
    match layout {
        Layout::Grid(grid) => grid.placements(),
        Layout::Circle(circle) => circle.placements(),
    }
}

#[inline]
pub(crate) fn prealloc(len: usize) -> usize {
    len.min(PREALLOC_LIMIT)
}
