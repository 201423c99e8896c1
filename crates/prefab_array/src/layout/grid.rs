//! Grid layout: rows, columns and layers at uniform spacing.
use glam::Vec3;

use crate::layout::{prealloc, Placement, PlacementPattern};

/// Regular 3D grid.
///
/// Columns run along +X, rows along +Y and layers along +Z. Iteration order is
/// layer (outermost), then row, then column (innermost).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    /// Number of rows (Y axis).
    pub rows: u32,
    /// Number of columns (X axis).
    pub columns: u32,
    /// Number of layers (Z axis).
    pub layers: u32,
    /// Distance between neighbouring instances. Negative values mirror the grid.
    pub spacing: f32,
}

impl GridLayout {
    /// Create a grid layout. Negative counts are clamped to zero.
    pub fn new(rows: i32, columns: i32, layers: i32, spacing: f32) -> Self {
        Self {
            rows: clamp_count(rows),
            columns: clamp_count(columns),
            layers: clamp_count(layers),
            spacing,
        }
    }

    /// Create a single-layer grid.
    pub fn flat(rows: i32, columns: i32, spacing: f32) -> Self {
        Self::new(rows, columns, 1, spacing)
    }

    /// Local position of the cell at (`column`, `row`, `layer`).
    #[inline]
    pub fn cell_position(&self, column: u32, row: u32, layer: u32) -> Vec3 {
        Vec3::new(
            column as f32 * self.spacing,
            row as f32 * self.spacing,
            layer as f32 * self.spacing,
        )
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            layers: 1,
            spacing: 1.0,
        }
    }
}

impl PlacementPattern for GridLayout {
    fn placements(&self) -> Vec<Placement> {
        let len = self.len();
        if len == 0 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(prealloc(len));
        for layer in 0..self.layers {
            for row in 0..self.rows {
                for column in 0..self.columns {
                    out.push(Placement::at(self.cell_position(column, row, layer)));
                }
            }
        }
        out
    }

    fn len(&self) -> usize {
        if !self.spacing.is_finite() {
            return 0;
        }
        (self.rows as usize)
            .saturating_mul(self.columns as usize)
            .saturating_mul(self.layers as usize)
    }
}

#[inline]
pub(crate) fn clamp_count(value: i32) -> u32 {
    value.max(0) as u32
}
