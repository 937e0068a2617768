//! Walkability oracle consumed by the expansion engine.
//! The engine only asks two questions of world geometry; `WalkableGrid` answers them
//! from a precomputed boolean grid so hosts and tests do not need a physics layer.

use crate::types::WorldPos;

pub trait WalkabilityOracle {
    fn is_walkable(&self, pos: WorldPos) -> bool;

    fn snap_to_cell_center(&self, pos: WorldPos) -> WorldPos;
}

impl<T: WalkabilityOracle + ?Sized> WalkabilityOracle for &T {
    fn is_walkable(&self, pos: WorldPos) -> bool {
        (**self).is_walkable(pos)
    }

    fn snap_to_cell_center(&self, pos: WorldPos) -> WorldPos {
        (**self).snap_to_cell_center(pos)
    }
}

/// Square-cell grid whose bottom-left corner sits at world `(0, 0)`.
/// Row 0 is the bottom row; positions outside the grid are blocked.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkableGrid {
    width: usize,
    height: usize,
    node_radius: f32,
    walkable: Vec<bool>,
}

impl WalkableGrid {
    /// Fully walkable grid.
    pub fn open(width: usize, height: usize, node_radius: f32) -> Self {
        Self { width, height, node_radius, walkable: vec![true; width * height] }
    }

    /// Builds a grid from text rows where `.` is walkable; the first row is the top of the map.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], node_radius: f32) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|row| row.as_ref().chars().count()).max().unwrap_or(0);
        let mut grid = Self { width, height, node_radius, walkable: vec![false; width * height] };
        for (row_index, row) in rows.iter().enumerate() {
            let gy = height - 1 - row_index;
            for (gx, ch) in row.as_ref().chars().enumerate() {
                grid.walkable[gy * width + gx] = ch == '.';
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, gx: i32, gy: i32) -> bool {
        gx >= 0 && gy >= 0 && (gx as usize) < self.width && (gy as usize) < self.height
    }

    pub fn set_walkable(&mut self, gx: i32, gy: i32, walkable: bool) {
        if !self.in_bounds(gx, gy) {
            return;
        }
        let idx = self.index(gx, gy);
        self.walkable[idx] = walkable;
    }

    pub fn is_cell_walkable(&self, gx: i32, gy: i32) -> bool {
        self.in_bounds(gx, gy) && self.walkable[self.index(gx, gy)]
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|walkable| **walkable).count()
    }

    /// World-space center of grid cell `(gx, gy)`.
    pub fn cell_center(&self, gx: i32, gy: i32) -> WorldPos {
        let diameter = self.node_radius * 2.0;
        WorldPos::new(
            gx as f32 * diameter + self.node_radius,
            gy as f32 * diameter + self.node_radius,
        )
    }

    pub fn cell_of(&self, pos: WorldPos) -> (i32, i32) {
        let diameter = self.node_radius * 2.0;
        ((pos.x / diameter).floor() as i32, (pos.y / diameter).floor() as i32)
    }

    fn index(&self, gx: i32, gy: i32) -> usize {
        (gy as usize) * self.width + (gx as usize)
    }
}

impl WalkabilityOracle for WalkableGrid {
    fn is_walkable(&self, pos: WorldPos) -> bool {
        let (gx, gy) = self.cell_of(pos);
        self.is_cell_walkable(gx, gy)
    }

    fn snap_to_cell_center(&self, pos: WorldPos) -> WorldPos {
        let (gx, gy) = self.cell_of(pos);
        let max_x = self.width.saturating_sub(1) as i32;
        let max_y = self.height.saturating_sub(1) as i32;
        self.cell_center(gx.clamp(0, max_x), gy.clamp(0, max_y))
    }
}
