//! Voxel generation: turns a height grid into stacked unit cubes.
//!
//! Cell `(x, z)` with height `h > 0` becomes one column of `h` voxels at
//! `y = 0..h`. Cells with `h <= 0` emit nothing. Every call to
//! [`VoxelGenerator::generate`] discards the previous output first, so
//! regenerating the same grid yields the same voxel set.

use crate::{map::MapGrid, types::Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Voxel {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Voxel {
    /// Centre of the voxel in world space.
    pub fn world_position(&self, cube_size: f32) -> Position {
        Position::new(
            self.x as f32 * cube_size,
            self.y as f32 * cube_size,
            self.z as f32 * cube_size,
        )
    }

    /// Stable name, `Cube_{x}_{z}_{y}`.
    pub fn name(&self) -> String {
        format!("Cube_{}_{}_{}", self.x, self.z, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoxelColumn {
    pub x:      usize,
    pub z:      usize,
    pub voxels: Vec<Voxel>,
}

impl VoxelColumn {
    fn stack(x: usize, z: usize, height: usize) -> Self {
        let voxels = (0..height).map(|y| Voxel { x, y, z }).collect();
        Self { x, z, voxels }
    }

    pub fn height(&self) -> usize {
        self.voxels.len()
    }
}

#[derive(Debug, Default)]
pub struct VoxelGenerator {
    columns:   Vec<VoxelColumn>,
    cube_size: f32,
}

impl VoxelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, grid: &MapGrid) -> &[VoxelColumn] {
        self.clear();
        self.cube_size = grid.cube_size;

        for (x, z, h) in grid.cells() {
            if h <= 0 {
                continue;
            }
            self.columns.push(VoxelColumn::stack(x, z, h as usize));
        }

        log::debug!(
            "voxel: generated {} columns, {} voxels for '{}'",
            self.columns.len(),
            self.voxel_count(),
            grid.name
        );
        &self.columns
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn columns(&self) -> &[VoxelColumn] {
        &self.columns
    }

    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> {
        self.columns.iter().flat_map(|c| c.voxels.iter())
    }

    pub fn voxel_count(&self) -> usize {
        self.columns.iter().map(VoxelColumn::height).sum()
    }

    /// Cube size of the grid last generated.
    pub fn cube_size(&self) -> f32 {
        self.cube_size
    }
}
