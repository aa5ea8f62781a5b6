//! Dense row-major storage for the 2D vector field.
//!
//! [`VectorGrid`] owns an interleaved `[vx, vy, vx, vy, ...]` buffer of
//! `width * height` cells in row-major `(y, x)` order. The grid is never
//! resized after construction; every other component mutates it in place
//! through `&mut` borrows that last for one call.

use crate::error::GridError;
use crate::vec2::Vec2;
use smallvec::SmallVec;

/// 4-connected neighbour offsets as `(dx, dy)`: up, down, left, right.
pub const NEIGHBOUR_OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// An H×W grid of 2D vectors with implicit zero padding.
///
/// Reads through [`sample`](VectorGrid::sample) outside `[0, W) × [0, H)`
/// return [`Vec2::ZERO`]; writes outside the grid are ignored by the
/// callers in this workspace rather than reported.
///
/// # Examples
///
/// ```
/// use eddy_core::{Vec2, VectorGrid};
///
/// let mut grid = VectorGrid::new(4, 3).unwrap();
/// grid.set(1, 2, Vec2::new(0.5, -1.0));
/// assert_eq!(grid.get(1, 2), Some(Vec2::new(0.5, -1.0)));
///
/// // Out-of-grid reads are zero.
/// assert_eq!(grid.sample(-1, 0), Vec2::ZERO);
/// assert_eq!(grid.get(4, 0), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VectorGrid {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl VectorGrid {
    /// Maximum dimension size: sampling coordinates are signed.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create an all-zero grid.
    ///
    /// Returns [`GridError::EmptyGrid`] if either dimension is 0, or
    /// [`GridError::DimensionTooLarge`] if either exceeds [`Self::MAX_DIM`].
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let len = Self::checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Create a grid with every cell set to `default`.
    pub fn filled(width: u32, height: u32, default: Vec2) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height)?;
        if !default.is_zero() {
            grid.fill(default);
        }
        Ok(grid)
    }

    /// Adopt an existing interleaved `[vx, vy, ...]` buffer.
    ///
    /// The buffer must hold exactly `width * height * 2` components.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Result<Self, GridError> {
        let expected = Self::checked_len(width, height)?;
        if data.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    fn checked_len(width: u32, height: u32) -> Result<usize, GridError> {
        Self::check_dimensions(width, height)?;
        Ok(width as usize * height as usize * 2)
    }

    /// Check grid dimensions without allocating.
    pub fn check_dimensions(width: u32, height: u32) -> Result<(), GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if width > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `true` if `(x, y)` addresses a cell.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Flat cell index of in-bounds `(x, y)`. The vector lives at
    /// `2 * index` and `2 * index + 1` of [`as_slice`](Self::as_slice).
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The vector at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Vec2> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y) * 2;
        Some(Vec2::new(self.data[i], self.data[i + 1]))
    }

    /// The vector at `(x, y)` with zero padding outside the grid.
    pub fn sample(&self, x: i64, y: i64) -> Vec2 {
        if !self.contains(x, y) {
            return Vec2::ZERO;
        }
        let i = self.index(x as u32, y as u32) * 2;
        Vec2::new(self.data[i], self.data[i + 1])
    }

    /// Overwrite the vector at `(x, y)`. Returns `false` (and writes
    /// nothing) outside the grid.
    pub fn set(&mut self, x: u32, y: u32, v: Vec2) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.index(x, y) * 2;
        self.data[i] = v.x;
        self.data[i + 1] = v.y;
        true
    }

    /// Add `v` to the vector at `(x, y)`. Returns `false` (and writes
    /// nothing) outside the grid.
    pub fn add(&mut self, x: i64, y: i64, v: Vec2) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let i = self.index(x as u32, y as u32) * 2;
        self.data[i] += v.x;
        self.data[i + 1] += v.y;
        true
    }

    /// Set every cell to `v`.
    pub fn fill(&mut self, v: Vec2) {
        for cell in self.data.chunks_exact_mut(2) {
            cell[0] = v.x;
            cell[1] = v.y;
        }
    }

    /// Reset every cell to the zero vector.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Interleaved component buffer, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable interleaved component buffer, row-major.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Iterate `(x, y, vector)` over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, Vec2)> + '_ {
        let w = self.width as usize;
        self.data.chunks_exact(2).enumerate().map(move |(i, c)| {
            // Both fit in u32: x < width and y < height.
            ((i % w) as u32, (i / w) as u32, Vec2::new(c[0], c[1]))
        })
    }

    /// The in-bounds 4-connected neighbours of `(x, y)`, in
    /// [`NEIGHBOUR_OFFSETS`] order.
    pub fn neighbours(&self, x: i64, y: i64) -> SmallVec<[(u32, u32); 4]> {
        let mut result = SmallVec::new();
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let nx = x + dx;
            let ny = y + dy;
            if self.contains(nx, ny) {
                result.push((nx as u32, ny as u32));
            }
        }
        result
    }

    /// How many grid edges `(x, y)` lies on: 0 interior, 1 edge, 2 corner.
    ///
    /// A 1-wide or 1-tall grid touches both opposite edges on that axis,
    /// so a 1x1 grid reports 4.
    pub fn touched_edges(&self, x: u32, y: u32) -> u32 {
        let mut n = 0;
        if y == 0 {
            n += 1;
        }
        if y + 1 == self.height {
            n += 1;
        }
        if x == 0 {
            n += 1;
        }
        if x + 1 == self.width {
            n += 1;
        }
        n
    }
}

/// Allocate an H×W grid, initialised to `default` when it is non-zero.
///
/// Free-function form of [`VectorGrid::filled`].
pub fn create_grid(width: u32, height: u32, default: Vec2) -> Result<VectorGrid, GridError> {
    VectorGrid::filled(width, height, default)
}
