//! Discrete divergence and source/sink detection.
//!
//! # Reference boundary formulas
//!
//! ```text
//! interior      div = (vx[y,x+1] - vx[y,x-1]) / 2 + (vy[y+1,x] - vy[y-1,x]) / 2
//! top row       div = (vx[0,x+1] - vx[0,x-1]) / 2 + (vy[1,x] - vy[0,x])
//! bottom row    div = (vx[-1,x+1] - vx[-1,x-1]) / 2 + (vy[-1,x] - vy[-2,x])
//! left column   div = (vx[y,1] - vx[y,0]) + (vy[y+1,0] - vy[y-1,0]) / 2
//! right column  div = (vx[y,-1] - vx[y,-2]) + (vy[y+1,-1] - vy[y-1,-1]) / 2
//! corners       0 (never written)
//! ```
//!
//! Rows and columns are the open ranges `1..h-1` and `1..w-1`; a pass
//! whose indices do not exist on a 1-wide or 1-tall grid is skipped.
//! [`DivergenceBoundary::Symmetric`] fills the corners too, using the same
//! central/one-sided choice per axis for every cell.
//!
//! # Center extraction
//!
//! Sources are cells with `div > max_div * threshold` (only when
//! `max_div > threshold`), sinks are cells with `div < min_div * threshold`
//! (only when `min_div < -threshold`). A candidate must also carry a vector
//! longer than the magnitude floor. Candidates are accepted greedily if
//! they are at least `min_distance` cells (Euclidean) from every center
//! accepted so far, sources and sinks alike. Sources come first.

use eddy_core::{Vec2, VectorGrid};

/// How edge and corner cells are differenced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DivergenceBoundary {
    /// Fixed per-edge formulas with zero corners (see module docs).
    #[default]
    Reference,
    /// Central differences inside, one-sided differences on every edge,
    /// corners included. An axis of length 1 contributes 0.
    Symmetric,
}

/// Order in which candidate cells are offered to the greedy
/// min-distance filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanOrder {
    /// Row-major `(y, x)` order.
    #[default]
    RowMajor,
    /// Strongest `|div|` first; ties keep row-major order.
    StrongestFirst,
}

/// Whether a center diverges or converges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CenterKind {
    /// Positive divergence: flow leaves the cell.
    Source,
    /// Negative divergence: flow enters the cell.
    Sink,
}

/// A detected singular point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VectorCenter {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Source or sink.
    pub kind: CenterKind,
}

impl VectorCenter {
    /// `(x, y)` position.
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

/// Per-cell divergence, row-major, one `f32` per cell.
pub fn divergence(grid: &VectorGrid, boundary: DivergenceBoundary) -> Vec<f32> {
    match boundary {
        DivergenceBoundary::Reference => divergence_reference(grid),
        DivergenceBoundary::Symmetric => divergence_symmetric(grid),
    }
}

fn divergence_reference(grid: &VectorGrid) -> Vec<f32> {
    let w = grid.width() as usize;
    let h = grid.height() as usize;
    let d = grid.as_slice();
    let vx = |y: usize, x: usize| d[(y * w + x) * 2];
    let vy = |y: usize, x: usize| d[(y * w + x) * 2 + 1];
    let mut div = vec![0.0f32; w * h];

    // Interior.
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            div[y * w + x] =
                (vx(y, x + 1) - vx(y, x - 1)) / 2.0 + (vy(y + 1, x) - vy(y - 1, x)) / 2.0;
        }
    }

    // Top and bottom rows.
    if h >= 2 {
        let b = h - 1;
        for x in 1..w.saturating_sub(1) {
            div[x] = (vx(0, x + 1) - vx(0, x - 1)) / 2.0 + (vy(1, x) - vy(0, x));
        }
        for x in 1..w.saturating_sub(1) {
            div[b * w + x] = (vx(b, x + 1) - vx(b, x - 1)) / 2.0 + (vy(b, x) - vy(b - 1, x));
        }
    }

    // Left and right columns.
    if w >= 2 {
        let r = w - 1;
        for y in 1..h.saturating_sub(1) {
            div[y * w] = (vx(y, 1) - vx(y, 0)) + (vy(y + 1, 0) - vy(y - 1, 0)) / 2.0;
        }
        for y in 1..h.saturating_sub(1) {
            div[y * w + r] = (vx(y, r) - vx(y, r - 1)) + (vy(y + 1, r) - vy(y - 1, r)) / 2.0;
        }
    }

    div
}

/// Derivative along one axis of length `len` at index `i`, given a
/// reader for that axis.
fn axis_derivative(i: usize, len: usize, at: impl Fn(usize) -> f32) -> f32 {
    if len < 2 {
        0.0
    } else if i == 0 {
        at(1) - at(0)
    } else if i == len - 1 {
        at(i) - at(i - 1)
    } else {
        (at(i + 1) - at(i - 1)) / 2.0
    }
}

fn divergence_symmetric(grid: &VectorGrid) -> Vec<f32> {
    let w = grid.width() as usize;
    let h = grid.height() as usize;
    let d = grid.as_slice();
    let mut div = vec![0.0f32; w * h];

    for y in 0..h {
        for x in 0..w {
            let dvx = axis_derivative(x, w, |c| d[(y * w + c) * 2]);
            let dvy = axis_derivative(y, h, |r| d[(r * w + x) * 2 + 1]);
            div[y * w + x] = dvx + dvy;
        }
    }

    div
}

/// Configurable source/sink detector.
///
/// # Construction
///
/// ```
/// use eddy_core::VectorGrid;
/// use eddy_ops::{CenterDetector, DivergenceBoundary};
///
/// let detector = CenterDetector::builder()
///     .threshold(0.1)
///     .min_distance(5.0)
///     .boundary(DivergenceBoundary::Symmetric)
///     .build()
///     .unwrap();
///
/// let grid = VectorGrid::new(16, 16).unwrap();
/// assert!(detector.detect(&grid).is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CenterDetector {
    threshold: f32,
    min_distance: f32,
    min_magnitude: f32,
    boundary: DivergenceBoundary,
    order: ScanOrder,
}

/// Builder for [`CenterDetector`].
pub struct CenterDetectorBuilder {
    threshold: f32,
    min_distance: f32,
    min_magnitude: f32,
    boundary: DivergenceBoundary,
    order: ScanOrder,
}

impl CenterDetector {
    /// Default relative threshold.
    pub const DEFAULT_THRESHOLD: f32 = 0.5;
    /// Default minimum spacing between centers, in cells.
    pub const DEFAULT_MIN_DISTANCE: f32 = 10.0;
    /// Default magnitude floor a candidate cell must exceed.
    pub const DEFAULT_MIN_MAGNITUDE: f32 = 0.1;

    /// Create a builder with the defaults.
    pub fn builder() -> CenterDetectorBuilder {
        CenterDetectorBuilder {
            threshold: Self::DEFAULT_THRESHOLD,
            min_distance: Self::DEFAULT_MIN_DISTANCE,
            min_magnitude: Self::DEFAULT_MIN_MAGNITUDE,
            boundary: DivergenceBoundary::Reference,
            order: ScanOrder::RowMajor,
        }
    }

    /// Relative threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Minimum center spacing.
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Detect sources then sinks.
    pub fn detect(&self, grid: &VectorGrid) -> Vec<VectorCenter> {
        let div = divergence(grid, self.boundary);
        let (min_div, max_div) = div
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let mut centers = Vec::new();

        if max_div > self.threshold {
            let cut = max_div * self.threshold;
            let candidates = self.candidates(grid, &div, |v| v > cut);
            self.accept(grid, candidates, CenterKind::Source, &mut centers);
        }

        if min_div < -self.threshold {
            let cut = min_div * self.threshold;
            let candidates = self.candidates(grid, &div, |v| v < cut);
            self.accept(grid, candidates, CenterKind::Sink, &mut centers);
        }

        centers
    }

    /// Flat indices of cells passing `keep` and the magnitude floor, in
    /// scan order.
    fn candidates(&self, grid: &VectorGrid, div: &[f32], keep: impl Fn(f32) -> bool) -> Vec<usize> {
        let data = grid.as_slice();
        let mut out: Vec<usize> = (0..div.len())
            .filter(|&i| keep(div[i]))
            .filter(|&i| Vec2::new(data[i * 2], data[i * 2 + 1]).length() > self.min_magnitude)
            .collect();
        if self.order == ScanOrder::StrongestFirst {
            out.sort_by(|&a, &b| div[b].abs().total_cmp(&div[a].abs()));
        }
        out
    }

    fn accept(
        &self,
        grid: &VectorGrid,
        candidates: Vec<usize>,
        kind: CenterKind,
        centers: &mut Vec<VectorCenter>,
    ) {
        let w = grid.width() as usize;
        for i in candidates {
            let x = (i % w) as u32;
            let y = (i / w) as u32;
            let far_enough = centers.iter().all(|c| {
                let dx = x as f32 - c.x as f32;
                let dy = y as f32 - c.y as f32;
                (dx * dx + dy * dy).sqrt() >= self.min_distance
            });
            if far_enough {
                centers.push(VectorCenter { x, y, kind });
            }
        }
    }
}

impl CenterDetectorBuilder {
    /// Relative threshold (default: 0.5). Must be finite.
    pub fn threshold(mut self, t: f32) -> Self {
        self.threshold = t;
        self
    }

    /// Minimum spacing between accepted centers, in cells (default: 10).
    /// Must be finite and >= 0.
    pub fn min_distance(mut self, d: f32) -> Self {
        self.min_distance = d;
        self
    }

    /// Magnitude a candidate cell must exceed (default: 0.1).
    pub fn min_magnitude(mut self, m: f32) -> Self {
        self.min_magnitude = m;
        self
    }

    /// Boundary differencing (default: [`DivergenceBoundary::Reference`]).
    pub fn boundary(mut self, b: DivergenceBoundary) -> Self {
        self.boundary = b;
        self
    }

    /// Candidate scan order (default: [`ScanOrder::RowMajor`]).
    pub fn scan_order(mut self, o: ScanOrder) -> Self {
        self.order = o;
        self
    }

    /// Build the detector, validating all parameters.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `threshold` or `min_magnitude` is NaN or infinite
    /// - `min_distance` is NaN, infinite, or negative
    pub fn build(self) -> Result<CenterDetector, String> {
        if !self.threshold.is_finite() {
            return Err(format!("threshold must be finite, got {}", self.threshold));
        }
        if !self.min_distance.is_finite() || self.min_distance < 0.0 {
            return Err(format!(
                "min_distance must be finite and >= 0, got {}",
                self.min_distance
            ));
        }
        if !self.min_magnitude.is_finite() {
            return Err(format!(
                "min_magnitude must be finite, got {}",
                self.min_magnitude
            ));
        }
        Ok(CenterDetector {
            threshold: self.threshold,
            min_distance: self.min_distance,
            min_magnitude: self.min_magnitude,
            boundary: self.boundary,
            order: self.order,
        })
    }
}

/// Detect sources and sinks with the reference boundary formulas and
/// row-major scan.
///
/// Non-finite `threshold` or `min_distance` finds nothing.
pub fn find_vector_centers(grid: &VectorGrid, threshold: f32, min_distance: f32) -> Vec<VectorCenter> {
    match CenterDetector::builder()
        .threshold(threshold)
        .min_distance(min_distance)
        .build()
    {
        Ok(detector) => detector.detect(grid),
        Err(_) => Vec::new(),
    }
}
