//! Marker table and the per-tick drift/prune/inject pass.
//!
//! # Update rule
//!
//! For every marker, in insertion order:
//!
//! 1. Take the window of half-width `neighborhood` around the rounded
//!    position, clamped to the grid.
//! 2. `mean = Σ v|v| / count`, `avg_mag = Σ|v| / count`.
//! 3. Empty window or `Σ|v| == 0`: the marker is deferred (kept, unmoved).
//! 4. `avg_mag < clear_threshold`: the marker is pruned.
//! 5. Otherwise move by `mean * move_factor`, clamp into the grid, then
//!    inject [`create_tiny_vector`] at the new position.
//!
//! Markers are processed sequentially against the live grid, so a
//! marker's injection is visible to every marker after it.

use crate::error::MarkerError;
use crate::feedback::{create_tiny_vector, round_cell};
use eddy_core::VectorGrid;
use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, trace};

/// Stable handle for a marker, unique within one tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// A tracked point in grid-cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Column position, not snapped.
    pub x: f32,
    /// Row position, not snapped.
    pub y: f32,
    /// Strength of the feedback patch this marker injects.
    pub mag: f32,
}

impl Marker {
    /// Magnitude used when none is given.
    pub const DEFAULT_MAG: f32 = 1.0;
}

/// What to do with a marker whose update failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the marker unchanged.
    #[default]
    Keep,
    /// Remove the marker.
    Drop,
}

/// Parameters for [`MarkerTracker::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerParams {
    /// Half-width of the sampling window, in cells.
    pub neighborhood: u32,
    /// Scale applied to the sampled mean before moving.
    pub move_factor: f32,
    /// Markers whose average sampled magnitude falls below this are pruned.
    pub clear_threshold: f32,
    /// Handling of per-marker failures.
    pub on_failure: FailurePolicy,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            neighborhood: 5,
            move_factor: 1.0,
            clear_threshold: 1e-3,
            on_failure: FailurePolicy::Keep,
        }
    }
}

impl TrackerParams {
    /// Check that the scalar parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `move_factor` is not finite, or `clear_threshold`
    /// is not finite or is negative.
    pub fn validate(&self) -> Result<(), String> {
        if !self.move_factor.is_finite() {
            return Err(format!(
                "move_factor must be finite, got {}",
                self.move_factor
            ));
        }
        if !self.clear_threshold.is_finite() || self.clear_threshold < 0.0 {
            return Err(format!(
                "clear_threshold must be finite and >= 0, got {}",
                self.clear_threshold
            ));
        }
        Ok(())
    }
}

/// Result of updating one marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarkerOutcome {
    /// Moved and injected feedback.
    Moved {
        /// Position before the move.
        from: (f32, f32),
        /// Position after clamping.
        to: (f32, f32),
    },
    /// Nothing to sample; kept in place.
    Deferred,
    /// Removed for low local magnitude.
    Pruned {
        /// The average magnitude that fell below the threshold.
        avg_mag: f32,
    },
}

/// Outcome of one [`MarkerTracker::update`] pass, one entry per marker
/// present at the start of the pass, in processing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateReport {
    /// Per-marker results.
    pub results: Vec<(MarkerId, Result<MarkerOutcome, MarkerError>)>,
}

impl UpdateReport {
    fn count(&self, pred: impl Fn(&Result<MarkerOutcome, MarkerError>) -> bool) -> usize {
        self.results.iter().filter(|(_, r)| pred(r)).count()
    }

    /// Markers that moved.
    pub fn moved(&self) -> usize {
        self.count(|r| matches!(r, Ok(MarkerOutcome::Moved { .. })))
    }

    /// Markers that were deferred.
    pub fn deferred(&self) -> usize {
        self.count(|r| matches!(r, Ok(MarkerOutcome::Deferred)))
    }

    /// Markers that were pruned.
    pub fn pruned(&self) -> usize {
        self.count(|r| matches!(r, Ok(MarkerOutcome::Pruned { .. })))
    }

    /// Markers whose update failed.
    pub fn failed(&self) -> usize {
        self.count(Result::is_err)
    }

    /// Iterate over the failures only.
    pub fn errors(&self) -> impl Iterator<Item = (MarkerId, &MarkerError)> {
        self.results
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (*id, e)))
    }

    /// The result for `id`, if it was processed.
    pub fn get(&self, id: MarkerId) -> Option<&Result<MarkerOutcome, MarkerError>> {
        self.results.iter().find(|(i, _)| *i == id).map(|(_, r)| r)
    }
}

/// Owns the marker list.
#[derive(Clone, Debug, Default)]
pub struct MarkerTracker {
    markers: IndexMap<MarkerId, Marker>,
    next_id: u64,
}

impl MarkerTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker and return its id.
    pub fn add_marker(&mut self, x: f32, y: f32, mag: f32) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(id, Marker { x, y, mag });
        id
    }

    /// Remove one marker.
    pub fn remove(&mut self, id: MarkerId) -> Option<Marker> {
        self.markers.shift_remove(&id)
    }

    /// Remove every marker. Ids are not reused.
    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    /// Owned snapshot of all markers in insertion order.
    pub fn get_markers(&self) -> Vec<Marker> {
        self.markers.values().copied().collect()
    }

    /// Look up one marker.
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Iterate `(id, marker)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// `true` when no markers are tracked.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Run one drift/prune/inject pass over every marker.
    ///
    /// A failing marker never stops the pass; its error is reported and
    /// `params.on_failure` decides whether it stays.
    pub fn update(&mut self, grid: &mut VectorGrid, params: &TrackerParams) -> UpdateReport {
        let mut report = UpdateReport {
            results: Vec::with_capacity(self.markers.len()),
        };

        self.markers.retain(|&id, marker| {
            let result = step_marker(grid, marker, params);
            let keep = match &result {
                Ok(MarkerOutcome::Moved { from, to }) => {
                    trace!(marker = %id, ?from, ?to, "marker moved");
                    true
                }
                Ok(MarkerOutcome::Deferred) => true,
                Ok(MarkerOutcome::Pruned { avg_mag }) => {
                    debug!(marker = %id, avg_mag, "marker pruned");
                    false
                }
                Err(e) => {
                    debug!(marker = %id, error = %e, policy = ?params.on_failure, "marker update failed");
                    params.on_failure == FailurePolicy::Keep
                }
            };
            report.results.push((id, result));
            keep
        });

        debug!(
            moved = report.moved(),
            deferred = report.deferred(),
            pruned = report.pruned(),
            failed = report.failed(),
            remaining = self.markers.len(),
            "marker update"
        );
        report
    }
}

fn step_marker(
    grid: &mut VectorGrid,
    marker: &mut Marker,
    params: &TrackerParams,
) -> Result<MarkerOutcome, MarkerError> {
    let (x, y) = (marker.x, marker.y);
    if !x.is_finite() || !y.is_finite() {
        return Err(MarkerError::NonFinitePosition { x, y });
    }

    let w = grid.width() as i64;
    let h = grid.height() as i64;
    let n = params.neighborhood as i64;
    let cx = round_cell(x);
    let cy = round_cell(y);
    // Rounded coordinates saturate for huge positions; the window is then
    // empty and the marker defers.
    let sx = cx.saturating_sub(n).max(0);
    let ex = cx.saturating_add(n).min(w - 1);
    let sy = cy.saturating_sub(n).max(0);
    let ey = cy.saturating_add(n).min(h - 1);

    let mut wx = 0.0f32;
    let mut wy = 0.0f32;
    let mut sum_mag = 0.0f32;
    let mut count = 0usize;
    for wy_i in sy..=ey {
        for wx_i in sx..=ex {
            let v = grid.sample(wx_i, wy_i);
            let m = v.length();
            wx += v.x * m;
            wy += v.y * m;
            sum_mag += m;
            count += 1;
        }
    }

    if !wx.is_finite() || !wy.is_finite() || !sum_mag.is_finite() {
        return Err(MarkerError::NonFiniteSample { cx, cy });
    }
    if count == 0 || sum_mag == 0.0 {
        return Ok(MarkerOutcome::Deferred);
    }

    let count = count as f32;
    let avg_mag = sum_mag / count;
    if avg_mag < params.clear_threshold {
        return Ok(MarkerOutcome::Pruned { avg_mag });
    }

    let new_x = (x + wx / count * params.move_factor).clamp(0.0, (w - 1) as f32);
    let new_y = (y + wy / count * params.move_factor).clamp(0.0, (h - 1) as f32);
    if !new_x.is_finite() || !new_y.is_finite() {
        return Err(MarkerError::NonFinitePosition { x: new_x, y: new_y });
    }

    create_tiny_vector(grid, new_x, new_y, marker.mag, 0.0, 0.0);
    marker.x = new_x;
    marker.y = new_y;
    Ok(MarkerOutcome::Moved {
        from: (x, y),
        to: (new_x, new_y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::Vec2;
    use eddy_test_utils::{assert_close, uniform};
    use proptest::prelude::*;

    #[test]
    fn ids_are_sequential_and_not_reused() {
        let mut t = MarkerTracker::new();
        let a = t.add_marker(1.0, 1.0, 1.0);
        let b = t.add_marker(2.0, 2.0, 0.5);
        assert_eq!((a, b), (MarkerId(0), MarkerId(1)));
        t.clear_markers();
        assert!(t.is_empty());
        assert_eq!(t.add_marker(0.0, 0.0, 1.0), MarkerId(2));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut t = MarkerTracker::new();
        t.add_marker(1.5, 2.5, 1.0);
        let snap = t.get_markers();
        t.clear_markers();
        assert_eq!(snap, vec![Marker { x: 1.5, y: 2.5, mag: 1.0 }]);
    }

    #[test]
    fn remove_keeps_order() {
        let mut t = MarkerTracker::new();
        let a = t.add_marker(0.0, 0.0, 1.0);
        let b = t.add_marker(1.0, 0.0, 1.0);
        let c = t.add_marker(2.0, 0.0, 1.0);
        assert!(t.remove(b).is_some());
        let ids: Vec<MarkerId> = t.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(t.remove(b).is_none());
    }

    #[test]
    fn uniform_field_moves_by_weighted_mean() {
        let mut g = uniform(32, 32, Vec2::new(0.5, 0.0));
        let mut t = MarkerTracker::new();
        let id = t.add_marker(10.0, 10.0, 0.0);
        let report = t.update(&mut g, &TrackerParams::default());
        assert_eq!(report.moved(), 1);
        // mean = v * |v| = (0.25, 0)
        let m = t.get(id).unwrap();
        assert_close(m.x, 10.25, 1e-6);
        assert_close(m.y, 10.0, 1e-6);
    }

    #[test]
    fn move_is_clamped_into_grid() {
        let mut g = uniform(8, 8, Vec2::new(-3.0, 4.0));
        let mut t = MarkerTracker::new();
        let id = t.add_marker(1.0, 6.0, 0.0);
        t.update(&mut g, &TrackerParams::default());
        assert_eq!(*t.get(id).unwrap(), Marker { x: 0.0, y: 7.0, mag: 0.0 });
    }

    #[test]
    fn zero_field_defers() {
        let mut g = VectorGrid::new(16, 16).unwrap();
        let mut t = MarkerTracker::new();
        let id = t.add_marker(8.0, 8.0, 1.0);
        let report = t.update(&mut g, &TrackerParams::default());
        assert_eq!(report.get(id), Some(&Ok(MarkerOutcome::Deferred)));
        assert_eq!(t.len(), 1);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn weak_field_prunes() {
        let mut g = uniform(16, 16, Vec2::new(1e-5, 0.0));
        let mut t = MarkerTracker::new();
        let id = t.add_marker(8.0, 8.0, 1.0);
        let report = t.update(&mut g, &TrackerParams::default());
        assert!(matches!(report.get(id), Some(Ok(MarkerOutcome::Pruned { .. }))));
        assert!(t.get_markers().is_empty());
    }

    #[test]
    fn window_outside_grid_defers() {
        let mut g = uniform(8, 8, Vec2::new(1.0, 0.0));
        let mut t = MarkerTracker::new();
        t.add_marker(100.0, 100.0, 1.0);
        let params = TrackerParams {
            neighborhood: 2,
            ..TrackerParams::default()
        };
        let report = t.update(&mut g, &params);
        assert_eq!(report.deferred(), 1);
        assert_eq!(t.get_markers()[0].x, 100.0);
    }

    #[test]
    fn far_away_marker_defers_without_stopping_the_pass() {
        let mut g = uniform(16, 16, Vec2::new(0.5, 0.0));
        let mut t = MarkerTracker::new();
        let far = t.add_marker(1e20, 3.0, 1.0);
        let below = t.add_marker(2.0, -1e20, 1.0);
        let near = t.add_marker(4.0, 4.0, 1.0);
        let report = t.update(&mut g, &TrackerParams::default());
        assert_eq!(report.get(far), Some(&Ok(MarkerOutcome::Deferred)));
        assert_eq!(report.get(below), Some(&Ok(MarkerOutcome::Deferred)));
        assert!(matches!(report.get(near), Some(Ok(MarkerOutcome::Moved { .. }))));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn injection_happens_at_new_position() {
        let mut g = uniform(32, 32, Vec2::new(1.0, 0.0));
        let mut t = MarkerTracker::new();
        t.add_marker(10.0, 10.0, 0.5);
        t.update(&mut g, &TrackerParams::default());
        // Moved to (11, 10); the patch sits around column 11.
        assert_eq!(g.sample(12, 10), Vec2::new(1.5, 0.0));
        assert_eq!(g.sample(10, 10), Vec2::new(0.5, 0.0));
        assert_eq!(g.sample(11, 9), Vec2::new(1.0, -0.5));
        assert_eq!(g.sample(11, 10), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn failures_respect_policy_and_do_not_stop_the_pass() {
        let mut g = uniform(16, 16, Vec2::new(0.5, 0.5));
        let mut t = MarkerTracker::new();
        let bad = t.add_marker(f32::NAN, 3.0, 1.0);
        let good = t.add_marker(4.0, 4.0, 1.0);

        let report = t.update(&mut g, &TrackerParams::default());
        assert_eq!(report.failed(), 1);
        assert_eq!(report.moved(), 1);
        assert!(t.get(bad).is_some());

        let drop = TrackerParams {
            on_failure: FailurePolicy::Drop,
            ..TrackerParams::default()
        };
        let report = t.update(&mut g, &drop);
        let errors: Vec<MarkerId> = report.errors().map(|(id, _)| id).collect();
        assert_eq!(errors, vec![bad]);
        assert!(t.get(bad).is_none());
        assert!(t.get(good).is_some());
    }

    #[test]
    fn non_finite_field_is_reported() {
        let mut g = VectorGrid::new(8, 8).unwrap();
        g.set(3, 3, Vec2::new(f32::INFINITY, 0.0));
        let mut t = MarkerTracker::new();
        let id = t.add_marker(3.0, 3.0, 1.0);
        let report = t.update(&mut g, &TrackerParams::default());
        assert_eq!(
            report.get(id),
            Some(&Err(MarkerError::NonFiniteSample { cx: 3, cy: 3 }))
        );
    }

    #[test]
    fn later_markers_see_earlier_injections() {
        let mut g = VectorGrid::new(16, 16).unwrap();
        g.set(0, 0, Vec2::new(1.0, 0.0));
        let mut t = MarkerTracker::new();
        t.add_marker(0.0, 0.0, 1.0);
        let second = t.add_marker(2.0, 0.0, 1.0);
        let params = TrackerParams {
            neighborhood: 1,
            ..TrackerParams::default()
        };
        let report = t.update(&mut g, &params);
        // The first marker's patch writes (1, 0) into cell (1, 0). Without it
        // the second marker's window would be all zero and it would defer.
        assert!(matches!(report.get(second), Some(Ok(MarkerOutcome::Moved { .. }))));
    }

    #[test]
    fn params_validate() {
        assert!(TrackerParams::default().validate().is_ok());
        let bad = TrackerParams {
            move_factor: f32::NAN,
            ..TrackerParams::default()
        };
        assert!(bad.validate().unwrap_err().contains("move_factor"));
        let bad = TrackerParams {
            clear_threshold: -1.0,
            ..TrackerParams::default()
        };
        assert!(bad.validate().is_err());
    }

    proptest! {
        #[test]
        fn moved_markers_stay_inside_grid(
            w in 2u32..24,
            h in 2u32..24,
            vx in -3.0f32..3.0,
            vy in -3.0f32..3.0,
            px in 0.0f32..1.0,
            py in 0.0f32..1.0,
        ) {
            let mut g = uniform(w, h, Vec2::new(vx, vy));
            let mut t = MarkerTracker::new();
            let id = t.add_marker(px * (w - 1) as f32, py * (h - 1) as f32, 0.0);
            let report = t.update(&mut g, &TrackerParams::default());
            if let Some(Ok(MarkerOutcome::Moved { to, .. })) = report.get(id) {
                prop_assert!(to.0 >= 0.0 && to.0 <= (w - 1) as f32);
                prop_assert!(to.1 >= 0.0 && to.1 <= (h - 1) as f32);
                prop_assert_eq!(t.get(id).map(|m| (m.x, m.y)), Some(*to));
            }
        }
    }
}
