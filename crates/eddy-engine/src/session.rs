//! The composition root: one grid, one marker tracker, one frame loop.
//!
//! [`FieldSession`] owns everything a frame touches. Collaborators
//! (rendering, input handling) borrow the grid and markers between frames
//! and tune the stencil through a [`LiveConfig`] clone.
//!
//! # Frame phases
//!
//! ```text
//! snapshot config → [clear] → if enabled: [edge inflow] → [stencil] → markers → metrics
//! ```
//!
//! Bracketed phases are controlled by [`SessionConfig`]. The clear phase
//! runs even when updates are disabled, so a paused session keeps showing
//! an empty field rather than the last frame.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use eddy_core::{GridError, VectorGrid};
use eddy_markers::{Marker, MarkerId, MarkerTracker, TrackerParams, UpdateReport};
use eddy_ops::{
    add_inward_edge_vectors, apply_pattern, find_vector_centers, grid_stats,
    update_grid_with_adjacent_sum, CenterDetector, GridStats, PatternKind, VectorCenter,
};

use crate::config::{SessionConfig, SessionConfigError};
use crate::live::LiveConfig;
use crate::metrics::FrameMetrics;

// Compile-time assertion: a session can be handed to another thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<FieldSession>();
    }
};

// ── FrameReport ─────────────────────────────────────────────────

/// Result of one [`FieldSession::step()`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Index of the frame just completed, starting at 0.
    pub frame: u64,
    /// Whether the update phases ran.
    pub updated: bool,
    /// Per-marker results, empty when updates were disabled.
    pub markers: UpdateReport,
    /// Timings and counters for this frame.
    pub metrics: FrameMetrics,
}

// ── FieldSession ────────────────────────────────────────────────

/// Owns the grid, the markers, and the frame loop.
///
/// # Example
///
/// ```
/// use eddy_engine::{FieldSession, SessionConfig};
/// use eddy_ops::PatternKind;
///
/// let mut session = FieldSession::new(SessionConfig::default()).unwrap();
/// session
///     .apply_pattern(PatternKind::Tangential, None, None, 1.0)
///     .unwrap();
/// session.add_marker(40.0, 32.0, 0.0);
///
/// for _ in 0..10 {
///     let report = session.step();
///     assert!(report.updated);
/// }
/// assert_eq!(session.frame(), 10);
/// ```
#[derive(Debug)]
pub struct FieldSession {
    grid: VectorGrid,
    tracker: MarkerTracker,
    tracker_params: TrackerParams,
    live: LiveConfig,
    enable_update: bool,
    clear_each_frame: bool,
    edge_inflow: Option<f32>,
    stencil_each_frame: bool,
    rng: ChaCha8Rng,
    frame: u64,
    last_metrics: FrameMetrics,
}

impl FieldSession {
    /// Validate `config` and build a session with an all-zero grid and no
    /// markers.
    pub fn new(config: SessionConfig) -> Result<Self, SessionConfigError> {
        config.validate()?;
        let grid = VectorGrid::new(config.width, config.height)?;
        debug!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            "field session created"
        );
        Ok(Self {
            grid,
            tracker: MarkerTracker::new(),
            tracker_params: config.tracker,
            live: LiveConfig::new(config.stencil),
            enable_update: config.enable_update,
            clear_each_frame: config.clear_each_frame,
            edge_inflow: config.edge_inflow,
            stencil_each_frame: config.stencil_each_frame,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            frame: 0,
            last_metrics: FrameMetrics::default(),
        })
    }

    /// The field.
    pub fn grid(&self) -> &VectorGrid {
        &self.grid
    }

    /// Mutable access to the field between frames.
    pub fn grid_mut(&mut self) -> &mut VectorGrid {
        &mut self.grid
    }

    /// The marker tracker.
    pub fn tracker(&self) -> &MarkerTracker {
        &self.tracker
    }

    /// Mutable access to the marker tracker.
    pub fn tracker_mut(&mut self) -> &mut MarkerTracker {
        &mut self.tracker
    }

    /// Snapshot of the markers.
    pub fn markers(&self) -> Vec<Marker> {
        self.tracker.get_markers()
    }

    /// Zero the whole grid.
    pub fn reset_grid(&mut self) {
        self.grid.clear();
    }

    /// Write an analytic pattern. See [`eddy_ops::apply_pattern`].
    pub fn apply_pattern(
        &mut self,
        kind: PatternKind,
        center: Option<(f64, f64)>,
        radius: Option<f64>,
        magnitude: f64,
    ) -> Result<usize, GridError> {
        let written = apply_pattern(&mut self.grid, kind, center, radius, magnitude)?;
        trace!(?kind, written, "pattern applied");
        Ok(written)
    }

    /// Add one marker.
    pub fn add_marker(&mut self, x: f32, y: f32, mag: f32) -> MarkerId {
        self.tracker.add_marker(x, y, mag)
    }

    /// Add `count` markers at random integer cells with the default
    /// magnitude. Positions come from the session's seeded generator.
    pub fn scatter_markers(&mut self, count: usize) -> Vec<MarkerId> {
        let w = self.grid.width();
        let h = self.grid.height();
        (0..count)
            .map(|_| {
                let x = self.rng.random_range(0..w);
                let y = self.rng.random_range(0..h);
                self.tracker
                    .add_marker(x as f32, y as f32, Marker::DEFAULT_MAG)
            })
            .collect()
    }

    /// Remove every marker.
    pub fn clear_markers(&mut self) {
        self.tracker.clear_markers();
    }

    /// Find sources and sinks with the default boundary and scan order.
    pub fn detect_centers(&self, threshold: f32, min_distance: f32) -> Vec<VectorCenter> {
        find_vector_centers(&self.grid, threshold, min_distance)
    }

    /// Find sources and sinks with a configured detector.
    pub fn detect_centers_with(&self, detector: &CenterDetector) -> Vec<VectorCenter> {
        detector.detect(&self.grid)
    }

    /// Magnitude statistics of the current field.
    pub fn stats(&self) -> GridStats {
        grid_stats(&self.grid)
    }

    /// Handle for tuning the stencil from elsewhere.
    pub fn live_config(&self) -> LiveConfig {
        self.live.clone()
    }

    /// Turn the update phases on or off.
    pub fn set_update_enabled(&mut self, enabled: bool) {
        self.enable_update = enabled;
    }

    /// Whether the update phases run.
    pub fn update_enabled(&self) -> bool {
        self.enable_update
    }

    /// Current marker parameters.
    pub fn tracker_params(&self) -> &TrackerParams {
        &self.tracker_params
    }

    /// Replace the marker parameters.
    pub fn set_tracker_params(&mut self, params: TrackerParams) -> Result<(), SessionConfigError> {
        params
            .validate()
            .map_err(|reason| SessionConfigError::InvalidTracker { reason })?;
        self.tracker_params = params;
        Ok(())
    }

    /// Number of frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Metrics from the most recent frame.
    pub fn last_metrics(&self) -> &FrameMetrics {
        &self.last_metrics
    }

    /// Run one frame.
    pub fn step(&mut self) -> FrameReport {
        let frame_start = Instant::now();
        let stencil = self.live.snapshot();
        let mut metrics = FrameMetrics::default();
        let mut markers = UpdateReport::default();

        if self.clear_each_frame {
            let t = Instant::now();
            self.grid.clear();
            metrics.clear_us = t.elapsed().as_micros() as u64;
        }

        if self.enable_update {
            if let Some(magnitude) = self.edge_inflow {
                let t = Instant::now();
                add_inward_edge_vectors(&mut self.grid, magnitude);
                metrics.inflow_us = t.elapsed().as_micros() as u64;
            }

            if self.stencil_each_frame {
                let t = Instant::now();
                update_grid_with_adjacent_sum(&mut self.grid, None, &stencil);
                metrics.stencil_us = t.elapsed().as_micros() as u64;
            }

            let t = Instant::now();
            markers = self.tracker.update(&mut self.grid, &self.tracker_params);
            metrics.markers_us = t.elapsed().as_micros() as u64;
            metrics.markers_moved = markers.moved() as u32;
            metrics.markers_deferred = markers.deferred() as u32;
            metrics.markers_pruned = markers.pruned() as u32;
            metrics.markers_failed = markers.failed() as u32;
        }

        metrics.marker_count = self.tracker.len() as u32;
        metrics.total_us = frame_start.elapsed().as_micros() as u64;

        let frame = self.frame;
        self.frame += 1;
        self.last_metrics = metrics.clone();

        debug!(
            frame,
            updated = self.enable_update,
            markers = metrics.marker_count,
            pruned = metrics.markers_pruned,
            failed = metrics.markers_failed,
            total_us = metrics.total_us,
            "frame complete"
        );

        FrameReport {
            frame,
            updated: self.enable_update,
            markers,
            metrics,
        }
    }
}
