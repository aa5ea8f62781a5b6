//! Per-frame timing and marker counters.
//!
//! [`FrameMetrics`] is filled in by every
//! [`FieldSession::step`](crate::FieldSession::step) and kept as the
//! session's most recent metrics.

/// Timings and counters collected during a single frame.
///
/// All durations are in microseconds. Phases that did not run this frame
/// report 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetrics {
    /// Wall-clock time for the entire frame.
    pub total_us: u64,
    /// Time spent clearing the grid.
    pub clear_us: u64,
    /// Time spent adding edge inflow.
    pub inflow_us: u64,
    /// Time spent in the whole-grid stencil pass.
    pub stencil_us: u64,
    /// Time spent updating markers.
    pub markers_us: u64,
    /// Markers moved this frame.
    pub markers_moved: u32,
    /// Markers deferred this frame.
    pub markers_deferred: u32,
    /// Markers pruned this frame.
    pub markers_pruned: u32,
    /// Marker updates that failed this frame.
    pub markers_failed: u32,
    /// Markers remaining after the frame.
    pub marker_count: u32,
}
