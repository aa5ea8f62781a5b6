//! Run a short session over a vortex with a sink beside it and print what
//! the detector and markers see every few frames.
//!
//! ```sh
//! cargo run -p eddy-engine --example vortex_session
//! ```

use eddy_core::StencilConfig;
use eddy_engine::{FieldSession, SessionConfig};
use eddy_ops::PatternKind;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig {
        width: 96,
        height: 64,
        stencil: StencilConfig::builder()
            .enable_normalization(true)
            .build()?,
        seed: 2024,
        ..SessionConfig::default()
    };
    let mut session = FieldSession::new(config)?;

    session.apply_pattern(PatternKind::Tangential, Some((32.0, 32.0)), Some(20.0), 1.0)?;
    session.apply_pattern(PatternKind::Radial, Some((72.0, 32.0)), Some(14.0), -1.0)?;
    session.scatter_markers(16);

    println!("initial: {}", session.stats());
    for _ in 0..60 {
        let report = session.step();
        if report.frame % 15 == 0 {
            let centers = session.detect_centers(0.3, 8.0);
            println!(
                "frame {:>3}: {} markers ({} moved, {} pruned), {} centers, {} us",
                report.frame,
                report.metrics.marker_count,
                report.metrics.markers_moved,
                report.metrics.markers_pruned,
                centers.len(),
                report.metrics.total_us,
            );
        }
    }
    println!("final:   {}", session.stats());
    for m in session.markers() {
        println!("  marker at ({:.2}, {:.2})", m.x, m.y);
    }
    Ok(())
}
