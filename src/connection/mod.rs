//! # Peak Connection
//!
//! Second step of two-step peak picking. A [`PeakBuilder`] is fed the mass
//! peaks of one raw data file scan by scan, in acquisition order, and links
//! them into chromatographic peaks across retention time.
//!
//! The builder is stateful and order dependent, so one instance serves exactly
//! one stream. Peaks come out in two places: [`PeakBuilder::add_scan`] returns
//! the peaks that closed while processing that scan, and
//! [`PeakBuilder::finish_peaks`] flushes whatever is still open at the end.
//!
//! ## Example
//!
//! ```rust
//! use mzpick::connection::{ConnectorParameters, PeakBuilder, SimpleConnector};
//! use mzpick::model::{MassPeak, Scan};
//!
//! let mut builder = SimpleConnector::new(ConnectorParameters {
//!     min_matched_scans: 2,
//!     ..Default::default()
//! })?;
//!
//! let mut peaks = Vec::new();
//! for (n, mass_peaks) in [vec![MassPeak::new(200.0, 10.0)], vec![MassPeak::new(200.0, 30.0)]]
//!     .into_iter()
//!     .enumerate()
//! {
//!     let scan = Scan::empty(n as i64 + 1, 1, n as f32);
//!     peaks.extend(builder.add_scan(&scan, &mass_peaks));
//! }
//! peaks.extend(builder.finish_peaks());
//!
//! assert_eq!(peaks.len(), 1);
//! assert_eq!(peaks[0].scan_count(), 2);
//! # Ok::<(), mzpick::strategy::ParameterError>(())
//! ```

mod candidate;
mod simple;

pub use candidate::CandidatePeak;
pub use simple::{ConnectorParameters, GapCounting, SimpleConnector};

use crate::model::{ChromatographicPeak, MassPeak, Scan};
use crate::strategy::StrategyRegistry;

/// Links mass peaks from consecutive scans into chromatographic peaks.
pub trait PeakBuilder: Send {
    /// Registry name of this builder.
    fn name(&self) -> &'static str;

    /// Process the mass peaks detected in `scan`.
    ///
    /// Returns the peaks finalized while processing this scan, in candidate
    /// creation order.
    fn add_scan(&mut self, scan: &Scan, mass_peaks: &[MassPeak]) -> Vec<ChromatographicPeak>;

    /// Finalize every open candidate that qualifies and discard the rest.
    ///
    /// A second call without an intervening `add_scan` returns nothing.
    fn finish_peaks(&mut self) -> Vec<ChromatographicPeak>;

    /// Number of candidates currently under construction.
    fn open_candidates(&self) -> usize;
}

/// Registry of peak builder strategies.
pub type PeakBuilderRegistry = StrategyRegistry<dyn PeakBuilder>;

/// Registry holding every built-in peak builder.
pub fn default_registry() -> PeakBuilderRegistry {
    let mut registry = PeakBuilderRegistry::new("peak builder");
    registry.register(SimpleConnector::NAME, SimpleConnector::factory);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyConfig;
    use crate::tolerance::MzTolerance;

    #[test]
    fn test_registry_builds_simple_connector() {
        let config = StrategyConfig::from_parameters(
            "simple",
            &ConnectorParameters {
                mz_tolerance: MzTolerance::Ppm(20.0),
                gap_tolerance: 3,
                ..Default::default()
            },
        )
        .unwrap();

        let builder = default_registry().create(&config).unwrap();
        assert_eq!(builder.name(), "simple");
        assert_eq!(builder.open_candidates(), 0);
    }

    #[test]
    fn test_unknown_builder() {
        let err = default_registry()
            .create(&StrategyConfig::new("adap"))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Could not create peak builder 'adap': unknown strategy (available: simple)"
        );
    }
}
