//! # Mass Detection
//!
//! First step of two-step peak picking: turn one [`Scan`] into a set of
//! [`MassPeak`]s. Detectors are pure functions of the scan and their own
//! parameters; they never look at previous scans.
//!
//! Built-in strategies, selected by name through [`default_registry`]:
//!
//! | Name | Input | Parameters |
//! |------|-------|------------|
//! | `centroid` | centroided scans | `noise_level` |
//! | `local_maxima` | profile scans | `noise_level` |

mod centroid;
mod local_maxima;

pub use centroid::{CentroidDetector, CentroidParameters};
pub use local_maxima::{LocalMaximaDetector, LocalMaximaParameters};

use crate::model::{MassPeak, Scan};
use crate::strategy::{ParameterError, StrategyRegistry};

/// Converts one scan into discrete mass peaks.
pub trait MassDetector: Send + Sync {
    /// Registry name of this detector.
    fn name(&self) -> &'static str;

    /// Detect mass peaks in `scan`, sorted by ascending m/z.
    ///
    /// A scan without observations yields an empty vector.
    fn detect(&self, scan: &Scan) -> Vec<MassPeak>;
}

/// Registry of mass detector strategies.
pub type MassDetectorRegistry = StrategyRegistry<dyn MassDetector>;

/// Registry holding every built-in mass detector.
pub fn default_registry() -> MassDetectorRegistry {
    let mut registry = MassDetectorRegistry::new("mass detector");
    registry
        .register(CentroidDetector::NAME, CentroidDetector::factory)
        .register(LocalMaximaDetector::NAME, LocalMaximaDetector::factory);
    registry
}

/// Shared validation of a noise level parameter.
fn check_noise_level(noise_level: f32) -> Result<(), ParameterError> {
    if !noise_level.is_finite() || noise_level < 0.0 {
        return Err(ParameterError::new(format!(
            "noise_level must be a finite non-negative number, got {}",
            noise_level
        )));
    }
    Ok(())
}

/// Sort peaks by m/z in place.
fn sort_by_mz(peaks: &mut [MassPeak]) {
    peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
}
