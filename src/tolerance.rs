//! m/z matching tolerances.
//!
//! Tolerances are symmetric and always expressed as positive values: an
//! absolute tolerance of `0.01` around m/z 200 accepts `[199.99, 200.01]`.
//!
//! In TOML they are written as a single-key table:
//!
//! ```toml
//! mz_tolerance = { da = 0.01 }
//! # or
//! mz_tolerance = { ppm = 10.0 }
//! ```

use serde::{Deserialize, Serialize};

/// Symmetric m/z tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MzTolerance {
    /// Absolute window in Dalton (Th)
    #[serde(rename = "da")]
    Absolute(f64),
    /// Relative window in parts-per-million of the reference m/z
    #[serde(rename = "ppm")]
    Ppm(f64),
}

impl Default for MzTolerance {
    fn default() -> Self {
        Self::Absolute(0.01)
    }
}

impl MzTolerance {
    /// Half-width of the window around `reference`.
    pub fn half_width(&self, reference: f64) -> f64 {
        match self {
            Self::Absolute(da) => *da,
            Self::Ppm(ppm) => reference.abs() * ppm * 1e-6,
        }
    }

    /// Inclusive `(low, high)` bounds around `reference`.
    pub fn window(&self, reference: f64) -> (f64, f64) {
        let half = self.half_width(reference);
        (reference - half, reference + half)
    }

    /// Whether `query` falls inside the window around `reference`.
    pub fn contains(&self, reference: f64, query: f64) -> bool {
        (query - reference).abs() <= self.half_width(reference)
    }

    /// Check that the tolerance is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let (value, unit) = match self {
            Self::Absolute(v) => (*v, "Da"),
            Self::Ppm(v) => (*v, "ppm"),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(format!(
                "m/z tolerance must be a finite non-negative number, got {} {}",
                value, unit
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_window() {
        let tol = MzTolerance::Absolute(0.01);
        assert!(tol.contains(200.0, 200.005));
        assert!(tol.contains(200.0, 199.995));
        assert!(!tol.contains(200.0, 200.02));
        let (lo, hi) = tol.window(200.0);
        assert!((lo - 199.99).abs() < 1e-12);
        assert!((hi - 200.01).abs() < 1e-12);
    }

    #[test]
    fn test_ppm_window() {
        let tol = MzTolerance::Ppm(10.0);
        assert!((tol.half_width(1000.0) - 0.01).abs() < 1e-12);
        assert!(tol.contains(1000.0, 1000.009));
        assert!(!tol.contains(1000.0, 1000.02));
    }

    #[test]
    fn test_validate() {
        assert!(MzTolerance::Absolute(0.0).validate().is_ok());
        assert!(MzTolerance::Ppm(-1.0).validate().is_err());
        assert!(MzTolerance::Absolute(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_toml_representation() {
        #[derive(Deserialize)]
        struct Wrapper {
            mz_tolerance: MzTolerance,
        }

        let w: Wrapper = toml::from_str("mz_tolerance = { ppm = 5.0 }").unwrap();
        assert_eq!(w.mz_tolerance, MzTolerance::Ppm(5.0));

        let w: Wrapper = toml::from_str("mz_tolerance = { da = 0.02 }").unwrap();
        assert_eq!(w.mz_tolerance, MzTolerance::Absolute(0.02));
    }
}
