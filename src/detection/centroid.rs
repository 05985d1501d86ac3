use serde::{Deserialize, Serialize};

use crate::model::{MassPeak, Scan};
use crate::strategy::{parse_parameters, ParameterError};

use super::{check_noise_level, sort_by_mz, MassDetector};

/// Parameters of [`CentroidDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CentroidParameters {
    /// Minimum intensity of a reported mass peak
    pub noise_level: f32,
}

impl Default for CentroidParameters {
    fn default() -> Self {
        Self { noise_level: 0.0 }
    }
}

/// Mass detector for centroided data.
///
/// Every observation with positive intensity at or above the noise level is
/// reported as a mass peak.
#[derive(Debug, Clone)]
pub struct CentroidDetector {
    parameters: CentroidParameters,
}

impl CentroidDetector {
    /// Registry name.
    pub const NAME: &'static str = "centroid";

    /// Create a detector, validating the parameters.
    pub fn new(parameters: CentroidParameters) -> Result<Self, ParameterError> {
        check_noise_level(parameters.noise_level)?;
        Ok(Self { parameters })
    }

    /// Registry factory.
    pub fn factory(parameters: &toml::Table) -> Result<Box<dyn MassDetector>, ParameterError> {
        let parameters: CentroidParameters = parse_parameters(parameters)?;
        Ok(Box::new(Self::new(parameters)?))
    }

    /// Active parameters.
    pub fn parameters(&self) -> &CentroidParameters {
        &self.parameters
    }
}

impl MassDetector for CentroidDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&self, scan: &Scan) -> Vec<MassPeak> {
        let noise_level = self.parameters.noise_level;
        let mut peaks: Vec<MassPeak> = scan
            .data_points()
            .filter(|(_, intensity)| *intensity > 0.0 && *intensity >= noise_level)
            .map(|(mz, intensity)| MassPeak::new(mz, intensity))
            .collect();
        sort_by_mz(&mut peaks);
        peaks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_filtering() {
        let detector = CentroidDetector::new(CentroidParameters { noise_level: 100.0 }).unwrap();
        let scan = Scan::new_ms1(
            1,
            1.0,
            vec![300.0, 100.0, 200.0, 400.0],
            vec![500.0, 150.0, 50.0, 100.0],
        );

        let peaks = detector.detect(&scan);
        let mzs: Vec<f64> = peaks.iter().map(|p| p.mz).collect();
        assert_eq!(mzs, vec![100.0, 300.0, 400.0]);
    }

    #[test]
    fn test_zero_intensity_skipped() {
        let detector = CentroidDetector::new(CentroidParameters::default()).unwrap();
        let scan = Scan::new_ms1(1, 1.0, vec![100.0, 200.0], vec![0.0, 10.0]);
        assert_eq!(detector.detect(&scan), vec![MassPeak::new(200.0, 10.0)]);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut params = toml::Table::new();
        params.insert("noise".to_string(), toml::Value::Float(1.0));
        assert!(CentroidDetector::factory(&params).is_err());
    }
}
