use serde::{Deserialize, Serialize};

use crate::model::{MassPeak, Scan};
use crate::strategy::{parse_parameters, ParameterError};

use super::{check_noise_level, sort_by_mz, MassDetector};

/// Parameters of [`LocalMaximaDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LocalMaximaParameters {
    /// Minimum apex intensity of a reported mass peak
    pub noise_level: f32,
}

/// Mass detector for profile data.
///
/// Reports each local intensity maximum along the m/z axis whose intensity
/// reaches the noise level. The reported m/z is the intensity-weighted
/// centroid of the apex and its direct neighbours; the reported intensity is
/// the apex intensity. On a flat top the first point of the plateau is the
/// apex; a flat shoulder on a rising flank is not a maximum.
#[derive(Debug, Clone)]
pub struct LocalMaximaDetector {
    parameters: LocalMaximaParameters,
}

impl LocalMaximaDetector {
    /// Registry name.
    pub const NAME: &'static str = "local_maxima";

    /// Create a detector, validating the parameters.
    pub fn new(parameters: LocalMaximaParameters) -> Result<Self, ParameterError> {
        check_noise_level(parameters.noise_level)?;
        Ok(Self { parameters })
    }

    /// Registry factory.
    pub fn factory(parameters: &toml::Table) -> Result<Box<dyn MassDetector>, ParameterError> {
        let parameters: LocalMaximaParameters = parse_parameters(parameters)?;
        Ok(Box::new(Self::new(parameters)?))
    }

    /// Active parameters.
    pub fn parameters(&self) -> &LocalMaximaParameters {
        &self.parameters
    }
}

impl MassDetector for LocalMaximaDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&self, scan: &Scan) -> Vec<MassPeak> {
        let mut points: Vec<(f64, f32)> = scan.data_points().collect();
        if points.windows(2).any(|w| w[0].0 > w[1].0) {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        let noise_level = self.parameters.noise_level;
        let mut peaks = Vec::new();
        for i in 0..points.len() {
            let intensity = points[i].1;
            if intensity <= 0.0 || intensity < noise_level {
                continue;
            }
            if i > 0 && points[i - 1].1 >= intensity {
                continue;
            }
            // A plateau is a maximum only if it is followed by a drop.
            let mut end = i;
            while end + 1 < points.len() && points[end + 1].1 == intensity {
                end += 1;
            }
            if end + 1 < points.len() && points[end + 1].1 > intensity {
                continue;
            }

            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(points.len() - 1);
            let (mut weighted, mut total) = (0.0f64, 0.0f64);
            for &(mz, inten) in &points[lo..=hi] {
                weighted += mz * inten as f64;
                total += inten as f64;
            }
            peaks.push(MassPeak::new(weighted / total, intensity));
        }

        sort_by_mz(&mut peaks);
        peaks
    }
}
