//! Generator settings.
//!
//! `MsdfConfig` deserialises from TOML so asset jobs can override the
//! defaults per sprite sheet or font:
//!
//! ```toml
//! range = 2.0
//! angle_threshold = 3.0
//!
//! [error_correction]
//! mode = "clash_median"
//! edge_threshold = 1.001
//! ```

use serde::Deserialize;

use crate::coloring::DEFAULT_ANGLE_THRESHOLD;
use crate::correction::ErrorCorrection;
use crate::error::{MsdfError, Result};

/// Distance range in output pixels used for sprites.
pub const DEFAULT_RANGE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MsdfConfig {
    /// Width of the distance band, in output pixels.
    pub range: f64,
    /// Corner detection threshold passed to edge coloring, in radians.
    pub angle_threshold: f64,
    /// Post-pass over the finished bitmap.  Disabled by default: it trades
    /// corner sharpness for fewer interpolation artefacts, which is the
    /// wrong trade for filled shapes.
    pub error_correction: ErrorCorrection,
}

impl Default for MsdfConfig {
    fn default() -> Self {
        Self {
            range: DEFAULT_RANGE,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            error_correction: ErrorCorrection::Disabled,
        }
    }
}

impl MsdfConfig {
    /// Parse and validate a TOML document.  Missing keys keep their default.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    pub fn with_angle_threshold(mut self, angle_threshold: f64) -> Self {
        self.angle_threshold = angle_threshold;
        self
    }

    pub fn with_error_correction(mut self, error_correction: ErrorCorrection) -> Self {
        self.error_correction = error_correction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(MsdfError::InvalidConfig(format!(
                "range must be a positive number, got {}",
                self.range
            )));
        }
        if !(self.angle_threshold.is_finite() && self.angle_threshold > 0.0) {
            return Err(MsdfError::InvalidConfig(format!(
                "angle_threshold must be a positive number, got {}",
                self.angle_threshold
            )));
        }
        if let ErrorCorrection::ClashMedian { edge_threshold } = self.error_correction {
            if !(edge_threshold.is_finite() && edge_threshold > 0.0) {
                return Err(MsdfError::InvalidConfig(format!(
                    "edge_threshold must be a positive number, got {edge_threshold}"
                )));
            }
        }
        Ok(())
    }
}
