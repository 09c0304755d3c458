//! Cost policy (the tunable factors of the cost rules).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Multipliers applied by the cost rules.
///
/// Deserializes with per-field defaults, so a partial document such as
/// `{"training_factor": 2.0}` keeps the other defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostPolicy {
    /// Multiplier applied to `base_cost` per distinct trained role.
    pub training_factor: f64,
    /// Multiplier applied to an external sharing a band with the roster.
    pub band_discount_factor: f64,
    /// Share of the star performer's billing given back.
    pub star_rebate_rate: f64,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            training_factor: 1.5,
            band_discount_factor: 0.5,
            star_rebate_rate: 0.25,
        }
    }
}

impl CostPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_training_factor(mut self, factor: f64) -> Self {
        self.training_factor = factor;
        self
    }

    pub fn with_band_discount_factor(mut self, factor: f64) -> Self {
        self.band_discount_factor = factor;
        self
    }

    pub fn with_star_rebate_rate(mut self, rate: f64) -> Self {
        self.star_rebate_rate = rate;
        self
    }

    /// Checks that every factor is usable.
    ///
    /// The training factor must be finite and positive (it is divided out
    /// when decomposing costs); the band factor and the rebate rate must lie
    /// in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.training_factor.is_finite() || self.training_factor <= 0.0 {
            return Err(ConfigError::InvalidPolicy {
                field: "training_factor",
                value: self.training_factor,
            });
        }
        if !(0.0..=1.0).contains(&self.band_discount_factor) {
            return Err(ConfigError::InvalidPolicy {
                field: "band_discount_factor",
                value: self.band_discount_factor,
            });
        }
        if !(0.0..=1.0).contains(&self.star_rebate_rate) {
            return Err(ConfigError::InvalidPolicy {
                field: "star_rebate_rate",
                value: self.star_rebate_rate,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = CostPolicy::default();
        assert!((p.training_factor - 1.5).abs() < 1e-10);
        assert!((p.band_discount_factor - 0.5).abs() < 1e-10);
        assert!((p.star_rebate_rate - 0.25).abs() < 1e-10);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let p: CostPolicy = serde_json::from_str(r#"{"training_factor": 2.0}"#).unwrap();
        assert!((p.training_factor - 2.0).abs() < 1e-10);
        assert!((p.band_discount_factor - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_factors() {
        assert!(CostPolicy::new().with_training_factor(0.0).validate().is_err());
        assert!(CostPolicy::new().with_training_factor(f64::NAN).validate().is_err());
        assert!(CostPolicy::new().with_band_discount_factor(1.5).validate().is_err());
        assert!(CostPolicy::new().with_star_rebate_rate(-0.1).validate().is_err());
    }
}
