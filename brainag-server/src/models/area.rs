//! Farm land areas, in hectares

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Validate a single area value.
pub fn hectares(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidArea { field });
    }
    Ok(value)
}

/// The three areas of a farm.
///
/// Invariant once validated: `arable + vegetation <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandAreas {
    pub total: f64,
    pub arable: f64,
    pub vegetation: f64,
}

impl LandAreas {
    pub fn new(total: f64, arable: f64, vegetation: f64) -> Self {
        Self {
            total,
            arable,
            vegetation,
        }
    }

    /// Overlay proposed values on the current ones.
    pub fn merged(self, total: Option<f64>, arable: Option<f64>, vegetation: Option<f64>) -> Self {
        Self {
            total: total.unwrap_or(self.total),
            arable: arable.unwrap_or(self.arable),
            vegetation: vegetation.unwrap_or(self.vegetation),
        }
    }

    /// Check the area-sum invariant.
    ///
    /// # Example
    /// ```
    /// use brainag_server::models::LandAreas;
    ///
    /// assert!(LandAreas::new(100.0, 70.0, 30.0).validate().is_ok());
    /// assert!(LandAreas::new(50.0, 40.0, 20.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.arable + self.vegetation > self.total {
            return Err(ValidationError::AreaExceeded {
                total: self.total,
                arable: self.arable,
                vegetation: self.vegetation,
            });
        }
        Ok(())
    }
}
