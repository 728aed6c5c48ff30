//! Configuration for batch simplification.

use crate::error::SimplifyError;
use num_traits::Float;

/// Options for [`TaggedLinesSimplifier`](super::TaggedLinesSimplifier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifyOptions<F> {
    /// Distance tolerance. Interior points closer than this to the chord
    /// replacing them may be removed. Zero removes only points lying exactly
    /// on the chord.
    pub tolerance: F,
    /// Grid cell size of the shared segment indexes. `None` derives it from
    /// the mean envelope extent of the input segments.
    pub cell_size: Option<F>,
}

impl<F: Float> Default for SimplifyOptions<F> {
    fn default() -> Self {
        Self {
            tolerance: F::zero(),
            cell_size: None,
        }
    }
}

impl<F: Float> SimplifyOptions<F> {
    /// Creates options with the given distance tolerance.
    pub fn with_tolerance(tolerance: F) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    /// Sets the segment index cell size.
    pub fn cell_size(mut self, cell_size: F) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Checks the tolerance and cell size.
    pub fn validate(&self) -> Result<(), SimplifyError> {
        validate_tolerance(self.tolerance)?;
        match self.cell_size {
            Some(c) if !(c > F::zero() && c.is_finite()) => Err(SimplifyError::InvalidCellSize),
            _ => Ok(()),
        }
    }
}

/// Rejects negative and NaN tolerances.
pub(crate) fn validate_tolerance<F: Float>(tolerance: F) -> Result<(), SimplifyError> {
    if tolerance >= F::zero() {
        Ok(())
    } else {
        Err(SimplifyError::InvalidTolerance {
            tolerance: tolerance.to_f64().unwrap_or(f64::NAN),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options: SimplifyOptions<f64> = SimplifyOptions::default();
        assert_eq!(options.tolerance, 0.0);
        assert_eq!(options.cell_size, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = SimplifyOptions::with_tolerance(0.5f32).cell_size(2.0);
        assert_eq!(options.tolerance, 0.5);
        assert_eq!(options.cell_size, Some(2.0));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = SimplifyOptions::with_tolerance(-1.0f64).validate().unwrap_err();
        assert_eq!(err, SimplifyError::InvalidTolerance { tolerance: -1.0 });
        assert!(validate_tolerance(f64::NAN).is_err());
        assert!(validate_tolerance(f64::INFINITY).is_ok());
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        let options = SimplifyOptions::with_tolerance(1.0f64).cell_size(0.0);
        assert_eq!(options.validate().unwrap_err(), SimplifyError::InvalidCellSize);
    }
}
