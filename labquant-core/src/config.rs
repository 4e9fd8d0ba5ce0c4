//! Tolerance configuration for comparisons and dilution checks

use serde::{Deserialize, Serialize};

use crate::float::ABSOLUTE_TOLERANCE;

/// Tolerances used by the mixing and equivalence checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Absolute tolerance when clustering dilution factors
    pub dilution: f64,
    /// Tolerance for liquid equality (`|a/b - 1|` and factor clustering)
    pub equality: f64,
    /// Absolute tolerance for `equal_within` comparisons and for matching a
    /// zero concentration in liquid equality
    pub absolute: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            dilution: 0.025,
            equality: 0.01,
            absolute: ABSOLUTE_TOLERANCE,
        }
    }
}

impl Tolerances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dilution(mut self, tolerance: f64) -> Self {
        self.dilution = tolerance;
        self
    }

    pub fn with_equality(mut self, tolerance: f64) -> Self {
        self.equality = tolerance;
        self
    }

    pub fn with_absolute(mut self, tolerance: f64) -> Self {
        self.absolute = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Tolerances::default();
        assert_eq!(t.dilution, 0.025);
        assert_eq!(t.equality, 0.01);
        assert_eq!(t.absolute, f64::EPSILON * 10000.0);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let t: Tolerances = serde_json::from_str(r#"{"dilution": 0.05}"#).unwrap();
        assert_eq!(t.dilution, 0.05);
        assert_eq!(t.equality, 0.01);
    }

    #[test]
    fn test_builder() {
        let t = Tolerances::new().with_equality(0.1).with_dilution(0.2);
        assert_eq!(t.equality, 0.1);
        assert_eq!(t.dilution, 0.2);
    }
}
