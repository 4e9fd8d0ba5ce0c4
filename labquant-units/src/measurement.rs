//! Measurement - a value with an associated unit
//!
//! `add`, `subtract`, `multiply_by` and `divide_by` accumulate into the
//! receiver in place, after converting the operand into the receiver's unit.
//! `plus`, `minus`, `times` and `div_scalar` return new values instead.

use std::fmt;
use labquant_core::float::{self, ABSOLUTE_TOLERANCE};
use labquant_core::{QuantError, Result};

use crate::Unit;

/// A physical measurement: a numeric value in a unit
#[derive(Debug, Clone)]
pub struct Measurement {
    value: f64,
    unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, unit: Unit) -> Self {
        Measurement { value, unit }
    }

    /// The raw value, in this measurement's unit
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// The value expressed in the base unit
    pub fn si_value(&self) -> f64 {
        self.unit.to_si(self.value)
    }

    /// The value in the base unit together with the base symbol
    pub fn in_base_unit(&self) -> (f64, &str) {
        (self.si_value(), self.unit.base_symbol())
    }

    pub fn is_compatible(&self, other: &Measurement) -> bool {
        self.unit.is_compatible(&other.unit)
    }

    /// Convert to another unit
    pub fn convert_to(&self, target: &Unit) -> Result<Measurement> {
        let value = self.unit.convert_value(self.value, target)?;
        Ok(Measurement::new(value, target.clone()))
    }

    /// This measurement's value expressed in `target`
    pub fn value_in(&self, target: &Unit) -> Result<f64> {
        self.unit.convert_value(self.value, target)
    }

    /// `other`'s value expressed in this measurement's unit
    fn operand(&self, other: &Measurement) -> Result<f64> {
        other.value_in(&self.unit)
    }

    // ========== In-place arithmetic ==========

    pub fn add(&mut self, other: &Measurement) -> Result<()> {
        self.value += self.operand(other)?;
        Ok(())
    }

    pub fn subtract(&mut self, other: &Measurement) -> Result<()> {
        self.value -= self.operand(other)?;
        Ok(())
    }

    pub fn multiply_by(&mut self, factor: f64) {
        self.value *= factor;
    }

    pub fn divide_by(&mut self, divisor: f64) -> Result<()> {
        if divisor == 0.0 {
            return Err(QuantError::DivisionByZero);
        }
        self.value /= divisor;
        Ok(())
    }

    // ========== Value arithmetic ==========

    pub fn plus(&self, other: &Measurement) -> Result<Measurement> {
        let mut result = self.clone();
        result.add(other)?;
        Ok(result)
    }

    pub fn minus(&self, other: &Measurement) -> Result<Measurement> {
        let mut result = self.clone();
        result.subtract(other)?;
        Ok(result)
    }

    pub fn times(&self, factor: f64) -> Measurement {
        Measurement::new(self.value * factor, self.unit.clone())
    }

    pub fn div_scalar(&self, divisor: f64) -> Result<Measurement> {
        let mut result = self.clone();
        result.divide_by(divisor)?;
        Ok(result)
    }

    /// Dimensionless quotient `self / other` of two compatible measurements
    pub fn ratio(&self, other: &Measurement) -> Result<f64> {
        let denominator = self.operand(other)?;
        if denominator == 0.0 {
            return Err(QuantError::DivisionByZero);
        }
        Ok(self.value / denominator)
    }

    /// Copy rounded to `places` decimal digits in its own unit
    pub fn round_to(&self, places: u32) -> Measurement {
        Measurement::new(float::round_to(self.value, places), self.unit.clone())
    }

    // ========== Comparison ==========

    pub fn less_than(&self, other: &Measurement) -> Result<bool> {
        Ok(self.value < self.operand(other)?)
    }

    pub fn greater_than(&self, other: &Measurement) -> Result<bool> {
        Ok(self.value > self.operand(other)?)
    }

    /// Equal within `f64::EPSILON * 10000`, an absolute delta in this
    /// measurement's unit
    pub fn equal_to(&self, other: &Measurement) -> Result<bool> {
        self.equal_within(other, ABSOLUTE_TOLERANCE)
    }

    /// Equal within an absolute `tolerance` in this measurement's unit
    pub fn equal_within(&self, other: &Measurement, tolerance: f64) -> Result<bool> {
        Ok(float::approx_eq_abs(self.value, self.operand(other)?, tolerance))
    }

    /// Equal within `tolerance` relative to the larger magnitude
    pub fn approx_eq_relative(&self, other: &Measurement, tolerance: f64) -> Result<bool> {
        Ok(float::approx_eq_rel(self.value, self.operand(other)?, tolerance))
    }

    fn rounded_pair(&self, other: &Measurement, places: u32) -> Result<Option<(f64, f64)>> {
        let a = float::round_to(self.value, places);
        let b = float::round_to(self.operand(other)?, places);
        if a.is_nan() || b.is_nan() {
            return Ok(None);
        }
        Ok(Some((a, b)))
    }

    pub fn less_than_rounded(&self, other: &Measurement, places: u32) -> Result<bool> {
        Ok(self.rounded_pair(other, places)?.is_some_and(|(a, b)| a < b))
    }

    pub fn greater_than_rounded(&self, other: &Measurement, places: u32) -> Result<bool> {
        Ok(self.rounded_pair(other, places)?.is_some_and(|(a, b)| a > b))
    }

    pub fn equal_to_rounded(&self, other: &Measurement, places: u32) -> Result<bool> {
        Ok(self.rounded_pair(other, places)?.is_some_and(|(a, b)| a == b))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", float::format_value(self.value), self.unit.symbol())
    }
}

impl PartialEq for Measurement {
    fn eq(&self, other: &Self) -> bool {
        self.equal_to(other).unwrap_or(false)
    }
}
