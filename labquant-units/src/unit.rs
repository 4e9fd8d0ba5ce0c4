//! Unit representation with conversion factors

use std::fmt;
use labquant_core::{MeasurementType, QuantError, Result};
use crate::SiPrefix;

/// An immutable unit descriptor.
///
/// The factor converting a value in this unit into its base unit is
/// `prefix.multiplier ^ exponent * multiplier`. Two units can be converted
/// into each other only when they reduce to the same `base_symbol`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    kind: MeasurementType,
    name: String,
    symbol: String,
    base_symbol: String,
    prefix: SiPrefix,
    multiplier: f64,
    exponent: i32,
}

impl Unit {
    pub fn new(
        kind: MeasurementType,
        name: &str,
        symbol: &str,
        base_symbol: &str,
        prefix: SiPrefix,
        multiplier: f64,
        exponent: i32,
    ) -> Self {
        Unit {
            kind,
            name: name.to_string(),
            symbol: symbol.to_string(),
            base_symbol: base_symbol.to_string(),
            prefix,
            multiplier,
            exponent,
        }
    }

    /// An un-prefixed base unit that reduces to itself
    pub fn base(kind: MeasurementType, name: &str, symbol: &str) -> Self {
        Unit::new(kind, name, symbol, symbol, SiPrefix::NONE, 1.0, 1)
    }

    /// Copy of this unit with a prefix applied (`"l"` + milli -> `"ml"`)
    pub fn with_prefix(&self, prefix: SiPrefix) -> Self {
        Unit {
            kind: self.kind,
            name: format!("{}{}", prefix.name, self.name),
            symbol: format!("{}{}", prefix.symbol, self.symbol),
            base_symbol: self.base_symbol.clone(),
            prefix,
            multiplier: self.multiplier,
            exponent: self.exponent,
        }
    }

    pub fn kind(&self) -> MeasurementType {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn base_symbol(&self) -> &str {
        &self.base_symbol
    }

    pub fn prefix(&self) -> SiPrefix {
        self.prefix
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Factor to convert a value in this unit into the base unit
    pub fn si_factor(&self) -> f64 {
        self.prefix.multiplier.powi(self.exponent) * self.multiplier
    }

    /// Check if this is an un-prefixed base unit
    pub fn is_base(&self) -> bool {
        self.symbol == self.base_symbol && self.si_factor() == 1.0
    }

    /// Check if two units reduce to the same base and can be converted
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.base_symbol == other.base_symbol
    }

    /// Factor converting values in this unit into `target`
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64> {
        if !self.is_compatible(target) {
            return Err(QuantError::incompatible(&self.base_symbol, &target.base_symbol));
        }
        Ok(self.si_factor() / target.si_factor())
    }

    /// Convert a value from this unit into `target`
    pub fn convert_value(&self, value: f64, target: &Unit) -> Result<f64> {
        if self.symbol == target.symbol && self.base_symbol == target.base_symbol {
            return Ok(value);
        }
        Ok(value * self.conversion_factor(target)?)
    }

    /// Convert a value from this unit into the base unit
    pub fn to_si(&self, value: f64) -> f64 {
        value * self.si_factor()
    }

    /// Convert a value from the base unit into this unit
    pub fn from_si(&self, value_si: f64) -> f64 {
        value_si / self.si_factor()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
