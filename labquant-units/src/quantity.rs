//! Typed quantities
//!
//! Each typed quantity (`Volume`, `Concentration`, ...) is a sum type:
//! `Unset`, or a `Value` holding a [`Measurement`] whose unit is declared
//! for the quantity's measurement type. `Unset` behaves as zero in every
//! operation and never touches the registry.

use std::fmt;
use labquant_core::float::{self, ABSOLUTE_TOLERANCE};
use labquant_core::{MeasurementType, QuantError, Result};

use crate::{Measurement, Unit, UnitRegistry};

/// Behaviour shared by every typed quantity
pub trait TypedQuantity: Sized + Clone + fmt::Debug {
    /// The measurement type every unit of this quantity must belong to
    const KIND: MeasurementType;

    /// The zero/unset variant
    fn unset() -> Self;

    /// Wrap a measurement already known to be of `KIND`
    fn wrap(measurement: Measurement) -> Self;

    fn measurement(&self) -> Option<&Measurement>;

    // ========== Construction ==========

    /// Build a quantity, failing if `symbol` is not declared for `KIND`
    fn new(registry: &UnitRegistry, value: f64, symbol: &str) -> Result<Self> {
        let unit = registry.unit_for_type(Self::KIND, symbol)?;
        Ok(Self::wrap(Measurement::new(value, unit)))
    }

    /// Build a quantity from a unit literal known to be valid.
    ///
    /// # Panics
    ///
    /// Panics, naming the valid units for `KIND`, when `symbol` is not one of them.
    fn must(registry: &UnitRegistry, value: f64, symbol: &str) -> Self {
        match Self::new(registry, value, symbol) {
            Ok(q) => q,
            Err(e) => panic!(
                "{}; valid {} units: {}",
                e,
                Self::KIND,
                registry.list_valid_units_for_type(Self::KIND).join(", ")
            ),
        }
    }

    /// A zero-valued quantity in `symbol`
    fn zero(registry: &UnitRegistry, symbol: &str) -> Result<Self> {
        Self::new(registry, 0.0, symbol)
    }

    /// Wrap an existing measurement, checking its measurement type
    fn from_measurement(measurement: Measurement) -> Result<Self> {
        check_kind(Self::KIND, measurement.unit())?;
        Ok(Self::wrap(measurement))
    }

    // ========== Inspection ==========

    fn is_unset(&self) -> bool {
        self.measurement().is_none()
    }

    /// Raw value in the quantity's own unit, 0 when unset
    fn value(&self) -> f64 {
        self.measurement().map(|m| m.value()).unwrap_or(0.0)
    }

    fn unit(&self) -> Option<&Unit> {
        self.measurement().map(|m| m.unit())
    }

    fn symbol(&self) -> Option<&str> {
        self.unit().map(|u| u.symbol())
    }

    /// Value in the base unit, 0 when unset
    fn si_value(&self) -> f64 {
        self.measurement().map(|m| m.si_value()).unwrap_or(0.0)
    }

    fn is_zero(&self) -> bool {
        self.value() == 0.0
    }

    // ========== Conversion ==========

    /// Convert into `unit`; an unset quantity stays unset
    fn convert_to(&self, unit: &Unit) -> Result<Self> {
        check_kind(Self::KIND, unit)?;
        match self.measurement() {
            Some(m) => Ok(Self::wrap(m.convert_to(unit)?)),
            None => Ok(Self::unset()),
        }
    }

    fn convert_to_symbol(&self, registry: &UnitRegistry, symbol: &str) -> Result<Self> {
        let unit = registry.unit_for_type(Self::KIND, symbol)?;
        self.convert_to(&unit)
    }

    /// Value expressed in `unit`, 0 when unset
    fn value_in(&self, unit: &Unit) -> Result<f64> {
        match self.measurement() {
            Some(m) => m.value_in(unit),
            None => Ok(0.0),
        }
    }

    // ========== Arithmetic ==========

    /// Sum in the receiver's unit (or `other`'s when the receiver is unset)
    fn plus(&self, other: &Self) -> Result<Self> {
        match (self.measurement(), other.measurement()) {
            (Some(a), Some(b)) => Ok(Self::wrap(a.plus(b)?)),
            (Some(_), None) => Ok(self.clone()),
            (None, _) => Ok(other.clone()),
        }
    }

    fn minus(&self, other: &Self) -> Result<Self> {
        match (self.measurement(), other.measurement()) {
            (Some(a), Some(b)) => Ok(Self::wrap(a.minus(b)?)),
            (Some(_), None) => Ok(self.clone()),
            (None, Some(b)) => Ok(Self::wrap(b.times(-1.0))),
            (None, None) => Ok(Self::unset()),
        }
    }

    fn scale(&self, factor: f64) -> Self {
        match self.measurement() {
            Some(m) => Self::wrap(m.times(factor)),
            None => Self::unset(),
        }
    }

    fn div_scalar(&self, divisor: f64) -> Result<Self> {
        if divisor == 0.0 {
            return Err(QuantError::DivisionByZero);
        }
        Ok(self.scale(1.0 / divisor))
    }

    /// Dimensionless quotient `self / other`
    fn ratio(&self, other: &Self) -> Result<f64> {
        let (a, b) = self.pair(other)?;
        if b == 0.0 {
            return Err(QuantError::DivisionByZero);
        }
        Ok(a / b)
    }

    fn round_to(&self, places: u32) -> Self {
        match self.measurement() {
            Some(m) => Self::wrap(m.round_to(places)),
            None => Self::unset(),
        }
    }

    // ========== Comparison ==========

    /// Both values in a common unit (the first set side's), unset as 0
    fn pair(&self, other: &Self) -> Result<(f64, f64)> {
        match (self.measurement(), other.measurement()) {
            (Some(a), Some(b)) => Ok((a.value(), b.value_in(a.unit())?)),
            (Some(a), None) => Ok((a.value(), 0.0)),
            (None, Some(b)) => Ok((0.0, b.value())),
            (None, None) => Ok((0.0, 0.0)),
        }
    }

    fn less_than(&self, other: &Self) -> Result<bool> {
        let (a, b) = self.pair(other)?;
        Ok(a < b)
    }

    fn greater_than(&self, other: &Self) -> Result<bool> {
        let (a, b) = self.pair(other)?;
        Ok(a > b)
    }

    /// Equal within the absolute tolerance of [`Measurement::equal_to`]
    fn equal_to(&self, other: &Self) -> Result<bool> {
        self.equal_within(other, ABSOLUTE_TOLERANCE)
    }

    /// Equal within an absolute `tolerance` in the receiver's unit
    /// (typically `Tolerances::absolute`)
    fn equal_within(&self, other: &Self, tolerance: f64) -> Result<bool> {
        let (a, b) = self.pair(other)?;
        Ok(float::approx_eq_abs(a, b, tolerance))
    }

    /// Equal within `tolerance` relative to the larger magnitude
    fn approx_eq_relative(&self, other: &Self, tolerance: f64) -> Result<bool> {
        let (a, b) = self.pair(other)?;
        Ok(float::approx_eq_rel(a, b, tolerance))
    }

    fn min_of(&self, other: &Self) -> Result<Self> {
        Ok(if other.less_than(self)? { other.clone() } else { self.clone() })
    }

    fn max_of(&self, other: &Self) -> Result<Self> {
        Ok(if other.greater_than(self)? { other.clone() } else { self.clone() })
    }
}

fn check_kind(kind: MeasurementType, unit: &Unit) -> Result<()> {
    if unit.kind() != kind {
        return Err(QuantError::TypeMismatch {
            symbol: unit.symbol().to_string(),
            expected: kind,
            found: unit.kind(),
        });
    }
    Ok(())
}

macro_rules! typed_quantity {
    ($(#[$doc:meta])* $name:ident => $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub enum $name {
            #[default]
            Unset,
            Value(Measurement),
        }

        impl TypedQuantity for $name {
            const KIND: MeasurementType = MeasurementType::$kind;

            fn unset() -> Self {
                $name::Unset
            }

            fn wrap(measurement: Measurement) -> Self {
                $name::Value(measurement)
            }

            fn measurement(&self) -> Option<&Measurement> {
                match self {
                    $name::Unset => None,
                    $name::Value(m) => Some(m),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.equal_to(other).unwrap_or(false)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $name::Unset => write!(f, "unset"),
                    $name::Value(m) => write!(f, "{}", m),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                crate::codec::serialize_quantity(self, serializer)
            }
        }
    };
}

typed_quantity!(
    /// Liquid volume (`ul`, `ml`, `l`, `mm^3`, ...)
    Volume => Volume
);
typed_quantity!(
    /// Concentration: mass/volume, molar, relative (`X`) or `v/v`
    Concentration => Concentration
);
typed_quantity!(Mass => Mass);
typed_quantity!(Moles => Moles);
typed_quantity!(Temperature => Temperature);
typed_quantity!(Time => Time);
typed_quantity!(Length => Length);
typed_quantity!(Area => Area);
typed_quantity!(Pressure => Pressure);
typed_quantity!(Force => Force);
typed_quantity!(Energy => Energy);
typed_quantity!(Density => Density);
typed_quantity!(
    /// Volumetric flow (`ul/s`, `ml/min`, ...)
    FlowRate => FlowRate
);
typed_quantity!(Velocity => Velocity);
typed_quantity!(
    /// Events per unit time (`/s`, `/min`)
    Rate => Rate
);
typed_quantity!(AngularVelocity => AngularVelocity);
typed_quantity!(Voltage => Voltage);
typed_quantity!(Angle => Angle);
