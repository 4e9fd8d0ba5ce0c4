//! Approved unit catalogue
//!
//! The catalogue is pure data: an ordered list of declarations. Applying it
//! to a [`UnitRegistry`] is the only place the two meet, so a deployment can
//! swap the approved unit set (e.g. from a JSON document) without touching
//! conversion logic.

use serde::{Deserialize, Serialize};
use labquant_core::{MeasurementType, QuantError, Result};

use crate::UnitRegistry;

fn default_exponent() -> i32 {
    1
}

/// One declaration call against a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "declare", rename_all = "snake_case")]
pub enum Declaration {
    Unit {
        measurement: MeasurementType,
        name: String,
        symbol: String,
        #[serde(default)]
        prefixes: Vec<String>,
        #[serde(default = "default_exponent")]
        exponent: i32,
    },
    Derived {
        measurement: MeasurementType,
        name: String,
        symbol: String,
        #[serde(default)]
        prefixes: Vec<String>,
        #[serde(default = "default_exponent")]
        exponent: i32,
        target: String,
        scale: f64,
    },
    Alias {
        measurement: MeasurementType,
        alias: String,
        target: String,
        #[serde(default)]
        prefixes: Vec<String>,
    },
}

/// Ordered list of unit declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    pub declarations: Vec<Declaration>,
}

fn owned(prefixes: &[&str]) -> Vec<String> {
    prefixes.iter().map(|p| p.to_string()).collect()
}

fn borrowed(prefixes: &[String]) -> Vec<&str> {
    prefixes.iter().map(|p| p.as_str()).collect()
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(
        mut self,
        measurement: MeasurementType,
        name: &str,
        symbol: &str,
        prefixes: &[&str],
        exponent: i32,
    ) -> Self {
        self.declarations.push(Declaration::Unit {
            measurement,
            name: name.to_string(),
            symbol: symbol.to_string(),
            prefixes: owned(prefixes),
            exponent,
        });
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn derived(
        mut self,
        measurement: MeasurementType,
        name: &str,
        symbol: &str,
        prefixes: &[&str],
        exponent: i32,
        target: &str,
        scale: f64,
    ) -> Self {
        self.declarations.push(Declaration::Derived {
            measurement,
            name: name.to_string(),
            symbol: symbol.to_string(),
            prefixes: owned(prefixes),
            exponent,
            target: target.to_string(),
            scale,
        });
        self
    }

    pub fn alias(
        mut self,
        measurement: MeasurementType,
        alias: &str,
        target: &str,
        prefixes: &[&str],
    ) -> Self {
        self.declarations.push(Declaration::Alias {
            measurement,
            alias: alias.to_string(),
            target: target.to_string(),
            prefixes: owned(prefixes),
        });
        self
    }

    /// Load a catalogue from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| QuantError::Catalogue(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| QuantError::Catalogue(e.to_string()))
    }

    /// Run every declaration against `registry`, stopping at the first failure
    pub fn apply(&self, registry: &UnitRegistry) -> Result<()> {
        for declaration in &self.declarations {
            match declaration {
                Declaration::Unit { measurement, name, symbol, prefixes, exponent } => {
                    registry.declare_unit(*measurement, name, symbol, &borrowed(prefixes), *exponent)?
                }
                Declaration::Derived { measurement, name, symbol, prefixes, exponent, target, scale } => {
                    registry.declare_derived_unit(
                        *measurement,
                        name,
                        symbol,
                        &borrowed(prefixes),
                        *exponent,
                        target,
                        *scale,
                    )?
                }
                Declaration::Alias { measurement, alias, target, prefixes } => {
                    registry.declare_alias(*measurement, alias, target, &borrowed(prefixes))?
                }
            }
        }
        Ok(())
    }

    /// The built-in laboratory catalogue
    pub fn standard() -> Self {
        let catalogue = Catalogue::new();
        let catalogue = volume_units(catalogue);
        let catalogue = concentration_units(catalogue);
        let catalogue = mass_units(catalogue);
        let catalogue = time_units(catalogue);
        let catalogue = physical_units(catalogue);
        flow_units(catalogue)
    }
}

fn volume_units(c: Catalogue) -> Catalogue {
    use MeasurementType::Volume;
    c.unit(Volume, "cubic metre", "m^3", &["d", "c", "m", "u"], 3)
        .derived(Volume, "litre", "l", &["d", "c", "m", "u", "n", "p"], 1, "m^3", 1e-3)
        .alias(Volume, "L", "l", &["d", "c", "m", "u", "n", "p"])
        .alias(Volume, "cc", "cm^3", &[])
}

fn concentration_units(c: Catalogue) -> Catalogue {
    use MeasurementType::Concentration;
    const MASS_PREFIXES: &[&str] = &["m", "u", "n", "p"];
    const MOLAR_PREFIXES: &[&str] = &["m", "u", "n", "p", "f"];

    // mass per volume
    c.unit(Concentration, "gram per litre", "g/l", MASS_PREFIXES, 1)
        .derived(Concentration, "gram per millilitre", "g/ml", MASS_PREFIXES, 1, "g/l", 1e3)
        .derived(Concentration, "gram per microlitre", "g/ul", MASS_PREFIXES, 1, "g/l", 1e6)
        .derived(Concentration, "percent weight per volume", "%w/v", &[], 1, "g/l", 10.0)
        .alias(Concentration, "g/L", "g/l", MASS_PREFIXES)
        .alias(Concentration, "g/mL", "g/ml", MASS_PREFIXES)
        .alias(Concentration, "g/uL", "g/ul", MASS_PREFIXES)
        // molar
        .unit(Concentration, "molar", "M", MOLAR_PREFIXES, 1)
        .alias(Concentration, "mol/l", "M", MOLAR_PREFIXES)
        .alias(Concentration, "mol/L", "M", MOLAR_PREFIXES)
        // relative and ratio
        .unit(Concentration, "times", "X", &[], 1)
        .unit(Concentration, "volume per volume", "v/v", &[], 1)
        .derived(Concentration, "percent volume per volume", "%v/v", &[], 1, "v/v", 0.01)
        // enzyme activity
        .unit(Concentration, "units per litre", "U/l", &[], 1)
        .derived(Concentration, "units per millilitre", "U/ml", &[], 1, "U/l", 1e3)
        .alias(Concentration, "U/L", "U/l", &[])
        .alias(Concentration, "U/mL", "U/ml", &[])
}

fn mass_units(c: Catalogue) -> Catalogue {
    use MeasurementType::{Mass, Moles};
    c.unit(Mass, "gram", "g", &["k", "m", "u", "n", "p", "f"], 1)
        .unit(Moles, "mole", "mol", &["m", "u", "n", "p", "f"], 1)
}

fn time_units(c: Catalogue) -> Catalogue {
    use MeasurementType::{Rate, Time};
    c.unit(Time, "second", "s", &["m", "u", "n"], 1)
        .derived(Time, "minute", "min", &[], 1, "s", 60.0)
        .derived(Time, "hour", "h", &[], 1, "s", 3600.0)
        .derived(Time, "day", "day", &[], 1, "s", 86400.0)
        .alias(Time, "sec", "s", &[])
        .alias(Time, "hr", "h", &[])
        .unit(Rate, "per second", "/s", &[], 1)
        .derived(Rate, "per minute", "/min", &[], 1, "/s", 1.0 / 60.0)
        .derived(Rate, "per hour", "/h", &[], 1, "/s", 1.0 / 3600.0)
        .alias(Rate, "Hz", "/s", &[])
}

fn physical_units(c: Catalogue) -> Catalogue {
    use MeasurementType::*;
    c.unit(Temperature, "degree Celsius", "C", &[], 1)
        .alias(Temperature, "\u{02DA}C", "C", &[])
        .alias(Temperature, "\u{00B0}C", "C", &[])
        .alias(Temperature, "\u{2103}", "C", &[])
        .unit(Length, "metre", "m", &["k", "c", "m", "u", "n"], 1)
        .unit(Area, "square metre", "m^2", &["c", "m", "u"], 2)
        .unit(Pressure, "pascal", "Pa", &["h", "k", "M"], 1)
        .derived(Pressure, "bar", "bar", &["m"], 1, "Pa", 1e5)
        .derived(Pressure, "atmosphere", "atm", &[], 1, "Pa", 101325.0)
        .derived(Pressure, "pound per square inch", "psi", &[], 1, "Pa", 6894.757293168)
        .unit(Force, "newton", "N", &["k", "m", "u"], 1)
        .unit(Energy, "joule", "J", &["k", "m"], 1)
        .derived(Energy, "calorie", "cal", &["k"], 1, "J", 4.184)
        .unit(Density, "kilogram per cubic metre", "kg/m^3", &[], 1)
        .derived(Density, "gram per cubic centimetre", "g/cm^3", &[], 1, "kg/m^3", 1e3)
        .unit(Velocity, "metre per second", "m/s", &["m", "u"], 1)
        .unit(AngularVelocity, "revolutions per minute", "rpm", &[], 1)
        .unit(Voltage, "volt", "V", &["k", "m", "u"], 1)
        .unit(Angle, "radian", "rad", &["m"], 1)
        .derived(Angle, "degree", "deg", &[], 1, "rad", std::f64::consts::PI / 180.0)
}

fn flow_units(c: Catalogue) -> Catalogue {
    use MeasurementType::FlowRate;
    c.unit(FlowRate, "litre per second", "l/s", &["m", "u", "n"], 1)
        .derived(FlowRate, "litre per minute", "l/min", &["m", "u", "n"], 1, "l/s", 1.0 / 60.0)
        .derived(FlowRate, "litre per hour", "l/h", &["m", "u"], 1, "l/s", 1.0 / 3600.0)
}
