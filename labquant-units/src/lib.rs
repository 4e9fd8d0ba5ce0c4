//! labquant Units - Unit registry and typed laboratory quantities
//!
//! Provides unit-safe measurements backed by a runtime-declared registry.
//! Units are declared with SI prefix expansion, as derived units scaled
//! from an existing unit, or as aliases of a canonical symbol.
//!
//! Measurement types:
//! - Volume (l, ml, ul, m^3, mm^3, ...)
//! - Concentration (g/l, mg/ml, M, mM, X, v/v, %w/v, U/ml, ...)
//! - Mass, Moles
//! - Temperature (C)
//! - Time, Rate, FlowRate
//! - Length, Area, Velocity
//! - Pressure, Force, Energy, Density
//! - AngularVelocity, Voltage, Angle
//!
//! The registry is constructed explicitly and passed by reference:
//!
//! ```
//! use labquant_units::prelude::*;
//!
//! let registry = UnitRegistry::standard().unwrap();
//! let v = Volume::must(&registry, 1.0, "mm^3");
//! let ul = v.convert_to_symbol(&registry, "ul").unwrap();
//! assert!((ul.value() - 1.0).abs() < 1e-9);
//! ```

mod catalogue;
pub mod codec;
mod concentration;
mod measurement;
mod parse;
mod prefix;
mod quantity;
mod registry;
mod unit;
mod volume;

pub use catalogue::{Catalogue, Declaration};
pub use codec::QuantitySeed;
pub use concentration::{dilute, gram_per_l, mass_in_volume, mol_per_l, MASS_PER_VOLUME, MOLAR};
pub use measurement::Measurement;
pub use parse::{parse_concentration, parse_quantity, split_value_and_unit, ParsedLabel};
pub use prefix::{SiPrefix, PREFIXES};
pub use quantity::{
    Angle, AngularVelocity, Area, Concentration, Density, Energy, FlowRate, Force, Length, Mass, Moles,
    Pressure, Rate, Temperature, Time, TypedQuantity, Velocity, Voltage, Volume,
};
pub use registry::{normalize_symbol, UnitRegistry};
pub use unit::Unit;
pub use volume::{divide_volume, sum_volumes, volume_for_target_concentration};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Concentration, Mass, Measurement, Temperature, Time, TypedQuantity, Unit, UnitRegistry, Volume,
    };
    pub use labquant_core::{MeasurementType, QuantError, Result};
}
