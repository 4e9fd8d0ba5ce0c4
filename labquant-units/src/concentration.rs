//! Concentration conversions between mass/volume and molar forms
//!
//! Only concentrations reducing to `g/l` or `M` take part. Relative (`X`),
//! `v/v` and enzyme-activity units fail with `IncompatibleUnits`.
//!
//! These helpers expect the registry's catalogue to declare `g/l` and `M` as
//! base concentration units, `l` as a volume unit and `g` as a mass unit, as
//! [`Catalogue::standard`](crate::Catalogue::standard) does. Under a catalogue
//! with other base symbols every concentration fails with `IncompatibleUnits`,
//! and a missing `l` or `g` fails with `UnknownUnit`.

use labquant_core::{QuantError, Result};
use tracing::trace;

use crate::{Concentration, Mass, TypedQuantity, UnitRegistry, Volume};

/// Base symbol of mass/volume concentrations
pub const MASS_PER_VOLUME: &str = "g/l";
/// Base symbol of molar concentrations
pub const MOLAR: &str = "M";

/// Express a concentration in `g/l`, using `mw` (g/mol) for molar inputs
pub fn gram_per_l(registry: &UnitRegistry, concentration: &Concentration, mw: f64) -> Result<Concentration> {
    let Some(m) = concentration.measurement() else {
        return Ok(Concentration::Unset);
    };
    match m.unit().base_symbol() {
        MASS_PER_VOLUME => concentration.convert_to_symbol(registry, MASS_PER_VOLUME),
        MOLAR => {
            let grams = m.si_value() * mw;
            trace!(molar = m.si_value(), mw, grams, "molar to mass concentration");
            Concentration::new(registry, grams, MASS_PER_VOLUME)
        }
        other => Err(QuantError::incompatible(other, MASS_PER_VOLUME)),
    }
}

/// Express a concentration in `M`, using `mw` (g/mol) for mass/volume inputs
pub fn mol_per_l(registry: &UnitRegistry, concentration: &Concentration, mw: f64) -> Result<Concentration> {
    let Some(m) = concentration.measurement() else {
        return Ok(Concentration::Unset);
    };
    match m.unit().base_symbol() {
        MOLAR => concentration.convert_to_symbol(registry, MOLAR),
        MASS_PER_VOLUME => {
            if mw == 0.0 {
                return Err(QuantError::DivisionByZero);
            }
            let moles = m.si_value() / mw;
            trace!(grams = m.si_value(), mw, moles, "mass to molar concentration");
            Concentration::new(registry, moles, MOLAR)
        }
        other => Err(QuantError::incompatible(other, MOLAR)),
    }
}

/// Mass of solute held by `volume` of a solution at `concentration`, in grams
pub fn mass_in_volume(
    registry: &UnitRegistry,
    concentration: &Concentration,
    mw: f64,
    volume: &Volume,
) -> Result<Mass> {
    let per_litre = gram_per_l(registry, concentration, mw)?;
    let litres = volume.value_in(&registry.get_unit("l")?)?;
    Mass::new(registry, per_litre.value() * litres, "g")
}

/// Concentration after diluting by `factor` (2 halves it)
pub fn dilute(concentration: &Concentration, factor: f64) -> Result<Concentration> {
    concentration.div_scalar(factor)
}
