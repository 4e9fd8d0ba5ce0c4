//! Volume-weighted mixing of two compositions

use std::collections::BTreeSet;

use labquant_core::{QuantError, Result};
use labquant_units::{Concentration, Measurement, TypedQuantity};
use tracing::{debug, trace};

use crate::{ComponentList, ComponentListSample};

/// Combine two samples: each constituent ends at
/// `(c_a * v_a + c_b * v_b) / (v_a + v_b)`.
///
/// Constituents missing from one side count as zero there. The result is
/// expressed in the unit of the side that carries the constituent (the
/// first sample's when both do). Fails with `IncompatibleUnits` naming the
/// constituent when the two sides cannot be converted into each other, and
/// with `DivisionByZero` when the combined volume is zero.
pub fn mix_component_lists(a: &ComponentListSample, b: &ComponentListSample) -> Result<ComponentList> {
    let volume_a = a.volume.si_value();
    let volume_b = b.volume.si_value();
    let total = volume_a + volume_b;
    if total == 0.0 {
        return Err(QuantError::DivisionByZero);
    }

    let names: BTreeSet<&str> = a.components.names().into_iter().chain(b.components.names()).collect();

    let mut mixed = ComponentList::new();
    for name in names {
        let left = a.components.get(name).and_then(|c| c.measurement());
        let right = b.components.get(name).and_then(|c| c.measurement());
        let concentration = match (left, right) {
            (None, None) => Concentration::Unset,
            (Some(l), Some(r)) if !l.is_compatible(r) => {
                return Err(QuantError::incompatible(l.unit().base_symbol(), r.unit().base_symbol()).for_item(name));
            }
            (Some(m), _) | (None, Some(m)) => {
                let si_a = left.map(Measurement::si_value).unwrap_or(0.0);
                let si_b = right.map(Measurement::si_value).unwrap_or(0.0);
                let si = (si_a * volume_a + si_b * volume_b) / total;
                let unit = m.unit().clone();
                trace!(constituent = name, si_a, si_b, si, "mixed constituent");
                Concentration::from_measurement(Measurement::new(unit.from_si(si), unit))?
            }
        };
        mixed.add(name, concentration);
    }

    debug!(constituents = mixed.len(), "mixed component lists");
    Ok(mixed)
}

/// Mix two samples and carry the combined volume forward, so the result can
/// feed the next mix in a series
pub fn mix_samples(a: &ComponentListSample, b: &ComponentListSample) -> Result<ComponentListSample> {
    let components = mix_component_lists(a, b)?;
    let volume = a.volume.plus(&b.volume)?;
    Ok(ComponentListSample::new(components, volume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labquant_units::{UnitRegistry, Volume};
    use proptest::prelude::*;

    fn reg() -> UnitRegistry {
        UnitRegistry::standard().unwrap()
    }

    fn sample(reg: &UnitRegistry, volume_ul: f64, components: &[(&str, f64, &str)]) -> ComponentListSample {
        let list = components
            .iter()
            .map(|(name, value, unit)| (name.to_string(), Concentration::must(reg, *value, unit)))
            .collect();
        ComponentListSample::new(list, Volume::must(reg, volume_ul, "ul"))
    }

    #[test]
    fn test_mix_water_and_dna() {
        let reg = reg();
        let a = sample(&reg, 1.0, &[("water", 1.0, "g/L")]);
        let b = sample(&reg, 1.0, &[("dna", 1.0, "g/L"), ("dna2", 2.0, "X")]);

        let mixed = mix_component_lists(&a, &b).unwrap();
        let expected = ComponentList::new()
            .with("water", Concentration::must(&reg, 0.5, "g/L"))
            .with("dna", Concentration::must(&reg, 0.5, "g/L"))
            .with("dna2", Concentration::must(&reg, 1.0, "X"));
        assert_eq!(mixed, expected);
    }

    #[test]
    fn test_mix_keeps_first_side_unit() {
        let reg = reg();
        let a = sample(&reg, 3.0, &[("dna", 1.0, "ng/ul")]);
        let b = sample(&reg, 1.0, &[("dna", 5.0, "mg/l")]);
        let mixed = mix_component_lists(&a, &b).unwrap();
        let dna = mixed.get("dna").unwrap();
        assert_eq!(dna.symbol(), Some("ng/ul"));
        // 1 ng/ul == 1 mg/l: (3 * 1 + 1 * 5) / 4 = 2
        assert!((dna.value() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mix_incompatible_names_constituent() {
        let reg = reg();
        let a = sample(&reg, 1.0, &[("dna", 1.0, "g/l")]);
        let b = sample(&reg, 1.0, &[("dna", 1.0, "mM")]);
        let err = mix_component_lists(&a, &b).unwrap_err();
        assert_eq!(err.to_string(), "incompatible units: g/l and M (for dna)");
    }

    #[test]
    fn test_mix_zero_volume() {
        let reg = reg();
        let a = sample(&reg, 0.0, &[("dna", 1.0, "g/l")]);
        let b = sample(&reg, 0.0, &[]);
        assert_eq!(mix_component_lists(&a, &b).unwrap_err(), QuantError::DivisionByZero);
    }

    #[test]
    fn test_serial_mix_carries_volume() {
        let reg = reg();
        let buffer = sample(&reg, 10.0, &[("tris", 100.0, "mM")]);
        let water = sample(&reg, 10.0, &[]);

        let first = mix_samples(&buffer, &water).unwrap();
        assert_eq!(first.volume, Volume::must(&reg, 20.0, "ul"));
        let second = mix_samples(&first, &sample(&reg, 20.0, &[])).unwrap();
        assert_eq!(second.volume, Volume::must(&reg, 40.0, "ul"));

        let tris = second.components.get("tris").unwrap();
        assert!((tris.value() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_mix_unset_on_both_sides() {
        let reg = reg();
        let mut a = sample(&reg, 1.0, &[]);
        a.components.add("mystery", Concentration::Unset);
        let b = sample(&reg, 1.0, &[]);
        let mixed = mix_component_lists(&a, &b).unwrap();
        assert!(mixed.get("mystery").unwrap().is_unset());
    }

    proptest! {
        #[test]
        fn mixing_is_commutative(
            ca in 0.0f64..1e3,
            cb in 0.0f64..1e3,
            cc in 0.0f64..10.0,
            va in 0.1f64..1e3,
            vb in 0.1f64..1e3,
        ) {
            let reg = reg();
            let a = sample(&reg, va, &[("dna", ca, "ng/ul"), ("buffer", cc, "X")]);
            let b = sample(&reg, vb, &[("dna", cb, "ng/ul"), ("salt", 5.0, "mM")]);
            let ab = mix_component_lists(&a, &b).unwrap();
            let ba = mix_component_lists(&b, &a).unwrap();
            prop_assert!(ab.approx_eq_relative(&ba, 1e-12).unwrap());
            prop_assert_eq!(ab.names(), ba.names());
        }
    }
}
