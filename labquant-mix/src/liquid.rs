//! Liquid identity: name, concentration and composition checks

use labquant_core::{QuantError, Result, Tolerances};
use labquant_units::{parse_concentration, Concentration, TypedQuantity, UnitRegistry};
use tracing::debug;

use crate::{dilutable_component_lists, ComponentList};

/// The parts of a liquid the equality checks look at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Liquid {
    pub name: String,
    pub concentration: Concentration,
    pub components: Option<ComponentList>,
}

impl Liquid {
    pub fn new(name: impl Into<String>) -> Self {
        Liquid {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_concentration(mut self, concentration: Concentration) -> Self {
        self.concentration = concentration;
        self
    }

    pub fn with_components(mut self, components: ComponentList) -> Self {
        self.components = Some(components);
        self
    }

    /// True when a composition with at least one non-zero constituent is attached
    pub fn has_components(&self) -> bool {
        self.components.as_ref().is_some_and(|c| !c.is_trivial())
    }

    fn components_or_empty(&self) -> ComponentList {
        self.components.clone().unwrap_or_default()
    }
}

/// Canonical form of a liquid name.
///
/// An embedded concentration is re-rendered in its base unit in front of the
/// residual name, so `"10mM Tris"` and `"Tris 0.01 M"` normalize alike.
pub fn normalize_name(registry: &UnitRegistry, name: &str) -> Result<String> {
    let parsed = parse_concentration(registry, name)?;
    let Some(m) = parsed.concentration.as_ref().and_then(|c| c.measurement()) else {
        return Ok(parsed.name.trim().to_string());
    };
    let (value, base) = m.in_base_unit();
    Ok(format!("{:.9e} {} {}", value, base, parsed.name.trim()).trim().to_string())
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Check that two liquids denote the same substance.
///
/// Names are compared after [`normalize_name`], ignoring case. Liquids
/// without a composition then compare concentrations, accepting
/// `|a / b - 1| <= tolerances.equality`; against a zero target only a
/// source within `tolerances.absolute` of zero matches. When either side carries a
/// composition, the compositions must be dilutions of each other within
/// the same tolerance. Fails with `Mismatch` describing the difference.
pub fn equal(registry: &UnitRegistry, a: &Liquid, b: &Liquid, tolerances: &Tolerances) -> Result<()> {
    let name_a = normalize_name(registry, &a.name)?;
    let name_b = normalize_name(registry, &b.name)?;
    if !same_name(&name_a, &name_b) {
        return Err(QuantError::Mismatch(format!(
            "names differ: \"{}\" vs \"{}\"",
            name_a, name_b
        )));
    }

    if !a.has_components() && !b.has_components() {
        let (source, target) = a.concentration.pair(&b.concentration)?;
        let matches = if target == 0.0 {
            source.abs() <= tolerances.absolute
        } else {
            (source / target - 1.0).abs() <= tolerances.equality
        };
        if !matches {
            return Err(QuantError::Mismatch(format!(
                "{}: concentrations differ: {} vs {}",
                a.name, a.concentration, b.concentration
            )));
        }
        return Ok(());
    }

    let check = dilutable_component_lists(
        &a.components_or_empty(),
        &b.components_or_empty(),
        tolerances.equality,
    )?;
    if !check.dilutable {
        let diagnostic = check.diagnostic.unwrap_or_default();
        return Err(QuantError::Mismatch(format!("{}: compositions differ: {}", a.name, diagnostic)));
    }
    debug!(name = %a.name, factor = check.factor, "liquids equal up to dilution");
    Ok(())
}

/// Looser identity check for liquids whose concentration lives only in the
/// name text.
///
/// Embedded concentration values are ignored; the residual names decide.
/// With `look_for_sub_components` set and a composition on both sides, the
/// compositions decide instead.
pub fn equivalent(
    registry: &UnitRegistry,
    source: &Liquid,
    target: &Liquid,
    look_for_sub_components: bool,
    tolerances: &Tolerances,
) -> Result<bool> {
    if look_for_sub_components && source.has_components() && target.has_components() {
        let check = dilutable_component_lists(
            &source.components_or_empty(),
            &target.components_or_empty(),
            tolerances.dilution,
        )?;
        return Ok(check.dilutable);
    }

    let source_name = parse_concentration(registry, &source.name)?.name;
    let target_name = parse_concentration(registry, &target.name)?.name;
    Ok(same_name(&source_name, &target_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> UnitRegistry {
        UnitRegistry::standard().unwrap()
    }

    fn buffer(reg: &UnitRegistry, tris_mm: f64, edta_mm: f64) -> ComponentList {
        ComponentList::new()
            .with("tris", Concentration::must(reg, tris_mm, "mM"))
            .with("edta", Concentration::must(reg, edta_mm, "mM"))
    }

    #[test]
    fn test_normalize_name() {
        let reg = reg();
        assert_eq!(normalize_name(&reg, "  Water ").unwrap(), "Water");
        assert_eq!(
            normalize_name(&reg, "10mM Tris").unwrap(),
            normalize_name(&reg, "Tris 0.01 M").unwrap()
        );
        assert_eq!(normalize_name(&reg, "5g/L Glucose").unwrap(), "5.000000000e0 g/l Glucose");
    }

    #[test]
    fn test_equal_names_ignore_case() {
        let reg = reg();
        let t = Tolerances::default();
        assert!(equal(&reg, &Liquid::new("Water"), &Liquid::new("water "), &t).is_ok());
        let err = equal(&reg, &Liquid::new("Water"), &Liquid::new("Ethanol"), &t).unwrap_err();
        assert!(matches!(err, QuantError::Mismatch(_)));
    }

    #[test]
    fn test_equal_concentrations_within_one_percent() {
        let reg = reg();
        let t = Tolerances::default();
        let a = Liquid::new("glucose").with_concentration(Concentration::must(&reg, 100.0, "mg/ml"));
        let b = Liquid::new("glucose").with_concentration(Concentration::must(&reg, 100.5, "g/l"));
        assert!(equal(&reg, &a, &b, &t).is_ok());

        let c = Liquid::new("glucose").with_concentration(Concentration::must(&reg, 102.0, "g/l"));
        let err = equal(&reg, &a, &c, &t).unwrap_err();
        assert!(err.to_string().contains("concentrations differ"));
    }

    #[test]
    fn test_equal_zero_target() {
        let reg = reg();
        let t = Tolerances::default();
        let unset = Liquid::new("water");
        let zero = Liquid::new("water").with_concentration(Concentration::must(&reg, 0.0, "X"));
        let one = Liquid::new("water").with_concentration(Concentration::must(&reg, 1.0, "X"));
        assert!(equal(&reg, &unset, &unset, &t).is_ok());
        assert!(equal(&reg, &zero, &unset, &t).is_ok());
        assert!(equal(&reg, &one, &zero, &t).is_err());
    }

    #[test]
    fn test_equal_zero_target_uses_absolute_tolerance() {
        let reg = reg();
        let trace = Liquid::new("water").with_concentration(Concentration::must(&reg, 1e-3, "X"));
        let zero = Liquid::new("water").with_concentration(Concentration::must(&reg, 0.0, "X"));
        assert!(equal(&reg, &trace, &zero, &Tolerances::default()).is_err());
        let loose = Tolerances::default().with_absolute(0.01);
        assert!(equal(&reg, &trace, &zero, &loose).is_ok());
    }

    #[test]
    fn test_equal_micro_sign_names() {
        let reg = reg();
        let t = Tolerances::default();
        assert!(equal(&reg, &Liquid::new("10\u{00B5}M ATP"), &Liquid::new("10uM ATP"), &t).is_ok());
        assert!(equal(&reg, &Liquid::new("ATP 10 \u{03BC}M"), &Liquid::new("10 uM ATP"), &t).is_ok());
        assert!(equivalent(&reg, &Liquid::new("1\u{00B5}M ATP"), &Liquid::new("ATP"), false, &t).unwrap());
    }

    #[test]
    fn test_equal_incompatible_concentrations() {
        let reg = reg();
        let t = Tolerances::default();
        let a = Liquid::new("dye").with_concentration(Concentration::must(&reg, 1.0, "X"));
        let b = Liquid::new("dye").with_concentration(Concentration::must(&reg, 1.0, "mM"));
        assert!(matches!(
            equal(&reg, &a, &b, &t).unwrap_err(),
            QuantError::IncompatibleUnits { .. }
        ));
    }

    #[test]
    fn test_equal_with_components() {
        let reg = reg();
        let t = Tolerances::default();
        let stock = Liquid::new("TE").with_components(buffer(&reg, 100.0, 10.0));
        let diluted = Liquid::new("TE").with_components(buffer(&reg, 10.0, 1.0));
        assert!(equal(&reg, &stock, &diluted, &t).is_ok());

        let off = Liquid::new("TE").with_components(buffer(&reg, 10.0, 2.0));
        let err = equal(&reg, &stock, &off, &t).unwrap_err();
        assert!(err.to_string().starts_with("TE: compositions differ"));

        // one side without a composition cannot match one with
        assert!(equal(&reg, &stock, &Liquid::new("TE"), &t).is_err());
    }

    #[test]
    fn test_equivalent_ignores_embedded_values() {
        let reg = reg();
        let t = Tolerances::default();
        let a = Liquid::new("10X PBS");
        let b = Liquid::new("PBS 1X");
        assert!(equivalent(&reg, &a, &b, false, &t).unwrap());
        assert!(!equivalent(&reg, &a, &Liquid::new("TBS"), false, &t).unwrap());
    }

    #[test]
    fn test_equivalent_uses_components_when_asked() {
        let reg = reg();
        let t = Tolerances::default();
        let a = Liquid::new("TE 1X").with_components(buffer(&reg, 10.0, 1.0));
        let b = Liquid::new("TE 10X").with_components(buffer(&reg, 100.0, 5.0));

        assert!(equivalent(&reg, &a, &b, false, &t).unwrap());
        assert!(!equivalent(&reg, &a, &b, true, &t).unwrap());

        let c = Liquid::new("something else").with_components(buffer(&reg, 100.0, 10.0));
        assert!(equivalent(&reg, &a, &c, true, &t).unwrap());
    }
}
