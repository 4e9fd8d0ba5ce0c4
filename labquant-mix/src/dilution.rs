//! Dilution equivalence between two compositions
//!
//! A target composition is a dilution of a source when a single scalar
//! factor relates every constituent: `source_i / target_i == factor`.

use labquant_core::{QuantError, Result};
use labquant_units::TypedQuantity;
use tracing::{debug, trace};

use crate::ComponentList;

/// Outcome of [`dilutable_component_lists`]
#[derive(Debug, Clone, PartialEq)]
pub struct DilutionCheck {
    pub dilutable: bool,
    /// The dilution factor, `-1` when not dilutable
    pub factor: f64,
    /// Distinct factors found when they conflict
    pub factors: Vec<f64>,
    pub diagnostic: Option<String>,
}

impl DilutionCheck {
    fn dilutable(factor: f64) -> Self {
        DilutionCheck { dilutable: true, factor, factors: vec![factor], diagnostic: None }
    }

    fn rejected(factors: Vec<f64>, diagnostic: String) -> Self {
        DilutionCheck { dilutable: false, factor: -1.0, factors, diagnostic: Some(diagnostic) }
    }

    /// The factor, or `NotDilutable` / `Mismatch` describing the failure
    pub fn into_result(self) -> Result<f64> {
        if self.dilutable {
            return Ok(self.factor);
        }
        if self.factors.len() > 1 {
            return Err(QuantError::NotDilutable { factors: self.factors });
        }
        Err(QuantError::Mismatch(self.diagnostic.unwrap_or_else(|| "not a dilution".to_string())))
    }
}

/// Decide whether `target` is `source` diluted by one factor.
///
/// Factors are collected in constituent-name order. A `0/0` pair and an
/// infinite ratio contribute no constraint. The remaining factors are
/// clustered against kept representatives: a factor within `tolerance` of a
/// representative joins the first such one, otherwise it becomes a new
/// representative. Exactly one cluster means dilutable by that cluster's
/// first factor.
pub fn dilutable_component_lists(
    source: &ComponentList,
    target: &ComponentList,
    tolerance: f64,
) -> Result<DilutionCheck> {
    let source_count = source.non_zero_count();
    let target_count = target.non_zero_count();
    if source_count == 0 && target_count == 0 {
        return Ok(DilutionCheck::dilutable(1.0));
    }
    if source_count != target_count {
        let diagnostic = format!(
            "source has {} non-zero components, target has {}",
            source_count, target_count
        );
        debug!(%diagnostic, "not dilutable");
        return Ok(DilutionCheck::rejected(Vec::new(), diagnostic));
    }

    let mut factors = Vec::with_capacity(source.len());
    for (name, src) in source.iter() {
        let src_si = src.si_value();
        let Some(tgt) = target.get(name) else {
            if src_si == 0.0 {
                continue;
            }
            let diagnostic = format!("{} is missing from the target", name);
            debug!(%diagnostic, "not dilutable");
            return Ok(DilutionCheck::rejected(Vec::new(), diagnostic));
        };
        if let (Some(s), Some(t)) = (src.measurement(), tgt.measurement()) {
            if !s.is_compatible(t) {
                return Err(QuantError::incompatible(s.unit().base_symbol(), t.unit().base_symbol()).for_item(name));
            }
        }
        let ratio = src_si / tgt.si_value();
        let factor = if ratio.is_finite() { ratio } else { 0.0 };
        trace!(constituent = name, factor, "dilution factor");
        factors.push(factor);
    }

    if let Some((name, _)) = target
        .iter()
        .find(|(name, c)| c.si_value() != 0.0 && !source.contains(name))
    {
        let diagnostic = format!("{} is missing from the source", name);
        debug!(%diagnostic, "not dilutable");
        return Ok(DilutionCheck::rejected(Vec::new(), diagnostic));
    }

    let clusters = cluster_factors(&factors, tolerance);
    match clusters.as_slice() {
        [] => Ok(DilutionCheck::dilutable(0.0)),
        [factor] => {
            debug!(factor, "dilutable");
            Ok(DilutionCheck::dilutable(*factor))
        }
        _ => {
            let listed: Vec<String> = clusters.iter().map(|f| f.to_string()).collect();
            let diagnostic = format!("conflicting dilution factors: {}", listed.join(", "));
            debug!(%diagnostic, "not dilutable");
            Ok(DilutionCheck::rejected(clusters, diagnostic))
        }
    }
}

/// Representatives of the non-zero factors, in first-seen order
fn cluster_factors(factors: &[f64], tolerance: f64) -> Vec<f64> {
    let mut representatives: Vec<f64> = Vec::new();
    for &factor in factors.iter().filter(|f| **f != 0.0) {
        if !representatives.iter().any(|r| (factor - r).abs() <= tolerance) {
            representatives.push(factor);
        }
    }
    representatives
}

#[cfg(test)]
mod tests {
    use super::*;
    use labquant_units::{Concentration, UnitRegistry};
    use proptest::prelude::*;

    const TOLERANCE: f64 = 0.025;

    fn reg() -> UnitRegistry {
        UnitRegistry::standard().unwrap()
    }

    fn list(reg: &UnitRegistry, components: &[(&str, f64, &str)]) -> ComponentList {
        components
            .iter()
            .map(|(name, value, unit)| (name.to_string(), Concentration::must(reg, *value, unit)))
            .collect()
    }

    #[test]
    fn test_trivial_lists() {
        let reg = reg();
        let empty = ComponentList::new();
        let zeros = list(&reg, &[("a", 0.0, "mM")]);
        let check = dilutable_component_lists(&empty, &zeros, TOLERANCE).unwrap();
        assert!(check.dilutable);
        assert_eq!(check.factor, 1.0);
    }

    #[test]
    fn test_simple_dilution() {
        let reg = reg();
        let source = list(&reg, &[("tris", 100.0, "mM"), ("edta", 10.0, "mM")]);
        let target = list(&reg, &[("tris", 10.0, "mM"), ("edta", 1.0, "mM")]);
        let check = dilutable_component_lists(&source, &target, TOLERANCE).unwrap();
        assert!(check.dilutable);
        assert!((check.factor - 10.0).abs() < 1e-9);
        assert_eq!(check.into_result().unwrap(), check_factor(&source, &target));
    }

    fn check_factor(source: &ComponentList, target: &ComponentList) -> f64 {
        dilutable_component_lists(source, target, TOLERANCE).unwrap().factor
    }

    #[test]
    fn test_dilution_across_units() {
        let reg = reg();
        let source = list(&reg, &[("dna", 1.0, "g/l")]);
        let target = list(&reg, &[("dna", 500.0, "mg/l")]);
        assert!((check_factor(&source, &target) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_count_mismatch() {
        let reg = reg();
        let source = list(&reg, &[("tris", 100.0, "mM"), ("edta", 10.0, "mM")]);
        let target = list(&reg, &[("tris", 10.0, "mM")]);
        let check = dilutable_component_lists(&source, &target, TOLERANCE).unwrap();
        assert!(!check.dilutable);
        assert_eq!(check.factor, -1.0);
        assert!(check.diagnostic.as_deref().unwrap().contains("non-zero components"));
        assert!(matches!(check.into_result().unwrap_err(), QuantError::Mismatch(_)));
    }

    #[test]
    fn test_conflicting_factors() {
        let reg = reg();
        let source = list(&reg, &[("a", 1.0, "mM"), ("b", 1.0, "mM")]);
        let target = list(&reg, &[("a", 0.5, "mM"), ("b", 0.25, "mM")]);
        let check = dilutable_component_lists(&source, &target, TOLERANCE).unwrap();
        assert!(!check.dilutable);
        assert_eq!(check.factors, vec![2.0, 4.0]);
        assert_eq!(
            check.into_result().unwrap_err().to_string(),
            "not a dilution: conflicting factors [2, 4]"
        );
    }

    #[test]
    fn test_factors_within_tolerance_cluster() {
        let reg = reg();
        let source = list(&reg, &[("a", 2.0, "mM"), ("b", 2.02, "mM")]);
        let target = list(&reg, &[("a", 1.0, "mM"), ("b", 1.0, "mM")]);
        let check = dilutable_component_lists(&source, &target, TOLERANCE).unwrap();
        assert!(check.dilutable);
        assert_eq!(check.factor, 2.0);
    }

    #[test]
    fn test_zero_pairs_are_unconstrained() {
        let reg = reg();
        let source = list(&reg, &[("a", 4.0, "X"), ("b", 0.0, "mM")]);
        let target = list(&reg, &[("a", 2.0, "X"), ("b", 0.0, "mM")]);
        assert_eq!(check_factor(&source, &target), 2.0);
    }

    #[test]
    fn test_missing_constituents() {
        let reg = reg();
        let source = list(&reg, &[("a", 4.0, "X"), ("b", 1.0, "mM")]);
        let target = list(&reg, &[("a", 2.0, "X"), ("c", 1.0, "mM")]);
        let check = dilutable_component_lists(&source, &target, TOLERANCE).unwrap();
        assert!(!check.dilutable);
        assert_eq!(check.diagnostic.as_deref(), Some("b is missing from the target"));

        // zero-valued source constituents may be absent
        let source = list(&reg, &[("a", 4.0, "X"), ("b", 0.0, "mM")]);
        let target = list(&reg, &[("a", 2.0, "X")]);
        assert_eq!(check_factor(&source, &target), 2.0);

        // a zero target value leaves "b" unconstrained, "c" has no source
        let source = list(&reg, &[("a", 4.0, "X"), ("b", 1.0, "mM")]);
        let target = list(&reg, &[("a", 2.0, "X"), ("b", 0.0, "mM"), ("c", 1.0, "mM")]);
        let check = dilutable_component_lists(&source, &target, TOLERANCE).unwrap();
        assert_eq!(check.diagnostic.as_deref(), Some("c is missing from the source"));
    }

    #[test]
    fn test_incompatible_units() {
        let reg = reg();
        let source = list(&reg, &[("a", 1.0, "X")]);
        let target = list(&reg, &[("a", 1.0, "mM")]);
        let err = dilutable_component_lists(&source, &target, TOLERANCE).unwrap_err();
        assert_eq!(err, QuantError::incompatible("X", "M").for_item("a"));
    }

    #[test]
    fn test_cluster_anchor_is_first_factor() {
        assert_eq!(cluster_factors(&[0.0, 1.0, 1.02, 1.04, 0.0], 0.025), vec![1.0, 1.04]);
        assert_eq!(cluster_factors(&[0.0, 0.0], 0.025), Vec::<f64>::new());
    }

    fn arbitrary_list() -> impl Strategy<Value = Vec<(String, f64)>> {
        proptest::collection::btree_map("[a-z]{1,6}", 1e-3f64..1e3, 1..6)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn dilution_is_reflexive(entries in arbitrary_list()) {
            let reg = reg();
            let l: ComponentList = entries
                .iter()
                .map(|(n, v)| (n.clone(), Concentration::must(&reg, *v, "mM")))
                .collect();
            let check = dilutable_component_lists(&l, &l, TOLERANCE).unwrap();
            prop_assert!(check.dilutable);
            prop_assert_eq!(check.factor, 1.0);
        }

        #[test]
        fn scaled_list_dilutes_by_its_factor(entries in arbitrary_list(), k in 0.01f64..100.0) {
            let reg = reg();
            let l: ComponentList = entries
                .iter()
                .map(|(n, v)| (n.clone(), Concentration::must(&reg, *v, "ng/ul")))
                .collect();
            let check = dilutable_component_lists(&l.scaled(k), &l, TOLERANCE).unwrap();
            prop_assert!(check.dilutable);
            prop_assert!((check.factor - k).abs() <= TOLERANCE);
        }
    }
}
