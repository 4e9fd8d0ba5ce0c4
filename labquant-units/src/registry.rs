//! Unit registry
//!
//! The registry is the only shared mutable state in labquant. It is built
//! once through declaration calls and then read concurrently; a single
//! mutex covers both the declarations and the lookups. A failed declaration
//! leaves the registry unchanged.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use labquant_core::{MeasurementType, QuantError, Result};
use tracing::{debug, warn};

use crate::{Catalogue, Measurement, SiPrefix, Unit};

#[derive(Debug, Default)]
struct TypeEntry {
    symbols: HashSet<String>,
    ordered: Vec<String>,
}

#[derive(Debug, Default)]
struct RegistryState {
    units: HashMap<String, Unit>,
    aliases: HashMap<String, String>,
    by_type: HashMap<MeasurementType, TypeEntry>,
}

impl RegistryState {
    fn is_taken(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol) || self.aliases.contains_key(symbol)
    }

    fn resolve(&self, symbol: &str) -> Option<&Unit> {
        if let Some(unit) = self.units.get(symbol) {
            return Some(unit);
        }
        self.aliases.get(symbol).and_then(|target| self.units.get(target))
    }

    fn record_symbol(&mut self, kind: MeasurementType, symbol: &str) {
        let entry = self.by_type.entry(kind).or_default();
        if entry.symbols.insert(symbol.to_string()) {
            entry.ordered.push(symbol.to_string());
        }
    }
}

/// Runtime catalogue of units, SI prefix expansions and aliases
#[derive(Debug, Default)]
pub struct UnitRegistry {
    state: Mutex<RegistryState>,
}

/// Trim and map the micro signs onto the ASCII `u`
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .replace(['\u{00B5}', '\u{03BC}'], "u")
}

fn resolve_prefixes(prefixes: &[&str]) -> Result<Vec<SiPrefix>> {
    prefixes
        .iter()
        .map(|p| SiPrefix::lookup(p).ok_or_else(|| QuantError::UnknownPrefix(p.to_string())))
        .collect()
}

impl UnitRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated with the built-in laboratory catalogue
    pub fn standard() -> Result<Self> {
        Self::from_catalogue(&Catalogue::standard())
    }

    /// A registry populated from a catalogue document
    pub fn from_catalogue(catalogue: &Catalogue) -> Result<Self> {
        let registry = Self::new();
        catalogue.apply(&registry)?;
        Ok(registry)
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========== Declarations ==========

    /// Declare a base unit plus one entry per prefix (prefix + symbol)
    pub fn declare_unit(
        &self,
        kind: MeasurementType,
        name: &str,
        symbol: &str,
        prefixes: &[&str],
        exponent: i32,
    ) -> Result<()> {
        let template = Unit::new(kind, name, symbol, symbol, SiPrefix::NONE, 1.0, exponent);
        self.declare_expanded(template, prefixes)
    }

    /// Declare a unit defined as `scale` times an existing unit of the same type
    #[allow(clippy::too_many_arguments)]
    pub fn declare_derived_unit(
        &self,
        kind: MeasurementType,
        name: &str,
        symbol: &str,
        prefixes: &[&str],
        exponent: i32,
        target_symbol: &str,
        scale: f64,
    ) -> Result<()> {
        let target = self.get_unit(target_symbol)?;
        if target.kind() != kind {
            return Err(QuantError::TypeMismatch {
                symbol: target.symbol().to_string(),
                expected: kind,
                found: target.kind(),
            });
        }
        let template = Unit::new(
            kind,
            name,
            symbol,
            target.base_symbol(),
            SiPrefix::NONE,
            scale * target.si_factor(),
            exponent,
        );
        self.declare_expanded(template, prefixes)
    }

    fn declare_expanded(&self, template: Unit, prefixes: &[&str]) -> Result<()> {
        let prefixes = resolve_prefixes(prefixes)?;
        let mut batch = vec![template.clone()];
        batch.extend(prefixes.into_iter().map(|p| template.with_prefix(p)));

        let mut state = self.state();
        let mut seen = HashSet::new();
        for unit in &batch {
            if state.is_taken(unit.symbol()) || !seen.insert(unit.symbol()) {
                debug!(symbol = unit.symbol(), "rejected duplicate unit declaration");
                return Err(QuantError::DuplicateUnit(unit.symbol().to_string()));
            }
        }

        for unit in batch {
            debug!(
                kind = %unit.kind(),
                symbol = unit.symbol(),
                base = unit.base_symbol(),
                factor = unit.si_factor(),
                "declared unit"
            );
            state.record_symbol(unit.kind(), unit.symbol());
            state.units.insert(unit.symbol().to_string(), unit);
        }
        Ok(())
    }

    /// Declare `alias` (and its prefixed variants) as another spelling of `target`
    pub fn declare_alias(
        &self,
        kind: MeasurementType,
        alias: &str,
        target_symbol: &str,
        prefixes: &[&str],
    ) -> Result<()> {
        let prefixes = resolve_prefixes(prefixes)?;
        let mut state = self.state();

        let mut pairs = vec![(alias.to_string(), target_symbol.to_string())];
        pairs.extend(prefixes.iter().map(|p| {
            (format!("{}{}", p.symbol, alias), format!("{}{}", p.symbol, target_symbol))
        }));

        let mut resolved = Vec::with_capacity(pairs.len());
        let mut seen = HashSet::new();
        for (alias, target) in pairs {
            if state.units.contains_key(&alias) {
                return Err(QuantError::AliasShadowsUnit(alias));
            }
            if state.aliases.contains_key(&alias) || !seen.insert(alias.clone()) {
                return Err(QuantError::DuplicateUnit(alias));
            }
            let unit = state
                .resolve(&target)
                .ok_or_else(|| QuantError::UnknownUnit(target.clone()))?;
            if unit.kind() != kind {
                return Err(QuantError::TypeMismatch {
                    symbol: target,
                    expected: kind,
                    found: unit.kind(),
                });
            }
            resolved.push((alias, unit.symbol().to_string()));
        }

        for (alias, canonical) in resolved {
            debug!(kind = %kind, alias = alias.as_str(), target = canonical.as_str(), "declared alias");
            state.record_symbol(kind, &alias);
            state.aliases.insert(alias, canonical);
        }
        Ok(())
    }

    // ========== Lookups ==========

    /// Resolve a symbol (or alias) to a copy of its unit
    pub fn get_unit(&self, symbol: &str) -> Result<Unit> {
        let symbol = normalize_symbol(symbol);
        let state = self.state();
        match state.resolve(&symbol) {
            Some(unit) => Ok(unit.clone()),
            None => {
                debug!(symbol = symbol.as_str(), "unknown unit");
                Err(QuantError::UnknownUnit(symbol))
            }
        }
    }

    /// The canonical symbol behind a possible alias
    pub fn resolve_alias(&self, symbol: &str) -> String {
        let symbol = normalize_symbol(symbol);
        let state = self.state();
        state.aliases.get(&symbol).cloned().unwrap_or(symbol)
    }

    /// Check whether a symbol or alias is declared
    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        self.state().is_taken(&symbol)
    }

    /// The measurement type a symbol belongs to
    pub fn measurement_type_of(&self, symbol: &str) -> Result<MeasurementType> {
        self.get_unit(symbol).map(|u| u.kind())
    }

    /// Check whether `symbol` (or an alias of it) is declared for `kind`
    pub fn valid_unit_for_type(&self, kind: MeasurementType, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        let state = self.state();
        state
            .by_type
            .get(&kind)
            .map(|e| e.symbols.contains(&symbol))
            .unwrap_or(false)
    }

    /// All symbols and aliases declared for `kind`, in declaration order
    pub fn list_valid_units_for_type(&self, kind: MeasurementType) -> Vec<String> {
        let state = self.state();
        state
            .by_type
            .get(&kind)
            .map(|e| e.ordered.clone())
            .unwrap_or_default()
    }

    /// Resolve `symbol` and require it to measure `kind`
    pub fn unit_for_type(&self, kind: MeasurementType, symbol: &str) -> Result<Unit> {
        let unit = self.get_unit(symbol)?;
        if unit.kind() != kind {
            warn!(symbol = unit.symbol(), expected = %kind, found = %unit.kind(), "unit has wrong type");
            return Err(QuantError::TypeMismatch {
                symbol: unit.symbol().to_string(),
                expected: kind,
                found: unit.kind(),
            });
        }
        Ok(unit)
    }

    /// Convert a measurement into the unit named by `symbol`
    pub fn convert(&self, measurement: &Measurement, symbol: &str) -> Result<Measurement> {
        let target = self.get_unit(symbol)?;
        measurement.convert_to(&target)
    }

    /// Measurement types that have at least one declared unit
    pub fn declared_types(&self) -> Vec<MeasurementType> {
        let state = self.state();
        MeasurementType::ALL
            .iter()
            .copied()
            .filter(|k| state.by_type.contains_key(k))
            .collect()
    }
}
