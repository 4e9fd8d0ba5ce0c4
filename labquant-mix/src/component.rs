//! Liquid composition: named constituents at a concentration

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use labquant_core::{QuantError, Result};
use labquant_units::{Concentration, QuantitySeed, TypedQuantity, UnitRegistry, Volume};

/// Constituent name -> concentration, iterated in name order
#[derive(Debug, Clone, Default)]
pub struct ComponentList {
    components: BTreeMap<String, Concentration>,
}

impl ComponentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, concentration: Concentration) -> Self {
        self.add(name, concentration);
        self
    }

    /// Insert or replace a constituent, returning the previous concentration
    pub fn add(&mut self, name: impl Into<String>, concentration: Concentration) -> Option<Concentration> {
        self.components.insert(name.into(), concentration)
    }

    pub fn remove(&mut self, name: &str) -> Option<Concentration> {
        self.components.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Concentration> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Constituent names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Concentration)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of constituents with a non-zero concentration
    pub fn non_zero_count(&self) -> usize {
        self.components.values().filter(|c| c.si_value() != 0.0).count()
    }

    /// True when no constituent has a non-zero concentration
    pub fn is_trivial(&self) -> bool {
        self.non_zero_count() == 0
    }

    /// Every concentration multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> ComponentList {
        let components = self
            .components
            .iter()
            .map(|(name, c)| (name.clone(), c.scale(factor)))
            .collect();
        ComponentList { components }
    }

    /// Same names, and concentrations equal under `Concentration::equal_to`.
    ///
    /// Fails with `IncompatibleUnits` (naming the constituent) when a pair of
    /// concentrations cannot be compared.
    pub fn equal_to(&self, other: &ComponentList) -> Result<bool> {
        self.compare(other, |a, b| a.equal_to(b))
    }

    /// Same names, and concentrations within an absolute `tolerance` in each
    /// left-hand concentration's unit (typically `Tolerances::absolute`)
    pub fn equal_within(&self, other: &ComponentList, tolerance: f64) -> Result<bool> {
        self.compare(other, |a, b| a.equal_within(b, tolerance))
    }

    /// Same names, and concentrations within `tolerance` of each other
    /// relative to the larger one
    pub fn approx_eq_relative(&self, other: &ComponentList, tolerance: f64) -> Result<bool> {
        self.compare(other, |a, b| a.approx_eq_relative(b, tolerance))
    }

    fn compare<F>(&self, other: &ComponentList, eq: F) -> Result<bool>
    where
        F: Fn(&Concentration, &Concentration) -> Result<bool>,
    {
        if !self.components.keys().eq(other.components.keys()) {
            return Ok(false);
        }
        for ((name, a), b) in self.components.iter().zip(other.components.values()) {
            if !eq(a, b).map_err(|e| e.for_item(name.as_str()))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Marshal as a JSON object of name -> quantity string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| QuantError::Parse(e.to_string()))
    }

    /// Unmarshal from [`ComponentList::to_json`] output
    pub fn from_json(registry: &UnitRegistry, json: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(json);
        let list = ComponentListSeed::new(registry)
            .deserialize(&mut de)
            .map_err(|e| QuantError::Parse(e.to_string()))?;
        de.end().map_err(|e| QuantError::Parse(e.to_string()))?;
        Ok(list)
    }
}

impl PartialEq for ComponentList {
    fn eq(&self, other: &Self) -> bool {
        self.equal_to(other).unwrap_or(false)
    }
}

impl fmt::Display for ComponentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .components
            .iter()
            .map(|(name, c)| format!("{}: {}", name, c))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl FromIterator<(String, Concentration)> for ComponentList {
    fn from_iter<I: IntoIterator<Item = (String, Concentration)>>(iter: I) -> Self {
        ComponentList {
            components: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ComponentList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.components.len()))?;
        for (name, c) in &self.components {
            map.serialize_entry(name, c)?;
        }
        map.end()
    }
}

/// Deserializes a [`ComponentList`] against a registry
#[derive(Debug)]
pub struct ComponentListSeed<'r> {
    registry: &'r UnitRegistry,
}

impl<'r> ComponentListSeed<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        ComponentListSeed { registry }
    }
}

impl<'de> DeserializeSeed<'de> for ComponentListSeed<'_> {
    type Value = ComponentList;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<ComponentList, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ComponentListSeed<'_> {
    type Value = ComponentList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map of constituent names to concentrations")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<ComponentList, A::Error> {
        let mut list = ComponentList::new();
        while let Some(name) = access.next_key::<String>()? {
            let concentration = access.next_value_seed(QuantitySeed::<Concentration>::new(self.registry))?;
            list.add(name, concentration);
        }
        Ok(list)
    }
}

/// A composition observed at a specific volume
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentListSample {
    pub components: ComponentList,
    pub volume: Volume,
}

impl ComponentListSample {
    pub fn new(components: ComponentList, volume: Volume) -> Self {
        ComponentListSample { components, volume }
    }
}
