//! Quantity serialization
//!
//! A typed quantity is persisted as one string token `"<value> <symbol>"`
//! (e.g. `"25 C"`, `"5 ul"`). The unset variant is `null`. Reading a token
//! back needs a registry, so deserialization goes through [`QuantitySeed`].

use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeSeed, Deserializer};
use serde::{Deserialize, Serializer};
use labquant_core::float::format_value;
use labquant_core::{QuantError, Result};

use crate::parse::split_value_and_unit;
use crate::{TypedQuantity, UnitRegistry};

/// The string token for a quantity, `None` when unset.
///
/// Non-finite values render as `inf`/`NaN`, which [`from_token`] rejects;
/// the serde path refuses to write them at all.
pub fn to_token<Q: TypedQuantity>(quantity: &Q) -> Option<String> {
    quantity
        .measurement()
        .map(|m| format!("{} {}", format_value(m.value()), m.unit().symbol()))
}

/// Rebuild a quantity from its token; missing or blank tokens give `Unset`
pub fn from_token<Q: TypedQuantity>(registry: &UnitRegistry, token: Option<&str>) -> Result<Q> {
    let token = match token.map(str::trim) {
        None | Some("") => return Ok(Q::unset()),
        Some(t) => t,
    };
    let (value, symbol) = split_value_and_unit(token)?;
    Q::new(registry, value, symbol)
}

pub(crate) fn serialize_quantity<Q, S>(quantity: &Q, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    Q: TypedQuantity,
    S: Serializer,
{
    if let Some(m) = quantity.measurement() {
        if !m.value().is_finite() {
            return Err(serde::ser::Error::custom(format!(
                "cannot serialize non-finite {} value {}",
                Q::KIND,
                m.value()
            )));
        }
    }
    match to_token(quantity) {
        Some(token) => serializer.serialize_str(&token),
        None => serializer.serialize_none(),
    }
}

/// Deserializes a typed quantity against a registry
pub struct QuantitySeed<'r, Q> {
    registry: &'r UnitRegistry,
    _kind: PhantomData<Q>,
}

impl<'r, Q> QuantitySeed<'r, Q> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        QuantitySeed { registry, _kind: PhantomData }
    }
}

impl<Q> fmt::Debug for QuantitySeed<'_, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantitySeed").finish_non_exhaustive()
    }
}

impl<'de, Q: TypedQuantity> DeserializeSeed<'de> for QuantitySeed<'_, Q> {
    type Value = Q;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Q, D::Error> {
        let token = Option::<String>::deserialize(deserializer)?;
        from_token(self.registry, token.as_deref()).map_err(serde::de::Error::custom)
    }
}

/// Marshal a quantity to JSON (`"5 ul"` or `null`)
pub fn to_json<Q: TypedQuantity + serde::Serialize>(quantity: &Q) -> Result<String> {
    serde_json::to_string(quantity).map_err(|e| QuantError::Parse(e.to_string()))
}

/// Unmarshal a quantity from JSON produced by [`to_json`]
pub fn from_json<Q: TypedQuantity>(registry: &UnitRegistry, json: &str) -> Result<Q> {
    let mut de = serde_json::Deserializer::from_str(json);
    let quantity = QuantitySeed::<Q>::new(registry)
        .deserialize(&mut de)
        .map_err(|e| QuantError::Parse(e.to_string()))?;
    de.end().map_err(|e| QuantError::Parse(e.to_string()))?;
    Ok(quantity)
}
