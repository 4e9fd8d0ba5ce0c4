//! Measurement types
//!
//! Every unit in a registry belongs to exactly one measurement type, and
//! every typed quantity is tagged with one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::QuantError;

/// The physical quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Volume,
    Concentration,
    Mass,
    Moles,
    Temperature,
    Time,
    Length,
    Area,
    Pressure,
    Force,
    Energy,
    Density,
    FlowRate,
    Velocity,
    Rate,
    AngularVelocity,
    Voltage,
    Angle,
}

impl MeasurementType {
    /// All measurement types, in declaration order
    pub const ALL: [MeasurementType; 18] = [
        MeasurementType::Volume,
        MeasurementType::Concentration,
        MeasurementType::Mass,
        MeasurementType::Moles,
        MeasurementType::Temperature,
        MeasurementType::Time,
        MeasurementType::Length,
        MeasurementType::Area,
        MeasurementType::Pressure,
        MeasurementType::Force,
        MeasurementType::Energy,
        MeasurementType::Density,
        MeasurementType::FlowRate,
        MeasurementType::Velocity,
        MeasurementType::Rate,
        MeasurementType::AngularVelocity,
        MeasurementType::Voltage,
        MeasurementType::Angle,
    ];

    /// Lowercase name, as used in catalogue documents
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementType::Volume => "volume",
            MeasurementType::Concentration => "concentration",
            MeasurementType::Mass => "mass",
            MeasurementType::Moles => "moles",
            MeasurementType::Temperature => "temperature",
            MeasurementType::Time => "time",
            MeasurementType::Length => "length",
            MeasurementType::Area => "area",
            MeasurementType::Pressure => "pressure",
            MeasurementType::Force => "force",
            MeasurementType::Energy => "energy",
            MeasurementType::Density => "density",
            MeasurementType::FlowRate => "flow_rate",
            MeasurementType::Velocity => "velocity",
            MeasurementType::Rate => "rate",
            MeasurementType::AngularVelocity => "angular_velocity",
            MeasurementType::Voltage => "voltage",
            MeasurementType::Angle => "angle",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MeasurementType {
    type Err = QuantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MeasurementType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| QuantError::Parse(format!("unknown measurement type: {}", s)))
    }
}
