//! labquant Core - Fundamental types
//!
//! This crate provides the types shared by every labquant crate:
//! - `QuantError`: Structured errors with machine-readable codes
//! - `MeasurementType`: The physical quantity a unit measures
//! - `Tolerances`: Comparison and dilution tolerances
//! - `float`: Rounding and tolerance helpers

mod config;
mod error;
pub mod float;
mod kind;

pub use config::Tolerances;
pub use error::{codes, QuantError, Result};
pub use kind::MeasurementType;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{MeasurementType, QuantError, Result, Tolerances};
}
