//! Structured errors for quantity handling
//!
//! Every failure in the registry, the quantity constructors, the parsers and
//! the mixing engine is a value of [`QuantError`]. Nothing is retried
//! internally; callers decide how to recover.

use crate::MeasurementType;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_PREFIX: &str = "UNKNOWN_PREFIX";
    pub const DUPLICATE_UNIT: &str = "DUPLICATE_UNIT";
    pub const ALIAS_SHADOWS_UNIT: &str = "ALIAS_SHADOWS_UNIT";
    pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const NOT_DILUTABLE: &str = "NOT_DILUTABLE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const CATALOGUE_ERROR: &str = "CATALOGUE_ERROR";
    pub const MISMATCH: &str = "MISMATCH";
}

/// Error type for every fallible quantity operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown SI prefix: {0}")]
    UnknownPrefix(String),

    #[error("unit {0} is already declared")]
    DuplicateUnit(String),

    #[error("alias {0} would shadow a declared unit")]
    AliasShadowsUnit(String),

    #[error("unit {symbol} measures {found}, expected {expected}")]
    TypeMismatch {
        symbol: String,
        expected: MeasurementType,
        found: MeasurementType,
    },

    #[error("incompatible units: {left} and {right}{}", in_context(.context))]
    IncompatibleUnits {
        left: String,
        right: String,
        context: Option<String>,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("not a dilution: conflicting factors {}", format_factors(.factors))]
    NotDilutable { factors: Vec<f64> },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid unit catalogue: {0}")]
    Catalogue(String),

    #[error("{0}")]
    Mismatch(String),
}

fn in_context(context: &Option<String>) -> String {
    match context {
        Some(c) => format!(" (for {})", c),
        None => String::new(),
    }
}

fn format_factors(factors: &[f64]) -> String {
    let parts: Vec<String> = factors.iter().map(|f| format!("{}", f)).collect();
    format!("[{}]", parts.join(", "))
}

impl QuantError {
    /// Build an `IncompatibleUnits` error between two base symbols
    pub fn incompatible(left: impl Into<String>, right: impl Into<String>) -> Self {
        QuantError::IncompatibleUnits {
            left: left.into(),
            right: right.into(),
            context: None,
        }
    }

    /// Attach a context label (e.g. the constituent name) to an
    /// `IncompatibleUnits` error. Other variants pass through unchanged.
    pub fn for_item(self, item: impl Into<String>) -> Self {
        match self {
            QuantError::IncompatibleUnits { left, right, .. } => QuantError::IncompatibleUnits {
                left,
                right,
                context: Some(item.into()),
            },
            other => other,
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            QuantError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            QuantError::UnknownPrefix(_) => codes::UNKNOWN_PREFIX,
            QuantError::DuplicateUnit(_) => codes::DUPLICATE_UNIT,
            QuantError::AliasShadowsUnit(_) => codes::ALIAS_SHADOWS_UNIT,
            QuantError::TypeMismatch { .. } => codes::TYPE_MISMATCH,
            QuantError::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
            QuantError::DivisionByZero => codes::DIV_ZERO,
            QuantError::NotDilutable { .. } => codes::NOT_DILUTABLE,
            QuantError::Parse(_) => codes::PARSE_ERROR,
            QuantError::Catalogue(_) => codes::CATALOGUE_ERROR,
            QuantError::Mismatch(_) => codes::MISMATCH,
        }
    }
}

/// Result alias used across the labquant crates
pub type Result<T> = std::result::Result<T, QuantError>;
