//! labquant Mix - Liquid composition, mixing and dilution
//!
//! Features:
//! - `ComponentList`: named constituents at a concentration, with a JSON codec
//! - Volume-weighted mixing of two samples
//! - Dilution equivalence: is one composition a uniform dilution of another?
//! - Liquid equality by normalized name, concentration and composition
//!
//! Every function here is pure over its inputs; the only shared state is the
//! `UnitRegistry` passed in by reference.

mod component;
mod dilution;
mod liquid;
mod mix;

pub use component::{ComponentList, ComponentListSample, ComponentListSeed};
pub use dilution::{dilutable_component_lists, DilutionCheck};
pub use liquid::{equal, equivalent, normalize_name, Liquid};
pub use mix::{mix_component_lists, mix_samples};
