//! Volume helpers used when planning transfers

use labquant_core::{QuantError, Result};
use tracing::trace;

use crate::{Concentration, TypedQuantity, Volume};

/// Sum volumes in the unit of the first set one; empty input gives `Unset`
pub fn sum_volumes(volumes: &[Volume]) -> Result<Volume> {
    volumes.iter().try_fold(Volume::Unset, |total, v| total.plus(v))
}

/// Split a volume into `parts` equal volumes
pub fn divide_volume(volume: &Volume, parts: usize) -> Result<Volume> {
    if parts == 0 {
        return Err(QuantError::DivisionByZero);
    }
    volume.div_scalar(parts as f64)
}

/// Stock volume needed to reach `target` in `final_volume` (C1·V1 = C2·V2).
///
/// The result is in `final_volume`'s unit. Fails with `IncompatibleUnits`
/// when the two concentrations do not share a base and with
/// `DivisionByZero` for an empty stock.
pub fn volume_for_target_concentration(
    stock: &Concentration,
    target: &Concentration,
    final_volume: &Volume,
) -> Result<Volume> {
    let fraction = target.ratio(stock)?;
    trace!(%stock, %target, fraction, "stock fraction");
    Ok(final_volume.scale(fraction))
}
