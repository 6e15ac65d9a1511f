//! Conversions between DCT planes, interleaved MCU arrays, and flat
//! coefficient arrays.
//!
//! The MCU array interleaves the three component planes per spatial
//! position: Y0, Cb0, Cr0, Y1, Cb1, Cr1, ... The flat array is the MCU
//! array laid out block-major: index `i` belongs to block `i / 64` at
//! in-block position `i % 64`, so `i % 64 == 0` marks a DC coefficient.
//!
//! All four conversions are exact inverses of each other. Quantized
//! coefficients are integral at this stage, so the float ⇄ integer
//! boundary is lossless.

use crate::dct::{CoefficientBlock, DctData, BLOCK_SIZE};
use crate::error::{F5Error, Result};

/// Number of interleaved color components.
const COMPONENTS: usize = 3;

/// Interleave the three component planes into one MCU array.
pub fn dct_to_mcu_array(dct: &DctData) -> Result<Vec<CoefficientBlock>> {
    if dct.y.is_empty() {
        return Err(F5Error::EmptyCoefficients);
    }
    debug_assert_eq!(dct.y.len(), dct.cb.len());
    debug_assert_eq!(dct.y.len(), dct.cr.len());

    let mut mcus = Vec::with_capacity(dct.mcu_count() * COMPONENTS);
    for i in 0..dct.mcu_count() {
        mcus.push(dct.y[i]);
        mcus.push(dct.cb[i]);
        mcus.push(dct.cr[i]);
    }

    Ok(mcus)
}

/// Split an interleaved MCU array back into the three component planes.
pub fn mcu_array_to_dct(mcus: &[CoefficientBlock]) -> Result<DctData> {
    if mcus.is_empty() {
        return Err(F5Error::EmptyCoefficients);
    }

    let mcu_count = mcus.len() / COMPONENTS;
    let mut dct = DctData::new(mcu_count);
    let mut blocks = mcus.iter();
    for i in 0..mcu_count {
        dct.y[i] = *blocks.next().unwrap();
        dct.cb[i] = *blocks.next().unwrap();
        dct.cr[i] = *blocks.next().unwrap();
    }

    Ok(dct)
}

/// Flatten an MCU array into one contiguous coefficient array.
///
/// Coefficients are integral floats at this stage; they are converted to
/// `i32` here so that all embedding arithmetic is exact integer math.
pub fn mcu_array_to_coefficients(mcus: &[CoefficientBlock]) -> Result<Vec<i32>> {
    if mcus.is_empty() {
        return Err(F5Error::EmptyCoefficients);
    }

    let mut coefficients = Vec::with_capacity(mcus.len() * BLOCK_SIZE);
    for block in mcus {
        for &value in &block.0 {
            debug_assert_eq!(value.fract(), 0.0, "quantized coefficient must be integral");
            coefficients.push(value as i32);
        }
    }

    Ok(coefficients)
}

/// Reassemble a flat coefficient array into an MCU array.
pub fn coefficients_to_mcu_array(coefficients: &[i32]) -> Result<Vec<CoefficientBlock>> {
    if coefficients.is_empty() {
        return Err(F5Error::EmptyCoefficients);
    }

    let mcus = coefficients
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut block = CoefficientBlock::new();
            for (slot, &value) in block.0.iter_mut().zip(chunk) {
                *slot = value as f32;
            }
            block
        })
        .collect();

    Ok(mcus)
}
