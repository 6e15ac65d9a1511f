//! End-to-end embedding and extraction over quantized DCT data.
//!
//! These functions run the full pipeline around the matrix codec:
//! interleave the component planes, permute whole MCU blocks with the
//! password, pick the code parameters, run the codec over the flat
//! coefficient array, and (for embedding) undo the permutation so the
//! caller can hand the planes straight back to entropy encoding.
//! Extraction reads from the still-permuted array; no un-shuffle needed.

use crate::dct::DctData;
use crate::decoder::MatrixDecoder;
use crate::encoder::{MatrixEncoder, MAX_MESSAGE_BITS};
use crate::error::{F5Error, Result};
use crate::mcu;
use crate::parameters;
use crate::permutation::permute;

/// Embed a UTF-8 message into quantized DCT data.
///
/// Returns a new [`DctData`] with the message embedded; the input is not
/// modified. An empty message returns the input unchanged. The same
/// password must be used for [`extract`].
///
/// # Errors
/// * [`F5Error::EmptyPassword`] / [`F5Error::EmptyCoefficients`] on invalid input
/// * [`F5Error::MessageTooLong`] if the message overflows the 24-bit header field
/// * [`F5Error::CapacityExceeded`] if the carrier is too small for the message
pub fn embed(dct: &DctData, password: &str, message: &str) -> Result<DctData> {
    if password.is_empty() {
        return Err(F5Error::EmptyPassword);
    }
    if message.is_empty() {
        return Ok(dct.clone());
    }
    let message_bits = message.len() * 8;
    if message_bits > MAX_MESSAGE_BITS {
        return Err(F5Error::MessageTooLong { bits: message_bits });
    }

    let mcus = mcu::dct_to_mcu_array(dct)?;
    let permuted = permute(password, &mcus, false)?;

    let k = parameters::calculate_k(&permuted, message)?;
    let encoder = MatrixEncoder::new(k)?;
    log::debug!(
        "embedding {} message bits with k={} n={} over {} blocks",
        message_bits,
        k,
        encoder.n(),
        permuted.len()
    );

    let mut coefficients = mcu::mcu_array_to_coefficients(&permuted)?;
    encoder.embed(&mut coefficients, message.as_bytes())?;

    let embedded = mcu::coefficients_to_mcu_array(&coefficients)?;
    let restored = permute(password, &embedded, true)?;
    mcu::mcu_array_to_dct(&restored)
}

/// Extract a UTF-8 message from quantized DCT data.
///
/// # Errors
/// Consistency errors (invalid header parameters, exhausted coefficients,
/// [`F5Error::MalformedMessage`]) indicate a wrong password, a corrupted
/// image, or a carrier without embedded data.
pub fn extract(dct: &DctData, password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(F5Error::EmptyPassword);
    }

    let mcus = mcu::dct_to_mcu_array(dct)?;
    let permuted = permute(password, &mcus, false)?;
    let coefficients = mcu::mcu_array_to_coefficients(&permuted)?;

    let message = MatrixDecoder::new().extract(&coefficients)?;
    log::debug!("extracted {} message bytes", message.len());

    Ok(String::from_utf8(message)?)
}

/// Estimate the embedding capacity of a carrier, in bytes.
///
/// Uses the calculator's usable-coefficient accounting (net of DC slots
/// and the 32 header bits); the embedding walk itself may do slightly
/// better since it also uses +/-1 valued carriers.
pub fn capacity(dct: &DctData) -> Result<usize> {
    let mcus = mcu::dct_to_mcu_array(dct)?;
    let coefficients = mcu::mcu_array_to_coefficients(&mcus)?;
    let usable = parameters::usable_coefficient_count(&coefficients);

    Ok(usable.max(0) as usize / 8)
}
