//! Password-seeded permutation of MCU blocks.
//!
//! Permutative straddling spreads the embedded bits uniformly over the
//! carrier. The permutation swaps whole 8x8 blocks (never individual
//! coefficients) and is derived deterministically from the password, so
//! the extractor can replay the exact ordering used during embedding.

use crate::dct::CoefficientBlock;
use crate::error::{F5Error, Result};

/// Prime multiplier driving the swap-target sequence.
const SEQUENCE_MULTIPLIER: u64 = 397;

/// Sequence arithmetic is carried out modulo 2^31 - 1.
const SEQUENCE_MODULUS: u64 = 0x7FFF_FFFF;

/// Permute (or un-permute) an MCU array based on a password.
///
/// Forward mode applies a sequence of `len - 1` block swaps in ascending
/// position order; reverse mode replays the identical swaps in descending
/// order, which undoes them exactly. The input is never modified.
///
/// The swap targets are reduced modulo `len - 1`, so the final block is
/// never a swap participant and always stays in place. This asymmetry is
/// part of the wire contract between embedding and extraction and must
/// not be corrected.
///
/// # Arguments
/// * `password` - Non-empty password seeding the swap sequence
/// * `blocks` - MCU array to permute
/// * `reverse` - `false` to shuffle, `true` to undo a previous shuffle
pub fn permute(
    password: &str,
    blocks: &[CoefficientBlock],
    reverse: bool,
) -> Result<Vec<CoefficientBlock>> {
    if password.is_empty() {
        return Err(F5Error::EmptyPassword);
    }

    let mut permuted = blocks.to_vec();
    if blocks.len() < 2 {
        return Ok(permuted);
    }

    let sequence = swap_sequence(password, blocks.len());

    if reverse {
        for (i, &target) in sequence.iter().enumerate().rev() {
            permuted.swap(i, target);
        }
    } else {
        for (i, &target) in sequence.iter().enumerate() {
            permuted.swap(i, target);
        }
    }

    Ok(permuted)
}

/// Build the swap-target sequence for an array of `len` blocks.
///
/// Entry `i` is the swap partner of position `i`, for `i` in `0..len-1`.
fn swap_sequence(password: &str, len: usize) -> Vec<usize> {
    let bound = (len - 1) as u64;
    let mut state = password_seed(password);

    (0..len - 1)
        .map(|_| {
            state = (state * SEQUENCE_MULTIPLIER) % SEQUENCE_MODULUS;
            (state % bound) as usize
        })
        .collect()
}

/// Fold the password's UTF-8 bytes into the initial sequence state.
///
/// Fixed-width arithmetic only: the bytes are interpreted as one large
/// base-256 number and reduced modulo 2^31 - 1 with a running remainder,
/// which is reproducible on every platform.
fn password_seed(password: &str) -> u64 {
    password
        .bytes()
        .fold(0u64, |acc, byte| (acc * 256 + byte as u64) % SEQUENCE_MODULUS)
}
