//! Matrix-encoding parameter selection.
//!
//! F5 embeds k message bits into groups of n = 2^k - 1 carrier
//! coefficients. The right k for a given message and carrier follows from
//! the embedding rate: message bits divided by usable coefficients, looked
//! up against the fixed rate table of the (1, n, k) code family.

use crate::dct::{CoefficientBlock, BLOCK_SIZE};
use crate::error::{F5Error, Result};
use crate::mcu;

/// Bits reserved for the decoding header (8-bit k + 24-bit length).
pub(crate) const HEADER_BITS: usize = 32;

/// One row of the (1, n, k) code family table.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddingRate {
    /// Message bits embedded per group.
    pub k: u8,
    /// Coefficients per group, n = 2^k - 1.
    pub n: u16,
    /// Embedding rate k / n.
    pub rate: f64,
}

/// Embedding rates of the (1, n, k) codes for k = 1..=9.
pub const EMBEDDING_RATE_TABLE: [EmbeddingRate; 9] = [
    EmbeddingRate { k: 1, n: 1, rate: 1.0 },
    EmbeddingRate { k: 2, n: 3, rate: 0.6667 },
    EmbeddingRate { k: 3, n: 7, rate: 0.4286 },
    EmbeddingRate { k: 4, n: 15, rate: 0.2667 },
    EmbeddingRate { k: 5, n: 31, rate: 0.1613 },
    EmbeddingRate { k: 6, n: 63, rate: 0.0952 },
    EmbeddingRate { k: 7, n: 127, rate: 0.0551 },
    EmbeddingRate { k: 8, n: 255, rate: 0.0314 },
    EmbeddingRate { k: 9, n: 511, rate: 0.0176 },
];

/// Calculate the matrix-encoding parameter k for a message and carrier.
///
/// Computes the required embedding rate from the message bit length and
/// the usable coefficient count of the (already permuted) MCU array, then
/// picks the k whose tabulated rate is the smallest one strictly above
/// the requirement. At the exact capacity boundary (required rate 1.0)
/// k = 1 is returned.
///
/// # Errors
/// [`F5Error::CapacityExceeded`] if the carrier has fewer usable
/// coefficients than the message has bits.
pub fn calculate_k(blocks: &[CoefficientBlock], message: &str) -> Result<u8> {
    let message_bits = message.len() * 8;
    if message_bits == 0 {
        return Ok(1);
    }

    let coefficients = mcu::mcu_array_to_coefficients(blocks)?;
    let usable = usable_coefficient_count(&coefficients);

    if usable < message_bits as i64 {
        return Err(F5Error::CapacityExceeded {
            required: message_bits,
            available: usable.max(0) as usize,
        });
    }

    let required_rate = message_bits as f64 / usable as f64;

    // Table rows are in ascending k order, so descending rate order;
    // scan from the back for the smallest rate above the requirement.
    let k = EMBEDDING_RATE_TABLE
        .iter()
        .rev()
        .find(|row| row.rate > required_rate)
        .map(|row| row.k)
        .unwrap_or(1);

    Ok(k)
}

/// Calculate parameter n from k: coefficients per group, n = 2^k - 1.
#[inline]
pub fn calculate_n(k: u8) -> usize {
    (1usize << k) - 1
}

/// Count the coefficients the capacity estimate treats as usable.
///
/// Counts every coefficient outside {0, 1, -1}, then subtracts one DC
/// slot per block and the 32 header bits. The exclusion of +/-1 is
/// deliberately stricter than the embedding walk's own carrier selection
/// (which accepts any nonzero AC value): a +/-1 carrier can shrink to
/// zero, so it is not counted on.
pub(crate) fn usable_coefficient_count(coefficients: &[i32]) -> i64 {
    let block_count = (coefficients.len() / BLOCK_SIZE) as i64;
    let candidates = coefficients
        .iter()
        .filter(|&&c| c != 0 && c != 1 && c != -1)
        .count() as i64;

    candidates - block_count - HEADER_BITS as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Blocks with an exact number of usable AC coefficients.
    ///
    /// Every block gets a nonzero DC (which the accounting cancels out
    /// against the per-block subtraction) and `per_block` AC values of 2.
    fn blocks_with_usable(block_count: usize, per_block: usize) -> Vec<CoefficientBlock> {
        assert!(per_block < BLOCK_SIZE);
        (0..block_count)
            .map(|_| {
                let mut block = CoefficientBlock::new();
                block[0] = 100.0;
                for i in 1..=per_block {
                    block[i] = 2.0;
                }
                block
            })
            .collect()
    }

    fn message_of_bytes(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_calculate_n_for_all_k() {
        let expected = [1, 3, 7, 15, 31, 63, 127, 255, 511];
        for (k, &n) in (1..=9u8).zip(expected.iter()) {
            assert_eq!(calculate_n(k), n);
        }
    }

    #[test]
    fn test_table_is_consistent_with_calculate_n() {
        for row in &EMBEDDING_RATE_TABLE {
            assert_eq!(row.n as usize, calculate_n(row.k));
        }
    }

    #[test]
    fn test_usable_count_accounting() {
        // 4 blocks, 10 usable AC values each: 4 * (10 + 1 DC counted)
        // candidates, minus 4 DC slots, minus 32 header bits.
        let blocks = blocks_with_usable(4, 10);
        let coefficients = mcu::mcu_array_to_coefficients(&blocks).unwrap();

        assert_eq!(usable_coefficient_count(&coefficients), 4 * 10 - 32);
    }

    #[test]
    fn test_usable_count_excludes_plus_minus_one() {
        let mut blocks = blocks_with_usable(2, 10);
        // +/-1 values may shrink to zero, so the estimate refuses them.
        blocks[0][20] = 1.0;
        blocks[0][21] = -1.0;
        let coefficients = mcu::mcu_array_to_coefficients(&blocks).unwrap();

        assert_eq!(usable_coefficient_count(&coefficients), 2 * 10 - 32);
    }

    #[test]
    fn test_exact_boundary_does_not_fail() {
        // usable == message bits: 10 blocks * 12 AC - 32 = 88 = 11 bytes.
        let blocks = blocks_with_usable(10, 12);
        let k = calculate_k(&blocks, &message_of_bytes(11)).unwrap();

        assert_eq!(k, 1);
    }

    #[test]
    fn test_one_bit_short_fails_with_counts() {
        let blocks = blocks_with_usable(10, 12); // usable = 88
        let result = calculate_k(&blocks, &message_of_bytes(12)); // 96 bits

        match result {
            Err(F5Error::CapacityExceeded {
                required,
                available,
            }) => {
                assert_eq!(required, 96);
                assert_eq!(available, 88);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_small_message_gets_large_k() {
        // usable = 50 * 40 - 32 = 1968, message 8 bits
        // required rate ~ 0.004 -> smallest rate above it is k = 9.
        let blocks = blocks_with_usable(50, 40);
        let k = calculate_k(&blocks, "a").unwrap();

        assert_eq!(k, 9);
    }

    #[test]
    fn test_mid_rate_picks_matching_row() {
        // usable = 10 * 12 - 32 = 88, message 5 bytes = 40 bits
        // required rate = 40/88 ~ 0.4545 -> smallest rate above is 0.6667.
        let blocks = blocks_with_usable(10, 12);
        let k = calculate_k(&blocks, &message_of_bytes(5)).unwrap();

        assert_eq!(k, 2);
    }

    #[test]
    fn test_empty_message_defaults_to_k1() {
        let blocks = blocks_with_usable(2, 4);
        assert_eq!(calculate_k(&blocks, "").unwrap(), 1);
    }

    #[test]
    fn test_saturated_carrier_reports_zero_available() {
        // All-zero AC coefficients: candidates only cover the DC slots,
        // so the usable count goes negative and is clamped for reporting.
        let blocks: Vec<CoefficientBlock> = (0..2)
            .map(|_| {
                let mut block = CoefficientBlock::new();
                block[0] = 100.0;
                block
            })
            .collect();

        match calculate_k(&blocks, "hello") {
            Err(F5Error::CapacityExceeded { available, .. }) => assert_eq!(available, 0),
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
    }
}
