//! Matrix decoder - extracts message bits from DCT coefficients.
//!
//! Decoding replays the encoder's walk over the (still permuted) flat
//! coefficient array without mutating anything: the 32-bit header yields
//! k and the message bit length, then every group of n nonzero AC
//! coefficients contributes its positional parity hash as one k-bit
//! payload chunk.

use crate::encoder::{carrier_parity, is_dc};
use crate::error::{F5Error, Result};
use crate::parameters::{calculate_n, HEADER_BITS};

/// Matrix decoder for coefficient arrays produced by [`crate::MatrixEncoder`].
#[derive(Debug, Default)]
pub struct MatrixDecoder;

impl MatrixDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        MatrixDecoder
    }

    /// Extract the embedded message bytes from a flat coefficient array.
    ///
    /// The code parameters come out of the embedded header, so the caller
    /// only has to present the coefficients in the exact permuted order
    /// used during embedding.
    ///
    /// # Errors
    /// Consistency errors ([`F5Error::InvalidKParameter`],
    /// [`F5Error::ImplausibleMessageLength`],
    /// [`F5Error::InsufficientCoefficientsForHeader`] /
    /// [`F5Error::InsufficientCoefficientsForMessage`]) indicate a wrong
    /// password, a corrupted image, or a carrier without embedded data.
    pub fn extract(&self, coefficients: &[i32]) -> Result<Vec<u8>> {
        let (k, message_bits, header_end) = read_header(coefficients)?;

        if k == 0 || k > 9 {
            return Err(F5Error::InvalidKParameter { k });
        }
        if message_bits == 0 {
            return Ok(Vec::new());
        }
        // Messages are whole bytes and can never outgrow the carrier; a
        // header failing either check was not written by the encoder.
        if message_bits % 8 != 0 || message_bits > coefficients.len() {
            return Err(F5Error::ImplausibleMessageLength {
                bits: message_bits,
                coefficients: coefficients.len(),
            });
        }

        let n = calculate_n(k);
        read_payload(coefficients, k, n, message_bits, header_end + 1)
    }
}

/// Read the 32-bit decoding header.
///
/// Walks nonzero AC coefficients from index 0, collecting their
/// sign-aware parities MSB-first. Returns `(k, message_bits, end_index)`
/// where `end_index` is one past the last examined slot.
pub(crate) fn read_header(coefficients: &[i32]) -> Result<(u8, usize, usize)> {
    let mut index = 0;
    let mut bits_read = 0;
    let mut header: u32 = 0;

    while bits_read < HEADER_BITS {
        if index >= coefficients.len() {
            return Err(F5Error::InsufficientCoefficientsForHeader);
        }
        let value = coefficients[index];
        if !is_dc(index) && value != 0 {
            header = (header << 1) | carrier_parity(value);
            bits_read += 1;
        }
        index += 1;
    }

    let k = (header >> 24) as u8;
    let message_bits = (header & 0x00FF_FFFF) as usize;
    Ok((k, message_bits, index))
}

/// Read `message_bits` payload bits starting at `start`.
fn read_payload(
    coefficients: &[i32],
    k: u8,
    n: usize,
    message_bits: usize,
    start: usize,
) -> Result<Vec<u8>> {
    let mut message = vec![0u8; message_bits / 8];
    let mut scan = start;
    let mut collected = 0;

    while collected < message_bits {
        // The group hash is exactly the k bits the encoder embedded.
        let mut hash: u32 = 0;
        let mut carriers = 0;
        while carriers < n {
            if scan >= coefficients.len() {
                return Err(F5Error::InsufficientCoefficientsForMessage);
            }
            let value = coefficients[scan];
            if !is_dc(scan) && value != 0 {
                carriers += 1;
                if carrier_parity(value) == 1 {
                    hash ^= carriers as u32;
                }
            }
            scan += 1;
        }

        // MSB-first; the final group may carry fewer than k live bits.
        for bit_position in (0..k).rev() {
            if collected == message_bits {
                break;
            }
            let bit = ((hash >> bit_position) & 1) as u8;
            message[collected / 8] |= bit << (7 - collected % 8);
            collected += 1;
        }
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{embed_header, MatrixEncoder};

    fn random_blocks(block_count: usize, seed: u64) -> Vec<i32> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut coefficients = Vec::with_capacity(block_count * 64);
        for _ in 0..block_count {
            coefficients.push(rng.i32(-500..500));
            for _ in 1..64 {
                let value = match rng.usize(0..10) {
                    0..=5 => 0,
                    6..=7 => rng.i32(-2..=2),
                    8 => rng.i32(-10..=10),
                    _ => rng.i32(-50..=50),
                };
                coefficients.push(value);
            }
        }
        coefficients
    }

    fn uniform_blocks(block_count: usize, ac_value: i32) -> Vec<i32> {
        let mut coefficients = Vec::with_capacity(block_count * 64);
        for _ in 0..block_count {
            coefficients.push(100);
            coefficients.extend(std::iter::repeat(ac_value).take(63));
        }
        coefficients
    }

    #[test]
    fn test_header_roundtrip() {
        let mut coefficients = random_blocks(10, 11);
        let end = embed_header(&mut coefficients, 5, 120).unwrap();

        let (k, message_bits, read_end) = read_header(&coefficients).unwrap();

        assert_eq!(k, 5);
        assert_eq!(message_bits, 120);
        assert_eq!(read_end, end, "both walks must stop at the same slot");
    }

    #[test]
    fn test_header_roundtrip_with_shrinkage() {
        // Plenty of +/-1 carriers force shrinkage during header embedding;
        // the reader must still see the same 32 bits.
        let mut coefficients = uniform_blocks(4, 0);
        for i in 0..coefficients.len() {
            if i % 64 != 0 {
                coefficients[i] = if i % 3 == 0 { 1 } else { -1 };
            }
        }

        let end = embed_header(&mut coefficients, 5, 120).unwrap();
        let (k, message_bits, read_end) = read_header(&coefficients).unwrap();

        assert_eq!((k, message_bits), (5, 120));
        assert_eq!(read_end, end);
    }

    #[test]
    fn test_worked_example_extraction() {
        let mut coefficients = uniform_blocks(4, 2);
        let encoder = MatrixEncoder::new(1).unwrap();
        encoder.embed(&mut coefficients, &[0b1000_0000]).unwrap();

        let extracted = MatrixDecoder::new().extract(&coefficients).unwrap();

        assert_eq!(extracted, vec![0b1000_0000]);
    }

    #[test]
    fn test_roundtrip_at_every_k() {
        for k in 1..=4u8 {
            let mut coefficients = random_blocks(300, u64::from(k));
            let message = b"The quick brown fox jumps over the lazy dog";

            let encoder = MatrixEncoder::new(k).unwrap();
            encoder.embed(&mut coefficients, message).unwrap();

            let extracted = MatrixDecoder::new().extract(&coefficients).unwrap();
            assert_eq!(extracted, message, "roundtrip failed for k = {}", k);
        }
    }

    #[test]
    fn test_roundtrip_with_partial_final_group() {
        // 8 bits at k = 3 leaves a final group carrying only 2 live bits.
        let mut coefficients = random_blocks(50, 77);

        let encoder = MatrixEncoder::new(3).unwrap();
        encoder.embed(&mut coefficients, &[0xA7]).unwrap();

        let extracted = MatrixDecoder::new().extract(&coefficients).unwrap();
        assert_eq!(extracted, vec![0xA7]);
    }

    #[test]
    fn test_roundtrip_binary_data() {
        let mut coefficients = random_blocks(400, 5);
        let message: Vec<u8> = (0..=255u8).collect();

        let encoder = MatrixEncoder::new(2).unwrap();
        encoder.embed(&mut coefficients, &message).unwrap();

        let extracted = MatrixDecoder::new().extract(&coefficients).unwrap();
        assert_eq!(extracted, message);
    }

    #[test]
    fn test_all_zero_carrier_fails_on_header() {
        let coefficients = vec![0i32; 256];
        let result = MatrixDecoder::new().extract(&coefficients);

        assert!(matches!(
            result,
            Err(F5Error::InsufficientCoefficientsForHeader)
        ));
    }

    #[test]
    fn test_invalid_k_in_header_is_rejected() {
        // All parities 0 decode to k = 0.
        let coefficients = uniform_blocks(2, 2);
        let result = MatrixDecoder::new().extract(&coefficients);

        assert!(matches!(result, Err(F5Error::InvalidKParameter { k: 0 })));
    }

    #[test]
    fn test_implausible_length_is_rejected() {
        // Hand-write a header claiming k = 3 and 13 message bits (not a
        // whole number of bytes). Parity-1 slots are value 3; header bit j
        // lives at index j + 1.
        let mut coefficients = uniform_blocks(2, 2);
        for bit in [6, 7, 28, 29, 31] {
            coefficients[bit + 1] = 3;
        }

        let (k, message_bits, _) = read_header(&coefficients).unwrap();
        assert_eq!((k, message_bits), (3, 13));

        let result = MatrixDecoder::new().extract(&coefficients);
        assert!(matches!(
            result,
            Err(F5Error::ImplausibleMessageLength { bits: 13, .. })
        ));
    }

    #[test]
    fn test_exhausted_carrier_fails_on_payload() {
        // Enough carriers for the header, none left for the 256-bit
        // payload the header promises.
        let mut coefficients = uniform_blocks(8, 0);
        for i in 1..=33 {
            coefficients[i] = 2;
        }
        embed_header(&mut coefficients, 1, 256).unwrap();

        let result = MatrixDecoder::new().extract(&coefficients);
        assert!(matches!(
            result,
            Err(F5Error::InsufficientCoefficientsForMessage)
        ));
    }
}
