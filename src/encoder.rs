//! Matrix encoder - embeds message bits into DCT coefficients.
//!
//! Embedding happens in two phases. A 32-bit header (8 bits k, 24 bits
//! message bit length) is written first, one bit per carrier. The payload
//! follows as (1, n, k) matrix encoding: each group of n nonzero AC
//! coefficients carries k message bits, and at most one coefficient per
//! group has its magnitude lowered by one to make the group's parity hash
//! equal the bits. A coefficient whose magnitude drops to zero (shrinkage)
//! is removed from its group and the group is repaired before the bits
//! count as embedded.

use crate::error::{F5Error, Result};
use crate::parameters::{calculate_n, HEADER_BITS};

/// Largest message bit length the 24-bit header field can carry.
pub(crate) const MAX_MESSAGE_BITS: usize = 0x00FF_FFFF;

/// Matrix encoder for a fixed (1, n, k) code.
#[derive(Debug)]
pub struct MatrixEncoder {
    k: u8,
    n: usize,
}

impl MatrixEncoder {
    /// Create an encoder for parameter `k` (with n = 2^k - 1).
    ///
    /// # Errors
    /// [`F5Error::InvalidKParameter`] unless `k` is in 1..=9.
    pub fn new(k: u8) -> Result<Self> {
        if k == 0 || k > 9 {
            return Err(F5Error::InvalidKParameter { k });
        }
        Ok(MatrixEncoder {
            k,
            n: calculate_n(k),
        })
    }

    /// The number of message bits per group.
    #[inline]
    pub fn k(&self) -> u8 {
        self.k
    }

    /// The number of carrier coefficients per group.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Embed `message` into a flat coefficient array, in place.
    ///
    /// Writes the decoding header followed by the matrix-encoded payload.
    /// An empty message leaves the coefficients untouched. Coefficient
    /// magnitudes change by at most one, and only on nonzero AC slots.
    ///
    /// # Errors
    /// * [`F5Error::MessageTooLong`] if the bit length overflows the header field
    /// * [`F5Error::InsufficientCoefficientsForHeader`] /
    ///   [`F5Error::InsufficientCoefficientsForMessage`] if the carrier runs
    ///   out of nonzero AC coefficients (capacity miscalculation upstream)
    pub fn embed(&self, coefficients: &mut [i32], message: &[u8]) -> Result<()> {
        if message.is_empty() {
            return Ok(());
        }

        let message_bits = message.len() * 8;
        if message_bits > MAX_MESSAGE_BITS {
            return Err(F5Error::MessageTooLong { bits: message_bits });
        }

        let header_end = embed_header(coefficients, self.k, message_bits)?;
        self.embed_payload(coefficients, message, header_end + 1)
    }

    /// Embed the payload bits starting at `start`.
    fn embed_payload(&self, coefficients: &mut [i32], message: &[u8], start: usize) -> Result<()> {
        let k = self.k as usize;
        let total_bits = message.len() * 8;

        let mut bit_source = MessageBits::new(message);
        let mut scan = start;
        let mut embedded = 0;

        // Group state persists across shrinkage retries: survivors stay,
        // the pending bits are not re-pulled, and the scan index keeps
        // advancing so replacements come from fresh coefficients.
        let mut group: Vec<(usize, i32)> = Vec::with_capacity(self.n);
        let mut pending_bits: Option<u32> = None;

        while embedded < total_bits {
            while group.len() < self.n {
                if scan >= coefficients.len() {
                    return Err(F5Error::InsufficientCoefficientsForMessage);
                }
                let value = coefficients[scan];
                if !is_dc(scan) && value != 0 {
                    group.push((scan, value));
                }
                scan += 1;
            }

            let hash = group_hash(&group);
            let bits = match pending_bits.take() {
                Some(bits) => bits,
                None => next_chunk(&mut bit_source, k),
            };

            let target = hash ^ bits;
            if target == 0 {
                // The group already encodes the bits.
                embedded += k;
                group.clear();
                continue;
            }

            let (index, value) = group[target as usize - 1];
            coefficients[index] += if value < 0 { 1 } else { -1 };

            if coefficients[index] == 0 {
                // Shrinkage: the carrier is gone and the decoder will skip
                // this slot. Drop it, keep the survivors in order, and
                // retry the same bits with a refilled group.
                log::trace!("shrinkage at coefficient {index}");
                group.remove(target as usize - 1);
                pending_bits = Some(bits);
            } else {
                embedded += k;
                group.clear();
            }
        }

        Ok(())
    }
}

/// Embed the 32-bit decoding header, one bit per nonzero AC coefficient.
///
/// The header packs `(k << 24) | message_bits` and is written MSB-first.
/// A coefficient shrinking to zero does not consume its bit; the bit is
/// retried on the next usable slot. Returns the scan index one past the
/// last examined slot.
pub(crate) fn embed_header(coefficients: &mut [i32], k: u8, message_bits: usize) -> Result<usize> {
    debug_assert!(message_bits <= MAX_MESSAGE_BITS);
    let header = (u32::from(k) << 24) | (message_bits as u32 & 0x00FF_FFFF);

    let mut index = 0;
    let mut consumed = 0;
    while consumed < HEADER_BITS {
        if index >= coefficients.len() {
            return Err(F5Error::InsufficientCoefficientsForHeader);
        }

        let value = coefficients[index];
        if !is_dc(index) && value != 0 {
            let bit = ((header >> (31 - consumed)) & 1) as i32;
            // A positive carrier stores its raw parity, a negative one the
            // complement, so the adjustment condition flips with the sign.
            if value > 0 && (value & 1) != bit {
                coefficients[index] -= 1;
            } else if value < 0 && (value & 1) == bit {
                coefficients[index] += 1;
            }

            if coefficients[index] != 0 {
                consumed += 1;
            }
        }
        index += 1;
    }

    Ok(index)
}

/// Whether a flat-array index is a DC slot (first coefficient of a block).
#[inline]
pub(crate) fn is_dc(index: usize) -> bool {
    index % 64 == 0
}

/// Sign-aware parity of a nonzero carrier coefficient.
///
/// Positive values store their least significant bit directly; negative
/// values store the complement of their magnitude's parity.
#[inline]
pub(crate) fn carrier_parity(value: i32) -> u32 {
    debug_assert_ne!(value, 0);
    if value > 0 {
        (value & 1) as u32
    } else {
        (1 - (value & 1)) as u32
    }
}

/// Positional parity hash of an ordered carrier group.
///
/// XORs the 1-based group position of every carrier whose sign-aware
/// parity is 1. The decoder recomputes this same value as the k-bit
/// payload chunk.
fn group_hash(group: &[(usize, i32)]) -> u32 {
    group
        .iter()
        .enumerate()
        .filter(|(_, &(_, value))| carrier_parity(value) == 1)
        .fold(0u32, |hash, (i, _)| hash ^ (i as u32 + 1))
}

/// Message bits, MSB-first within each byte, byte-major.
struct MessageBits<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> MessageBits<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        MessageBits { bytes, position: 0 }
    }
}

impl Iterator for MessageBits<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.position >= self.bytes.len() * 8 {
            return None;
        }
        let byte = self.bytes[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1;
        self.position += 1;
        Some(u32::from(bit))
    }
}

/// Pull the next `k` bits as one integer, padding with zeros at the end
/// of the message.
fn next_chunk(bits: &mut MessageBits<'_>, k: usize) -> u32 {
    (0..k).fold(0u32, |acc, _| (acc << 1) | bits.next().unwrap_or(0))
}
