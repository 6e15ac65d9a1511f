//! Error types for F5 embedding and extraction.

use std::fmt;
use thiserror::Error;

/// Result type alias for F5 operations.
pub type Result<T> = std::result::Result<T, F5Error>;

/// Errors that can occur during F5 embedding/extraction.
#[derive(Error)]
pub enum F5Error {
    /// The permutation password must not be empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// An operation received an empty coefficient array or DCT plane.
    #[error("coefficient data must not be empty")]
    EmptyCoefficients,

    /// Message bit length does not fit the 24-bit header field.
    #[error("message length of {bits} bits exceeds the 24-bit header field (max 16777215)")]
    MessageTooLong { bits: usize },

    /// Message is too large for the usable coefficients of the carrier.
    #[error("capacity exceeded: message requires {required} bits but only {available} usable coefficients are available")]
    CapacityExceeded { required: usize, available: usize },

    /// Not enough usable coefficients to place or read the 32-bit header.
    #[error("insufficient coefficients for the decoding header")]
    InsufficientCoefficientsForHeader,

    /// The coefficient array ran out while embedding or extracting the payload.
    #[error("insufficient coefficients for the message payload")]
    InsufficientCoefficientsForMessage,

    /// Invalid k parameter found in the header (wrong password or non-stego image).
    #[error("invalid k parameter in header: {k} (must be 1-9)")]
    InvalidKParameter { k: u8 },

    /// The header reports a message length the carrier cannot possibly hold.
    #[error("header reports {bits} message bits but the carrier holds only {coefficients} coefficients")]
    ImplausibleMessageLength { bits: usize, coefficients: usize },

    /// Extracted payload bytes are not valid UTF-8 (wrong password or corrupted image).
    #[error("extracted payload is not valid UTF-8")]
    MalformedMessage(#[from] std::string::FromUtf8Error),
}

impl fmt::Debug for F5Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")
    }
}
