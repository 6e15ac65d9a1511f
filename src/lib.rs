//! F5 Steganography over Quantized JPEG DCT Coefficients
//!
//! This crate implements the F5 steganographic algorithm: embedding a
//! message into the quantized DCT coefficients of a baseline JPEG using
//! matrix encoding and permutative straddling, and extracting it again.
//!
//! # Layer Responsibilities
//!
//! This crate handles **coefficient-level** concerns only:
//! - Interleaving and flattening MCU block data ([`mcu`])
//! - Password-seeded block permutation ([`permute`])
//! - Code parameter selection from message size and carrier capacity
//! - Matrix-encoded embedding and extraction with shrinkage handling
//!   ([`MatrixEncoder`], [`MatrixDecoder`])
//!
//! The JPEG codec itself (color transform, DCT, quantization, Huffman
//! coding, marker I/O) is handled by outer layers; this crate starts and
//! ends at quantized [`DctData`].
//!
//! # Example
//!
//! ```
//! use f5stego::{embed, extract, DctData};
//!
//! // Quantized coefficients from the JPEG pipeline
//! # let mut dct = DctData::new(64);
//! # for i in 0..64 {
//! #     dct.y[i][0] = 80.0;
//! #     dct.cb[i][0] = -40.0;
//! #     dct.cr[i][0] = 20.0;
//! #     for j in 1..40 {
//! #         dct.y[i][j] = if j % 2 == 0 { 4.0 } else { -5.0 };
//! #         dct.cb[i][j] = 3.0;
//! #         dct.cr[i][j] = -2.0;
//! #     }
//! # }
//! let stego = embed(&dct, "secret password", "hidden message")?;
//! let message = extract(&stego, "secret password")?;
//! assert_eq!(message, "hidden message");
//! # Ok::<(), f5stego::F5Error>(())
//! ```

mod dct;
mod decoder;
mod encoder;
mod error;
pub mod mcu;
mod parameters;
mod permutation;
mod stego;

pub use dct::{CoefficientBlock, DctData, BLOCK_SIZE};
pub use decoder::MatrixDecoder;
pub use encoder::MatrixEncoder;
pub use error::{F5Error, Result};
pub use parameters::{calculate_k, calculate_n, EmbeddingRate, EMBEDDING_RATE_TABLE};
pub use permutation::permute;
pub use stego::{capacity, embed, extract};
