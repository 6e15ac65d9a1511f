//! Quantized DCT data model.
//!
//! The surrounding JPEG pipeline stores quantized coefficients as floats,
//! but at this stage every value is integral. Blocks keep the float
//! representation at the interface; all embedding arithmetic happens on a
//! flat signed-integer array (see [`crate::mcu`]).

use std::ops::{Index, IndexMut};

/// Number of coefficients in one 8x8 block.
pub const BLOCK_SIZE: usize = 64;

/// One quantized 8x8 DCT block for a single color component.
///
/// Index 0 is the DC term; indices 1-63 are the AC terms in the raster
/// order the MCU reconstruction uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientBlock(pub [f32; BLOCK_SIZE]);

impl CoefficientBlock {
    /// Create a block with all coefficients zero.
    pub fn new() -> Self {
        CoefficientBlock([0.0; BLOCK_SIZE])
    }
}

impl Default for CoefficientBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for CoefficientBlock {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for CoefficientBlock {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.0[index]
    }
}

/// Quantized DCT coefficients of a 4:4:4 baseline JPEG, one block plane
/// per color component. All three planes have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DctData {
    pub y: Vec<CoefficientBlock>,
    pub cb: Vec<CoefficientBlock>,
    pub cr: Vec<CoefficientBlock>,
}

impl DctData {
    /// Create DCT data with `mcu_count` zeroed blocks per component.
    pub fn new(mcu_count: usize) -> Self {
        DctData {
            y: vec![CoefficientBlock::new(); mcu_count],
            cb: vec![CoefficientBlock::new(); mcu_count],
            cr: vec![CoefficientBlock::new(); mcu_count],
        }
    }

    /// Number of MCUs per component plane.
    #[inline]
    pub fn mcu_count(&self) -> usize {
        self.y.len()
    }
}
