//! Fixed-size EDID block.
//!
//! Every EDID block, base or extension, is exactly 128 bytes. The block
//! imposes no structure of its own; interpretation is positional and done by
//! the consumers in [`crate::document`] and [`crate::structs::cea`].

use std::ops::Index;

use anyhow::{Result, bail};

use crate::utils::errors::EdidError;

/// Size of one EDID block in bytes.
pub const BLOCK_SIZE: usize = 128;

/// One 128-byte EDID block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    data: [u8; BLOCK_SIZE],
}

impl Default for Block {
    fn default() -> Self {
        Self {
            data: [0; BLOCK_SIZE],
        }
    }
}

impl From<[u8; BLOCK_SIZE]> for Block {
    fn from(data: [u8; BLOCK_SIZE]) -> Self {
        Self { data }
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Index<usize> for Block {
    type Output = u8;

    /// Offsets are checked against the fixed block size.
    fn index(&self, offset: usize) -> &u8 {
        &self.data[offset]
    }
}

impl Block {
    /// Builds a block from a slice of exactly [`BLOCK_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut block = Self::default();
        block.fill(bytes)?;
        Ok(block)
    }

    /// Overwrites the whole block.
    pub fn fill(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != BLOCK_SIZE {
            bail!(EdidError::BlockLength {
                expected: BLOCK_SIZE,
                actual: bytes.len(),
            });
        }

        self.data.copy_from_slice(bytes);
        Ok(())
    }

    pub const fn len(&self) -> usize {
        BLOCK_SIZE
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Byte at `offset`, or `None` past the end of the block.
    #[inline(always)]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// First byte, which identifies the kind of extension block.
    #[inline(always)]
    pub const fn tag(&self) -> u8 {
        self.data[0]
    }

    /// Little-endian 16-bit field.
    #[inline(always)]
    pub const fn u16_le(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.data[offset], self.data[offset + 1]])
    }

    /// Little-endian 32-bit field.
    #[inline(always)]
    pub const fn u32_le(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    /// Slice of `len` bytes starting at `offset`, clamped to the block end.
    pub fn range(&self, offset: usize, len: usize) -> &[u8] {
        let start = offset.min(BLOCK_SIZE);
        let end = offset.saturating_add(len).min(BLOCK_SIZE);
        &self.data[start..end]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; BLOCK_SIZE] {
        &mut self.data
    }
}
