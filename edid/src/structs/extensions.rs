//! Extension block storage and iteration.
//!
//! Extension blocks are kept in segment order. Segment `n` (1-based, the base
//! block being segment 0) lives at slot `n - 1`. Callers may fill segments
//! out of order: asking for segment `k` grows the storage with zeroed
//! placeholder blocks for every missing segment below `k`.

use log::trace;

use crate::structs::block::Block;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionBlocks {
    blocks: Vec<Block>,
}

impl ExtensionBlocks {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Grows the storage so that `segment` exists, zero-filling any gap.
    ///
    /// `segment` is 1-based. Returns the block stored for that segment.
    pub fn ensure(&mut self, segment: usize) -> &mut Block {
        debug_assert!(segment >= 1, "segment 0 is the base block");

        let slot = segment.max(1) - 1;
        if slot >= self.blocks.len() {
            trace!(
                "Growing extension storage from {} to {} block(s)",
                self.blocks.len(),
                slot + 1
            );
            self.blocks.resize(slot + 1, Block::default());
        }

        &mut self.blocks[slot]
    }

    /// Block stored for the 1-based `segment`, if present.
    pub fn get(&self, segment: usize) -> Option<&Block> {
        segment.checked_sub(1).and_then(|slot| self.blocks.get(slot))
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn iter(&self) -> Extensions<'_> {
        Extensions::new(&self.blocks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Unstarted,
    Positioned(usize),
    Exhausted,
}

/// Restartable cursor over extension blocks.
///
/// A fresh cursor points before the first block; [`Iterator::next`] moves it
/// onto the next block and [`Extensions::current`] reports the block under
/// the cursor. Once past the end the cursor stays exhausted until
/// [`Extensions::reset`].
#[derive(Debug, Clone)]
pub struct Extensions<'a> {
    blocks: &'a [Block],
    state: CursorState,
}

impl<'a> Extensions<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self {
            blocks,
            state: CursorState::Unstarted,
        }
    }

    pub fn reset(&mut self) {
        self.state = CursorState::Unstarted;
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, CursorState::Positioned(_))
    }

    pub fn current(&self) -> Option<&'a Block> {
        match self.state {
            CursorState::Positioned(index) => self.blocks.get(index),
            _ => None,
        }
    }

    /// Tag byte of the current block, `0xFF` when the cursor is not on a block.
    pub fn tag(&self) -> u8 {
        self.current().map_or(0xFF, Block::tag)
    }
}

impl<'a> Iterator for Extensions<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match self.state {
            CursorState::Unstarted => 0,
            CursorState::Positioned(index) => index + 1,
            CursorState::Exhausted => return None,
        };

        self.state = if next < self.blocks.len() {
            CursorState::Positioned(next)
        } else {
            CursorState::Exhausted
        };

        self.current()
    }
}
