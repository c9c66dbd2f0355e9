//! CEA data block collection.
//!
//! ## Layout
//!
//! The data block collection of a CEA extension starts at byte 4 and ends
//! where the detailed timing descriptors begin (byte 2 of the extension).
//! Each record is a one-byte header followed by its payload:
//!
//! ```text
//!  7   5 4       0
//! +-----+---------+----------------------+
//! | tag | length  | payload (length B)   |
//! +-----+---------+----------------------+
//! ```
//!
//! A record with length 0 ends the collection. Extended-tag records (tag 7)
//! carry their extended tag in the first payload byte; vendor-specific
//! records (tag 3) carry a 24-bit little-endian IEEE registration ID in the
//! first three payload bytes.

use std::fmt::{Display, Formatter};

use log::trace;

use crate::structs::block::{BLOCK_SIZE, Block};
use crate::utils::bitstream_io::BsIoSliceReader;

/// Offset of the first data block inside a CEA extension.
pub const DATA_BLOCK_START: usize = 4;

/// Data block tag codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataBlockTag {
    Reserved = 0,
    Audio = 1,
    Video = 2,
    VendorSpecific = 3,
    SpeakerAllocation = 4,
    VesaDisplayTransferCharacteristic = 5,
    Reserved6 = 6,
    Extended = 7,
}

impl From<u8> for DataBlockTag {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            1 => Self::Audio,
            2 => Self::Video,
            3 => Self::VendorSpecific,
            4 => Self::SpeakerAllocation,
            5 => Self::VesaDisplayTransferCharacteristic,
            6 => Self::Reserved6,
            7 => Self::Extended,
            _ => Self::Reserved,
        }
    }
}

impl Display for DataBlockTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Reserved | Self::Reserved6 => "Reserved",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::VendorSpecific => "Vendor-Specific",
            Self::SpeakerAllocation => "Speaker Allocation",
            Self::VesaDisplayTransferCharacteristic => "VESA Display Transfer Characteristic",
            Self::Extended => "Extended",
        };

        f.write_str(name)
    }
}

/// One record of the data block collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBlock<'a> {
    offset: usize,
    tag: u8,
    length: u8,
    payload: &'a [u8],
}

impl<'a> DataBlock<'a> {
    /// Offset of the header byte inside the extension block.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn kind(&self) -> DataBlockTag {
        DataBlockTag::from(self.tag)
    }

    /// Payload length declared by the header.
    pub fn size(&self) -> u8 {
        self.length
    }

    /// Payload bytes, clamped to the end of the extension block.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// 24-bit IEEE registration ID of a vendor-specific record.
    pub fn registration_id(&self) -> Option<u32> {
        match self.payload {
            [b0, b1, b2, ..] if self.kind() == DataBlockTag::VendorSpecific => {
                Some(u32::from_le_bytes([*b0, *b1, *b2, 0]))
            }
            _ => None,
        }
    }

    /// Extended tag code of an extended-tag record.
    pub fn extended_tag(&self) -> Option<u8> {
        match self.kind() {
            DataBlockTag::Extended => self.payload.first().copied(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unstarted,
    Positioned(usize),
    Exhausted,
}

/// Scanner over the data block collection of one CEA extension.
///
/// A fresh scanner is positioned before the first record. Each call to
/// [`Iterator::next`] moves to the following record; the scan ends at the
/// detailed timing descriptor offset, at the end of the block, or at the
/// first zero-length record, whichever comes first. An exhausted scanner
/// stays exhausted until [`DataBlocks::reset`].
#[derive(Debug, Clone)]
pub struct DataBlocks<'a> {
    block: &'a Block,
    dtd_start: usize,
    state: ScanState,
}

impl<'a> DataBlocks<'a> {
    pub fn new(block: &'a Block, dtd_start: u8) -> Self {
        Self {
            block,
            dtd_start: dtd_start as usize,
            state: ScanState::Unstarted,
        }
    }

    pub fn reset(&mut self) {
        self.state = ScanState::Unstarted;
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, ScanState::Positioned(_))
    }

    pub fn current(&self) -> Option<DataBlock<'a>> {
        match self.state {
            ScanState::Positioned(offset) => self.record_at(offset),
            _ => None,
        }
    }

    /// Tag of the current record, 0 when not positioned.
    pub fn tag(&self) -> u8 {
        self.current().map_or(0, |record| record.tag)
    }

    /// Declared payload length of the current record, 0 when not positioned.
    pub fn size(&self) -> u8 {
        self.current().map_or(0, |record| record.length)
    }

    fn in_range(&self, offset: usize) -> bool {
        offset >= DATA_BLOCK_START && offset < self.dtd_start && offset < BLOCK_SIZE
    }

    fn header_at(&self, offset: usize) -> Option<(u8, u8)> {
        if !self.in_range(offset) {
            return None;
        }

        let header = [self.block.get(offset)?];
        let reader = &mut BsIoSliceReader::from_slice(&header);
        let tag = reader.get_n::<u8>(3).ok()?;
        let length = reader.get_n::<u8>(5).ok()?;

        Some((tag, length))
    }

    fn record_at(&self, offset: usize) -> Option<DataBlock<'a>> {
        let (tag, length) = self.header_at(offset)?;
        if length == 0 {
            return None;
        }

        Some(DataBlock {
            offset,
            tag,
            length,
            payload: self.block.range(offset + 1, length as usize),
        })
    }
}

impl<'a> Iterator for DataBlocks<'a> {
    type Item = DataBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = match self.state {
            ScanState::Unstarted => DATA_BLOCK_START,
            ScanState::Positioned(offset) => {
                let length = self.header_at(offset).map_or(0, |(_, length)| length);
                offset + 1 + length as usize
            }
            ScanState::Exhausted => return None,
        };

        match self.record_at(offset) {
            Some(record) => {
                trace!(
                    "CEA data block at {:#04X}: {} ({}), {} byte(s)",
                    offset,
                    record.kind(),
                    record.tag,
                    record.length
                );
                self.state = ScanState::Positioned(offset);
                Some(record)
            }
            None => {
                self.state = ScanState::Exhausted;
                None
            }
        }
    }
}
