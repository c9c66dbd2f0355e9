//! CEA-861 extension block.
//!
//! ## Layout
//!
//! | Byte | Content |
//! |---|---|
//! | 0 | Extension tag `0x02` |
//! | 1 | Revision |
//! | 2 | Offset of the first detailed timing descriptor |
//! | 3 | Global support flags and native DTD count |
//! | 4.. | Data block collection, see [`crate::structs::data_block`] |
//!
//! Capability queries each walk the data block collection from the start and
//! act on the first matching record only.

use log::trace;

use crate::structs::block::Block;
use crate::structs::capability::{AudioFormats, ColorDepths, ColorFormat, ColorFormats, ColorSpaces};
use crate::structs::data_block::{DataBlock, DataBlockTag, DataBlocks};
use crate::utils::bitstream_io::BsIoSliceReader;

/// Extension tag of a CEA-861 block.
pub const CEA_EXTENSION_TAG: u8 = 0x02;

/// IEEE registration ID of HDMI Licensing, LLC (HDMI 1.4 VSDB).
pub const HDMI_LLC_REGISTRATION_ID: u32 = 0x00_0C_03;

/// IEEE registration ID of HDMI Forum (HDMI 2.0 HF-VSDB).
pub const HDMI_FORUM_REGISTRATION_ID: u32 = 0xC4_5D_D8;

/// Extended tag code of the colorimetry data block.
pub const COLORIMETRY_EXTENDED_TAG: u8 = 0x05;

/// View over an extension block carrying the CEA tag.
#[derive(Debug, Clone, Copy)]
pub struct CeaExtension<'a> {
    block: &'a Block,
}

impl<'a> CeaExtension<'a> {
    /// Wraps a block already known to carry [`CEA_EXTENSION_TAG`].
    ///
    /// Passing any other block is a programming error. Use
    /// [`CeaExtension::try_new`] when the tag has not been checked.
    pub fn new(block: &'a Block) -> Self {
        debug_assert_eq!(block.tag(), CEA_EXTENSION_TAG, "not a CEA extension block");
        Self { block }
    }

    pub fn try_new(block: &'a Block) -> Option<Self> {
        (block.tag() == CEA_EXTENSION_TAG).then_some(Self { block })
    }

    pub fn block(&self) -> &'a Block {
        self.block
    }

    pub fn version(&self) -> u8 {
        self.block[1]
    }

    pub fn detailed_timing_descriptor_start(&self) -> u8 {
        self.block[2]
    }

    pub fn data_blocks(&self) -> DataBlocks<'a> {
        DataBlocks::new(self.block, self.detailed_timing_descriptor_start())
    }

    fn find_data_block<P>(&self, predicate: P) -> Option<DataBlock<'a>>
    where
        P: FnMut(&DataBlock<'a>) -> bool,
    {
        self.data_blocks().find(predicate)
    }

    fn find_vendor_block(&self, registration_id: u32, min_size: usize) -> Option<DataBlock<'a>> {
        self.find_data_block(|record| {
            record.payload().len() >= min_size && record.registration_id() == Some(registration_id)
        })
    }

    /// Deep color support from the HDMI 1.4 vendor-specific data block.
    pub fn supported_color_depths(&self) -> ColorDepths {
        let mut depths = ColorDepths::empty();

        let Some(vsdb) = self.find_vendor_block(HDMI_LLC_REGISTRATION_ID, 7) else {
            return depths;
        };

        let flags = vsdb.payload()[5];
        if flags & (1 << 6) != 0 {
            depths |= ColorDepths::BPC_16;
        }
        if flags & (1 << 5) != 0 {
            depths |= ColorDepths::BPC_12;
        }
        if flags & (1 << 4) != 0 {
            depths |= ColorDepths::BPC_10;
        }

        trace!("HDMI VSDB deep color flags {flags:#04X}: {depths:?}");
        depths
    }

    /// Pixel encoding declared in byte 3, revision 3 and later only.
    ///
    /// The field is bits 6-4 of byte 3, which are also the basic audio,
    /// YCbCr 4:4:4 and YCbCr 4:2:2 support flags. A typical HDMI sink with
    /// basic audio reports [`ColorFormat::Undefined`], and one setting both
    /// YCbCr flags without basic audio reports [`ColorFormat::YCbCr420`].
    pub fn supported_color_format(&self) -> ColorFormat {
        if self.version() <= 2 {
            return ColorFormat::Undefined;
        }

        match (self.block[3] >> 4) & 0x07 {
            0x00 => ColorFormat::Rgb,
            0x01 => ColorFormat::YCbCr422,
            0x02 => ColorFormat::YCbCr444,
            0x03 => ColorFormat::YCbCr420,
            _ => ColorFormat::Undefined,
        }
    }

    /// Pixel encodings advertised by the HDMI Forum vendor-specific data block.
    ///
    /// Bits 1, 2 and 3 of the fourth record byte (header included) are each
    /// reported as YCbCr 4:2:0 support. That byte is also the top byte of the
    /// registration ID (0xC4), so any HF-VSDB yields YCbCr 4:2:0.
    pub fn supported_color_formats(&self) -> ColorFormats {
        let mut formats = ColorFormats::empty();

        let Some(hf_vsdb) = self.find_vendor_block(HDMI_FORUM_REGISTRATION_ID, 4) else {
            return formats;
        };

        let flags = hf_vsdb.payload()[2];
        for bit in 1..=3 {
            if flags & (1 << bit) != 0 {
                formats |= ColorFormats::YCBCR_420;
            }
        }

        formats
    }

    /// Colorimetry support from the colorimetry data block.
    ///
    /// Only the first extended-tag record with at least two payload bytes is
    /// examined. Nothing is reported unless that record is a colorimetry
    /// block of at least three payload bytes.
    pub fn supported_color_spaces(&self) -> ColorSpaces {
        let mut spaces = ColorSpaces::empty();

        let Some(extended) = self.find_data_block(|record| {
            record.kind() == DataBlockTag::Extended && record.payload().len() >= 2
        }) else {
            return spaces;
        };

        let &[COLORIMETRY_EXTENDED_TAG, flags, metadata, ..] = extended.payload() else {
            trace!(
                "Extended data block at {:#04X} is not colorimetry, no color spaces",
                extended.offset()
            );
            return spaces;
        };

        const FLAG_MAP: [ColorSpaces; 8] = [
            ColorSpaces::XVYCC_601,
            ColorSpaces::XVYCC_709,
            ColorSpaces::SYCC_601,
            ColorSpaces::OP_YCC_601,
            ColorSpaces::OP_RGB,
            ColorSpaces::BT2020_CYCC,
            ColorSpaces::BT2020_YCC,
            ColorSpaces::BT2020_RGB,
        ];

        for (bit, space) in FLAG_MAP.iter().enumerate() {
            if flags & (1 << bit) != 0 {
                spaces |= *space;
            }
        }

        if metadata & (1 << 7) != 0 {
            spaces |= ColorSpaces::DCI_P3;
        }

        spaces
    }

    /// Appends the Video Identification Codes of the video data block, in
    /// the order they are listed.
    pub fn supported_timings<E: Extend<u8>>(&self, vics: &mut E) {
        if let Some(video) = self.find_data_block(|record| record.kind() == DataBlockTag::Video) {
            vics.extend(video.payload().iter().map(|svd| svd & 0x7F));
        }
    }

    /// Audio coding formats of the audio data block's Short Audio Descriptors.
    pub fn supported_audio_formats(&self) -> AudioFormats {
        let Some(audio) = self.find_data_block(|record| record.kind() == DataBlockTag::Audio) else {
            return AudioFormats::empty();
        };

        audio
            .payload()
            .chunks_exact(3)
            .fold(AudioFormats::empty(), |formats, sad| {
                formats | Self::short_audio_descriptor_formats(sad)
            })
    }

    fn short_audio_descriptor_formats(sad: &[u8]) -> AudioFormats {
        let reader = &mut BsIoSliceReader::from_slice(sad);
        let Some(code) = reader.skip_n(1).and_then(|_| reader.get_n::<u8>(4)).ok() else {
            return AudioFormats::empty();
        };

        let byte3 = sad.get(2).copied().unwrap_or_default();

        match code {
            0x0A => {
                // MPEG Surround both implicitly and explicitly supported: taken as Atmos
                if byte3 & 0x01 != 0 {
                    AudioFormats::EAC3 | AudioFormats::DOLBY_ATMOS
                } else {
                    AudioFormats::EAC3
                }
            }
            0x0F => AudioFormats::from_extension_type_code(byte3 >> 3),
            code => AudioFormats::from_format_code(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::EXAMPLE_DATA;

    fn cea_block(version: u8, byte3: u8, records: &[u8]) -> Block {
        let mut block = Block::default();
        let bytes = block.as_bytes_mut();
        bytes[0] = CEA_EXTENSION_TAG;
        bytes[1] = version;
        bytes[2] = (4 + records.len()) as u8;
        bytes[3] = byte3;
        bytes[4..4 + records.len()].copy_from_slice(records);
        block
    }

    fn example() -> Block {
        Block::from_bytes(&EXAMPLE_DATA[128..]).unwrap()
    }

    #[test]
    fn try_new_checks_tag() {
        let block = Block::default();
        assert!(CeaExtension::try_new(&block).is_none());

        let block = example();
        let cea = CeaExtension::try_new(&block).unwrap();
        assert_eq!(cea.version(), 3);
        assert_eq!(cea.detailed_timing_descriptor_start(), 0x3B);
    }

    #[test]
    fn example_capabilities() {
        let block = example();
        let cea = CeaExtension::new(&block);

        assert_eq!(
            cea.supported_color_depths(),
            ColorDepths::BPC_12 | ColorDepths::BPC_10
        );
        assert_eq!(cea.supported_color_format(), ColorFormat::Undefined);
        assert_eq!(cea.supported_color_formats(), ColorFormats::YCBCR_420);
        // E2 00 4F comes before the colorimetry block and ends the lookup
        assert_eq!(cea.supported_color_spaces(), ColorSpaces::empty());

        let mut vics = Vec::new();
        cea.supported_timings(&mut vics);
        assert_eq!(vics, [16, 4, 31, 19, 5, 20, 97, 93]);

        assert_eq!(
            cea.supported_audio_formats(),
            AudioFormats::LPCM
                | AudioFormats::AC3
                | AudioFormats::EAC3
                | AudioFormats::DOLBY_ATMOS
                | AudioFormats::DOLBY_TRUEHD
        );
    }

    #[test]
    fn color_depths_need_hdmi_llc_and_seven_bytes() {
        // Right ID, one byte short
        let block = cea_block(3, 0, &[0x66, 0x03, 0x0C, 0x00, 0x10, 0x00, 0x70]);
        assert_eq!(CeaExtension::new(&block).supported_color_depths(), ColorDepths::empty());

        // Wrong ID
        let block = cea_block(3, 0, &[0x67, 0x03, 0x0C, 0x01, 0x10, 0x00, 0x70, 0x00]);
        assert_eq!(CeaExtension::new(&block).supported_color_depths(), ColorDepths::empty());

        let block = cea_block(3, 0, &[0x67, 0x03, 0x0C, 0x00, 0x10, 0x00, 0x70, 0x00]);
        assert_eq!(
            CeaExtension::new(&block).supported_color_depths(),
            ColorDepths::BPC_16 | ColorDepths::BPC_12 | ColorDepths::BPC_10
        );
    }

    #[test]
    fn color_depths_stop_at_first_match() {
        let block = cea_block(
            3,
            0,
            &[
                0x67, 0x03, 0x0C, 0x00, 0x10, 0x00, 0x10, 0x00, // 10 bpc
                0x67, 0x03, 0x0C, 0x00, 0x10, 0x00, 0x40, 0x00, // 16 bpc
            ],
        );
        assert_eq!(CeaExtension::new(&block).supported_color_depths(), ColorDepths::BPC_10);
    }

    #[test]
    fn color_format_field() {
        let formats: Vec<ColorFormat> = (0u8..8)
            .map(|field| cea_block(3, field << 4, &[]))
            .map(|block| CeaExtension::new(&block).supported_color_format())
            .collect();

        assert_eq!(
            formats,
            [
                ColorFormat::Rgb,
                ColorFormat::YCbCr422,
                ColorFormat::YCbCr444,
                ColorFormat::YCbCr420,
                ColorFormat::Undefined,
                ColorFormat::Undefined,
                ColorFormat::Undefined,
                ColorFormat::Undefined,
            ]
        );

        let block = cea_block(2, 0x00, &[]);
        assert_eq!(CeaExtension::new(&block).supported_color_format(), ColorFormat::Undefined);

        // Basic audio, YCbCr 4:4:4 and 4:2:2 flags set
        let block = cea_block(3, 0xF1, &[]);
        assert_eq!(CeaExtension::new(&block).supported_color_format(), ColorFormat::Undefined);

        // Both YCbCr flags, no basic audio
        let block = cea_block(3, 0x30, &[]);
        assert_eq!(CeaExtension::new(&block).supported_color_format(), ColorFormat::YCbCr420);
    }

    #[test]
    fn hdmi_forum_color_formats() {
        let block = cea_block(3, 0, &[0x64, 0xD8, 0x5D, 0xC4, 0x01]);
        assert_eq!(
            CeaExtension::new(&block).supported_color_formats(),
            ColorFormats::YCBCR_420
        );

        // HDMI LLC block is not an HF-VSDB
        let block = cea_block(3, 0, &[0x64, 0x03, 0x0C, 0x00, 0x0E]);
        assert_eq!(CeaExtension::new(&block).supported_color_formats(), ColorFormats::empty());

        // Payload too short
        let block = cea_block(3, 0, &[0x63, 0xD8, 0x5D, 0xC4]);
        assert_eq!(CeaExtension::new(&block).supported_color_formats(), ColorFormats::empty());
    }

    #[test]
    fn colorimetry_flags() {
        let block = cea_block(3, 0, &[0xE3, 0x05, 0xFF, 0x80]);
        assert_eq!(CeaExtension::new(&block).supported_color_spaces(), ColorSpaces::all() - ColorSpaces::SRGB);

        // Other blocks before it do not count
        let block = cea_block(3, 0, &[0x42, 0x10, 0x04, 0xE3, 0x05, 0x21, 0x00]);
        assert_eq!(
            CeaExtension::new(&block).supported_color_spaces(),
            ColorSpaces::XVYCC_601 | ColorSpaces::BT2020_CYCC
        );

        // An earlier extended block of another kind ends the lookup
        let block = cea_block(3, 0, &[0xE2, 0x00, 0x4F, 0xE3, 0x05, 0x21, 0x00]);
        assert_eq!(CeaExtension::new(&block).supported_color_spaces(), ColorSpaces::empty());

        // So does a colorimetry block that is too short
        let block = cea_block(3, 0, &[0xE2, 0x05, 0x01, 0xE3, 0x05, 0x01, 0x00]);
        assert_eq!(CeaExtension::new(&block).supported_color_spaces(), ColorSpaces::empty());

        // Extended blocks with a single payload byte are passed over
        let block = cea_block(3, 0, &[0xE1, 0x00, 0xE3, 0x05, 0x80, 0x80]);
        assert_eq!(
            CeaExtension::new(&block).supported_color_spaces(),
            ColorSpaces::BT2020_RGB | ColorSpaces::DCI_P3
        );
    }

    #[test]
    fn timings_mask_native_bit() {
        let block = cea_block(3, 0, &[0x23, 0x09, 0x07, 0x07, 0x43, 0x90, 0x84, 0x7F, 0x42, 0x01, 0x02]);
        let mut vics = vec![1u8];
        CeaExtension::new(&block).supported_timings(&mut vics);
        assert_eq!(vics, [1, 16, 4, 127]);

        let block = cea_block(3, 0, &[0x23, 0x09, 0x07, 0x07]);
        let mut vics = Vec::new();
        CeaExtension::new(&block).supported_timings(&mut vics);
        assert!(vics.is_empty());
    }

    #[test]
    fn eac3_with_atmos_flag() {
        let block = cea_block(3, 0, &[0x23, (0x0A << 3) | 0x07, 0x06, 0x01]);
        let formats = CeaExtension::new(&block).supported_audio_formats();
        assert!(formats.contains(AudioFormats::EAC3));
        assert!(formats.contains(AudioFormats::DOLBY_ATMOS));

        let block = cea_block(3, 0, &[0x23, (0x0A << 3) | 0x07, 0x06, 0x00]);
        assert_eq!(CeaExtension::new(&block).supported_audio_formats(), AudioFormats::EAC3);
    }

    #[test]
    fn extended_audio_type_codes() {
        let block = cea_block(
            3,
            0,
            &[
                0x29, // audio, 9 bytes
                0x7F, 0x07, 0x0C << 3, // AC-4
                0x7F, 0x07, 0x04 << 3, // HE-AAC
                0x7F, 0x07, 0x09 << 3, // unassigned
            ],
        );
        assert_eq!(
            CeaExtension::new(&block).supported_audio_formats(),
            AudioFormats::AC4 | AudioFormats::MPEG4_HE_AAC
        );
    }

    #[test]
    fn partial_descriptor_ignored() {
        let block = cea_block(3, 0, &[0x25, 0x09, 0x07, 0x07, 0x15, 0x07]);
        assert_eq!(CeaExtension::new(&block).supported_audio_formats(), AudioFormats::LPCM);
    }
}
