//! EDID document: base block plus extension blocks.
//!
//! ## Base block layout
//!
//! | Offset | Field |
//! |---|---|
//! | 0x00-0x07 | Header `00 FF FF FF FF FF FF 00` |
//! | 0x08-0x09 | Manufacturer ID, three 5-bit letters, big-endian |
//! | 0x0A-0x0B | Product code, little-endian |
//! | 0x0C-0x0F | Serial number, little-endian |
//! | 0x10 | Week of manufacture (0xFF: model year) |
//! | 0x11 | Year of manufacture or model year, minus 1990 |
//! | 0x12-0x13 | EDID version and revision |
//! | 0x14 | Video input definition |
//! | 0x15-0x16 | Screen width and height in centimeters |
//! | 0x18 | Feature support |
//! | 0x36-0x47 | First detailed timing descriptor (preferred timing) |
//! | 0x7E | Number of extension blocks |
//!
//! Every accessor checks the header first. On an invalid document the
//! accessors return fixed sentinels instead of reading the buffer.

use anyhow::{Result, bail};
use log::{debug, trace};

use crate::structs::block::{BLOCK_SIZE, Block};
use crate::structs::capability::{
    AudioFormats, ColorDepth, ColorDepths, ColorFormat, ColorFormats, ColorSpaces, VideoInterface,
};
use crate::structs::cea::{CEA_EXTENSION_TAG, CeaExtension};
use crate::structs::extensions::{ExtensionBlocks, Extensions};
use crate::utils::bitstream_io::BsIoSliceReader;
use crate::utils::errors::EdidError;

/// Fixed header at the start of every base block.
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Byte 0 of an empty document; anything non-zero fails the header check.
const EMPTY_MARKER: u8 = 0x55;

/// Decoded view over a base block and its extension blocks.
///
/// # Example
///
/// ```rust
/// use edid::Edid;
/// use edid::process::EXAMPLE_DATA;
///
/// let mut edid = Edid::default();
/// edid.set_base(&EXAMPLE_DATA[..128])?;
/// edid.set_segment(1, &EXAMPLE_DATA[128..256])?;
///
/// assert!(edid.is_valid());
/// assert_eq!(edid.manufacturer(), "SAM");
/// assert_eq!(edid.preferred_width_in_pixels(), 1920);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edid {
    base: Block,
    extensions: ExtensionBlocks,
}

impl Default for Edid {
    fn default() -> Self {
        let mut base = Block::default();
        base.as_bytes_mut()[0] = EMPTY_MARKER;

        Self {
            base,
            extensions: ExtensionBlocks::default(),
        }
    }
}

impl Edid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the 8-byte header. The other accessors are only meaningful
    /// when this returns `true`.
    pub fn is_valid(&self) -> bool {
        self.base.range(0, EDID_HEADER.len()) == EDID_HEADER
    }

    /// Returns the document to its empty, invalid state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Copies one block into the base block.
    pub fn set_base(&mut self, bytes: &[u8]) -> Result<()> {
        self.base.fill(bytes)
    }

    /// Copies one block into `segment`; segment 0 is the base block.
    ///
    /// Extension segments may be filled in any order, see
    /// [`Edid::segment_mut`].
    pub fn set_segment(&mut self, segment: u8, bytes: &[u8]) -> Result<()> {
        let segments = self.segments();
        let Some(block) = self.segment_mut(segment) else {
            bail!(EdidError::SegmentOutOfRange {
                index: segment as u16,
                segments,
            });
        };

        block.fill(bytes)
    }

    /// Mutable access to the block for `segment`, for callers that fill
    /// blocks in place.
    ///
    /// Segment 0 is the base block. Extension segments below
    /// [`Edid::segments`] are created on demand; any missing lower segment
    /// is created as a zeroed placeholder. The base block must be filled
    /// first, since it declares how many segments exist.
    pub fn segment_mut(&mut self, segment: u8) -> Option<&mut Block> {
        if segment == 0 {
            return Some(&mut self.base);
        }

        if segment as u16 >= self.segments() {
            debug!(
                "Segment {segment} requested, base block declares {}",
                self.segments()
            );
            return None;
        }

        Some(self.extensions.ensure(segment as usize))
    }

    /// Number of blocks declared by the base block, base included.
    ///
    /// An invalid document reports 1, which does not mean it has an
    /// extension block.
    pub fn segments(&self) -> u16 {
        if self.is_valid() {
            self.base[0x7E] as u16 + 1
        } else {
            1
        }
    }

    /// Size of one block.
    pub fn length(&self) -> usize {
        BLOCK_SIZE
    }

    pub fn base(&self) -> &Block {
        &self.base
    }

    /// Cursor over the stored extension blocks, in segment order.
    pub fn extensions(&self) -> Extensions<'_> {
        self.extensions.iter()
    }

    /// First extension block carrying the CEA tag, `None` when invalid.
    pub fn cea_segment(&self) -> Option<&Block> {
        if !self.is_valid() {
            return None;
        }

        self.extensions()
            .find(|block| block.tag() == CEA_EXTENSION_TAG)
    }

    pub fn cea_extension(&self) -> Option<CeaExtension<'_>> {
        self.cea_segment().map(CeaExtension::new)
    }

    /// Flattens the base block and the extension blocks, in segment order,
    /// into `out`.
    ///
    /// Copies as many whole or partial blocks as fit and returns the number
    /// of bytes written; nothing is written for an invalid document.
    pub fn raw(&self, out: &mut [u8]) -> usize {
        if !self.is_valid() {
            return 0;
        }

        let mut written = 0;
        for block in std::iter::once(&self.base).chain(self.extensions.as_slice()) {
            if written >= out.len() {
                break;
            }

            let count = BLOCK_SIZE.min(out.len() - written);
            out[written..written + count].copy_from_slice(&block.as_ref()[..count]);
            written += count;
        }

        trace!("Flattened {written} byte(s) of EDID data");
        written
    }

    /// Three-letter PNP manufacturer ID, empty when invalid.
    pub fn manufacturer(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }

        let reader = &mut BsIoSliceReader::from_slice(self.base.range(0x08, 2));
        let mut manufacturer = String::with_capacity(3);

        // Reserved, always 0
        if reader.get().is_err() {
            return manufacturer;
        }

        while let Ok(letter) = reader.get_n::<u8>(5) {
            manufacturer.push(char::from(b'A' + (letter.wrapping_sub(1) & 0x1F)));
        }

        manufacturer
    }

    /// Product code, all bits set when invalid.
    pub fn product_code(&self) -> u16 {
        if self.is_valid() {
            self.base.u16_le(0x0A)
        } else {
            u16::MAX
        }
    }

    /// Serial number, all bits set when invalid.
    pub fn serial(&self) -> u32 {
        if self.is_valid() {
            self.base.u32_le(0x0C)
        } else {
            u32::MAX
        }
    }

    /// Week of manufacture. 0xFF means [`Edid::year`] is a model year.
    pub fn week(&self) -> u8 {
        self.base_byte(0x10)
    }

    pub fn year(&self) -> u16 {
        if self.is_valid() {
            1990 + self.base[0x11] as u16
        } else {
            0
        }
    }

    pub fn version_major(&self) -> u8 {
        self.base_byte(0x12)
    }

    pub fn version_minor(&self) -> u8 {
        self.base_byte(0x13)
    }

    pub fn is_digital(&self) -> bool {
        self.base_byte(0x14) & 0x80 != 0
    }

    /// Bits per primary color of a digital input, 0 when undefined.
    pub fn bits_per_color(&self) -> u8 {
        self.color_depth().bits()
    }

    /// Color bit depth of a digital input.
    pub fn color_depth(&self) -> ColorDepth {
        if !self.is_digital() {
            return ColorDepth::Undefined;
        }

        ColorDepth::from_field(self.base[0x14] >> 4)
    }

    /// Digital interface standard of a digital input.
    pub fn video_interface(&self) -> VideoInterface {
        if !self.is_digital() {
            return VideoInterface::Undefined;
        }

        VideoInterface::from(self.base[0x14])
    }

    pub fn width_in_centimeters(&self) -> u8 {
        self.base_byte(0x15)
    }

    pub fn height_in_centimeters(&self) -> u8 {
        self.base_byte(0x16)
    }

    /// Horizontal active pixels of the preferred (first detailed) timing.
    pub fn preferred_width_in_pixels(&self) -> u16 {
        self.twelve_bit(0x38, 0x3A)
    }

    /// Vertical active lines of the preferred (first detailed) timing.
    pub fn preferred_height_in_pixels(&self) -> u16 {
        self.twelve_bit(0x3B, 0x3D)
    }

    pub fn supported_color_depths(&self) -> ColorDepths {
        match self.cea_extension() {
            Some(cea) => cea.supported_color_depths(),
            None => self.color_depth().into(),
        }
    }

    pub fn supported_color_format(&self) -> ColorFormat {
        self.cea_extension()
            .map_or(ColorFormat::Undefined, |cea| cea.supported_color_format())
    }

    /// Pixel encodings from the feature support byte of a digital input.
    /// RGB 4:4:4 is always included.
    pub fn supported_digital_display_types(&self) -> ColorFormats {
        if !self.is_valid() {
            return ColorFormats::empty();
        }

        let mut formats = ColorFormats::RGB;

        if self.is_digital() {
            match (self.base[0x18] >> 3) & 0x07 {
                0x01 => formats |= ColorFormats::YCBCR_444,
                0x02 => formats |= ColorFormats::YCBCR_422,
                0x03 => formats |= ColorFormats::YCBCR_444 | ColorFormats::YCBCR_422,
                _ => {}
            }
        }

        formats
    }

    pub fn supported_color_formats(&self) -> ColorFormats {
        let display_types = self.supported_digital_display_types();

        match self.cea_extension() {
            Some(cea) => {
                ColorFormats::from(cea.supported_color_format())
                    | cea.supported_color_formats()
                    | display_types
            }
            None => display_types,
        }
    }

    pub fn supported_color_space(&self) -> ColorSpaces {
        match self.cea_extension() {
            Some(cea) => cea.supported_color_spaces(),
            None if self.base_byte(0x18) & (1 << 2) != 0 => ColorSpaces::SRGB,
            None => ColorSpaces::empty(),
        }
    }

    /// Appends the Video Identification Codes of the CEA extension, if any.
    pub fn supported_timings<E: Extend<u8>>(&self, vics: &mut E) {
        if let Some(cea) = self.cea_extension() {
            cea.supported_timings(vics);
        }
    }

    pub fn supported_audio_formats(&self) -> AudioFormats {
        self.cea_extension()
            .map_or(AudioFormats::empty(), |cea| cea.supported_audio_formats())
    }

    #[inline(always)]
    fn base_byte(&self, offset: usize) -> u8 {
        if self.is_valid() { self.base[offset] } else { 0 }
    }

    #[inline(always)]
    fn twelve_bit(&self, low: usize, high: usize) -> u16 {
        ((self.base_byte(high) as u16 & 0xF0) << 4) | self.base_byte(low) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::EXAMPLE_DATA;

    fn example() -> Edid {
        let mut edid = Edid::default();
        edid.set_base(&EXAMPLE_DATA[..128]).unwrap();
        edid.set_segment(1, &EXAMPLE_DATA[128..]).unwrap();
        edid
    }

    fn base_only(patch: &[(usize, u8)]) -> Edid {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[..8].copy_from_slice(&EDID_HEADER);
        for &(offset, value) in patch {
            bytes[offset] = value;
        }

        let mut edid = Edid::default();
        edid.set_base(&bytes).unwrap();
        edid
    }

    fn assert_sentinels(edid: &Edid) {
        assert!(!edid.is_valid());
        assert_eq!(edid.manufacturer(), "");
        assert_eq!(edid.product_code(), 0xFFFF);
        assert_eq!(edid.serial(), 0xFFFF_FFFF);
        assert_eq!(edid.week(), 0);
        assert_eq!(edid.year(), 0);
        assert_eq!(edid.version_major(), 0);
        assert_eq!(edid.version_minor(), 0);
        assert!(!edid.is_digital());
        assert_eq!(edid.bits_per_color(), 0);
        assert_eq!(edid.color_depth(), ColorDepth::Undefined);
        assert_eq!(edid.video_interface(), VideoInterface::Undefined);
        assert_eq!(edid.width_in_centimeters(), 0);
        assert_eq!(edid.height_in_centimeters(), 0);
        assert_eq!(edid.preferred_width_in_pixels(), 0);
        assert_eq!(edid.preferred_height_in_pixels(), 0);
        assert_eq!(edid.segments(), 1);
        assert_eq!(edid.supported_digital_display_types(), ColorFormats::empty());
        assert!(edid.cea_segment().is_none());
        assert!(edid.cea_extension().is_none());
        assert_eq!(edid.supported_color_depths(), ColorDepths::empty());
        assert_eq!(edid.supported_color_format(), ColorFormat::Undefined);
        assert_eq!(edid.supported_color_formats(), ColorFormats::empty());
        assert_eq!(edid.supported_color_space(), ColorSpaces::empty());
        assert_eq!(edid.supported_audio_formats(), AudioFormats::empty());

        let mut vics = Vec::new();
        edid.supported_timings(&mut vics);
        assert!(vics.is_empty());
        assert_eq!(edid.raw(&mut [0u8; 256]), 0);
    }

    #[test]
    fn empty_document_is_invalid() {
        assert_sentinels(&Edid::default());
    }

    #[test]
    fn bad_header_gives_sentinels() {
        for corrupt in 0..8 {
            let mut bytes: [u8; BLOCK_SIZE] = EXAMPLE_DATA[..128].try_into().unwrap();
            bytes[corrupt] ^= 0x01;
            bytes[0x7E] = 0x05;

            let mut edid = Edid::default();
            edid.set_base(&bytes).unwrap();
            assert_sentinels(&edid);
        }
    }

    #[test]
    fn example_base_fields() {
        let edid = example();

        assert!(edid.is_valid());
        assert_eq!(edid.manufacturer(), "SAM");
        assert_eq!(edid.product_code(), 0x0F10);
        assert_eq!(edid.serial(), 0x0A0B_0C0D);
        assert_eq!(edid.week(), 26);
        assert_eq!(edid.year(), 2020);
        assert_eq!((edid.version_major(), edid.version_minor()), (1, 4));
        assert!(edid.is_digital());
        assert_eq!(edid.color_depth(), ColorDepth::Bpc8);
        assert_eq!(edid.bits_per_color(), 8);
        assert_eq!(edid.video_interface(), VideoInterface::HdmiA);
        assert_eq!(edid.width_in_centimeters(), 121);
        assert_eq!(edid.height_in_centimeters(), 68);
        assert_eq!(edid.preferred_width_in_pixels(), 1920);
        assert_eq!(edid.preferred_height_in_pixels(), 1080);
        assert_eq!(edid.segments(), 2);
        assert_eq!(edid.length(), 128);
    }

    #[test]
    fn example_capabilities() {
        let edid = example();

        assert_eq!(
            edid.supported_color_depths(),
            ColorDepths::BPC_12 | ColorDepths::BPC_10
        );
        assert_eq!(edid.supported_color_format(), ColorFormat::Undefined);
        assert_eq!(
            edid.supported_digital_display_types(),
            ColorFormats::RGB | ColorFormats::YCBCR_444
        );
        assert_eq!(
            edid.supported_color_formats(),
            ColorFormats::RGB | ColorFormats::YCBCR_444 | ColorFormats::YCBCR_420
        );
        assert_eq!(edid.supported_color_space(), ColorSpaces::empty());

        let mut vics = Vec::new();
        edid.supported_timings(&mut vics);
        assert_eq!(vics, [16, 4, 31, 19, 5, 20, 97, 93]);

        assert!(edid.supported_audio_formats().contains(AudioFormats::DOLBY_ATMOS));
    }

    #[test]
    fn manufacturer_letters() {
        // 0 10011 00001 01101: groups 19, 1, 13
        let edid = base_only(&[(0x08, 0x4C), (0x09, 0x2D)]);
        assert_eq!(edid.manufacturer(), "SAM");

        for (hi, lo) in [(0x04u8, 0x43u8), (0x10, 0xAC), (0x7F, 0xFF), (0x00, 0x00)] {
            let value = u16::from_be_bytes([hi, lo]);
            let expected: String = [10u16, 5, 0]
                .iter()
                .map(|shift| {
                    let group = ((value >> shift) & 0x1F) as u8;
                    char::from(b'A' + (group.wrapping_sub(1) & 0x1F))
                })
                .collect();

            let edid = base_only(&[(0x08, hi), (0x09, lo)]);
            assert_eq!(edid.manufacturer(), expected);
        }

        assert_eq!(base_only(&[(0x08, 0x04), (0x09, 0x43)]).manufacturer(), "ABC");
        assert_eq!(base_only(&[(0x08, 0x10), (0x09, 0xAC)]).manufacturer(), "DEL");
    }

    #[test]
    fn preferred_resolution_nibbles() {
        let edid = base_only(&[(0x38, 0x20), (0x3A, 0x1F), (0x3B, 0x00), (0x3D, 0xA5)]);
        assert_eq!(edid.preferred_width_in_pixels(), 0x120);
        assert_eq!(edid.preferred_height_in_pixels(), 0xA00);
    }

    #[test]
    fn analog_input_has_no_depth() {
        let edid = base_only(&[(0x14, 0x6F), (0x18, 0x18)]);
        assert!(!edid.is_digital());
        assert_eq!(edid.color_depth(), ColorDepth::Undefined);
        assert_eq!(edid.video_interface(), VideoInterface::Undefined);
        assert_eq!(edid.supported_digital_display_types(), ColorFormats::RGB);
        assert_eq!(edid.supported_color_depths(), ColorDepths::empty());
    }

    #[test]
    fn base_only_fallbacks() {
        let edid = base_only(&[(0x14, 0xB5), (0x18, 0x1C)]);

        assert!(edid.cea_segment().is_none());
        assert_eq!(edid.supported_color_depths(), ColorDepths::BPC_10);
        assert_eq!(edid.supported_color_format(), ColorFormat::Undefined);
        assert_eq!(
            edid.supported_color_formats(),
            ColorFormats::RGB | ColorFormats::YCBCR_444 | ColorFormats::YCBCR_422
        );
        assert_eq!(edid.supported_color_space(), ColorSpaces::SRGB);
        assert_eq!(edid.supported_audio_formats(), AudioFormats::empty());

        let mut vics = vec![7u8];
        edid.supported_timings(&mut vics);
        assert_eq!(vics, [7]);
    }

    #[test]
    fn segments_quirk() {
        let edid = base_only(&[(0x7E, 0xFF)]);
        assert_eq!(edid.segments(), 256);

        let mut edid = Edid::default();
        edid.base.as_bytes_mut()[0x7E] = 0x03;
        assert_eq!(edid.segments(), 1);
    }

    #[test]
    fn segment_range_and_gaps() -> Result<()> {
        let mut edid = base_only(&[(0x7E, 3)]);
        let mut cea = [0u8; BLOCK_SIZE];
        cea[0] = CEA_EXTENSION_TAG;
        cea[1] = 3;

        edid.set_segment(3, &cea)?;
        assert_eq!(edid.extensions().count(), 3);
        assert_eq!(edid.extensions().map(Block::tag).collect::<Vec<_>>(), [0, 0, 2]);
        assert_eq!(edid.cea_segment().map(|b| b[1]), Some(3));

        let err = edid.set_segment(4, &cea).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EdidError>(),
            Some(&EdidError::SegmentOutOfRange {
                index: 4,
                segments: 4
            })
        );
        assert!(edid.segment_mut(4).is_none());

        // Segment 0 is the base block
        edid.set_segment(0, &EXAMPLE_DATA[..128])?;
        assert_eq!(edid.manufacturer(), "SAM");
        Ok(())
    }

    #[test]
    fn first_cea_block_wins() -> Result<()> {
        let mut edid = base_only(&[(0x7E, 2)]);
        let mut other = [0u8; BLOCK_SIZE];
        other[0] = 0xF0;
        edid.set_segment(1, &other)?;
        edid.set_segment(2, &EXAMPLE_DATA[128..])?;

        let cea = edid.cea_extension().unwrap();
        assert_eq!(cea.detailed_timing_descriptor_start(), 0x3B);
        Ok(())
    }

    #[test]
    fn raw_copies_whole_and_partial_blocks() {
        let edid = example();

        let mut exact = [0u8; 256];
        assert_eq!(edid.raw(&mut exact), 256);
        assert_eq!(&exact[..], EXAMPLE_DATA);

        let mut partial = [0u8; 200];
        assert_eq!(edid.raw(&mut partial), 200);
        assert_eq!(&partial[..], &EXAMPLE_DATA[..200]);

        let mut short = [0u8; 64];
        assert_eq!(edid.raw(&mut short), 64);
        assert_eq!(&short[..], &EXAMPLE_DATA[..64]);

        let mut large = [0xEEu8; 300];
        assert_eq!(edid.raw(&mut large), 256);
        assert!(large[256..].iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn raw_round_trip() -> Result<()> {
        let edid = example();
        let mut buffer = vec![0u8; BLOCK_SIZE * edid.segments() as usize];
        assert_eq!(edid.raw(&mut buffer), buffer.len());

        let mut copy = Edid::default();
        copy.set_base(&buffer[..BLOCK_SIZE])?;
        for (index, chunk) in buffer.chunks_exact(BLOCK_SIZE).enumerate().skip(1) {
            copy.set_segment(index as u8, chunk)?;
        }

        assert_eq!(copy, edid);
        assert_eq!(copy.manufacturer(), edid.manufacturer());
        assert_eq!(copy.serial(), edid.serial());
        assert_eq!(copy.supported_color_formats(), edid.supported_color_formats());
        assert_eq!(copy.supported_audio_formats(), edid.supported_audio_formats());
        Ok(())
    }

    #[test]
    fn raw_round_trip_with_gap() -> Result<()> {
        let mut edid = base_only(&[(0x08, 0x4C), (0x09, 0x2D), (0x7E, 3)]);
        let mut other = [0u8; BLOCK_SIZE];
        other[0] = 0xF0;
        other[127] = 0x10;
        edid.set_segment(1, &other)?;
        edid.set_segment(3, &EXAMPLE_DATA[128..])?;

        let mut buffer = vec![0u8; BLOCK_SIZE * edid.segments() as usize];
        assert_eq!(edid.raw(&mut buffer), 4 * BLOCK_SIZE);
        assert!(buffer[2 * BLOCK_SIZE..3 * BLOCK_SIZE].iter().all(|&b| b == 0));
        assert_eq!(&buffer[3 * BLOCK_SIZE..], &EXAMPLE_DATA[128..]);

        let mut copy = Edid::default();
        copy.set_base(&buffer[..BLOCK_SIZE])?;
        for (index, chunk) in buffer.chunks_exact(BLOCK_SIZE).enumerate().skip(1) {
            copy.set_segment(index as u8, chunk)?;
        }

        assert_eq!(copy, edid);
        assert_eq!(copy.extensions().count(), 3);
        assert_eq!(copy.manufacturer(), "SAM");
        assert_eq!(copy.supported_audio_formats(), edid.supported_audio_formats());
        Ok(())
    }

    #[test]
    fn invalidated_base_hides_extensions() -> Result<()> {
        let mut edid = example();
        edid.set_base(&[0x55; BLOCK_SIZE])?;
        assert_eq!(edid.extensions().count(), 1);
        assert_sentinels(&edid);

        let mut edid = example();
        edid.set_segment(0, &[0x00; BLOCK_SIZE])?;
        assert_sentinels(&edid);

        let mut edid = example();
        if let Some(base) = edid.segment_mut(0) {
            base.as_bytes_mut()[3] = 0x00;
        }
        assert_sentinels(&edid);
        Ok(())
    }

    #[test]
    fn clear_resets() {
        let mut edid = example();
        edid.clear();
        assert_sentinels(&edid);
        assert_eq!(edid.extensions().count(), 0);
        assert_eq!(edid, Edid::default());
    }
}
