//! Capability values reported by the decoder.
//!
//! Single-valued fields decode to enumerations; capability lists decode to
//! bit sets so results from the base block and the CEA extension can be
//! combined with `|`.

use std::fmt::{Display, Formatter};

use bitflags::bitflags;

/// Color bit depth declared by a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    #[default]
    Undefined,
    Bpc6,
    Bpc8,
    Bpc10,
    Bpc12,
    Bpc14,
    Bpc16,
}

impl ColorDepth {
    /// Maps the 3-bit depth field of the video input definition.
    pub fn from_field(value: u8) -> Self {
        match value & 0x07 {
            1 => Self::Bpc6,
            2 => Self::Bpc8,
            3 => Self::Bpc10,
            4 => Self::Bpc12,
            5 => Self::Bpc14,
            6 => Self::Bpc16,
            _ => Self::Undefined,
        }
    }

    /// Bits per primary color, 0 when undefined.
    pub fn bits(self) -> u8 {
        match self {
            Self::Undefined => 0,
            Self::Bpc6 => 6,
            Self::Bpc8 => 8,
            Self::Bpc10 => 10,
            Self::Bpc12 => 12,
            Self::Bpc14 => 14,
            Self::Bpc16 => 16,
        }
    }
}

impl Display for ColorDepth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            depth => write!(f, "{} bpc", depth.bits()),
        }
    }
}

bitflags! {
    /// Set of supported color depths.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ColorDepths: u8 {
        const BPC_6 = 1 << 0;
        const BPC_8 = 1 << 1;
        const BPC_10 = 1 << 2;
        const BPC_12 = 1 << 3;
        const BPC_14 = 1 << 4;
        const BPC_16 = 1 << 5;
    }
}

impl From<ColorDepth> for ColorDepths {
    fn from(depth: ColorDepth) -> Self {
        match depth {
            ColorDepth::Undefined => Self::empty(),
            ColorDepth::Bpc6 => Self::BPC_6,
            ColorDepth::Bpc8 => Self::BPC_8,
            ColorDepth::Bpc10 => Self::BPC_10,
            ColorDepth::Bpc12 => Self::BPC_12,
            ColorDepth::Bpc14 => Self::BPC_14,
            ColorDepth::Bpc16 => Self::BPC_16,
        }
    }
}

/// Pixel encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFormat {
    #[default]
    Undefined,
    Rgb,
    YCbCr422,
    YCbCr444,
    YCbCr420,
}

impl Display for ColorFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Rgb => write!(f, "RGB"),
            Self::YCbCr422 => write!(f, "YCbCr 4:2:2"),
            Self::YCbCr444 => write!(f, "YCbCr 4:4:4"),
            Self::YCbCr420 => write!(f, "YCbCr 4:2:0"),
        }
    }
}

bitflags! {
    /// Set of supported pixel encodings.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ColorFormats: u8 {
        const RGB = 1 << 0;
        const YCBCR_422 = 1 << 1;
        const YCBCR_444 = 1 << 2;
        const YCBCR_420 = 1 << 3;
    }
}

impl From<ColorFormat> for ColorFormats {
    fn from(format: ColorFormat) -> Self {
        match format {
            ColorFormat::Undefined => Self::empty(),
            ColorFormat::Rgb => Self::RGB,
            ColorFormat::YCbCr422 => Self::YCBCR_422,
            ColorFormat::YCbCr444 => Self::YCBCR_444,
            ColorFormat::YCbCr420 => Self::YCBCR_420,
        }
    }
}

bitflags! {
    /// Set of supported colorimetry standards.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ColorSpaces: u16 {
        const SRGB = 1 << 0;
        const XVYCC_601 = 1 << 1;
        const XVYCC_709 = 1 << 2;
        const SYCC_601 = 1 << 3;
        const OP_YCC_601 = 1 << 4;
        const OP_RGB = 1 << 5;
        const BT2020_CYCC = 1 << 6;
        const BT2020_YCC = 1 << 7;
        const BT2020_RGB = 1 << 8;
        const DCI_P3 = 1 << 9;
    }
}

bitflags! {
    /// Set of supported audio coding formats.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AudioFormats: u32 {
        const LPCM = 1 << 0;
        const AC3 = 1 << 1;
        const MPEG1 = 1 << 2;
        const MP3 = 1 << 3;
        const MPEG2 = 1 << 4;
        const AAC_LC = 1 << 5;
        const DTS = 1 << 6;
        const ATRAC = 1 << 7;
        const SUPER_AUDIO_CD = 1 << 8;
        const EAC3 = 1 << 9;
        const DTS_HD = 1 << 10;
        const DOLBY_TRUEHD = 1 << 11;
        const DST_AUDIO = 1 << 12;
        const WMA_PRO = 1 << 13;
        const MPEG4_HE_AAC = 1 << 14;
        const MPEG4_HE_AAC_V2 = 1 << 15;
        const MPEG4_AAC_LC = 1 << 16;
        const DRA = 1 << 17;
        const MPEG4_HE_AAC_MPEG_SURROUND = 1 << 18;
        const MPEG4_AAC_LC_MPEG_SURROUND = 1 << 19;
        const MPEGH_3D_AUDIO = 1 << 20;
        const AC4 = 1 << 21;
        const LPCM_3D_AUDIO = 1 << 22;
        const DOLBY_ATMOS = 1 << 23;
    }
}

impl AudioFormats {
    /// Maps a Short Audio Descriptor format code (bits 6-3 of its first byte).
    ///
    /// Code 0x0F defers to the extension type code; see
    /// [`AudioFormats::from_extension_type_code`].
    pub fn from_format_code(code: u8) -> Self {
        match code {
            0x01 => Self::LPCM,
            0x02 => Self::AC3,
            0x03 => Self::MPEG1,
            0x04 => Self::MP3,
            0x05 => Self::MPEG2,
            0x06 => Self::AAC_LC,
            0x07 => Self::DTS,
            0x08 => Self::ATRAC,
            0x09 => Self::SUPER_AUDIO_CD,
            0x0A => Self::EAC3,
            0x0B => Self::DTS_HD,
            0x0C => Self::DOLBY_TRUEHD,
            0x0D => Self::DST_AUDIO,
            0x0E => Self::WMA_PRO,
            _ => Self::empty(),
        }
    }

    /// Maps the extension type code (bits 7-3 of the third SAD byte) used
    /// with format code 0x0F.
    pub fn from_extension_type_code(code: u8) -> Self {
        match code {
            0x04 => Self::MPEG4_HE_AAC,
            0x05 => Self::MPEG4_HE_AAC_V2,
            0x06 => Self::MPEG4_AAC_LC,
            0x07 => Self::DRA,
            0x08 => Self::MPEG4_HE_AAC_MPEG_SURROUND,
            0x0A => Self::MPEG4_AAC_LC_MPEG_SURROUND,
            0x0B => Self::MPEGH_3D_AUDIO,
            0x0C => Self::AC4,
            0x0D => Self::LPCM_3D_AUDIO,
            _ => Self::empty(),
        }
    }
}

/// Digital video interface standard (EDID 1.4 video input definition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoInterface {
    #[default]
    Undefined,
    Dvi,
    HdmiA,
    HdmiB,
    Mddi,
    DisplayPort,
    Reserved(u8),
}

impl From<u8> for VideoInterface {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0x00 => Self::Undefined,
            0x01 => Self::Dvi,
            0x02 => Self::HdmiA,
            0x03 => Self::HdmiB,
            0x04 => Self::Mddi,
            0x05 => Self::DisplayPort,
            other => Self::Reserved(other),
        }
    }
}

impl Display for VideoInterface {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Dvi => write!(f, "DVI"),
            Self::HdmiA => write!(f, "HDMI-a"),
            Self::HdmiB => write!(f, "HDMI-b"),
            Self::Mddi => write!(f, "MDDI"),
            Self::DisplayPort => write!(f, "DisplayPort"),
            Self::Reserved(v) => write!(f, "Reserved({v:X})"),
        }
    }
}

#[test]
fn color_depth_table() {
    let bits: Vec<u8> = (0..8).map(|v| ColorDepth::from_field(v).bits()).collect();
    assert_eq!(bits, [0, 6, 8, 10, 12, 14, 16, 0]);

    assert_eq!(ColorDepths::from(ColorDepth::Undefined), ColorDepths::empty());
    assert_eq!(ColorDepths::from(ColorDepth::Bpc10), ColorDepths::BPC_10);
    assert_eq!(format!("{}", ColorDepth::Bpc12), "12 bpc");
}

#[test]
fn audio_code_tables() {
    assert_eq!(AudioFormats::from_format_code(0x00), AudioFormats::empty());
    assert_eq!(AudioFormats::from_format_code(0x0C), AudioFormats::DOLBY_TRUEHD);
    assert_eq!(AudioFormats::from_format_code(0x0F), AudioFormats::empty());
    assert_eq!(AudioFormats::from_extension_type_code(0x09), AudioFormats::empty());
    assert_eq!(AudioFormats::from_extension_type_code(0x0C), AudioFormats::AC4);

    let mapped = (0x01..=0x0E)
        .map(AudioFormats::from_format_code)
        .fold(AudioFormats::empty(), |acc, f| acc | f);
    assert_eq!(mapped.bits().count_ones(), 14);
}

#[test]
fn video_interface_values() {
    assert_eq!(VideoInterface::from(0xA2), VideoInterface::HdmiA);
    assert_eq!(VideoInterface::from(0x01), VideoInterface::Dvi);
    assert_eq!(VideoInterface::from(0x0F), VideoInterface::Reserved(0x0F));
    assert_eq!(format!("{}", VideoInterface::DisplayPort), "DisplayPort");
}
