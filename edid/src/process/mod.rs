/// Populating documents from raw byte dumps.
///
/// Provides the [`Loader`](load::Loader) for splitting a flat buffer into the
/// base block and extension blocks of an [`Edid`](crate::document::Edid).
pub mod load;

/// Two-block EDID: an HDMI display with a CEA-861 extension.
pub const EXAMPLE_DATA: &[u8] = &[
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x4C, 0x2D, 0x10, 0x0F, 0x0D, 0x0C, 0x0B, 0x0A,
    0x1A, 0x1E, 0x01, 0x04, 0xA2, 0x79, 0x44, 0x78, 0x0E, 0xEE, 0x91, 0xA3, 0x54, 0x4C, 0x99, 0x26,
    0x0F, 0x50, 0x54, 0xBD, 0xEF, 0x80, 0x71, 0x4F, 0x81, 0xC0, 0x81, 0x00, 0x81, 0x80, 0x95, 0x00,
    0xA9, 0xC0, 0xB3, 0x00, 0x01, 0x01, 0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C,
    0x45, 0x00, 0x20, 0xC2, 0x31, 0x00, 0x00, 0x1E, 0x00, 0x00, 0x00, 0xFD, 0x00, 0x18, 0x4B, 0x0F,
    0x51, 0x17, 0x00, 0x0A, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00, 0x00, 0xFC, 0x00, 0x53,
    0x41, 0x4D, 0x53, 0x55, 0x4E, 0x47, 0x0A, 0x20, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00, 0x00, 0xFF,
    0x00, 0x48, 0x34, 0x5A, 0x52, 0x30, 0x30, 0x30, 0x30, 0x30, 0x31, 0x0A, 0x20, 0x20, 0x01, 0xAC,
    0x02, 0x03, 0x3B, 0xF1, 0x48, 0x90, 0x04, 0x1F, 0x13, 0x05, 0x14, 0x61, 0x5D, 0x2C, 0x09, 0x07,
    0x07, 0x15, 0x07, 0x50, 0x57, 0x06, 0x01, 0x67, 0x7E, 0x01, 0x83, 0x4F, 0x00, 0x00, 0x67, 0x03,
    0x0C, 0x00, 0x10, 0x00, 0xB8, 0x3C, 0x66, 0xD8, 0x5D, 0xC4, 0x01, 0x78, 0x03, 0xE2, 0x00, 0x4F,
    0xE3, 0x05, 0xC0, 0x00, 0xE6, 0x06, 0x0D, 0x01, 0x00, 0x00, 0x00, 0x02, 0x3A, 0x80, 0x18, 0x71,
    0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0x20, 0xC2, 0x31, 0x00, 0x00, 0x1E, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x19,
];
