#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Decoder for VESA EDID 1.x base blocks and CEA-861 (CTA-861) extension blocks.
//!
//! ### Document Organization
//!
//! **Base Block**: 128 bytes with vendor identity, video input definition and
//! the preferred timing. Byte 0x7E declares how many extension blocks follow.
//! **Extension Blocks**: 128 bytes each, identified by their first byte.
//!
//! ### CEA-861 Data Blocks
//!
//! - Video (VICs)
//! - Audio (Short Audio Descriptors)
//! - Vendor-specific (HDMI LLC, HDMI Forum)
//! - Extended tag (colorimetry)
//!
//! ### Invalid Input
//!
//! Decoding never fails. A document without the fixed header reports
//! sentinel values, and malformed data blocks end the scan early.
//!
//! ## Quick Start
//!
//! 1. Populate a document with [`process::load::Loader`], or block by block
//!    through [`Edid::set_base`] and [`Edid::set_segment`]
//! 2. Query the base block fields and the capability accessors
//!
//! ```rust
//! use edid::process::{EXAMPLE_DATA, load::Loader};
//! use edid::structs::capability::{AudioFormats, ColorFormats};
//!
//! let edid = Loader::default().load(EXAMPLE_DATA)?;
//!
//! assert!(edid.is_valid());
//! println!(
//!     "{} {:04X}, {}x{}",
//!     edid.manufacturer(),
//!     edid.product_code(),
//!     edid.preferred_width_in_pixels(),
//!     edid.preferred_height_in_pixels()
//! );
//!
//! assert!(edid.supported_color_formats().contains(ColorFormats::YCBCR_420));
//! assert!(edid.supported_audio_formats().contains(AudioFormats::DOLBY_ATMOS));
//!
//! let mut vics = Vec::new();
//! edid.supported_timings(&mut vics);
//! assert_eq!(vics[0], 16);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// The decoded EDID document.
///
/// [`Edid`] owns the base block and the extension blocks and exposes every
/// accessor, with sentinel values for invalid documents.
pub mod document;

/// Populating documents from raw dumps.
///
/// **Loading** ([`process::load`]): Splits a flat buffer into blocks and
/// reports structural problems at a configurable fail level.
pub mod process;

/// Data structures representing EDID format components.
///
/// - **Blocks** ([`structs::block`]): Fixed 128-byte blocks
/// - **Extensions** ([`structs::extensions`]): Gap-filling extension storage and cursor
/// - **CEA Extension** ([`structs::cea`]): CEA-861 capability decoding
/// - **Data Blocks** ([`structs::data_block`]): CEA data block scanner
/// - **Capabilities** ([`structs::capability`]): Enumerations and bit sets
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Bitstream I/O** ([`utils::bitstream_io`]): Bit-level reading
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;

pub use document::Edid;
