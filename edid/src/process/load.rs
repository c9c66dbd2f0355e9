use crate::document::Edid;
use crate::log_or_err;
use crate::structs::block::BLOCK_SIZE;
use crate::utils::errors::EdidError;
use anyhow::{Result, bail};
use log::debug;

/// Builds an [`Edid`] from a flat dump of consecutive 128-byte blocks.
///
/// The first block becomes the base block and each following complete block
/// the next extension segment, up to the count the base block declares.
///
/// # Example
///
/// ```rust
/// use edid::process::EXAMPLE_DATA;
/// use edid::process::load::Loader;
///
/// let edid = Loader::default().load(EXAMPLE_DATA)?;
///
/// assert_eq!(edid.segments(), 2);
/// assert!(edid.cea_segment().is_some());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Loader {
    fail_level: log::Level,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            fail_level: log::Level::Error,
        }
    }
}

impl Loader {
    /// Sets the failure level for validation errors.
    ///
    /// - `log::Level::Error`: Only fail on Error level messages (default)
    /// - `log::Level::Warn`: Fail on Warning level and above (strict mode)
    pub fn set_fail_level(&mut self, level: log::Level) {
        self.fail_level = level;
    }

    /// Splits `bytes` into blocks and populates a new document.
    ///
    /// Fails when `bytes` cannot hold a base block. An invalid header, a
    /// trailing partial block and a block count that disagrees with the base
    /// block are logged as warnings, or returned as errors in strict mode.
    pub fn load(&self, bytes: &[u8]) -> Result<Edid> {
        if bytes.len() < BLOCK_SIZE {
            bail!(EdidError::InsufficientData(bytes.len()));
        }

        let mut edid = Edid::default();
        let (base, rest) = bytes.split_at(BLOCK_SIZE);
        edid.set_base(base)?;

        if !edid.is_valid() {
            let mut header = [0u8; 8];
            header.copy_from_slice(&base[..8]);
            log_or_err!(self, log::Level::Warn, EdidError::InvalidHeader(header));
            return Ok(edid);
        }

        let blocks = rest.chunks_exact(BLOCK_SIZE);
        let trailing = blocks.remainder().len();
        if trailing > 0 {
            log_or_err!(self, log::Level::Warn, EdidError::TrailingBytes(trailing));
        }

        let declared = edid.segments() as usize - 1;
        let supplied = blocks.len();
        if declared != supplied {
            log_or_err!(
                self,
                log::Level::Warn,
                EdidError::SegmentCountMismatch { declared, supplied }
            );
        }

        for (index, block) in blocks.take(declared).enumerate() {
            edid.set_segment(index as u8 + 1, block)?;
        }

        if supplied > declared {
            debug!("Ignoring {} block(s) past the declared extensions", supplied - declared);
        }

        debug!(
            "Loaded EDID {}.{} from {} with {} extension block(s)",
            edid.version_major(),
            edid.version_minor(),
            edid.manufacturer(),
            declared.min(supplied)
        );

        Ok(edid)
    }
}
