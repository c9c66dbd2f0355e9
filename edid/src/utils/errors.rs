#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err.into());
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EdidError {
    #[error("EDID block must be exactly {expected} bytes, got {actual}")]
    BlockLength { expected: usize, actual: usize },

    #[error("Segment {index} is beyond the {segments} segment(s) declared by the base block")]
    SegmentOutOfRange { index: u16, segments: u16 },

    #[error("Insufficient data for an EDID base block: {0} bytes")]
    InsufficientData(usize),

    #[error("Invalid EDID header, read {0:02X?}")]
    InvalidHeader([u8; 8]),

    #[error("{0} trailing byte(s) do not form a complete block and are ignored")]
    TrailingBytes(usize),

    #[error("Base block declares {declared} extension block(s), {supplied} supplied")]
    SegmentCountMismatch { declared: usize, supplied: usize },
}
