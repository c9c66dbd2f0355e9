//! Data structures representing EDID format components.
//!
//! Contains the fixed 128-byte block, extension storage, the CEA-861
//! extension view with its data block scanner, and the capability types the
//! accessors return.

pub mod block;
pub mod capability;
pub mod cea;
pub mod data_block;
pub mod extensions;
