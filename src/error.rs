//! The error taxonomy this crate reports to callers.

use std::io;

/// Everything that can go wrong while mounting a volume, walking a
/// directory, or reading a file's contents.
///
/// There is deliberately no retry policy and no partial success: a geometry
/// failure prevents any further operation, and an enumeration or file-read
/// failure terminates the operation in progress.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image could not be opened for reading.
    #[error("failed to open image: {0}")]
    OpenFailed(#[source] io::Error),

    /// A sector or multi-sector read returned fewer bytes than requested.
    #[error("I/O error reading image: {0}")]
    IoFailed(#[source] io::Error),

    /// The BPB type tag at offset 0x36 was neither FAT12 nor FAT16.
    #[error("unsupported FAT variant, type tag was {0:02x?}")]
    UnsupportedVariant([u8; 8]),
}

pub type Result<T> = std::result::Result<T, Error>;
