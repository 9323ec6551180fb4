//! The block device: random access to the fixed-size sectors of an image.
//!
//! The sector size isn't known until the BPB has been read, so `Storage`
//! works over plain byte slices sized by the caller rather than pinning a
//! sector size at compile time.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};

/// The sector size assumed before a volume's BPB has been read.
pub const DEFAULT_SECTOR_SIZE: u16 = 512;

/// Something sectors can be read from.
///
/// Sector 0 is always read at byte offset 0 using [`DEFAULT_SECTOR_SIZE`],
/// regardless of the configured sector size, since nothing is known about
/// the volume until that sector has been decoded. Sector `i > 0` is read at
/// `DEFAULT_SECTOR_SIZE + (i - 1) * configured`. Once the BPB reports the
/// volume's real sector size, callers install it with
/// [`Storage::set_sector_size`]; every read after that follows the rule
/// above using the new size.
pub trait Storage {
    /// Reads exactly one sector into `buf`, which must be
    /// [`Storage::sector_size`] bytes long.
    fn read_sector(&mut self, index: u32, buf: &mut [u8]) -> Result<()>;

    /// Reads `count` consecutive sectors starting at `start` into `dest`,
    /// which must be at least `count * sector_size` bytes long. Returns the
    /// number of bytes actually copied.
    fn read_sectors(&mut self, start: u32, count: u32, dest: &mut [u8]) -> Result<usize> {
        let sector_size = self.sector_size() as usize;

        for i in 0..count {
            let begin = i as usize * sector_size;
            let end = begin + sector_size;
            self.read_sector(start + i, &mut dest[begin..end])?;
        }

        Ok(count as usize * sector_size)
    }

    /// Installs the sector size decoded from the BPB. Only ever called once,
    /// right after the boot sector has been parsed.
    fn set_sector_size(&mut self, size: u16);

    /// The currently configured sector size.
    fn sector_size(&self) -> u16;
}

/// A [`Storage`] backed by a flat, byte-addressable file on disk.
#[derive(Debug)]
pub struct FileBackedStorage {
    file: File,
    sector_size: u16,
}

impl FileBackedStorage {
    /// Opens `path` for reading. The sector size starts out at
    /// [`DEFAULT_SECTOR_SIZE`] until [`Storage::set_sector_size`] is called.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path).map_err(Error::OpenFailed)?;

        Ok(Self {
            file,
            sector_size: DEFAULT_SECTOR_SIZE,
        })
    }

    fn byte_offset(&self, index: u32) -> u64 {
        if index == 0 {
            0
        } else {
            DEFAULT_SECTOR_SIZE as u64 + (index as u64 - 1) * self.sector_size as u64
        }
    }
}

impl Storage for FileBackedStorage {
    fn read_sector(&mut self, index: u32, buf: &mut [u8]) -> Result<()> {
        let offset = self.byte_offset(index);
        log::trace!("reading sector {} at byte offset {}", index, offset);

        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(Error::IoFailed)?;
        self.file.read_exact(buf).map_err(Error::IoFailed)?;

        Ok(())
    }

    fn set_sector_size(&mut self, size: u16) {
        self.sector_size = size;
    }

    fn sector_size(&self) -> u16 {
        self.sector_size
    }
}
