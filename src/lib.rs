//! A read-only reader and navigator for FAT12/FAT16 filesystem images.

pub mod error;
pub mod fat;
pub mod storage;

pub use error::{Error, Result};
pub use fat::FatFs;
pub use storage::{FileBackedStorage, Storage};
