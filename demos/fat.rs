//! Mounts a FAT12/FAT16 image and prints its decoded geometry.
//!
//! Run with: `cargo run --example fat -- path/to/image.img`

use fatnav::storage::FileBackedStorage;
use fatnav::FatFs;

const DEFAULT_IMAGE_PATH: &str = "assets/fat.img";

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_IMAGE_PATH.into());

    let storage = FileBackedStorage::open(&path).unwrap();
    let fs = FatFs::mount(storage).unwrap();

    println!("{:#?}", fs.geometry());
}
