//! Mounts a FAT12/FAT16 image and lists its root directory.
//!
//! Run with: `cargo run --example dir -- path/to/image.img`

use fatnav::storage::FileBackedStorage;
use fatnav::FatFs;

const DEFAULT_IMAGE_PATH: &str = "assets/fat.img";

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_IMAGE_PATH.into());

    let storage = FileBackedStorage::open(&path).unwrap();
    let mut fs = FatFs::mount(storage).unwrap();

    for entry in fs.read_root_dir().unwrap() {
        let kind = if entry.is_dir() { "dir " } else { "file" };
        println!("{} {:>10} {}", kind, entry.size, entry.name);
    }
}
