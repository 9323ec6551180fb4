//! Types and tools for the FAT12/FAT16 Boot Sector and BIOS Parameter Block.
//!
//! Majority of the offsets here are sourced from [this page](https://en.wikipedia.org/wiki/Design_of_the_FAT_file_system).

use core::convert::TryInto;

use crate::error::{Error, Result};

/// Which on-disk 12- or 16-bit FAT layout a volume uses.
///
/// Selected from the 5th byte of the type string at offset 0x36: `'2'` for
/// FAT12, `'6'` for FAT16. Any other tag is rejected outright rather than
/// assumed to be FAT32, since this crate never implements FAT32 walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatVariant {
    Fat12,
    Fat16,
}

impl FatVariant {
    /// The cluster value at or above which a FAT entry marks end-of-chain.
    pub fn end_of_chain_marker(self) -> u16 {
        match self {
            FatVariant::Fat12 => 0x0FF8,
            FatVariant::Fat16 => 0xFFF8,
        }
    }
}

/// The DOS 2.0/3.31 BIOS Parameter Block, decoded down to the fields a
/// FAT12/FAT16 reader needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiosParameterBlock {
    /// Bytes per logical sector; almost always 512.
    // Offset: 0x00B
    pub bytes_per_sector: u16,

    /// Logical sectors per cluster. One of 1, 2, 4, 8, 16, 32, 64, 128.
    // Offset: 0x00D
    pub sectors_per_cluster: u8,

    /// Sectors before the first FAT, including the boot sector itself.
    // Offset: 0x00E
    pub reserved_sectors: u16,

    /// Number of FAT copies on the volume (almost always 2).
    // Offset: 0x010
    pub num_fats: u8,

    /// Number of 32-byte slots in the fixed-size root directory region.
    // Offset: 0x011
    pub root_entry_count: u16,

    /// Sectors occupied by a single copy of the FAT.
    // Offset: 0x016
    pub sectors_per_fat: u16,

    /// The ASCII type tag, e.g. `b"FAT12   "` or `b"FAT16   "`.
    // Offset: 0x036
    pub file_system_type: [u8; 8],

    pub variant: FatVariant,
}

impl BiosParameterBlock {
    /// Decodes a BPB from a 512-byte sector-0 image.
    pub fn read(sector: &[u8]) -> Result<Self> {
        macro_rules! e {
            ($ty:tt, $offset:literal) => {
                $ty::from_le_bytes(
                    sector[$offset..($offset + core::mem::size_of::<$ty>())]
                        .try_into()
                        .unwrap(),
                )
            };
        }

        let file_system_type: [u8; 8] = sector[0x036..(0x036 + 8)].try_into().unwrap();
        let variant = match file_system_type.get(4) {
            Some(b'2') => FatVariant::Fat12,
            Some(b'6') => FatVariant::Fat16,
            _ => return Err(Error::UnsupportedVariant(file_system_type)),
        };

        Ok(Self {
            bytes_per_sector: e!(u16, 0x00B),
            sectors_per_cluster: e!(u8, 0x00D),
            reserved_sectors: e!(u16, 0x00E),
            num_fats: e!(u8, 0x010),
            root_entry_count: e!(u16, 0x011),
            sectors_per_fat: e!(u16, 0x016),
            file_system_type,
            variant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fat16_sector() -> Vec<u8> {
        let mut s = vec![0u8; 512];
        s[0x00B..0x00D].copy_from_slice(&512u16.to_le_bytes());
        s[0x00D] = 4;
        s[0x00E..0x010].copy_from_slice(&1u16.to_le_bytes());
        s[0x010] = 2;
        s[0x011..0x013].copy_from_slice(&512u16.to_le_bytes());
        s[0x016..0x018].copy_from_slice(&32u16.to_le_bytes());
        s[0x036..0x03E].copy_from_slice(b"FAT16   ");
        s
    }

    #[test]
    fn decodes_fat16_fields() {
        let bpb = BiosParameterBlock::read(&fat16_sector()).unwrap();

        assert_eq!(512, bpb.bytes_per_sector);
        assert_eq!(4, bpb.sectors_per_cluster);
        assert_eq!(1, bpb.reserved_sectors);
        assert_eq!(2, bpb.num_fats);
        assert_eq!(512, bpb.root_entry_count);
        assert_eq!(32, bpb.sectors_per_fat);
        assert_eq!(FatVariant::Fat16, bpb.variant);
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let mut s = fat16_sector();
        s[0x036..0x03E].copy_from_slice(b"FAT32   ");

        match BiosParameterBlock::read(&s) {
            Err(Error::UnsupportedVariant(tag)) => assert_eq!(b"FAT32   ", &tag),
            other => panic!("expected UnsupportedVariant, got {:?}", other),
        }
    }

    #[test]
    fn end_of_chain_markers_differ_by_variant() {
        assert_eq!(0x0FF8, FatVariant::Fat12.end_of_chain_marker());
        assert_eq!(0xFFF8, FatVariant::Fat16.end_of_chain_marker());
    }
}
