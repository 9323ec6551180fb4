//! FAT12/FAT16 filesystem things: mounting a volume, reading directories and
//! files off of it.

use std::convert::TryInto;

pub mod boot_sector;
pub mod dir;
pub mod table;

use boot_sector::BiosParameterBlock;
use dir::{DecodedEntry, Decoder, Fed};
use table::{Cluster, FatLayout};

use crate::error::Result;
use crate::storage::Storage;

/// Volume parameters derived from the BPB. Immutable after mount.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub bpb: BiosParameterBlockSummary,
    pub fat_first_sector: u32,
    pub root_first_sector: u32,
    pub data_first_sector: u32,
}

/// The subset of the BPB that callers of [`Geometry`] actually need kept
/// around after mount.
#[derive(Debug, Clone, Copy)]
pub struct BiosParameterBlockSummary {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub root_entry_count: u16,
    pub variant: boot_sector::FatVariant,
}

impl Geometry {
    fn from_bpb(bpb: &BiosParameterBlock) -> Self {
        let fat_first_sector = bpb.reserved_sectors as u32;
        let root_first_sector =
            fat_first_sector + bpb.num_fats as u32 * bpb.sectors_per_fat as u32;

        let root_dir_bytes = bpb.root_entry_count as u32 * 32;
        let root_dir_sectors =
            (root_dir_bytes + bpb.bytes_per_sector as u32 - 1) / bpb.bytes_per_sector as u32;

        let data_first_sector = root_first_sector + root_dir_sectors;

        Self {
            bpb: BiosParameterBlockSummary {
                bytes_per_sector: bpb.bytes_per_sector,
                sectors_per_cluster: bpb.sectors_per_cluster,
                root_entry_count: bpb.root_entry_count,
                variant: bpb.variant,
            },
            fat_first_sector,
            root_first_sector,
            data_first_sector,
        }
    }

    pub fn bytes_per_cluster(&self) -> u32 {
        self.bpb.sectors_per_cluster as u32 * self.bpb.bytes_per_sector as u32
    }

    /// First sector of data cluster `cluster` (clusters are numbered from 2).
    pub fn cluster_to_sector(&self, cluster: Cluster) -> u32 {
        self.data_first_sector + (cluster - 2) * self.bpb.sectors_per_cluster as u32
    }

    fn root_dir_sector_count(&self) -> u32 {
        self.data_first_sector - self.root_first_sector
    }

    fn fat_layout(&self) -> FatLayout {
        FatLayout {
            variant: self.bpb.variant,
            fat_first_sector: self.fat_first_sector,
            bytes_per_sector: self.bpb.bytes_per_sector,
        }
    }
}

/// A mounted FAT12/FAT16 volume.
#[derive(Debug)]
pub struct FatFs<S: Storage> {
    geometry: Geometry,
    storage: S,
}

/// The self-reference short name, dot followed by seven spaces.
const SELF_ENTRY_NAME: &str = ".       ";

impl<S: Storage> FatFs<S> {
    /// Reads sector 0, decodes the BPB, and installs the volume's real
    /// sector size on `storage`.
    pub fn mount(mut storage: S) -> Result<Self> {
        let mut sector0 = vec![0u8; crate::storage::DEFAULT_SECTOR_SIZE as usize];
        storage.read_sector(0, &mut sector0)?;

        let bpb = BiosParameterBlock::read(&sector0)?;
        storage.set_sector_size(bpb.bytes_per_sector);

        let geometry = Geometry::from_bpb(&bpb);
        log::debug!("mounted volume: {:?}", geometry);

        Ok(Self { geometry, storage })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The next cluster in a chain, or `None` at end-of-chain.
    pub fn next_cluster(&mut self, current: Cluster) -> Result<Option<Cluster>> {
        self.geometry.fat_layout().next_cluster(&mut self.storage, current)
    }

    /// Reads the fixed-size root directory region.
    pub fn read_root_dir(&mut self) -> Result<Vec<DecodedEntry>> {
        let sector_count = self.geometry.root_dir_sector_count();
        let mut buf =
            vec![0u8; sector_count as usize * self.geometry.bpb.bytes_per_sector as usize];

        self.storage
            .read_sectors(self.geometry.root_first_sector, sector_count, &mut buf)?;

        Ok(decode_region(&buf, self.geometry.bytes_per_cluster()))
    }

    /// Reads a directory. Cluster 0 means the fixed root region; any other
    /// value is a subdirectory's first cluster.
    pub fn read_dir(&mut self, first_cluster: Cluster) -> Result<Vec<DecodedEntry>> {
        if first_cluster == 0 {
            return self.read_root_dir();
        }

        let mut decoder = Decoder::new(self.geometry.bytes_per_cluster());
        let mut entries = Vec::new();
        let mut cluster = first_cluster;

        loop {
            let sector = self.geometry.cluster_to_sector(cluster);
            let mut buf = vec![0u8; self.geometry.bytes_per_cluster() as usize];
            self.storage
                .read_sectors(sector, self.geometry.bpb.sectors_per_cluster as u32, &mut buf)?;

            let mut hit_end = false;
            for chunk in buf.chunks_exact(32) {
                let record: [u8; 32] = chunk.try_into().unwrap();
                match decoder.feed(&record) {
                    Fed::EndOfDirectory => {
                        hit_end = true;
                        break;
                    }
                    Fed::Continue => {}
                    Fed::Entry(entry) => push_if_navigable(&mut entries, entry),
                }
            }

            if hit_end {
                break;
            }

            match self.next_cluster(cluster)? {
                Some(next) => cluster = next,
                None => break,
            }
        }

        Ok(entries)
    }

    /// Walks the cluster chain starting at `first_cluster`, reading one
    /// whole cluster per step into consecutive positions of `dest`. `dest`
    /// must be at least as long as the file's round-up size.
    pub fn read_file(&mut self, first_cluster: Cluster, dest: &mut [u8]) -> Result<usize> {
        let bytes_per_cluster = self.geometry.bytes_per_cluster() as usize;
        let mut cluster = first_cluster;
        let mut written = 0;

        while written + bytes_per_cluster <= dest.len() {
            let sector = self.geometry.cluster_to_sector(cluster);
            self.storage.read_sectors(
                sector,
                self.geometry.bpb.sectors_per_cluster as u32,
                &mut dest[written..written + bytes_per_cluster],
            )?;
            written += bytes_per_cluster;

            match self.next_cluster(cluster)? {
                Some(next) => cluster = next,
                None => break,
            }
        }

        Ok(written)
    }

    /// Convenience wrapper around [`FatFs::read_file`] that allocates the
    /// round-up-sized destination itself and trims it down to the entry's
    /// reported size.
    pub fn read_file_to_vec(&mut self, entry: &DecodedEntry) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; entry.size_rounded_up as usize];
        self.read_file(entry.first_cluster, &mut buf)?;
        buf.truncate(entry.size as usize);
        Ok(buf)
    }
}

fn push_if_navigable(entries: &mut Vec<DecodedEntry>, entry: DecodedEntry) {
    if !entry.attributes.is_navigable() {
        return;
    }
    if entry.name == SELF_ENTRY_NAME {
        return;
    }
    entries.push(entry);
}

fn decode_region(buf: &[u8], bytes_per_cluster: u32) -> Vec<DecodedEntry> {
    let mut decoder = Decoder::new(bytes_per_cluster);
    let mut entries = Vec::new();

    for chunk in buf.chunks_exact(32) {
        let record: [u8; 32] = chunk.try_into().unwrap();
        match decoder.feed(&record) {
            Fed::EndOfDirectory => break,
            Fed::Continue => {}
            Fed::Entry(entry) => push_if_navigable(&mut entries, entry),
        }
    }

    entries
}
