#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Raw bytes of a version 1 VMR: three little-endian `u16` dims, then
/// `u8` voxels.
pub fn vmr_bytes(nx: u16, ny: u16, nz: u16, voxels: &[u8]) -> Vec<u8> {
    let mut bytes = dims(nx, ny, nz);
    bytes.extend_from_slice(voxels);
    bytes
}

/// Raw bytes of a V16: three little-endian `u16` dims, then little-endian
/// `u16` voxels.
pub fn v16_bytes(nx: u16, ny: u16, nz: u16, voxels: &[u16]) -> Vec<u8> {
    let mut bytes = dims(nx, ny, nz);
    for v in voxels {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Writes an FMR header with a single-file `f32` STC next to it.
pub fn write_fmr_run(
    fmr_path: &Path,
    prefix: &str,
    (nx, ny, nz): (usize, usize, usize),
    volumes: &[Vec<f32>],
) {
    let header = format!(
        "\nFileVersion:          6\nNrOfVolumes:          {}\nNrOfSlices:           {}\nPrefix:               \"{}\"\nDataStorageFormat:    2\nDataType:             2\nResolutionX:          {}\nResolutionY:          {}\n",
        volumes.len(),
        nz,
        prefix,
        nx,
        ny
    );
    fs::write(fmr_path, header).expect("write fmr header");

    let mut stc = Vec::new();
    for volume in volumes {
        assert_eq!(volume.len(), nx * ny * nz, "volume size");
        for v in volume {
            stc.extend_from_slice(&v.to_le_bytes());
        }
    }
    let stc_path = fmr_path
        .parent()
        .expect("fmr parent dir")
        .join(format!("{}.stc", prefix));
    fs::write(stc_path, stc).expect("write stc");
}

/// Little-endian `f32` samples from raw bytes.
pub fn f32_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn dims(nx: u16, ny: u16, nz: u16) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(6);
    bytes.extend_from_slice(&nx.to_le_bytes());
    bytes.extend_from_slice(&ny.to_le_bytes());
    bytes.extend_from_slice(&nz.to_le_bytes());
    bytes
}
