#![allow(dead_code)]

use bv2nii::volume::{ElementKind, Extents, VoxelData};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Small spatial extents, every axis at least 1.
pub fn arb_spatial(max_axis: usize) -> BoxedStrategy<Extents> {
    (1..=max_axis, 1..=max_axis, 1..=max_axis)
        .prop_map(|(nx, ny, nz)| Extents::spatial(nx, ny, nz))
        .boxed()
}

/// Voxel data of `kind` with exactly `len` elements. Float values are
/// finite so equality comparisons are meaningful.
pub fn arb_voxels(kind: ElementKind, len: usize) -> BoxedStrategy<VoxelData> {
    let n = len..=len;
    match kind {
        ElementKind::U8 => prop::collection::vec(any::<u8>(), n)
            .prop_map(VoxelData::U8)
            .boxed(),
        ElementKind::I8 => prop::collection::vec(any::<i8>(), n)
            .prop_map(VoxelData::I8)
            .boxed(),
        ElementKind::U16 => prop::collection::vec(any::<u16>(), n)
            .prop_map(VoxelData::U16)
            .boxed(),
        ElementKind::I16 => prop::collection::vec(any::<i16>(), n)
            .prop_map(VoxelData::I16)
            .boxed(),
        ElementKind::F32 => prop::collection::vec(-1.0e6f32..1.0e6f32, n)
            .prop_map(VoxelData::F32)
            .boxed(),
    }
}

/// Any element kind.
pub fn arb_kind() -> BoxedStrategy<ElementKind> {
    prop::sample::select(ElementKind::ALL.to_vec()).boxed()
}

/// Spatial extents paired with voxel data of `kind` that fills them.
pub fn arb_volume(kind: ElementKind, max_axis: usize) -> BoxedStrategy<(Extents, VoxelData)> {
    arb_spatial(max_axis)
        .prop_flat_map(move |extents| (Just(extents), arb_voxels(kind, extents.spatial_len())))
        .boxed()
}

/// Each element of `data` as `f64`, for kind-independent comparisons.
pub fn as_f64(data: &VoxelData) -> Vec<f64> {
    match data {
        VoxelData::U8(v) => v.iter().map(|&x| x as f64).collect(),
        VoxelData::I8(v) => v.iter().map(|&x| x as f64).collect(),
        VoxelData::U16(v) => v.iter().map(|&x| x as f64).collect(),
        VoxelData::I16(v) => v.iter().map(|&x| x as f64).collect(),
        VoxelData::F32(v) => v.iter().map(|&x| x as f64).collect(),
    }
}
