//! Integration tests for V16 <-> NIfTI conversion.

use std::fs;

use bv2nii::container::{read_container, write_container, ContainerImage};
use bv2nii::conversion::{convert, ConversionIssueCode, ConversionRequest};
use bv2nii::native::io_v16::read_v16;
use bv2nii::volume::{ElementKind, Extents, VoxelData};

mod common;

#[test]
fn v16_to_nifti_keeps_u16_values() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let src = temp.path().join("anat.v16");
    let dst = temp.path().join("anat.nii");
    fs::write(&src, common::v16_bytes(3, 1, 1, &[0, 32768, 65535])).expect("write v16");

    let report = convert(&ConversionRequest::from_paths(&src, &dst).unwrap()).expect("convert");
    assert_eq!(report.source_kind, ElementKind::U16);
    assert_eq!(report.output_kind, ElementKind::U16);

    let image = read_container(&dst).expect("read nifti");
    assert_eq!(image.kind(), ElementKind::U16);
    assert_eq!(image.data(), &VoxelData::U16(vec![0, 32768, 65535]));
}

#[test]
fn v16_round_trips_byte_for_byte() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let src = temp.path().join("anat.v16");
    let mid = temp.path().join("anat.nii.gz");
    let back = temp.path().join("back.v16");
    let voxels: Vec<u16> = (0..24).map(|v| v * 2731).collect();
    let original = common::v16_bytes(2, 3, 4, &voxels);
    fs::write(&src, &original).expect("write v16");

    convert(&ConversionRequest::from_paths(&src, &mid).unwrap()).expect("to nifti");
    convert(&ConversionRequest::from_paths(&mid, &back).unwrap()).expect("to v16");

    assert_eq!(fs::read(&back).expect("read v16"), original);
}

#[test]
fn u8_nifti_widens_to_v16() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let src = temp.path().join("byte.nii");
    let dst = temp.path().join("byte.v16");
    let image = ContainerImage::new(Extents::spatial(2, 2, 1), VoxelData::U8(vec![0, 1, 128, 255]));
    write_container(&src, &image).expect("write nifti");

    let report = convert(&ConversionRequest::from_paths(&src, &dst).unwrap()).expect("convert");
    assert!(report.has(ConversionIssueCode::ElementKindWidened));
    assert!(!report.is_lossy());

    let volume = read_v16(&dst).expect("read v16");
    assert_eq!(volume.extents(), Extents::spatial(2, 2, 1));
    assert_eq!(volume.data(), &VoxelData::U16(vec![0, 1, 128, 255]));
}

#[test]
fn i16_nifti_to_v16_reinterprets_as_twos_complement() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let src = temp.path().join("signed.nii");
    let dst = temp.path().join("signed.v16");
    let image = ContainerImage::new(
        Extents::spatial(3, 1, 1),
        VoxelData::I16(vec![-32768, -1, 32767]),
    );
    write_container(&src, &image).expect("write nifti");

    let report = convert(&ConversionRequest::from_paths(&src, &dst).unwrap()).expect("convert");
    assert!(report.has(ConversionIssueCode::NegativeValuesReinterpreted));

    let volume = read_v16(&dst).expect("read v16");
    assert_eq!(volume.data(), &VoxelData::U16(vec![32768, 65535, 32767]));
}

#[test]
fn f32_nifti_to_v16_is_unsupported() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let src = temp.path().join("float.nii");
    let dst = temp.path().join("float.v16");
    let image = ContainerImage::new(Extents::spatial(1, 1, 1), VoxelData::F32(vec![1.0]));
    write_container(&src, &image).expect("write nifti");

    let err = convert(&ConversionRequest::from_paths(&src, &dst).unwrap()).unwrap_err();
    assert!(err.is_unsupported_datatype());
    assert!(!dst.exists());
}

#[test]
fn v16_with_trailing_bytes_is_rejected() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let src = temp.path().join("long.v16");
    let dst = temp.path().join("long.nii");
    let mut bytes = common::v16_bytes(1, 1, 1, &[7]);
    bytes.push(0);
    fs::write(&src, bytes).expect("write v16");

    let err = convert(&ConversionRequest::from_paths(&src, &dst).unwrap()).unwrap_err();
    assert!(err.is_format_error());
    assert!(!dst.exists());
}
