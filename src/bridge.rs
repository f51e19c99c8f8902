//! Translation between native volumes and NIfTI images.
//!
//! Encoding never changes the element kind: a `u8` VMR becomes a `u8`
//! NIfTI image, a `u16` V16 a `u16` image and an FMR run an `f32` image.
//! Decoding runs the conversion matrix so that whatever kind the NIfTI file
//! declares ends up in the kind the destination format requires.

use std::path::Path;

use crate::container::ContainerImage;
use crate::error::Bv2NiiError;
use crate::volume::{convert, ElementKind, VolumeSeries, VoxelBuffer, VoxelData};

/// Wraps a single volume as a one-timepoint image.
pub fn encode_volume(volume: VoxelBuffer) -> ContainerImage {
    let (extents, data) = volume.into_parts();
    ContainerImage::new(extents.to_spatial(), data)
}

/// Concatenates a series into a 4D `f32` image with `nt = series.len()`.
pub fn encode_series(series: &VolumeSeries) -> ContainerImage {
    let data = VoxelData::concat(
        VolumeSeries::KIND,
        series.volumes().iter().map(VoxelBuffer::data),
    );
    ContainerImage::new(series.extents(), data)
}

/// Converts a one-timepoint image to a volume of kind `target`.
///
/// `source` only labels errors.
pub fn decode_volume(
    image: &ContainerImage,
    target: ElementKind,
    source: &Path,
) -> Result<VoxelBuffer, Bv2NiiError> {
    let extents = image.extents();
    if extents.nt != 1 {
        return Err(Bv2NiiError::ContainerShape {
            path: source.to_path_buf(),
            message: format!(
                "image has {} timepoints ({}); a single volume is required",
                extents.nt, extents
            ),
        });
    }

    let data = convert::convert(image.data(), target)?;
    Ok(VoxelBuffer::from_data(extents, data))
}

/// Converts an image to `f32` and splits it into `nt` volumes of
/// `nx * ny * nz` voxels, in buffer order.
pub fn decode_series(image: &ContainerImage) -> Result<VolumeSeries, Bv2NiiError> {
    let extents = image.extents();
    let spatial = extents.to_spatial();
    let per_volume = spatial.spatial_len();
    let data = convert::convert(image.data(), VolumeSeries::KIND)?;

    let volumes = (0..extents.nt)
        .map(|t| VoxelBuffer::from_data(spatial, data.slice(t * per_volume..(t + 1) * per_volume)))
        .collect();
    VolumeSeries::from_volumes(spatial, volumes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Extents;

    #[test]
    fn encode_keeps_kind_and_values() {
        let volume = VoxelBuffer::from_data(
            Extents::spatial(3, 1, 1),
            VoxelData::U16(vec![0, 32768, 65535]),
        );
        let image = encode_volume(volume);
        assert_eq!(image.kind(), ElementKind::U16);
        assert_eq!(image.extents(), Extents::spatial(3, 1, 1));
        assert_eq!(image.data(), &VoxelData::U16(vec![0, 32768, 65535]));
    }

    #[test]
    fn u8_volume_round_trips() {
        let volume =
            VoxelBuffer::from_data(Extents::spatial(2, 2, 2), VoxelData::U8((0..8).collect()));
        let image = encode_volume(volume.clone());
        assert_eq!(image.extents().nt, 1);

        let decoded = decode_volume(&image, ElementKind::U8, Path::new("x.nii")).unwrap();
        assert_eq!(decoded, volume);
    }

    #[test]
    fn decode_widens_to_target() {
        let image = ContainerImage::new(Extents::spatial(2, 1, 1), VoxelData::I8(vec![-1, 3]));
        let decoded = decode_volume(&image, ElementKind::U16, Path::new("x.nii")).unwrap();
        assert_eq!(decoded.data(), &VoxelData::U16(vec![65535, 3]));
        assert_eq!(decoded.extents(), Extents::spatial(2, 1, 1));
    }

    #[test]
    fn decode_rejects_unsupported_pair() {
        let image = ContainerImage::new(Extents::spatial(1, 1, 1), VoxelData::F32(vec![1.0]));
        let err = decode_volume(&image, ElementKind::U8, Path::new("x.nii")).unwrap_err();
        assert!(err.is_unsupported_datatype());
    }

    #[test]
    fn decode_volume_rejects_time_series() {
        let image = ContainerImage::new(Extents::new(1, 1, 1, 2), VoxelData::U8(vec![1, 2]));
        let err = decode_volume(&image, ElementKind::U8, Path::new("x.nii")).unwrap_err();
        assert!(matches!(err, Bv2NiiError::ContainerShape { .. }));
    }

    #[test]
    fn series_slices_in_temporal_order() {
        let extents = Extents::new(4, 4, 4, 5);
        let values: Vec<f32> = (0..320).map(|v| v as f32).collect();
        let image = ContainerImage::new(extents, VoxelData::F32(values));

        let series = decode_series(&image).unwrap();
        assert_eq!(series.len(), 5);
        for (t, volume) in series.volumes().iter().enumerate() {
            assert_eq!(volume.element_count(), 64);
            let expected: Vec<f32> = (t * 64..(t + 1) * 64).map(|v| v as f32).collect();
            assert_eq!(volume.data(), &VoxelData::F32(expected));
        }
    }

    #[test]
    fn series_round_trips_through_image() {
        let extents = Extents::new(2, 1, 1, 3);
        let image = ContainerImage::new(
            extents,
            VoxelData::F32(vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5]),
        );
        let series = decode_series(&image).unwrap();
        assert_eq!(encode_series(&series), image);
    }

    #[test]
    fn integer_image_decodes_to_float_series() {
        let image = ContainerImage::new(Extents::new(1, 1, 1, 2), VoxelData::I16(vec![-7, 9]));
        let series = decode_series(&image).unwrap();
        assert_eq!(series.volumes()[0].data(), &VoxelData::F32(vec![-7.0]));
        assert_eq!(series.volumes()[1].data(), &VoxelData::F32(vec![9.0]));
    }
}
