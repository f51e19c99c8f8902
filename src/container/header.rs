//! NIfTI-1 header parsing and serialization.
//!
//! Only the single-file (`n+1`) variant is handled. Headers are read in
//! either byte order and always written little-endian.

use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::Bv2NiiError;
use crate::volume::{ElementKind, Extents};

const FORMAT: &str = "NIfTI";

/// NIfTI-1 header field byte offsets.
mod offsets {
    pub const SIZEOF_HDR: usize = 0;
    pub const DIM: usize = 40;
    pub const DATATYPE: usize = 70;
    pub const BITPIX: usize = 72;
    pub const PIXDIM: usize = 76;
    pub const VOX_OFFSET: usize = 108;
    pub const SCL_SLOPE: usize = 112;
    pub const SCL_INTER: usize = 116;
    pub const XYZT_UNITS: usize = 123;
    pub const DESCRIP: usize = 148;
    pub const AUX_FILE: usize = 228;
    pub const QFORM_CODE: usize = 252;
    pub const SFORM_CODE: usize = 254;
    pub const SROW_X: usize = 280;
    pub const SROW_Y: usize = 296;
    pub const SROW_Z: usize = 312;
    pub const MAGIC: usize = 344;
}

const UNITS_MM: u8 = 2;
const UNITS_SEC: u8 = 8;

/// The fields of a NIfTI-1 header this tool reads or writes.
#[derive(Clone, Debug, PartialEq)]
pub struct NiftiHeader {
    /// `dim[0]` is the number of dimensions, `dim[1..=7]` their sizes.
    pub dim: [i16; 8],
    pub kind: ElementKind,
    pub pixdim: [f32; 8],
    pub vox_offset: f32,
    pub scl_slope: f32,
    pub scl_inter: f32,
    pub xyzt_units: u8,
    pub descrip: String,
    pub qform_code: i16,
    pub sform_code: i16,
    pub srow_x: [f32; 4],
    pub srow_y: [f32; 4],
    pub srow_z: [f32; 4],
    pub(crate) little_endian: bool,
}

impl NiftiHeader {
    /// Size of the NIfTI-1 header in bytes.
    pub const SIZE: usize = 348;

    /// Offset of the voxel data in files written by this tool (header plus
    /// the 4-byte empty extension block).
    pub const DEFAULT_VOX_OFFSET: usize = 352;

    /// A header describing an image with the given extents and kind.
    ///
    /// Voxel spacing is 1 mm (and 1 s per timepoint); the sform is the
    /// identity.
    pub fn for_image(extents: Extents, kind: ElementKind) -> Result<Self, Bv2NiiError> {
        let mut dim = [0i16; 8];
        dim[0] = if extents.nt != 1 { 4 } else { 3 };
        for (slot, size) in dim[1..5]
            .iter_mut()
            .zip([extents.nx, extents.ny, extents.nz, extents.nt])
        {
            *slot = i16::try_from(size).map_err(|_| {
                Bv2NiiError::write(
                    FORMAT,
                    "<header>",
                    format!("dimension {} exceeds the NIfTI-1 limit of {}", size, i16::MAX),
                )
            })?;
        }
        for slot in &mut dim[5..] {
            *slot = 1;
        }

        let xyzt_units = if extents.nt != 1 {
            UNITS_MM | UNITS_SEC
        } else {
            UNITS_MM
        };

        Ok(Self {
            dim,
            kind,
            pixdim: [1.0; 8],
            vox_offset: Self::DEFAULT_VOX_OFFSET as f32,
            scl_slope: 1.0,
            scl_inter: 0.0,
            xyzt_units,
            descrip: format!("bv2nii {}", env!("CARGO_PKG_VERSION")),
            qform_code: 0,
            sform_code: 1,
            srow_x: [1.0, 0.0, 0.0, 0.0],
            srow_y: [0.0, 1.0, 0.0, 0.0],
            srow_z: [0.0, 0.0, 1.0, 0.0],
            little_endian: true,
        })
    }

    /// Parses a header, detecting byte order from `sizeof_hdr`.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<Self, Bv2NiiError> {
        if bytes.len() < Self::SIZE {
            return Err(Bv2NiiError::read(
                FORMAT,
                path,
                format!(
                    "file is {} byte(s), too short for a {}-byte header",
                    bytes.len(),
                    Self::SIZE
                ),
            ));
        }

        if LittleEndian::read_i32(&bytes[..4]) == Self::SIZE as i32 {
            Self::parse_with::<LittleEndian>(bytes, path, true)
        } else if BigEndian::read_i32(&bytes[..4]) == Self::SIZE as i32 {
            Self::parse_with::<BigEndian>(bytes, path, false)
        } else {
            Err(Bv2NiiError::read(
                FORMAT,
                path,
                "sizeof_hdr is not 348 in either byte order",
            ))
        }
    }

    /// Parses a header from bytes with no file context.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Bv2NiiError> {
        Self::parse(bytes, Path::new("<bytes>"))
    }

    #[allow(clippy::wildcard_imports)]
    fn parse_with<E: ByteOrder>(
        bytes: &[u8],
        path: &Path,
        little_endian: bool,
    ) -> Result<Self, Bv2NiiError> {
        use offsets::*;

        let invalid = |message: String| Bv2NiiError::read(FORMAT, path, message);

        match &bytes[MAGIC..MAGIC + 4] {
            b"n+1\0" => {}
            b"ni1\0" => {
                return Err(invalid(
                    "header/image pairs (.hdr/.img) are not supported".to_string(),
                ))
            }
            other => return Err(invalid(format!("invalid NIfTI magic {:?}", other))),
        }

        let mut dim = [0i16; 8];
        E::read_i16_into(&bytes[DIM..DIM + 16], &mut dim);
        if !(1..=7).contains(&dim[0]) {
            return Err(invalid(format!("dim[0] must be 1..=7, got {}", dim[0])));
        }
        if let Some((i, d)) = dim[1..].iter().enumerate().find(|&(_, &d)| d < 0) {
            return Err(invalid(format!("dim[{}] is negative: {}", i + 1, d)));
        }
        let ndim = dim[0] as usize;
        if let Some(i) = (5..=ndim).find(|&i| dim[i] > 1) {
            return Err(invalid(format!(
                "dim[{}] = {}: only up to 4 dimensions are supported",
                i, dim[i]
            )));
        }

        let code = E::read_i16(&bytes[DATATYPE..DATATYPE + 2]);
        let kind = ElementKind::from_nifti_code(code).ok_or_else(|| {
            Bv2NiiError::UnsupportedDatatypeCode {
                path: path.to_path_buf(),
                code,
            }
        })?;
        let bitpix = E::read_i16(&bytes[BITPIX..BITPIX + 2]);
        let expected_bitpix = (kind.byte_size() * 8) as i16;
        if bitpix != expected_bitpix {
            return Err(invalid(format!(
                "bitpix {} does not match datatype {} (expected {})",
                bitpix, kind, expected_bitpix
            )));
        }

        let vox_offset = E::read_f32(&bytes[VOX_OFFSET..VOX_OFFSET + 4]);
        if !vox_offset.is_finite()
            || vox_offset.fract() != 0.0
            || vox_offset < Self::DEFAULT_VOX_OFFSET as f32
        {
            return Err(invalid(format!(
                "vox_offset must be an integer >= {}, got {}",
                Self::DEFAULT_VOX_OFFSET,
                vox_offset
            )));
        }

        let mut pixdim = [0f32; 8];
        E::read_f32_into(&bytes[PIXDIM..PIXDIM + 32], &mut pixdim);
        let read_row = |offset: usize| {
            let mut row = [0f32; 4];
            E::read_f32_into(&bytes[offset..offset + 16], &mut row);
            row
        };

        Ok(Self {
            dim,
            kind,
            pixdim,
            vox_offset,
            scl_slope: E::read_f32(&bytes[SCL_SLOPE..SCL_SLOPE + 4]),
            scl_inter: E::read_f32(&bytes[SCL_INTER..SCL_INTER + 4]),
            xyzt_units: bytes[XYZT_UNITS],
            descrip: String::from_utf8_lossy(&bytes[DESCRIP..AUX_FILE])
                .trim_end_matches('\0')
                .to_string(),
            qform_code: E::read_i16(&bytes[QFORM_CODE..QFORM_CODE + 2]),
            sform_code: E::read_i16(&bytes[SFORM_CODE..SFORM_CODE + 2]),
            srow_x: read_row(SROW_X),
            srow_y: read_row(SROW_Y),
            srow_z: read_row(SROW_Z),
            little_endian,
        })
    }

    /// Serializes the header as 348 little-endian bytes.
    #[allow(clippy::wildcard_imports)]
    pub fn to_bytes(&self) -> Vec<u8> {
        use offsets::*;

        let mut buf = vec![0u8; Self::SIZE];
        LittleEndian::write_i32(&mut buf[SIZEOF_HDR..SIZEOF_HDR + 4], Self::SIZE as i32);
        LittleEndian::write_i16_into(&self.dim, &mut buf[DIM..DIM + 16]);
        LittleEndian::write_i16(&mut buf[DATATYPE..DATATYPE + 2], self.kind.nifti_code());
        LittleEndian::write_i16(
            &mut buf[BITPIX..BITPIX + 2],
            (self.kind.byte_size() * 8) as i16,
        );
        LittleEndian::write_f32_into(&self.pixdim, &mut buf[PIXDIM..PIXDIM + 32]);
        LittleEndian::write_f32(&mut buf[VOX_OFFSET..VOX_OFFSET + 4], self.vox_offset);
        LittleEndian::write_f32(&mut buf[SCL_SLOPE..SCL_SLOPE + 4], self.scl_slope);
        LittleEndian::write_f32(&mut buf[SCL_INTER..SCL_INTER + 4], self.scl_inter);
        buf[XYZT_UNITS] = self.xyzt_units;

        // descrip is 80 bytes, NUL-terminated
        let descrip = self.descrip.as_bytes();
        let len = descrip.len().min(79);
        buf[DESCRIP..DESCRIP + len].copy_from_slice(&descrip[..len]);

        LittleEndian::write_i16(&mut buf[QFORM_CODE..QFORM_CODE + 2], self.qform_code);
        LittleEndian::write_i16(&mut buf[SFORM_CODE..SFORM_CODE + 2], self.sform_code);
        LittleEndian::write_f32_into(&self.srow_x, &mut buf[SROW_X..SROW_X + 16]);
        LittleEndian::write_f32_into(&self.srow_y, &mut buf[SROW_Y..SROW_Y + 16]);
        LittleEndian::write_f32_into(&self.srow_z, &mut buf[SROW_Z..SROW_Z + 16]);
        buf[MAGIC..MAGIC + 4].copy_from_slice(b"n+1\0");
        buf
    }

    /// Grid extents; axes beyond `dim[0]` count as 1.
    pub fn extents(&self) -> Extents {
        let ndim = self.dim[0] as usize;
        let size = |axis: usize| {
            if axis <= ndim {
                self.dim[axis].max(0) as usize
            } else {
                1
            }
        };
        Extents::new(size(1), size(2), size(3), size(4))
    }

    /// Byte length of the voxel block, or `None` on overflow.
    pub fn data_len(&self) -> Option<usize> {
        let e = self.extents();
        [e.ny, e.nz, e.nt, self.kind.byte_size()]
            .into_iter()
            .try_fold(e.nx, usize::checked_mul)
    }

    /// True if the file stores values in little-endian order.
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }
}
