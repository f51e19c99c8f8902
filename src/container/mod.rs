//! NIfTI-1 container support.
//!
//! The container is the hub format: every conversion either produces or
//! consumes a [`ContainerImage`]. Its element kind is whatever the file
//! declares, as long as it is one of the five kinds in
//! [`ElementKind`](crate::volume::ElementKind).

mod header;
mod image;
pub mod io;

pub use header::NiftiHeader;
pub use image::ContainerImage;
pub use io::{from_nifti_slice, read_container, read_header, to_nifti_bytes, write_container};
