//! Error types shared by the whole rasterizer.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a mesh and writing the frame.
///
/// The first group are arithmetic domain errors raised by the linear algebra and
/// camera code, the second group are failures of the mesh loader and image sink.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A vector or matrix was divided by an exact zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Inverse requested for a matrix with a zero determinant.
    #[error("singular {size}x{size} matrix has no inverse")]
    SingularMatrix { size: usize },

    /// Camera `up` is parallel to the viewing direction, or eye coincides with center.
    #[error("degenerate look-at: up vector is parallel to the view direction")]
    DegenerateLookAt,

    /// Perspective projection needs a finite, non-zero focal length.
    #[error("invalid focal length: {0}")]
    InvalidFocalLength(f64),

    /// Frame buffers must cover at least one pixel.
    #[error("invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The OBJ file could not be opened or parsed.
    #[error("failed to load mesh from {}: {source}", .path.display())]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: obj::ObjError,
    },

    /// Encoding or writing an image failed.
    #[error("image error: {0}")]
    Image(#[from] ::image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type RenderResult<T> = Result<T, RenderError>;
