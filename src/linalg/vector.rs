use nalgebra::{vector, SVector};

use super::matrix::CheckedDiv;
use super::{Vec3, Vec4};
use crate::error::RenderResult;

/// Unit vector that reports a zero-length input instead of returning NaNs.
pub trait Normalized: Sized {
    fn normalized(&self) -> RenderResult<Self>;
}

impl<const D: usize> Normalized for SVector<f64, D> {
    fn normalized(&self) -> RenderResult<Self> {
        return self.checked_div(self.norm());
    }
}

/// Transformation of a point to homogeneous coordinates.
pub fn to_hom_point(v: Vec3) -> Vec4 {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Divides every component by w, so the result has w == 1.
/// Fails for points at infinity (w == 0).
pub fn perspective_divide(v: Vec4) -> RenderResult<Vec4> {
    return v.checked_div(v.w);
}
