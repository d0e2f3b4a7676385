//! Vectors and matrices the pipeline is built on.
//!
//! Storage and plain arithmetic are nalgebra's fixed-size types, so `z` and `w`
//! only exist where the dimension has them and a mismatched product does not
//! compile. On top of that this module adds a cofactor based determinant and
//! inverse, and divisions that report a zero divisor instead of producing
//! infinities.

use nalgebra as na;

mod matrix;
mod vector;

pub type Vec2 = na::Vector2<f64>;
pub type Vec3 = na::Vector3<f64>;
pub type Vec4 = na::Vector4<f64>;

pub type Matrix<const R: usize, const C: usize> = na::SMatrix<f64, R, C>;
pub type Mat2 = na::Matrix2<f64>;
pub type Mat3 = na::Matrix3<f64>;
pub type Mat4 = na::Matrix4<f64>;

pub use matrix::{
    adjugate, cofactor, cofactor_matrix, determinant, inverse, inverse_transpose, minor_determinant,
    CheckedDiv,
};
pub use vector::{perspective_divide, to_hom_point, Normalized};
