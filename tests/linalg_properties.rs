use approx::assert_abs_diff_eq;
use nalgebra::matrix;

use tiny_rasterizer::linalg::{
    adjugate, determinant, inverse, inverse_transpose, Mat2, Mat3, Mat4, Matrix, Vec3,
};
use tiny_rasterizer::RenderError;

fn assert_identity<const N: usize>(m: &Matrix<N, N>) {
    assert_abs_diff_eq!(*m, Matrix::<N, N>::identity(), epsilon = 1e-9);
}

/// A few non-singular matrices with mixed signs and magnitudes.
fn sample_mat4s() -> Vec<Mat4> {
    return vec![
        matrix![4.0, 7.0, 2.0, 3.0;
                0.0, 5.0, 0.0, 1.0;
                1.0, 0.0, 3.0, 0.0;
                2.0, 1.0, 0.0, 6.0],
        matrix![0.5, -1.25, 3.0,  0.0;
                2.0,  0.0, -4.0,  1.0;
               -3.5,  1.0,  0.25, 2.0;
                1.0,  1.0,  1.0, -1.0],
        matrix![1e3, 2.0,  0.0, -7.0;
                0.0, 1e-2, 3.0,  0.0;
                5.0, 0.0,  1.0,  0.0;
                0.0, 4.0,  0.0,  1.0],
    ];
}

#[test]
fn cofactor_determinant_agrees_with_lu() {
    for m in sample_mat4s() {
        let expected = m.determinant();
        assert_abs_diff_eq!(determinant(&m), expected, epsilon = 1e-9 * expected.abs().max(1.0));
    }
}

#[test]
fn cofactor_inverse_agrees_with_lu() {
    for m in sample_mat4s() {
        let ours = inverse(&m).unwrap();
        let theirs = m.try_inverse().unwrap();
        assert_abs_diff_eq!(ours, theirs, epsilon = 1e-9);
    }
}

#[test]
fn inverse_round_trip_for_every_size() {
    let m2: Mat2 = matrix![3.0, -1.0;
                           2.5,  4.0];
    assert_identity(&(m2 * inverse(&m2).unwrap()));

    let m3: Mat3 = matrix![ 2.0, -1.0,  0.0;
                           -1.0,  2.0, -1.0;
                            0.0, -1.0,  2.0];
    assert_identity(&(m3 * inverse(&m3).unwrap()));

    for m4 in sample_mat4s() {
        assert_identity(&(m4 * inverse(&m4).unwrap()));
    }
}

#[test]
fn inverse_transpose_is_transpose_of_inverse() {
    for m in sample_mat4s() {
        let a = inverse_transpose(&m).unwrap();
        let b = inverse(&m).unwrap().transpose();
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn adjugate_times_matrix_is_determinant_times_identity() {
    let m = sample_mat4s()[1];
    let product = adjugate(&m) * m;
    assert_abs_diff_eq!(product, Mat4::identity() * determinant(&m), epsilon = 1e-9);
}

#[test]
fn singular_matrices_report_an_error() {
    let rank_deficient: Mat4 = matrix![1.0, 2.0, 3.0, 4.0;
                                       2.0, 4.0, 6.0, 8.0;
                                       0.0, 1.0, 0.0, 1.0;
                                       5.0, 0.0, 1.0, 0.0];
    assert_eq!(determinant(&rank_deficient), 0.0);
    assert!(matches!(inverse(&rank_deficient), Err(RenderError::SingularMatrix { size: 4 })));
}

#[test]
fn cross_product_is_orthogonal_to_its_inputs() {
    let a = Vec3::new(1.5, -2.0, 0.25);
    let b = Vec3::new(-0.5, 4.0, 3.0);
    let c = a.cross(&b);
    assert_abs_diff_eq!(c.dot(&a), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(c.dot(&b), 0.0, epsilon = 1e-12);
}
