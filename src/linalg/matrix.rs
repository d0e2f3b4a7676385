use nalgebra::SMatrix;

use crate::error::{RenderError, RenderResult};

/// Division by a scalar that refuses an exact zero divisor.
pub trait CheckedDiv: Sized {
    fn checked_div(&self, scalar: f64) -> RenderResult<Self>;
}

impl<const R: usize, const C: usize> CheckedDiv for SMatrix<f64, R, C> {
    fn checked_div(&self, scalar: f64) -> RenderResult<Self> {
        if scalar == 0.0 {
            return Err(RenderError::DivisionByZero);
        }
        return Ok(self.map(|value| value / scalar));
    }
}

/// Determinant by cofactor expansion along the first row.
pub fn determinant<const N: usize>(m: &SMatrix<f64, N, N>) -> f64 {
    return expand(m, index_set(N), index_set(N));
}

/// Determinant of `m` with `row` and `col` removed.
pub fn minor_determinant<const N: usize>(m: &SMatrix<f64, N, N>, row: usize, col: usize) -> f64 {
    assert!(row < N && col < N, "minor ({}, {}) outside of a {}x{} matrix", row, col, N, N);
    return expand(m, index_set(N) & !(1 << row), index_set(N) & !(1 << col));
}

/// Signed minor: (-1)^(row + col) * M(row, col).
pub fn cofactor<const N: usize>(m: &SMatrix<f64, N, N>, row: usize, col: usize) -> f64 {
    let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
    return sign * minor_determinant(m, row, col);
}

pub fn cofactor_matrix<const N: usize>(m: &SMatrix<f64, N, N>) -> SMatrix<f64, N, N> {
    return SMatrix::from_fn(|i, j| cofactor(m, i, j));
}

/// Transposed cofactor matrix.
pub fn adjugate<const N: usize>(m: &SMatrix<f64, N, N>) -> SMatrix<f64, N, N> {
    return cofactor_matrix(m).transpose();
}

/// (M^-1)^T, which equals the cofactor matrix over the determinant.
///
/// Only an exactly zero determinant is rejected; near-singular input is the
/// caller's business.
pub fn inverse_transpose<const N: usize>(m: &SMatrix<f64, N, N>) -> RenderResult<SMatrix<f64, N, N>> {
    let cofactors = cofactor_matrix(m);
    // Expansion along the first row reuses the cofactors we already have.
    let det: f64 = (0..N).map(|j| m[(0, j)] * cofactors[(0, j)]).sum();
    if det == 0.0 {
        return Err(RenderError::SingularMatrix { size: N });
    }
    return cofactors.checked_div(det);
}

pub fn inverse<const N: usize>(m: &SMatrix<f64, N, N>) -> RenderResult<SMatrix<f64, N, N>> {
    return Ok(inverse_transpose(m)?.transpose());
}

/// Bit set holding the indices 0..n.
fn index_set(n: usize) -> u64 {
    assert!(n <= 64, "cofactor expansion supports at most 64x64 matrices");
    return if n == 0 { 0 } else { u64::MAX >> (64 - n) };
}

/// Determinant of the block of `m` made of the rows in `rows` and the columns
/// in `cols` (bit i selects index i). Both sets have the same size. The first
/// selected row is expanded; a single element is the base of the recursion.
fn expand<const N: usize>(m: &SMatrix<f64, N, N>, rows: u64, cols: u64) -> f64 {
    if rows == 0 {
        return 1.0;
    }
    let row = rows.trailing_zeros() as usize;
    let rest = rows & (rows - 1);
    if rest == 0 {
        return m[(row, cols.trailing_zeros() as usize)];
    }

    let mut result = 0.0;
    // Alternating sign pattern: + - + - ...
    let mut sign = 1.0;
    let mut remaining = cols;
    while remaining != 0 {
        let col = remaining.trailing_zeros() as usize;
        remaining &= remaining - 1;
        result += sign * m[(row, col)] * expand(m, rest, cols & !(1 << col));
        sign = -sign;
    }
    return result;
}
