//! Triangle rasterization with barycentric coverage, backface culling and a z-buffer.

use nalgebra::matrix;
use tracing::trace;

use crate::error::RenderResult;
use crate::frame::{Color, FrameState};
use crate::linalg::{determinant, inverse_transpose, perspective_divide, Mat3, Mat4, Vec2, Vec3, Vec4};

/// Barycentric weights down to this much below zero still count as inside.
/// Weights of pixels lying exactly on an edge come out of the inverse as tiny
/// negatives instead of 0, and edge pixels belong to the triangle.
pub const EDGE_TOLERANCE: f64 = 1e-9;

/// Triangles whose doubled screen area is below this are culled. Clockwise
/// (back-facing) triangles have a negative area and always fall below.
pub const MIN_DOUBLED_AREA: f64 = 1.0;

/// What rasterizing one triangle did to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// Back-facing or too thin, nothing was touched.
    Culled,
    /// Number of fragments that passed the depth test.
    Rasterized { fragments: usize },
}

/// Integer pixel rectangle, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub ll: (u32, u32), // lower left corner
    pub ur: (u32, u32), // upper right corner
}

impl BoundingBox {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        return x >= self.ll.0 && x <= self.ur.0 && y >= self.ll.1 && y <= self.ur.1;
    }
}

/// A triangle after perspective divide and viewport mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    /// Pixel-space positions of the vertices.
    pub screen: [Vec2; 3],
    /// Normalized device depth of each vertex.
    pub depths: [f64; 3],
}

impl ScreenTriangle {
    /// Divides clip coordinates by w and applies the viewport.
    /// A vertex with w == 0 cannot be divided and is reported as `DivisionByZero`.
    pub fn from_clip(clip: &[Vec4; 3], viewport: &Mat4) -> RenderResult<ScreenTriangle> {
        let mut screen = [Vec2::zeros(); 3];
        let mut depths = [0.0; 3];
        for i in 0..3 {
            let ndc = perspective_divide(clip[i])?;
            screen[i] = (*viewport * ndc).xy();
            depths[i] = ndc.z;
        }
        return Ok(ScreenTriangle { screen, depths });
    }

    /// Matrix with rows (x, y, 1) per vertex. Its determinant is twice the signed
    /// area, and its inverse transpose maps (x, y, 1) to barycentric weights.
    pub fn orientation(&self) -> Mat3 {
        let [a, b, c] = self.screen;
        return matrix![a.x, a.y, 1.0;
                       b.x, b.y, 1.0;
                       c.x, c.y, 1.0];
    }

    /// Positive for counter-clockwise vertices with y pointing up.
    pub fn signed_area_doubled(&self) -> f64 {
        return determinant(&self.orientation());
    }

    /// Smallest pixel rectangle holding every integer sample point of the
    /// triangle, clipped to the frame. None if nothing is left.
    pub fn bounding_box(&self, width: u32, height: u32) -> Option<BoundingBox> {
        let xs = self.screen.map(|p| p.x);
        let ys = self.screen.map(|p| p.y);
        let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_y = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let max_y = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Float to int casts saturate, so huge or infinite coordinates are fine here.
        let ll_x = (min_x.ceil() as i64).max(0);
        let ll_y = (min_y.ceil() as i64).max(0);
        let ur_x = (max_x.floor() as i64).min(width as i64 - 1);
        let ur_y = (max_y.floor() as i64).min(height as i64 - 1);
        if ll_x > ur_x || ll_y > ur_y {
            return None;
        }
        return Some(BoundingBox {
            ll: (ll_x as u32, ll_y as u32),
            ur: (ur_x as u32, ur_y as u32),
        });
    }
}

/// Barycentric weights as the row-space dual of the screen vertices.
pub struct BarycentricBasis {
    inverse_transpose: Mat3,
}

impl BarycentricBasis {
    /// Fails with `SingularMatrix` for zero-area triangles.
    pub fn new(triangle: &ScreenTriangle) -> RenderResult<BarycentricBasis> {
        return Ok(BarycentricBasis {
            inverse_transpose: inverse_transpose(&triangle.orientation())?,
        });
    }

    pub fn at(&self, x: f64, y: f64) -> Vec3 {
        return self.inverse_transpose * Vec3::new(x, y, 1.0);
    }
}

/// True if no barycentric weight is meaningfully negative. NaN weights are outside.
pub fn is_inside(bar_coord: Vec3) -> bool {
    return bar_coord.x >= -EDGE_TOLERANCE
        && bar_coord.y >= -EDGE_TOLERANCE
        && bar_coord.z >= -EDGE_TOLERANCE;
}

/// Rasterizes one triangle given in clip space into `frame`.
///
/// Back-facing and degenerate triangles (doubled area below 1 pixel) are
/// culled before any inversion happens. Every pixel whose integer coordinates
/// fall inside the closed triangle is depth tested with the interpolated NDC
/// depth; a strictly greater depth overwrites both buffers.
pub fn rasterize(
    clip: &[Vec4; 3],
    viewport: &Mat4,
    frame: &mut FrameState,
    color: Color,
) -> RenderResult<TriangleOutcome> {
    let triangle = ScreenTriangle::from_clip(clip, viewport)?;
    return rasterize_screen(&triangle, frame, color);
}

/// Rasterizes a triangle whose vertices are already in pixel space.
pub fn rasterize_screen(
    triangle: &ScreenTriangle,
    frame: &mut FrameState,
    color: Color,
) -> RenderResult<TriangleOutcome> {
    let area = triangle.signed_area_doubled();
    // Written as a negated comparison so a NaN area gets culled too.
    if !(area >= MIN_DOUBLED_AREA) {
        trace!(area, "triangle culled");
        return Ok(TriangleOutcome::Culled);
    }

    let bbox = match triangle.bounding_box(frame.width(), frame.height()) {
        Some(bbox) => bbox,
        None => return Ok(TriangleOutcome::Rasterized { fragments: 0 }),
    };
    let basis = BarycentricBasis::new(triangle)?;
    let z_values = Vec3::from(triangle.depths);

    let mut fragments = 0;
    for x in bbox.ll.0..=bbox.ur.0 {
        for y in bbox.ll.1..=bbox.ur.1 {
            let bar_coord = basis.at(x as f64, y as f64);
            if !is_inside(bar_coord) {
                continue;
            }
            let z = bar_coord.dot(&z_values);
            if frame.try_write_fragment(x, y, z, color) {
                fragments += 1;
            }
        }
    }
    return Ok(TriangleOutcome::Rasterized { fragments });
}
