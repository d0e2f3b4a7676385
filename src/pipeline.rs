//! Per-frame transform state and the loop that feeds mesh faces to the rasterizer.

use tracing::{debug, info, warn};

use crate::camera::{Camera, ViewportRect};
use crate::error::RenderResult;
use crate::frame::{Color, FrameState};
use crate::linalg::{to_hom_point, Mat4, Vec3, Vec4};
use crate::mesh::Mesh;
use crate::raster::{rasterize, TriangleOutcome};

/// Frame constants shared by every triangle of a frame. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub modelview: Mat4,
    pub perspective: Mat4,
    pub viewport: Mat4,
    /// perspective * modelview, applied to every vertex.
    clip_transform: Mat4,
}

impl FrameContext {
    pub fn new(camera: &Camera, viewport: ViewportRect) -> RenderResult<FrameContext> {
        let context = Self::from_matrices(
            camera.view_matrix()?,
            camera.projection_matrix()?,
            viewport.matrix(),
        );
        debug!(
            eye = ?camera.eye,
            center = ?camera.center,
            focal = camera.focal_length(),
            "frame context ready\nmodelview:\n{}perspective:\n{}viewport:\n{}",
            context.modelview,
            context.perspective,
            context.viewport
        );
        return Ok(context);
    }

    pub fn from_matrices(modelview: Mat4, perspective: Mat4, viewport: Mat4) -> FrameContext {
        return FrameContext {
            modelview,
            perspective,
            viewport,
            clip_transform: perspective * modelview,
        };
    }

    /// Object-space position to clip space.
    pub fn to_clip(&self, position: Vec3) -> Vec4 {
        return self.clip_transform * to_hom_point(position);
    }

    pub fn transform_triangle(&self, positions: [Vec3; 3]) -> [Vec4; 3] {
        return positions.map(|p| self.to_clip(p));
    }

    /// Transforms and rasterizes one object-space triangle.
    pub fn draw_triangle(
        &self,
        positions: [Vec3; 3],
        frame: &mut FrameState,
        color: Color,
    ) -> RenderResult<TriangleOutcome> {
        let clip = self.transform_triangle(positions);
        return rasterize(&clip, &self.viewport, frame, color);
    }
}

/// Counters collected while drawing a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub rasterized: usize,
    pub culled: usize,
    /// Triangles dropped because of a numeric error, e.g. a vertex on the eye plane.
    pub skipped: usize,
    pub fragments: usize,
}

/// Draws every face of `mesh` in order. `color_for_face` picks the fill color
/// from the face index.
///
/// A triangle that fails with a domain error is logged and skipped; the rest of
/// the frame is still drawn.
pub fn render_mesh(
    context: &FrameContext,
    mesh: &Mesh,
    frame: &mut FrameState,
    color_for_face: &mut dyn FnMut(usize) -> Color,
) -> FrameStats {
    let mut stats = FrameStats::default();
    for (face_index, positions) in mesh.indexed_triangles() {
        stats.triangles += 1;
        let color = color_for_face(face_index);
        match context.draw_triangle(positions, frame, color) {
            Ok(TriangleOutcome::Culled) => stats.culled += 1,
            Ok(TriangleOutcome::Rasterized { fragments }) => {
                stats.rasterized += 1;
                stats.fragments += fragments;
            }
            Err(err) => {
                warn!(face_index, %err, "skipping triangle");
                stats.skipped += 1;
            }
        }
    }
    info!(
        triangles = stats.triangles,
        rasterized = stats.rasterized,
        culled = stats.culled,
        skipped = stats.skipped,
        fragments = stats.fragments,
        "frame rendered"
    );
    return stats;
}
