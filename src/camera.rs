//! Builders for the three per-frame transforms: look-at view, perspective and viewport.

use nalgebra::matrix;
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::linalg::{Mat4, Normalized, Vec3};

/// Perspective projection, which after the divide by w shrinks points by a factor
/// of `1 - z / focal`. The camera looks down -z, so `focal` is the distance from
/// the eye to the z = 0 plane.
pub fn perspective(focal: f64) -> RenderResult<Mat4> {
    if focal == 0.0 || !focal.is_finite() {
        return Err(RenderError::InvalidFocalLength(focal));
    }
    let coef = -1.0 / focal;
    return Ok(matrix![1.0, 0.0, 0.0,  0.0;
                      0.0, 1.0, 0.0,  0.0;
                      0.0, 0.0, 1.0,  0.0;
                      0.0, 0.0, coef, 1.0]);
}

/// Maps normalized device coordinates [-1, 1] onto the pixel rectangle
/// [x, x + w] x [y, y + h]. z passes through unchanged.
pub fn viewport(x: f64, y: f64, w: f64, h: f64) -> Mat4 {
    return matrix![w / 2.0, 0.0,     0.0, x + w / 2.0;
                   0.0,     h / 2.0, 0.0, y + h / 2.0;
                   0.0,     0.0,     1.0, 0.0;
                   0.0,     0.0,     0.0, 1.0];
}

/// View matrix placing `center` at the origin with the camera looking at it from `eye`.
///
/// Builds an orthonormal basis with Gram-Schmidt:
/// forward = eye - center, right = up x forward, true up = forward x right.
/// Fails if `up` is parallel to the view direction or if eye == center.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> RenderResult<Mat4> {
    let forward = (eye - center)
        .normalized()
        .map_err(|_| RenderError::DegenerateLookAt)?;
    let right = up
        .cross(&forward)
        .normalized()
        .map_err(|_| RenderError::DegenerateLookAt)?;
    let true_up = forward
        .cross(&right)
        .normalized()
        .map_err(|_| RenderError::DegenerateLookAt)?;

    let rotation = matrix![right.x,   right.y,   right.z,   0.0;
                           true_up.x, true_up.y, true_up.z, 0.0;
                           forward.x, forward.y, forward.z, 0.0;
                           0.0,       0.0,       0.0,       1.0];
    let translation = matrix![1.0, 0.0, 0.0, -center.x;
                              0.0, 1.0, 0.0, -center.y;
                              0.0, 0.0, 1.0, -center.z;
                              0.0, 0.0, 0.0, 1.0];
    return Ok(rotation * translation);
}

/// Camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Explicit focal length. When absent the distance from eye to center is used.
    pub focal_length: Option<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        return Self {
            eye: Vec3::new(-1.0, 0.0, 2.0),
            center: Vec3::new(0.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            focal_length: None,
        };
    }
}

impl Camera {
    pub fn focal_length(&self) -> f64 {
        return self.focal_length.unwrap_or_else(|| (self.eye - self.center).norm());
    }

    pub fn view_matrix(&self) -> RenderResult<Mat4> {
        return look_at(self.eye, self.center, self.up);
    }

    pub fn projection_matrix(&self) -> RenderResult<Mat4> {
        return perspective(self.focal_length());
    }
}

/// Pixel rectangle the normalized device square is stretched onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    /// Whole image.
    pub fn full(image_width: u32, image_height: u32) -> Self {
        return Self {
            x: 0.0,
            y: 0.0,
            width: image_width as f64,
            height: image_height as f64,
        };
    }

    /// Image shrunk by a margin of `1 / divisor` of its size on every side, with
    /// the rectangle `(divisor - 2) / divisor` of the image wide and high. Integer
    /// arithmetic keeps it on whole pixels, so 16 gives `(w/16, h/16, w*7/8, h*7/8)`.
    /// A divisor of 0 means no margin.
    pub fn inset(image_width: u32, image_height: u32, divisor: u32) -> Self {
        if divisor == 0 {
            return Self::full(image_width, image_height);
        }
        let inner = |size: u32| size as u64 * divisor.saturating_sub(2) as u64 / divisor as u64;
        let rect = Self {
            x: (image_width / divisor) as f64,
            y: (image_height / divisor) as f64,
            width: inner(image_width) as f64,
            height: inner(image_height) as f64,
        };
        debug!(?rect, divisor, "viewport inset");
        return rect;
    }

    pub fn matrix(&self) -> Mat4 {
        return viewport(self.x, self.y, self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{to_hom_point, Vec2, Vec4};
    use approx::assert_abs_diff_eq;

    #[test]
    fn viewport_maps_ndc_origin_to_center() {
        let p = viewport(0.0, 0.0, 800.0, 800.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(400.0, 400.0, 0.0, 1.0));
    }

    #[test]
    fn viewport_maps_ndc_corners_to_rectangle() {
        let m = viewport(50.0, 20.0, 700.0, 600.0);
        assert_eq!((m * Vec4::new(-1.0, -1.0, 0.5, 1.0)).xy(), Vec2::new(50.0, 20.0));
        assert_eq!((m * Vec4::new(1.0, 1.0, 0.5, 1.0)).xyz(), Vec3::new(750.0, 620.0, 0.5));
    }

    #[test]
    fn perspective_puts_depth_into_w() {
        let p = perspective(2.0).unwrap() * Vec4::new(1.0, 1.0, -2.0, 1.0);
        assert_eq!(p.w, 2.0);
        assert!(matches!(perspective(0.0), Err(RenderError::InvalidFocalLength(_))));
        assert!(perspective(f64::NAN).is_err());
    }

    #[test]
    fn look_at_basis_is_orthonormal() {
        let m = look_at(Vec3::new(-1.0, 0.5, 2.0), Vec3::new(0.2, 0.0, 0.1), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let rows: Vec<Vec3> = (0..3).map(|i| Vec3::new(m[(i, 0)], m[(i, 1)], m[(i, 2)])).collect();
        for i in 0..3 {
            assert_abs_diff_eq!(rows[i].norm(), 1.0, epsilon = 1e-12);
            for j in (i + 1)..3 {
                assert_abs_diff_eq!(rows[i].dot(&rows[j]), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn look_at_moves_center_to_origin_and_eye_onto_z() {
        let eye = Vec3::new(-1.0, 0.0, 2.0);
        let center = Vec3::new(0.0, 0.0, 0.0);
        let m = look_at(eye, center, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(m * to_hom_point(center), Vec4::new(0.0, 0.0, 0.0, 1.0));
        let eye_in_view = m * to_hom_point(eye);
        assert_abs_diff_eq!(eye_in_view.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eye_in_view.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eye_in_view.z, 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn look_at_rejects_parallel_up() {
        let result = look_at(Vec3::new(0.0, 3.0, 0.0), Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert!(matches!(result, Err(RenderError::DegenerateLookAt)));
        let result = look_at(Vec3::zeros(), Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert!(matches!(result, Err(RenderError::DegenerateLookAt)));
    }

    #[test]
    fn default_camera_focal_is_eye_distance() {
        let camera = Camera::default();
        assert_abs_diff_eq!(camera.focal_length(), 5.0_f64.sqrt());
        let camera = Camera { focal_length: Some(3.0), ..Camera::default() };
        assert_eq!(camera.focal_length(), 3.0);
    }

    #[test]
    fn inset_reproduces_one_sixteenth_margin() {
        let rect = ViewportRect::inset(800, 800, 16);
        assert_eq!(rect, ViewportRect { x: 50.0, y: 50.0, width: 700.0, height: 700.0 });
        assert_eq!(ViewportRect::inset(640, 480, 0), ViewportRect::full(640, 480));
    }

    #[test]
    fn inset_size_follows_seven_eighths_for_odd_widths() {
        let rect = ViewportRect::inset(810, 100, 16);
        assert_eq!(rect.x, 50.0);
        assert_eq!(rect.width, (810 * 7 / 8) as f64);
        assert_eq!(rect.y, 6.0);
        assert_eq!(rect.height, (100 * 7 / 8) as f64);
    }
}
