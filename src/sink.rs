//! Writing finished frames to disk through the `image` crate.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::info;

use crate::error::RenderResult;
use crate::frame::FrameState;

/// Color buffer as an image with row 0 at the top, as image files expect.
pub fn to_rgb_image(frame: &FrameState) -> RgbImage {
    let height = frame.height();
    return RgbImage::from_fn(frame.width(), height, |x, y| {
        Rgb(frame.color_at(x, height - 1 - y).to_rgb())
    });
}

/// Depth buffer scaled to 0..=255 over the range of depths actually written.
/// Pixels no fragment reached stay black, the nearest fragment is white.
pub fn to_depth_image(frame: &FrameState) -> GrayImage {
    let written = frame.depth_buffer().iter().copied().filter(|&z| z != f64::MIN);
    let (z_min, z_max) = written.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
        (lo.min(z), hi.max(z))
    });
    let scale = z_max - z_min;

    let height = frame.height();
    return GrayImage::from_fn(frame.width(), height, |x, y| {
        let z = frame.depth_at(x, height - 1 - y);
        if z == f64::MIN {
            return Luma([0]);
        }
        // A single depth value (flat scene) maps to full brightness.
        let t = if scale > 0.0 { (z - z_min) / scale } else { 1.0 };
        Luma([(1.0 + t * 254.0).round() as u8])
    });
}

/// Saves the color buffer. The format follows the file extension (tga, png, bmp, ...);
/// channel ordering on disk is the encoder's business.
pub fn save_frame(frame: &FrameState, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    to_rgb_image(frame).save(path)?;
    info!(path = %path.display(), width = frame.width(), height = frame.height(), "frame written");
    return Ok(());
}

/// Saves the depth visualization.
pub fn save_depth(frame: &FrameState, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    to_depth_image(frame).save(path)?;
    info!(path = %path.display(), "depth image written");
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Color;

    #[test]
    fn image_rows_are_flipped_to_top_down() {
        let mut frame = FrameState::new(2, 3).unwrap();
        frame.try_write_fragment(0, 0, 0.0, Color::RED);
        let image = to_rgb_image(&frame);
        assert_eq!(image.get_pixel(0, 2), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn depth_image_spreads_written_depths() {
        let mut frame = FrameState::new(3, 1).unwrap();
        frame.try_write_fragment(0, 0, -1.0, Color::WHITE);
        frame.try_write_fragment(1, 0, 1.0, Color::WHITE);
        let depth = to_depth_image(&frame);
        assert_eq!(depth.get_pixel(0, 0), &Luma([1]));
        assert_eq!(depth.get_pixel(1, 0), &Luma([255]));
        assert_eq!(depth.get_pixel(2, 0), &Luma([0]));
    }
}
