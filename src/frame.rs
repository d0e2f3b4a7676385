use std::str::FromStr;

use thiserror::Error;

use crate::error::{RenderError, RenderResult};

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0,   g: 0,   b: 0,   };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, };
    pub const RED:   Color = Color { r: 255, g: 0,   b: 0,   };
    pub const GREEN: Color = Color { r: 0,   g: 255, b: 0,   };
    pub const BLUE:  Color = Color { r: 0,   g: 0,   b: 255, };

    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        return Color { r, g, b };
    }

    pub const fn to_rgb(self) -> [u8; 3] {
        return [self.r, self.g, self.b];
    }
}

/// Failure to read a color from a `rrggbb` hex string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a color as rrggbb or #rrggbb, got {0:?}")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts `rrggbb` or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        return Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }
}

/// Depth and color buffers for one frame.
///
/// Both are flat row-major arrays of width * height entries, (0, 0) is the
/// bottom left pixel. Larger depth means nearer to the camera, so the depth
/// buffer starts at the most negative f64 and any real fragment beats it.
pub struct FrameState {
    width: u32,
    height: u32,
    z_buffer: Vec<f64>,
    color_buffer: Vec<Color>,
}

impl FrameState {
    /// Allocates buffers with a black background.
    pub fn new(width: u32, height: u32) -> RenderResult<FrameState> {
        return Self::with_background(width, height, Color::BLACK);
    }

    pub fn with_background(width: u32, height: u32, background: Color) -> RenderResult<FrameState> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let n_pixels = width as usize * height as usize;
        return Ok(FrameState {
            width,
            height,
            z_buffer: vec![f64::MIN; n_pixels],
            color_buffer: vec![background; n_pixels],
        });
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside of a {}x{} frame", x, y, self.width, self.height
        );
        return x as usize + y as usize * self.width as usize;
    }

    pub fn depth_at(&self, x: u32, y: u32) -> f64 {
        return self.z_buffer[self.index(x, y)];
    }

    pub fn color_at(&self, x: u32, y: u32) -> Color {
        return self.color_buffer[self.index(x, y)];
    }

    /// Depth test and write as one step: the fragment lands only if it is
    /// strictly nearer than what the pixel already holds. Returns whether it landed.
    pub fn try_write_fragment(&mut self, x: u32, y: u32, z: f64, color: Color) -> bool {
        let index = self.index(x, y);
        // `!(z > old)` so that a NaN depth never lands.
        if !(z > self.z_buffer[index]) {
            return false;
        }
        self.z_buffer[index] = z;
        self.color_buffer[index] = color;
        return true;
    }

    pub fn depth_buffer(&self) -> &[f64] {
        return &self.z_buffer[..];
    }

    pub fn color_buffer(&self) -> &[Color] {
        return &self.color_buffer[..];
    }

    /// Number of pixels some fragment has been written to since the last clear.
    pub fn covered_pixels(&self) -> usize {
        return self.z_buffer.iter().filter(|&&z| z != f64::MIN).count();
    }
}
