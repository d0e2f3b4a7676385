use std::path::PathBuf;
use std::time;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::camera::{Camera, ViewportRect};
use crate::error::RenderResult;
use crate::frame::{Color, FrameState};
use crate::mesh::Mesh;
use crate::pipeline::{render_mesh, FrameContext, FrameStats};
use crate::sink;

/// How faces get their fill color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillMode {
    /// Every face one color.
    Solid(Color),
    /// A fresh random color per face, reproducible from the seed.
    Random { seed: u64 },
}

/// Everything one render needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub model_path: PathBuf,
    pub output_path: PathBuf,
    pub depth_output_path: Option<PathBuf>,
    pub camera: Camera,
    /// Viewport margin is 1 / inset of the image size on every side, 0 for none.
    pub inset: u32,
    pub fill: FillMode,
    pub background: Color,
}

impl Default for Params {
    fn default() -> Self {
        return Self {
            width: 800,
            height: 800,
            model_path: PathBuf::from("obj/african_head.obj"),
            output_path: PathBuf::from("framebuffer.tga"),
            depth_output_path: None,
            camera: Camera::default(),
            inset: 16,
            fill: FillMode::Random { seed: 0 },
            background: Color::BLACK,
        };
    }
}

/// Source of per-face colors for one frame.
pub struct FacePalette {
    mode: FillMode,
    rng: StdRng,
}

impl FacePalette {
    pub fn new(mode: FillMode) -> FacePalette {
        let seed = match mode {
            FillMode::Random { seed } => seed,
            FillMode::Solid(_) => 0,
        };
        return FacePalette { mode, rng: StdRng::seed_from_u64(seed) };
    }

    /// Color for the next face. Random channels are drawn from 0..255 like the
    /// classic demo, so pure white never shows up.
    pub fn next_color(&mut self) -> Color {
        return match self.mode {
            FillMode::Solid(color) => color,
            FillMode::Random { .. } => Color::new(
                self.rng.gen_range(0..255),
                self.rng.gen_range(0..255),
                self.rng.gen_range(0..255),
            ),
        };
    }
}

/// Renders the whole frame described by `params` into memory.
pub fn render(params: &Params, mesh: &Mesh) -> RenderResult<(FrameState, FrameStats)> {
    let viewport = ViewportRect::inset(params.width, params.height, params.inset);
    let context = FrameContext::new(&params.camera, viewport)?;
    let mut frame = FrameState::with_background(params.width, params.height, params.background)?;
    let mut palette = FacePalette::new(params.fill);

    let time_begin = time::Instant::now();
    let stats = render_mesh(&context, mesh, &mut frame, &mut |_| palette.next_color());
    debug!(elapsed_ms = time_begin.elapsed().as_secs_f64() * 1000.0, "rasterization done");

    return Ok((frame, stats));
}

/// One invocation, one frame: load the mesh, rasterize it and write the image(s).
/// A mesh that cannot be loaded yields an empty frame rather than an error.
pub fn run(params: &Params) -> RenderResult<FrameStats> {
    info!(
        model = %params.model_path.display(),
        width = params.width,
        height = params.height,
        "rendering"
    );
    let mesh = Mesh::load_or_empty(&params.model_path);
    if mesh.is_empty() {
        warn!("mesh has no faces, the frame will only contain the background");
    }

    let (frame, stats) = render(params, &mesh)?;

    sink::save_frame(&frame, &params.output_path)?;
    if let Some(depth_path) = &params.depth_output_path {
        sink::save_depth(&frame, depth_path)?;
    }
    return Ok(stats);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_palette_is_reproducible() {
        let mut a = FacePalette::new(FillMode::Random { seed: 7 });
        let mut b = FacePalette::new(FillMode::Random { seed: 7 });
        let colors_a: Vec<Color> = (0..16).map(|_| a.next_color()).collect();
        let colors_b: Vec<Color> = (0..16).map(|_| b.next_color()).collect();
        assert_eq!(colors_a, colors_b);
        assert!(colors_a.iter().all(|c| c.r < 255 && c.g < 255 && c.b < 255));
    }

    #[test]
    fn solid_palette_repeats_its_color() {
        let mut palette = FacePalette::new(FillMode::Solid(Color::GREEN));
        assert_eq!(palette.next_color(), Color::GREEN);
        assert_eq!(palette.next_color(), Color::GREEN);
    }

    #[test]
    fn empty_mesh_renders_background_only() {
        let params = Params { width: 32, height: 16, background: Color::BLUE, ..Params::default() };
        let (frame, stats) = render(&params, &Mesh::default()).unwrap();
        assert_eq!(stats, FrameStats::default());
        assert!(frame.color_buffer().iter().all(|&c| c == Color::BLUE));
    }

    #[test]
    fn zero_sized_frame_is_an_error() {
        let params = Params { width: 0, ..Params::default() };
        assert!(render(&params, &Mesh::default()).is_err());
    }
}
