//! CPU triangle rasterizer.
//!
//! Meshes go through a look-at view, a perspective projection and a viewport
//! transform, then get filled pixel by pixel with barycentric coverage and a
//! z-buffer. No graphics API is involved.
//!
//! ```no_run
//! use tiny_rasterizer::{Camera, Color, FrameContext, FrameState, Mesh, ViewportRect};
//! use tiny_rasterizer::pipeline::render_mesh;
//!
//! let mesh = Mesh::load_or_empty("obj/african_head.obj");
//! let context = FrameContext::new(&Camera::default(), ViewportRect::inset(800, 800, 16))?;
//! let mut frame = FrameState::new(800, 800)?;
//! render_mesh(&context, &mesh, &mut frame, &mut |_| Color::WHITE);
//! tiny_rasterizer::sink::save_frame(&frame, "framebuffer.tga")?;
//! # Ok::<(), tiny_rasterizer::RenderError>(())
//! ```

pub mod app;
pub mod camera;
pub mod error;
pub mod frame;
pub mod linalg;
pub mod mesh;
pub mod pipeline;
pub mod raster;
pub mod sink;

pub use camera::{Camera, ViewportRect};
pub use error::{RenderError, RenderResult};
pub use frame::{Color, FrameState};
pub use mesh::Mesh;
pub use pipeline::{FrameContext, FrameStats};
pub use raster::TriangleOutcome;
