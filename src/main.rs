use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiny_rasterizer::app::{self, FillMode, Params};
use tiny_rasterizer::linalg::Vec3;
use tiny_rasterizer::{Camera, Color};

/// Renders a triangulated OBJ mesh into an image file on the CPU.
#[derive(Parser, Debug)]
#[command(name = "tiny-rasterizer", version, about)]
struct Cli {
    /// Wavefront OBJ file to render
    #[arg(default_value = "obj/african_head.obj")]
    model: PathBuf,

    /// Output image, format taken from the extension (tga, png, bmp)
    #[arg(short, long, default_value = "framebuffer.tga")]
    output: PathBuf,

    /// Also write a grayscale image of the depth buffer
    #[arg(long)]
    depth_output: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "-1,0,2", allow_hyphen_values = true)]
    eye: Vec3,

    /// Point the camera looks at, as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    center: Vec3,

    /// Camera up direction as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,1,0", allow_hyphen_values = true)]
    up: Vec3,

    /// Focal length; defaults to the eye-center distance
    #[arg(long)]
    focal: Option<f64>,

    /// Viewport margin as a fraction 1/INSET of the image size, 0 for none
    #[arg(long, default_value_t = 16)]
    inset: u32,

    /// Paint every face with this color (rrggbb) instead of random colors
    #[arg(long)]
    color: Option<Color>,

    /// Seed for random face colors
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Background color (rrggbb)
    #[arg(long, default_value = "000000")]
    background: Color,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let components = s
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| format!("{:?}: {}", c, e)))
        .collect::<Result<Vec<f64>, String>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {:?}", s)),
    }
}

impl From<Cli> for Params {
    fn from(cli: Cli) -> Self {
        let fill = match cli.color {
            Some(color) => FillMode::Solid(color),
            None => FillMode::Random { seed: cli.seed },
        };
        return Params {
            width: cli.width,
            height: cli.height,
            model_path: cli.model,
            output_path: cli.output,
            depth_output_path: cli.depth_output,
            camera: Camera {
                eye: cli.eye,
                center: cli.center,
                up: cli.up,
                focal_length: cli.focal,
            },
            inset: cli.inset,
            fill,
            background: cli.background,
        };
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let params = Params::from(cli);
    let output = params.output_path.clone();
    let stats = app::run(&params).with_context(|| format!("rendering to {}", output.display()))?;
    println!(
        "{} triangles: {} drawn, {} culled, {} skipped, {} fragments",
        stats.triangles, stats.rasterized, stats.culled, stats.skipped, stats.fragments
    );

    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_argument_parsing() {
        assert_eq!(parse_vec3("-1, 0,2.5").unwrap(), Vec3::new(-1.0, 0.0, 2.5));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn cli_defaults_match_params_defaults() {
        let cli = Cli::parse_from(["tiny-rasterizer"]);
        assert_eq!(Params::from(cli), Params::default());
    }

    #[test]
    fn solid_color_flag_selects_solid_fill() {
        let cli = Cli::parse_from(["tiny-rasterizer", "mesh.obj", "--color", "ff0000", "--eye", "1,1,3"]);
        let params = Params::from(cli);
        assert_eq!(params.fill, FillMode::Solid(Color::RED));
        assert_eq!(params.camera.eye, Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(params.model_path, PathBuf::from("mesh.obj"));
    }
}
