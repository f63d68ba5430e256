/// cel3d - rotating meshes rendered as terminal glyphs
///
/// Controls:
///   - WASD / Arrow Keys: Turn the camera
///   - E/R: Roll the camera
///   - Q/ESC: Quit
use anyhow::Context;
use cel3d_core::config::{Shape, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use cel3d_core::{RenderConfig, Renderer};
use cel3d_terminal::TerminalApp;
use clap::{Parser, ValueEnum};
use crossterm::terminal;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    Cube,
    Tetrahedron,
}

impl From<ShapeArg> for Shape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Cube => Shape::Cube,
            ShapeArg::Tetrahedron => Shape::Tetrahedron,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cel3d", version, about = "Render rotating 3D meshes as terminal glyphs")]
struct Cli {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Canvas width in columns (defaults to the terminal width)
    #[arg(long)]
    width: Option<usize>,

    /// Canvas height in rows (defaults to the terminal height)
    #[arg(long)]
    height: Option<usize>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<f64>,

    /// Built-in shape to render
    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,

    /// Render an STL file instead of a built-in shape
    #[arg(long, value_name = "FILE")]
    stl: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print a single frame to stdout and exit
    #[arg(long)]
    once: bool,

    /// Overlay FPS and triangle counts on the top row
    #[arg(long)]
    status: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config file {}", path.display());
                RenderConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?
            }
            None => RenderConfig::default(),
        };

        if self.width.is_some() {
            config.viewport.width = self.width;
        }
        if self.height.is_some() {
            config.viewport.height = self.height;
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(shape) = self.shape {
            config.scene.shape = shape.into();
        }
        if self.stl.is_some() {
            config.scene.stl = self.stl.clone();
        }

        config.validate().context("invalid settings")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; the frame owns stdout
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let mesh = config.scene.load_mesh().context("failed to load scene mesh")?;
    info!("Loaded {} triangles", mesh.len());

    let fallback = terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or_else(|e| {
            warn!(
                "Could not read terminal size ({}), using {}x{}",
                e, DEFAULT_WIDTH, DEFAULT_HEIGHT
            );
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        });
    let viewport = config.viewport_or(fallback);

    let mut renderer = Renderer::with_viewport(&config, viewport)?;
    renderer.extend(mesh);

    if cli.once {
        println!("{}", renderer.draw());
        return Ok(());
    }

    let mut app = TerminalApp::new(renderer, &config.animation, cli.frames, cli.status);
    app.run().context("terminal loop failed")?;

    Ok(())
}
