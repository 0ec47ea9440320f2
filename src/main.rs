//! uavview-render: paint one viewport frame to a PNG.

use std::path::{Path, PathBuf};

use clap::Parser;
use uavview::canvas::{Point, Size, SkiaPainter};
use uavview::frame::test_pattern;
use uavview::{ImageViewport, Uav, ViewportConfig};

#[derive(Parser)]
#[command(name = "uavview-render")]
#[command(version, about = "Render a UAV frame with heading marker and info panel", long_about = None)]
struct Cli {
    /// Input image; a generated test pattern is used when omitted
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long, value_name = "FILE", default_value = "uavview.png")]
    output: PathBuf,

    /// Viewport size
    #[arg(long, value_name = "WxH", default_value = "800x600")]
    size: String,

    /// Marker heading in degrees, clockwise from north
    #[arg(long, value_name = "DEGREES", default_value = "0", allow_hyphen_values = true)]
    yaw: f32,

    /// Marker position in image pixels (defaults to the image center)
    #[arg(long, value_name = "X,Y")]
    marker: Option<String>,

    /// Wheel steps applied at the viewport center after fitting (negative zooms out)
    #[arg(long, value_name = "N", default_value = "0", allow_hyphen_values = true)]
    zoom: i32,

    /// Config file (defaults to the user config file when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory searched for marker icons before the built-in ones
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// UAV description (JSON) whose icon and name are shown
    #[arg(long, value_name = "FILE")]
    uav: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if let Err(e) = run(cli, config) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewportConfig, String> {
    match path {
        Some(path) => ViewportConfig::load_from_file(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e)),
        None => Ok(ViewportConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn run(cli: Cli, mut config: ViewportConfig) -> Result<(), String> {
    let (width, height) = parse_size(&cli.size)?;

    if let Some(dir) = cli.assets {
        config.asset_dir = dir;
    }
    if let Some(path) = &cli.uav {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read UAV file {}: {}", path.display(), e))?;
        let uav = Uav::from_json(&json)
            .map_err(|e| format!("Failed to parse UAV file {}: {}", path.display(), e))?;
        log::info!("Showing UAV {}", uav.name);
        config.overlay = config.overlay.with_uav(&uav);
    }

    let image = match &cli.input {
        Some(path) => image::open(path)
            .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?,
        None => {
            log::info!("No input given, using a {}x{} test pattern", width, height);
            test_pattern(width, height)
        }
    };

    let mut viewport = ImageViewport::new(config);
    viewport.set_image(&image).map_err(|e| e.to_string())?;
    viewport.on_viewport_resize(None, Size::new(width as f32, height as f32));
    viewport.fit_to_view();

    let center = Point::new(width as f32 / 2.0, height as f32 / 2.0);
    for _ in 0..cli.zoom.unsigned_abs() {
        viewport.zoom(cli.zoom.signum() as f32, false, center);
    }

    let marker = match &cli.marker {
        Some(s) => parse_point(s)?,
        None => {
            let canvas = viewport.canvas_size();
            Point::new(canvas.width / 2.0, canvas.height / 2.0)
        }
    };
    viewport.set_marker(cli.yaw, marker);

    let mut painter = SkiaPainter::new(width, height).map_err(|e| e.to_string())?;
    viewport.paint(&mut painter);
    painter
        .save_png(&cli.output)
        .map_err(|e| format!("Failed to write {}: {}", cli.output.display(), e))?;

    log::info!(
        "Wrote {} (scale {:.3})",
        cli.output.display(),
        viewport.scale()
    );
    Ok(())
}

/// Parse a viewport size in format "WxH"
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Size must be in format WxH (e.g., 800x600), got: {}", s))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid width: {}", w))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid height: {}", h))?;
    if width == 0 || height == 0 {
        return Err(format!("Size must be non-zero, got: {}", s));
    }
    Ok((width, height))
}

/// Parse a point in format "X,Y"
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Point must be in format X,Y, got: {}", s))?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("Invalid x value: {}", x))?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("Invalid y value: {}", y))?;
    Ok(Point::new(x, y))
}
