use crate::error::{Result, SphereError};
use crate::state::WireStyle;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Command line options
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linesphere",
    version,
    about = "A console-based 3D wireframe sphere. Drag to rotate, scroll or right-drag to zoom."
)]
pub struct Args {
    /// Sphere radius in world units
    #[arg(long, default_value_t = 1.0)]
    pub radius: f64,

    /// Angular step between latitude/longitude samples, in degrees
    #[arg(long, default_value_t = 5.0)]
    pub step: f64,

    /// Initial zoom; smaller values bring the sphere closer
    #[arg(long, default_value_t = 0.4)]
    pub zoom: f64,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Line topology
    #[arg(long, value_enum, default_value_t = WireStyle::Grid)]
    pub style: WireStyle,

    /// Height of a terminal cell divided by its width
    #[arg(long, default_value_t = 2.0)]
    pub cell_aspect: f64,

    /// Width of a terminal cell in pixels, used to scale drags into touch deltas
    #[arg(long, default_value_t = 8.0)]
    pub cell_pixels: f64,

    /// Draw a marker at the light position
    #[arg(long)]
    pub show_light: bool,

    /// Start with the debug overlay enabled
    #[arg(long)]
    pub debug: bool,

    /// Write logs to this file (the terminal is taken by the renderer)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Validated scene parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub radius: f64,
    pub step: f64,
    pub zoom: f64,
    pub cell_aspect: f64,
    pub cell_pixels: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            radius: 1.0,
            step: 5.0,
            zoom: 0.4,
            cell_aspect: 2.0,
            cell_pixels: 8.0,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SphereError::Config(format!(
            "--{name} must be a positive number, got {value}"
        )))
    }
}

impl Args {
    /// Validates the scene options; every value must be positive and finite
    pub fn scene(&self) -> Result<SceneConfig> {
        Ok(SceneConfig {
            radius: positive("radius", self.radius)?,
            step: positive("step", self.step)?,
            zoom: positive("zoom", self.zoom)?,
            cell_aspect: positive("cell-aspect", self.cell_aspect)?,
            cell_pixels: positive("cell-pixels", self.cell_pixels)?,
        })
    }

    /// Target frames per second, between 1 and 240
    pub fn frame_rate(&self) -> Result<u32> {
        if (1..=240).contains(&self.fps) {
            Ok(self.fps)
        } else {
            Err(SphereError::Config(format!(
                "--fps must be between 1 and 240, got {}",
                self.fps
            )))
        }
    }

    /// Log level picked by the number of `-v` flags
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_scene_defaults() {
        let args = Args::try_parse_from(["linesphere"]).unwrap();
        assert_eq!(args.scene().unwrap(), SceneConfig::default());
        assert_eq!(args.frame_rate().unwrap(), 30);
        assert_eq!(args.style, WireStyle::Grid);
        assert_eq!(args.log_level(), LevelFilter::Info);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn options_are_parsed() {
        let args = Args::try_parse_from([
            "linesphere",
            "--radius",
            "2",
            "--step",
            "10",
            "--style",
            "pairs",
            "--show-light",
            "--log-file",
            "sphere.log",
            "-vv",
        ])
        .unwrap();
        let scene = args.scene().unwrap();
        assert_eq!(scene.radius, 2.0);
        assert_eq!(scene.step, 10.0);
        assert_eq!(args.style, WireStyle::Pairs);
        assert!(args.show_light);
        assert_eq!(args.log_file, Some(PathBuf::from("sphere.log")));
        assert_eq!(args.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let args = Args::try_parse_from(["linesphere", "--zoom", "0"]).unwrap();
        assert!(matches!(args.scene(), Err(SphereError::Config(_))));

        let args = Args::try_parse_from(["linesphere", "--fps", "0"]).unwrap();
        assert!(args.frame_rate().is_err());

        assert!(Args::try_parse_from(["linesphere", "--style", "solid"]).is_err());
    }
}
