mod config;
mod error;
mod graphics;
mod input;
mod lighting;
mod math;
mod renderer;
mod sphere;
mod state;
mod terminal;
mod vertex;
mod widget;

use crate::config::Args;
use crate::error::{Result, SphereError};
use crate::state::AppState;
use crate::terminal::Terminal;
use crate::widget::SphereWidget;
use clap::Parser;
use crossterm::event;
use log::LevelFilter;
use std::fs::File;
use std::time::{Duration, Instant};

/// Info by default, then `RUST_LOG` directives; `-v` overrides the global
/// level but keeps per-module directives
fn log_builder(args: &Args, env_filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }
    if args.verbose > 0 {
        builder.filter_level(args.log_level());
    }
    builder
}

/// Sends logs to `--log-file`; without one no logger is installed, since
/// the terminal belongs to the renderer
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let env_filters = std::env::var("RUST_LOG").ok();
    log_builder(args, env_filters.as_deref())
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| SphereError::Logging(e.to_string()))
}

/// Polls input until the frame deadline, then updates and draws one frame
fn run(widget: &mut SphereWidget, state: &mut AppState, frame: Duration) -> Result<()> {
    let mut term = Terminal::enter()?;

    while state.running {
        let deadline = Instant::now() + frame;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if timeout.is_zero() || !event::poll(timeout)? {
                break;
            }
            widget.event(&event::read()?, state);
            if !state.running {
                return Ok(());
            }
        }

        widget.update(state);
        term.present(widget.paint(state))?;
    }
    Ok(())
}

/// Main function
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let scene = args.scene()?;
    let fps = args.frame_rate()?;
    let (width, height) = terminal::size()?;
    log::info!(
        "Starting {} {} ({width}x{height} cells, {fps} fps)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let mut widget = SphereWidget::new(&scene, width, height)?;
    let mut state = AppState::new(args.style, args.show_light, args.debug);

    let result = run(
        &mut widget,
        &mut state,
        Duration::from_secs_f64(1.0 / f64::from(fps)),
    );
    match &result {
        Ok(()) => log::info!("Sphere demo finished"),
        Err(e) => log::error!("Sphere demo failed: {e}"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_level(argv: &[&str], env_filters: Option<&str>) -> LevelFilter {
        let args = Args::try_parse_from(argv).unwrap();
        log_builder(&args, env_filters).build().filter()
    }

    #[test]
    fn default_level_is_info() {
        assert_eq!(max_level(&["linesphere"], None), LevelFilter::Info);
    }

    #[test]
    fn rust_log_level_applies_without_verbose_flags() {
        assert_eq!(max_level(&["linesphere"], Some("warn")), LevelFilter::Warn);
        assert_eq!(max_level(&["linesphere"], Some("trace")), LevelFilter::Trace);
    }

    #[test]
    fn verbose_flags_override_rust_log_level() {
        assert_eq!(max_level(&["linesphere", "-v"], Some("warn")), LevelFilter::Debug);
        assert_eq!(max_level(&["linesphere", "-vv"], None), LevelFilter::Trace);
    }

    #[test]
    fn module_directives_survive_verbose_flags() {
        let level = max_level(&["linesphere", "-v"], Some("linesphere::widget=trace"));
        assert_eq!(level, LevelFilter::Trace);
    }
}
