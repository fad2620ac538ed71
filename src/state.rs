use clap::ValueEnum;

/// How the sphere samples are joined into lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WireStyle {
    /// Latitude rings and longitude meridians
    Grid,
    /// Consecutive sample pairs, as a GPU line list would draw them
    Pairs,
}

impl WireStyle {
    /// The other wire style
    pub fn toggled(self) -> Self {
        match self {
            WireStyle::Grid => WireStyle::Pairs,
            WireStyle::Pairs => WireStyle::Grid,
        }
    }
}

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Enable debug overlay
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Draw a marker at the light position
    pub show_light: bool,
    /// Line topology used to draw the sphere
    pub style: WireStyle,
    /// Cleared when the user asks to quit
    pub running: bool,
}

impl AppState {
    /// Running, unpaused state with the given display options
    pub fn new(style: WireStyle, show_light: bool, debug: bool) -> Self {
        AppState {
            debug,
            paused: false,
            show_light,
            style,
            running: true,
        }
    }
}
