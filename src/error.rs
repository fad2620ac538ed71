use thiserror::Error;

/// Errors raised while setting up or driving the sphere demo
#[derive(Error, Debug)]
pub enum SphereError {
    /// Terminal or log file IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sphere parameters that cannot produce a surface
    #[error("Invalid sphere geometry: {0}")]
    Geometry(String),

    /// Projection bounds that collapse the view volume
    #[error("Degenerate frustum: {0}")]
    Frustum(String),

    /// Command line values out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unable to determine terminal size")]
    TerminalSize,

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, SphereError>;
