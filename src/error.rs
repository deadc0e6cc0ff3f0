use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported algorithm '{0}' (expected 'bezier' or 'perlin')")]
    UnsupportedAlgorithm(String),

    #[error("trajectory needs at least 2 points")]
    EmptyTrajectory,
}

pub type Result<T> = std::result::Result<T, Error>;
