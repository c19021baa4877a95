use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimensions do not match ({}x{}) <-> ({}x{})", .size1.0, .size1.1, .size2.0, .size2.1)]
    SizeMismatch {
        size1: (usize, usize),
        size2: (usize, usize),
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid projection definition: {0}")]
    InvalidProjection(String),
    #[error("Projection error: {0}")]
    Projection(String),
    #[error("No valid point could be reprojected, the extent is undefined")]
    NoValidExtent,
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<proj4rs::errors::Error> for Error {
    fn from(err: proj4rs::errors::Error) -> Self {
        Error::Projection(format!("{err:?}"))
    }
}
