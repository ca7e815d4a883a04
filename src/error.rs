use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch: {what} is {found:?}, expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("invalid simulation parameters: {0}")]
    InvalidParams(String),
    #[error("unknown command {0:?}, expected improve, reset or quit")]
    UnknownCommand(String),
    #[error("failed to write image")]
    Image(#[from] image::ImageError),
    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Returns `Err(ShapeMismatch)` unless both arrays have the same shape.
pub(crate) fn check_shape(what: &'static str, expected: &[usize], found: &[usize]) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}
