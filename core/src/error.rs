use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No distinct symbol drawn after {0} attempts")]
    RerollLimit(u16),
    #[error("PCM payload has an odd number of bytes ({0})")]
    OddPcmLength(usize),
    #[error("RGBA buffer holds {actual} bytes, expected {expected}")]
    RasterLength { expected: usize, actual: usize },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
