pub mod dev;
pub mod lcd;
pub mod raw;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum I2cError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the operation is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for I2cError {
    fn from(err: std::io::Error) -> Self {
        I2cError::Io(err.kind())
    }
}

pub type I2cResult<T> = Result<T, I2cError>;

/// A byte-oriented I2C device, already bound to one slave address.
///
/// This is the transport seam of the crate. The LCD drivers decide what bytes
/// to send and when, and push them through this trait one register write at a
/// time; acquiring the bus, addressing and clocking are the backend's job.
/// Errors are propagated as-is, there is no retry or reconnection layer.
pub trait I2cBus: Debug {
    /// Writes a single byte to the bound device.
    fn write_byte(&mut self, byte: u8) -> I2cResult<()>;
}
