//! I2C backend using the Broadcom I2C peripheral through the rppal library.
//!
//! This is the backend used on the Raspberry Pi itself. rppal picks the right
//! `/dev/i2c-*` device for the Pi model when [RppalI2cBus::new] is used.
use crate::{I2cBus, I2cError, I2cResult};
use log::debug;
use rppal::i2c::I2c;
use std::fmt::{Debug, Formatter};

/// An [I2cBus] over the Pi's hardware I2C peripheral.
pub struct RppalI2cBus {
    i2c: I2c,
    address: u16,
}

impl RppalI2cBus {
    /// Opens the default I2C bus for the Pi model and binds the given slave
    /// address.
    pub fn new(address: u16) -> I2cResult<Self> {
        let i2c = I2c::new().map_err(map_err)?;
        Self::bind(i2c, address)
    }

    /// Opens `/dev/i2c-<bus>` and binds the given slave address.
    pub fn with_bus(bus: u8, address: u16) -> I2cResult<Self> {
        let i2c = I2c::with_bus(bus).map_err(map_err)?;
        Self::bind(i2c, address)
    }

    fn bind(mut i2c: I2c, address: u16) -> I2cResult<Self> {
        i2c.set_slave_address(address).map_err(map_err)?;
        debug!("Bound I2C bus {} to address {:#04x}", i2c.bus(), address);
        Ok(RppalI2cBus { i2c, address })
    }
}

fn map_err(err: rppal::i2c::Error) -> I2cError {
    match err {
        rppal::i2c::Error::Io(err) => I2cError::Io(err.kind()),
        err => I2cError::Other(err.to_string()),
    }
}

impl Debug for RppalI2cBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RppalI2cBus({:#04x})", self.address)
    }
}

impl I2cBus for RppalI2cBus {
    fn write_byte(&mut self, byte: u8) -> I2cResult<()> {
        self.i2c.write(&[byte]).map_err(map_err)?;
        Ok(())
    }
}
