//! I2C backend using the Linux `/dev/i2c-*` character device through i2cdev.
//!
//! Works on any Linux board that exposes an I2C adapter, not just the Pi.
use crate::{I2cBus, I2cError, I2cResult};
use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use log::debug;
use std::fmt::{Debug, Formatter};

/// An [I2cBus] over a Linux I2C character device.
pub struct DevI2cBus {
    dev: LinuxI2CDevice,
    path: String,
    address: u16,
}

impl DevI2cBus {
    /// Opens `/dev/i2c-<bus>` and binds the given slave address.
    pub fn new(bus: u8, address: u16) -> I2cResult<Self> {
        let path = format!("/dev/i2c-{}", bus);
        let dev = LinuxI2CDevice::new(&path, address).map_err(map_err)?;
        debug!("Bound {} to address {:#04x}", path, address);
        Ok(DevI2cBus { dev, path, address })
    }
}

fn map_err(err: LinuxI2CError) -> I2cError {
    match err {
        LinuxI2CError::Io(err) => I2cError::Io(err.kind()),
        err => I2cError::Other(err.to_string()),
    }
}

impl Debug for DevI2cBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DevI2cBus({}, {:#04x})", self.path, self.address)
    }
}

impl I2cBus for DevI2cBus {
    fn write_byte(&mut self, byte: u8) -> I2cResult<()> {
        self.dev.write(&[byte]).map_err(map_err)?;
        Ok(())
    }
}
