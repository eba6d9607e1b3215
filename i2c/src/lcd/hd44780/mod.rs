//! HD44780 character LCD module.
//!
//! [driver] holds the command-level [HD44780Driver](driver::HD44780Driver)
//! trait and the [I2cHD44780Driver](driver::I2cHD44780Driver) backend for
//! PCF8574-style I2C backpacks. [screen] wraps any driver into the high-level
//! [Screen](screen::Screen) surface (clear, print, cursor, backlight, custom
//! characters).

pub mod driver;
pub mod screen;
