//! HD44780 LCD driver module.
//!
//! See the [HD44780Driver] trait for the command-level interface, and
//! [I2cHD44780Driver] for the implementation over a PCF8574-style I2C
//! expander backpack.

mod i2c;

use crate::{I2cError, I2cResult};
pub use i2c::*;
use std::fmt::Debug;

/// The `HD44780Driver` trait defines a low-level interface for HD44780 LCD
/// controller drivers.
///
/// The command layer lives in the default methods: each one composes a single
/// command byte and pushes it through [HD44780Driver::send_command]. What
/// "sending" means — which wires wiggle, in what order, with which delays —
/// is the implementation's business. Range checks happen here, before any bus
/// traffic.
///
/// In the documentation of each command, bits written as letters are set from
/// the method's parameters and bits written as `?` are don't-care.
pub trait HD44780Driver: Debug {
    /// Initializes the HD44780 controller with the default settings.
    ///
    /// `multiline` selects the two-row display layout (also used by displays
    /// with 4 physical rows), `alt_font` the 5x10 font available on some
    /// one-row displays.
    fn init(&mut self, multiline: bool, alt_font: bool) -> I2cResult<()>;

    /// Clears the display and sets the cursor to the home position.
    ///
    /// Command: `00000001`.
    ///
    /// This command takes the controller much longer than the others;
    /// implementations add the required settle time.
    fn clear_display(&mut self) -> I2cResult<()> {
        self.send_command(0b00000001)
    }

    /// Sets the cursor to the home position and undoes any display shift.
    ///
    /// Command: `0000001?`.
    ///
    /// Like [HD44780Driver::clear_display], needs extra settle time.
    fn return_home(&mut self) -> I2cResult<()> {
        self.send_command(0b00000010)
    }

    /// Sets the entry mode: which way the cursor moves after a write, and
    /// whether the display shifts instead (autoscroll).
    ///
    /// Command: `000001IS`.
    /// `I` is `1` for the cursor moving right, `0` for left.
    /// `S` is `1` for display shift, `0` for none.
    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> I2cResult<()> {
        let mut command = 0b00000100;
        if cursor_direction == CursorDirection::Right {
            command |= 0b00000010;
        }
        if shift {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    ///
    /// Command: `00001DCB`.
    /// `D` is `1` for display on, `C` for cursor on, `B` for blink on.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> I2cResult<()> {
        let mut command = 0b00001000;
        if display_on {
            command |= 0b00000100;
        }
        if cursor_on {
            command |= 0b00000010;
        }
        if blink_on {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the whole display by one position, without
    /// touching DDRAM.
    ///
    /// Command: `0001DR??`.
    /// `D` is `1` for display shift, `0` for cursor move.
    /// `R` is `1` for right, `0` for left.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> I2cResult<()> {
        let mut command = 0b00010000;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the interface width, line count and font.
    ///
    /// Command: `001BLF??`.
    /// `B` is `1` for an 8-bit data bus, `0` for 4-bit.
    /// `L` is `1` for two lines, `F` for the 5x10 font.
    fn function_set(&mut self, data_length: bool, two_lines: bool, font: bool) -> I2cResult<()> {
        let mut command = 0b00100000;
        if data_length {
            command |= 0b00010000;
        }
        if two_lines {
            command |= 0b00001000;
        }
        if font {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the CGRAM address (custom character memory).
    ///
    /// The address is a 6-bit value; out of bounds returns
    /// [I2cError::InvalidArgument].
    ///
    /// Command: `01AAAAAA`.
    fn set_cgram_address(&mut self, address: u8) -> I2cResult<()> {
        if address > 0b00111111 {
            return Err(I2cError::InvalidArgument);
        }
        let command = 0b01000000 | address;
        self.send_command(command)
    }

    /// Sets the DDRAM address (display memory), which positions the cursor.
    ///
    /// The address is a 7-bit value; out of bounds returns
    /// [I2cError::InvalidArgument].
    ///
    /// Command: `1AAAAAAA`.
    fn set_ddram_address(&mut self, address: u8) -> I2cResult<()> {
        if address > 0b01111111 {
            return Err(I2cError::InvalidArgument);
        }
        let command = 0b10000000 | address;
        self.send_command(command)
    }

    /// Switches the backlight, on backends that route a backlight line.
    ///
    /// The backlight is not an HD44780 feature — it belongs to the board the
    /// controller sits on — so the default is [I2cError::NotSupported].
    fn set_backlight(&mut self, _on: bool) -> I2cResult<()> {
        Err(I2cError::NotSupported)
    }

    /// Reads the busy flag and address counter.
    ///
    /// Fails with [I2cError::NotSupported] on write-only backends, see
    /// [HD44780Driver::read_command].
    fn get_busy_flag_and_address(&mut self) -> I2cResult<(bool, u8)> {
        let command = self.read_command()?;
        let busy_flag = command & 0b10000000 != 0;
        let address = command & 0b01111111;
        Ok((busy_flag, address))
    }

    // Low-level commands
    // These raw commands are used by the high-level functions above.
    // They are not meant to be used directly, but implemented by the driver implementation.

    /// Sends a command to the HD44780 controller.
    /// Sets the RS line to 0 (command).
    fn send_command(&mut self, command: u8) -> I2cResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS line to 1 (data).
    fn send_data(&mut self, data: u8) -> I2cResult<()>;

    /// Reads the busy flag and address counter in a single byte.
    /// Sets the RS line to 0 (command).
    fn read_command(&mut self) -> I2cResult<u8>;

    /// Reads data from the HD44780 controller.
    /// Sets the RS line to 1 (data).
    fn read_data(&mut self) -> I2cResult<u8>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing/reading data.
    Left,
    /// Moves the cursor to the right after writing/reading data.
    Right,
}
