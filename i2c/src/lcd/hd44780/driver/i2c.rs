use crate::lcd::hd44780::driver::{CursorDirection, HD44780Driver};
use crate::{I2cBus, I2cError, I2cResult};
use log::{debug, trace};
use std::thread::sleep;
use std::time::Duration;

/// HD44780 driver for displays attached through a PCF8574-style I2C expander
/// ("backpack"), always in 4-bit mode.
///
/// The expander's 8-bit register is wired to the controller as: bit 0 RS,
/// bit 1 R/W, bit 2 E, bit 3 backlight, bits 4–7 the D4–D7 data nibble. Every
/// register write goes out as one I2C byte, so a full 8-bit transfer takes two
/// nibbles of three register writes each: present the nibble, raise E, lower E.
///
/// Timing uses fixed delays instead of busy-flag polling: E is held for 1 µs
/// and each nibble gets 50 µs to latch, which is above the controller's worst
/// case for everything except clear/home (those get 2 ms).
#[derive(Debug)]
pub struct I2cHD44780Driver<'a> {
    bus: &'a mut dyn I2cBus,
    backlight: bool,
}

impl<'a> I2cHD44780Driver<'a> {
    /// The factory-default address of PCF8574 backpacks (A0–A2 open).
    pub const DEFAULT_ADDR: u16 = 0x27;

    /// Register select flag of the expander register.
    pub const RS: u8 = 0b0000_0001;
    /// Read/write flag. Never raised, see [I2cHD44780Driver::read_command].
    pub const RW: u8 = 0b0000_0010;
    /// Enable (clock) flag.
    pub const E: u8 = 0b0000_0100;
    /// Backlight flag.
    pub const BACKLIGHT: u8 = 0b0000_1000;

    /// Creates a driver over the given bus. The backlight starts on; nothing
    /// is sent until [HD44780Driver::init] is called.
    pub fn new(bus: &'a mut dyn I2cBus) -> Self {
        I2cHD44780Driver {
            bus,
            backlight: true,
        }
    }

    /// Whether the backlight flag is currently OR'd into register writes.
    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Writes the expander register, always carrying the backlight flag.
    fn expander_write(&mut self, bits: u8) -> I2cResult<()> {
        let bits = if self.backlight {
            bits | Self::BACKLIGHT
        } else {
            bits
        };
        trace!("Expander register: {:08b}", bits);
        self.bus.write_byte(bits)
    }

    /// Clocks the nibble currently on the register into the controller.
    /// The register is re-written with only the E flag changing, so the data
    /// lines hold their level across the pulse.
    fn pulse_enable(&mut self, bits: u8) -> I2cResult<()> {
        self.expander_write(bits | Self::E)?;
        sleep(Duration::from_micros(1));
        self.expander_write(bits & !Self::E)?;
        sleep(Duration::from_micros(50));
        Ok(())
    }

    fn write_4_bits(&mut self, bits: u8) -> I2cResult<()> {
        self.expander_write(bits)?;
        self.pulse_enable(bits)
    }

    /// Splits a byte into nibbles and sends them high-first, with the RS flag
    /// folded into both.
    fn send(&mut self, data: u8, rs: bool) -> I2cResult<()> {
        trace!("Sending data: {:08b}, RS: {}", data, rs);

        let mode = if rs { Self::RS } else { 0 };
        self.write_4_bits(mode | (data & 0xF0))?;
        self.write_4_bits(mode | ((data << 4) & 0xF0))
    }
}

impl HD44780Driver for I2cHD44780Driver<'_> {
    /// Initializes the display into 4-bit mode.
    ///
    /// The controller powers up in 8-bit mode but may be in any state if the
    /// host restarted without a power cycle, so the sequence first forces
    /// 8-bit mode by sending `0011` three times (with 4.5 ms, 4.5 ms and
    /// 150 µs waits), then switches to 4-bit with `0010`. From there the
    /// usual bring-up follows: function set, display on with cursor and blink
    /// off, clear, left-to-right entry mode without shift.
    fn init(&mut self, multiline: bool, alt_font: bool) -> I2cResult<()> {
        // Power-on reset time of the controller
        sleep(Duration::from_millis(50));

        // Settle the register with everything low (except backlight)
        self.expander_write(0)?;

        debug!("Synchronizing to 4-bit mode");
        self.write_4_bits(0x03 << 4)?;
        sleep(Duration::from_micros(4500));
        self.write_4_bits(0x03 << 4)?;
        sleep(Duration::from_micros(4500));
        self.write_4_bits(0x03 << 4)?;
        sleep(Duration::from_micros(150));
        self.write_4_bits(0x02 << 4)?;

        self.function_set(false, multiline, alt_font)?;
        self.set_display_control(true, false, false)?;
        self.clear_display()?;
        self.set_entry_mode(CursorDirection::Right, false)?;

        debug!("Display initialized");
        Ok(())
    }

    /// Clears the display, with the 2 ms settle time this command needs.
    fn clear_display(&mut self) -> I2cResult<()> {
        self.send_command(0b00000001)?;
        sleep(Duration::from_millis(2));
        Ok(())
    }

    /// Homes the cursor, with the 2 ms settle time this command needs.
    fn return_home(&mut self) -> I2cResult<()> {
        self.send_command(0b00000010)?;
        sleep(Duration::from_millis(2));
        Ok(())
    }

    /// Switches the backlight and rewrites the expander register immediately,
    /// so the change does not wait for the next display transaction.
    fn set_backlight(&mut self, on: bool) -> I2cResult<()> {
        self.backlight = on;
        self.expander_write(0)
    }

    fn send_command(&mut self, command: u8) -> I2cResult<()> {
        self.send(command, false)
    }

    fn send_data(&mut self, data: u8) -> I2cResult<()> {
        self.send(data, true)
    }

    /// Reading would require floating the data nibble high and sampling the
    /// register while E is up; the backpack is treated as write-only here.
    fn read_command(&mut self) -> I2cResult<u8> {
        Err(I2cError::NotSupported)
    }

    fn read_data(&mut self) -> I2cResult<u8> {
        Err(I2cError::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingBus {
        written: Vec<u8>,
    }

    impl I2cBus for RecordingBus {
        fn write_byte(&mut self, byte: u8) -> I2cResult<()> {
            self.written.push(byte);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct FailingBus;

    impl I2cBus for FailingBus {
        fn write_byte(&mut self, _byte: u8) -> I2cResult<()> {
            Err(I2cError::Other("NACK".to_string()))
        }
    }

    #[test]
    fn init_sequence() {
        let mut bus = RecordingBus::default();
        let mut driver = I2cHD44780Driver::new(&mut bus);
        driver.init(true, false).unwrap();

        let expected = vec![
            // settle, backlight on
            0b0000_1000,
            // force 8-bit mode, three times
            0b0011_1000, 0b0011_1100, 0b0011_1000,
            0b0011_1000, 0b0011_1100, 0b0011_1000,
            0b0011_1000, 0b0011_1100, 0b0011_1000,
            // switch to 4-bit mode
            0b0010_1000, 0b0010_1100, 0b0010_1000,
            // function set: 4-bit, two lines, 5x8 font (0x28)
            0b0010_1000, 0b0010_1100, 0b0010_1000,
            0b1000_1000, 0b1000_1100, 0b1000_1000,
            // display control: display on, cursor off, blink off (0x0C)
            0b0000_1000, 0b0000_1100, 0b0000_1000,
            0b1100_1000, 0b1100_1100, 0b1100_1000,
            // clear display (0x01)
            0b0000_1000, 0b0000_1100, 0b0000_1000,
            0b0001_1000, 0b0001_1100, 0b0001_1000,
            // entry mode: left-to-right, no shift (0x06)
            0b0000_1000, 0b0000_1100, 0b0000_1000,
            0b0110_1000, 0b0110_1100, 0b0110_1000,
        ];
        assert_eq!(bus.written, expected);
    }

    #[test]
    fn data_is_sent_as_two_nibbles_with_rs() {
        let mut bus = RecordingBus::default();
        let mut driver = I2cHD44780Driver::new(&mut bus);
        driver.send_data(b'A').unwrap();

        // 0x41 splits into 0100 and 0001; RS and backlight ride along.
        let expected = vec![
            0b0100_1001, 0b0100_1101, 0b0100_1001,
            0b0001_1001, 0b0001_1101, 0b0001_1001,
        ];
        assert_eq!(bus.written, expected);
    }

    #[test]
    fn commands_keep_rs_low() {
        let mut bus = RecordingBus::default();
        let mut driver = I2cHD44780Driver::new(&mut bus);
        driver.send_command(0b1101_0010).unwrap();

        let expected = vec![
            0b1101_1000, 0b1101_1100, 0b1101_1000,
            0b0010_1000, 0b0010_1100, 0b0010_1000,
        ];
        assert_eq!(bus.written, expected);
    }

    #[test]
    fn backlight_flag_drops_out_of_every_write() {
        let mut bus = RecordingBus::default();
        let mut driver = I2cHD44780Driver::new(&mut bus);
        driver.set_backlight(false).unwrap();
        driver.clear_display().unwrap();
        assert!(!driver.backlight());

        let expected = vec![
            // immediate register rewrite with the backlight bit gone
            0b0000_0000,
            // clear display (0x01), no backlight bit anywhere
            0b0000_0000, 0b0000_0100, 0b0000_0000,
            0b0001_0000, 0b0001_0100, 0b0001_0000,
        ];
        assert_eq!(bus.written, expected);
    }

    #[test]
    fn backlight_on_rewrites_register() {
        let mut bus = RecordingBus::default();
        let mut driver = I2cHD44780Driver::new(&mut bus);
        driver.set_backlight(false).unwrap();
        driver.set_backlight(true).unwrap();
        assert_eq!(bus.written, vec![0b0000_0000, 0b0000_1000]);
    }

    #[test]
    fn bus_errors_propagate() {
        let mut bus = FailingBus;
        let mut driver = I2cHD44780Driver::new(&mut bus);
        assert_eq!(
            driver.send_command(0x01),
            Err(I2cError::Other("NACK".to_string()))
        );
    }

    #[test]
    fn reads_are_not_supported() {
        let mut bus = RecordingBus::default();
        let mut driver = I2cHD44780Driver::new(&mut bus);
        assert_eq!(driver.read_command(), Err(I2cError::NotSupported));
        assert_eq!(driver.read_data(), Err(I2cError::NotSupported));
        assert!(bus.written.is_empty());
    }
}
