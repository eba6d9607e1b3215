//! High-level screen surface over an [HD44780Driver].

use crate::lcd::hd44780::driver::{CursorDirection, HD44780Driver};
use crate::{I2cError, I2cResult};
use log::warn;

/// DDRAM base address of each display row.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// A character screen over any [HD44780Driver].
///
/// Carries the display geometry and the controller's mode flags. The flags
/// cannot be read back from the controller, so every flag mutation re-sends
/// the full display-control or entry-mode command with all of its bits; the
/// fields here always mirror what the controller was last told.
#[derive(Debug)]
pub struct Screen<'a> {
    driver: &'a mut dyn HD44780Driver,
    cols: usize,
    rows: usize,
    display_on: bool,
    cursor_visible: bool,
    blink: bool,
    direction: CursorDirection,
    autoscroll: bool,
}

impl<'a> Screen<'a> {
    /// Creates a screen with the given geometry. Up to 40 columns and 4 rows
    /// are supported, which covers the whole DDRAM address range.
    ///
    /// Nothing is sent to the display until [Screen::init].
    ///
    /// # Errors
    /// - [I2cError::InvalidArgument] for a zero dimension, more than 40
    ///   columns or more than 4 rows.
    pub fn new(driver: &'a mut dyn HD44780Driver, cols: usize, rows: usize) -> I2cResult<Self> {
        if cols == 0 || cols > 40 || rows == 0 || rows > ROW_OFFSETS.len() {
            return Err(I2cError::InvalidArgument);
        }
        Ok(Screen {
            driver,
            cols,
            rows,
            display_on: true,
            cursor_visible: false,
            blink: false,
            direction: CursorDirection::Right,
            autoscroll: false,
        })
    }

    /// Initializes the controller and resets the mode flags to the post-init
    /// state: display on, cursor hidden, no blink, left-to-right, no
    /// autoscroll.
    pub fn init(&mut self) -> I2cResult<()> {
        self.display_on = true;
        self.cursor_visible = false;
        self.blink = false;
        self.direction = CursorDirection::Right;
        self.autoscroll = false;
        self.driver.init(self.rows >= 2, false)
    }

    /// Clears the screen and homes the cursor.
    pub fn clear(&mut self) -> I2cResult<()> {
        self.driver.clear_display()
    }

    /// Homes the cursor and undoes any display shift.
    pub fn home(&mut self) -> I2cResult<()> {
        self.driver.return_home()
    }

    /// Moves the cursor to the given position.
    pub fn set_cursor(&mut self, row: usize, col: usize) -> I2cResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(I2cError::InvalidArgument);
        }
        self.driver.set_ddram_address(ROW_OFFSETS[row] + col as u8)
    }

    /// Writes a string at the current cursor position.
    ///
    /// The HD44780 character ROM is ASCII-compatible; anything else is logged
    /// and replaced with `?`.
    pub fn print(&mut self, s: &str) -> I2cResult<()> {
        for c in s.chars() {
            if c.is_ascii() {
                self.driver.send_data(c as u8)?;
            } else {
                warn!("Non-ASCII character: {}", c);
                self.driver.send_data(b'?')?;
            }
        }
        Ok(())
    }

    /// Writes a single raw character code, e.g. a CGRAM glyph slot (0–7).
    pub fn put_char(&mut self, code: u8) -> I2cResult<()> {
        self.driver.send_data(code)
    }

    /// Turns the whole display on or off. DDRAM contents survive.
    pub fn set_display(&mut self, on: bool) -> I2cResult<()> {
        self.display_on = on;
        self.send_display_control()
    }

    /// Shows or hides the underline cursor.
    pub fn set_cursor_visible(&mut self, visible: bool) -> I2cResult<()> {
        self.cursor_visible = visible;
        self.send_display_control()
    }

    /// Enables or disables blinking of the cursor position.
    pub fn set_blink(&mut self, blink: bool) -> I2cResult<()> {
        self.blink = blink;
        self.send_display_control()
    }

    /// Sets which way the cursor moves after each written character.
    pub fn set_text_direction(&mut self, direction: CursorDirection) -> I2cResult<()> {
        self.direction = direction;
        self.send_entry_mode()
    }

    /// Enables or disables autoscroll: with it on, writes shift the display
    /// instead of moving the cursor.
    pub fn set_autoscroll(&mut self, autoscroll: bool) -> I2cResult<()> {
        self.autoscroll = autoscroll;
        self.send_entry_mode()
    }

    /// Shifts the whole display one column to the left, without touching
    /// DDRAM.
    pub fn scroll_left(&mut self) -> I2cResult<()> {
        self.driver.cursor_shift(true, CursorDirection::Left)
    }

    /// Shifts the whole display one column to the right, without touching
    /// DDRAM.
    pub fn scroll_right(&mut self) -> I2cResult<()> {
        self.driver.cursor_shift(true, CursorDirection::Right)
    }

    /// Switches the backlight, if the driver controls one.
    pub fn set_backlight(&mut self, on: bool) -> I2cResult<()> {
        self.driver.set_backlight(on)
    }

    /// Loads a 5x8 glyph into one of the 8 CGRAM slots.
    ///
    /// Leaves the address counter in CGRAM; re-position with
    /// [Screen::set_cursor] before printing again. The glyph is shown by
    /// writing its slot number, see [Screen::put_char].
    ///
    /// # Errors
    /// - [I2cError::InvalidArgument] for a slot above 7.
    pub fn create_char(&mut self, location: u8, charmap: impl Into<[u8; 8]>) -> I2cResult<()> {
        if location > 7 {
            return Err(I2cError::InvalidArgument);
        }
        self.driver.set_cgram_address(location << 3)?;
        for row in charmap.into() {
            self.driver.send_data(row)?;
        }
        Ok(())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn send_display_control(&mut self) -> I2cResult<()> {
        self.driver
            .set_display_control(self.display_on, self.cursor_visible, self.blink)
    }

    fn send_entry_mode(&mut self) -> I2cResult<()> {
        self.driver.set_entry_mode(self.direction, self.autoscroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Init { multiline: bool, alt_font: bool },
        Command(u8),
        Data(u8),
        Backlight(bool),
    }

    #[derive(Debug, Default)]
    struct RecordingDriver {
        ops: Vec<Op>,
    }

    impl HD44780Driver for RecordingDriver {
        fn init(&mut self, multiline: bool, alt_font: bool) -> I2cResult<()> {
            self.ops.push(Op::Init {
                multiline,
                alt_font,
            });
            Ok(())
        }

        fn set_backlight(&mut self, on: bool) -> I2cResult<()> {
            self.ops.push(Op::Backlight(on));
            Ok(())
        }

        fn send_command(&mut self, command: u8) -> I2cResult<()> {
            self.ops.push(Op::Command(command));
            Ok(())
        }

        fn send_data(&mut self, data: u8) -> I2cResult<()> {
            self.ops.push(Op::Data(data));
            Ok(())
        }

        fn read_command(&mut self) -> I2cResult<u8> {
            Err(I2cError::NotSupported)
        }

        fn read_data(&mut self) -> I2cResult<u8> {
            Err(I2cError::NotSupported)
        }
    }

    #[test]
    fn geometry_is_validated() {
        let mut driver = RecordingDriver::default();
        assert!(Screen::new(&mut driver, 0, 2).is_err());
        let mut driver = RecordingDriver::default();
        assert!(Screen::new(&mut driver, 16, 0).is_err());
        let mut driver = RecordingDriver::default();
        assert!(Screen::new(&mut driver, 16, 5).is_err());
        let mut driver = RecordingDriver::default();
        assert!(Screen::new(&mut driver, 41, 2).is_err());
        let mut driver = RecordingDriver::default();
        assert!(Screen::new(&mut driver, 40, 4).is_ok());
        let mut driver = RecordingDriver::default();
        assert!(Screen::new(&mut driver, 20, 4).is_ok());
    }

    #[test]
    fn init_passes_multiline() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 1).unwrap();
        screen.init().unwrap();
        assert_eq!(
            driver.ops,
            vec![Op::Init {
                multiline: false,
                alt_font: false
            }]
        );

        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 20, 4).unwrap();
        screen.init().unwrap();
        assert_eq!(
            driver.ops,
            vec![Op::Init {
                multiline: true,
                alt_font: false
            }]
        );
    }

    #[test]
    fn set_cursor_uses_row_offsets() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 20, 4).unwrap();
        screen.set_cursor(0, 0).unwrap();
        screen.set_cursor(1, 3).unwrap();
        screen.set_cursor(2, 0).unwrap();
        screen.set_cursor(3, 19).unwrap();
        assert_eq!(
            driver.ops,
            vec![
                Op::Command(0x80),
                Op::Command(0x80 | 0x43),
                Op::Command(0x80 | 0x14),
                Op::Command(0x80 | 0x67),
            ]
        );
    }

    #[test]
    fn set_cursor_checks_geometry_before_sending() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        assert_eq!(screen.set_cursor(2, 0), Err(I2cError::InvalidArgument));
        assert_eq!(screen.set_cursor(0, 16), Err(I2cError::InvalidArgument));
        assert!(driver.ops.is_empty());
    }

    #[test]
    fn print_falls_back_to_question_mark() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.print("A±b").unwrap();
        assert_eq!(
            driver.ops,
            vec![Op::Data(b'A'), Op::Data(b'?'), Op::Data(b'b')]
        );
    }

    #[test]
    fn mode_flags_accumulate() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.set_cursor_visible(true).unwrap();
        screen.set_blink(true).unwrap();
        screen.set_display(false).unwrap();
        screen.set_cursor_visible(false).unwrap();
        assert_eq!(
            driver.ops,
            vec![
                Op::Command(0b00001110),
                Op::Command(0b00001111),
                Op::Command(0b00001011),
                Op::Command(0b00001001),
            ]
        );
    }

    #[test]
    fn entry_mode_flags_accumulate() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.set_autoscroll(true).unwrap();
        screen.set_text_direction(CursorDirection::Left).unwrap();
        screen.set_autoscroll(false).unwrap();
        assert_eq!(
            driver.ops,
            vec![
                Op::Command(0b00000111),
                Op::Command(0b00000101),
                Op::Command(0b00000100),
            ]
        );
    }

    #[test]
    fn init_resets_mode_flags() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.set_blink(true).unwrap();
        screen.init().unwrap();
        screen.set_cursor_visible(true).unwrap();
        assert_eq!(
            driver.ops,
            vec![
                Op::Command(0b00001101),
                Op::Init {
                    multiline: true,
                    alt_font: false
                },
                // blink was reset by init, so only the cursor bit joins
                Op::Command(0b00001110),
            ]
        );
    }

    #[test]
    fn scrolling_shifts_the_display() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.scroll_left().unwrap();
        screen.scroll_right().unwrap();
        assert_eq!(
            driver.ops,
            vec![Op::Command(0b00011000), Op::Command(0b00011100)]
        );
    }

    #[test]
    fn create_char_loads_cgram() {
        let charmap = [0x02, 0x05, 0x05, 0x06, 0x0c, 0x04, 0x03, 0x00];
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.create_char(2, charmap).unwrap();
        let mut expected = vec![Op::Command(0b01000000 | (2 << 3))];
        expected.extend(charmap.iter().map(|&row| Op::Data(row)));
        assert_eq!(driver.ops, expected);
    }

    #[test]
    fn create_char_checks_the_slot() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        assert_eq!(
            screen.create_char(8, [0u8; 8]),
            Err(I2cError::InvalidArgument)
        );
        assert!(driver.ops.is_empty());
    }

    #[test]
    fn backlight_is_delegated() {
        let mut driver = RecordingDriver::default();
        let mut screen = Screen::new(&mut driver, 16, 2).unwrap();
        screen.set_backlight(false).unwrap();
        assert_eq!(driver.ops, vec![Op::Backlight(false)]);
    }
}
