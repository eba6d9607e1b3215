use dotenv::dotenv;
use log::{debug, info};
use pipanel_i2c::lcd::hd44780::driver::I2cHD44780Driver;
use pipanel_i2c::lcd::hd44780::screen::Screen;
use pipanel_i2c::raw::RppalI2cBus;
use std::thread::sleep;
use std::time::Duration;
use sysinfo::System;

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "Hello, {}!",
        System::name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!(
        "System ver {} kernel ver {}",
        System::long_os_version().as_deref().unwrap_or(UNKNOWN_STR),
        System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR),
    );
    info!(
        "Hostname {}",
        System::host_name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!("Architecture {}", System::cpu_arch());

    let mut bus = RppalI2cBus::with_bus(1, I2cHD44780Driver::DEFAULT_ADDR)?;
    debug!("{:?} initialized.", bus);

    let mut driver = I2cHD44780Driver::new(&mut bus);
    let mut screen = Screen::new(&mut driver, 16, 2)?;
    screen.init()?;

    // Smiley in slot 0
    screen.create_char(
        0,
        [
            0b00000,
            0b01010,
            0b01010,
            0b00000,
            0b10001,
            0b01110,
            0b00000,
            0b00000,
        ],
    )?;
    screen.set_cursor(0, 0)?;

    screen.print("Hello ")?;
    screen.put_char(0)?;

    let mut frame = 0u32;

    loop {
        screen.set_cursor(1, 0)?;
        screen.print(&format!("{:<16}", frame))?;

        // Exercise the backlight and display shift now and then
        if frame % 30 == 10 {
            screen.set_backlight(false)?;
        }
        if frame % 30 == 20 {
            screen.set_backlight(true)?;
        }
        if frame % 50 == 25 {
            screen.scroll_left()?;
        }
        if frame % 50 == 49 {
            screen.scroll_right()?;
        }

        sleep(Duration::from_millis(100));

        frame += 1;
    }
}
