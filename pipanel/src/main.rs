mod app;
mod config;
mod glyphs;

use crate::app::App;
use crate::config::Config;
use dotenv::dotenv;
use log::{debug, info};
use std::env::var;
use pipanel_i2c::lcd::hd44780::driver::I2cHD44780Driver;
use pipanel_i2c::lcd::hd44780::screen::Screen;
use pipanel_i2c::raw::RppalI2cBus;
use std::thread;
use std::time::Duration;

fn parse_address(s: &str) -> eyre::Result<u16> {
    let s = s.trim();
    Ok(if let Some(hex) = s.strip_prefix("0x") {
        u16::from_str_radix(hex, 16)?
    } else {
        s.parse()?
    })
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("PiPanel starting...");

    // Get the wiring from env
    let bus_no: u8 = match var("PIPANEL_I2C_BUS") {
        Ok(s) => s.parse()?,
        Err(_) => 1,
    };
    let address: u16 = match var("PIPANEL_LCD_ADDR") {
        Ok(s) => parse_address(&s)?,
        Err(_) => I2cHD44780Driver::DEFAULT_ADDR,
    };

    info!("LCD @ bus {}, address {:#04x}", bus_no, address);

    debug!("Trying to load config...");
    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };

    debug!("Initializing I2C bus...");
    let mut bus = RppalI2cBus::with_bus(bus_no, address)?;
    debug!("{:?} initialized.", bus);

    debug!("Initializing LCD driver...");
    let mut driver = I2cHD44780Driver::new(&mut bus);
    let screen = Screen::new(&mut driver, config.cols, config.rows)?;

    let mut app = App::new(config, screen);
    app.init()?;

    info!("PiPanel initialized.");
    info!("Starting main loop...");

    loop {
        app.update()?;
        thread::sleep(Duration::from_secs(1));
    }
}
