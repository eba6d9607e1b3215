//! The module for the main app state and logic.

use crate::config::Config;
use crate::glyphs::Glyph;
use log::debug;
use pipanel_i2c::I2cResult;
use pipanel_i2c::lcd::hd44780::screen::Screen;
use std::time::{Duration, Instant};
use sysinfo::{Components, System};
use time::{OffsetDateTime, Weekday};

/// The status pages the panel cycles through.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
enum Page {
    #[default]
    Clock,
    System,
    Host,
}

impl Page {
    fn next(self) -> Page {
        match self {
            Page::Clock => Page::System,
            Page::System => Page::Host,
            Page::Host => Page::Clock,
        }
    }
}

/// The main app state struct.
pub struct App<'a> {
    /// The configuration for the app.
    config: Config,
    /// The screen the pages are drawn on.
    screen: Screen<'a>,
    /// System statistics source.
    system: System,
    /// The page currently shown.
    page: Page,
    /// When the current page went up.
    page_started: Instant,
    /// Last CPU sample, for the trend arrow.
    last_cpu: f32,
}

impl<'a> App<'a> {
    /// Creates a new instance of the App.
    pub fn new(config: Config, screen: Screen<'a>) -> App<'a> {
        App {
            config,
            screen,
            system: System::new(),
            page: Page::default(),
            page_started: Instant::now(),
            last_cpu: 0.0,
        }
    }

    /// Brings the display up: controller init, backlight per config, and the
    /// custom glyphs loaded into CGRAM.
    pub fn init(&mut self) -> I2cResult<()> {
        self.screen.init()?;
        self.screen.set_backlight(self.config.backlight)?;
        for glyph in Glyph::ALL {
            self.screen.create_char(glyph as u8, glyph)?;
        }
        self.screen.set_cursor(0, 0)?;
        debug!(
            "Screen ready: {}x{}",
            self.screen.cols(),
            self.screen.rows()
        );
        Ok(())
    }

    /// Advances the page rotation if due and redraws the current page.
    /// Meant to be called about once a second.
    pub fn update(&mut self) -> I2cResult<()> {
        let page_duration = Duration::from_secs(self.config.page_seconds.get());
        if self.page_started.elapsed() >= page_duration {
            self.page = self.page.next();
            self.page_started = Instant::now();
            debug!("Switching to page {:?}", self.page);
            self.screen.clear()?;
        }

        match self.page {
            Page::Clock => self.draw_clock(),
            Page::System => self.draw_system(),
            Page::Host => self.draw_host(),
        }
    }

    fn draw_clock(&mut self) -> I2cResult<()> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let time = format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second());
        let date = format!(
            "{} {:02}.{:02}.{:04}",
            weekday_abbrev(now.weekday()),
            now.day(),
            u8::from(now.month()),
            now.year(),
        );
        self.draw_centered(0, &time)?;
        self.draw_centered(1, &date)
    }

    fn draw_system(&mut self) -> I2cResult<()> {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu = self.system.global_cpu_usage();
        let trend = if cpu >= self.last_cpu {
            Glyph::ArrowUp
        } else {
            Glyph::ArrowDown
        };
        self.last_cpu = cpu;

        self.screen.set_cursor(0, 0)?;
        self.screen.print(&format!("CPU {:>3.0}% ", cpu))?;
        self.screen.put_char(trend as u8)?;
        match max_temperature() {
            Some(temp) => {
                self.screen.print(&format!(" {:>3.0}", temp))?;
                self.screen.put_char(Glyph::Degree as u8)?;
                self.screen.print("C")?;
            }
            None => self.screen.print("      ")?,
        }

        let used = self.system.used_memory() / (1024 * 1024);
        let total = self.system.total_memory() / (1024 * 1024);
        self.draw_line(1, &format!("Mem {}/{}M", used, total))
    }

    fn draw_host(&mut self) -> I2cResult<()> {
        let hostname = System::host_name().unwrap_or_else(|| "???".to_string());
        self.draw_line(0, &hostname)?;
        self.draw_line(1, &format_uptime(System::uptime()))
    }

    /// Draws one full row, padding with spaces so stale characters from the
    /// previous draw are overwritten.
    fn draw_line(&mut self, row: usize, text: &str) -> I2cResult<()> {
        self.screen.set_cursor(row, 0)?;
        let cols = self.screen.cols();
        self.screen.print(&format!("{:<w$.w$}", text, w = cols))
    }

    fn draw_centered(&mut self, row: usize, text: &str) -> I2cResult<()> {
        let cols = self.screen.cols();
        let centered = format!("{:^w$.w$}", text, w = cols);
        self.draw_line(row, &centered)
    }
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

/// The hottest sensor the board reports, if any.
fn max_temperature() -> Option<f32> {
    let components = Components::new_with_refreshed_list();
    components
        .iter()
        .filter_map(|component| component.temperature())
        .reduce(f32::max)
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    if days > 0 {
        format!("up {}d {:02}:{:02}", days, hours, minutes)
    } else {
        format!("up {:02}:{:02}", hours, minutes)
    }
}
