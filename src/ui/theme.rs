use std::str::FromStr;

use ratatui::style::Color;

use crate::error::ConfigError;
use crate::format::{UsageLevel, usage_level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Mono,
}

impl FromStr for ThemeName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(ThemeName::Dark),
            "light" => Ok(ThemeName::Light),
            "mono" | "monochrome" => Ok(ThemeName::Mono),
            other => Err(ConfigError::UnknownTheme(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub statusbar_bg: Color,
    pub border: Color,
    pub title: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub usage_low: Color,
    pub usage_mid: Color,
    pub usage_high: Color,
    pub gauge_unfilled: Color,
    pub unavailable: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
            ThemeName::Mono => Self::mono(),
        }
    }

    /// Green under 50%, yellow under 80%, red above.
    pub fn usage_color(&self, percent: f64) -> Color {
        match usage_level(percent) {
            UsageLevel::Low => self.usage_low,
            UsageLevel::Medium => self.usage_mid,
            UsageLevel::High => self.usage_high,
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            statusbar_bg: Color::DarkGray,
            border: Color::DarkGray,
            title: Color::Magenta,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            usage_low: Color::Green,
            usage_mid: Color::Yellow,
            usage_high: Color::Red,
            gauge_unfilled: Color::DarkGray,
            unavailable: Color::Rgb(249, 115, 22),
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            statusbar_bg: Color::Rgb(220, 220, 220),
            border: Color::Rgb(150, 150, 150),
            title: Color::Rgb(128, 0, 128),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            usage_low: Color::Rgb(0, 120, 0),
            usage_mid: Color::Rgb(180, 130, 0),
            usage_high: Color::Rgb(200, 40, 40),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            unavailable: Color::Rgb(200, 90, 0),
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            statusbar_bg: Color::Reset,
            border: Color::Reset,
            title: Color::Reset,
            text_primary: Color::Reset,
            text_secondary: Color::Reset,
            usage_low: Color::Reset,
            usage_mid: Color::Reset,
            usage_high: Color::Reset,
            gauge_unfilled: Color::Reset,
            unavailable: Color::Reset,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::Reset,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
