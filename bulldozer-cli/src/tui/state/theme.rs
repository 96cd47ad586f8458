use std::str::FromStr;

use anyhow::bail;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl FromStr for ThemeVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => bail!("unknown theme '{}' (expected 'dark' or 'light')", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_tertiary: Color,

    pub accent_primary: Color,
    pub accent_success: Color,
    pub accent_warning: Color,
    pub accent_error: Color,

    pub bg_surface: Color,
    pub border_primary: Color,
    pub border_secondary: Color,
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self {
                text_primary: Color::Rgb(205, 214, 244),
                text_secondary: Color::Rgb(166, 173, 200),
                text_tertiary: Color::Rgb(108, 112, 134),
                accent_primary: Color::Rgb(137, 180, 250),
                accent_success: Color::Rgb(166, 227, 161),
                accent_warning: Color::Rgb(249, 226, 175),
                accent_error: Color::Rgb(243, 139, 168),
                bg_surface: Color::Rgb(49, 50, 68),
                border_primary: Color::Rgb(137, 180, 250),
                border_secondary: Color::Rgb(88, 91, 112),
            },
            // #02539c accent, #e0e0e0 surface
            ThemeVariant::Light => Self {
                text_primary: Color::Rgb(30, 30, 30),
                text_secondary: Color::Rgb(76, 79, 105),
                text_tertiary: Color::Rgb(140, 143, 161),
                accent_primary: Color::Rgb(2, 83, 156),
                accent_success: Color::Rgb(64, 160, 43),
                accent_warning: Color::Rgb(223, 142, 29),
                accent_error: Color::Rgb(210, 15, 57),
                bg_surface: Color::Rgb(224, 224, 224),
                border_primary: Color::Rgb(2, 83, 156),
                border_secondary: Color::Rgb(172, 176, 190),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant() {
        assert_eq!("Dark".parse::<ThemeVariant>().unwrap(), ThemeVariant::Dark);
        assert_eq!(" light ".parse::<ThemeVariant>().unwrap(), ThemeVariant::Light);
        assert!("solarized".parse::<ThemeVariant>().is_err());
    }
}
