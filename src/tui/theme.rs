// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use ratatui::style::{Color, Modifier, Style};

pub(crate) const PALETTE_ENV: &str = "TOKSCOPE_PALETTE";

/// Highlight flag: the cell belongs to the hovered token.
pub(crate) const HOVER: u8 = 0b01;
/// Highlight flag: the cell belongs to the pinned token.
pub(crate) const ACTIVE: u8 = 0b10;

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let value = match env::var(PALETTE_ENV) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: PALETTE_ENV,
                    value: "<non-unicode>".to_string(),
                });
            }
        };
        Self::from_override(value.as_deref())
    }

    fn from_override(value: Option<&str>) -> Result<Self, ThemeError> {
        let palette = match value.map(str::trim) {
            None | Some("") => None,
            Some(trimmed) => Some(TuiPalette::parse_csv(trimmed).map_err(|reason| {
                ThemeError::InvalidEnv { name: PALETTE_ENV, value: format!("{trimmed} ({reason})") }
            })?),
        };
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn color(&self, slot: Slot) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi[slot as usize],
            None => slot.terminal_default(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.color(Slot::Green))
        } else {
            self.base_style().fg(self.color(Slot::BrightBlack))
        }
    }

    /// Whitespace stand-ins, placeholders and other secondary text.
    pub(crate) fn muted_style(&self) -> Style {
        self.base_style().fg(self.color(Slot::BrightBlack))
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.color(Slot::Red)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn progress_style(&self) -> Style {
        self.base_style().fg(self.color(Slot::Blue))
    }

    pub(crate) fn key_style(&self) -> Style {
        self.base_style().fg(self.color(Slot::Cyan))
    }

    pub(crate) fn tooltip_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED)
    }

    /// Style for a cell carrying [`HOVER`] and/or [`ACTIVE`].
    pub(crate) fn highlight_style(&self, flag: u8) -> Style {
        let base = self.base_style().fg(self.color(Slot::Black)).add_modifier(Modifier::BOLD);
        match flag & (HOVER | ACTIVE) {
            HOVER => base.bg(self.color(Slot::Yellow)),
            ACTIVE => base.bg(self.color(Slot::Cyan)),
            0b11 => base.bg(self.color(Slot::Magenta)),
            _ => self.base_style(),
        }
    }
}

/// ANSI palette slots the UI draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    BrightBlack = 8,
}

impl Slot {
    fn terminal_default(self) -> Color {
        match self {
            Self::Black => Color::Black,
            Self::Red => Color::Red,
            Self::Green => Color::Green,
            Self::Yellow => Color::Yellow,
            Self::Blue => Color::Blue,
            Self::Magenta => Color::Magenta,
            Self::Cyan => Color::Cyan,
            Self::BrightBlack => Color::DarkGray,
        }
    }
}

/// `fg,bg` followed by the 16 ANSI colors, as a terminal theme exports them.
#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let colors = value.split(',').map(parse_palette_color).collect::<Result<Vec<_>, _>>()?;
        if colors.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg, bg, then 16 ANSI colors), got {}",
                Self::CSV_LEN,
                colors.len()
            ));
        }

        let mut ansi = [Color::Reset; 16];
        ansi.copy_from_slice(&colors[2..]);
        Ok(Self { fg: colors[0], bg: colors[1], ansi })
    }
}

/// Accepts `#RRGGBB`, `0xRRGGBB`, `RRGGBB` and X11 `rgb:RR/GG/BB` (2 or 4 hex digits per channel).
fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    if let Some(rest) = trimmed.to_ascii_lowercase().strip_prefix("rgb:") {
        let channels = rest.split('/').map(parse_x11_channel).collect::<Result<Vec<_>, _>>()?;
        return match channels.as_slice() {
            [r, g, b] => Ok(Color::Rgb(*r, *g, *b)),
            _ => Err(format!("invalid rgb: value: {trimmed}")),
        };
    }

    let hex = ["#", "0x", "0X"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(*prefix))
        .unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Ok(Color::Rgb(r, g, b))
}

fn parse_x11_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let parsed = match value.len() {
        2 => u8::from_str_radix(value, 16).ok(),
        4 => u16::from_str_radix(value, 16).ok().map(|wide| (wide >> 8) as u8),
        _ => None,
    };
    parsed.ok_or_else(|| format!("invalid rgb: component {value} (expected 2 or 4 hex digits)"))
}

#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum ThemeError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use super::{parse_palette_color, TuiPalette, TuiTheme, ACTIVE, HOVER};

    const PALETTE: &str = "#111111,#222222,#000000,#ff0000,#00ff00,#ffff00,#0000ff,#ff00ff,#00ffff,#ffffff,#1a1a1a,#ff1111,#11ff11,#ffff11,#1111ff,#ff11ff,#11ffff,#fefefe";

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = TuiPalette::parse_csv(PALETTE).expect("palette");

        assert_eq!(palette.fg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette.bg, Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(palette.ansi[1], Color::Rgb(0xff, 0, 0));
        assert_eq!(palette.ansi[15], Color::Rgb(0xfe, 0xfe, 0xfe));
    }

    #[test]
    fn palette_override_rejects_wrong_length() {
        let err = TuiPalette::parse_csv("#000000,#ffffff").unwrap_err();
        assert!(err.contains("expected 18"));
    }

    #[test]
    fn x11_rgb_colors_are_accepted() {
        assert_eq!(parse_palette_color("rgb:ff/80/00"), Ok(Color::Rgb(0xff, 0x80, 0)));
        assert_eq!(parse_palette_color("rgb:ffff/8000/0000"), Ok(Color::Rgb(0xff, 0x80, 0)));
        assert!(parse_palette_color("rgb:ff/80").is_err());
    }

    #[test]
    fn blank_override_falls_back_to_terminal_colors() {
        let theme = TuiTheme::from_override(Some("   ")).expect("theme");
        assert_eq!(theme.highlight_style(HOVER).bg, Some(Color::Yellow));
    }

    #[test]
    fn invalid_override_names_the_variable() {
        let err = TuiTheme::from_override(Some("nope")).unwrap_err();
        assert!(err.to_string().starts_with("invalid env TOKSCOPE_PALETTE=nope"));
    }

    #[test]
    fn hover_active_and_both_are_distinct() {
        let theme = TuiTheme::from_override(Some(PALETTE)).expect("theme");
        let hover = theme.highlight_style(HOVER);
        let active = theme.highlight_style(ACTIVE);
        let both = theme.highlight_style(HOVER | ACTIVE);

        assert_eq!(hover.bg, Some(Color::Rgb(0xff, 0xff, 0)));
        assert_eq!(active.bg, Some(Color::Rgb(0, 0xff, 0xff)));
        assert_eq!(both.bg, Some(Color::Rgb(0xff, 0, 0xff)));
        assert!(hover.add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.highlight_style(0).bg, Some(Color::Rgb(0x22, 0x22, 0x22)));
    }
}
