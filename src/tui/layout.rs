// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell layout for the character view and the token chips.
//!
//! Drawing and pointer hit-testing both read the same [`Grid`], so a pointer always lands on the
//! item that is visible under it.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::Token;

/// Gap between two chips on the same row.
const CHIP_GAP: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cell {
    /// Character index (character view) or token index (token view).
    pub(crate) index: usize,
    pub(crate) col: u16,
    pub(crate) width: u16,
    pub(crate) glyph: String,
}

impl Cell {
    fn covers(&self, col: u16) -> bool {
        col >= self.col && col < self.col.saturating_add(self.width)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub(crate) fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn hit(&self, row: usize, col: u16) -> Option<usize> {
        self.rows.get(row)?.iter().find(|cell| cell.covers(col)).map(|cell| cell.index)
    }

    pub(crate) fn row_of(&self, index: usize) -> Option<usize> {
        self.rows.iter().position(|row| row.iter().any(|cell| cell.index == index))
    }

    fn push(&mut self, cell: Cell) {
        match self.rows.last_mut() {
            Some(row) => row.push(cell),
            None => self.rows.push(vec![cell]),
        }
    }

    fn break_row(&mut self) {
        self.rows.push(Vec::new());
    }

    fn finish(mut self) -> Self {
        while self.rows.last().is_some_and(Vec::is_empty) {
            self.rows.pop();
        }
        self
    }
}

/// Lays out `text` one cell per character, wrapping at `width` columns and after every newline.
pub(crate) fn char_grid(text: &str, width: u16) -> Grid {
    let width = width.max(1);
    let mut grid = Grid::default();
    let mut col = 0u16;

    for (index, ch) in text.chars().enumerate() {
        let (glyph, glyph_width) = char_glyph(ch);
        if col > 0 && col.saturating_add(glyph_width) > width {
            grid.break_row();
            col = 0;
        }
        grid.push(Cell { index, col, width: glyph_width, glyph });
        col = col.saturating_add(glyph_width);
        if ch == '\n' {
            grid.break_row();
            col = 0;
        }
    }

    grid.finish()
}

/// Lays out one `[text]` chip per token, wrapping whole chips at `width` columns.
pub(crate) fn chip_grid(tokens: &[Token], width: u16) -> Grid {
    let width = width.max(1);
    let mut grid = Grid::default();
    let mut col = 0u16;

    for (index, token) in tokens.iter().enumerate() {
        let glyph = format!("[{}]", chip_label(&token.text));
        let chip_width = u16::try_from(UnicodeWidthStr::width(glyph.as_str())).unwrap_or(u16::MAX);
        if col > 0 && col.saturating_add(chip_width) > width {
            grid.break_row();
            col = 0;
        }
        grid.push(Cell { index, col, width: chip_width, glyph });
        col = col.saturating_add(chip_width).saturating_add(CHIP_GAP);
    }

    grid.finish()
}

/// Splits the raw input into display rows: one per line, hard-wrapped at `width` columns.
pub(crate) fn input_rows(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let mut row = String::new();
        let mut used = 0usize;
        for ch in line.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used > 0 && used + ch_width > width {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            row.push(ch);
            used += ch_width;
        }
        rows.push(row);
    }
    rows
}

/// Visible stand-in for one character of the visualized text.
pub(crate) fn char_glyph(ch: char) -> (String, u16) {
    match ch {
        ' ' => ("·".to_string(), 1),
        '\n' => ("↵".to_string(), 1),
        '\t' => ("→".to_string(), 1),
        '\r' => ("␍".to_string(), 1),
        _ if ch.is_control() => ("\u{FFFD}".to_string(), 1),
        // Combining marks get a dotted circle to sit on.
        _ => match UnicodeWidthChar::width(ch) {
            Some(0) | None => (format!("◌{ch}"), 1),
            Some(width) => (ch.to_string(), width as u16),
        },
    }
}

pub(crate) fn chip_label(text: &str) -> String {
    if text.is_empty() {
        return "∅".to_string();
    }
    text.chars()
        .map(|ch| match ch {
            ' ' => '·',
            '\n' => '↵',
            '\t' => '→',
            '\r' => '␍',
            _ if ch.is_control() => '\u{FFFD}',
            _ => ch,
        })
        .collect()
}

/// Keeps spaces (tooltips show ids and token text) but makes line breaks and controls visible.
pub(crate) fn tooltip_label(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\n' => '↵',
            '\t' => '→',
            '\r' => '␍',
            _ if ch.is_control() => '\u{FFFD}',
            _ => ch,
        })
        .collect()
}
