// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Hover, selection and tooltip state shared by the character view and the token view.
//!
//! Both views resolve through the same [`AlignmentIndex`], so whatever one view highlights the
//! other highlights too. Scrolling is requested through returned [`Effect`]s rather than
//! performed here.

use crate::align::AlignmentIndex;
use crate::model::Token;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub hovered_token: Option<usize>,
    pub hovered_char: Option<usize>,
    /// Pinned by click; survives hover changes.
    pub active_token: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub x: u16,
    pub y: u16,
    pub content: String,
}

/// Why a character or chip is lit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    pub hovered: bool,
    pub active: bool,
}

impl Highlight {
    pub fn is_lit(self) -> bool {
        self.hovered || self.active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chars,
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Bring the character at `char_index` into view.
    ScrollChars { char_index: usize },
    /// Bring the chip of `token_index` into view.
    ScrollTokens { token_index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    selection: Selection,
    tooltip: Option<Tooltip>,
    /// Last pointer position reported by an enter event.
    pointer: (u16, u16),
}

impl InteractionState {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn pointer_enter_token(&mut self, tokens: &[Token], token_index: usize, x: u16, y: u16) {
        let Some(token) = tokens.get(token_index) else {
            return;
        };
        self.pointer = (x, y);
        self.selection.hovered_token = Some(token_index);
        self.tooltip = Some(Tooltip { x, y, content: token.text.clone() });
    }

    pub fn pointer_enter_char(
        &mut self,
        tokens: &[Token],
        index: &AlignmentIndex,
        char_index: usize,
        x: u16,
        y: u16,
    ) {
        self.pointer = (x, y);
        self.selection.hovered_char = Some(char_index);

        let resolved = index.resolve(char_index).and_then(|i| tokens.get(i).map(|token| (i, token)));
        match resolved {
            Some((token_index, token)) => {
                self.selection.hovered_token = Some(token_index);
                self.tooltip = Some(Tooltip { x, y, content: format!("ID: {}", token.id) });
            }
            None => {
                self.selection.hovered_token = None;
                self.tooltip = None;
            }
        }
    }

    pub fn pointer_leave(&mut self, view: View) {
        match view {
            View::Tokens => {
                self.selection.hovered_token = None;
            }
            View::Chars => {
                self.selection.hovered_char = None;
                self.selection.hovered_token = None;
            }
        }
        self.tooltip = None;
    }

    pub fn click_token(&mut self, index: &AlignmentIndex, token_index: usize) -> Option<Effect> {
        if token_index >= index.token_count() {
            return None;
        }
        if !self.toggle_active(token_index) {
            return None;
        }
        index.span_of(token_index).map(|span| Effect::ScrollChars { char_index: span.start })
    }

    pub fn click_char(&mut self, index: &AlignmentIndex, char_index: usize) -> Option<Effect> {
        match index.resolve(char_index) {
            Some(token_index) => {
                self.toggle_active(token_index);
                Some(Effect::ScrollTokens { token_index })
            }
            None => {
                self.selection.active_token = None;
                None
            }
        }
    }

    pub fn click_background(&mut self) {
        self.selection.active_token = None;
    }

    pub fn char_highlight(&self, index: &AlignmentIndex, char_index: usize) -> Highlight {
        let covers = |token: Option<usize>| token.is_some_and(|i| index.covers(i, char_index));
        Highlight {
            hovered: covers(self.selection.hovered_token),
            active: covers(self.selection.active_token),
        }
    }

    pub fn token_highlight(&self, token_index: usize) -> Highlight {
        Highlight {
            hovered: self.selection.hovered_token == Some(token_index),
            active: self.selection.active_token == Some(token_index),
        }
    }

    pub fn is_char_highlighted(&self, index: &AlignmentIndex, char_index: usize) -> bool {
        self.char_highlight(index, char_index).is_lit()
    }

    pub fn is_token_highlighted(&self, token_index: usize) -> bool {
        self.token_highlight(token_index).is_lit()
    }

    pub fn is_token_active(&self, token_index: usize) -> bool {
        self.selection.active_token == Some(token_index)
    }

    /// Re-derives hover and tooltip from new tokens or text while the pointer stays put.
    ///
    /// A hovered character is resolved again through `index`; a hovered chip gets its tooltip
    /// text from the token now at that position. Indices past the new end are dropped.
    pub fn resync(&mut self, tokens: &[Token], index: &AlignmentIndex, char_count: usize) {
        if self.selection.active_token.is_some_and(|i| i >= tokens.len()) {
            self.selection.active_token = None;
        }

        let (x, y) = self.pointer;
        match self.selection.hovered_char {
            Some(c) if c < char_count => self.pointer_enter_char(tokens, index, c, x, y),
            Some(_) => self.pointer_leave(View::Chars),
            None => match self.selection.hovered_token {
                Some(i) if i < tokens.len() => self.pointer_enter_token(tokens, i, x, y),
                Some(_) => self.pointer_leave(View::Tokens),
                None => {}
            },
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Returns `true` when the token became active.
    fn toggle_active(&mut self, token_index: usize) -> bool {
        if self.selection.active_token == Some(token_index) {
            self.selection.active_token = None;
            self.selection.hovered_token = None;
            false
        } else {
            self.selection.active_token = Some(token_index);
            true
        }
    }
}
