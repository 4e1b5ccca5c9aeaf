// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use tokscope::model::Token;

const WORDS: [&str; 8] = ["the", "token", "ization", " of", "naïve", " text", "日本", "!"];

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
    /// Every third token is split in two pieces that share its span.
    Overlapping,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Overlapping => "overlapping",
        }
    }

    fn word_count(self) -> usize {
        match self {
            Self::Small => 64,
            Self::Medium => 4_096,
            Self::Large | Self::Overlapping => 65_536,
        }
    }
}

pub struct Fixture {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Fixture {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// `[CLS] w0 w1 ... [SEP]` with character spans over the concatenated words.
pub fn fixture(case: Case) -> Fixture {
    let mut text = String::new();
    let mut tokens = vec![Token::unspanned(101, "[CLS]")];
    let mut offset = 0usize;

    for i in 0..case.word_count() {
        let word = WORDS[i % WORDS.len()];
        let len = word.chars().count();
        let id = 1_000 + (i % WORDS.len()) as i64;
        text.push_str(word);

        tokens.push(Token::new(id, word, offset, offset + len));
        if matches!(case, Case::Overlapping) && i % 3 == 0 {
            tokens.push(Token::new(id + 100, "", offset, offset + len));
        }
        offset += len;
    }

    tokens.push(Token::unspanned(102, "[SEP]"));
    Fixture { text, tokens }
}
