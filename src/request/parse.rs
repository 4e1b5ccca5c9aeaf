// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lenient parsing of decode-mode input.
//!
//! Users paste id lists from all kinds of places (`[101, 7592, 102]`, tensors printed by Python,
//! trailing commas). Each comma-separated piece keeps only its digits and minus signs and is then
//! read like a JavaScript `parseInt`: an optional leading `-` followed by the longest run of
//! digits. Pieces that yield no number are dropped.

pub fn parse_token_ids(raw: &str) -> Vec<i64> {
    raw.split(',').filter_map(parse_piece).collect()
}

fn parse_piece(piece: &str) -> Option<i64> {
    let kept: String = piece.chars().filter(|ch| ch.is_ascii_digit() || *ch == '-').collect();
    let kept = kept.trim();
    if kept.is_empty() {
        return None;
    }
    parse_int_prefix(kept)
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let sign_len = usize::from(text.starts_with('-'));
    let digits = &text[sign_len..];
    let digit_len = digits.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(digits.len());
    if digit_len == 0 {
        return None;
    }
    text[..sign_len + digit_len].parse().ok()
}
