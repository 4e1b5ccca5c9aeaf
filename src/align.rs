// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Character offset → token resolution.
//!
//! The index is rebuilt from scratch whenever the token list is replaced. Entries are kept sorted
//! by span start together with a running maximum of span ends, so a lookup is a binary search
//! followed by a short backwards walk that stops as soon as no earlier span can reach the offset.

use crate::model::{Token, TokenSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    start: usize,
    end: usize,
    token: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentIndex {
    entries: Vec<Entry>,
    // reach[i] = max(entries[..=i].end)
    reach: Vec<usize>,
    spans: Vec<Option<TokenSpan>>,
}

impl AlignmentIndex {
    pub fn new(tokens: &[Token]) -> Self {
        let spans: Vec<Option<TokenSpan>> = tokens.iter().map(Token::span).collect();

        let mut entries: Vec<Entry> = spans
            .iter()
            .enumerate()
            .filter_map(|(token, span)| {
                span.map(|span| Entry { start: span.start, end: span.end, token })
            })
            .collect();
        entries.sort_by_key(|entry| (entry.start, entry.token));

        let mut reach = Vec::with_capacity(entries.len());
        let mut max_end = 0usize;
        for entry in &entries {
            max_end = max_end.max(entry.end);
            reach.push(max_end);
        }

        Self { entries, reach, spans }
    }

    /// Returns the index of the first token (in list order) whose span covers `char_index`.
    pub fn resolve(&self, char_index: usize) -> Option<usize> {
        let upper = self.entries.partition_point(|entry| entry.start <= char_index);

        let mut best: Option<usize> = None;
        for pos in (0..upper).rev() {
            if self.reach[pos] <= char_index {
                break;
            }
            let entry = self.entries[pos];
            if entry.end > char_index {
                best = Some(best.map_or(entry.token, |current| current.min(entry.token)));
            }
        }
        best
    }

    pub fn span_of(&self, token_index: usize) -> Option<TokenSpan> {
        self.spans.get(token_index).copied().flatten()
    }

    pub fn covers(&self, token_index: usize, char_index: usize) -> bool {
        self.span_of(token_index).is_some_and(|span| span.contains(char_index))
    }

    /// Number of tokens the index was built from, including unspanned ones.
    pub fn token_count(&self) -> usize {
        self.spans.len()
    }

    /// Number of tokens with a usable span.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::AlignmentIndex;
    use crate::model::Token;

    fn hello_world() -> Vec<Token> {
        vec![Token::new(1, "Hello", 0, 5), Token::new(2, " world", 5, 11), Token::new(3, ".", 11, 12)]
    }

    fn linear_resolve(tokens: &[Token], char_index: usize) -> Option<usize> {
        tokens
            .iter()
            .position(|token| token.span().is_some_and(|span| span.contains(char_index)))
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(4, Some(0))]
    #[case(5, Some(1))]
    #[case(7, Some(1))]
    #[case(11, Some(2))]
    #[case(12, None)]
    #[case(400, None)]
    fn resolves_contiguous_spans(#[case] char_index: usize, #[case] expected: Option<usize>) {
        let index = AlignmentIndex::new(&hello_world());
        assert_eq!(index.resolve(char_index), expected);
    }

    #[test]
    fn skips_tokens_without_spans() {
        let tokens = vec![
            Token::unspanned(101, "[CLS]"),
            Token::new(7592, "hello", 0, 5),
            Token { id: 9, text: "?".into(), start: Some(3), end: Some(3) },
            Token::unspanned(102, "[SEP]"),
        ];
        let index = AlignmentIndex::new(&tokens);

        assert_eq!(index.len(), 1);
        assert_eq!(index.token_count(), 4);
        assert_eq!(index.resolve(3), Some(1));
        assert_eq!(index.span_of(0), None);
        assert_eq!(index.span_of(2), None);
        assert_eq!(index.span_of(17), None);
    }

    #[test]
    fn overlapping_spans_resolve_to_first_in_list_order() {
        // Padding runs share one span; a later, wider token starts before them.
        let tokens = vec![
            Token::new(5, "abc", 4, 7),
            Token::new(-100, "(padding)", 0, 16),
            Token::new(-100, "(padding)", 0, 16),
            Token::new(6, "d", 2, 3),
        ];
        let index = AlignmentIndex::new(&tokens);

        assert_eq!(index.resolve(5), Some(0));
        assert_eq!(index.resolve(2), Some(1));
        assert_eq!(index.resolve(10), Some(1));
        assert_eq!(index.resolve(16), None);
    }

    #[test]
    fn gaps_between_spans_resolve_to_none() {
        let tokens = vec![Token::new(1, "a", 0, 1), Token::new(2, "b", 10, 11)];
        let index = AlignmentIndex::new(&tokens);
        assert_eq!(index.resolve(5), None);
        assert!(index.covers(1, 10));
        assert!(!index.covers(1, 11));
    }

    #[test]
    fn agrees_with_linear_scan() {
        // Deterministic pseudo-random span soup including overlaps and holes.
        let mut seed = 0x2545_f491_u64;
        let mut next = move |bound: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % bound) as usize
        };

        for _ in 0..50 {
            let count = next(24);
            let tokens: Vec<Token> = (0..count)
                .map(|i| {
                    if next(6) == 0 {
                        Token::unspanned(i as i64, "")
                    } else {
                        let start = next(40);
                        Token::new(i as i64, "", start, start + 1 + next(6))
                    }
                })
                .collect();
            let index = AlignmentIndex::new(&tokens);
            for char_index in 0..50 {
                assert_eq!(index.resolve(char_index), linear_resolve(&tokens, char_index));
            }
        }
    }

    #[test]
    fn empty_index_resolves_nothing() {
        let index = AlignmentIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.resolve(0), None);
    }
}
