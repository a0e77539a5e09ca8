// ratachat — an embeddable chat widget for ratatui terminals
// Copyright (C) 2026  The ratachat developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Tappable-token detection in rendered text rows.
//!
//! Runs over the final rendered row text, so reported column spans are
//! exactly what is on screen. Detection is deliberately conservative:
//! URLs by scheme prefix, phone numbers as dense digit tokens, dates in
//! the two unambiguous numeric layouts. Addresses have no reliable
//! textual shape and are left to the host.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextToken {
    Url(String),
    Phone(String),
    Date(String),
}

/// A detected token and the display-column span it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub start_col: usize,
    pub width: usize,
    pub token: TextToken,
}

const URL_TRAILERS: &[char] = &['.', ',', ';', ':', ')', ']', '>', '!', '?'];

fn classify(word: &str) -> Option<(TextToken, &str)> {
    if word.starts_with("http://") || word.starts_with("https://") {
        let trimmed = word.trim_end_matches(URL_TRAILERS);
        return Some((TextToken::Url(trimmed.to_owned()), trimmed));
    }
    if is_phone(word) {
        return Some((TextToken::Phone(word.to_owned()), word));
    }
    if is_date(word) {
        return Some((TextToken::Date(word.to_owned()), word));
    }
    None
}

/// At least seven digits, nothing but digits and phone punctuation.
fn is_phone(word: &str) -> bool {
    let digits = word.chars().filter(char::is_ascii_digit).count();
    digits >= 7 && word.chars().all(|c| c.is_ascii_digit() || "+()-".contains(c))
}

/// `YYYY-MM-DD` or `DD.MM.YYYY`.
fn is_date(word: &str) -> bool {
    let numeric_with = |sep: char, layout: [usize; 3]| {
        let parts: Vec<&str> = word.split(sep).collect();
        parts.len() == 3
            && parts
                .iter()
                .zip(layout)
                .all(|(p, len)| p.len() == len && p.chars().all(|c| c.is_ascii_digit()))
    };
    numeric_with('-', [4, 2, 2]) || numeric_with('.', [2, 2, 4])
}

/// Scan one rendered row for tappable tokens.
pub fn scan_row(text: &str) -> Vec<TokenSpan> {
    let mut spans = Vec::new();
    let mut col = 0usize;
    for chunk in text.split_inclusive(char::is_whitespace) {
        let word = chunk.trim_end();
        if let Some((token, matched)) = classify(word) {
            spans.push(TokenSpan { start_col: col, width: matched.width(), token });
        }
        col += chunk.width();
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_url_with_column_span() {
        let spans = scan_row("open https://example.com/x now");
        assert_eq!(
            spans,
            vec![TokenSpan {
                start_col: 5,
                width: 21,
                token: TextToken::Url("https://example.com/x".into()),
            }]
        );
    }

    #[test]
    fn strips_trailing_punctuation_from_urls() {
        let spans = scan_row("see https://example.com.");
        assert_eq!(spans[0].token, TextToken::Url("https://example.com".into()));
        assert_eq!(spans[0].width, 19);
    }

    #[test]
    fn finds_phone_tokens() {
        let spans = scan_row("call +15550100 today");
        assert_eq!(spans[0].token, TextToken::Phone("+15550100".into()));
        assert_eq!(spans[0].start_col, 5);
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        assert_eq!(scan_row("room 4021 is free"), vec![]);
    }

    #[test]
    fn finds_both_date_layouts() {
        let spans = scan_row("between 2026-08-06 and 24.12.2026 maybe");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].token, TextToken::Date("2026-08-06".into()));
        assert_eq!(spans[1].token, TextToken::Date("24.12.2026".into()));
    }

    #[test]
    fn plain_words_yield_nothing() {
        assert_eq!(scan_row("just a normal sentence"), vec![]);
    }

    #[test]
    fn columns_account_for_wide_characters() {
        // "你好 " is 5 columns wide (2+2+1).
        let spans = scan_row("你好 https://a.io");
        assert_eq!(spans[0].start_col, 5);
    }
}
