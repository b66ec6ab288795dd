//! Tokenizer and parser for diet specifications.
//!
//! Grammar:
//!
//! ```text
//! diet     := entry (',' entry)*
//! entry    := feed_id ':' quantity
//! quantity := finite, non-negative decimal number
//! ```
//!
//! Whitespace around feed ids and quantities is ignored. There is no escaping,
//! so feed ids cannot contain `,` or `:`.

use crate::domain::model::DietEntry;
use crate::utils::error::{RationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Colon,
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset into the input.
    pub start: usize,
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;

    for (offset, ch) in input.char_indices() {
        let kind = match ch {
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            _ => continue,
        };
        if offset > text_start {
            tokens.push(Token {
                kind: TokenKind::Text,
                text: &input[text_start..offset],
                start: text_start,
            });
        }
        tokens.push(Token {
            kind,
            text: &input[offset..offset + 1],
            start: offset,
        });
        text_start = offset + 1;
    }

    if text_start < input.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            text: &input[text_start..],
            start: text_start,
        });
    }

    tokens
}

/// Parses `"FeedID:Qty,FeedID:Qty"` into entries, in input order.
pub fn parse_diet(input: &str) -> Result<Vec<DietEntry>> {
    let tokens = tokenize(input);
    let mut entries = Vec::new();
    let mut entry_start = 0;
    let mut group: Vec<Token<'_>> = Vec::new();

    for token in tokens {
        if token.kind == TokenKind::Comma {
            entries.push(parse_entry(&input[entry_start..token.start], &group)?);
            group.clear();
            entry_start = token.start + 1;
        } else {
            group.push(token);
        }
    }
    entries.push(parse_entry(&input[entry_start..], &group)?);

    tracing::debug!("Parsed {} diet entries", entries.len());
    Ok(entries)
}

fn parse_entry(raw: &str, tokens: &[Token<'_>]) -> Result<DietEntry> {
    let colons = tokens.iter().filter(|t| t.kind == TokenKind::Colon).count();
    if colons != 1 {
        return Err(RationError::malformed(raw, "expected exactly one ':'"));
    }

    let (feed_part, quantity_part) = match tokens {
        [Token {
            kind: TokenKind::Text,
            text: feed,
            ..
        }, Token {
            kind: TokenKind::Colon,
            ..
        }, Token {
            kind: TokenKind::Text,
            text: quantity,
            ..
        }] => (*feed, *quantity),
        [Token {
            kind: TokenKind::Colon,
            ..
        }, ..] => ("", ""),
        [Token {
            kind: TokenKind::Text,
            text: feed,
            ..
        }, Token {
            kind: TokenKind::Colon,
            ..
        }] => (*feed, ""),
        _ => return Err(RationError::malformed(raw, "expected exactly one ':'")),
    };

    let feed_id = feed_part.trim();
    if feed_id.is_empty() {
        return Err(RationError::malformed(raw, "empty feed id"));
    }

    let quantity_text = quantity_part.trim();
    if quantity_text.is_empty() {
        return Err(RationError::malformed(raw, "missing quantity"));
    }

    let quantity: f64 = quantity_text
        .parse()
        .map_err(|_| RationError::malformed(raw, "quantity is not a number"))?;
    if !quantity.is_finite() {
        return Err(RationError::malformed(raw, "quantity must be a finite number"));
    }
    if quantity < 0.0 {
        return Err(RationError::malformed(raw, "quantity must be non-negative"));
    }

    Ok(DietEntry {
        feed_id: feed_id.to_string(),
        quantity,
    })
}
