// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The tokenizer is an external collaborator: a pure, deterministic
//! `str -> list<str>` function. This crate bundles only the default
//! whitespace tokenizer; hosts are expected to plug in their own.

/// A deterministic `str -> Vec<String>` tokenizer. Implementations must
/// return the empty list for the empty string.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits on Unicode whitespace; the default used when no tokenizer is
/// supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}
