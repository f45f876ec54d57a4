//! Natural, case- and accent-aware ordering for listing keys.
//!
//! Digit runs compare by numeric value and come before letters. Text compares
//! first without accents or case, then with accents, then with case
//! (lowercase first), and finally by code point so the order is total.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare_chunks(a, b, |x, y| fold(x).cmp(&fold(y)))
        .then_with(|| compare_chunks(a, b, |x, y| lowercase(x).cmp(lowercase(y))))
        .then_with(|| {
            compare_chunks(a, b, |x, y| {
                x.chars()
                    .map(char::is_uppercase)
                    .cmp(y.chars().map(char::is_uppercase))
            })
        })
        .then_with(|| a.cmp(b))
}

/// Stable sort by a string key in natural order.
pub fn sort_by_key_natural<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lowercase(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// Walk both strings chunk by chunk, comparing text chunks with `text`.
fn compare_chunks(a: &str, b: &str, text: impl Fn(&str, &str) -> Ordering) -> Ordering {
    let mut left = Chunks { rest: a };
    let mut right = Chunks { rest: b };
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Number(x)), Some(Chunk::Number(y))) => compare_numbers(x, y),
            (Some(Chunk::Number(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Number(_))) => Ordering::Greater,
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => text(x, y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

/// Compare digit runs by value without parsing (runs can be arbitrarily long).
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let numeric = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != numeric)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(if numeric {
            Chunk::Number(head)
        } else {
            Chunk::Text(head)
        })
    }
}
