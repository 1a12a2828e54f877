//! Placeholder tokens and their wire grammar.
//!
//! A placeholder renders as `"[" CATEGORY "_" SLOT "]"`:
//!
//! - `CATEGORY` is an uppercase tag, `[A-Z][A-Z0-9]*(_[A-Z0-9]+)*`.
//! - `SLOT` is an uppercase letter ordinal in bijective base 26:
//!   `A` … `Z`, `AA` … `ZZ`, `AAA` …
//!
//! The slot is always the segment after the final underscore, so a token has
//! exactly one parse. Numeric slots are never rendered and never parsed.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::category::EntityCategory;

/// Matches every well-formed token in a text, without consulting any map.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*_[A-Z]+\]").expect("token grammar is valid")
});

const ALPHABET_LEN: u32 = 26;

/// A slot ordinal within one category, starting at zero (`A`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Slot(u32);

impl Slot {
    /// The first slot, rendered `A`.
    pub const FIRST: Slot = Slot(0);

    /// Wraps a zero-based ordinal.
    #[must_use]
    pub const fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    /// The zero-based ordinal.
    pub const fn ordinal(self) -> u32 {
        self.0
    }

    /// Renders the slot as uppercase letters.
    pub fn render(self) -> String {
        let mut letters = Vec::new();
        let mut n = u64::from(self.0) + 1;
        while n > 0 {
            n -= 1;
            // n % 26 < 26, so the cast cannot truncate.
            #[allow(clippy::cast_possible_truncation)]
            letters.push(b'A' + (n % u64::from(ALPHABET_LEN)) as u8);
            n /= u64::from(ALPHABET_LEN);
        }
        letters.reverse();
        letters.into_iter().map(char::from).collect()
    }

    /// Parses uppercase letters back into a slot.
    ///
    /// Returns `None` for empty input, any byte outside `A-Z`, or an ordinal
    /// that does not fit in `u32`.
    pub fn parse(letters: &str) -> Option<Self> {
        if letters.is_empty() {
            return None;
        }
        let mut value: u64 = 0;
        for b in letters.bytes() {
            if !b.is_ascii_uppercase() {
                return None;
            }
            value = value
                .checked_mul(u64::from(ALPHABET_LEN))?
                .checked_add(u64::from(b - b'A') + 1)?;
            if value > u64::from(u32::MAX) + 1 {
                return None;
            }
        }
        u32::try_from(value - 1).ok().map(Self)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A typed stand-in for one original value within one session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placeholder {
    category: EntityCategory,
    slot: Slot,
}

impl Placeholder {
    /// Pairs a category with a slot.
    #[must_use]
    pub fn new(category: EntityCategory, slot: Slot) -> Self {
        Self { category, slot }
    }

    /// The entity category.
    pub fn category(&self) -> &EntityCategory {
        &self.category
    }

    /// The slot ordinal.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Renders the bracketed token, e.g. `[PERSON_A]`.
    pub fn token(&self) -> String {
        self.to_string()
    }

    /// Parses a complete bracketed token.
    ///
    /// Accepts exactly what [`Placeholder::token`] renders and nothing else.
    pub fn parse(token: &str) -> Option<Self> {
        let body = token.strip_prefix('[')?.strip_suffix(']')?;
        Self::parse_body(body)
    }

    /// Parses the text between the brackets, e.g. `PERSON_A`.
    pub(crate) fn parse_body(body: &str) -> Option<Self> {
        let (tag, letters) = body.rsplit_once('_')?;
        let category = EntityCategory::from_tag(tag).ok()?;
        let slot = Slot::parse(letters)?;
        Some(Self { category, slot })
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}_{}]", self.category.as_str(), self.slot.render())
    }
}

/// Iterates over every well-formed token occurring in `text`.
pub(crate) fn tokens_in(text: &str) -> impl Iterator<Item = &str> {
    TOKEN.find_iter(text).map(|m| m.as_str())
}
