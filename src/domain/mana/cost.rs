// src/domain/mana/cost.rs
//
// Mana cost notation parser.
//
// RULES:
// - Pure function of the notation string, never persisted
// - Never fails: unknown or malformed symbols contribute nothing
// - Hybrid symbols collapse to a single fixed requirement at parse time

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::color::ManaColor;

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("mana symbol pattern is valid"))
}

/// The requirements of a card's mana cost.
///
/// Colored counts (and `c`, the colorless-specific `{C}` symbol) must be paid
/// by exactly that kind of mana. `generic` can be paid by anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    pub w: u32,
    pub u: u32,
    pub b: u32,
    pub r: u32,
    pub g: u32,
    pub c: u32,
    pub generic: u32,
}

impl ManaCost {
    /// Parse a cost such as `{2}{W}{W}`, `{X}{U/B}` or `{R/P}`.
    ///
    /// Hybrid symbols: a Phyrexian half (`P`) resolves to the other half;
    /// otherwise a numeric first half is generic mana; otherwise the first
    /// listed color is required.
    pub fn from_notation(notation: &str) -> Self {
        let mut cost = ManaCost::default();
        if notation.is_empty() {
            return cost;
        }

        for capture in symbol_pattern().captures_iter(notation) {
            let symbol = &capture[1];

            if is_number(symbol) {
                cost.generic = cost.generic.saturating_add(parse_number(symbol));
            } else if symbol == "X" {
                continue;
            } else if let Some(color) = ManaColor::from_symbol(symbol) {
                cost.add(color, 1);
            } else if symbol.contains('/') {
                cost.add_hybrid(symbol);
            }
        }

        cost
    }

    fn add_hybrid(&mut self, symbol: &str) {
        let halves: Vec<&str> = symbol.split('/').collect();

        if halves.contains(&"P") {
            if let Some(color) = halves
                .iter()
                .find(|half| **half != "P")
                .and_then(|half| ManaColor::from_symbol(half))
            {
                self.add(color, 1);
            }
            return;
        }

        let first = halves[0];
        if is_number(first) {
            self.generic = self.generic.saturating_add(parse_number(first));
        } else if let Some(color) = ManaColor::from_symbol(first) {
            self.add(color, 1);
        }
    }

    pub fn get(&self, color: ManaColor) -> u32 {
        match color {
            ManaColor::White => self.w,
            ManaColor::Blue => self.u,
            ManaColor::Black => self.b,
            ManaColor::Red => self.r,
            ManaColor::Green => self.g,
            ManaColor::Colorless => self.c,
        }
    }

    pub fn add(&mut self, color: ManaColor, amount: u32) {
        let slot = match color {
            ManaColor::White => &mut self.w,
            ManaColor::Blue => &mut self.u,
            ManaColor::Black => &mut self.b,
            ManaColor::Red => &mut self.r,
            ManaColor::Green => &mut self.g,
            ManaColor::Colorless => &mut self.c,
        };
        *slot = slot.saturating_add(amount);
    }
}

fn is_number(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.chars().all(|ch| ch.is_ascii_digit())
}

fn parse_number(symbol: &str) -> u32 {
    // Digit-only symbols only overflow on absurd input; saturate instead of failing.
    symbol.parse().unwrap_or(u32::MAX)
}
