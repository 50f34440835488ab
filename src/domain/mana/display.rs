// src/domain/mana/display.rs
//
// Mana cost value and icon tags for the UI.
//
// A character walk, independent of `ManaCost::from_notation`. Digits count
// one by one, so `{10}` renders as value 1 with tags for "1" and "0".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedManaCost {
    pub value: u32,
    pub tags: String,
}

fn icon_tag(symbol: char) -> String {
    format!(
        "<i class=\"ms ms-{} ms-cost ms-shadow\"></i>",
        symbol.to_lowercase()
    )
}

pub fn render_mana_cost(mana_cost: &str) -> RenderedManaCost {
    let mut value = 0;
    let mut tags: Vec<String> = Vec::new();

    let chars: Vec<char> = mana_cost.chars().collect();
    for (idx, ch) in chars.iter().enumerate() {
        if *ch == '{' {
            if let Some(next) = chars.get(idx + 1) {
                if !next.is_ascii_digit() {
                    value += 1;
                    tags.push(icon_tag(*next));
                }
            }
        }
        if let Some(digit) = ch.to_digit(10) {
            value += digit;
            tags.push(icon_tag(*ch));
        }
    }

    RenderedManaCost {
        value,
        tags: tags.join(" "),
    }
}
