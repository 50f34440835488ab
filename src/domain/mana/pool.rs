// src/domain/mana/pool.rs
//
// Available mana and the affordability check.

use serde::{Deserialize, Serialize};

use super::color::ManaColor;
use super::cost::ManaCost;

/// Mana available to a player, per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    pub w: u32,
    pub u: u32,
    pub b: u32,
    pub r: u32,
    pub g: u32,
    pub c: u32,
}

impl ManaPool {
    pub fn total(&self) -> u32 {
        self.w + self.u + self.b + self.r + self.g + self.c
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

    pub fn set(&mut self, color: ManaColor, amount: u32) {
        match color {
            ManaColor::White => self.w = amount,
            ManaColor::Blue => self.u = amount,
            ManaColor::Black => self.b = amount,
            ManaColor::Red => self.r = amount,
            ManaColor::Green => self.g = amount,
            ManaColor::Colorless => self.c = amount,
        }
    }

    /// Nonzero slots in WUBRG-then-C order.
    pub fn nonzero(&self) -> Vec<(ManaColor, u32)> {
        ManaColor::ALL
            .iter()
            .map(|color| (*color, self.get(*color)))
            .filter(|(_, amount)| *amount > 0)
            .collect()
    }

    /// Greedy sufficiency check.
    ///
    /// Exact colors and `{C}` are deducted first; whatever is left of the
    /// pool total must cover the generic part. No cross-color optimisation.
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        let mut remaining = i64::from(self.total());

        for color in ManaColor::COLORS {
            let required = cost.get(color);
            if self.get(color) < required {
                return false;
            }
            remaining -= i64::from(required);
        }

        if self.c < cost.c {
            return false;
        }
        remaining -= i64::from(cost.c);

        remaining >= i64::from(cost.generic)
    }
}

/// Whether a card with the given cost notation is castable from `pool`.
pub fn is_card_playable(mana_cost: &str, pool: &ManaPool) -> bool {
    pool.can_pay(&ManaCost::from_notation(mana_cost))
}
