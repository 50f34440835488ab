// src/services/mana_inference.rs
//
// Opponent mana inferred from observed lands.
//
// Each color a land produces contributes exactly one unit, however many
// lands produce it. Only cards whose primary type is exactly "Land" count.

use crate::domain::{ManaColor, ManaPool, ObservedCard};

pub fn infer_opponent_mana(observed: &[ObservedCard]) -> ManaPool {
    let mut pool = ManaPool::default();

    for card in observed.iter().filter(|c| c.is_land()) {
        for token in card.card.produced_mana_tokens() {
            match ManaColor::from_symbol(token) {
                Some(color) => pool.set(color, 1),
                None => log::trace!("Ignoring produced mana token {:?} on {}", token, card.card.name),
            }
        }
    }

    pool
}
