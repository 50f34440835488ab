pub mod color;
pub mod cost;
pub mod display;
pub mod pool;

pub use color::ManaColor;
pub use cost::ManaCost;
pub use display::{render_mana_cost, RenderedManaCost};
pub use pool::{is_card_playable, ManaPool};
