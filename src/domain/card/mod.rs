pub mod entity;
pub mod type_line;

pub use entity::{ArenaId, CardComponent, CardRecord, ObservedCard};
pub use type_line::{parse_card_types, TypeLine, TypeLineParser};
