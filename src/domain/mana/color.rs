use serde::{Deserialize, Serialize};

/// One of the six kinds of mana a pool can hold.
///
/// `Colorless` is the specific `{C}` symbol, not generic mana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManaColor {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl ManaColor {
    /// The five colors, in WUBRG order.
    pub const COLORS: [ManaColor; 5] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
    ];

    /// All pool slots in display order (WUBRG then C).
    pub const ALL: [ManaColor; 6] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
    ];

    /// Parse a single-letter mana symbol (`W`, `U`, `B`, `R`, `G`, `C`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "W" => Some(ManaColor::White),
            "U" => Some(ManaColor::Blue),
            "B" => Some(ManaColor::Black),
            "R" => Some(ManaColor::Red),
            "G" => Some(ManaColor::Green),
            "C" => Some(ManaColor::Colorless),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ManaColor::White => "W",
            ManaColor::Blue => "U",
            ManaColor::Black => "B",
            ManaColor::Red => "R",
            ManaColor::Green => "G",
            ManaColor::Colorless => "C",
        }
    }
}

impl std::fmt::Display for ManaColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
