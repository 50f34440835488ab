// src/domain/card/type_line.rs
//
// Type line grammar: `[supertypes] types [— subtypes]`.
//
// Based on the MTGJSON set builder's splitting rules.

use serde::{Deserialize, Serialize};

const SUPER_TYPES: [&str; 6] = ["Basic", "Host", "Legendary", "Ongoing", "Snow", "World"];

const TYPE_SEPARATOR: char = '—';

// Stands in for spaces inside registered multi-word subtypes while splitting.
const SPACE_SENTINEL: char = '\u{1F}';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLine {
    pub super_types: Vec<String>,
    /// Card types joined by single spaces, e.g. `Artifact Creature`
    pub types: String,
    pub sub_types: Vec<String>,
}

impl TypeLine {
    /// Normalised key used for per-deck type tallies.
    pub fn type_key(&self) -> Option<String> {
        let key = self.types.trim().to_lowercase();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeLineParser {
    multi_word_subtypes: Vec<String>,
}

impl Default for TypeLineParser {
    fn default() -> Self {
        Self {
            multi_word_subtypes: vec!["Time Lord".to_string()],
        }
    }
}

impl TypeLineParser {
    /// Register another subtype whose name contains spaces.
    pub fn with_multi_word_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.multi_word_subtypes.push(subtype.into());
        self
    }

    pub fn parse(&self, type_line: &str) -> TypeLine {
        if type_line.is_empty() {
            return TypeLine::default();
        }

        let mut parts = type_line.split(TYPE_SEPARATOR);
        let head = parts.next().unwrap_or("");
        let sub_types = match parts.next() {
            // Planes name a whole plane as a single subtype.
            Some(tail) if type_line.starts_with("Plane") => vec![tail.trim().to_string()],
            Some(tail) => self.split_subtypes(tail),
            None => Vec::new(),
        };

        let mut super_types = Vec::new();
        let mut types = Vec::new();
        for token in head.split_whitespace() {
            if SUPER_TYPES.contains(&token) {
                super_types.push(token.to_string());
            } else {
                types.push(token);
            }
        }

        TypeLine {
            super_types,
            types: types.join(" "),
            sub_types,
        }
    }

    fn split_subtypes(&self, tail: &str) -> Vec<String> {
        let mut protected = tail.to_string();
        for subtype in &self.multi_word_subtypes {
            if protected.contains(subtype.as_str()) {
                let joined = subtype.replace(' ', &SPACE_SENTINEL.to_string());
                protected = protected.replace(subtype.as_str(), &joined);
            }
        }

        protected
            .split_whitespace()
            .map(|token| token.replace(SPACE_SENTINEL, " "))
            .collect()
    }
}

/// Parse with the default multi-word subtype registry.
pub fn parse_card_types(type_line: &str) -> TypeLine {
    TypeLineParser::default().parse(type_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_legendary_creature() {
        let parsed = parse_card_types("Legendary Creature — Human Wizard");
        assert_eq!(parsed.super_types, strings(&["Legendary"]));
        assert_eq!(parsed.types, "Creature");
        assert_eq!(parsed.sub_types, strings(&["Human", "Wizard"]));
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_card_types(""), TypeLine::default());
    }

    #[test]
    fn test_no_subtypes() {
        let parsed = parse_card_types("Artifact Creature");
        assert!(parsed.super_types.is_empty());
        assert_eq!(parsed.types, "Artifact Creature");
        assert!(parsed.sub_types.is_empty());
    }

    #[test]
    fn test_multiple_supertypes() {
        let parsed = parse_card_types("Basic Snow Land — Forest");
        assert_eq!(parsed.super_types, strings(&["Basic", "Snow"]));
        assert_eq!(parsed.types, "Land");
        assert_eq!(parsed.sub_types, strings(&["Forest"]));
    }

    #[test]
    fn test_plane_keeps_whole_subtype() {
        let parsed = parse_card_types("Plane — Serra's Realm");
        assert_eq!(parsed.types, "Plane");
        assert_eq!(parsed.sub_types, strings(&["Serra's Realm"]));
    }

    #[test]
    fn test_time_lord_is_one_subtype() {
        let parsed = parse_card_types("Legendary Creature — Time Lord Doctor");
        assert_eq!(parsed.sub_types, strings(&["Time Lord", "Doctor"]));
    }

    #[test]
    fn test_registered_multi_word_subtype() {
        let parser = TypeLineParser::default().with_multi_word_subtype("Mount Mole");
        let parsed = parser.parse("Creature — Mount Mole Beast");
        assert_eq!(parsed.sub_types, strings(&["Mount Mole", "Beast"]));

        // Unregistered, the same line splits on every space.
        let parsed = parse_card_types("Creature — Mount Mole Beast");
        assert_eq!(parsed.sub_types, strings(&["Mount", "Mole", "Beast"]));
    }

    #[test]
    fn test_type_key() {
        assert_eq!(
            parse_card_types("Legendary Artifact — Equipment").type_key(),
            Some("artifact".to_string())
        );
        assert_eq!(parse_card_types("Legendary").type_key(), None);
    }
}
