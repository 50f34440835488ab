// src/integrations/arena_log.rs
//
// Game client log line format.
//
// The tracker writes one line per game event:
//
//     <timestamp>::<event kind>::<label>: [<id>, <id>, ...]
//
// Only the id list of the third segment is of interest here. Anything that
// does not fit the shape yields no ids; a bad line is never an error.

use crate::domain::ArenaId;

const SEGMENT_SEPARATOR: &str = "::";
const LABEL_SEPARATOR: &str = ": ";
const ID_SEPARATOR: &str = ", ";

/// Extract the observed arena ids from one log line.
///
/// Ids are returned in log order with duplicates kept, since duplicates
/// mean several copies of the same card were seen.
pub fn parse_arena_ids_from_log(line: &str) -> Vec<ArenaId> {
    let segments: Vec<&str> = line.split(SEGMENT_SEPARATOR).collect();
    let Some(cards_segment) = segments.get(2) else {
        return Vec::new();
    };

    let parts: Vec<&str> = cards_segment.split(LABEL_SEPARATOR).collect();
    let Some(id_list) = parts.get(1) else {
        return Vec::new();
    };

    id_list
        .trim_matches(|ch| ch == '[' || ch == ']')
        .split(ID_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
