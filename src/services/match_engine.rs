// src/services/match_engine.rs
//
// Match Engine - one pass of the live-match pipeline
//
// CRITICAL RULES:
// - Everything is recomputed from the given arena ids; nothing is cached
// - Stages run in a fixed order: resolve, match, infer, enrich
// - Storage errors abort the pass and are returned to the caller
// - Facts about the pass are published on the event bus

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{ArenaId, EnrichedDeck, ManaPool, ObservedCard};
use crate::error::AppResult;
use crate::events::{ArenaIdsUnresolved, CandidateDecksRanked, EventBus};
use crate::repositories::{CardCatalog, DeckSearchFilter, DeckStore};
use crate::services::card_resolver::{card_count_by_name, CardResolver, ResolvedCards};
use crate::services::deck_matcher::{DeckMatcher, DEFAULT_CANDIDATE_LIMIT};
use crate::services::mana_inference::infer_opponent_mana;
use crate::services::match_stream::TickPhase;
use crate::services::playability::PlayabilityEnricher;

/// Everything the presentation layer needs for one log change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    pub cards: Vec<ObservedCard>,
    pub matching_decks: Vec<EnrichedDeck>,
    pub opponent_mana: ManaPool,
    pub missing_ids: Vec<ArenaId>,
}

#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub candidate_limit: u32,
    pub fallback_filter: DeckSearchFilter,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            fallback_filter: DeckSearchFilter::default(),
        }
    }
}

pub struct MatchEngine<'a> {
    catalog: &'a dyn CardCatalog,
    store: &'a dyn DeckStore,
    event_bus: &'a EventBus,
    settings: MatchSettings,
}

impl<'a> MatchEngine<'a> {
    pub fn new(
        catalog: &'a dyn CardCatalog,
        store: &'a dyn DeckStore,
        event_bus: &'a EventBus,
        settings: MatchSettings,
    ) -> Self {
        Self {
            catalog,
            store,
            event_bus,
            settings,
        }
    }

    pub fn evaluate(&self, arena_ids: &[ArenaId]) -> AppResult<MatchSnapshot> {
        self.evaluate_traced(arena_ids, &mut |_| {})
    }

    /// Run the pipeline, reporting each stage to `on_phase` before it starts.
    pub fn evaluate_traced(
        &self,
        arena_ids: &[ArenaId],
        on_phase: &mut dyn FnMut(TickPhase),
    ) -> AppResult<MatchSnapshot> {
        on_phase(TickPhase::Resolving);
        let ResolvedCards { cards, missing_ids } = CardResolver::new(self.catalog).resolve(arena_ids)?;
        if !missing_ids.is_empty() {
            self.event_bus.emit(ArenaIdsUnresolved::new(missing_ids.clone()));
        }

        on_phase(TickPhase::Matching);
        let candidates = DeckMatcher::new(self.store)
            .with_limit(self.settings.candidate_limit)
            .with_fallback_filter(self.settings.fallback_filter.clone())
            .find_matching_decks(&cards)?;
        if !cards.is_empty() {
            self.event_bus.emit(CandidateDecksRanked::new(
                cards.len(),
                candidates.iter().map(|d| d.id).collect(),
            ));
        }

        on_phase(TickPhase::Inferring);
        let opponent_mana = infer_opponent_mana(&cards);
        let card_counts: HashMap<String, u32> = card_count_by_name(arena_ids, &cards);
        let matching_decks =
            PlayabilityEnricher::new(self.store).enrich_decks(candidates, &card_counts, &opponent_mana)?;

        log::debug!(
            "Evaluated {} ids: {} cards, {} decks, {} unresolved",
            arena_ids.len(),
            cards.len(),
            matching_decks.len(),
            missing_ids.len()
        );

        Ok(MatchSnapshot {
            cards,
            matching_decks,
            opponent_mana,
            missing_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;
    use crate::events::{DomainEvent, EventBus};
    use crate::repositories::{SqliteCardCatalog, SqliteDeckStore};
    use crate::integrations::parse_arena_ids_from_log;
    use rusqlite::Connection;

    fn ids(values: &[&str]) -> Vec<ArenaId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn seed_azorius(conn: &Connection) {
        insert_card(conn, &land("l1", "Plains", "W", "1"));
        insert_card(conn, &land("l2", "Island", "U", "2"));
        insert_card(conn, &card("c1", "Azorius Charm", "{W}{U}", "Instant", "10"));
        insert_card(conn, &card("c2", "Dovin's Veto", "{W}{U}{U}", "Instant", "11"));

        insert_deck(conn, 1, "Azorius Control", "17lands.com", "standard");
        insert_deck_card(conn, 1, "l1", "Plains", 8);
        insert_deck_card(conn, 1, "l2", "Island", 8);
        insert_deck_card(conn, 1, "c1", "Azorius Charm", 4);
        insert_deck_card(conn, 1, "c2", "Dovin's Veto", 3);
    }

    fn card_named<'s>(snapshot: &'s MatchSnapshot, name: &str) -> &'s crate::domain::EnrichedCard {
        snapshot.matching_decks[0]
            .cards
            .iter()
            .find(|c| c.row.name == name)
            .unwrap()
    }

    #[test]
    fn test_two_lands_make_two_color_cards_playable() {
        let conn = test_database();
        seed_azorius(&conn);
        let catalog = SqliteCardCatalog::new(&conn);
        let store = SqliteDeckStore::new(&conn);
        let bus = EventBus::new();

        let engine = MatchEngine::new(&catalog, &store, &bus, MatchSettings::default());
        let snapshot = engine.evaluate(&ids(&["1", "2"])).unwrap();

        assert_eq!(snapshot.opponent_mana, ManaPool { w: 1, u: 1, ..Default::default() });
        assert_eq!(snapshot.cards.len(), 2);
        assert!(snapshot.missing_ids.is_empty());

        // the name-join tier finds the same deck again and keeps it
        assert_eq!(snapshot.matching_decks.len(), 2);
        assert!(snapshot.matching_decks.iter().all(|d| d.deck.id == 1));
        assert!(card_named(&snapshot, "Azorius Charm").is_playable);
        assert!(!card_named(&snapshot, "Dovin's Veto").is_playable);
        assert_eq!(card_named(&snapshot, "Plains").current_count, 1);
        assert_eq!(card_named(&snapshot, "Azorius Charm").current_count, 0);
        assert_eq!(snapshot.matching_decks[0].type_counts["land"], 2);
    }

    #[test]
    fn test_phase_order_and_parsed_line() {
        let conn = test_database();
        seed_azorius(&conn);
        let catalog = SqliteCardCatalog::new(&conn);
        let store = SqliteDeckStore::new(&conn);
        let bus = EventBus::new();
        let engine = MatchEngine::new(&catalog, &store, &bus, MatchSettings::default());

        let mut phases = Vec::new();
        let snapshot = engine
            .evaluate_traced(&ids(&["10", "10"]), &mut |phase| phases.push(phase))
            .unwrap();
        assert_eq!(
            phases,
            vec![TickPhase::Resolving, TickPhase::Matching, TickPhase::Inferring]
        );
        assert_eq!(card_named(&snapshot, "Azorius Charm").current_count, 2);

        let from_line = engine.evaluate(&parse_arena_ids_from_log("x::y::Cards: [10, 10]")).unwrap();
        assert_eq!(from_line, snapshot);
    }

    #[test]
    fn test_malformed_line_gives_empty_snapshot() {
        let conn = test_database();
        let catalog = SqliteCardCatalog::new(&conn);
        let store = SqliteDeckStore::new(&conn);
        let bus = EventBus::new();
        let engine = MatchEngine::new(&catalog, &store, &bus, MatchSettings::default());

        let snapshot = engine.evaluate(&parse_arena_ids_from_log("no separators here")).unwrap();
        assert_eq!(snapshot, MatchSnapshot::default());
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_events_published() {
        let conn = test_database();
        seed_azorius(&conn);
        let catalog = SqliteCardCatalog::new(&conn);
        let store = SqliteDeckStore::new(&conn);
        let bus = EventBus::new();

        let unresolved = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&unresolved);
        bus.subscribe::<ArenaIdsUnresolved, _>(move |event| {
            sink.lock().unwrap().extend(event.missing_ids.clone());
        });

        let engine = MatchEngine::new(&catalog, &store, &bus, MatchSettings::default());
        engine.evaluate(&ids(&["1", "404"])).unwrap();

        assert_eq!(*unresolved.lock().unwrap(), ids(&["404"]));
        let types: Vec<String> = bus.get_event_log().into_iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec!["ArenaIdsUnresolved", "CandidateDecksRanked"]);

        let ranked = CandidateDecksRanked::new(1, vec![1]);
        assert_eq!(ranked.event_type(), "CandidateDecksRanked");
    }

    #[test]
    fn test_storage_error_aborts_pass() {
        let conn = test_database();
        conn.execute_batch("DROP TABLE legacy_cards;").unwrap();
        let catalog = SqliteCardCatalog::new(&conn);
        let store = SqliteDeckStore::new(&conn);
        let bus = EventBus::new();
        let engine = MatchEngine::new(&catalog, &store, &bus, MatchSettings::default());

        assert!(engine.evaluate(&ids(&["1"])).is_err());
    }
}
