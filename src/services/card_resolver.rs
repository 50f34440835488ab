// src/services/card_resolver.rs
//
// Arena-ID Resolver
//
// CRITICAL RULES:
// - Catalog first, legacy identifier table second, never the other way round
// - A legacy name that matches a catalog card takes on that card's fields
// - Ids the legacy table does not know are reported, not dropped silently
// - Counts come from the raw id list, duplicates included

use std::collections::{HashMap, HashSet};

use crate::domain::{ArenaId, CardRecord, ObservedCard};
use crate::error::AppResult;
use crate::repositories::CardCatalog;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCards {
    pub cards: Vec<ObservedCard>,

    /// Requested ids found in neither the catalog nor the legacy table,
    /// in request order
    pub missing_ids: Vec<ArenaId>,
}

pub struct CardResolver<'a> {
    catalog: &'a dyn CardCatalog,
}

impl<'a> CardResolver<'a> {
    pub fn new(catalog: &'a dyn CardCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, arena_ids: &[ArenaId]) -> AppResult<ResolvedCards> {
        if arena_ids.is_empty() {
            return Ok(ResolvedCards::default());
        }

        let requested = unique_in_order(arena_ids);
        let mut records = self.catalog.find_by_arena_ids(&requested)?;

        let found: HashSet<&str> = records
            .iter()
            .filter_map(|card| card.arena_id.as_deref())
            .collect();
        let unmatched: Vec<ArenaId> = requested
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect();

        let mut missing_ids = Vec::new();
        if !unmatched.is_empty() {
            let legacy = self.catalog.find_legacy_names(&unmatched)?;
            let known: HashSet<&str> = legacy.iter().map(|(id, _)| id.as_str()).collect();

            missing_ids = unmatched
                .iter()
                .filter(|id| !known.contains(id.as_str()))
                .cloned()
                .collect();

            for (arena_id, name) in legacy {
                records.push(self.resolve_legacy(arena_id, name)?);
            }
        }

        if !missing_ids.is_empty() {
            log::info!("Missing {} cards: {:?}", missing_ids.len(), missing_ids);
        }

        let counts = occurrences(arena_ids);
        let cards = records
            .into_iter()
            .map(|card| {
                let count = card
                    .arena_id
                    .as_deref()
                    .and_then(|id| counts.get(id).copied())
                    .unwrap_or(0);
                ObservedCard::new(card, count)
            })
            .collect();

        Ok(ResolvedCards { cards, missing_ids })
    }

    fn resolve_legacy(&self, arena_id: ArenaId, name: String) -> AppResult<CardRecord> {
        let matched = match self.catalog.find_by_name(&name)? {
            Some(card) => Some(card),
            None => self.catalog.find_by_alias(&name)?,
        };

        Ok(matched.unwrap_or_else(|| CardRecord::from_legacy(arena_id, name)))
    }
}

/// Card name -> occurrences of that card's arena id in `arena_ids`.
///
/// Defaults to 1 when the card's id never appears (e.g. a legacy card that
/// adopted a different catalog id).
pub fn card_count_by_name(arena_ids: &[ArenaId], cards: &[ObservedCard]) -> HashMap<String, u32> {
    let counts = occurrences(arena_ids);
    cards
        .iter()
        .map(|observed| {
            let count = observed
                .card
                .arena_id
                .as_deref()
                .and_then(|id| counts.get(id).copied())
                .unwrap_or(1);
            (observed.card.name.clone(), count)
        })
        .collect()
}

fn occurrences(arena_ids: &[ArenaId]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for id in arena_ids {
        *counts.entry(id.as_str()).or_insert(0) += 1;
    }
    counts
}

fn unique_in_order(arena_ids: &[ArenaId]) -> Vec<ArenaId> {
    let mut seen = HashSet::new();
    arena_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
