// src/application/render.rs
//
// HTML fragment for one match snapshot.
//
// All card, deck and source text is escaped; mana icons are the only markup
// taken from the domain layer and are generated there from fixed templates.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::{EnrichedCard, EnrichedDeck, ManaPool, ObservedCard};
use crate::services::MatchSnapshot;

pub fn render_match_fragment(snapshot: &MatchSnapshot) -> String {
    let mut html = String::new();

    html.push_str("<section class=\"match\">\n");
    render_opponent_mana(&mut html, &snapshot.opponent_mana);
    render_observed_cards(&mut html, &snapshot.cards);
    render_missing_ids(&mut html, &snapshot.missing_ids);

    html.push_str("<div class=\"matching-decks\">\n");
    if snapshot.matching_decks.is_empty() {
        html.push_str("<p class=\"empty\">No matching decks</p>\n");
    }
    for deck in &snapshot.matching_decks {
        render_deck(&mut html, deck);
    }
    html.push_str("</div>\n</section>\n");

    html
}

fn render_opponent_mana(html: &mut String, pool: &ManaPool) {
    html.push_str("<div class=\"opponent-mana\">");
    for (color, amount) in pool.nonzero() {
        let symbol = color.symbol().to_lowercase();
        html.push_str(&format!(
            "<span class=\"mana\"><i class=\"ms ms-{} ms-cost ms-shadow\"></i> {}</span>",
            symbol, amount
        ));
    }
    html.push_str("</div>\n");
}

fn render_observed_cards(html: &mut String, cards: &[ObservedCard]) {
    html.push_str("<ul class=\"observed-cards\">\n");
    for observed in cards {
        html.push_str(&format!(
            "<li data-arena-id=\"{}\"><span class=\"count\">{}x</span> <span class=\"name\">{}</span> <span class=\"cost\">{}</span></li>\n",
            encode_double_quoted_attribute(observed.card.arena_id.as_deref().unwrap_or("")),
            observed.count,
            encode_text(&observed.card.name),
            observed.mana_cost_tags
        ));
    }
    html.push_str("</ul>\n");
}

fn render_missing_ids(html: &mut String, missing_ids: &[String]) {
    if missing_ids.is_empty() {
        return;
    }
    let ids: Vec<String> = missing_ids
        .iter()
        .map(|id| encode_text(id).into_owned())
        .collect();
    html.push_str(&format!(
        "<p class=\"missing-ids\">Unknown cards: {}</p>\n",
        ids.join(", ")
    ));
}

fn render_deck(html: &mut String, deck: &EnrichedDeck) {
    let name = encode_text(&deck.deck.name);
    let title = match &deck.deck.url {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            encode_double_quoted_attribute(url),
            name
        ),
        None => name.into_owned(),
    };

    html.push_str(&format!(
        "<article class=\"deck\" data-deck-id=\"{}\">\n<h3>{} <small>{} · {}/{}</small></h3>\n",
        deck.deck.id,
        title,
        encode_text(deck.deck.source.as_deref().unwrap_or("")),
        deck.deck.matched_cards,
        deck.deck.total_deck_cards
    ));

    let counts: Vec<String> = deck
        .type_counts
        .iter()
        .map(|(card_type, count)| format!("{} {}", encode_text(card_type), count))
        .collect();
    html.push_str(&format!("<p class=\"type-counts\">{}</p>\n", counts.join(" · ")));

    html.push_str("<ul class=\"deck-cards\">\n");
    for card in &deck.cards {
        render_deck_card(html, card);
    }
    html.push_str("</ul>\n</article>\n");
}

fn render_deck_card(html: &mut String, card: &EnrichedCard) {
    let mut classes = vec!["card"];
    if card.is_playable {
        classes.push("playable");
    }
    if card.current_count > 0 {
        classes.push("seen");
    }

    html.push_str(&format!(
        "<li class=\"{}\" data-type=\"{}\"><span class=\"count\">{}/{}</span> <span class=\"name\">{}</span> <span class=\"cost\">{}</span></li>\n",
        classes.join(" "),
        encode_double_quoted_attribute(&card.types.types),
        card.current_count,
        card.row.quantity,
        encode_text(&card.row.name),
        card.mana_cost_tags
    ));
}
