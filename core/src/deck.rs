//! Deck catalog — the immutable card universe injected at startup.
//!
//! RULE: No hidden process-wide deck state. The catalog is constructed
//! once (from a JSON file or literal cards) and handed to the service;
//! card order in the file is the canonical deck order the shuffle sees.

use crate::types::CardId;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DeckFile {
    cards: Vec<Card>,
}

#[derive(Debug, Clone)]
pub struct DeckCatalog {
    cards: Vec<Card>,
    ids: Vec<CardId>,
}

impl DeckCatalog {
    /// Build a catalog from explicit cards. Ids must be unique and the
    /// deck non-empty.
    pub fn new(cards: Vec<Card>) -> anyhow::Result<Self> {
        if cards.is_empty() {
            anyhow::bail!("deck must contain at least one card");
        }
        let mut seen = std::collections::HashSet::new();
        for card in &cards {
            if !seen.insert(card.id.as_str()) {
                anyhow::bail!("duplicate card id in deck: {}", card.id);
            }
        }
        let ids = cards.iter().map(|c| c.id.clone()).collect();
        Ok(Self { cards, ids })
    }

    /// Load from a deck JSON file: `{ "cards": [{"id", "name"}, ...] }`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
        let file: DeckFile =
            serde_json::from_str(&content).with_context(|| format!("Invalid deck JSON in {path}"))?;
        Self::new(file.cards)
    }

    /// A 42-card deck with hardcoded ids for use in unit tests.
    pub fn default_test() -> Self {
        let cards = (1..=42)
            .map(|i| Card {
                id: format!("AU{i:02}"),
                name: format!("Card {i}"),
            })
            .collect();
        Self::new(cards).expect("test deck is valid")
    }

    /// Card ids in canonical deck order — the universe the draw samples.
    pub fn card_ids(&self) -> &[CardId] {
        &self.ids
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|c| c == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
