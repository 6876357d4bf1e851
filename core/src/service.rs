//! Reading service — validates requests and orchestrates draws.
//!
//! State machine per reading: Created (seed fixed, no positions) →
//! Drawn (positions exist) → Redrawn (positions replaced; same state as
//! Drawn to external observers).
//!
//! RULE: a repeat draw without force_redraw is an idempotent read of the
//! stored spread, not an error. The service short-circuits BEFORE calling
//! store.save_positions; only the store itself rejects a blind re-insert.

use crate::{
    deck::DeckCatalog,
    draw::draw,
    error::{ReadingError, ReadingResult},
    reading::{Mode, Position, Reading},
    store::ReadingStore,
};

/// Upper bound on cards per draw request. The deck size bounds it further.
pub const MAX_DRAW_COUNT: usize = 10;

pub struct ReadingService {
    store: ReadingStore,
    deck: DeckCatalog,
}

impl ReadingService {
    pub fn new(store: ReadingStore, deck: DeckCatalog) -> Self {
        Self { store, deck }
    }

    /// Start a new reading session.
    ///
    /// Digital sessions without a caller seed get an OS-random one (the
    /// store generates it). Physical sessions are recorded, never drawn.
    pub fn start(
        &self,
        mode: &str,
        spread_id: &str,
        seed: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> ReadingResult<Reading> {
        let mode = Mode::parse(mode)?;
        let reading = self.store.create_reading(
            mode,
            spread_id,
            seed,
            metadata.unwrap_or_else(|| serde_json::json!({})),
        )?;
        log::debug!(
            "started {} reading {} (spread {spread_id})",
            mode.as_str(),
            reading.reading_id
        );
        Ok(reading)
    }

    /// Draw cards for a reading, or return the already-drawn spread.
    ///
    /// The reading id doubles as the draw salt, so the same session always
    /// reproduces the same spread from its seed.
    pub fn draw(
        &self,
        reading_id: &str,
        count: usize,
        allow_reversed: bool,
        slots: Option<Vec<String>>,
        force_redraw: bool,
    ) -> ReadingResult<Vec<Position>> {
        let reading = self
            .store
            .get_reading(reading_id)?
            .ok_or_else(|| ReadingError::NotFound(reading_id.to_string()))?;

        if reading.mode != Mode::Digital {
            return Err(ReadingError::InvalidOperation(
                "card drawing is only available for digital readings".to_string(),
            ));
        }

        // Idempotent path: already drawn and no force — hand back the
        // stored spread untouched, whatever this request asked for.
        if !reading.positions.is_empty() && !force_redraw {
            return Ok(reading.positions);
        }

        if count < 1 || count > MAX_DRAW_COUNT {
            return Err(ReadingError::InvalidArgument(format!(
                "count must be between 1 and {MAX_DRAW_COUNT}, got {count}"
            )));
        }

        let drawn = draw(
            self.deck.card_ids(),
            count,
            &reading.seed,
            reading_id,
            allow_reversed,
        )?;

        let labels = match slots {
            Some(s) if s.len() != drawn.len() => {
                return Err(ReadingError::InvalidArgument(format!(
                    "number of slots ({}) must match count ({count})",
                    s.len()
                )));
            }
            Some(s) => s,
            None => (1..=drawn.len()).map(|i| format!("card_{i}")).collect(),
        };

        let positions: Vec<Position> = labels
            .into_iter()
            .zip(drawn)
            .map(|(slot, card)| Position {
                slot,
                card_id: card.card_id,
                reversed: card.reversed,
            })
            .collect();

        // A racing first-draw can still lose here; AlreadyAssigned then
        // surfaces as a hard error rather than clobbering the winner.
        self.store
            .save_positions(reading_id, &positions, force_redraw)?;

        Ok(positions)
    }

    /// Fetch a reading with its positions.
    pub fn get(&self, reading_id: &str) -> ReadingResult<Reading> {
        self.store
            .get_reading(reading_id)?
            .ok_or_else(|| ReadingError::NotFound(reading_id.to_string()))
    }

    /// Delete a reading and its positions. Returns false when missing.
    pub fn delete(&self, reading_id: &str) -> ReadingResult<bool> {
        self.store.delete_reading(reading_id)
    }

    pub fn deck(&self) -> &DeckCatalog {
        &self.deck
    }

    /// Direct store access for tooling and tests.
    pub fn store(&self) -> &ReadingStore {
        &self.store
    }
}
