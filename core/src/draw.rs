//! Card draw algorithm — shuffle-then-take without replacement.
//!
//! RULE: The shuffle is pinned to a decrement-index Fisher–Yates
//! (i from len-1 down to 1, j drawn in [0, i]). The pinned algorithm,
//! its stream-consumption order, and the reversal-bit order below are
//! the compatibility contract: changing any of them changes every draw
//! for every stored seed. NEVER swap in a library shuffle.

use crate::{
    error::{ReadingError, ReadingResult},
    rng::DrawRng,
    types::CardId,
};

/// One drawn card with its orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnCard {
    pub card_id: CardId,
    pub reversed: bool,
}

/// Draw `count` cards from `universe` without replacement.
///
/// Stream consumption order, fixed forever:
///   1. Fisher–Yates shuffle of a copy of `universe` (len-1 bounded draws).
///   2. Take the first `count` cards; shuffle order is draw order.
///   3. If `allow_reversed`, one boolean per drawn card, in draw order.
///      When reversals are off, step 3 consumes nothing.
pub fn draw(
    universe: &[CardId],
    count: usize,
    seed: &str,
    salt: &str,
    allow_reversed: bool,
) -> ReadingResult<Vec<DrawnCard>> {
    if count < 1 || count > universe.len() {
        return Err(ReadingError::InvalidArgument(format!(
            "count must be between 1 and {} (deck size), got {count}",
            universe.len()
        )));
    }

    let mut rng = DrawRng::derive(seed, salt);

    let mut shuffled = universe.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.next_index(i + 1);
        shuffled.swap(i, j);
    }
    shuffled.truncate(count);

    let drawn = shuffled
        .into_iter()
        .map(|card_id| DrawnCard {
            card_id,
            reversed: allow_reversed && rng.next_bool(),
        })
        .collect();

    Ok(drawn)
}
