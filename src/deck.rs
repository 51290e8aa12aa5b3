//! Position bookkeeping for browsing flashcards one at a time.
//!
//! The deck wraps in both directions and always keeps its index inside the
//! current number of cards, so a stale index from a client is simply clamped.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckCursor {
    index: usize,
    len: usize,
}

impl DeckCursor {
    /// A cursor at `index`, clamped to the last card (0 for an empty deck).
    pub fn at(index: usize, len: usize) -> Self {
        let index = if len == 0 { 0 } else { index.min(len - 1) };
        Self { index, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves forward, looping from the last card back to the first.
    pub fn next(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + 1) % self.len,
            ..self
        }
    }

    /// Moves back, looping from the first card to the last.
    pub fn previous(self) -> Self {
        if self.len == 0 {
            return self;
        }
        let index = if self.index == 0 { self.len - 1 } else { self.index - 1 };
        Self { index, ..self }
    }

    /// The cursor after the current card was removed from the deck.
    pub fn after_removal(self) -> Self {
        Self::at(self.index, self.len.saturating_sub(1))
    }

    /// Percentage of the deck seen so far, counting the current card.
    pub fn progress(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        (self.index + 1) as f64 / self.len as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_previous_wrap() {
        let cursor = DeckCursor::at(2, 3);
        assert_eq!(cursor.next().index(), 0);
        assert_eq!(cursor.next().previous().index(), 2);
        assert_eq!(DeckCursor::at(0, 3).previous().index(), 2);
        assert_eq!(DeckCursor::at(1, 3).next().index(), 2);
    }

    #[test]
    fn test_stale_index_is_clamped() {
        assert_eq!(DeckCursor::at(10, 4).index(), 3);
        assert_eq!(DeckCursor::at(5, 0).index(), 0);
    }

    #[test]
    fn test_empty_deck_stays_put() {
        let cursor = DeckCursor::at(0, 0);
        assert!(cursor.is_empty());
        assert_eq!(cursor.next(), cursor);
        assert_eq!(cursor.previous(), cursor);
        assert_eq!(cursor.progress(), 0.0);
    }

    #[test]
    fn test_after_removal() {
        // Removing the last card moves to the new last card.
        let cursor = DeckCursor::at(2, 3).after_removal();
        assert_eq!((cursor.index(), cursor.len()), (1, 2));

        // Removing a middle card keeps the index, now pointing at the following card.
        let cursor = DeckCursor::at(1, 3).after_removal();
        assert_eq!((cursor.index(), cursor.len()), (1, 2));

        // Removing the only card empties the deck.
        let cursor = DeckCursor::at(0, 1).after_removal();
        assert_eq!((cursor.index(), cursor.len()), (0, 0));
    }

    #[test]
    fn test_progress() {
        let cursor = DeckCursor::at(1, 4);
        assert_eq!(cursor.progress(), 50.0);
        assert_eq!(DeckCursor::at(0, 4).progress(), 25.0);
        assert_eq!(DeckCursor::at(3, 4).progress(), 100.0);
    }
}
