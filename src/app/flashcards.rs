//! Two-sided study cards.
//!
//! The page walks the deck with a cursor. Moving on always shows the front of
//! the next card and wraps from the last card to the first.

use crate::app::pages::{Page, PageId, Refresh};
use crate::app::{check_index, required};
use crate::domain::error::Result;
use crate::storage::{Flashcard, Store};

/// Appends a card and returns its index.
///
/// # Errors
///
/// Returns [`crate::StudyError::EmptyInput`] unless both sides have text.
pub fn add_card(store: &Store, front: &str, back: &str) -> Result<usize> {
    let front = required(front, "front")?;
    let back = required(back, "back")?;
    store.update(|cards: &mut Vec<Flashcard>| {
        cards.push(Flashcard::new(front, back));
        Ok(cards.len() - 1)
    })
}

/// # Errors
///
/// Returns [`crate::StudyError::IndexOutOfRange`] for an unknown index.
pub fn delete_card(store: &Store, index: usize) -> Result<Flashcard> {
    store.update(|cards: &mut Vec<Flashcard>| {
        check_index("card", index, cards.len())?;
        Ok(cards.remove(index))
    })
}

/// # Errors
///
/// Returns [`crate::StudyError::IndexOutOfRange`] for an unknown index.
pub fn mark_known(store: &Store, index: usize) -> Result<()> {
    store.update(|cards: &mut Vec<Flashcard>| {
        check_index("card", index, cards.len())?;
        cards[index].known = true;
        Ok(())
    })
}

/// The flashcards page.
#[derive(Debug, Clone, Default)]
pub struct FlashcardsPage {
    cards: Vec<Flashcard>,
    index: usize,
    showing_back: bool,
}

impl FlashcardsPage {
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded.
    pub fn load(store: &Store) -> Result<Self> {
        let mut page = Self::default();
        page.refresh(store)?;
        Ok(page)
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    /// Text of the side currently shown.
    #[must_use]
    pub fn visible_text(&self) -> Option<&str> {
        self.current().map(|card| {
            if self.showing_back {
                card.back.as_str()
            } else {
                card.front.as_str()
            }
        })
    }

    #[must_use]
    pub fn showing_back(&self) -> bool {
        self.showing_back
    }

    /// `"Card 2 / 5"`, or empty when the deck is empty.
    #[must_use]
    pub fn counter(&self) -> String {
        if self.cards.is_empty() {
            return String::new();
        }
        format!("Card {} / {}", self.index + 1, self.cards.len())
    }

    pub fn flip(&mut self) {
        if !self.cards.is_empty() {
            self.showing_back = !self.showing_back;
        }
    }

    /// Moves to the next card, wrapping to the first.
    pub fn next_card(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cards.len();
        self.showing_back = false;
    }

    /// Marks the current card as known, then moves on.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be saved.
    pub fn mark_current_known(&mut self, store: &Store) -> Result<()> {
        if self.cards.is_empty() {
            return Ok(());
        }
        mark_known(store, self.index)?;
        self.refresh(store)?;
        self.next_card();
        Ok(())
    }

    /// Deletes the current card. The cursor stays in place, or wraps to the
    /// first card when the last one was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be saved.
    pub fn delete_current(&mut self, store: &Store) -> Result<Option<Flashcard>> {
        if self.cards.is_empty() {
            return Ok(None);
        }
        let removed = delete_card(store, self.index)?;
        self.refresh(store)?;
        Ok(Some(removed))
    }
}

impl Refresh for FlashcardsPage {
    fn refresh(&mut self, store: &Store) -> Result<()> {
        self.cards = store.load_flashcards()?;
        if self.cards.is_empty() {
            self.index = 0;
        } else {
            self.index %= self.cards.len();
        }
        self.showing_back = false;
        Ok(())
    }
}

impl Page for FlashcardsPage {
    fn id(&self) -> PageId {
        PageId::Flashcards
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refresh> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing;
    use crate::StudyError;

    #[test]
    fn both_sides_are_required() {
        let (_dir, store) = testing::store();
        assert!(matches!(add_card(&store, "Q", " "), Err(StudyError::EmptyInput("back"))));
        assert!(matches!(add_card(&store, "", "A"), Err(StudyError::EmptyInput("front"))));
        assert!(store.load_flashcards().unwrap().is_empty());
    }

    #[test]
    fn walking_the_deck() {
        let (_dir, store) = testing::store();
        add_card(&store, "2 + 2", "4").unwrap();
        add_card(&store, "H2O", "water").unwrap();

        let mut page = FlashcardsPage::load(&store).unwrap();
        assert_eq!(page.counter(), "Card 1 / 2");
        assert_eq!(page.visible_text(), Some("2 + 2"));

        page.flip();
        assert_eq!(page.visible_text(), Some("4"));

        page.next_card();
        assert_eq!(page.counter(), "Card 2 / 2");
        assert_eq!(page.visible_text(), Some("H2O"));

        page.next_card();
        assert_eq!(page.counter(), "Card 1 / 2");
    }

    #[test]
    fn mark_known_then_advance() {
        let (_dir, store) = testing::store();
        add_card(&store, "a", "1").unwrap();
        add_card(&store, "b", "2").unwrap();

        let mut page = FlashcardsPage::load(&store).unwrap();
        page.mark_current_known(&store).unwrap();
        assert_eq!(page.counter(), "Card 2 / 2");
        assert!(store.load_flashcards().unwrap()[0].known);
        assert!(!store.load_flashcards().unwrap()[1].known);
    }

    #[test]
    fn delete_current_clamps_cursor() {
        let (_dir, store) = testing::store();
        add_card(&store, "a", "1").unwrap();
        add_card(&store, "b", "2").unwrap();

        let mut page = FlashcardsPage::load(&store).unwrap();
        page.next_card();
        assert_eq!(page.delete_current(&store).unwrap().unwrap().front, "b");
        assert_eq!(page.counter(), "Card 1 / 1");

        page.delete_current(&store).unwrap();
        assert_eq!(page.counter(), "");
        assert!(page.current().is_none());
        assert!(page.delete_current(&store).unwrap().is_none());
    }
}
