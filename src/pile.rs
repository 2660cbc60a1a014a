//! A single tableau column: a face-down run under a face-up run.
//!
//! Piles are immutable. Every operation returns a new `Pile` and leaves the
//! receiver untouched; the face-down run is reference counted and handed to
//! the new pile unchanged whenever the operation does not flip a card, so a
//! pile and its successors share their hidden cards.

use std::sync::Arc;

use crate::card::Card;
use crate::error::{BoardError, BoardResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pile {
    /// Hidden cards, bottom to top.
    face_down: Arc<[Card]>,
    /// Visible run, bottom to top. The last card is the playable one.
    face_up: Arc<[Card]>,
}

fn empty_run() -> Arc<[Card]> {
    Arc::from(Vec::new())
}

impl Default for Pile {
    fn default() -> Self {
        Pile::empty()
    }
}

impl Pile {
    /// A pile with no cards at all.
    pub fn empty() -> Self {
        Pile {
            face_down: empty_run(),
            face_up: empty_run(),
        }
    }

    /// Build a pile from its two runs.
    ///
    /// If `face_up` is empty and `face_down` is not, the top face-down card
    /// is flipped: a pile never holds more hidden cards than necessary.
    pub fn new(face_down: impl Into<Arc<[Card]>>, face_up: impl Into<Arc<[Card]>>) -> Self {
        let face_down = face_down.into();
        let face_up = face_up.into();
        if face_up.is_empty() {
            if let Some((&top, rest)) = face_down.split_last() {
                return Pile {
                    face_down: Arc::from(rest),
                    face_up: Arc::from([top].as_slice()),
                };
            }
        }
        Pile { face_down, face_up }
    }

    /// Build a pile that shares `face_down` with an existing pile.
    fn with_face_up(&self, face_up: Vec<Card>) -> Self {
        if face_up.is_empty() {
            Pile::new(Arc::clone(&self.face_down), face_up)
        } else {
            Pile {
                face_down: Arc::clone(&self.face_down),
                face_up: Arc::from(face_up),
            }
        }
    }

    pub fn face_down(&self) -> &[Card] {
        &self.face_down
    }

    pub fn face_up(&self) -> &[Card] {
        &self.face_up
    }

    pub fn has_face_down_cards(&self) -> bool {
        !self.face_down.is_empty()
    }

    pub fn has_face_up_cards(&self) -> bool {
        !self.face_up.is_empty()
    }

    pub fn face_down_count(&self) -> usize {
        self.face_down.len()
    }

    pub fn face_up_count(&self) -> usize {
        self.face_up.len()
    }

    /// Total number of cards in the pile.
    pub fn len(&self) -> usize {
        self.face_down.len() + self.face_up.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The playable card, if any.
    pub fn top_card(&self) -> Option<Card> {
        self.face_up.last().copied()
    }

    fn check_count(&self, count: usize) -> BoardResult<()> {
        if count < 1 || count > self.face_up.len() {
            return Err(BoardError::StackSize {
                requested: count,
                available: self.face_up.len(),
            });
        }
        Ok(())
    }

    /// The top `count` face-up cards, bottom to top.
    pub fn top_cards(&self, count: usize) -> BoardResult<&[Card]> {
        self.check_count(count)?;
        Ok(&self.face_up[self.face_up.len() - count..])
    }

    /// This pile with its top `count` face-up cards removed.
    pub fn without_top_cards(&self, count: usize) -> BoardResult<Pile> {
        self.check_count(count)?;
        let keep = self.face_up.len() - count;
        Ok(self.with_face_up(self.face_up[..keep].to_vec()))
    }

    /// This pile with `cards` appended, in order, to the face-up run.
    pub fn with_cards(&self, cards: &[Card]) -> BoardResult<Pile> {
        if cards.is_empty() {
            return Err(BoardError::NoCardsToAdd);
        }
        let mut face_up = Vec::with_capacity(self.face_up.len() + cards.len());
        face_up.extend_from_slice(&self.face_up);
        face_up.extend_from_slice(cards);
        Ok(self.with_face_up(face_up))
    }

    /// This pile with a single card appended to the face-up run.
    pub fn with_card(&self, card: Card) -> Pile {
        let mut face_up = Vec::with_capacity(self.face_up.len() + 1);
        face_up.extend_from_slice(&self.face_up);
        face_up.push(card);
        self.with_face_up(face_up)
    }
}
