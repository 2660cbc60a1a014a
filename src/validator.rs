//! Rule checks for a `Board`.
//!
//! These are the invariants every reachable board should satisfy. Checking
//! them costs a full walk of the board, so the search only does it when
//! asked to (tests and `--validate` runs).

use crate::board::Board;
use crate::card::{Card, Rank, Suit};
use crate::error::ValidationError;
use crate::pile::Pile;

pub type ValidationResult = Result<(), ValidationError>;

/// Checks boards against a fixed table size and deck size.
#[derive(Clone, Copy, Debug)]
pub struct BoardValidator {
    pub num_piles: usize,
    pub deck_size: usize,
}

impl BoardValidator {
    pub fn new(num_piles: usize, deck_size: usize) -> Self {
        BoardValidator {
            num_piles,
            deck_size,
        }
    }

    /// Check the whole board: shape, every pile, every goal stack, and that
    /// no card has been lost or invented.
    pub fn validate(&self, board: &Board) -> ValidationResult {
        if board.num_piles() != self.num_piles {
            return Err(ValidationError::PileCount {
                expected: self.num_piles,
                actual: board.num_piles(),
            });
        }

        for (index, pile) in board.piles().iter().enumerate() {
            validate_pile(index, pile)?;
        }

        if board.draw_index() > board.draw_pile().len() {
            return Err(ValidationError::DrawIndex {
                index: board.draw_index(),
                len: board.draw_pile().len(),
            });
        }

        for suit in Suit::ALL {
            validate_goal(suit, board.goal(suit))?;
        }

        let actual = board.card_count();
        if actual != self.deck_size {
            return Err(ValidationError::CardCount {
                expected: self.deck_size,
                actual,
            });
        }
        Ok(())
    }
}

/// A pile with hidden cards must show at least one card, and its face-up
/// run must descend one rank at a time in alternating colors.
pub fn validate_pile(index: usize, pile: &Pile) -> ValidationResult {
    if pile.has_face_down_cards() && !pile.has_face_up_cards() {
        return Err(ValidationError::HiddenTop(index));
    }
    for pair in pile.face_up().windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if !upper.stacks_on(lower) {
            return Err(ValidationError::BrokenRun {
                pile: index,
                lower,
                upper,
            });
        }
    }
    Ok(())
}

/// A goal stack holds a single suit, starting at the Ace, with no gaps.
pub fn validate_goal(suit: Suit, stack: &[Card]) -> ValidationResult {
    if let Some(&card) = stack.iter().find(|card| card.suit() != suit) {
        return Err(ValidationError::WrongSuitInGoal { suit, card });
    }
    if let Some(&first) = stack.first() {
        if first.rank() != Rank::Ace {
            return Err(ValidationError::GoalMissingAce { suit, card: first });
        }
    }
    for pair in stack.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if upper.rank_number() != lower.rank_number() + 1 {
            return Err(ValidationError::GoalGap { suit, lower, upper });
        }
    }
    Ok(())
}
