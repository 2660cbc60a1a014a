//! Error types for board transitions, board validation and the search engine.
//!
//! A `BoardError` is a precondition violation at a `Board`/`Pile` operation
//! boundary. The move generator must never produce a move that triggers one,
//! so inside the search they are fatal. A `ValidationError` is an invariant
//! violation found by `BoardValidator` after a move has been applied.

use thiserror::Error;

use crate::card::{Card, Suit};

/// Precondition violations raised by `Pile` and `Board` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("pile index {index} out of range (board has {piles} piles)")]
    PileOutOfRange { index: usize, piles: usize },

    #[error("cannot move a stack from pile {0} onto itself")]
    SamePile(usize),

    #[error("cannot take {requested} cards from a run of {available} face-up cards")]
    StackSize { requested: usize, available: usize },

    #[error("pile {0} has no face-up card")]
    NoFaceUpCard(usize),

    #[error("cannot add an empty list of cards to a pile")]
    NoCardsToAdd,

    #[error("draw advance must be at least 1, got {0}")]
    InvalidAdvance(usize),

    #[error("no draw card is flipped (draw index is 0)")]
    NoDrawCard,

    #[error("draw index {index} outside of draw pile of {len} cards")]
    DrawIndexOutOfRange { index: usize, len: usize },

    #[error("goal stack for {0} is empty")]
    EmptyGoal(Suit),

    #[error("deck of {cards} cards is too small to deal {piles} piles")]
    DeckTooSmall { cards: usize, piles: usize },
}

/// Invariant violations reported by `BoardValidator`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("board must have {expected} piles, instead has {actual}")]
    PileCount { expected: usize, actual: usize },

    #[error("pile {0} has face-down cards but no face-up cards")]
    HiddenTop(usize),

    #[error("pile {pile}: cannot stack {upper} on top of {lower}")]
    BrokenRun { pile: usize, lower: Card, upper: Card },

    #[error("cannot have {card} in goal for {suit}")]
    WrongSuitInGoal { suit: Suit, card: Card },

    #[error("first card in goal for {suit} must be an ace, not {card}")]
    GoalMissingAce { suit: Suit, card: Card },

    #[error("cannot put {upper} on top of {lower} in goal for {suit}")]
    GoalGap { suit: Suit, lower: Card, upper: Card },

    #[error("draw index {index} must not be larger than the draw pile size {len}")]
    DrawIndex { index: usize, len: usize },

    #[error("must have {expected} cards on the board, instead has {actual}")]
    CardCount { expected: usize, actual: usize },
}

/// Failures that abort a search run.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("move `{mv}` could not be applied at depth {depth}: {source}")]
    IllegalMove {
        mv: String,
        depth: usize,
        #[source]
        source: BoardError,
    },

    #[error("move `{mv}` produced an invalid board at depth {depth}: {source}")]
    InvalidBoard {
        mv: String,
        depth: usize,
        #[source]
        source: ValidationError,
    },

    #[error("search needs at least one worker thread")]
    NoWorkers,

    #[error("search worker panicked")]
    WorkerPanicked,
}

pub type BoardResult<T> = Result<T, BoardError>;
