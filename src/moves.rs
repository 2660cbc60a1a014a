//! Move representation for Klondike with a configurable draw advance and
//! unlimited passes through the draw pile.
//!
//! A `Move` is an immutable command: it records what it does (which piles,
//! which cards, where the draw cursor was) and turns one `Board` into the
//! next through `apply`. Moves compare by value; the pruner relies on that
//! to spot the same cards being moved twice in a row.
//!
//! Pile indices are 0-based internally and printed 1-based for humans.

use std::fmt;
use std::sync::Arc;

use crate::board::Board;
use crate::card::Card;
use crate::error::BoardResult;

/// Fieldless discriminant of a `Move`, handy for pruning rules and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Deal,
    AdvanceDraw,
    ResetDraw,
    DrawToPile,
    DrawToGoal,
    PileToGoal,
    GoalToPile,
    StackMove,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Deal `deck` into `num_piles` piles. Always the first move of a game.
    Deal { deck: Arc<[Card]>, num_piles: usize },

    /// Flip `count` more draw cards, starting with the cursor at `from_index`.
    AdvanceDraw { from_index: usize, count: usize },

    /// Turn the draw pile back over; the cursor was at `from_index`.
    ResetDraw { from_index: usize },

    /// Put the active draw card (`draw_pile[from_index - 1]`) on pile `dest`.
    DrawToPile {
        from_index: usize,
        dest: usize,
        card: Card,
    },

    /// Put the active draw card on its goal stack.
    DrawToGoal { from_index: usize, card: Card },

    /// Put the top card of pile `src` on its goal stack.
    PileToGoal { src: usize, card: Card },

    /// Take `card` back off its goal stack onto pile `dest`.
    GoalToPile { dest: usize, card: Card },

    /// Move the face-up run `cards` (bottom to top) from pile `src` to `dest`.
    StackMove {
        src: usize,
        dest: usize,
        cards: Arc<[Card]>,
    },
}

impl Move {
    pub fn deal(deck: &[Card], num_piles: usize) -> Move {
        Move::Deal {
            deck: Arc::from(deck),
            num_piles,
        }
    }

    pub fn stack(src: usize, dest: usize, cards: &[Card]) -> Move {
        Move::StackMove {
            src,
            dest,
            cards: Arc::from(cards),
        }
    }

    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Deal { .. } => MoveKind::Deal,
            Move::AdvanceDraw { .. } => MoveKind::AdvanceDraw,
            Move::ResetDraw { .. } => MoveKind::ResetDraw,
            Move::DrawToPile { .. } => MoveKind::DrawToPile,
            Move::DrawToGoal { .. } => MoveKind::DrawToGoal,
            Move::PileToGoal { .. } => MoveKind::PileToGoal,
            Move::GoalToPile { .. } => MoveKind::GoalToPile,
            Move::StackMove { .. } => MoveKind::StackMove,
        }
    }

    /// Produce the board that results from playing this move on `board`.
    ///
    /// `Deal` ignores its input and lays out a fresh board.
    pub fn apply(&self, board: &Board) -> BoardResult<Board> {
        match self {
            Move::Deal { deck, num_piles } => Board::deal(deck, *num_piles),
            Move::AdvanceDraw { count, .. } => board.advance_draw_index(*count),
            Move::ResetDraw { .. } => Ok(board.reset_draw_index()),
            Move::DrawToPile { dest, .. } => board.draw_card_to_pile(*dest),
            Move::DrawToGoal { .. } => board.draw_card_to_goal(),
            Move::PileToGoal { src, .. } => board.move_card_to_goal(*src),
            Move::GoalToPile { dest, card } => board.move_card_from_goal(card.suit(), *dest),
            Move::StackMove { src, dest, cards } => board.move_stack(*src, *dest, cards.len()),
        }
    }

    /// The cards this move relocates, if it relocates any.
    ///
    /// Draw-cursor moves carry no cards.
    pub fn cards(&self) -> Option<&[Card]> {
        match self {
            Move::Deal { deck, .. } => Some(&deck[..]),
            Move::AdvanceDraw { .. } | Move::ResetDraw { .. } => None,
            Move::DrawToPile { card, .. }
            | Move::DrawToGoal { card, .. }
            | Move::PileToGoal { card, .. }
            | Move::GoalToPile { card, .. } => Some(std::slice::from_ref(card)),
            Move::StackMove { cards, .. } => Some(&cards[..]),
        }
    }

    /// Merge two consecutive draw advances into one.
    ///
    /// `AdvanceDraw(i, a)` followed by `AdvanceDraw(i + a, b)` becomes
    /// `AdvanceDraw(i, a + b)`. Any other pair yields `None`.
    pub fn coalesce(&self, next: &Move) -> Option<Move> {
        match (self, next) {
            (
                Move::AdvanceDraw { from_index, count },
                Move::AdvanceDraw {
                    count: next_count, ..
                },
            ) => Some(Move::AdvanceDraw {
                from_index: *from_index,
                count: count.saturating_add(*next_count),
            }),
            _ => None,
        }
    }
}

fn write_card_list(f: &mut fmt::Formatter<'_>, cards: &[Card]) -> fmt::Result {
    f.write_str("[")?;
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{card}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Deal { num_piles, .. } => write!(f, "Deal {num_piles} piles."),
            Move::AdvanceDraw { count, .. } => write!(f, "Advance draw pile by {count}."),
            Move::ResetDraw { from_index } => {
                write!(f, "Reset draw pile from index {from_index} to the beginning.")
            }
            Move::DrawToPile { dest, card, .. } => {
                write!(f, "Move {card} from draw pile to pile {}.", dest + 1)
            }
            Move::DrawToGoal { card, .. } => write!(f, "Move {card} from draw pile to goal."),
            Move::PileToGoal { src, card } => {
                write!(f, "Move {card} from pile {} to goal.", src + 1)
            }
            Move::GoalToPile { dest, card } => {
                write!(f, "Move {card} from goal to pile {}.", dest + 1)
            }
            Move::StackMove { src, dest, cards } => {
                if let [card] = cards.as_ref() {
                    write!(f, "Move {card} from pile {} to pile {}.", src + 1, dest + 1)
                } else {
                    f.write_str("Move stack ")?;
                    write_card_list(f, cards)?;
                    write!(f, " from pile {} to pile {}.", src + 1, dest + 1)
                }
            }
        }
    }
}
