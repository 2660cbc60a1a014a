//! Legal move generation.
//!
//! `MoveGenerator::find_all_moves` lists every move the search should try
//! from a board, in a fixed order:
//!   - the active draw card to its goal stack, then onto piles
//!   - for each pile with a face-up run: its top card to the goal, goal
//!     cards back onto it, then (part of) its run onto every other pile
//!   - one draw-cursor move: advance if cards remain, otherwise reset
//!
//! In search mode (`return_redundant_moves == false`) moves that lead to
//! positions equivalent to other generated moves, or that only shuffle low
//! cards around once the goal has caught up with them, are left out.

use crate::board::Board;
use crate::card::{Card, Rank, Suit};
use crate::moves::Move;
use crate::pile::Pile;

/// True if `card` may be placed on `pile`: a King on an empty pile, or one
/// rank below and opposite in color to the pile's top card.
pub fn can_add_to_pile(card: Card, pile: &Pile) -> bool {
    match pile.top_card() {
        None => card.rank() == Rank::King,
        Some(top) => card.stacks_on(top),
    }
}

/// True if `card` is the next card its goal stack needs.
pub fn can_add_to_goal(card: Card, board: &Board) -> bool {
    match board.goal_top(card.suit()) {
        None => card.rank() == Rank::Ace,
        Some(top) => card.rank_number() == top.rank_number() + 1,
    }
}

/// True if the top of `suit`'s goal stack may be taken back onto `card`.
pub fn can_take_from_goal(suit: Suit, board: &Board, card: Card) -> bool {
    if card.color() == suit.color() {
        return false;
    }
    match board.goal_top(suit) {
        None => false,
        Some(top) => top.rank_number() + 1 == card.rank_number(),
    }
}

pub fn is_win(board: &Board) -> bool {
    board.is_win()
}

#[derive(Clone, Copy, Debug)]
pub struct MoveGenerator {
    /// How many draw cards an `AdvanceDraw` flips.
    pub draw_advance: usize,
    /// List every physically legal move, including equivalent ones.
    pub return_redundant_moves: bool,
}

impl MoveGenerator {
    pub fn new(draw_advance: usize, return_redundant_moves: bool) -> Self {
        MoveGenerator {
            draw_advance,
            return_redundant_moves,
        }
    }

    /// All moves to try from `board`, in generation order.
    pub fn find_all_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        let redundant = self.return_redundant_moves;

        // Cards at or below this rank are better left for the goal.
        let keep_off_table = board.max_goal_len() + 2;

        // ----- Draw pile -----
        if let Some(card) = board.draw_card() {
            let from_index = board.draw_index();
            if can_add_to_goal(card, board) {
                moves.push(Move::DrawToGoal { from_index, card });
            }
            if redundant || usize::from(card.rank_number()) > keep_off_table {
                let is_king = card.rank() == Rank::King;
                for (dest, pile) in board.piles().iter().enumerate() {
                    if can_add_to_pile(card, pile) {
                        moves.push(Move::DrawToPile {
                            from_index,
                            dest,
                            card,
                        });
                        // Any empty pile is as good as another for a King.
                        if is_king && !redundant {
                            break;
                        }
                    }
                }
            }
        }

        // ----- Tableau -----
        let piles = board.piles();
        for (src, source) in piles.iter().enumerate() {
            let run = source.face_up();
            let (Some(&bottom), Some(&top)) = (run.first(), run.last()) else {
                continue;
            };

            if can_add_to_goal(top, board) {
                moves.push(Move::PileToGoal { src, card: top });
            }
            for suit in Suit::ALL {
                if can_take_from_goal(suit, board, top) {
                    if let Some(card) = board.goal_top(suit) {
                        moves.push(Move::GoalToPile { dest: src, card });
                    }
                }
            }

            let min = usize::from(top.rank_number());
            let max = usize::from(bottom.rank_number());
            if min <= keep_off_table && !redundant {
                continue;
            }

            for (dest, target) in piles.iter().enumerate() {
                if dest == src {
                    continue;
                }
                match target.top_card() {
                    None => {
                        // Moving a whole pile to another empty pile changes nothing.
                        if !source.has_face_down_cards() && !redundant {
                            continue;
                        }
                        if bottom.rank() == Rank::King {
                            moves.push(Move::stack(src, dest, run));
                        }
                    }
                    Some(dest_top) => {
                        let wanted = usize::from(dest_top.rank_number()) - 1;
                        if min <= wanted && wanted <= max {
                            let count = wanted - min + 1;
                            // Only a broken hand-built run can be shorter than its rank span.
                            let Some(start) = run.len().checked_sub(count) else {
                                continue;
                            };
                            let stack = &run[start..];
                            if stack[0].color() != dest_top.color() {
                                moves.push(Move::stack(src, dest, stack));
                            }
                        }
                    }
                }
            }
        }

        // ----- Draw cursor -----
        if board.can_flip_more_draw_cards() {
            moves.push(Move::AdvanceDraw {
                from_index: board.draw_index(),
                count: self.draw_advance,
            });
        } else if board.can_reset_draw_pile() {
            moves.push(Move::ResetDraw {
                from_index: board.draw_index(),
            });
        }

        moves
    }
}
