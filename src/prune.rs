//! Pruning of candidate transitions.
//!
//! Every candidate (move, resulting board) is checked against the history of
//! the state it was generated from, in this order:
//!   1. the board was already seen on this branch: reject (cycle)
//!   2. the previous move and this one move the same cards: reject
//!   3. a tableau-only move right after a draw-cursor move: reject, the same
//!      move was available before the cursor moved
//!   4. two draw advances in a row: merge them into one
//! Anything else is accepted as a new child.
//!
//! Decisions depend only on the state's own history, never on what other
//! branches or threads have done, so the outcome of a search does not depend
//! on scheduling.

use crate::board::Board;
use crate::game::GameState;
use crate::moves::{Move, MoveKind};
use crate::stats::SearchStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    Cycle,
    RepeatedCards,
    AfterDrawMove,
}

#[derive(Debug)]
pub enum PruneOutcome {
    Reject(RejectReason),
    /// The history was rewritten; the new state replaces the parent's last step.
    Rewrite(GameState),
    Accept(GameState),
}

pub struct Pruner<'a> {
    stats: &'a SearchStats,
}

impl<'a> Pruner<'a> {
    pub fn new(stats: &'a SearchStats) -> Self {
        Pruner { stats }
    }

    pub fn prune(&self, parent: &GameState, mv: Move, board: Board) -> PruneOutcome {
        if parent.has_seen(&board) {
            self.stats.record_cycle();
            return PruneOutcome::Reject(RejectReason::Cycle);
        }

        let Some(previous) = parent.last_move() else {
            return PruneOutcome::Accept(parent.child(mv, board));
        };

        if let (Some(before), Some(now)) = (previous.cards(), mv.cards()) {
            if before == now {
                self.stats.record_repeat_prune();
                return PruneOutcome::Reject(RejectReason::RepeatedCards);
            }
        }

        if is_draw_cursor_move(previous.kind()) && is_tableau_only_move(mv.kind()) {
            self.stats.record_post_draw_prune();
            return PruneOutcome::Reject(RejectReason::AfterDrawMove);
        }

        if let Some(merged) = previous.coalesce(&mv) {
            self.stats.record_coalesce();
            return PruneOutcome::Rewrite(parent.replace_last(merged, board));
        }

        PruneOutcome::Accept(parent.child(mv, board))
    }
}

fn is_draw_cursor_move(kind: MoveKind) -> bool {
    matches!(kind, MoveKind::AdvanceDraw | MoveKind::ResetDraw)
}

fn is_tableau_only_move(kind: MoveKind) -> bool {
    matches!(kind, MoveKind::StackMove | MoveKind::PileToGoal)
}
