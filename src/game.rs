//! Game-level state: the current board plus the history that led to it.
//!
//! A `GameState` is one node of the search tree. It holds:
//!   - the current board
//!   - the moves played so far, newest first
//!   - every earlier board, newest first, for cycle detection
//!
//! Both histories are `Chain`s, so a child state costs one link per chain
//! and shares everything older with its parent and siblings.

use crate::board::Board;
use crate::card::Card;
use crate::error::BoardResult;
use crate::history::Chain;
use crate::moves::Move;

#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    moves: Chain<Move>,
    /// Boards before `board`, newest first.
    earlier: Chain<Board>,
}

impl GameState {
    /// Start a game by dealing `deck`. The deal is recorded as the first move.
    pub fn deal(deck: &[Card], num_piles: usize) -> BoardResult<Self> {
        let board = Board::deal(deck, num_piles)?;
        Ok(GameState {
            board,
            moves: Chain::new().push(Move::deal(deck, num_piles)),
            earlier: Chain::new(),
        })
    }

    /// Start from an arbitrary position with no history.
    pub fn from_board(board: Board) -> Self {
        GameState {
            board,
            moves: Chain::new(),
            earlier: Chain::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> &Chain<Move> {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.moves.first()
    }

    /// Number of moves played, counting the deal.
    pub fn depth(&self) -> usize {
        self.moves.len()
    }

    /// True if `board` is the current board or any board before it.
    pub fn has_seen(&self, board: &Board) -> bool {
        self.board == *board || self.earlier.contains(board)
    }

    /// Child state reached by playing `mv`, which produced `board`.
    pub fn child(&self, mv: Move, board: Board) -> GameState {
        GameState {
            board,
            moves: self.moves.push(mv),
            earlier: self.earlier.push(self.board.clone()),
        }
    }

    /// Replace the last move and the current board, keeping the older
    /// history. Used to merge two consecutive moves into one.
    pub fn replace_last(&self, mv: Move, board: Board) -> GameState {
        GameState {
            board,
            moves: self.moves.rest().push(mv),
            earlier: self.earlier.clone(),
        }
    }

    /// Apply `mv` to the current board and return the child state.
    pub fn apply_move(&self, mv: Move) -> BoardResult<GameState> {
        let board = mv.apply(&self.board)?;
        Ok(self.child(mv, board))
    }

    /// Moves played, oldest first.
    pub fn move_list(&self) -> Vec<Move> {
        self.moves.to_vec_oldest_first()
    }

    /// Rebuild the current board by replaying every move from `start`.
    ///
    /// A history that begins with a deal ignores `start`. This is a
    /// consistency check; normal code uses `board()`.
    pub fn replay(&self, start: &Board) -> BoardResult<Board> {
        let mut board = start.clone();
        for mv in self.move_list() {
            board = mv.apply(&board)?;
        }
        Ok(board)
    }
}
