//! Concurrent depth-first search over the Klondike game tree.
//!
//! A fixed pool of worker threads shares one LIFO frontier of `GameState`s.
//! Each worker repeatedly:
//!   - pops the newest node (the root is seeded before workers start)
//!   - generates its moves, applies them, and runs each result through the
//!     `Pruner`
//!   - records winning children as solutions and pushes the rest back
//!
//! Termination uses an active-worker count kept under the frontier lock:
//! the search is exhausted only when the frontier is empty *and* no worker
//! is in the middle of an expansion (which could still push more work).
//! Idle workers block on a condition variable instead of polling.
//!
//! Cancellation is coarse. `stop()`, the node limit and the solution limit
//! all set a flag that workers check between expansions.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, trace, warn};

use crate::board::Board;
use crate::error::SearchError;
use crate::game::GameState;
use crate::movegen::MoveGenerator;
use crate::moves::Move;
use crate::prune::{PruneOutcome, Pruner};
use crate::stats::{SearchStats, StatsSnapshot};
use crate::validator::BoardValidator;

/// How long an idle worker sleeps before re-checking the stop flag.
const IDLE_WAIT: Duration = Duration::from_millis(50);

/// External caps on a search run. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop once this many nodes have been expanded.
    pub max_nodes: Option<u64>,
    /// Never create a node with more than this many moves of history.
    pub max_depth: Option<usize>,
    /// Stop once this many distinct solutions have been found.
    pub max_solutions: Option<usize>,
}

/// Why a search run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every reachable node was expanded.
    Exhausted,
    /// `Searcher::stop` was called.
    Stopped,
    /// `SearchLimits::max_nodes` was reached.
    NodeLimit,
    /// `SearchLimits::max_solutions` was reached.
    SolutionLimit,
}

/// A winning line: every move from the start, and the final board.
///
/// Solutions are identified by their move sequence alone.
#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub board: Board,
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.moves == other.moves
    }
}

impl Eq for Solution {}

impl Hash for Solution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.moves.hash(state);
    }
}

impl Solution {
    fn descriptions(&self) -> Vec<String> {
        self.moves.iter().map(Move::to_string).collect()
    }

    /// Shorter lines first, then by move text, so output is stable.
    fn display_order(&self, other: &Self) -> CmpOrdering {
        self.moves
            .len()
            .cmp(&other.moves.len())
            .then_with(|| self.descriptions().cmp(&other.descriptions()))
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    /// Distinct solutions, shortest first.
    pub solutions: Vec<Solution>,
    pub stats: StatsSnapshot,
    pub termination: Termination,
}

impl SearchOutcome {
    pub fn is_win(&self) -> bool {
        !self.solutions.is_empty()
    }
}

struct Frontier {
    nodes: Vec<GameState>,
    /// Workers currently expanding a node they popped.
    active: usize,
    /// Set once the frontier is empty with no active workers.
    exhausted: bool,
    /// Set once every worker has returned.
    finished: bool,
}

pub struct Searcher {
    root: GameState,
    generator: MoveGenerator,
    validator: Option<BoardValidator>,
    limits: SearchLimits,
    progress_interval: Option<Duration>,

    stats: SearchStats,
    stop: AtomicBool,
    stop_reason: Mutex<Option<Termination>>,
    first_error: Mutex<Option<SearchError>>,
    frontier: Mutex<Frontier>,
    work: Condvar,
    solutions: Mutex<HashSet<Solution>>,
}

impl Searcher {
    pub fn new(root: GameState, generator: MoveGenerator) -> Self {
        Searcher {
            root,
            generator,
            validator: None,
            limits: SearchLimits::default(),
            progress_interval: None,
            stats: SearchStats::new(),
            stop: AtomicBool::new(false),
            stop_reason: Mutex::new(None),
            first_error: Mutex::new(None),
            frontier: Mutex::new(Frontier {
                nodes: Vec::new(),
                active: 0,
                exhausted: false,
                finished: false,
            }),
            work: Condvar::new(),
            solutions: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check every generated board against `validator`. Slow; meant for tests.
    pub fn with_validator(mut self, validator: BoardValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Log a statistics line at `info` level every `interval`.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Ask all workers to finish their current expansion and exit.
    pub fn stop(&self) {
        self.request_stop(Termination::Stopped);
    }

    fn request_stop(&self, reason: Termination) {
        {
            let mut slot = self.stop_reason.lock();
            if slot.is_none() {
                *slot = Some(reason);
            }
        }
        self.stop.store(true, Ordering::SeqCst);
        self.work.notify_all();
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Run the search on `threads` worker threads and wait for it to end.
    ///
    /// The first move that fails to apply, or (with a validator) produces an
    /// invalid board, stops every worker and is returned as the error.
    pub fn run(&self, threads: usize) -> Result<SearchOutcome, SearchError> {
        if threads == 0 {
            return Err(SearchError::NoWorkers);
        }

        info!(
            "[SEARCH] Starting search with {} thread(s), limits {:?}",
            threads, self.limits
        );
        let started = Instant::now();

        if self.root.board().is_win() {
            self.record_solution(&self.root);
        } else {
            let mut frontier = self.frontier.lock();
            frontier.nodes.push(self.root.clone());
            self.stats.set_pending(frontier.nodes.len());
        }

        let panicked = std::thread::scope(|s| {
            let reporter = self
                .progress_interval
                .map(|interval| s.spawn(move || self.report_progress(interval)));

            let workers: Vec<_> = (0..threads)
                .map(|id| s.spawn(move || self.worker(id)))
                .collect();

            let mut panicked = false;
            for handle in workers {
                panicked |= handle.join().is_err();
            }

            self.frontier.lock().finished = true;
            self.work.notify_all();
            if let Some(handle) = reporter {
                panicked |= handle.join().is_err();
            }
            panicked
        });

        if let Some(error) = self.first_error.lock().take() {
            warn!("[SEARCH] Search aborted: {}", error);
            return Err(error);
        }
        if panicked {
            return Err(SearchError::WorkerPanicked);
        }

        let termination = (*self.stop_reason.lock()).unwrap_or(Termination::Exhausted);
        let mut solutions: Vec<Solution> = self.solutions.lock().iter().cloned().collect();
        solutions.sort_by(Solution::display_order);
        let stats = self.stats.snapshot();

        info!(
            "[SEARCH] Finished ({:?}) in {:.2?}: {}",
            termination,
            started.elapsed(),
            stats
        );
        Ok(SearchOutcome {
            solutions,
            stats,
            termination,
        })
    }

    fn worker(&self, id: usize) {
        debug!("[SEARCH] Worker {} started", id);
        let mut expanded = 0u64;
        while let Some(node) = self.pop() {
            match self.expand(&node) {
                Ok(children) => self.finish(children),
                Err(error) => {
                    self.finish(Vec::new());
                    let mut slot = self.first_error.lock();
                    if slot.is_none() {
                        *slot = Some(error);
                    }
                    drop(slot);
                    self.request_stop(Termination::Stopped);
                    break;
                }
            }
            expanded += 1;
        }
        debug!("[SEARCH] Worker {} exiting after {} expansions", id, expanded);
    }

    /// Take the newest node, blocking while other workers may still add work.
    fn pop(&self) -> Option<GameState> {
        let mut frontier = self.frontier.lock();
        loop {
            if self.stopped() || frontier.exhausted {
                return None;
            }
            if let Some(node) = frontier.nodes.pop() {
                frontier.active += 1;
                self.stats.set_pending(frontier.nodes.len());
                return Some(node);
            }
            if frontier.active == 0 {
                frontier.exhausted = true;
                self.work.notify_all();
                return None;
            }
            self.work.wait_for(&mut frontier, IDLE_WAIT);
        }
    }

    /// Hand back the children of a popped node.
    fn finish(&self, children: Vec<GameState>) {
        let mut frontier = self.frontier.lock();
        // Reversed so that the first generated move is explored first.
        frontier.nodes.extend(children.into_iter().rev());
        frontier.active -= 1;
        self.stats.set_pending(frontier.nodes.len());
        drop(frontier);
        self.work.notify_all();
    }

    fn expand(&self, node: &GameState) -> Result<Vec<GameState>, SearchError> {
        let searched = self.stats.record_node();
        if let Some(max) = self.limits.max_nodes {
            if searched >= max {
                self.request_stop(Termination::NodeLimit);
            }
        }
        if let Some(max) = self.limits.max_depth {
            if node.depth() >= max {
                return Ok(Vec::new());
            }
        }

        let board = node.board();
        let pruner = Pruner::new(&self.stats);
        let mut children = Vec::new();

        for mv in self.generator.find_all_moves(board) {
            let next = mv.apply(board).map_err(|source| SearchError::IllegalMove {
                mv: mv.to_string(),
                depth: node.depth(),
                source,
            })?;
            if let Some(validator) = &self.validator {
                validator
                    .validate(&next)
                    .map_err(|source| SearchError::InvalidBoard {
                        mv: mv.to_string(),
                        depth: node.depth(),
                        source,
                    })?;
            }

            let child = match pruner.prune(node, mv, next) {
                PruneOutcome::Reject(reason) => {
                    trace!("[SEARCH] Rejected at depth {}: {:?}", node.depth(), reason);
                    continue;
                }
                PruneOutcome::Rewrite(child) | PruneOutcome::Accept(child) => child,
            };

            if child.board().is_win() {
                self.record_solution(&child);
                continue;
            }
            children.push(child);
        }
        Ok(children)
    }

    fn record_solution(&self, state: &GameState) {
        let solution = Solution {
            moves: state.move_list(),
            board: state.board().clone(),
        };
        let depth = solution.moves.len();
        self.stats.record_win_depth(depth);

        let found = {
            let mut solutions = self.solutions.lock();
            if !solutions.insert(solution) {
                return;
            }
            solutions.len()
        };
        self.stats.record_solution();
        info!("[SEARCH] Solution {} found with {} moves", found, depth);

        if let Some(max) = self.limits.max_solutions {
            if found >= max {
                self.request_stop(Termination::SolutionLimit);
            }
        }
    }

    fn report_progress(&self, interval: Duration) {
        loop {
            let deadline = Instant::now() + interval;
            {
                let mut frontier = self.frontier.lock();
                while !frontier.finished {
                    if self.work.wait_until(&mut frontier, deadline).timed_out() {
                        break;
                    }
                }
                if frontier.finished {
                    return;
                }
            }
            info!("[PROGRESS] {}", self.stats.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit, standard_deck};
    use crate::pile::Pile;

    fn suit_run(suit: Suit, len: usize) -> Vec<Card> {
        Rank::ALL[..len].iter().map(|&rank| Card::new(suit, rank)).collect()
    }

    /// K♠ on the table, K♥ in the draw pile, everything else on the goal.
    fn two_kings_left() -> Board {
        let mut piles = vec![Pile::empty(); 7];
        piles[6] = Pile::new(Vec::<Card>::new(), vec![Card::new(Suit::Spades, Rank::King)]);
        let goal = [
            suit_run(Suit::Hearts, 12),
            suit_run(Suit::Clubs, 13),
            suit_run(Suit::Spades, 12),
            suit_run(Suit::Diamonds, 13),
        ];
        Board::new(piles, vec![Card::new(Suit::Hearts, Rank::King)], 0, goal).unwrap()
    }

    fn searcher(board: Board) -> Searcher {
        Searcher::new(GameState::from_board(board), MoveGenerator::new(3, false))
            .with_validator(BoardValidator::new(7, 52))
    }

    #[test]
    fn small_endgame_is_searched_to_exhaustion() {
        let outcome = searcher(two_kings_left()).run(1).unwrap();

        assert_eq!(outcome.termination, Termination::Exhausted);
        assert_eq!(outcome.solutions.len(), 2);
        assert!(outcome.solutions.iter().all(|s| s.board.is_win()));
        assert_eq!(outcome.stats.nodes_searched, 9);
        assert_eq!(outcome.stats.cycles_detected, 7);
        assert_eq!(outcome.stats.post_draw_pruned, 2);
        assert_eq!(outcome.stats.repeated_cards_pruned, 0);
        assert_eq!(outcome.stats.draw_advances_coalesced, 0);
        assert_eq!(outcome.stats.pending, 0);
    }

    #[test]
    fn shortest_solution_comes_first() {
        let outcome = searcher(two_kings_left()).run(2).unwrap();
        let lengths: Vec<usize> = outcome.solutions.iter().map(|s| s.moves.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort();
        assert_eq!(lengths, sorted);
        assert_eq!(outcome.stats.max_depth, *lengths.last().unwrap());
    }

    #[test]
    fn zero_threads_is_an_error() {
        assert!(matches!(
            searcher(two_kings_left()).run(0),
            Err(SearchError::NoWorkers)
        ));
    }

    #[test]
    fn solution_limit_stops_early() {
        let outcome = searcher(two_kings_left())
            .with_limits(SearchLimits {
                max_solutions: Some(1),
                ..SearchLimits::default()
            })
            .run(1)
            .unwrap();
        assert_eq!(outcome.termination, Termination::SolutionLimit);
        assert_eq!(outcome.solutions.len(), 1);
    }

    #[test]
    fn node_limit_stops_early() {
        let deck = standard_deck();
        let root = GameState::deal(&deck, 7).unwrap();
        let outcome = Searcher::new(root, MoveGenerator::new(3, false))
            .with_limits(SearchLimits {
                max_nodes: Some(25),
                ..SearchLimits::default()
            })
            .run(1)
            .unwrap();
        assert_eq!(outcome.termination, Termination::NodeLimit);
        assert_eq!(outcome.stats.nodes_searched, 25);
    }

    #[test]
    fn depth_limit_bounds_the_tree() {
        let deck = standard_deck();
        let root = GameState::deal(&deck, 7).unwrap();
        let outcome = Searcher::new(root, MoveGenerator::new(3, false))
            .with_limits(SearchLimits {
                max_depth: Some(4),
                ..SearchLimits::default()
            })
            .run(2)
            .unwrap();
        assert_eq!(outcome.termination, Termination::Exhausted);
        assert!(outcome.solutions.is_empty());
        assert!(outcome.stats.nodes_searched > 1);
    }

    #[test]
    fn stop_before_run_ends_immediately() {
        let deck = standard_deck();
        let root = GameState::deal(&deck, 7).unwrap();
        let search = Searcher::new(root, MoveGenerator::new(3, false));
        search.stop();
        let outcome = search.run(4).unwrap();
        assert_eq!(outcome.termination, Termination::Stopped);
        assert_eq!(outcome.stats.nodes_searched, 0);
    }

    #[test]
    fn won_root_is_its_own_solution() {
        let deck = standard_deck();
        let goal: [Vec<Card>; 4] =
            std::array::from_fn(|s| deck[s * 13..(s + 1) * 13].to_vec());
        let board = Board::new(vec![Pile::empty(); 7], Vec::new(), 0, goal).unwrap();

        let outcome = searcher(board).run(1).unwrap();
        assert_eq!(outcome.solutions.len(), 1);
        assert!(outcome.solutions[0].moves.is_empty());
        assert_eq!(outcome.stats.nodes_searched, 0);
    }

    #[test]
    fn invalid_board_aborts_the_search() {
        // Pile 0 holds a broken run, so every board reached from here fails
        // validation.
        let broken = [Card::new(Suit::Clubs, Rank::Four), Card::new(Suit::Clubs, Rank::Nine)];
        let piles = vec![
            Pile::new(Vec::<Card>::new(), broken.to_vec()),
            Pile::empty(),
        ];
        let mut rest = standard_deck();
        rest.retain(|c| !broken.contains(c));
        let board = Board::new(piles, rest, 0, Default::default()).unwrap();
        let search = Searcher::new(GameState::from_board(board), MoveGenerator::new(3, false))
            .with_validator(BoardValidator::new(2, 52));

        assert!(matches!(
            search.run(2),
            Err(SearchError::InvalidBoard { .. })
        ));
    }
}
