//! The full game position: tableau piles, draw pile with its cursor, and
//! one goal stack per suit.
//!
//! A `Board` is never mutated. Each transition returns a new board that
//! shares every untouched pile, the draw pile and every untouched goal stack
//! with its predecessor through `Arc`, so sibling search branches can keep
//! referring to older boards for free.
//!
//! Equality and hashing are by value: two boards are equal when their piles,
//! draw pile, draw index and goal stacks hold the same cards, however they
//! were built.

use std::sync::Arc;

use crate::card::{Card, NUM_RANKS, NUM_SUITS, Suit};
use crate::error::{BoardError, BoardResult};
use crate::pile::Pile;

/// Number of cards in a complete goal stack.
pub const GOAL_SIZE: usize = NUM_RANKS as usize;

type Goal = [Arc<[Card]>; NUM_SUITS as usize];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    piles: Arc<[Pile]>,
    /// Undealt cards. The first `draw_index` of them have been flipped.
    draw_pile: Arc<[Card]>,
    draw_index: usize,
    /// Goal stacks indexed by `Suit::ordinal()`, Ace first.
    goal: Goal,
}

fn empty_goal() -> Goal {
    std::array::from_fn(|_| Arc::from(Vec::new()))
}

impl Board {
    /// Build a board from explicit parts.
    ///
    /// No rule checking is done here beyond the draw cursor bound; use
    /// `BoardValidator` for that.
    pub fn new(
        piles: Vec<Pile>,
        draw_pile: Vec<Card>,
        draw_index: usize,
        goal: [Vec<Card>; NUM_SUITS as usize],
    ) -> BoardResult<Board> {
        if draw_index > draw_pile.len() {
            return Err(BoardError::DrawIndexOutOfRange {
                index: draw_index,
                len: draw_pile.len(),
            });
        }
        Ok(Board {
            piles: Arc::from(piles),
            draw_pile: Arc::from(draw_pile),
            draw_index,
            goal: goal.map(Arc::from),
        })
    }

    /// Deal a shuffled deck into `num_piles` piles.
    ///
    /// Cards go out in rows: the first card to pile 0, the next to pile 1,
    /// and so on; each following row starts one pile further right. The
    /// last card a pile receives is its only face-up card. Whatever is left
    /// of the deck becomes the draw pile, in order, with nothing flipped.
    pub fn deal(deck: &[Card], num_piles: usize) -> BoardResult<Board> {
        let needed = num_piles * (num_piles + 1) / 2;
        if deck.len() < needed {
            return Err(BoardError::DeckTooSmall {
                cards: deck.len(),
                piles: num_piles,
            });
        }

        let mut columns: Vec<Vec<Card>> = (0..num_piles)
            .map(|j| Vec::with_capacity(j + 1))
            .collect();
        let mut cards = deck.iter().copied();
        for row in 0..num_piles {
            for column in &mut columns[row..] {
                column.extend(cards.next());
            }
        }

        let piles: Vec<Pile> = columns
            .into_iter()
            .map(|column| Pile::new(column, Vec::<Card>::new()))
            .collect();

        Ok(Board {
            piles: Arc::from(piles),
            draw_pile: cards.collect::<Vec<_>>().into(),
            draw_index: 0,
            goal: empty_goal(),
        })
    }

    // ----- Queries -----

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    pub fn num_piles(&self) -> usize {
        self.piles.len()
    }

    pub fn pile(&self, index: usize) -> BoardResult<&Pile> {
        self.piles.get(index).ok_or(BoardError::PileOutOfRange {
            index,
            piles: self.piles.len(),
        })
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn draw_index(&self) -> usize {
        self.draw_index
    }

    /// The currently playable draw card, `draw_pile[draw_index - 1]`.
    pub fn draw_card(&self) -> Option<Card> {
        self.draw_index
            .checked_sub(1)
            .map(|i| self.draw_pile[i])
    }

    pub fn can_flip_more_draw_cards(&self) -> bool {
        self.draw_index < self.draw_pile.len()
    }

    pub fn can_reset_draw_pile(&self) -> bool {
        self.draw_index > 0
    }

    pub fn goal(&self, suit: Suit) -> &[Card] {
        &self.goal[suit.ordinal()]
    }

    pub fn goal_top(&self, suit: Suit) -> Option<Card> {
        self.goal(suit).last().copied()
    }

    /// Size of the largest goal stack.
    pub fn max_goal_len(&self) -> usize {
        self.goal.iter().map(|g| g.len()).max().unwrap_or(0)
    }

    /// Cards anywhere on the board: piles, draw pile and goal stacks.
    pub fn card_count(&self) -> usize {
        let in_piles: usize = self.piles.iter().map(Pile::len).sum();
        let in_goal: usize = self.goal.iter().map(|g| g.len()).sum();
        in_piles + self.draw_pile.len() + in_goal
    }

    /// Every goal stack is complete.
    pub fn is_win(&self) -> bool {
        self.goal.iter().all(|g| g.len() == GOAL_SIZE)
    }

    // ----- Transitions -----

    fn with_piles(&self, replaced: &[(usize, Pile)]) -> Board {
        let mut piles = self.piles.to_vec();
        for (index, pile) in replaced {
            piles[*index] = pile.clone();
        }
        Board {
            piles: Arc::from(piles),
            draw_pile: Arc::clone(&self.draw_pile),
            draw_index: self.draw_index,
            goal: self.goal.clone(),
        }
    }

    fn goal_with(&self, card: Card) -> Goal {
        let mut goal = self.goal.clone();
        let slot = &mut goal[card.suit().ordinal()];
        let mut stack = Vec::with_capacity(slot.len() + 1);
        stack.extend_from_slice(slot);
        stack.push(card);
        *slot = Arc::from(stack);
        goal
    }

    /// Flip up to `count` more draw cards. The cursor stops at the end of
    /// the draw pile.
    pub fn advance_draw_index(&self, count: usize) -> BoardResult<Board> {
        if count < 1 {
            return Err(BoardError::InvalidAdvance(count));
        }
        let draw_index = self.draw_index.saturating_add(count).min(self.draw_pile.len());
        Ok(Board {
            draw_index,
            ..self.clone()
        })
    }

    /// Turn the whole draw pile face down again.
    pub fn reset_draw_index(&self) -> Board {
        Board {
            draw_index: 0,
            ..self.clone()
        }
    }

    /// Move the top `count` face-up cards of pile `from` onto pile `to`.
    pub fn move_stack(&self, from: usize, to: usize, count: usize) -> BoardResult<Board> {
        if from == to {
            return Err(BoardError::SamePile(from));
        }
        let source = self.pile(from)?;
        let dest = self.pile(to)?;

        let moved = source.top_cards(count)?;
        let new_dest = dest.with_cards(moved)?;
        let new_source = source.without_top_cards(count)?;

        Ok(self.with_piles(&[(from, new_source), (to, new_dest)]))
    }

    /// Move the top card of pile `index` onto its goal stack.
    pub fn move_card_to_goal(&self, index: usize) -> BoardResult<Board> {
        let pile = self.pile(index)?;
        let card = pile.top_card().ok_or(BoardError::NoFaceUpCard(index))?;
        let new_pile = pile.without_top_cards(1)?;

        let mut board = self.with_piles(&[(index, new_pile)]);
        board.goal = self.goal_with(card);
        Ok(board)
    }

    /// Remove the active draw card, returning it and the remaining draw pile.
    fn take_draw_card(&self) -> BoardResult<(Card, Arc<[Card]>)> {
        let card = self.draw_card().ok_or(BoardError::NoDrawCard)?;
        let slot = self.draw_index - 1;
        let remaining: Vec<Card> = self.draw_pile[..slot]
            .iter()
            .chain(&self.draw_pile[slot + 1..])
            .copied()
            .collect();
        Ok((card, Arc::from(remaining)))
    }

    /// Move the active draw card onto pile `index`.
    pub fn draw_card_to_pile(&self, index: usize) -> BoardResult<Board> {
        let pile = self.pile(index)?;
        let (card, draw_pile) = self.take_draw_card()?;
        let new_pile = pile.with_card(card);

        let mut board = self.with_piles(&[(index, new_pile)]);
        board.draw_pile = draw_pile;
        board.draw_index = self.draw_index - 1;
        Ok(board)
    }

    /// Move the active draw card onto its goal stack.
    pub fn draw_card_to_goal(&self) -> BoardResult<Board> {
        let (card, draw_pile) = self.take_draw_card()?;
        Ok(Board {
            piles: Arc::clone(&self.piles),
            draw_pile,
            draw_index: self.draw_index - 1,
            goal: self.goal_with(card),
        })
    }

    /// Take the top card of a goal stack back down onto pile `index`.
    pub fn move_card_from_goal(&self, suit: Suit, index: usize) -> BoardResult<Board> {
        let pile = self.pile(index)?;
        let stack = &self.goal[suit.ordinal()];
        let (&card, rest) = stack.split_last().ok_or(BoardError::EmptyGoal(suit))?;
        let new_pile = pile.with_card(card);

        let mut board = self.with_piles(&[(index, new_pile)]);
        board.goal[suit.ordinal()] = Arc::from(rest);
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, standard_deck};

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    fn up(cards: &[Card]) -> Pile {
        Pile::new(Vec::<Card>::new(), cards.to_vec())
    }

    fn empty_piles() -> Vec<Pile> {
        vec![Pile::empty(); 7]
    }

    fn no_goal() -> [Vec<Card>; 4] {
        Default::default()
    }

    fn board(piles: Vec<Pile>, draw: Vec<Card>, index: usize) -> Board {
        Board::new(piles, draw, index, no_goal()).unwrap()
    }

    fn descending_run() -> Vec<Card> {
        vec![
            c(Suit::Spades, Rank::Eight),
            c(Suit::Hearts, Rank::Seven),
            c(Suit::Clubs, Rank::Six),
            c(Suit::Diamonds, Rank::Five),
        ]
    }

    #[test]
    fn deal_lays_out_rows() {
        let deck = standard_deck();
        let b = Board::deal(&deck, 7).unwrap();

        assert_eq!(b.num_piles(), 7);
        for (j, pile) in b.piles().iter().enumerate() {
            assert_eq!(pile.face_down_count(), j);
            assert_eq!(pile.face_up_count(), 1);
        }
        // First row: cards 0..7, one per pile.
        assert_eq!(b.piles()[0].top_card(), Some(deck[0]));
        assert_eq!(b.piles()[1].face_down(), &[deck[1]]);
        // Second row starts at pile 1 with card 7.
        assert_eq!(b.piles()[1].top_card(), Some(deck[7]));
        // Pile 6 gets the 28th card last.
        assert_eq!(b.piles()[6].top_card(), Some(deck[27]));

        assert_eq!(b.draw_pile(), &deck[28..]);
        assert_eq!(b.draw_index(), 0);
        assert_eq!(b.card_count(), 52);
        assert_eq!(b.max_goal_len(), 0);
    }

    #[test]
    fn deal_rejects_short_deck() {
        let deck = standard_deck();
        assert_eq!(
            Board::deal(&deck[..27], 7),
            Err(BoardError::DeckTooSmall { cards: 27, piles: 7 })
        );
        assert!(Board::deal(&deck[..28], 7).is_ok());
    }

    #[test]
    fn new_rejects_cursor_past_end() {
        let draw = vec![c(Suit::Clubs, Rank::Two)];
        assert_eq!(
            Board::new(empty_piles(), draw, 2, no_goal()),
            Err(BoardError::DrawIndexOutOfRange { index: 2, len: 1 })
        );
    }

    #[test]
    fn equality_ignores_how_piles_were_built() {
        let cards = vec![c(Suit::Hearts, Rank::Four), c(Suit::Clubs, Rank::Nine)];
        let mut a = empty_piles();
        a[3] = Pile::new(cards.clone(), Vec::<Card>::new());
        let mut b = empty_piles();
        b[3] = Pile::new(cards[..1].to_vec(), cards[1..].to_vec());

        assert_eq!(board(a, Vec::new(), 0), board(b, Vec::new(), 0));
    }

    #[test]
    fn boards_differ_on_draw_index_and_goal() {
        let draw = vec![c(Suit::Clubs, Rank::Two), c(Suit::Spades, Rank::Ten)];
        assert_ne!(
            board(empty_piles(), draw.clone(), 0),
            board(empty_piles(), draw, 1)
        );

        let mut goal = no_goal();
        goal[Suit::Hearts.ordinal()] = vec![c(Suit::Hearts, Rank::Ace)];
        let with_goal = Board::new(empty_piles(), Vec::new(), 0, goal).unwrap();
        assert_ne!(with_goal, board(empty_piles(), Vec::new(), 0));
    }

    #[test]
    fn move_stack_to_empty_pile() {
        let king = [c(Suit::Spades, Rank::King)];
        let mut before = empty_piles();
        before[0] = up(&king);
        let mut after = empty_piles();
        after[1] = up(&king);

        let moved = board(before, Vec::new(), 0).move_stack(0, 1, 1).unwrap();
        assert_eq!(moved, board(after, Vec::new(), 0));
    }

    #[test]
    fn move_stack_partial_onto_another() {
        let top = [c(Suit::Hearts, Rank::Seven), c(Suit::Clubs, Rank::Six)];
        let bottom = [
            c(Suit::Spades, Rank::Six),
            c(Suit::Hearts, Rank::Five),
            c(Suit::Clubs, Rank::Four),
            c(Suit::Hearts, Rank::Three),
        ];
        let mut before = empty_piles();
        before[5] = up(&top);
        before[1] = up(&bottom);

        let mut combined = top.to_vec();
        combined.extend_from_slice(&bottom[1..]);
        let mut after = empty_piles();
        after[5] = up(&combined);
        after[1] = up(&bottom[..1]);

        let moved = board(before, Vec::new(), 0).move_stack(1, 5, 3).unwrap();
        assert_eq!(moved, board(after, Vec::new(), 0));
    }

    #[test]
    fn move_stack_preconditions() {
        let mut piles = empty_piles();
        piles[0] = up(&[c(Suit::Spades, Rank::King)]);
        let b = board(piles, Vec::new(), 0);

        assert_eq!(b.move_stack(0, 0, 1), Err(BoardError::SamePile(0)));
        assert_eq!(
            b.move_stack(0, 1, 2),
            Err(BoardError::StackSize { requested: 2, available: 1 })
        );
        assert_eq!(
            b.move_stack(0, 1, 0),
            Err(BoardError::StackSize { requested: 0, available: 1 })
        );
        assert_eq!(
            b.move_stack(0, 9, 1),
            Err(BoardError::PileOutOfRange { index: 9, piles: 7 })
        );
    }

    #[test]
    fn move_stack_keeps_draw_pile_and_goal() {
        let draw = vec![c(Suit::Clubs, Rank::Two), c(Suit::Spades, Rank::Ten)];
        let mut goal = no_goal();
        goal[Suit::Diamonds.ordinal()] = vec![c(Suit::Diamonds, Rank::Ace)];
        let mut piles = empty_piles();
        piles[2] = up(&[c(Suit::Spades, Rank::King)]);

        let b = Board::new(piles, draw.clone(), 1, goal).unwrap();
        let moved = b.move_stack(2, 3, 1).unwrap();

        assert_eq!(moved.draw_pile(), &draw[..]);
        assert_eq!(moved.draw_index(), 1);
        assert_eq!(moved.goal(Suit::Diamonds), &[c(Suit::Diamonds, Rank::Ace)]);
        assert!(Arc::ptr_eq(&b.draw_pile, &moved.draw_pile));
    }

    #[test]
    fn move_card_to_goal() {
        let mut piles = empty_piles();
        piles[6] = up(&[c(Suit::Clubs, Rank::Ace)]);
        let b = board(piles, Vec::new(), 0);

        let moved = b.move_card_to_goal(6).unwrap();
        assert!(moved.pile(6).unwrap().is_empty());
        assert_eq!(moved.goal(Suit::Clubs), &[c(Suit::Clubs, Rank::Ace)]);

        assert_eq!(moved.move_card_to_goal(6), Err(BoardError::NoFaceUpCard(6)));
    }

    #[test]
    fn draw_card_to_pile_splices_out_the_active_card() {
        let four = c(Suit::Spades, Rank::Four);
        let others = [
            c(Suit::Spades, Rank::Six),
            c(Suit::Clubs, Rank::Jack),
            c(Suit::Clubs, Rank::Queen),
        ];
        let mut expected_run = descending_run();
        expected_run.push(four);

        for slot in 0..=others.len() {
            let mut draw = others.to_vec();
            draw.insert(slot, four);
            let mut piles = empty_piles();
            piles[4] = up(&descending_run());
            let b = board(piles, draw, slot + 1);

            let moved = b.draw_card_to_pile(4).unwrap();
            assert_eq!(moved.draw_pile(), &others[..]);
            assert_eq!(moved.draw_index(), slot);
            assert_eq!(moved.pile(4).unwrap().face_up(), &expected_run[..]);
        }
    }

    #[test]
    fn draw_card_requires_a_flipped_card() {
        let empty = board(empty_piles(), Vec::new(), 0);
        assert_eq!(empty.draw_card_to_pile(4), Err(BoardError::NoDrawCard));
        assert_eq!(empty.draw_card_to_goal(), Err(BoardError::NoDrawCard));

        let unflipped = board(empty_piles(), vec![c(Suit::Clubs, Rank::King)], 0);
        assert_eq!(unflipped.draw_card_to_pile(4), Err(BoardError::NoDrawCard));
    }

    #[test]
    fn draw_card_to_goal() {
        let ace = c(Suit::Hearts, Rank::Ace);
        let draw = vec![c(Suit::Clubs, Rank::Nine), ace, c(Suit::Clubs, Rank::Ten)];
        let b = board(empty_piles(), draw, 2);

        let moved = b.draw_card_to_goal().unwrap();
        assert_eq!(moved.goal(Suit::Hearts), &[ace]);
        assert_eq!(
            moved.draw_pile(),
            &[c(Suit::Clubs, Rank::Nine), c(Suit::Clubs, Rank::Ten)]
        );
        assert_eq!(moved.draw_index(), 1);
        assert_eq!(moved.card_count(), b.card_count());
    }

    #[test]
    fn move_card_from_goal() {
        let mut goal = no_goal();
        goal[Suit::Hearts.ordinal()] =
            vec![c(Suit::Hearts, Rank::Ace), c(Suit::Hearts, Rank::Two)];
        let mut piles = empty_piles();
        piles[0] = up(&[c(Suit::Spades, Rank::Three)]);
        let b = Board::new(piles, Vec::new(), 0, goal).unwrap();

        let moved = b.move_card_from_goal(Suit::Hearts, 0).unwrap();
        assert_eq!(moved.goal(Suit::Hearts), &[c(Suit::Hearts, Rank::Ace)]);
        assert_eq!(
            moved.pile(0).unwrap().face_up(),
            &[c(Suit::Spades, Rank::Three), c(Suit::Hearts, Rank::Two)]
        );

        assert_eq!(
            b.move_card_from_goal(Suit::Clubs, 0),
            Err(BoardError::EmptyGoal(Suit::Clubs))
        );
    }

    #[test]
    fn advance_and_reset_draw_index() {
        let draw: Vec<Card> = standard_deck()[..5].to_vec();
        let b = board(empty_piles(), draw, 0);

        let advanced = b.advance_draw_index(3).unwrap();
        assert_eq!(advanced.draw_index(), 3);
        assert_eq!(advanced.draw_card(), Some(b.draw_pile()[2]));

        let clamped = advanced.advance_draw_index(3).unwrap();
        assert_eq!(clamped.draw_index(), 5);
        assert!(!clamped.can_flip_more_draw_cards());

        assert_eq!(clamped.reset_draw_index(), b);
        assert_eq!(b.advance_draw_index(0), Err(BoardError::InvalidAdvance(0)));
    }

    #[test]
    fn huge_advance_clamps_to_the_end() {
        let draw: Vec<Card> = standard_deck()[..5].to_vec();
        let b = board(empty_piles(), draw, 1);

        let advanced = b.advance_draw_index(usize::MAX).unwrap();
        assert_eq!(advanced.draw_index(), 5);
        assert_eq!(advanced.draw_card(), Some(b.draw_pile()[4]));
    }

    #[test]
    fn win_requires_every_goal_complete() {
        let deck = standard_deck();
        let goal: [Vec<Card>; 4] =
            std::array::from_fn(|s| deck[s * GOAL_SIZE..(s + 1) * GOAL_SIZE].to_vec());
        let won = Board::new(empty_piles(), Vec::new(), 0, goal).unwrap();
        assert!(won.is_win());
        assert_eq!(won.max_goal_len(), GOAL_SIZE);

        let back = won.move_card_from_goal(Suit::Spades, 0).unwrap();
        assert!(!back.is_win());
    }
}
