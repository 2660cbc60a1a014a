//! Fixed deals and deck files.
//!
//! A deck file holds one or more bracketed lists of card indices, e.g.
//!   [51, 32, 3, ...]
//! where each number is a `Card::index()` (`suit * 13 + rank`). Anything
//! outside the brackets is ignored, so annotated dumps can be loaded as is.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::card::{CARDS_PER_DECK, Card, Rank, Suit};

const DECK_LEN: usize = CARDS_PER_DECK as usize;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("malformed deck list: {0}")]
    Malformed(&'static str),

    #[error("could not parse '{0}' as a card index")]
    BadIndex(String),

    #[error("deck list must have {expected} cards, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("card index {0} out of range 0..=51")]
    OutOfRange(u8),

    #[error("duplicate card index {0}")]
    Duplicate(u8),

    #[error("no deck list found in '{}'", .0.display())]
    Empty(PathBuf),

    #[error("could not read deck file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A deal that is known to be solvable with a draw advance of 3.
///
/// The clubs and diamonds sit in the tableau nearly in order, and the draw
/// pile holds the hearts and spades from King down to Two.
pub fn winning_deck() -> Vec<Card> {
    use Rank::*;
    use Suit::*;

    let tableau = [
        (Clubs, Ace), (Clubs, Three), (Clubs, Six), (Clubs, Ten),
        (Clubs, King), (Diamonds, Seven), (Diamonds, King),
        (Clubs, Two), (Clubs, Five), (Clubs, Nine), (Clubs, Queen),
        (Diamonds, Six), (Diamonds, Queen),
        (Clubs, Four), (Clubs, Eight), (Clubs, Jack), (Diamonds, Five),
        (Diamonds, Jack),
        (Clubs, Seven), (Diamonds, Two), (Diamonds, Four), (Diamonds, Ten),
        (Diamonds, Ace), (Diamonds, Three), (Diamonds, Nine),
        (Hearts, Ace), (Diamonds, Eight),
        (Spades, Ace),
    ];

    let mut deck: Vec<Card> = tableau.iter().map(|&(s, r)| Card::new(s, r)).collect();
    for suit in [Hearts, Spades] {
        deck.extend(Rank::ALL[1..].iter().rev().map(|&rank| Card::new(suit, rank)));
    }
    deck
}

/// A fixed deal whose solvability has not been established.
pub fn unknown_deck() -> Vec<Card> {
    use Rank::*;
    use Suit::*;

    let cards = [
        // tableau
        (Diamonds, Six), (Spades, Nine), (Hearts, Queen), (Spades, Four),
        (Hearts, Jack), (Diamonds, Ten), (Clubs, Five),
        (Diamonds, Four), (Diamonds, Two), (Spades, Five), (Spades, Six),
        (Spades, King), (Diamonds, King),
        (Diamonds, Nine), (Hearts, Three), (Hearts, Ace), (Spades, Ten),
        (Clubs, Ten),
        (Clubs, Four), (Hearts, Five), (Spades, Jack), (Hearts, Ten),
        (Spades, Two), (Hearts, King), (Hearts, Six),
        (Hearts, Nine), (Hearts, Four),
        (Hearts, Seven),
        // draw pile
        (Clubs, Three), (Diamonds, Queen), (Spades, Seven),
        (Clubs, Eight), (Clubs, Nine), (Diamonds, Eight),
        (Clubs, Seven), (Diamonds, Ace), (Spades, Eight),
        (Clubs, Jack), (Spades, Three), (Clubs, Ace),
        (Clubs, King), (Spades, Ace), (Diamonds, Three),
        (Hearts, Eight), (Hearts, Two), (Clubs, Two),
        (Clubs, Six), (Spades, Queen), (Diamonds, Five),
        (Clubs, Queen), (Diamonds, Seven), (Diamonds, Jack),
    ];

    cards.iter().map(|&(s, r)| Card::new(s, r)).collect()
}

/// Parse a single bracketed list of card indices (e.g. "[1, 2, 3]").
///
/// The list must hold exactly 52 indices, each in 0..=51, with no duplicates.
pub fn parse_deck_list(s: &str) -> Result<Vec<Card>, DeckError> {
    let open = s.find('[').ok_or(DeckError::Malformed("missing '['"))?;
    let close = s.rfind(']').ok_or(DeckError::Malformed("missing ']'"))?;
    if close <= open {
        return Err(DeckError::Malformed("']' before '['"));
    }

    let nums = s[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<u8>().map_err(|_| DeckError::BadIndex(t.to_string())))
        .collect::<Result<Vec<u8>, _>>()?;

    if nums.len() != DECK_LEN {
        return Err(DeckError::Length {
            expected: DECK_LEN,
            actual: nums.len(),
        });
    }

    let mut seen = [false; DECK_LEN];
    let mut deck = Vec::with_capacity(DECK_LEN);
    for v in nums {
        let card = Card::from_index(v).ok_or(DeckError::OutOfRange(v))?;
        if std::mem::replace(&mut seen[v as usize], true) {
            return Err(DeckError::Duplicate(v));
        }
        deck.push(card);
    }
    Ok(deck)
}

/// Every bracketed list in `text`, parsed in order of appearance.
pub fn extract_deck_lists(text: &str) -> Result<Vec<Vec<Card>>, DeckError> {
    let mut decks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let Some(len) = rest[open..].find(']') else {
            return Err(DeckError::Malformed("unterminated '['"));
        };
        let close = open + len;
        decks.push(parse_deck_list(&rest[open..=close])?);
        rest = &rest[close + 1..];
    }
    Ok(decks)
}

/// Load every deck in a file. A file with no deck list is an error.
pub fn load_deck_file(path: &Path) -> Result<Vec<Vec<Card>>, DeckError> {
    let text = fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decks = extract_deck_lists(&text)?;
    if decks.is_empty() {
        return Err(DeckError::Empty(path.to_path_buf()));
    }
    Ok(decks)
}

/// Render a deck in the format `parse_deck_list` reads.
pub fn format_deck_list(deck: &[Card]) -> String {
    let parts: Vec<String> = deck.iter().map(|c| c.index().to_string()).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{shuffled_deck_from_seed, standard_deck};
    use std::collections::HashSet;

    fn assert_is_permutation(deck: &[Card]) {
        assert_eq!(deck.len(), DECK_LEN);
        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_LEN);
    }

    #[test]
    fn fixed_deals_are_full_decks() {
        assert_is_permutation(&winning_deck());
        assert_is_permutation(&unknown_deck());
    }

    #[test]
    fn winning_deck_layout() {
        let deck = winning_deck();
        assert_eq!(deck[0], Card::new(Suit::Clubs, Rank::Ace));
        assert_eq!(deck[27], Card::new(Suit::Spades, Rank::Ace));
        assert_eq!(deck[28], Card::new(Suit::Hearts, Rank::King));
        assert_eq!(deck[39], Card::new(Suit::Hearts, Rank::Two));
        assert_eq!(deck[40], Card::new(Suit::Spades, Rank::King));
        assert_eq!(deck[51], Card::new(Suit::Spades, Rank::Two));
    }

    #[test]
    fn parse_round_trips_through_format() {
        let deck = shuffled_deck_from_seed(42);
        let text = format_deck_list(&deck);
        assert_eq!(parse_deck_list(&text).unwrap(), deck);
    }

    #[test]
    fn parse_ignores_surrounding_text() {
        let text = format!("deal #7: {} (dumped)", format_deck_list(&standard_deck()));
        assert_eq!(parse_deck_list(&text).unwrap(), standard_deck());
    }

    #[test]
    fn parse_rejects_bad_lists() {
        assert!(matches!(parse_deck_list("1, 2, 3"), Err(DeckError::Malformed(_))));
        assert!(matches!(
            parse_deck_list("[1, 2, 3]"),
            Err(DeckError::Length { expected: 52, actual: 3 })
        ));
        assert!(matches!(parse_deck_list("[1, x]"), Err(DeckError::BadIndex(t)) if t == "x"));

        let mut nums: Vec<u8> = (0..52).collect();
        nums[10] = 52;
        let text = format!("{:?}", nums);
        assert!(matches!(parse_deck_list(&text), Err(DeckError::OutOfRange(52))));

        nums[10] = 9;
        let text = format!("{:?}", nums);
        assert!(matches!(parse_deck_list(&text), Err(DeckError::Duplicate(9))));
    }

    #[test]
    fn extract_finds_every_list() {
        let text = format!(
            "first {}\nsecond {}\n",
            format_deck_list(&winning_deck()),
            format_deck_list(&unknown_deck())
        );
        let decks = extract_deck_lists(&text).unwrap();
        assert_eq!(decks, vec![winning_deck(), unknown_deck()]);
        assert!(extract_deck_lists("no decks here").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_deck_file(Path::new("/nonexistent/deck.txt")).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
    }
}
