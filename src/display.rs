//! Human-readable rendering of boards.
//!
//! Face-down cards are shown as "XX" and face-up cards use the compact
//! `short_str()` code ("AH", "7C", "TD"). Piles are printed as vertical
//! columns, top-justified, with the playable card at the bottom of each
//! column.

use crate::board::Board;
use crate::card::{Card, Suit};

/// Format a single card for display, either face-up or face-down.
pub fn format_card_visible(card: Card, face_up: bool) -> String {
    if face_up {
        card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Render the goal row, one cell per suit showing the top card.
///   - Empty goal stack: `[  ]`
///   - Non-empty: e.g. `[AH]`, `[7C]`, `[KD]`
pub fn render_goal(board: &Board) -> String {
    let cells: Vec<String> = Suit::ALL
        .iter()
        .map(|&suit| match board.goal_top(suit) {
            Some(card) => format!("[{}]", card.short_str()),
            None => "[  ]".to_string(),
        })
        .collect();
    format!("Goal: {}", cells.join(" "))
}

/// Render the draw pile on a single line.
///
/// Cards before the cursor are flipped; the last flipped card is the one
/// that can be played.
pub fn render_draw_pile(board: &Board) -> String {
    let len = board.draw_pile().len();
    if len == 0 {
        return "Draw: [empty]".to_string();
    }
    match board.draw_card() {
        Some(card) => format!(
            "Draw: [{}] ({} of {} flipped)",
            card.short_str(),
            board.draw_index(),
            len
        ),
        None => format!("Draw: [--] (0 of {} flipped)", len),
    }
}

/// Render all piles as a multi-line string of columns.
pub fn render_piles(board: &Board) -> String {
    let mut s = String::from("Piles:\n      ");
    for i in 0..board.num_piles() {
        s.push_str(&format!("{:>3} ", format!("P{}", i + 1)));
    }
    s.push('\n');

    let max_height = board.piles().iter().map(|p| p.len()).max().unwrap_or(0);

    for row in 0..max_height {
        s.push_str("      ");
        for pile in board.piles() {
            let down = pile.face_down_count();
            let cell = if row < down {
                format_card_visible(pile.face_down()[row], false)
            } else if row < pile.len() {
                format_card_visible(pile.face_up()[row - down], true)
            } else {
                String::new()
            };
            s.push_str(&format!("{:>3} ", cell));
        }
        // Trailing cells of short columns are blank.
        let trimmed = s.trim_end_matches(' ').len();
        s.truncate(trimmed);
        s.push('\n');
    }

    s
}

/// Render a full board: goal, draw pile, then the piles.
pub fn render_board(board: &Board) -> String {
    format!(
        "{}\n{}\n{}",
        render_goal(board),
        render_draw_pile(board),
        render_piles(board)
    )
}

pub fn print_board(board: &Board) {
    println!("{}", render_board(board));
}
