use crate::{Board, Card, CellCard, ChipColor, Coord, BOARD_SIZE};

impl ChipColor {
    /// The letter drawn on a cell that carries a chip of this colour.
    pub fn letter(self) -> char {
        match self {
            ChipColor::Red => 'R',
            ChipColor::Blue => 'B',
            ChipColor::Green => 'G',
        }
    }
}

/// Draws the board as a grid of card codes, with row and column numbers.
///
/// Free cells show their card, wild cells show `**`, and cells with a chip
/// show the chip colour's letter in brackets instead.
pub fn visualize_board(board: &Board) -> String {
    let mut result = String::from("    ");
    for col in 0..BOARD_SIZE {
        result += &format!("{:^4}", col);
    }
    result += "\n    ╭";
    result += &"─".repeat(4 * BOARD_SIZE);
    result += "╮\n";
    for row in 0..BOARD_SIZE {
        result += &format!("{:>3} │", row);
        for col in 0..BOARD_SIZE {
            let Some(cell) = board.get(Coord::new(row, col)) else {
                continue;
            };
            let text = match (cell.owner, cell.card) {
                (Some(seat), _) => format!("[{}]", ChipColor::for_seat(seat).letter()),
                (None, CellCard::Wild) => String::from("**"),
                (None, CellCard::Standard(card)) => card.to_string(),
            };
            result += &format!("{:^4}", text);
        }
        result += "│\n";
    }
    result += "    ╰";
    result += &"─".repeat(4 * BOARD_SIZE);
    result += "╯";
    result
}

/// Lists a hand as `index: card` pairs on one line.
pub fn visualize_hand(hand: &[Card]) -> String {
    hand.iter()
        .enumerate()
        .map(|(idx, card)| format!("{}: {}", idx, card))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{card, Seat};

    #[test]
    fn board_rendering() {
        let mut board = Board::new();
        board.claim_cell(Seat(1), card!("J♦"), Coord::new(0, 1)).unwrap();
        let text = visualize_board(&board);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), BOARD_SIZE + 3);
        assert!(lines[2].starts_with("  0 │ ** [B]  7♦ "));
        assert!(lines[3].contains("5♦"));
    }

    #[test]
    fn hand_rendering() {
        assert_eq!(visualize_hand(&[card!("T♥"), card!("JS")]), "0: T♥  1: J♠");
    }
}
