use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::{Board, Coord, Seat, BOARD_SIZE};

pub const SEQUENCE_LENGTH: usize = 5;

/// Five cells in a row, column or diagonal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub cells: [Coord; SEQUENCE_LENGTH],
}

impl Sequence {
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn shared_cells(&self, other: &Sequence) -> usize {
        self.cells.iter().filter(|&&coord| other.contains(coord)).count()
    }

    /// Two sequences may both count towards a win if they share at most one cell.
    pub fn is_distinct_from(&self, other: &Sequence) -> bool {
        self.shared_cells(other) <= 1
    }
}

/// Every run of [`SEQUENCE_LENGTH`] cells on the board.
///
/// A window of `SEQUENCE_LENGTH x SEQUENCE_LENGTH` cells is slid over every position of
/// the board, and each window contributes its rows, its columns and its two diagonals.
/// Runs that are seen by several windows are only listed once.
pub fn all_runs() -> &'static [Sequence] {
    static RUNS: OnceLock<Vec<Sequence>> = OnceLock::new();
    RUNS.get_or_init(|| {
        let mut seen = HashSet::new();
        let mut runs = Vec::new();
        let last_origin = BOARD_SIZE - SEQUENCE_LENGTH;
        for top in 0..=last_origin {
            for left in 0..=last_origin {
                for run in window_runs(top, left) {
                    if seen.insert(run) {
                        runs.push(run);
                    }
                }
            }
        }
        runs
    })
}

fn window_runs(top: usize, left: usize) -> Vec<Sequence> {
    let n = SEQUENCE_LENGTH;
    let mut runs = Vec::with_capacity(2 * n + 2);
    for r in 0..n {
        runs.push(Sequence {
            cells: std::array::from_fn(|k| Coord::new(top + r, left + k)),
        });
    }
    for c in 0..n {
        runs.push(Sequence {
            cells: std::array::from_fn(|k| Coord::new(top + k, left + c)),
        });
    }
    runs.push(Sequence {
        cells: std::array::from_fn(|k| Coord::new(top + k, left + k)),
    });
    runs.push(Sequence {
        cells: std::array::from_fn(|k| Coord::new(top + k, left + n - 1 - k)),
    });
    runs
}

/// The runs in which every cell is owned by `seat` or wild.
pub fn qualifying_sequences(board: &Board, seat: Seat) -> Vec<Sequence> {
    all_runs()
        .iter()
        .filter(|run| {
            run.cells
                .iter()
                .all(|&coord| board.get(coord).is_some_and(|cell| cell.counts_for(seat)))
        })
        .copied()
        .collect()
}

/// Finds a largest subset of `candidates` in which all sequences are pairwise
/// distinct, but stops searching once `limit` sequences have been found.
///
/// This is an exact search (exponential in the worst case, but the number of
/// candidates on a real board is tiny). Among several subsets of the same size,
/// the first one in enumeration order is returned.
pub fn max_distinct(candidates: &[Sequence], limit: usize) -> Vec<Sequence> {
    let mut chosen = Vec::new();
    let mut best = Vec::new();
    extend_selection(candidates, 0, limit, &mut chosen, &mut best);
    best.into_iter().map(|idx| candidates[idx]).collect()
}

fn extend_selection(
    candidates: &[Sequence],
    start: usize,
    limit: usize,
    chosen: &mut Vec<usize>,
    best: &mut Vec<usize>,
) {
    if chosen.len() > best.len() {
        best.clone_from(chosen);
    }
    if best.len() >= limit || chosen.len() + (candidates.len() - start) <= best.len() {
        return;
    }
    for idx in start..candidates.len() {
        let compatible = chosen
            .iter()
            .all(|&other| candidates[other].is_distinct_from(&candidates[idx]));
        if compatible {
            chosen.push(idx);
            extend_selection(candidates, idx + 1, limit, chosen, best);
            chosen.pop();
            if best.len() >= limit {
                return;
            }
        }
    }
}

/// The distinct sequences held by one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCount {
    pub seat: Seat,
    pub sequences: Vec<Sequence>,
}

impl SequenceCount {
    pub fn count(&self) -> usize {
        self.sequences.len()
    }
}

/// Counts the distinct sequences (up to `limit`) of every seat, best first.
///
/// Seats with equal counts keep the order in which they were given.
pub fn leaderboard(
    board: &Board,
    seats: impl IntoIterator<Item = Seat>,
    limit: usize,
) -> Vec<SequenceCount> {
    let mut counts: Vec<SequenceCount> = seats
        .into_iter()
        .map(|seat| SequenceCount {
            seat,
            sequences: max_distinct(&qualifying_sequences(board, seat), limit),
        })
        .collect();
    counts.sort_by(|a, b| b.count().cmp(&a.count()));
    counts
}

/// The seat that has reached `threshold` distinct sequences, if there is exactly one.
///
/// When several seats share the top count, nobody has won yet.
pub fn find_winner(
    board: &Board,
    seats: impl IntoIterator<Item = Seat>,
    threshold: usize,
) -> Option<SequenceCount> {
    let mut counts = leaderboard(board, seats, threshold).into_iter();
    let top = counts.next()?;
    if top.count() < threshold {
        return None;
    }
    match counts.next() {
        Some(runner_up) if runner_up.count() == top.count() => None,
        _ => Some(top),
    }
}
