//! The negamax search engine and its iterative, null-window solve driver.

use crate::{MoveSorter, Position, TranspositionTable};

/// Columns in center-out search order: central stones participate in the most
/// alignments, so exploring them first maximises alpha-beta pruning.
const COLUMN_ORDER: [usize; Position::WIDTH] = [3, 2, 4, 1, 5, 0, 6];

/// A solver for Connect Four positions, returning the exact score (or, via
/// [`Solver::solve`]'s `weak` flag, just its sign) under perfect play.
///
/// Combines alpha-beta pruned negamax search, move ordering by a lookahead heuristic,
/// and a transposition table to make full-depth solves of the empty board tractable.
/// A single `Solver` instance is meant to be reused across many solves; call
/// [`Solver::reset`] between them.
#[derive(Debug)]
pub struct Solver {
    /// Nodes explored since the last [`Solver::reset`] (or construction).
    pub nodes_explored: u64,
    transposition_table: TranspositionTable,
}

impl Solver {
    /// Creates a solver with a transposition table sized for the default 64 MB budget.
    pub fn new() -> Solver {
        Self::default()
    }

    /// Creates a solver whose transposition table is sized to fit within `size_mb`
    /// megabytes.
    pub fn with_tt_size_mb(size_mb: usize) -> Solver {
        Solver {
            nodes_explored: 0,
            transposition_table: TranspositionTable::with_size_mb(size_mb),
        }
    }

    /// Clears the node counter and bumps the transposition table's generation, so
    /// stale entries from a previous solve are no longer visible.
    pub fn reset(&mut self) {
        self.nodes_explored = 0;
        self.transposition_table.reset();
    }

    /// Solves `position` for its exact (or, if `weak`, sign-only) score.
    ///
    /// A positive score means the player to move wins; `n` means they win with
    /// `n` plies left to place. Zero means a draw. Negative means the player to
    /// move loses.
    ///
    /// `position` is mutated and restored during the search via play/undo but is
    /// left unchanged once `solve` returns.
    pub fn solve(&mut self, position: &mut Position, weak: bool) -> i8 {
        if position.can_win_next() {
            return (Position::MAX_MOVES as i8 + 1 - position.ply() as i8) / 2;
        }

        self.nodes_explored = 0;

        let mut min = -((Position::MAX_MOVES - position.ply()) as i8) / 2;
        let mut max = (Position::MAX_MOVES as i8 + 1 - position.ply() as i8) / 2;
        if weak {
            min = -1;
            max = 1;
        }

        while min < max {
            let mut med = min + (max - min) / 2;
            if med <= 0 && min / 2 < med {
                med = min / 2;
            } else if med >= 0 && max / 2 > med {
                med = max / 2;
            }

            let r = self.negamax(position, med, med + 1);
            if r <= med {
                max = r;
            } else {
                min = r;
            }
        }

        min
    }

    /// The recursive alpha-beta search. `alpha < beta` and `!position.can_win_next()`
    /// must hold at entry; both are programmer errors, not recoverable faults.
    fn negamax(&mut self, position: &mut Position, mut alpha: i8, mut beta: i8) -> i8 {
        assert!(alpha < beta);
        assert!(!position.can_win_next());

        self.nodes_explored += 1;

        let next = position.possible_non_losing_moves();
        if next == 0 {
            return -((Position::MAX_MOVES - position.ply()) as i8) / 2;
        }

        if position.ply() == Position::MAX_MOVES - 2 {
            return 0;
        }

        let min = -((Position::MAX_MOVES - 2 - position.ply()) as i8) / 2;
        if alpha < min {
            alpha = min;
            if alpha >= beta {
                return alpha;
            }
        }

        let key = position.key();
        let mut max = (Position::MAX_MOVES as i8 - 1 - position.ply() as i8) / 2;
        let tt_value = self.transposition_table.get(key);
        if tt_value != 0 {
            max = tt_value as i8 + Position::MIN_SCORE - 1;
        }
        if beta > max {
            beta = max;
            if alpha >= beta {
                return beta;
            }
        }

        let mut moves = MoveSorter::new();
        for &col in COLUMN_ORDER.iter().rev() {
            let mv = next & Position::column_mask(col);
            if mv != 0 {
                moves.add(mv, position.move_score(mv));
            }
        }

        let mut best_move: u8 = 0;
        for mv in moves {
            position.play(mv);
            let score = -self.negamax(position, -beta, -alpha);
            position.undo(mv);

            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
                best_move = column_of(mv) as u8 + 1;
            }
        }

        self.transposition_table
            .put(key, (alpha - Position::MIN_SCORE + 1) as u8, best_move);

        alpha
    }
}

/// Recovers the 0-based column index of a single-bit move bitmap.
#[inline(always)]
fn column_of(mv: u64) -> usize {
    mv.trailing_zeros() as usize / (Position::HEIGHT + 1)
}

impl Default for Solver {
    fn default() -> Solver {
        Solver {
            nodes_explored: 0,
            transposition_table: TranspositionTable::new(),
        }
    }
}
