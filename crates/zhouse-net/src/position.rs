//! A board paired with the repetition history of the game that reached it.

use std::collections::HashMap;

use tracing::debug;
use zhouse_core::{Board, Move};

use crate::error::NetError;

/// A position plus how often each canonical key has recurred in the game.
///
/// A key's count is the number of times it was reached after its first
/// occurrence, so a freshly reached position counts 0. Cloning deep-copies
/// the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    board: Board,
    repetitions: HashMap<String, u32>,
}

impl PositionState {
    /// Start a game history at `board`.
    pub fn new(board: Board) -> PositionState {
        let mut repetitions = HashMap::new();
        repetitions.insert(board.position_key(), 0);
        PositionState { board, repetitions }
    }

    /// Return the current board.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Return the key-to-count map.
    #[inline]
    pub fn repetitions(&self) -> &HashMap<String, u32> {
        &self.repetitions
    }

    /// Return the recorded count for `key`, if it was ever reached.
    pub fn repetition_count(&self, key: &str) -> Option<u32> {
        self.repetitions.get(key).copied()
    }

    /// Return the count for the current position.
    ///
    /// Looks up the board's own key first and falls back to the key of the
    /// mirrored board, which is how a mirrored state finds the history it
    /// was copied from.
    pub fn current_repetitions(&self) -> Result<u32, NetError> {
        let key = self.board.position_key();
        if let Some(count) = self.repetition_count(&key) {
            return Ok(count);
        }
        self.repetition_count(&self.board.mirror().position_key())
            .ok_or(NetError::MissingRepetitionKey { key })
    }

    /// Apply `mv` in place and record the position it reaches.
    pub fn push(&mut self, mv: Move) {
        self.board = self.board.make_move(mv);
        let key = self.board.position_key();
        let count = self
            .repetitions
            .entry(key)
            .and_modify(|n| *n += 1)
            .or_insert(0);
        if *count > 0 {
            debug!(mv = %mv, repetitions = *count, "position repeated");
        }
    }

    /// Return the state after `mv`, leaving `self` untouched.
    pub fn advance(&self, mv: Move) -> PositionState {
        let mut next = self.clone();
        next.push(mv);
        next
    }

    /// Return the colour-swapped position with an unchanged copy of the history.
    ///
    /// Counts stay keyed by the unmirrored positions.
    pub fn mirror(&self) -> PositionState {
        PositionState {
            board: self.board.mirror(),
            repetitions: self.repetitions.clone(),
        }
    }
}

impl Default for PositionState {
    fn default() -> PositionState {
        PositionState::new(Board::starting_position())
    }
}

impl From<Board> for PositionState {
    fn from(board: Board) -> PositionState {
        PositionState::new(board)
    }
}

#[cfg(test)]
mod tests {
    use super::PositionState;
    use crate::error::NetError;
    use zhouse_core::{Board, Move, Square};

    fn knight_shuffle(state: &mut PositionState) {
        state.push(Move::new(Square::G1, Square::F3));
        state.push(Move::new(Square::G8, Square::F6));
        state.push(Move::new(Square::F3, Square::G1));
        state.push(Move::new(Square::F6, Square::G8));
    }

    #[test]
    fn initial_position_counts_zero() {
        let state = PositionState::default();
        assert_eq!(state.repetitions().len(), 1);
        assert_eq!(state.current_repetitions(), Ok(0));
    }

    #[test]
    fn returning_to_start_increments() {
        let mut state = PositionState::default();
        let start_key = state.board().position_key();

        knight_shuffle(&mut state);
        assert_eq!(state.repetition_count(&start_key), Some(1));
        assert_eq!(state.current_repetitions(), Ok(1));

        knight_shuffle(&mut state);
        assert_eq!(state.repetition_count(&start_key), Some(2));
        // Start plus the three intermediate positions.
        assert_eq!(state.repetitions().len(), 4);
    }

    #[test]
    fn new_positions_start_at_zero() {
        let mut state = PositionState::default();
        state.push(Move::new(Square::E2, Square::E4));
        assert_eq!(state.current_repetitions(), Ok(0));
        assert_eq!(state.repetitions().len(), 2);
    }

    #[test]
    fn advance_leaves_original_untouched() {
        let state = PositionState::default();
        let next = state.advance(Move::new(Square::E2, Square::E4));
        assert_eq!(state.repetitions().len(), 1);
        assert_eq!(next.repetitions().len(), 2);
        assert_ne!(state.board(), next.board());
    }

    #[test]
    fn clone_does_not_share_history() {
        let state = PositionState::default();
        let mut copy = state.clone();
        knight_shuffle(&mut copy);
        assert_eq!(state.current_repetitions(), Ok(0));
        assert_eq!(copy.current_repetitions(), Ok(1));
    }

    #[test]
    fn mirror_keeps_counts_and_falls_back() {
        let mut state = PositionState::default();
        state.push(Move::new(Square::E2, Square::E4));
        let mirrored = state.mirror();

        assert_eq!(mirrored.repetitions(), state.repetitions());
        assert_eq!(mirrored.board(), &state.board().mirror());
        assert!(mirrored.repetition_count(&mirrored.board().position_key()).is_none());
        assert_eq!(mirrored.current_repetitions(), Ok(0));
    }

    #[test]
    fn missing_key_reported() {
        let state = PositionState::default();
        let other = PositionState {
            board: "4k3/8/8/8/8/8/8/4K3[] w - - 0 1".parse::<Board>().unwrap(),
            repetitions: state.repetitions().clone(),
        };
        assert!(matches!(
            other.current_repetitions(),
            Err(NetError::MissingRepetitionKey { .. })
        ));
    }
}
