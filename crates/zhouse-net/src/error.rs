//! Error type for the action codec and input tensor builder.

use zhouse_core::Square;

/// Errors raised while encoding moves, decoding action indices, or building
/// input tensors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    /// The move is not a slide, knight jump, promotion or drop.
    #[error("move {from}{to} has no action encoding")]
    InvalidMoveShape {
        /// Source square of the rejected move.
        from: Square,
        /// Destination square of the rejected move.
        to: Square,
    },
    /// The action index lies outside the action space.
    #[error("action index {index} out of range (0..5184)")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
    },
    /// The action index decodes to a destination off the board.
    #[error("action index {index} decodes off the board (file {file}, rank {rank})")]
    InvalidGeometry {
        /// The rejected index.
        index: usize,
        /// Computed destination file.
        file: i32,
        /// Computed destination rank.
        rank: i32,
    },
    /// Neither the position key nor its mirror has a repetition entry.
    #[error("no repetition entry for position key \"{key}\"")]
    MissingRepetitionKey {
        /// The key that was looked up first.
        key: String,
    },
    /// A game result token other than `1-0`, `0-1`, `1/2-1/2` or `*`.
    #[error("unrecognized game result \"{found}\"")]
    InvalidOutcome {
        /// The rejected token.
        found: String,
    },
}
