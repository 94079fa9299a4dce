//! Network-facing encodings for Crazyhouse: the move/action codec, position
//! state with repetition tracking, input planes, and training samples.

pub mod codec;
mod error;
pub mod policy;
mod position;
pub mod sample;
pub mod tensor;

pub use codec::{ACTION_SPACE, decode, decode_on, encode};
pub use error::NetError;
pub use position::PositionState;
pub use sample::{GameOutcome, TrainingSample};
pub use tensor::{InputTensor, PLANES, build_input_tensor};
