mod kind;
mod sequencer;

pub use kind::{AnimationKind, FRAMES_PER_ANIMATION};
pub use sequencer::{AnimationSequencer, AnimationState, Playback, COFFEE_PROBABILITY, FRAME_DURATION};
