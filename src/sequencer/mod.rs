pub mod events;
pub mod runner;
pub mod sink;
pub mod thinking;
pub mod timeline;

pub use events::PlaybackEvent;
pub use runner::{SequenceHandle, SequenceOutcome, StepSequencer};
pub use sink::EventSink;
pub use thinking::{PlaybackPlan, ThinkingStatus, ThinkingStep};
pub use timeline::{SequencePolicy, SequencerSettings, Timeline, DEFAULT_MIN_TOTAL_MS};
