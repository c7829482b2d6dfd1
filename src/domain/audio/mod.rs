pub mod budget;
pub mod cache;
pub mod clip;
pub mod error;
pub mod key;
pub mod playback;
pub mod prefetch;
pub mod service;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CachePolicy, CacheStats, EntryStatus};
pub use clip::AudioClip;
pub use error::AudioError;
pub use key::CacheKey;
pub use playback::{PlaybackPhase, PlaybackSession, PlaybackSnapshot};
pub use prefetch::{JobState, PrefetchHandle, PrefetchJobStatus, PrefetchPriority};
pub use service::{AudioService, AudioServiceApi, AudioSettings};
pub use sink::{AudioSink, PacedSink};
