pub mod frame;
pub mod inp;
pub mod interaction;
pub mod long_task;

pub use frame::{
    FramePhaseBreakdown, FramePhaseDecomposer, FrameSummary, FrameTimings, PhaseDurations,
    ScriptAttribution,
};
pub use inp::{InpAggregator, InpRating};
pub use interaction::{InteractionDetail, InteractionSample, InteractionStore};
pub use long_task::{LongTaskRecord, LongTaskRecorder, TaskAttribution};
