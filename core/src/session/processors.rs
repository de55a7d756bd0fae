use crate::metrics::{
    FramePhaseBreakdown, FramePhaseDecomposer, InpAggregator, InpRating, InteractionDetail,
    InteractionStore, LongTaskRecord, LongTaskRecorder,
};
use crate::prelude::{RecordKind, RecordProcessor};
use crate::timing::RawTimingRecord;
use serde::Serialize;

/// Notification payload of the interaction session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InpUpdate {
    pub inp: Option<i64>,
    pub interactions: Vec<InteractionDetail>,
}

impl InpUpdate {
    pub fn unknown() -> Self {
        Self {
            inp: None,
            interactions: Vec::new(),
        }
    }

    pub fn rating(&self) -> InpRating {
        InpRating::from_inp(self.inp)
    }
}

/// Feeds event records into an [`InteractionStore`] and recomputes INP.
#[derive(Debug, Default)]
pub struct InteractionProcessor {
    store: InteractionStore,
}

impl InteractionProcessor {
    pub fn current_inp(&self) -> Option<i64> {
        InpAggregator::compute(self.store.samples())
    }

    pub fn snapshot(&self) -> InpUpdate {
        InpUpdate {
            inp: self.current_inp(),
            interactions: self.store.details().to_vec(),
        }
    }

    pub fn store(&self) -> &InteractionStore {
        &self.store
    }

    pub fn reset(&mut self) -> InpUpdate {
        self.store.reset();
        InpUpdate::unknown()
    }
}

impl RecordProcessor for InteractionProcessor {
    type Update = InpUpdate;

    fn kind(&self) -> RecordKind {
        RecordKind::Event
    }

    fn process(&mut self, record: &RawTimingRecord) -> Option<InpUpdate> {
        match record {
            RawTimingRecord::Event(entry) if self.store.observe(entry) => Some(self.snapshot()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct LongTaskProcessor {
    recorder: LongTaskRecorder,
}

impl LongTaskProcessor {
    pub fn records(&self) -> &[LongTaskRecord] {
        self.recorder.records()
    }
}

impl RecordProcessor for LongTaskProcessor {
    type Update = LongTaskRecord;

    fn kind(&self) -> RecordKind {
        RecordKind::LongTask
    }

    fn process(&mut self, record: &RawTimingRecord) -> Option<LongTaskRecord> {
        match record {
            RawTimingRecord::LongTask(task) => Some(self.recorder.record(task)),
            _ => None,
        }
    }
}

/// Decomposes every long animation frame and keeps the results in order.
#[derive(Debug, Default)]
pub struct FrameProcessor {
    frames: Vec<FramePhaseBreakdown>,
}

impl FrameProcessor {
    pub fn frames(&self) -> &[FramePhaseBreakdown] {
        &self.frames
    }
}

impl RecordProcessor for FrameProcessor {
    type Update = FramePhaseBreakdown;

    fn kind(&self) -> RecordKind {
        RecordKind::LongAnimationFrame
    }

    fn process(&mut self, record: &RawTimingRecord) -> Option<FramePhaseBreakdown> {
        match record {
            RawTimingRecord::LongAnimationFrame(frame) => {
                let breakdown = FramePhaseDecomposer::decompose(frame);
                self.frames.push(breakdown.clone());
                Some(breakdown)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{RawEventTiming, RawFrameTiming, RawLongTaskTiming};

    #[test]
    fn interaction_processor_notifies_only_on_growth() {
        let mut processor = InteractionProcessor::default();
        let down = RawEventTiming::new("pointerdown", 4, 10.0, 24.0).into();
        let up = RawEventTiming::new("pointerup", 4, 10.0, 88.0).into();
        let click = RawEventTiming::new("click", 4, 10.0, 88.0).into();

        assert_eq!(processor.process(&down).unwrap().inp, Some(24));
        let update = processor.process(&up).unwrap();
        assert_eq!(update.inp, Some(88));
        assert_eq!(update.interactions.len(), 1);
        assert_eq!(update.rating(), InpRating::Good);
        assert!(processor.process(&click).is_none());
    }

    #[test]
    fn interaction_processor_ignores_other_kinds() {
        let mut processor = InteractionProcessor::default();
        let task = RawLongTaskTiming::new("self", 0.0, 300.0).into();
        assert!(processor.process(&task).is_none());
        assert_eq!(processor.current_inp(), None);
    }

    #[test]
    fn reset_returns_the_unknown_state() {
        let mut processor = InteractionProcessor::default();
        processor.process(&RawEventTiming::new("click", 1, 0.0, 640.0).into());
        assert_eq!(processor.snapshot().rating(), InpRating::Poor);

        let update = processor.reset();
        assert_eq!(update, InpUpdate::unknown());
        assert_eq!(processor.current_inp(), None);
        assert!(processor.snapshot().interactions.is_empty());
    }

    #[test]
    fn task_and_frame_processors_append_every_record() {
        let mut tasks = LongTaskProcessor::default();
        let mut frames = FrameProcessor::default();
        let task: RawTimingRecord = RawLongTaskTiming::new("self", 0.0, 70.0).into();
        let frame: RawTimingRecord = RawFrameTiming::new(0.0, 90.0).into();

        for _ in 0..2 {
            assert!(tasks.process(&task).is_some());
            assert!(frames.process(&frame).is_some());
            assert!(tasks.process(&frame).is_none());
            assert!(frames.process(&task).is_none());
        }
        assert_eq!(tasks.records().len(), 2);
        assert_eq!(frames.frames().len(), 2);
    }
}
