use crate::prelude::{MonitorError, MonitorResult, RecordKind};
use crate::source::{RecordSink, Subscription, TimingSource};
use crate::telemetry::log::LogManager;
use crate::timing::RawTimingRecord;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type SharedSink = Rc<RefCell<RecordSink>>;

struct Subscriber {
    id: u64,
    kind: RecordKind,
    sink: SharedSink,
}

#[derive(Default)]
struct ReplayInner {
    history: Vec<RawTimingRecord>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// In-process timing source that replays recorded or synthetic records.
///
/// Every emitted record is kept so later subscribers can ask for the
/// buffered backlog, like a performance timeline does. The history is never
/// trimmed, so one source is meant for a single bounded replay.
pub struct ReplaySource {
    supported: Vec<RecordKind>,
    inner: Rc<RefCell<ReplayInner>>,
    logger: LogManager,
}

impl ReplaySource {
    pub fn new(supported: Vec<RecordKind>) -> Self {
        Self {
            supported,
            inner: Rc::new(RefCell::new(ReplayInner::default())),
            logger: LogManager::new("replay"),
        }
    }

    pub fn with_all_kinds() -> Self {
        Self::new(RecordKind::ALL.to_vec())
    }

    /// Appends `record` to the timeline and pushes it to live subscribers.
    ///
    /// Records of kinds this source does not advertise are dropped.
    pub fn emit(&self, record: RawTimingRecord) {
        let kind = record.kind();
        if !self.supports(kind) {
            self.logger
                .trace_record(&format!("dropping {} record, kind not advertised", kind));
            return;
        }

        let sinks: Vec<SharedSink> = {
            let mut inner = self.inner.borrow_mut();
            inner.history.push(record.clone());
            inner
                .subscribers
                .iter()
                .filter(|subscriber| subscriber.kind == kind)
                .map(|subscriber| subscriber.sink.clone())
                .collect()
        };

        for sink in sinks {
            let mut guard = sink.borrow_mut();
            let callback: &mut RecordSink = &mut guard;
            callback(&record);
        }
    }

    pub fn emit_all<I>(&self, records: I)
    where
        I: IntoIterator<Item = RawTimingRecord>,
    {
        for record in records {
            self.emit(record);
        }
    }

    pub fn history_len(&self) -> usize {
        self.inner.borrow().history.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl TimingSource for ReplaySource {
    fn supported_kinds(&self) -> Vec<RecordKind> {
        self.supported.clone()
    }

    fn subscribe(
        &self,
        kind: RecordKind,
        buffered: bool,
        sink: RecordSink,
    ) -> MonitorResult<Box<dyn Subscription>> {
        if !self.supports(kind) {
            return Err(MonitorError::UnsupportedKind(kind));
        }

        let sink: SharedSink = Rc::new(RefCell::new(sink));
        if buffered {
            let backlog: Vec<RawTimingRecord> = self
                .inner
                .borrow()
                .history
                .iter()
                .filter(|record| record.kind() == kind)
                .cloned()
                .collect();
            self.logger.record(&format!(
                "replaying {} buffered {} records",
                backlog.len(),
                kind
            ));
            let mut guard = sink.borrow_mut();
            let callback: &mut RecordSink = &mut guard;
            for record in &backlog {
                callback(record);
            }
        }

        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber { id, kind, sink });

        Ok(Box::new(ReplaySubscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }))
    }
}

struct ReplaySubscription {
    id: u64,
    inner: Weak<RefCell<ReplayInner>>,
}

impl Subscription for ReplaySubscription {
    fn disconnect(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|subscriber| subscriber.id != self.id);
        }
        self.inner = Weak::new();
    }
}
