//! Subscription lifecycle for each metric kind.

pub mod processors;

pub use processors::{FrameProcessor, InpUpdate, InteractionProcessor, LongTaskProcessor};

use crate::metrics::{FramePhaseBreakdown, InteractionDetail, LongTaskRecord};
use crate::prelude::{
    MonitorError, MonitorResult, RecordKind, RecordProcessor, SessionConfig, SessionState,
};
use crate::source::{RecordSink, Subscription, TimingSource};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{CounterSnapshot, MetricsRecorder};
use crate::timing::RawTimingRecord;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type Notifier<U> = Box<dyn FnMut(&U)>;

pub type InpSession = MonitorSession<InteractionProcessor>;
pub type LongTaskSession = MonitorSession<LongTaskProcessor>;
pub type FrameSession = MonitorSession<FrameProcessor>;

struct SessionCore<P: RecordProcessor> {
    state: SessionState,
    processor: P,
    counters: MetricsRecorder,
}

impl<P: RecordProcessor> SessionCore<P> {
    fn dispatch(&mut self, record: &RawTimingRecord) -> Option<P::Update> {
        if self.state != SessionState::Active {
            return None;
        }
        self.counters.record_delivered();
        let update = self.processor.process(record);
        match &update {
            Some(_) => self.counters.record_notified(),
            None => self.counters.record_ignored(),
        }
        update
    }
}

/// Hands updates to the notification callback outside any session borrow.
///
/// Updates raised while the callback is already running (a `reset` from
/// inside it, say) are queued and delivered in order once it returns.
struct Outbox<U> {
    notify: RefCell<Notifier<U>>,
    pending: RefCell<VecDeque<U>>,
}

impl<U> Outbox<U> {
    fn new(notify: Notifier<U>) -> Self {
        Self {
            notify: RefCell::new(notify),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    fn deliver(&self, update: U) {
        self.pending.borrow_mut().push_back(update);
        let Ok(mut notify) = self.notify.try_borrow_mut() else {
            return;
        };
        let callback: &mut Notifier<U> = &mut notify;
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(update) => callback(&update),
                None => break,
            }
        }
    }
}

/// One monitoring session over a [`TimingSource`].
///
/// Records are processed on the thread that drives the source. The
/// notification callback runs with no session borrow held, so it may read
/// from or reset its own session.
pub struct MonitorSession<P: RecordProcessor> {
    kind: RecordKind,
    core: Rc<RefCell<SessionCore<P>>>,
    outbox: Rc<Outbox<P::Update>>,
    source: Rc<dyn TimingSource>,
    subscription: Option<Box<dyn Subscription>>,
    config: SessionConfig,
    logger: LogManager,
}

fn component_for(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Event => "inp",
        RecordKind::LongTask => "longtask",
        RecordKind::LongAnimationFrame => "loaf",
    }
}

impl<P: RecordProcessor + 'static> MonitorSession<P> {
    /// Builds an idle session, or an inert `Unsupported` one when the
    /// source cannot deliver the processor's record kind.
    pub fn new<F>(source: Rc<dyn TimingSource>, processor: P, notify: F) -> Self
    where
        F: FnMut(&P::Update) + 'static,
    {
        let kind = processor.kind();
        let logger = LogManager::new(component_for(kind));
        let state = if source.supports(kind) {
            SessionState::Idle
        } else {
            logger.warn(&format!(
                "{} records are not supported by this timing source",
                kind
            ));
            SessionState::Unsupported
        };

        Self {
            kind,
            core: Rc::new(RefCell::new(SessionCore {
                state,
                processor,
                counters: MetricsRecorder::new(),
            })),
            outbox: Rc::new(Outbox::new(Box::new(notify))),
            source,
            subscription: None,
            config: SessionConfig::default(),
            logger,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribes to the source; buffered records are processed before this
    /// returns. A no-op when unsupported or already active.
    pub fn start(&mut self) -> MonitorResult<()> {
        match self.state() {
            SessionState::Unsupported | SessionState::Active => return Ok(()),
            SessionState::Stopped => return Err(MonitorError::SessionStopped(self.kind)),
            SessionState::Idle => {}
        }

        self.core.borrow_mut().state = SessionState::Active;
        let core = Rc::downgrade(&self.core);
        let outbox = Rc::downgrade(&self.outbox);
        let sink: RecordSink = Box::new(move |record: &RawTimingRecord| {
            let Some(core) = core.upgrade() else {
                return;
            };
            let update = core.borrow_mut().dispatch(record);
            if let (Some(update), Some(outbox)) = (update, outbox.upgrade()) {
                outbox.deliver(update);
            }
        });

        match self.source.subscribe(self.kind, self.config.buffered, sink) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.logger.record(&format!(
                    "monitoring started (buffered: {})",
                    self.config.buffered
                ));
                Ok(())
            }
            Err(err) => {
                self.core.borrow_mut().state = SessionState::Idle;
                Err(err)
            }
        }
    }
}

impl<P: RecordProcessor> MonitorSession<P> {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.core.borrow().state
    }

    pub fn is_supported(&self) -> bool {
        self.state() != SessionState::Unsupported
    }

    /// Tears the subscription down. Terminal; a no-op when unsupported.
    pub fn stop(&mut self) {
        match self.state() {
            SessionState::Unsupported | SessionState::Stopped => return,
            SessionState::Idle | SessionState::Active => {}
        }
        if let Some(mut subscription) = self.subscription.take() {
            subscription.disconnect();
        }
        self.core.borrow_mut().state = SessionState::Stopped;
        self.logger.record("monitoring stopped");
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.core.borrow().counters.snapshot()
    }

    fn read<R>(&self, view: impl FnOnce(&P) -> R) -> R {
        view(&self.core.borrow().processor)
    }
}

impl<P: RecordProcessor> Drop for MonitorSession<P> {
    fn drop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.disconnect();
        }
    }
}

impl MonitorSession<InteractionProcessor> {
    /// Forgets every interaction and notifies the unknown state. Leaves the
    /// lifecycle state untouched; a no-op when unsupported.
    pub fn reset(&mut self) {
        let update = {
            let mut core = self.core.borrow_mut();
            if core.state == SessionState::Unsupported {
                return;
            }
            core.counters.record_notified();
            core.processor.reset()
        };
        self.logger.record("interactions reset");
        self.outbox.deliver(update);
    }

    pub fn current_inp(&self) -> Option<i64> {
        self.read(InteractionProcessor::current_inp)
    }

    pub fn interactions(&self) -> Vec<InteractionDetail> {
        self.read(|processor| processor.store().details().to_vec())
    }

    pub fn snapshot(&self) -> InpUpdate {
        self.read(InteractionProcessor::snapshot)
    }
}

impl MonitorSession<LongTaskProcessor> {
    pub fn long_tasks(&self) -> Vec<LongTaskRecord> {
        self.read(|processor| processor.records().to_vec())
    }
}

impl MonitorSession<FrameProcessor> {
    pub fn frames(&self) -> Vec<FramePhaseBreakdown> {
        self.read(|processor| processor.frames().to_vec())
    }
}

pub fn start_inp_monitor<F>(source: Rc<dyn TimingSource>, notify: F) -> MonitorResult<InpSession>
where
    F: FnMut(&InpUpdate) + 'static,
{
    let mut session = MonitorSession::new(source, InteractionProcessor::default(), notify);
    session.start()?;
    Ok(session)
}

pub fn start_long_task_monitor<F>(
    source: Rc<dyn TimingSource>,
    notify: F,
) -> MonitorResult<LongTaskSession>
where
    F: FnMut(&LongTaskRecord) + 'static,
{
    let mut session = MonitorSession::new(source, LongTaskProcessor::default(), notify);
    session.start()?;
    Ok(session)
}

pub fn start_loaf_monitor<F>(source: Rc<dyn TimingSource>, notify: F) -> MonitorResult<FrameSession>
where
    F: FnMut(&FramePhaseBreakdown) + 'static,
{
    let mut session = MonitorSession::new(source, FrameProcessor::default(), notify);
    session.start()?;
    Ok(session)
}
