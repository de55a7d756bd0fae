//! The raw-event source seam: a capability query plus a push subscription.

pub mod replay;

pub use replay::ReplaySource;

use crate::prelude::{MonitorResult, RecordKind};
use crate::timing::RawTimingRecord;

/// Callback that receives each delivered record, buffered ones first.
pub type RecordSink = Box<dyn FnMut(&RawTimingRecord)>;

/// Handle returned by [`TimingSource::subscribe`].
pub trait Subscription {
    /// Stops delivery before returning. Calling it twice is harmless.
    fn disconnect(&mut self);
}

/// Something that can deliver performance-timing records.
pub trait TimingSource {
    fn supported_kinds(&self) -> Vec<RecordKind>;

    fn supports(&self, kind: RecordKind) -> bool {
        self.supported_kinds().contains(&kind)
    }

    /// Registers `sink` for records of `kind`. With `buffered`, records the
    /// source emitted earlier are delivered before this call returns.
    fn subscribe(
        &self,
        kind: RecordKind,
        buffered: bool,
        sink: RecordSink,
    ) -> MonitorResult<Box<dyn Subscription>>;
}
