//! Responsiveness metrics core for browser performance-timing streams.
//!
//! Event records are deduplicated per interaction and folded into an INP
//! estimate, long tasks are logged with their attribution, and long
//! animation frames are split into script, render, and style/layout phases.
//! Each metric kind runs in its own [`session::MonitorSession`] over a
//! [`source::TimingSource`].

pub mod math;
pub mod metrics;
pub mod prelude;
pub mod session;
pub mod source;
pub mod support;
pub mod telemetry;
pub mod timing;

pub use prelude::{
    MonitorError, MonitorResult, RecordKind, RecordProcessor, SessionConfig, SessionState,
};
pub use session::{
    start_inp_monitor, start_loaf_monitor, start_long_task_monitor, InpUpdate, MonitorSession,
};
pub use source::{ReplaySource, TimingSource};
pub use timing::RawTimingRecord;
