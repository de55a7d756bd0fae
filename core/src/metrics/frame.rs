use crate::math::stats::StatsHelper;
use crate::timing::{present, text_or, RawFrameTiming, RawScriptTiming};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Only the leading scripts of a frame are attributed.
pub const MAX_ATTRIBUTED_SCRIPTS: usize = 5;

/// Simplified script / render / style-and-layout split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseDurations<T = f64> {
    pub script: T,
    pub render: T,
    pub style_layout: T,
}

impl PhaseDurations<f64> {
    pub fn rounded(&self) -> PhaseDurations<i64> {
        PhaseDurations {
            script: StatsHelper::round_ms(self.script),
            render: StatsHelper::round_ms(self.render),
            style_layout: StatsHelper::round_ms(self.style_layout),
        }
    }
}

/// Detailed frame timeline: work before rendering, then the render phase
/// split at the style-and-layout boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTimings<T = f64> {
    pub start_time: T,
    pub end_time: T,
    pub work_duration: T,
    pub render_duration: T,
    pub pre_layout_duration: T,
    pub style_and_layout_duration: T,
}

impl FrameTimings<f64> {
    pub fn rounded(&self) -> FrameTimings<i64> {
        FrameTimings {
            start_time: StatsHelper::round_ms(self.start_time),
            end_time: StatsHelper::round_ms(self.end_time),
            work_duration: StatsHelper::round_ms(self.work_duration),
            render_duration: StatsHelper::round_ms(self.render_duration),
            pre_layout_duration: StatsHelper::round_ms(self.pre_layout_duration),
            style_and_layout_duration: StatsHelper::round_ms(self.style_and_layout_duration),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptAttribution {
    pub name: String,
    pub start_time: i64,
    pub duration: i64,
    pub invoker: String,
    pub source_url: String,
    pub source_function_name: String,
    /// `-1` when the position is unknown.
    pub source_char_position: i64,
}

impl ScriptAttribution {
    pub fn from_raw(script: &RawScriptTiming) -> Self {
        Self {
            name: text_or(&script.name, "unknown"),
            start_time: StatsHelper::round_ms(script.start_time.unwrap_or(0.0)),
            duration: StatsHelper::round_ms(script.duration.unwrap_or(0.0)),
            invoker: text_or(&script.invoker, ""),
            source_url: text_or(&script.source_url, ""),
            source_function_name: text_or(&script.source_function_name, ""),
            source_char_position: script
                .source_char_position
                .filter(|position| *position != 0)
                .unwrap_or(-1),
        }
    }
}

/// Decomposed long animation frame. Durations are unrounded and unclamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePhaseBreakdown {
    pub start_time: f64,
    pub duration: f64,
    pub render_start: f64,
    pub style_and_layout_start: f64,
    pub blocking_duration: f64,
    pub first_ui_event_timestamp: Option<f64>,
    pub phases: PhaseDurations,
    pub timings: FrameTimings,
    pub scripts: Vec<ScriptAttribution>,
    pub captured_at: DateTime<Local>,
}

/// Whole-millisecond view of a [`FramePhaseBreakdown`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub start_time: i64,
    pub duration: i64,
    pub render_start: i64,
    pub style_and_layout_start: i64,
    pub blocking_duration: i64,
    pub first_ui_event_timestamp: Option<i64>,
    pub phases: PhaseDurations<i64>,
    pub timings: FrameTimings<i64>,
    pub scripts: Vec<ScriptAttribution>,
    pub captured_at: DateTime<Local>,
}

impl FramePhaseBreakdown {
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            start_time: StatsHelper::round_ms(self.start_time),
            duration: StatsHelper::round_ms(self.duration),
            render_start: StatsHelper::round_ms(self.render_start),
            style_and_layout_start: StatsHelper::round_ms(self.style_and_layout_start),
            blocking_duration: StatsHelper::round_ms(self.blocking_duration),
            first_ui_event_timestamp: self.first_ui_event_timestamp.map(StatsHelper::round_ms),
            phases: self.phases.rounded(),
            timings: self.timings.rounded(),
            scripts: self.scripts.clone(),
            captured_at: self.captured_at,
        }
    }
}

/// Frame boundaries with absent or zero fields collapsed to `0.0`.
#[derive(Debug, Clone, Copy)]
struct FrameBoundaries {
    start_time: f64,
    duration: f64,
    render_start: f64,
    style_and_layout_start: f64,
}

impl FrameBoundaries {
    fn from_raw(frame: &RawFrameTiming) -> Self {
        Self {
            start_time: frame.start_time,
            duration: frame.duration,
            render_start: present(frame.render_start).unwrap_or(0.0),
            style_and_layout_start: present(frame.style_and_layout_start).unwrap_or(0.0),
        }
    }

    fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Guarded on "boundary is set" (non-zero).
    fn timings(&self) -> FrameTimings {
        let render_started = self.render_start != 0.0;
        let layout_started = self.style_and_layout_start != 0.0;

        FrameTimings {
            start_time: self.start_time,
            end_time: self.end_time(),
            work_duration: if render_started {
                self.render_start - self.start_time
            } else {
                self.duration
            },
            render_duration: if render_started {
                self.end_time() - self.render_start
            } else {
                0.0
            },
            pre_layout_duration: if layout_started {
                self.style_and_layout_start - self.render_start
            } else {
                0.0
            },
            style_and_layout_duration: if layout_started {
                self.end_time() - self.style_and_layout_start
            } else {
                0.0
            },
        }
    }

    /// Guarded on "boundary is positive"; a frame that never rendered
    /// attributes nothing to script here.
    fn phases(&self) -> PhaseDurations {
        let render_started = self.render_start > 0.0;
        let layout_started = self.style_and_layout_start > 0.0;

        PhaseDurations {
            script: if render_started {
                self.render_start - self.start_time
            } else {
                0.0
            },
            render: if render_started && layout_started {
                self.style_and_layout_start - self.render_start
            } else {
                0.0
            },
            style_layout: if layout_started {
                self.end_time() - self.style_and_layout_start
            } else {
                0.0
            },
        }
    }
}

/// Splits long animation frames into named phases.
pub struct FramePhaseDecomposer;

impl FramePhaseDecomposer {
    pub fn decompose(frame: &RawFrameTiming) -> FramePhaseBreakdown {
        let boundaries = FrameBoundaries::from_raw(frame);

        FramePhaseBreakdown {
            start_time: boundaries.start_time,
            duration: boundaries.duration,
            render_start: boundaries.render_start,
            style_and_layout_start: boundaries.style_and_layout_start,
            blocking_duration: frame.blocking_duration.unwrap_or(0.0),
            first_ui_event_timestamp: present(frame.first_ui_event_timestamp),
            phases: boundaries.phases(),
            timings: boundaries.timings(),
            scripts: frame
                .scripts
                .iter()
                .take(MAX_ATTRIBUTED_SCRIPTS)
                .map(ScriptAttribution::from_raw)
                .collect(),
            captured_at: Local::now(),
        }
    }
}
