use crate::workflow::runner::{SessionOutcome, WorkflowResult};
use inpcore::metrics::{FrameSummary, InpRating, InteractionDetail, LongTaskRecord};
use inpcore::prelude::{RecordKind, SessionState};
use inpcore::support::SupportReport;
use inpcore::telemetry::CounterSnapshot;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct InteractionRow {
    pub id: u64,
    pub name: String,
    pub duration: i64,
    pub processing_ms: i64,
    pub target: String,
    pub captured_at: String,
}

impl From<&InteractionDetail> for InteractionRow {
    fn from(detail: &InteractionDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name.clone(),
            duration: detail.duration,
            processing_ms: detail.processing_time(),
            target: detail.target.clone(),
            captured_at: detail.captured_at.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRow {
    pub kind: RecordKind,
    pub state: SessionState,
    pub counters: CounterSnapshot,
}

impl From<&SessionOutcome> for SessionRow {
    fn from(outcome: &SessionOutcome) -> Self {
        Self {
            kind: outcome.kind,
            state: outcome.state,
            counters: outcome.counters,
        }
    }
}

/// Snapshot handed to whatever renders the results.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardModel {
    pub inp: Option<i64>,
    pub rating: InpRating,
    pub rating_label: String,
    /// Newest interaction first.
    pub interactions: Vec<InteractionRow>,
    pub long_tasks: Vec<LongTaskRecord>,
    pub frames: Vec<FrameSummary>,
    pub support: SupportReport,
    pub sessions: Vec<SessionRow>,
    pub records_replayed: usize,
}

impl DashboardModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        let rating = InpRating::from_inp(result.inp);
        Self {
            inp: result.inp,
            rating,
            rating_label: rating.label().to_string(),
            interactions: result
                .interactions
                .iter()
                .rev()
                .map(InteractionRow::from)
                .collect(),
            long_tasks: result.long_tasks.clone(),
            frames: result.frames.iter().map(|frame| frame.summary()).collect(),
            support: result.support.clone(),
            sessions: result.sessions.iter().map(SessionRow::from).collect(),
            records_replayed: result.records_replayed,
        }
    }

    pub fn headline(&self) -> String {
        match self.inp {
            Some(inp) => format!("INP {} ms ({})", inp, self.rating_label),
            None => format!("INP -- ({})", self.rating_label),
        }
    }
}

impl fmt::Display for DashboardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(
            f,
            "replayed {} records | event timing: {} | long tasks: {} | loaf: {} | chromium: {}",
            self.records_replayed,
            self.support.event_timing,
            self.support.long_tasks,
            self.support.loaf,
            self.support.is_chromium_based
        )?;

        if self.interactions.is_empty() {
            writeln!(f, "\nNo interactions yet.")?;
        } else {
            writeln!(f, "\nInteractions (newest first):")?;
            for row in &self.interactions {
                writeln!(
                    f,
                    "  {} (ID: {})  {} | processing {}ms | target {}  {}ms",
                    row.name, row.id, row.captured_at, row.processing_ms, row.target, row.duration
                )?;
            }
        }

        if !self.long_tasks.is_empty() {
            writeln!(f, "\nLong tasks:")?;
            for task in &self.long_tasks {
                let container = task
                    .attribution
                    .first()
                    .map(|a| a.container_type.as_str())
                    .unwrap_or("unknown");
                writeln!(
                    f,
                    "  {} at {}ms  {}ms  [{}]",
                    task.name, task.start_time, task.duration, container
                )?;
            }
        }

        if !self.frames.is_empty() {
            writeln!(f, "\nLong animation frames:")?;
            for frame in &self.frames {
                writeln!(
                    f,
                    "  {}ms at {}ms  work {} / render {} (pre-layout {}, style+layout {})  blocking {}ms  scripts {}",
                    frame.duration,
                    frame.start_time,
                    frame.timings.work_duration,
                    frame.timings.render_duration,
                    frame.timings.pre_layout_duration,
                    frame.timings.style_and_layout_duration,
                    frame.blocking_duration,
                    frame.scripts.len()
                )?;
            }
        }

        writeln!(f, "\nSessions:")?;
        for session in &self.sessions {
            writeln!(
                f,
                "  {:<22} {:?}  delivered {} ignored {} notified {}",
                session.kind.to_string(),
                session.state,
                session.counters.delivered,
                session.counters.ignored,
                session.counters.notified
            )?;
        }
        Ok(())
    }
}
