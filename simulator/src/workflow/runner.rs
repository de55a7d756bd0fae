use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use inpcore::metrics::{FramePhaseBreakdown, InteractionDetail, LongTaskRecord};
use inpcore::prelude::{RecordKind, SessionState};
use inpcore::session::{
    FrameProcessor, InpUpdate, InteractionProcessor, LongTaskProcessor, MonitorSession,
};
use inpcore::support::SupportReport;
use inpcore::telemetry::CounterSnapshot;
use inpcore::timing::RawTimingRecord;
use inpcore::ReplaySource;
use log::debug;
use std::rc::Rc;

/// Per-session outcome of a replay.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub kind: RecordKind,
    pub state: SessionState,
    pub counters: CounterSnapshot,
}

pub struct WorkflowResult {
    pub inp: Option<i64>,
    pub interactions: Vec<InteractionDetail>,
    pub long_tasks: Vec<LongTaskRecord>,
    pub frames: Vec<FramePhaseBreakdown>,
    pub support: SupportReport,
    pub sessions: Vec<SessionOutcome>,
    pub records_replayed: usize,
}

fn outcome<P: inpcore::RecordProcessor>(session: &MonitorSession<P>) -> SessionOutcome {
    SessionOutcome {
        kind: session.kind(),
        state: session.state(),
        counters: session.counters(),
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Replays `records` through one session per enabled metric kind.
    ///
    /// The first `buffered_prefix` records are emitted before any session
    /// subscribes, so they reach the sessions through buffered delivery.
    pub fn execute(&self, records: &[RawTimingRecord]) -> anyhow::Result<WorkflowResult> {
        let source = Rc::new(ReplaySource::new(self.config.supported_kinds.clone()));
        let support = SupportReport::probe(source.as_ref(), &self.config.user_agent);
        let monitors = &self.config.monitors;

        let split = self.config.buffered_prefix.min(records.len());
        let (backlog, live) = records.split_at(split);
        source.emit_all(backlog.iter().cloned());

        let mut inp_session = monitors.inp.then(|| {
            MonitorSession::new(
                source.clone(),
                InteractionProcessor::default(),
                |update: &InpUpdate| {
                    debug!(
                        "INP {:?} ({}) over {} interactions",
                        update.inp,
                        update.rating(),
                        update.interactions.len()
                    )
                },
            )
            .with_config(self.config.session.clone())
        });
        let mut task_session = monitors.long_tasks.then(|| {
            MonitorSession::new(
                source.clone(),
                LongTaskProcessor::default(),
                |task: &LongTaskRecord| debug!("long task {} ms at {}", task.duration, task.start_time),
            )
            .with_config(self.config.session.clone())
        });
        let mut frame_session = monitors.loaf.then(|| {
            MonitorSession::new(
                source.clone(),
                FrameProcessor::default(),
                |frame: &FramePhaseBreakdown| {
                    debug!(
                        "long animation frame {:.1} ms (script {:.1} ms)",
                        frame.duration, frame.phases.script
                    )
                },
            )
            .with_config(self.config.session.clone())
        });

        if let Some(session) = inp_session.as_mut() {
            session.start().context("starting INP session")?;
        }
        if let Some(session) = task_session.as_mut() {
            session.start().context("starting long-task session")?;
        }
        if let Some(session) = frame_session.as_mut() {
            session.start().context("starting long-animation-frame session")?;
        }

        source.emit_all(live.iter().cloned());

        if self.config.reset_after {
            if let Some(session) = inp_session.as_mut() {
                session.reset();
            }
        }

        let mut sessions = Vec::new();
        let (inp, interactions) = match inp_session.as_mut() {
            Some(session) => {
                let snapshot = session.snapshot();
                session.stop();
                sessions.push(outcome(session));
                (snapshot.inp, snapshot.interactions)
            }
            None => (None, Vec::new()),
        };
        let long_tasks = match task_session.as_mut() {
            Some(session) => {
                session.stop();
                sessions.push(outcome(session));
                session.long_tasks()
            }
            None => Vec::new(),
        };
        let frames = match frame_session.as_mut() {
            Some(session) => {
                session.stop();
                sessions.push(outcome(session));
                session.frames()
            }
            None => Vec::new(),
        };

        Ok(WorkflowResult {
            inp,
            interactions,
            long_tasks,
            frames,
            support,
            sessions,
            records_replayed: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_scenario, DemoAction, GeneratorConfig};

    fn scenario(actions: Vec<DemoAction>, interactions: usize) -> Vec<RawTimingRecord> {
        build_scenario(&GeneratorConfig {
            interactions,
            actions,
            seed: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn runner_executes_workflow() {
        let cfg = WorkflowConfig::from_args(10, 5, 0);
        let records = scenario(vec![DemoAction::BadBlocking], 10);
        let result = Runner::new(cfg).execute(&records).unwrap();

        assert_eq!(result.interactions.len(), 10);
        assert_eq!(result.long_tasks.len(), 10);
        assert_eq!(result.frames.len(), 10);
        assert!(result.inp.unwrap() >= 248);
        assert!(result
            .sessions
            .iter()
            .all(|outcome| outcome.state == SessionState::Stopped));
    }

    #[test]
    fn buffered_prefix_reaches_the_sessions() {
        let records = scenario(vec![DemoAction::GoodCounter], 6);
        let all_live = Runner::new(WorkflowConfig::from_args(6, 5, 0))
            .execute(&records)
            .unwrap();
        let all_buffered = Runner::new(WorkflowConfig::from_args(6, 5, records.len()))
            .execute(&records)
            .unwrap();

        assert_eq!(all_live.inp, all_buffered.inp);
        assert_eq!(all_buffered.interactions.len(), 6);
    }

    #[test]
    fn unbuffered_sessions_miss_the_backlog() {
        let records = scenario(vec![DemoAction::GoodCounter], 6);
        let mut cfg = WorkflowConfig::from_args(6, 5, records.len());
        cfg.session.buffered = false;
        let result = Runner::new(cfg).execute(&records).unwrap();

        assert_eq!(result.inp, None);
        assert!(result.interactions.is_empty());
    }

    #[test]
    fn unsupported_kinds_leave_inert_sessions() {
        let records = scenario(vec![DemoAction::BadCalculation], 3);
        let mut cfg = WorkflowConfig::from_args(3, 5, 0);
        cfg.supported_kinds = vec![RecordKind::Event];
        let result = Runner::new(cfg).execute(&records).unwrap();

        assert_eq!(result.interactions.len(), 3);
        assert!(result.long_tasks.is_empty());
        assert!(result.frames.is_empty());
        assert!(!result.support.long_tasks);
        let states: Vec<SessionState> = result.sessions.iter().map(|o| o.state).collect();
        assert_eq!(
            states,
            vec![
                SessionState::Stopped,
                SessionState::Unsupported,
                SessionState::Unsupported
            ]
        );
    }

    #[test]
    fn reset_after_clears_the_inp_result() {
        let records = scenario(vec![DemoAction::BadDom], 4);
        let mut cfg = WorkflowConfig::from_args(4, 5, 0);
        cfg.reset_after = true;
        let result = Runner::new(cfg).execute(&records).unwrap();

        assert_eq!(result.inp, None);
        assert!(result.interactions.is_empty());
        assert_eq!(result.frames.len(), 4);
    }
}
