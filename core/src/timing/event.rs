use serde::{Deserialize, Serialize};

/// Event Timing entry for a single DOM event dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEventTiming {
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
    /// Absent or zero for events that are not part of an interaction (hover).
    pub interaction_id: Option<u64>,
    pub processing_start: Option<f64>,
    pub processing_end: Option<f64>,
    /// Tag name of the event target.
    pub target: Option<String>,
}

impl RawEventTiming {
    pub fn new(name: &str, interaction_id: u64, start_time: f64, duration: f64) -> Self {
        Self {
            name: name.to_string(),
            start_time,
            duration,
            interaction_id: Some(interaction_id),
            ..Default::default()
        }
    }

    pub fn with_processing(mut self, processing_start: f64, processing_end: f64) -> Self {
        self.processing_start = Some(processing_start);
        self.processing_end = Some(processing_end);
        self
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// The interaction id, or `None` for the "no interaction" sentinel.
    pub fn countable_interaction(&self) -> Option<u64> {
        self.interaction_id.filter(|id| *id != 0)
    }
}
