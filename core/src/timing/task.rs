use serde::{Deserialize, Serialize};

/// Long Tasks API entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLongTaskTiming {
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
    pub attribution: Option<Vec<RawTaskAttribution>>,
}

impl RawLongTaskTiming {
    pub fn new(name: &str, start_time: f64, duration: f64) -> Self {
        Self {
            name: name.to_string(),
            start_time,
            duration,
            attribution: None,
        }
    }
}

/// Container attribution for a long task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTaskAttribution {
    pub name: Option<String>,
    pub container_type: Option<String>,
    pub container_src: Option<String>,
    pub container_id: Option<String>,
    pub container_name: Option<String>,
}
