use serde::{Deserialize, Serialize};

/// Long Animation Frame entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFrameTiming {
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
    pub render_start: Option<f64>,
    pub style_and_layout_start: Option<f64>,
    pub blocking_duration: Option<f64>,
    #[serde(rename = "firstUIEventTimestamp")]
    pub first_ui_event_timestamp: Option<f64>,
    pub scripts: Vec<RawScriptTiming>,
}

impl RawFrameTiming {
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            name: "long-animation-frame".to_string(),
            start_time,
            duration,
            ..Default::default()
        }
    }

    pub fn with_render(mut self, render_start: f64, style_and_layout_start: f64) -> Self {
        self.render_start = Some(render_start);
        self.style_and_layout_start = Some(style_and_layout_start);
        self
    }
}

/// Script execution attributed to a long animation frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawScriptTiming {
    pub name: Option<String>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub invoker: Option<String>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub source_function_name: Option<String>,
    pub source_char_position: Option<i64>,
}
