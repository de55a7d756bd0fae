use anyhow::{ensure, Context};
use inpcore::timing::{
    RawEventTiming, RawFrameTiming, RawLongTaskTiming, RawScriptTiming, RawTaskAttribution,
    RawTimingRecord,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Event Timing reports durations at 8 ms granularity.
const DURATION_GRANULARITY_MS: f64 = 8.0;
const LONG_TASK_THRESHOLD_MS: f64 = 50.0;
const LONG_FRAME_THRESHOLD_MS: f64 = 50.0;
const INTERACTION_ID_STEP: u64 = 7;
const DEMO_SOURCE_URL: &str = "http://localhost:5173/src/demo-handlers.js";

/// Buttons on the demo page, each with a characteristic cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DemoAction {
    GoodCounter,
    GoodColor,
    BadBlocking,
    BadDom,
    BadCalculation,
}

impl DemoAction {
    pub const ALL: [DemoAction; 5] = [
        DemoAction::GoodCounter,
        DemoAction::GoodColor,
        DemoAction::BadBlocking,
        DemoAction::BadDom,
        DemoAction::BadCalculation,
    ];

    fn element_id(&self) -> &'static str {
        match self {
            DemoAction::GoodCounter => "good-counter",
            DemoAction::GoodColor => "good-color",
            DemoAction::BadBlocking => "bad-blocking",
            DemoAction::BadDom => "bad-dom",
            DemoAction::BadCalculation => "bad-calculation",
        }
    }

    fn handler_name(&self) -> &'static str {
        match self {
            DemoAction::GoodCounter => "setupGoodCounter",
            DemoAction::GoodColor => "setupGoodColor",
            DemoAction::BadBlocking => "setupBadBlocking",
            DemoAction::BadDom => "setupBadDOM",
            DemoAction::BadCalculation => "setupBadCalculation",
        }
    }

    /// Handler time and style/layout time in milliseconds.
    fn sample_costs(&self, rng: &mut StdRng) -> (f64, f64) {
        match self {
            DemoAction::GoodCounter => (rng.gen_range(0.5..4.0), rng.gen_range(1.0..4.0)),
            DemoAction::GoodColor => (rng.gen_range(0.5..6.0), rng.gen_range(2.0..6.0)),
            DemoAction::BadBlocking => (rng.gen_range(250.0..256.0), rng.gen_range(1.0..4.0)),
            DemoAction::BadDom => (rng.gen_range(30.0..60.0), rng.gen_range(90.0..180.0)),
            DemoAction::BadCalculation => (rng.gen_range(700.0..1100.0), rng.gen_range(1.0..4.0)),
        }
    }
}

/// Configuration for synthesizing demo-page timing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub interactions: usize,
    pub seed: u64,
    pub actions: Vec<DemoAction>,
    /// Emit a non-interaction `pointerover` before each click.
    pub hover_noise: bool,
    pub start_time: f64,
    pub scenario: Option<String>,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interactions: 20,
            seed: 0,
            actions: DemoAction::ALL.to_vec(),
            hover_noise: true,
            start_time: 1_000.0,
            scenario: None,
            description: None,
        }
    }
}

fn quantize(duration: f64) -> f64 {
    (duration / DURATION_GRANULARITY_MS).round() * DURATION_GRANULARITY_MS
}

/// Records one click on `action`, in the order the platform reports them.
fn build_interaction(
    action: DemoAction,
    interaction_id: u64,
    start_time: f64,
    rng: &mut StdRng,
) -> Vec<RawTimingRecord> {
    let (handler_ms, layout_ms) = action.sample_costs(rng);
    let input_delay = rng.gen_range(0.5..4.0);
    let pre_layout = rng.gen_range(0.5..2.0);
    let paint = rng.gen_range(2.0..8.0);

    let click_start = start_time + rng.gen_range(60.0..120.0);
    let processing_start = click_start + input_delay;
    let processing_end = processing_start + handler_ms;
    let render_start = processing_end;
    let style_and_layout_start = render_start + pre_layout;
    let frame_end = style_and_layout_start + layout_ms + paint;
    let target = "BUTTON".to_string();

    let mut records: Vec<RawTimingRecord> = Vec::with_capacity(5);

    if handler_ms > LONG_TASK_THRESHOLD_MS {
        records.push(
            RawLongTaskTiming {
                attribution: Some(vec![RawTaskAttribution {
                    name: Some("unknown".into()),
                    container_type: Some("window".into()),
                    ..Default::default()
                }]),
                ..RawLongTaskTiming::new("self", processing_start, handler_ms)
            }
            .into(),
        );
    }

    let pointerdown_start = start_time;
    records.push(
        RawEventTiming {
            processing_start: Some(pointerdown_start + 0.4),
            processing_end: Some(pointerdown_start + 0.6),
            target: Some(target.clone()),
            ..RawEventTiming::new(
                "pointerdown",
                interaction_id,
                pointerdown_start,
                quantize(rng.gen_range(8.0..24.0)),
            )
        }
        .into(),
    );
    for name in ["pointerup", "click"] {
        records.push(
            RawEventTiming::new(name, interaction_id, click_start, quantize(frame_end - click_start))
                .with_processing(processing_start, processing_end)
                .with_target(&target)
                .into(),
        );
    }

    let frame_duration = frame_end - click_start;
    if frame_duration > LONG_FRAME_THRESHOLD_MS {
        let mut frame = RawFrameTiming::new(click_start, frame_duration)
            .with_render(render_start, style_and_layout_start);
        frame.blocking_duration = Some((handler_ms - LONG_TASK_THRESHOLD_MS).max(0.0));
        frame.first_ui_event_timestamp = Some(click_start);
        frame.scripts = vec![RawScriptTiming {
            name: Some("event-listener".into()),
            start_time: Some(processing_start),
            duration: Some(handler_ms),
            invoker: Some(format!("BUTTON#{}.onclick", action.element_id())),
            source_url: Some(DEMO_SOURCE_URL.into()),
            source_function_name: Some(action.handler_name().into()),
            source_char_position: Some(rng.gen_range(200..3_000)),
        }];
        records.push(frame.into());
    }

    records
}

pub fn build_scenario(config: &GeneratorConfig) -> anyhow::Result<Vec<RawTimingRecord>> {
    ensure!(
        !config.actions.is_empty(),
        "generator needs at least one demo action"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records: Vec<RawTimingRecord> = Vec::new();
    let mut clock = config.start_time;

    for index in 0..config.interactions {
        let action = *config
            .actions
            .choose(&mut rng)
            .context("choosing a demo action")?;
        let interaction_id = (index as u64 + 1)
            .checked_mul(INTERACTION_ID_STEP)
            .context("overflow computing interaction id")?;

        if config.hover_noise {
            records.push(
                RawEventTiming {
                    name: "pointerover".into(),
                    start_time: clock,
                    duration: quantize(rng.gen_range(8.0..16.0)),
                    target: Some("BUTTON".into()),
                    ..Default::default()
                }
                .into(),
            );
            clock += rng.gen_range(20.0..60.0);
        }

        records.extend(build_interaction(action, interaction_id, clock, &mut rng));
        clock += rng.gen_range(1_200.0..2_400.0);
    }

    Ok(records)
}
