use anyhow::Context;
use clap::Parser;
use dashboard::model::DashboardModel;
use generator::profile::build_scenario;
use inpcore::timing::RawTimingRecord;
use std::fs;
use std::path::{Path, PathBuf};
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod dashboard;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Replays performance-timing records through the INP metrics core")]
struct Args {
    /// JSON array of recorded timing entries; synthetic demo traffic is used when omitted
    #[arg(long)]
    records: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 20)]
    interactions: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Emit this many records before the sessions subscribe
    #[arg(long, default_value_t = 0)]
    buffered_prefix: usize,
    /// Reset the INP session after the replay
    #[arg(long, default_value_t = false)]
    reset: bool,
    /// Print the dashboard snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn load_records(path: &Path) -> anyhow::Result<Vec<RawTimingRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading timing records {}", path.display()))?;
    RawTimingRecord::parse_batch(&contents)
        .with_context(|| format!("parsing timing records {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.interactions, args.seed, args.buffered_prefix)
    };
    workflow_config.reset_after |= args.reset;

    let records = match args.records.as_ref() {
        Some(path) => load_records(path)?,
        None => build_scenario(&workflow_config.generator).context("generating demo records")?,
    };
    if let Some(name) = workflow_config.generator.scenario.as_ref() {
        log::info!(
            "scenario {}: {}",
            name,
            workflow_config
                .generator
                .description
                .as_deref()
                .unwrap_or("no description")
        );
    }
    log::info!("replaying {} timing records", records.len());

    let runner = Runner::new(workflow_config);
    let result = runner.execute(&records)?;
    let model = DashboardModel::from_result(&result);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&model).context("serializing dashboard snapshot")?;
        println!("{}", rendered);
    } else {
        print!("{}", model);
    }

    Ok(())
}
