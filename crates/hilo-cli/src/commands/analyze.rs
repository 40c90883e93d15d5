use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use hilo_config::HiloConfig;
use hilo_core::entities::BatchReport;
use hilo_pipeline::{
    ExportDirSource, JsonDirStore, Pipeline, RunObserver, RunOptions, TimeWindow,
};
use hilo_schema::SchemaRegistry;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyzeArgs;
use crate::exit::ExitStatus;
use crate::output::output;
use crate::progress::RunProgress;

#[derive(Serialize)]
struct AnalyzeResponse {
    output_dir: PathBuf,
    #[serde(flatten)]
    report: BatchReport,
}

/// Handle `hilo analyze`.
pub async fn handle(
    args: &AnalyzeArgs,
    flags: &GlobalFlags,
    config: HiloConfig,
) -> anyhow::Result<ExitStatus> {
    if let (Some(from), Some(to)) = (args.from, args.to)
        && from > to
    {
        bail!("--from {from} is after --to {to}");
    }
    if !args.input.is_dir() {
        bail!("input directory '{}' does not exist", args.input.display());
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.pipeline.output_dir));
    let source = Arc::new(ExportDirSource::new(&args.input));
    let store = Arc::new(
        JsonDirStore::new(&output_dir).with_validation(Arc::new(SchemaRegistry::new())),
    );
    let progress = Arc::new(RunProgress::new());
    let pipeline = Pipeline::new(source, store, config)
        .context("failed to initialize analysis engines")?
        .with_observer(Arc::clone(&progress) as Arc<dyn RunObserver>);

    let cancel = pipeline.cancel_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping at the next message");
            cancel.cancel();
        }
    });

    let options = RunOptions {
        chat_ids: args.chats.clone(),
        window: TimeWindow {
            start: args.from,
            end: args.to,
        },
    };
    let result = pipeline.run(&options).await;
    interrupt.abort();
    progress.finish();

    let report = result.context("analysis run failed")?;
    let status = ExitStatus::from_report(&report);
    if status != ExitStatus::Success {
        tracing::warn!(
            failed = report.failed(),
            chats = report.chats.len(),
            "some chats did not complete"
        );
    }
    output(&AnalyzeResponse { output_dir, report }, flags.format)?;
    Ok(status)
}
