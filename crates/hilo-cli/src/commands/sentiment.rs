use hilo_config::HiloConfig;
use hilo_links::TextNormalizer;
use hilo_sentiment::SentimentEvaluator;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TextArgs;
use crate::output::output;

/// Handle `hilo sentiment`.
pub fn handle(args: &TextArgs, flags: &GlobalFlags, config: &HiloConfig) -> anyhow::Result<()> {
    let evaluator = SentimentEvaluator::from_config(&config.sentiment)?;
    let text = TextNormalizer::builtin()?.normalize(&args.text);
    output(&evaluator.evaluate(&text), flags.format)
}
