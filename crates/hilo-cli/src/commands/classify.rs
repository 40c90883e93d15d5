use hilo_core::entities::LinkDescriptor;
use hilo_links::TextNormalizer;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClassifyArgs;
use crate::output::output;

#[derive(Serialize)]
struct Classified {
    url: String,
    /// What the normalizer substitutes for the URL.
    label: String,
    descriptor: LinkDescriptor,
}

/// Handle `hilo classify`.
pub fn handle(args: &ClassifyArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let normalizer = TextNormalizer::builtin()?;
    let results: Vec<Classified> = args
        .urls
        .iter()
        .map(|url| Classified {
            url: url.clone(),
            label: normalizer.label_for(url),
            descriptor: normalizer.registry().classify(url),
        })
        .collect();
    output(&results, flags.format)
}
