use hilo_links::TextNormalizer;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TextArgs;
use crate::output::output;

#[derive(Serialize)]
struct NormalizeResponse {
    text: String,
    links: Vec<String>,
}

/// Handle `hilo normalize`.
pub fn handle(args: &TextArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let normalized = TextNormalizer::builtin()?.normalize_with_links(&args.text);
    output(
        &NormalizeResponse {
            text: normalized.text,
            links: normalized.links,
        },
        flags.format,
    )
}
